//! Dashboard Report Handler

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};

#[derive(Debug, Serialize)]
pub struct DashboardReport {
    pub total_rooms: i64,
    /// Room count keyed by status name
    pub rooms_by_status: HashMap<String, i64>,
    pub total_bookings: i64,
    /// Σ paid over Paid/Partial bills
    pub total_revenue: f64,
    pub pending_tasks: i64,
    pub pending_inquiries: i64,
    pub todays_check_ins: i64,
    pub todays_check_outs: i64,
}

/// GET /api/reports/dashboard - 运营总览
pub async fn dashboard(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<DashboardReport>>> {
    let today = Utc::now().date_naive();

    let rooms_by_status: HashMap<String, i64> = state
        .rooms()
        .count_by_status()
        .await?
        .into_iter()
        .map(|(status, count)| (format!("{status:?}"), count))
        .collect();

    let report = DashboardReport {
        total_rooms: state.rooms().count().await?,
        rooms_by_status,
        total_bookings: state.bookings_repo().count().await?,
        total_revenue: state.billings().revenue().await?,
        pending_tasks: state.tasks().count_pending().await?,
        pending_inquiries: state.inquiries().count_pending().await?,
        todays_check_ins: state.bookings_repo().count_check_ins_on(today).await?,
        todays_check_outs: state.bookings_repo().count_check_outs_on(today).await?,
    };
    Ok(ok(report))
}
