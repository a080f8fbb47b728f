//! Inquiry API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

use crate::core::ServerState;
use crate::db::models::{Inquiry, InquiryCreate, InquiryReply, InquiryStatus, NotificationKind};
use crate::notify::email;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// POST /api/inquiries - 联系表单 (公共)
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<InquiryCreate>,
) -> AppResult<Json<AppResponse<Inquiry>>> {
    if req.name.trim().is_empty() || req.message.trim().is_empty() {
        return Err(AppError::validation("Name and message are required"));
    }
    if !req.email.contains('@') {
        return Err(AppError::validation("A valid email is required"));
    }

    let inquiry = state
        .inquiries()
        .create(Inquiry {
            id: None,
            name: req.name,
            email: req.email,
            subject: req.subject,
            message: req.message,
            status: InquiryStatus::Pending,
            reply: None,
            replied_at: None,
            created_at: Utc::now(),
        })
        .await?;

    let inquiry_id = inquiry.id.as_ref().map(|id| id.to_string());
    state
        .notifier
        .notify_staff(
            NotificationKind::Inquiry,
            "new_inquiry",
            format!("New inquiry from {}: {}", inquiry.name, inquiry.subject),
            serde_json::json!({ "inquiry_id": inquiry_id }),
        )
        .await;

    Ok(ok(inquiry))
}

/// GET /api/inquiries - 全部留言
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Inquiry>>>> {
    let inquiries = state.inquiries().find_all().await?;
    Ok(ok(inquiries))
}

/// POST /api/inquiries/{id}/reply - 回复并邮件通知
///
/// 回复的本质就是那封邮件：先发送，发送失败则整个操作失败，不落库。
pub async fn reply(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<InquiryReply>,
) -> AppResult<Json<AppResponse<Inquiry>>> {
    if req.reply_message.trim().is_empty() {
        return Err(AppError::validation("Reply message is required"));
    }
    let inquiry = state
        .inquiries()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Inquiry {id}")))?;
    if inquiry.status == InquiryStatus::Replied {
        return Err(AppError::validation("Inquiry has already been replied to"));
    }
    let inquiry_ref = inquiry
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Inquiry record without id"))?;

    let body = email::inquiry_reply_body(&inquiry.name, &inquiry.message, &req.reply_message);
    state
        .mailer
        .send(&inquiry.email, &format!("Re: {}", inquiry.subject), body)
        .await
        .map_err(|e| {
            tracing::error!(target: "email", inquiry = %inquiry_ref, error = %e, "reply email failed");
            AppError::upstream("Failed to send reply email")
        })?;

    let updated = state
        .inquiries()
        .set_reply(&inquiry_ref, req.reply_message)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Inquiry {id}")))?;

    Ok(ok(updated))
}

/// DELETE /api/inquiries/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state
        .inquiries()
        .delete(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Inquiry {id}")))?;
    Ok(ok_with_message((), "Inquiry deleted"))
}
