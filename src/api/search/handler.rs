//! Global Search Handler
//!
//! One query fans out over rooms, bookings, guests and events. Results are
//! capped per collection; an empty query returns empty sets rather than an
//! error so the search box can be permissive.

use axum::{Json, extract::Query, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Event, Room, UserPublic};
use crate::db::repository::BookingSearchHit;
use crate::utils::{AppResponse, AppResult, ok};

const MAX_HITS: usize = 5;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Default, Serialize)]
pub struct SearchResults {
    pub rooms: Vec<Room>,
    pub bookings: Vec<BookingSearchHit>,
    pub users: Vec<UserPublic>,
    pub events: Vec<Event>,
}

/// GET /api/search?q= - 跨集合搜索
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<AppResponse<SearchResults>>> {
    let term = query.q.trim();
    if term.is_empty() {
        return Ok(ok(SearchResults::default()));
    }

    let mut rooms = state.rooms().search(term).await?;
    rooms.truncate(MAX_HITS);

    let bookings = state
        .bookings_repo()
        .search(&term.to_lowercase(), MAX_HITS)
        .await?;

    let mut users = state.users().search(term).await?;
    users.truncate(MAX_HITS);
    let users = users.into_iter().map(UserPublic::from).collect();

    let mut events = state.events().search(term).await?;
    events.truncate(MAX_HITS);

    Ok(ok(SearchResults {
        rooms,
        bookings,
        users,
        events,
    }))
}
