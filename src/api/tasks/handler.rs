//! Task API Handlers
//!
//! Tasks drive room status: Cleaning/Maintenance tasks flip the room into
//! the matching state, completion releases it back to Available. Completing
//! a task always frees the room, even if another open task exists for it;
//! staff re-open the room state by touching the remaining task.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    RoomStatus, Task, TaskCreate, TaskPriority, TaskStatus, TaskType, TaskUpdate,
};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

fn room_state_for(task_type: TaskType) -> Option<RoomStatus> {
    match task_type {
        TaskType::Cleaning => Some(RoomStatus::Cleaning),
        TaskType::Maintenance => Some(RoomStatus::Maintenance),
        TaskType::Inspection => None,
    }
}

/// POST /api/tasks - 建单并联动房态
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<TaskCreate>,
) -> AppResult<Json<AppResponse<Task>>> {
    if req.description.trim().is_empty() {
        return Err(AppError::validation("Task description is required"));
    }
    let room = state
        .rooms()
        .find_by_id(&req.room)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Room {}", req.room)))?;
    let room_ref = room
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Room record without id"))?;

    let assigned_to = match &req.assigned_to {
        Some(id) => Some(UserRepository::record(id)?),
        None => None,
    };
    let task_type = req.task_type.unwrap_or(TaskType::Cleaning);

    let task = state
        .tasks()
        .create(Task {
            id: None,
            room: room_ref.clone(),
            assigned_to,
            description: req.description,
            task_type,
            priority: req.priority.unwrap_or(TaskPriority::Medium),
            status: TaskStatus::Pending,
            reported_by: Some(UserRepository::record(&user.id)?),
            created_at: Utc::now(),
            completed_at: None,
        })
        .await?;

    if let Some(status) = room_state_for(task_type) {
        state.rooms().set_status(&room_ref, status).await?;
    }
    Ok(ok(task))
}

/// GET /api/tasks - 全部工单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Task>>>> {
    let tasks = state.tasks().find_all().await?;
    Ok(ok(tasks))
}

/// GET /api/tasks/my - 分配给当前员工的工单
pub async fn my_tasks(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<Task>>>> {
    let record = UserRepository::record(&user.id)?;
    let tasks = state.tasks().find_by_assignee(&record).await?;
    Ok(ok(tasks))
}

/// PUT /api/tasks/{id} - 更新状态或改派
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<TaskUpdate>,
) -> AppResult<Json<AppResponse<Task>>> {
    let task = state
        .tasks()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Task {id}")))?;
    let task_ref = task
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Task record without id"))?;

    let mut updated = task.clone();
    if let Some(assignee) = &req.assigned_to {
        let user_ref = UserRepository::record(assignee)?;
        updated = state
            .tasks()
            .assign(&task_ref, &user_ref)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Task {id}")))?;
    }

    if let Some(status) = req.status {
        updated = state
            .tasks()
            .set_status(&task_ref, status)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Task {id}")))?;

        match status {
            TaskStatus::Completed => {
                state
                    .rooms()
                    .set_status(&task.room, RoomStatus::Available)
                    .await?;
            }
            TaskStatus::InProgress | TaskStatus::Pending => {
                if let Some(room_status) = room_state_for(task.task_type) {
                    state.rooms().set_status(&task.room, room_status).await?;
                }
            }
        }
    }
    Ok(ok(updated))
}

/// DELETE /api/tasks/completed - 清理已完成工单
pub async fn delete_completed(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<usize>>> {
    let deleted = state.tasks().delete_completed().await?;
    Ok(ok_with_message(
        deleted.len(),
        "Completed tasks cleared",
    ))
}

/// DELETE /api/tasks/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state
        .tasks()
        .delete(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Task {id}")))?;
    Ok(ok_with_message((), "Task deleted"))
}
