use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::days;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSessionResponse {
    pub success: bool,
    /// The day's score after the session's points were walked back.
    pub day_score: i32,
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteSessionResponse>> {
    let day_score = days::delete_session(&state.db, id).await?;

    Ok(Json(DeleteSessionResponse {
        success: true,
        day_score,
    }))
}
