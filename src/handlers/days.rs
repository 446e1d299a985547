use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::daily_log::MetricsPatch;
use crate::models::workout_log::SessionInput;
use crate::scoring::calendar;
use crate::services::days::{self, DaySubmission, DayState, UserHistory};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDayRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    /// Target day. Unrecognized content falls back to the server's current
    /// UTC day, but the field itself must be present.
    pub date: String,

    #[validate]
    pub metrics: Option<MetricsPatch>,

    #[validate]
    pub session: Option<SessionInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDayResponse {
    pub success: bool,
    pub day_score: i32,
    pub training_points: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayQuery {
    pub username: String,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub username: String,
}

pub async fn submit_day(
    State(state): State<AppState>,
    Json(body): Json<SubmitDayRequest>,
) -> AppResult<Json<SubmitDayResponse>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let day = calendar::canonical_day(Some(&body.date), Utc::now().date_naive());

    let outcome = days::submit_day(
        &state.db,
        DaySubmission {
            username: body.username,
            day,
            metrics: body.metrics,
            session: body.session,
        },
    )
    .await?;

    Ok(Json(SubmitDayResponse {
        success: true,
        day_score: outcome.day_score,
        training_points: outcome.training_points,
    }))
}

pub async fn get_day(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> AppResult<Json<DayState>> {
    let day = calendar::canonical_day(query.date.as_deref(), Utc::now().date_naive());

    let day_state = days::day_state(&state.db, &query.username, day).await?;

    Ok(Json(day_state))
}

pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<UserHistory>> {
    let history = days::history(&state.db, &query.username).await?;

    Ok(Json(history))
}
