use axum::{extract::State, Json};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::user::{
    UpdateConfigRequest, UpdateConfigResponse, User, DEFAULT_WATER_GOAL_ML,
    DEFAULT_WEEKLY_TARGET_DAYS,
};
use crate::AppState;

/// Upsert a user's goals. Unknown usernames are provisioned on the spot with
/// defaults for whatever the body leaves out, so the config screen works
/// before the first day submission.
pub async fn update_config(
    State(state): State<AppState>,
    Json(body): Json<UpdateConfigRequest>,
) -> AppResult<Json<UpdateConfigResponse>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, water_goal_ml, weekly_target_days)
        VALUES ($1, $2, COALESCE($3, $5), COALESCE($4, $6))
        ON CONFLICT (username) DO UPDATE SET
            water_goal_ml = COALESCE($3, users.water_goal_ml),
            weekly_target_days = COALESCE($4, users.weekly_target_days),
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&body.username)
    .bind(body.water_goal_ml)
    .bind(body.weekly_target_days)
    .bind(DEFAULT_WATER_GOAL_ML)
    .bind(DEFAULT_WEEKLY_TARGET_DAYS)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(UpdateConfigResponse {
        success: true,
        user,
    }))
}
