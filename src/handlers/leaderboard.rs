use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::models::leaderboard::LeaderboardResponse;
use crate::services::leaderboard;
use crate::AppState;

pub async fn get_leaderboard(
    State(state): State<AppState>,
) -> AppResult<Json<LeaderboardResponse>> {
    let teams = leaderboard::top_teams(&state.db).await?;
    let mvps = leaderboard::top_users(&state.db).await?;

    Ok(Json(LeaderboardResponse { teams, mvps }))
}
