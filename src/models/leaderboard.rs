use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Display fallbacks for users who have not joined a team yet.
pub const NO_TEAM_NAME: &str = "Unassigned";
pub const NO_TEAM_COLOR: &str = "#94a3b8";

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub score: i64,
    pub member_count: i64,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserStanding {
    pub username: String,
    pub team_name: String,
    pub team_color: String,
    pub total_score: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub teams: Vec<TeamStanding>,
    pub mvps: Vec<UserStanding>,
}
