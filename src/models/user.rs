use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Default weekly hydration goal, in milliliters.
pub const DEFAULT_WATER_GOAL_ML: i32 = 3000;
/// Default number of training days a user aims for per week.
pub const DEFAULT_WEEKLY_TARGET_DAYS: i32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub water_goal_ml: i32,
    pub weekly_target_days: i32,
    pub team_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Guide,
    Member,
}

impl Default for Role {
    fn default() -> Self {
        Self::Member
    }
}

/// POST /api/config — partial update, all fields optional except username.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    #[validate(range(min = 1, max = 20000, message = "Water goal must be 1-20000 ml"))]
    pub water_goal_ml: Option<i32>,

    #[validate(range(min = 1, max = 7, message = "Weekly target must be 1-7 days"))]
    pub weekly_target_days: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigResponse {
    pub success: bool,
    pub user: User,
}
