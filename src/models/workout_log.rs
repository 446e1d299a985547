use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub log_date: NaiveDate,
    pub modality: String,
    pub exercise: String,
    pub performed: i32,
    pub target: Option<i32>,
    pub unit: String,
    pub comment: Option<String>,
    pub points_earned: i32,
    pub created_at: DateTime<Utc>,
}

/// The session payload of a day submission: what was trained, optionally
/// annotated. Points are never accepted from the client; the streak
/// resolver assigns them.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SessionInput {
    #[validate(length(min = 1, max = 100, message = "Modality must be 1-100 characters"))]
    pub modality: String,

    #[validate(length(max = 500, message = "Comment must be under 500 characters"))]
    pub comment: Option<String>,
}
