use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::leaderboard::{TeamStanding, UserStanding, NO_TEAM_COLOR, NO_TEAM_NAME};

pub const TOP_TEAMS: i64 = 5;
pub const TOP_USERS: i64 = 3;

/// Team standings over all-time day scores. Teams with no members or no
/// logged days still rank, at zero.
pub async fn top_teams(pool: &PgPool) -> AppResult<Vec<TeamStanding>> {
    let teams = sqlx::query_as::<_, TeamStanding>(
        r#"
        SELECT t.id, t.name, t.color,
               COALESCE(SUM(dl.day_score), 0)::BIGINT AS score,
               COUNT(DISTINCT u.id) AS member_count
        FROM teams t
        LEFT JOIN users u ON u.team_id = t.id
        LEFT JOIN daily_logs dl ON dl.user_id = u.id
        GROUP BY t.id, t.name, t.color
        ORDER BY score DESC, t.name ASC
        LIMIT $1
        "#,
    )
    .bind(TOP_TEAMS)
    .fetch_all(pool)
    .await?;

    Ok(teams)
}

/// The highest-scoring individuals, with an explicit placeholder team for
/// users not on one.
pub async fn top_users(pool: &PgPool) -> AppResult<Vec<UserStanding>> {
    let users = sqlx::query_as::<_, UserStanding>(
        r#"
        SELECT u.username,
               COALESCE(t.name, $2) AS team_name,
               COALESCE(t.color, $3) AS team_color,
               COALESCE(SUM(dl.day_score), 0)::BIGINT AS total_score
        FROM users u
        LEFT JOIN teams t ON t.id = u.team_id
        LEFT JOIN daily_logs dl ON dl.user_id = u.id
        GROUP BY u.id, u.username, t.name, t.color
        ORDER BY total_score DESC, u.username ASC
        LIMIT $1
        "#,
    )
    .bind(TOP_USERS)
    .bind(NO_TEAM_NAME)
    .bind(NO_TEAM_COLOR)
    .fetch_all(pool)
    .await?;

    Ok(users)
}
