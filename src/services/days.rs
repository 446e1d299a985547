use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::daily_log::{DailyLog, DailyLogView, MetricsPatch};
use crate::models::user::{User, DEFAULT_WATER_GOAL_ML, DEFAULT_WEEKLY_TARGET_DAYS};
use crate::models::workout_log::{SessionInput, WorkoutLog};
use crate::scoring::{calendar, score};

/// How many daily rows a history read returns.
pub const HISTORY_DAYS: i64 = 30;

#[derive(Debug)]
pub struct DaySubmission {
    pub username: String,
    pub day: NaiveDate,
    pub metrics: Option<MetricsPatch>,
    pub session: Option<SessionInput>,
}

#[derive(Debug)]
pub struct DayOutcome {
    pub day_score: i32,
    pub training_points: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayState {
    pub daily_log: DailyLogView,
    pub workout_logs: Vec<WorkoutLog>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserHistory {
    pub history: Vec<DailyLog>,
    pub total_score: i64,
}

/// Record a day submission: score the session (if any), merge the metrics
/// patch over the stored row, and upsert the daily aggregate with the score
/// recomputed over the final merged field set.
///
/// Everything runs in one transaction. The provisioning upsert updates the
/// user row even when the user exists, which takes a row lock: concurrent
/// submissions for the same user serialize on it, so the week count, the
/// session replace, and the daily upsert cannot interleave.
pub async fn submit_day(pool: &PgPool, submission: DaySubmission) -> AppResult<DayOutcome> {
    let mut tx = pool.begin().await?;

    let user = provision_user(&mut tx, &submission.username).await?;

    let training_points = match &submission.session {
        Some(session) => replace_session(&mut tx, &user, submission.day, session).await?,
        // Metrics-only update: keep whatever the day already earned.
        None => session_points_for_day(&mut tx, user.id, submission.day).await?,
    };

    let existing = sqlx::query_as::<_, DailyLog>(
        "SELECT * FROM daily_logs WHERE user_id = $1 AND log_date = $2",
    )
    .bind(user.id)
    .bind(submission.day)
    .fetch_optional(&mut *tx)
    .await?;

    let patch = submission.metrics.unwrap_or_default();
    let merged = patch.merged_with(existing.as_ref());
    let day_score = score::day_score(training_points, &merged, user.water_goal_ml);

    upsert_daily_log(&mut tx, user.id, submission.day, &patch, day_score).await?;

    tx.commit().await?;

    tracing::debug!(
        username = %user.username,
        day = %submission.day,
        day_score,
        training_points,
        "day submission committed"
    );

    Ok(DayOutcome {
        day_score,
        training_points,
    })
}

/// Remove a logged session and walk its points back out of the day's score.
/// Later days keep the ordinals they were paid at: deletion reverses exactly
/// `points_earned`, nothing else.
pub async fn delete_session(pool: &PgPool, session_id: Uuid) -> AppResult<i32> {
    let mut tx = pool.begin().await?;

    // The owning user never changes for a given session id, so this unlocked
    // read only routes us to the right lock. The row itself is re-checked
    // under the lock below.
    let user_id: Uuid = sqlx::query_scalar("SELECT user_id FROM workout_logs WHERE id = $1")
        .bind(session_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound("Session not found".into()))?;

    // Same per-user serialization point submit_day uses. Users are never
    // deleted in normal flow, so a missing row here means the session is
    // orphaned mid-flight.
    sqlx::query_scalar::<_, i32>("SELECT 1 FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "session {} references missing user {}",
                session_id,
                user_id
            ))
        })?;

    // Delete under the lock and read back what actually went. A caller that
    // lost the lock race to a concurrent delete, or to a resubmission that
    // replaced the row under a fresh id, finds nothing here and must leave
    // the day's score alone.
    let removed: Option<(NaiveDate, i32)> = sqlx::query_as(
        "DELETE FROM workout_logs WHERE id = $1 RETURNING log_date, points_earned",
    )
    .bind(session_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some((log_date, points_earned)) = removed else {
        return Err(AppError::NotFound("Session not found".into()));
    };

    let day_score: Option<i32> = sqlx::query_scalar(
        r#"
        UPDATE daily_logs
        SET day_score = day_score - $3, updated_at = NOW()
        WHERE user_id = $1 AND log_date = $2
        RETURNING day_score
        "#,
    )
    .bind(user_id)
    .bind(log_date)
    .bind(points_earned)
    .fetch_optional(&mut *tx)
    .await?;

    tx.commit().await?;

    match day_score {
        Some(score) => Ok(score),
        None => {
            // Submissions always create the aggregate row in the same
            // transaction as the session, so this means external tampering.
            tracing::warn!(
                session_id = %session_id,
                user_id = %user_id,
                "deleted a session that had no daily aggregate row"
            );
            Ok(0)
        }
    }
}

/// One day's stored state. Unknown users and blank days come back zeroed,
/// never as an error, so clients can render them as a fresh day.
pub async fn day_state(pool: &PgPool, username: &str, day: NaiveDate) -> AppResult<DayState> {
    let user_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    let Some(user_id) = user_id else {
        return Ok(DayState {
            daily_log: DailyLogView::empty(day),
            workout_logs: Vec::new(),
        });
    };

    let daily_log = sqlx::query_as::<_, DailyLog>(
        "SELECT * FROM daily_logs WHERE user_id = $1 AND log_date = $2",
    )
    .bind(user_id)
    .bind(day)
    .fetch_optional(pool)
    .await?;

    let workout_logs = sqlx::query_as::<_, WorkoutLog>(
        "SELECT * FROM workout_logs WHERE user_id = $1 AND log_date = $2 ORDER BY created_at ASC",
    )
    .bind(user_id)
    .bind(day)
    .fetch_all(pool)
    .await?;

    Ok(DayState {
        daily_log: daily_log
            .map(Into::into)
            .unwrap_or_else(|| DailyLogView::empty(day)),
        workout_logs,
    })
}

/// The most recent daily rows plus the all-time score sum.
pub async fn history(pool: &PgPool, username: &str) -> AppResult<UserHistory> {
    let user_id: Uuid = sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    let history = sqlx::query_as::<_, DailyLog>(
        "SELECT * FROM daily_logs WHERE user_id = $1 ORDER BY log_date DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(HISTORY_DAYS)
    .fetch_all(pool)
    .await?;

    let total_score: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(day_score), 0)::BIGINT FROM daily_logs WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(UserHistory {
        history,
        total_score,
    })
}

/// Fetch-or-create the user row. The no-op update on conflict both triggers
/// RETURNING and takes the per-user row lock submit_day relies on.
async fn provision_user(
    tx: &mut Transaction<'_, Postgres>,
    username: &str,
) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, water_goal_ml, weekly_target_days)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (username) DO UPDATE SET username = users.username
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(DEFAULT_WATER_GOAL_ML)
    .bind(DEFAULT_WEEKLY_TARGET_DAYS)
    .fetch_one(&mut **tx)
    .await?;

    Ok(user)
}

/// Score and store the day's session: count the distinct training days this
/// week, pay the gains-table entry for this session's ordinal, and replace
/// the day's row. Runs inside the caller's transaction so the count cannot
/// be torn by a concurrent submission.
async fn replace_session(
    tx: &mut Transaction<'_, Postgres>,
    user: &User,
    day: NaiveDate,
    session: &SessionInput,
) -> AppResult<i32> {
    let (week_start, week_end) = calendar::week_window(day);

    let week_days: Vec<NaiveDate> = sqlx::query_scalar(
        r#"
        SELECT DISTINCT log_date FROM workout_logs
        WHERE user_id = $1 AND log_date >= $2 AND log_date < $3
        "#,
    )
    .bind(user.id)
    .bind(week_start)
    .bind(week_end)
    .fetch_all(&mut **tx)
    .await?;

    // The target day always counts toward its own tally, first submission or
    // replacement alike; the set keeps resubmissions from counting twice.
    let mut distinct_days: HashSet<NaiveDate> = week_days.into_iter().collect();
    distinct_days.insert(day);

    let points = score::training_points(distinct_days.len());

    tracing::debug!(
        username = %user.username,
        %day,
        weekly_count = distinct_days.len(),
        points,
        "resolved weekly training ordinal"
    );

    // Replace rather than insert: at most one session per (user, day).
    sqlx::query("DELETE FROM workout_logs WHERE user_id = $1 AND log_date = $2")
        .bind(user.id)
        .bind(day)
        .execute(&mut **tx)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO workout_logs (id, user_id, log_date, modality, comment, points_earned)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(day)
    .bind(&session.modality)
    .bind(&session.comment)
    .bind(points)
    .execute(&mut **tx)
    .await?;

    Ok(points)
}

/// Training points already earned for a day, zero when none were.
async fn session_points_for_day(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    day: NaiveDate,
) -> AppResult<i32> {
    let points: Option<i32> = sqlx::query_scalar(
        r#"
        SELECT points_earned FROM workout_logs
        WHERE user_id = $1 AND log_date = $2
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(day)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(points.unwrap_or(0))
}

/// Upsert the daily aggregate. Only fields present in the patch overwrite
/// stored values (COALESCE keeps the rest); the score and the used-app
/// marker are always written.
async fn upsert_daily_log(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    day: NaiveDate,
    patch: &MetricsPatch,
    day_score: i32,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO daily_logs (id, user_id, log_date, water_ml, sleep_hours,
                                ate_fruits, ate_veggies, ate_protein, calorie_abuse,
                                day_score, used_app)
        VALUES ($1, $2, $3,
                COALESCE($4, 0), COALESCE($5, 0),
                COALESCE($6, FALSE), COALESCE($7, FALSE),
                COALESCE($8, FALSE), COALESCE($9, FALSE),
                $10, TRUE)
        ON CONFLICT (user_id, log_date) DO UPDATE SET
            water_ml = COALESCE($4, daily_logs.water_ml),
            sleep_hours = COALESCE($5, daily_logs.sleep_hours),
            ate_fruits = COALESCE($6, daily_logs.ate_fruits),
            ate_veggies = COALESCE($7, daily_logs.ate_veggies),
            ate_protein = COALESCE($8, daily_logs.ate_protein),
            calorie_abuse = COALESCE($9, daily_logs.calorie_abuse),
            day_score = $10,
            used_app = TRUE,
            updated_at = NOW()
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(day)
    .bind(patch.water_ml)
    .bind(patch.sleep_hours)
    .bind(patch.ate_fruits)
    .bind(patch.ate_veggies)
    .bind(patch.ate_protein)
    .bind(patch.calorie_abuse)
    .bind(day_score)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    // These exercise the transactional paths against whatever database
    // DATABASE_URL points at (migrations are applied on connect). When the
    // variable is unset they skip silently.
    async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(&url)
            .await
            .ok()?;
        sqlx::migrate!("./migrations").run(&pool).await.ok()?;
        Some(pool)
    }

    fn unique_username(prefix: &str) -> String {
        format!("{prefix}-{}", Uuid::new_v4())
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn session(modality: &str) -> SessionInput {
        SessionInput {
            modality: modality.into(),
            comment: None,
        }
    }

    #[tokio::test]
    async fn test_concurrent_deletes_of_one_session_decrement_once() {
        let Some(pool) = test_pool().await else { return };
        let username = unique_username("race-delete");

        // 25 for the week's first session plus 15 for the water goal.
        let outcome = submit_day(
            &pool,
            DaySubmission {
                username: username.clone(),
                day: day(),
                metrics: Some(MetricsPatch {
                    water_ml: Some(3000),
                    ..Default::default()
                }),
                session: Some(session("running")),
            },
        )
        .await
        .unwrap();
        assert_eq!(outcome.day_score, 40);

        let session_id = day_state(&pool, &username, day())
            .await
            .unwrap()
            .workout_logs[0]
            .id;

        let (a, b) = tokio::join!(
            delete_session(&pool, session_id),
            delete_session(&pool, session_id)
        );

        // Exactly one caller wins; the other gets NotFound and leaves the
        // score alone.
        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        for result in &results {
            match result {
                Ok(score) => assert_eq!(*score, 15),
                Err(e) => assert!(matches!(e, AppError::NotFound(_))),
            }
        }

        let stored = day_state(&pool, &username, day()).await.unwrap();
        assert_eq!(stored.daily_log.day_score, 15);
        assert!(stored.workout_logs.is_empty());
    }

    #[tokio::test]
    async fn test_deleting_a_replaced_session_changes_nothing() {
        let Some(pool) = test_pool().await else { return };
        let username = unique_username("replaced");

        submit_day(
            &pool,
            DaySubmission {
                username: username.clone(),
                day: day(),
                metrics: None,
                session: Some(session("bike")),
            },
        )
        .await
        .unwrap();
        let old_id = day_state(&pool, &username, day())
            .await
            .unwrap()
            .workout_logs[0]
            .id;

        // Resubmitting the day replaces the row under a fresh id.
        submit_day(
            &pool,
            DaySubmission {
                username: username.clone(),
                day: day(),
                metrics: None,
                session: Some(session("row")),
            },
        )
        .await
        .unwrap();
        let state = day_state(&pool, &username, day()).await.unwrap();
        assert_ne!(state.workout_logs[0].id, old_id);
        let score_before = state.daily_log.day_score;

        // The stale id must not decrement the day with its old points.
        let result = delete_session(&pool, old_id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let after = day_state(&pool, &username, day()).await.unwrap();
        assert_eq!(after.daily_log.day_score, score_before);
        assert_eq!(after.workout_logs.len(), 1);
    }
}
