//! Day scoring rules.
//!
//! Everything here is pure: same inputs, same score, no clock and no storage.
//! The ledger recomputes a day's score from the final merged field set on
//! every submission, so these functions being deterministic is what makes
//! resubmission idempotent.

/// Points paid out for the Nth distinct training day of the week, 1-based.
/// Front-loaded on purpose: the first session of the week is worth the most,
/// with a small bump back up for a full seventh day.
pub const TRAINING_GAINS: [i32; 7] = [25, 20, 13, 9, 7, 6, 10];

pub const WATER_GOAL_POINTS: i32 = 15;
pub const FOOD_FLAG_POINTS: i32 = 5;
pub const CALORIE_ABUSE_PENALTY: i32 = 10;

pub const SLEEP_SHORT_PENALTY: i32 = -15;
pub const SLEEP_LOW_POINTS: i32 = 5;
pub const SLEEP_MID_POINTS: i32 = 9;
pub const SLEEP_FULL_POINTS: i32 = 15;

/// The habit fields a day score is computed over, after partial-update
/// merging. Zero/false means "not logged".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayMetrics {
    pub water_ml: i32,
    pub sleep_hours: f64,
    pub ate_fruits: bool,
    pub ate_veggies: bool,
    pub ate_protein: bool,
    pub calorie_abuse: bool,
}

/// Training points for the session that makes `nth_distinct_day` distinct
/// training days this week. Positions past the table length pay the last
/// entry.
pub fn training_points(nth_distinct_day: usize) -> i32 {
    let idx = nth_distinct_day
        .saturating_sub(1)
        .min(TRAINING_GAINS.len() - 1);
    TRAINING_GAINS[idx]
}

/// Sleep band points. Hours of zero mean sleep was not logged and score
/// nothing; the only penalty band is at the short-sleep end.
fn sleep_points(hours: f64) -> i32 {
    if hours <= 0.0 {
        0
    } else if hours < 5.0 {
        SLEEP_SHORT_PENALTY
    } else if hours < 7.0 {
        SLEEP_LOW_POINTS
    } else if hours < 8.0 {
        SLEEP_MID_POINTS
    } else {
        SLEEP_FULL_POINTS
    }
}

/// Combine training points with the habit rules into the day's score.
/// The result is not clamped: a bad day can go negative, and display layers
/// decide whether to floor.
pub fn day_score(training_points: i32, metrics: &DayMetrics, water_goal_ml: i32) -> i32 {
    let mut points = 0;

    if metrics.water_ml >= water_goal_ml {
        points += WATER_GOAL_POINTS;
    }

    points += sleep_points(metrics.sleep_hours);

    if metrics.ate_fruits {
        points += FOOD_FLAG_POINTS;
    }
    if metrics.ate_veggies {
        points += FOOD_FLAG_POINTS;
    }
    if metrics.ate_protein {
        points += FOOD_FLAG_POINTS;
    }
    if metrics.calorie_abuse {
        points -= CALORIE_ABUSE_PENALTY;
    }

    training_points + points
}
