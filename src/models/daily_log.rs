use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::scoring::score::DayMetrics;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub log_date: NaiveDate,
    pub water_ml: i32,
    pub sleep_hours: f64,
    pub ate_fruits: bool,
    pub ate_veggies: bool,
    pub ate_protein: bool,
    pub calorie_abuse: bool,
    pub day_score: i32,
    pub used_app: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial metrics update. Absent fields leave the stored value untouched;
/// on first write for a day they fall back to zero/false.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MetricsPatch {
    #[validate(range(min = 0, max = 100_000, message = "Water volume must be 0-100000 ml"))]
    pub water_ml: Option<i32>,

    #[validate(range(min = 0.0, max = 24.0, message = "Sleep hours must be 0-24"))]
    pub sleep_hours: Option<f64>,

    pub ate_fruits: Option<bool>,
    pub ate_veggies: Option<bool>,
    pub ate_protein: Option<bool>,
    pub calorie_abuse: Option<bool>,
}

impl MetricsPatch {
    /// Resolve the final field set the day score is computed over: a field
    /// present in the patch wins, otherwise the stored value, otherwise the
    /// zero/false default. Submission order cannot change the outcome for a
    /// given final field set.
    pub fn merged_with(&self, existing: Option<&DailyLog>) -> DayMetrics {
        DayMetrics {
            water_ml: self.water_ml.unwrap_or(existing.map_or(0, |l| l.water_ml)),
            sleep_hours: self
                .sleep_hours
                .unwrap_or(existing.map_or(0.0, |l| l.sleep_hours)),
            ate_fruits: self
                .ate_fruits
                .unwrap_or(existing.map_or(false, |l| l.ate_fruits)),
            ate_veggies: self
                .ate_veggies
                .unwrap_or(existing.map_or(false, |l| l.ate_veggies)),
            ate_protein: self
                .ate_protein
                .unwrap_or(existing.map_or(false, |l| l.ate_protein)),
            calorie_abuse: self
                .calorie_abuse
                .unwrap_or(existing.map_or(false, |l| l.calorie_abuse)),
        }
    }
}

/// One day's aggregate as rendered to clients. Days with no stored row are
/// served as zeroed defaults rather than a 404 so a fresh day renders empty.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogView {
    pub log_date: NaiveDate,
    pub water_ml: i32,
    pub sleep_hours: f64,
    pub ate_fruits: bool,
    pub ate_veggies: bool,
    pub ate_protein: bool,
    pub calorie_abuse: bool,
    pub day_score: i32,
    pub used_app: bool,
}

impl DailyLogView {
    pub fn empty(log_date: NaiveDate) -> Self {
        Self {
            log_date,
            water_ml: 0,
            sleep_hours: 0.0,
            ate_fruits: false,
            ate_veggies: false,
            ate_protein: false,
            calorie_abuse: false,
            day_score: 0,
            used_app: false,
        }
    }
}

impl From<DailyLog> for DailyLogView {
    fn from(log: DailyLog) -> Self {
        Self {
            log_date: log.log_date,
            water_ml: log.water_ml,
            sleep_hours: log.sleep_hours,
            ate_fruits: log.ate_fruits,
            ate_veggies: log.ate_veggies,
            ate_protein: log.ate_protein,
            calorie_abuse: log.calorie_abuse,
            day_score: log.day_score,
            used_app: log.used_app,
        }
    }
}
