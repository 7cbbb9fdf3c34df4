use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovenaProgress {
    pub novena_id: String,
    pub started_on: NaiveDate,
    pub finished_at: Option<DateTime<Utc>>,
}

impl NovenaProgress {
    pub fn is_active(&self) -> bool {
        self.finished_at.is_none()
    }

    /// 1-based day of the novena on `date`, capped at `length_days`.
    /// `None` before the start date.
    pub fn day_on(&self, date: NaiveDate, length_days: u32) -> Option<u32> {
        let offset = (date - self.started_on).num_days();
        if offset < 0 {
            return None;
        }
        let day = u32::try_from(offset + 1).unwrap_or(u32::MAX);
        Some(day.min(length_days))
    }

    pub fn is_complete_on(&self, date: NaiveDate, length_days: u32) -> bool {
        (date - self.started_on).num_days() >= i64::from(length_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(started_on: NaiveDate) -> NovenaProgress {
        NovenaProgress {
            novena_id: "st_jude".into(),
            started_on,
            finished_at: None,
        }
    }

    #[test]
    fn day_counts_from_one_and_caps() {
        let start = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        let p = progress(start);

        assert_eq!(p.day_on(start, 9), Some(1));
        assert_eq!(p.day_on(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(), 9), Some(4));
        assert_eq!(p.day_on(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(), 9), Some(9));
        assert_eq!(p.day_on(NaiveDate::from_ymd_opt(2024, 12, 29).unwrap(), 9), None);
    }

    #[test]
    fn completes_after_the_last_day() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let p = progress(start);

        assert!(!p.is_complete_on(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(), 9));
        assert!(p.is_complete_on(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(), 9));
    }
}
