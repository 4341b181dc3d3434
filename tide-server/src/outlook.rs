//! Weekly fishing and hunting outlook.
//!
//! A fixed placeholder heuristic: fishing alternates Good/Fair day by day
//! and hunting is Average every third day.

use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Days covered by an outlook.
pub const OUTLOOK_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FishingRating {
    Good,
    Fair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HuntingRating {
    Average,
    #[serde(rename = "Below Average")]
    BelowAverage,
}

/// Ratings for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayOutlook {
    pub date: NaiveDate,
    pub fishing: FishingRating,
    pub hunting: HuntingRating,
}

/// Outlook for the week starting at `start`.
pub fn week_outlook(start: NaiveDate) -> Vec<DayOutlook> {
    (0..OUTLOOK_DAYS)
        .filter_map(|i| {
            let date = start.checked_add_days(Days::new(i))?;
            let fishing = if i % 2 == 0 {
                FishingRating::Good
            } else {
                FishingRating::Fair
            };
            let hunting = if i % 3 == 0 {
                HuntingRating::Average
            } else {
                HuntingRating::BelowAverage
            };
            Some(DayOutlook {
                date,
                fishing,
                hunting,
            })
        })
        .collect()
}
