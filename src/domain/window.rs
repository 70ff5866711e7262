use chrono::NaiveDate;

use crate::error::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive calendar-date range a pull request must have been merged in.
///
/// Bounds are held in their `YYYY-MM-DD` form so membership is a plain string
/// comparison against the date prefix of a GitHub timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeWindow {
    start: String,
    end: String,
}

impl MergeWindow {
    pub fn parse(start: &str, end: &str) -> AppResult<Self> {
        let start_date = parse_date("start", start)?;
        let end_date = parse_date("end", end)?;
        if start_date > end_date {
            return Err(AppError::InvalidInput(format!(
                "start date {start_date} is after end date {end_date}"
            )));
        }
        Ok(Self {
            start: start_date.format(DATE_FORMAT).to_string(),
            end: end_date.format(DATE_FORMAT).to_string(),
        })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    /// `merged_at` is an ISO-8601 timestamp such as `2025-02-19T13:00:00Z`.
    pub fn contains(&self, merged_at: &str) -> bool {
        let Some(date) = merged_at.get(..10) else {
            return false;
        };
        self.start.as_str() <= date && date <= self.end.as_str()
    }
}

fn parse_date(label: &str, value: &str) -> AppResult<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{label} date is required")));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|err| {
        AppError::InvalidInput(format!(
            "{label} date '{trimmed}' is not a YYYY-MM-DD date: {err}"
        ))
    })
}
