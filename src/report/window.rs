//! The 24 hour reporting window.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

const LABEL_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Midnight-to-midnight window covered by a daily run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReportWindow {
    /// The day before `date`, ending at 00:00 on `date`.
    pub fn ending_on(date: NaiveDate) -> Self {
        let start_date = date.pred_opt().unwrap_or(date);
        Self {
            start: start_date.and_time(NaiveTime::MIN),
            end: date.and_time(NaiveTime::MIN),
        }
    }

    /// Yesterday, in local time.
    pub fn ending_today() -> Self {
        Self::ending_on(Local::now().date_naive())
    }

    pub fn start_label(&self) -> String {
        self.start.format(LABEL_FORMAT).to_string()
    }

    pub fn end_label(&self) -> String {
        self.end.format(LABEL_FORMAT).to_string()
    }
}
