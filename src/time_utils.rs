// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.

use chrono::{DateTime, Local, NaiveDate, Utc};
use std::sync::Mutex;

/// Source of "now". The watch counter resets on the local calendar day.
pub trait Clock: Send + Sync {
    /// Today's date on the local device clock.
    fn today(&self) -> NaiveDate;

    /// Current instant, used for session expiry checks.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time and local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock whose date is set by hand. Used by tests to cross day boundaries.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Clock positioned at noon UTC of the given date.
    pub fn at_date(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc();
        Self::new(noon)
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        self.now_utc().date_naive()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Format a date as a calendar-day string (`YYYY-MM-DD`).
pub fn calendar_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
