// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily watch-count gate for the free tier.
//!
//! The counter lives on the device only, so the limit is per device and can
//! be cleared by wiping local data. There is no server-side enforcement.

use crate::error::Result;
use crate::models::WatchCounter;
use crate::storage::{self, keys, KeyValueStore};
use crate::time_utils::{calendar_day, Clock};
use std::sync::Arc;

/// Read-modify-write access to today's view count.
#[derive(Clone)]
pub struct WatchLimiter {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl WatchLimiter {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn today(&self) -> String {
        calendar_day(self.clock.today())
    }

    /// Views counted today. Zero when no record exists or it is from another day.
    pub fn today_count(&self) -> Result<u32> {
        let counter: Option<WatchCounter> = storage::get_json(&*self.store, keys::WATCH_DATA)?;
        Ok(counter
            .map(|c| c.effective_count(&self.today()))
            .unwrap_or(0))
    }

    /// Count one more view today and return the new total.
    ///
    /// A stale record from an earlier day is overwritten.
    pub fn increment_today_count(&self) -> Result<u32> {
        let count = self.today_count()? + 1;
        let counter = WatchCounter {
            date: self.today(),
            count,
        };
        storage::set_json(&*self.store, keys::WATCH_DATA, &counter)?;
        tracing::debug!(date = %counter.date, count, "Watch count incremented");
        Ok(count)
    }

    pub fn has_reached_limit(&self, limit: u32) -> Result<bool> {
        Ok(self.today_count()? >= limit)
    }
}
