// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily watch counter record.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Views consumed on one calendar day under the free tier.
///
/// Stored at key `watchData`. A record whose `date` is not today is stale:
/// its effective count is zero even though it stays on disk until the next
/// increment overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WatchCounter {
    /// Calendar day (`YYYY-MM-DD`)
    pub date: String,
    pub count: u32,
}

impl WatchCounter {
    /// Count that applies on `today`.
    pub fn effective_count(&self, today: &str) -> u32 {
        if self.date == today {
            self.count
        } else {
            0
        }
    }
}
