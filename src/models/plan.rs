// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subscription plans shown on the subscription page.

use serde::Serialize;

use crate::models::SubscriptionTier;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub tier: SubscriptionTier,
    pub name: &'static str,
    /// Monthly price in cents (BRL)
    pub price_cents: u32,
    pub features: &'static [&'static str],
    /// Views per day; `None` is unlimited
    pub daily_limit: Option<u32>,
}

impl Plan {
    pub fn price_label(&self) -> String {
        if self.price_cents == 0 {
            return "Free".to_string();
        }
        format!("R$ {},{:02}/month", self.price_cents / 100, self.price_cents % 100)
    }
}

/// The two plans on offer. The free plan's limit follows configuration.
pub fn plans(free_daily_limit: u32) -> [Plan; 2] {
    [
        Plan {
            tier: SubscriptionTier::Free,
            name: "Free Plan",
            price_cents: 0,
            features: &["Full catalog browsing", "Favorites list", "Standard quality"],
            daily_limit: Some(free_daily_limit),
        },
        Plan {
            tier: SubscriptionTier::Premium,
            name: "Premium Plan",
            price_cents: 2990,
            features: &[
                "Unlimited access to every movie",
                "No daily limit",
                "HD quality",
                "No ads",
            ],
            daily_limit: None,
        },
    ]
}
