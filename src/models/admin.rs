// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin panel contents. Static sample data; there is no admin backend.

use serde::Serialize;

use crate::models::SubscriptionTier;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminUserRow {
    pub id: &'static str,
    pub username: &'static str,
    pub email: &'static str,
    pub subscription: SubscriptionTier,
    /// Calendar day of the last sign-in
    pub last_login: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdminStats {
    pub total_users: u32,
    pub premium_users: u32,
    pub active_today: u32,
    pub total_views: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminActivity {
    pub message: &'static str,
    pub username: &'static str,
    pub when: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminOverview {
    pub stats: AdminStats,
    pub recent_activity: Vec<AdminActivity>,
    pub users: Vec<AdminUserRow>,
}

pub fn admin_overview() -> AdminOverview {
    AdminOverview {
        stats: AdminStats {
            total_users: 138,
            premium_users: 43,
            active_today: 26,
            total_views: 982,
        },
        recent_activity: vec![
            AdminActivity {
                message: "New user registered",
                username: "maria.silva",
                when: "5 minutes ago",
            },
            AdminActivity {
                message: "Subscription upgraded to Premium",
                username: "joao.santos",
                when: "2 hours ago",
            },
            AdminActivity {
                message: "New movie review",
                username: "pedro.oliveira",
                when: "1 day ago",
            },
        ],
        users: vec![
            AdminUserRow {
                id: "1",
                username: "usuario1",
                email: "usuario1@exemplo.com",
                subscription: SubscriptionTier::Premium,
                last_login: "2023-05-30",
            },
            AdminUserRow {
                id: "2",
                username: "usuario2",
                email: "usuario2@exemplo.com",
                subscription: SubscriptionTier::Free,
                last_login: "2023-05-29",
            },
            AdminUserRow {
                id: "3",
                username: "usuario3",
                email: "usuario3@exemplo.com",
                subscription: SubscriptionTier::Premium,
                last_login: "2023-05-28",
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_rows_are_within_totals() {
        let overview = admin_overview();
        let premium = overview
            .users
            .iter()
            .filter(|u| u.subscription == SubscriptionTier::Premium)
            .count();
        assert_eq!(premium, 2);
        assert!(overview.stats.premium_users <= overview.stats.total_users);
        assert_eq!(overview.recent_activity.len(), 3);
    }
}
