//! Module gating against a user's subscription records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Plan tiers in ascending order of access.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Free,
    Basic,
    Premium,
    Pro,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Cancelled,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub tier: Tier,
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub trial_ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current_period_end: Option<DateTime<Utc>>,
}

impl Subscription {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            SubscriptionStatus::Active => self.current_period_end.is_none_or(|end| end > now),
            SubscriptionStatus::Trialing => self.trial_ends_at.is_none_or(|end| end > now),
            SubscriptionStatus::PastDue
            | SubscriptionStatus::Cancelled
            | SubscriptionStatus::Expired => false,
        }
    }

    fn trial_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Trialing
            && self.trial_ends_at.is_some_and(|end| end <= now)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DenialReason {
    NoSubscription,
    TrialExpired,
    InsufficientTier { current: Tier },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "access", rename_all = "snake_case")]
pub enum AccessDecision {
    Granted { tier: Tier },
    Denied(DenialReason),
}

impl AccessDecision {
    pub fn is_granted(self) -> bool {
        matches!(self, AccessDecision::Granted { .. })
    }
}

pub fn check_access(
    subscriptions: &[Subscription],
    required: Tier,
    now: DateTime<Utc>,
) -> AccessDecision {
    let best_live = subscriptions
        .iter()
        .filter(|sub| sub.is_live(now))
        .map(|sub| sub.tier)
        .max();

    if required == Tier::Free {
        return AccessDecision::Granted {
            tier: best_live.unwrap_or(Tier::Free),
        };
    }

    match best_live {
        Some(tier) if tier >= required => AccessDecision::Granted { tier },
        Some(current) => AccessDecision::Denied(DenialReason::InsufficientTier { current }),
        None if subscriptions.iter().any(|sub| sub.trial_lapsed(now)) => {
            AccessDecision::Denied(DenialReason::TrialExpired)
        }
        None => AccessDecision::Denied(DenialReason::NoSubscription),
    }
}
