use chrono::{DateTime, Utc};

use super::boost_level::BoostLevel;

/// A posted work item. Only the boost fields are owned by this service.
#[derive(Debug, Clone, PartialEq)]
pub struct Demand {
    pub id: String,
    pub user_id: String,
    pub boosted: bool,
    pub boost_level: Option<BoostLevel>,
    pub boost_expires_at: Option<DateTime<Utc>>,
    pub boost_purchased_at: Option<DateTime<Utc>>,
    pub boost_payment_id: Option<String>,
}

/// Boost bought by a single approved payment.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostGrant {
    pub payment_id: String,
    pub level: BoostLevel,
    pub purchased_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl BoostGrant {
    pub fn new(payment_id: impl Into<String>, level: BoostLevel, now: DateTime<Utc>) -> Self {
        Self {
            payment_id: payment_id.into(),
            level,
            purchased_at: now,
            expires_at: now + level.duration(),
        }
    }
}

impl Demand {
    /// True when the current boost was produced by `payment_id`.
    pub fn is_boosted_by(&self, payment_id: &str) -> bool {
        self.boost_payment_id.as_deref() == Some(payment_id)
    }

    /// Applies `grant` unless it is already the current boost. Returns whether
    /// anything changed. A grant from a different payment replaces the current
    /// boost.
    pub fn apply_boost(&mut self, grant: &BoostGrant) -> bool {
        if self.is_boosted_by(&grant.payment_id) {
            return false;
        }
        self.boosted = true;
        self.boost_level = Some(grant.level);
        self.boost_purchased_at = Some(grant.purchased_at);
        self.boost_expires_at = Some(grant.expires_at);
        self.boost_payment_id = Some(grant.payment_id.clone());
        true
    }
}
