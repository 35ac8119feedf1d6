//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use crate::{
    application::ports::payment_processor::{PaymentRecord, SubscriptionRecord},
    domain::entities::{
        demand::Demand, payment_status::PaymentStatus, plan::UserPlan,
        subscription_status::SubscriptionStatus, user::User,
    },
};

/// Create an unboosted demand owned by `U1`.
pub fn create_test_demand(overrides: impl FnOnce(&mut Demand)) -> Demand {
    let mut demand = Demand {
        id: "D1".to_string(),
        user_id: "U1".to_string(),
        boosted: false,
        boost_level: None,
        boost_expires_at: None,
        boost_purchased_at: None,
        boost_payment_id: None,
    };
    overrides(&mut demand);
    demand
}

/// Create a free-plan user with a push token.
pub fn create_test_user(overrides: impl FnOnce(&mut User)) -> User {
    let mut user = User {
        id: "U1".to_string(),
        plan: UserPlan::Free,
        proposals_sent_this_month: 3,
        plan_reset_date: None,
        subscription_id: None,
        subscription_expires_at: None,
        push_token: Some("device-token-U1".to_string()),
    };
    overrides(&mut user);
    user
}

pub fn create_test_payment(
    id: &str,
    status: PaymentStatus,
    external_reference: Option<&str>,
) -> PaymentRecord {
    PaymentRecord {
        id: id.to_string(),
        status,
        external_reference: external_reference.map(str::to_string),
    }
}

pub fn create_test_subscription(
    id: &str,
    status: SubscriptionStatus,
    external_reference: Option<&str>,
) -> SubscriptionRecord {
    SubscriptionRecord {
        id: id.to_string(),
        status,
        external_reference: external_reference.map(str::to_string),
    }
}
