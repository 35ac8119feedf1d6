//! Checkout context carried through the processor in `external_reference`.
//!
//! The string is produced by the app at checkout time and comes back verbatim
//! on every payment or subscription fetch. It is the only link between a
//! processor transaction and our users and demands.

use serde::Deserialize;

pub const PURPOSE_BOOST: &str = "boost";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPaymentReference {
    user_id: Option<String>,
    demand_id: Option<String>,
    boost_level: Option<String>,
    #[serde(rename = "type")]
    purpose: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubscriptionReference {
    user_id: Option<String>,
    plan_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentPurpose {
    /// `boost_level` is kept raw; an unknown level is a distinct failure from a
    /// malformed reference.
    Boost {
        demand_id: String,
        boost_level: String,
    },
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReference {
    pub user_id: String,
    pub purpose: PaymentPurpose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionReference {
    pub user_id: String,
    /// Raw plan type, validated by the subscription transition.
    pub plan_type: String,
}

impl PaymentReference {
    pub fn decode(raw: Option<&str>) -> Result<Self, String> {
        let raw = raw.ok_or("external_reference is missing")?;
        let parsed: RawPaymentReference = serde_json::from_str(raw)
            .map_err(|e| format!("external_reference is not valid JSON: {}", e))?;

        let user_id = required(parsed.user_id, "userId")?;
        let purpose = required(parsed.purpose, "type")?;

        let purpose = if purpose == PURPOSE_BOOST {
            PaymentPurpose::Boost {
                demand_id: required(parsed.demand_id, "demandId")?,
                boost_level: required(parsed.boost_level, "boostLevel")?,
            }
        } else {
            PaymentPurpose::Other(purpose)
        };

        Ok(Self { user_id, purpose })
    }
}

impl SubscriptionReference {
    pub fn decode(raw: Option<&str>) -> Result<Self, String> {
        let raw = raw.ok_or("external_reference is missing")?;
        let parsed: RawSubscriptionReference = serde_json::from_str(raw)
            .map_err(|e| format!("external_reference is not valid JSON: {}", e))?;

        Ok(Self {
            user_id: required(parsed.user_id, "userId")?,
            plan_type: required(parsed.plan_type, "planType")?,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(format!("external_reference is missing {}", field)),
    }
}
