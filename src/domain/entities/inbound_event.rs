use serde::Deserialize;

pub const EVENT_TYPE_PAYMENT: &str = "payment";
pub const EVENT_TYPE_SUBSCRIPTION: &str = "subscription_preapproval";

/// Notification body posted by Mercado Pago. Fields other than `type` and
/// `data.id` (`action`, `live_mode`, `date_created`, ...) are ignored.
///
/// Legacy IPN notifications reach the same URL as `{"topic", "resource"}`
/// with no `type`; `topic` is only kept for logging.
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub topic: Option<String>,
    pub data: Option<EnvelopeData>,
}

const UNTYPED_EVENT: &str = "untyped";

#[derive(Debug, Deserialize)]
pub struct EnvelopeData {
    pub id: Option<ExternalId>,
}

/// Payment ids arrive as strings in current notifications and as numbers in
/// older ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    Text(String),
    Number(u64),
}

impl ExternalId {
    pub fn into_string(self) -> String {
        match self {
            ExternalId::Text(s) => s.trim().to_string(),
            ExternalId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Payment { payment_id: String },
    SubscriptionChange { subscription_id: String },
    Unsupported { event_type: String },
}

impl InboundEvent {
    /// Classify an envelope. Only a recognised type without a usable
    /// `data.id` counts as malformed; anything without a known `type` is
    /// unsupported.
    pub fn from_envelope(envelope: WebhookEnvelope) -> Result<Self, String> {
        let Some(event_type) = envelope.event_type else {
            return Ok(InboundEvent::Unsupported {
                event_type: envelope
                    .topic
                    .map(|topic| format!("{}:{}", UNTYPED_EVENT, topic))
                    .unwrap_or_else(|| UNTYPED_EVENT.to_string()),
            });
        };

        let external_id = || -> Result<String, String> {
            envelope
                .data
                .and_then(|d| d.id)
                .map(ExternalId::into_string)
                .filter(|id| !id.is_empty())
                .ok_or_else(|| format!("{} notification has no data.id", event_type))
        };

        match event_type.as_str() {
            EVENT_TYPE_PAYMENT => Ok(InboundEvent::Payment {
                payment_id: external_id()?,
            }),
            EVENT_TYPE_SUBSCRIPTION => Ok(InboundEvent::SubscriptionChange {
                subscription_id: external_id()?,
            }),
            _ => Ok(InboundEvent::Unsupported {
                event_type: event_type.clone(),
            }),
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            InboundEvent::Payment { .. } => EVENT_TYPE_PAYMENT,
            InboundEvent::SubscriptionChange { .. } => EVENT_TYPE_SUBSCRIPTION,
            InboundEvent::Unsupported { event_type } => event_type,
        }
    }
}
