/// Status of a processor subscription (Mercado Pago "preapproval").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Pending,
    Authorized,
    Paused,
    Cancelled,
    Unknown(String),
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Authorized => "authorized",
            SubscriptionStatus::Paused => "paused",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Unknown(raw) => raw,
        }
    }

    pub fn from_mercadopago(s: &str) -> Self {
        match s {
            "pending" => SubscriptionStatus::Pending,
            "authorized" => SubscriptionStatus::Authorized,
            "paused" => SubscriptionStatus::Paused,
            "cancelled" => SubscriptionStatus::Cancelled,
            other => SubscriptionStatus::Unknown(other.to_string()),
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
