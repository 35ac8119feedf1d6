use chrono::Duration;

/// Visibility tier bought for a demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "boost_level", rename_all = "snake_case")]
pub enum BoostLevel {
    Basic,
    Featured,
    Premium,
}

impl BoostLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoostLevel::Basic => "basic",
            BoostLevel::Featured => "featured",
            BoostLevel::Premium => "premium",
        }
    }

    /// Number of days a boost of this level stays active.
    pub fn duration_days(&self) -> i64 {
        match self {
            BoostLevel::Basic => 3,
            BoostLevel::Featured => 7,
            BoostLevel::Premium => 15,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::days(self.duration_days())
    }
}

impl std::fmt::Display for BoostLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BoostLevel {
    type Err = String;

    /// Older checkout builds still send the pt-BR level names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" | "basico" => Ok(BoostLevel::Basic),
            "featured" | "destaque" => Ok(BoostLevel::Featured),
            "premium" => Ok(BoostLevel::Premium),
            _ => Err(format!("Invalid boost level: {}", s)),
        }
    }
}
