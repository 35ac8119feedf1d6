/// Paid plans sold through processor subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanType {
    Pro,
    Premium,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Pro => "pro",
            PlanType::Premium => "premium",
        }
    }

    /// Label shown to users in notifications.
    pub fn display_name(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl std::fmt::Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PlanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pro" => Ok(PlanType::Pro),
            "premium" => Ok(PlanType::Premium),
            _ => Err(format!("Invalid plan type: {}", s)),
        }
    }
}

/// Plan currently held by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserPlan {
    #[default]
    Free,
    Paid(PlanType),
}

impl UserPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserPlan::Free => "free",
            UserPlan::Paid(plan_type) => plan_type.as_str(),
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, UserPlan::Free)
    }
}

impl std::fmt::Display for UserPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("free") {
            return Ok(UserPlan::Free);
        }
        s.parse::<PlanType>().map(UserPlan::Paid)
    }
}
