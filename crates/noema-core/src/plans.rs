//! Subscription plans and their Stripe price ids.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Starter,
    Pro,
    Enterprise,
}

impl Plan {
    /// Parse a plan name as sent by the pricing page. `professional` is an
    /// alias of `pro`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "starter" => Some(Self::Starter),
            "pro" | "professional" => Some(Self::Pro),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starter => "starter",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }
}

/// Stripe price ids per plan (`STRIPE_PRICE_*`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceTable {
    pub starter: Option<String>,
    pub pro: Option<String>,
    pub enterprise: Option<String>,
}

impl PriceTable {
    pub fn get(&self, plan: Plan) -> Option<&str> {
        let price = match plan {
            Plan::Starter => &self.starter,
            Plan::Pro => &self.pro,
            Plan::Enterprise => &self.enterprise,
        };
        price.as_deref().filter(|p| !p.is_empty())
    }

    /// Price id for a raw plan name. `None` for unknown plans and for plans
    /// without a configured price.
    pub fn price_for(&self, name: &str) -> Option<&str> {
        Plan::parse(name).and_then(|p| self.get(p))
    }
}
