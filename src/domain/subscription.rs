//! Subscription records: tiers and their pricing options.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::codec::enums::wire_enum;
use crate::codec::{JsonCodec, field};
use crate::domain::patch::record_patch;

wire_enum! {
    pub enum BillingPeriod {
        #[default]
        Monthly => "monthly",
        Yearly => "yearly",
    }
}

/// One billing option of a tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TierPricing {
    pub period: BillingPeriod,
    pub amount: Decimal,
    /// ISO 4217 code, e.g. "USD".
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_days: Option<u32>,
}

impl TierPricing {
    pub fn new(period: BillingPeriod, amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            period,
            amount,
            currency: currency.into(),
            trial_days: None,
        }
    }
}

impl JsonCodec for TierPricing {
    fn decode_at(value: &Value, path: &str) -> Result<Self, crate::domain::DecodeError> {
        let obj = field::as_object(value, path)?;
        Ok(Self {
            period: field::req_enum(obj, path, "period")?,
            amount: field::req_decimal(obj, path, "amount")?,
            currency: field::req_str(obj, path, "currency")?,
            trial_days: field::opt_u32(obj, path, "trial_days")?,
        })
    }
}

record_patch! {
    /// Field overrides for [`TierPricing::copy_with`].
    TierPricing => TierPricingPatch {
        required {
            period: BillingPeriod,
            amount: Decimal,
            currency: String,
        }
        optional {
            trial_days: u32,
        }
    }
}

/// A purchasable subscription tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SubscriptionTier {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pricing: Vec<TierPricing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_sessions_per_month: Option<u32>,
    pub includes_group_sessions: bool,
    pub includes_content_library: bool,
    pub is_most_popular: bool,
    pub sort_order: u32,
}

impl SubscriptionTier {
    pub fn new(id: impl Into<String>, name: impl Into<String>, pricing: Vec<TierPricing>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            features: Vec::new(),
            pricing,
            max_sessions_per_month: None,
            includes_group_sessions: false,
            includes_content_library: false,
            is_most_popular: false,
            sort_order: 0,
        }
    }
}

impl JsonCodec for SubscriptionTier {
    fn decode_at(value: &Value, path: &str) -> Result<Self, crate::domain::DecodeError> {
        let obj = field::as_object(value, path)?;
        Ok(Self {
            id: field::req_str(obj, path, "id")?,
            name: field::req_str(obj, path, "name")?,
            description: field::opt_str(obj, path, "description")?,
            features: field::string_list(obj, path, "features")?,
            pricing: field::list_of(obj, path, "pricing")?,
            max_sessions_per_month: field::opt_u32(obj, path, "max_sessions_per_month")?,
            includes_group_sessions: field::bool_or_false(obj, path, "includes_group_sessions")?,
            includes_content_library: field::bool_or_false(obj, path, "includes_content_library")?,
            is_most_popular: field::bool_or_false(obj, path, "is_most_popular")?,
            sort_order: field::u32_or_zero(obj, path, "sort_order")?,
        })
    }
}

record_patch! {
    /// Field overrides for [`SubscriptionTier::copy_with`].
    SubscriptionTier => SubscriptionTierPatch {
        required {
            id: String,
            name: String,
            features: Vec<String>,
            pricing: Vec<TierPricing>,
            includes_group_sessions: bool,
            includes_content_library: bool,
            is_most_popular: bool,
            sort_order: u32,
        }
        optional {
            description: String,
            max_sessions_per_month: u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn tier() -> SubscriptionTier {
        SubscriptionTier::new(
            "plus",
            "Plus",
            vec![
                TierPricing::new(BillingPeriod::Monthly, dec("14.99"), "USD"),
                TierPricing::new(BillingPeriod::Yearly, dec("149.99"), "USD")
                    .copy_with(TierPricingPatch::new().trial_days(14)),
            ],
        )
        .copy_with(
            SubscriptionTierPatch::new()
                .features(vec!["unlimited chat".to_string(), "2 video sessions".to_string()])
                .max_sessions_per_month(2)
                .includes_content_library(true)
                .sort_order(1),
        )
    }

    #[test]
    fn tier_round_trip() {
        let original = tier();
        let tree = original.encode();
        assert_eq!(tree["pricing"][1]["period"], json!("yearly"));
        assert_eq!(SubscriptionTier::decode(&tree).unwrap(), original);
    }

    #[test]
    fn bad_pricing_entry_reports_its_index() {
        let mut tree = tier().encode();
        tree["pricing"][1]["amount"] = json!(true);
        let err = SubscriptionTier::decode(&tree).unwrap_err();
        assert_eq!(err.path(), Some("$.pricing[1].amount"));
    }

    #[test]
    fn feature_list_defaults_to_empty() {
        let decoded = SubscriptionTier::decode(&json!({
            "id": "free",
            "name": "Free",
        }))
        .unwrap();
        assert!(decoded.features.is_empty());
        assert!(decoded.pricing.is_empty());
        assert!(!decoded.includes_content_library);
    }
}
