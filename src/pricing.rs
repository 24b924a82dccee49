//! # Pricing
//!
//! Storage pricing derived purely from membership level, spot count and
//! billing period. All arithmetic is exact decimal so a quote can be
//! re-derived byte-for-byte from its three inputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::customer::{CustomerType, MembershipLevel};

/// Billing period for a storage quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    Monthly,
    Quarterly,
    Annually,
}

impl BillingPeriod {
    /// Number of months billed up front.
    pub fn months(self) -> Decimal {
        match self {
            BillingPeriod::Monthly => Decimal::ONE,
            BillingPeriod::Quarterly => Decimal::from(3),
            BillingPeriod::Annually => Decimal::from(12),
        }
    }

    /// Multi-period discount fraction (monthly 0%, quarterly 5%, annual 10%).
    pub fn discount(self) -> Decimal {
        match self {
            BillingPeriod::Monthly => Decimal::ZERO,
            BillingPeriod::Quarterly => Decimal::new(5, 2),
            BillingPeriod::Annually => Decimal::new(10, 2),
        }
    }
}

/// Monthly base price per storage spot for a membership tier. Archived
/// customers are not billed.
pub fn base_price(level: MembershipLevel) -> Decimal {
    match level {
        MembershipLevel::Basic => Decimal::from(75),
        MembershipLevel::Premium => Decimal::from(150),
        MembershipLevel::Vip => Decimal::from(200),
        MembershipLevel::Enterprise => Decimal::from(300),
        MembershipLevel::Archived => Decimal::ZERO,
    }
}

/// Monthly price before any period discount: base price times spot count.
pub fn monthly_price(level: MembershipLevel, spots: i32) -> Decimal {
    base_price(level) * Decimal::from(spots.max(0))
}

/// Quoted payment amount for one billing period.
pub fn quote(level: MembershipLevel, spots: i32, period: BillingPeriod) -> Decimal {
    monthly_price(level, spots) * period.months() * (Decimal::ONE - period.discount())
}

/// Default storage area assigned at intake, a pure function of customer type
/// and membership level.
pub fn default_storage_location(customer_type: CustomerType, level: MembershipLevel) -> String {
    let building = match level {
        MembershipLevel::Vip | MembershipLevel::Enterprise => "Building A - Climate Controlled",
        MembershipLevel::Premium => "Building B - Indoor",
        MembershipLevel::Basic => "Building C - Standard",
        MembershipLevel::Archived => "Overflow Lot",
    };
    let wing = match customer_type {
        CustomerType::Individual => "Member Wing",
        CustomerType::Business => "Business Wing",
        CustomerType::Corporate => "Fleet Wing",
    };
    format!("{building}, {wing}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn monthly_quote_is_base_times_spots() {
        for (level, base) in [
            (MembershipLevel::Basic, 75),
            (MembershipLevel::Premium, 150),
            (MembershipLevel::Vip, 200),
            (MembershipLevel::Enterprise, 300),
        ] {
            for spots in 1..=5 {
                assert_eq!(
                    quote(level, spots, BillingPeriod::Monthly),
                    Decimal::from(base * spots)
                );
            }
        }
    }

    #[test]
    fn quarterly_quote_applies_three_months_and_five_percent() {
        // 150 * 2 * 3 * 0.95
        assert_eq!(
            quote(MembershipLevel::Premium, 2, BillingPeriod::Quarterly),
            dec("855.00")
        );
        // 75 * 1 * 3 * 0.95
        assert_eq!(
            quote(MembershipLevel::Basic, 1, BillingPeriod::Quarterly),
            dec("213.75")
        );
    }

    #[test]
    fn annual_quote_applies_twelve_months_and_ten_percent() {
        // 200 * 1 * 12 * 0.90
        assert_eq!(
            quote(MembershipLevel::Vip, 1, BillingPeriod::Annually),
            dec("2160.00")
        );
        // 300 * 3 * 12 * 0.90
        assert_eq!(
            quote(MembershipLevel::Enterprise, 3, BillingPeriod::Annually),
            dec("9720.00")
        );
    }

    #[test]
    fn quotes_are_deterministic() {
        let first = quote(MembershipLevel::Premium, 4, BillingPeriod::Annually);
        let second = quote(MembershipLevel::Premium, 4, BillingPeriod::Annually);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn archived_members_are_not_billed() {
        assert_eq!(
            quote(MembershipLevel::Archived, 10, BillingPeriod::Annually),
            Decimal::ZERO
        );
    }

    #[test]
    fn storage_location_is_pure_in_type_and_level() {
        let a = default_storage_location(CustomerType::Individual, MembershipLevel::Premium);
        let b = default_storage_location(CustomerType::Individual, MembershipLevel::Premium);
        assert_eq!(a, b);
        assert_ne!(
            a,
            default_storage_location(CustomerType::Corporate, MembershipLevel::Premium)
        );
    }
}
