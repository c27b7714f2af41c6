//! System price, principal and risk band derivation

use greenquote_common::RiskBand;
use rust_decimal::Decimal;

/// Minimum monthly consumption for band A
pub const BAND_A_MIN_CONSUMPTION_KWH: Decimal = Decimal::from_parts(400, 0, 0, false, 0);

/// Maximum system size for band A
pub const BAND_A_MAX_SYSTEM_KW: Decimal = Decimal::from_parts(6, 0, 0, false, 0);

/// Minimum monthly consumption for band B
pub const BAND_B_MIN_CONSUMPTION_KWH: Decimal = Decimal::from_parts(250, 0, 0, false, 0);

/// Unrounded derivation result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Derivation {
    pub system_price: Decimal,
    /// Never negative
    pub principal: Decimal,
    pub risk_band: RiskBand,
}

/// Derives price, principal and risk band from system specs.
///
/// Inputs are expected to be validated (non-negative) by the caller.
#[derive(Debug, Clone)]
pub struct PricingDeriver {
    unit_price_per_kw: Decimal,
}

impl PricingDeriver {
    pub fn new(unit_price_per_kw: Decimal) -> Self {
        Self { unit_price_per_kw }
    }

    pub fn unit_price_per_kw(&self) -> Decimal {
        self.unit_price_per_kw
    }

    /// Saturates at `Decimal::MAX` rather than overflowing.
    pub fn system_price_for(&self, system_size_kw: Decimal) -> Decimal {
        system_size_kw.saturating_mul(self.unit_price_per_kw)
    }

    pub fn derive(
        &self,
        system_size_kw: Decimal,
        monthly_consumption_kwh: Decimal,
        down_payment: Decimal,
    ) -> Derivation {
        let system_price = self.system_price_for(system_size_kw);
        let principal = (system_price - down_payment).max(Decimal::ZERO);

        Derivation {
            system_price,
            principal,
            risk_band: classify_risk(monthly_consumption_kwh, system_size_kw),
        }
    }
}

/// Classify credit risk; the first matching rule wins.
pub fn classify_risk(monthly_consumption_kwh: Decimal, system_size_kw: Decimal) -> RiskBand {
    if monthly_consumption_kwh >= BAND_A_MIN_CONSUMPTION_KWH && system_size_kw <= BAND_A_MAX_SYSTEM_KW {
        RiskBand::A
    } else if monthly_consumption_kwh >= BAND_B_MIN_CONSUMPTION_KWH {
        RiskBand::B
    } else {
        RiskBand::C
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_UNIT_PRICE_PER_KW;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn deriver() -> PricingDeriver {
        PricingDeriver::new(DEFAULT_UNIT_PRICE_PER_KW)
    }

    #[test]
    fn test_system_price() {
        assert_eq!(deriver().system_price_for(dec!(5)), dec!(6000));
        assert_eq!(deriver().system_price_for(dec!(0)), dec!(0));
        assert_eq!(deriver().system_price_for(dec!(7.35)), dec!(8820));
    }

    #[test]
    fn test_oversized_price_saturates() {
        let huge = PricingDeriver::new(Decimal::MAX);
        assert_eq!(huge.system_price_for(dec!(2)), Decimal::MAX);

        let d = huge.derive(dec!(1000000000000), dec!(500), dec!(1000));
        assert_eq!(d.system_price, Decimal::MAX);
        assert_eq!(d.principal, Decimal::MAX - dec!(1000));
    }

    #[test]
    fn test_principal_subtracts_down_payment() {
        let d = deriver().derive(dec!(5), dec!(400), dec!(1000));
        assert_eq!(d.system_price, dec!(6000));
        assert_eq!(d.principal, dec!(5000));
        assert_eq!(d.risk_band, RiskBand::A);
    }

    #[test]
    fn test_oversized_down_payment_clamps_to_zero() {
        let d = deriver().derive(dec!(2), dec!(100), dec!(50000));
        assert_eq!(d.principal, Decimal::ZERO);
    }

    #[test]
    fn test_risk_band_boundaries() {
        assert_eq!(classify_risk(dec!(400), dec!(6)), RiskBand::A);
        assert_eq!(classify_risk(dec!(399), dec!(6)), RiskBand::B);
        assert_eq!(classify_risk(dec!(249), dec!(6.5)), RiskBand::C);
        assert_eq!(classify_risk(dec!(250), dec!(100)), RiskBand::B);
        assert_eq!(classify_risk(dec!(400), dec!(6.01)), RiskBand::B);
        assert_eq!(classify_risk(dec!(0), dec!(0)), RiskBand::C);
    }

    #[test]
    fn test_banding_uses_unrounded_consumption() {
        assert_eq!(classify_risk(dec!(399.6), dec!(5)), RiskBand::B);
        assert_eq!(classify_risk(dec!(249.5), dec!(5)), RiskBand::C);
    }

    fn amount() -> impl Strategy<Value = Decimal> {
        (0u64..10_000_000, 0u32..3).prop_map(|(units, scale)| Decimal::new(units as i64, scale))
    }

    proptest! {
        #[test]
        fn prop_price_is_size_times_unit_price(size in amount()) {
            prop_assert_eq!(deriver().system_price_for(size), size * dec!(1200));
        }

        #[test]
        fn prop_principal_is_never_negative(size in amount(), down in amount(), usage in amount()) {
            let d = deriver().derive(size, usage, down);
            prop_assert!(d.principal >= Decimal::ZERO);
            if down >= d.system_price {
                prop_assert_eq!(d.principal, Decimal::ZERO);
            } else {
                prop_assert_eq!(d.principal, d.system_price - down);
            }
        }

        #[test]
        fn prop_derive_is_deterministic(size in amount(), down in amount(), usage in amount()) {
            prop_assert_eq!(deriver().derive(size, usage, down), deriver().derive(size, usage, down));
        }
    }
}
