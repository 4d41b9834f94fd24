use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fee breakdown produced by the estimator.
///
/// All amounts except [`grand_total_local_currency`](Self::grand_total_local_currency)
/// are in the base currency. Nothing is rounded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatorOutput {
    pub num_adults: u32,
    pub total_people: u32,

    pub visa_fee_total: Decimal,
    pub priority_fee_total: Decimal,
    pub health_surcharge_adult_total: Decimal,
    pub health_surcharge_child_total: Decimal,
    pub flight_total: Decimal,
    pub rent_total: Decimal,
    pub misc_total: Decimal,

    pub grand_total_base_currency: Decimal,

    /// Only meaningful when the input exchange rate is positive.
    pub grand_total_local_currency: Decimal,
}

impl EstimatorOutput {
    /// The seven components that make up the base-currency grand total.
    pub fn components(&self) -> [Decimal; 7] {
        [
            self.visa_fee_total,
            self.priority_fee_total,
            self.health_surcharge_adult_total,
            self.health_surcharge_child_total,
            self.flight_total,
            self.rent_total,
            self.misc_total,
        ]
    }
}
