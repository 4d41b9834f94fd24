use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Household;

/// Everything the estimator needs for one recalculation.
///
/// Values are expected to be already defaulted: money amounts are whole,
/// non-negative base-currency units, `rent_months` is at least one and an
/// `exchange_rate` of zero means the rate is not known yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatorInput {
    pub household: Household,

    /// Whole years, already rounded from the requested duration.
    pub duration_years: u32,

    pub priority_selected: bool,

    pub flight_cost_per_person: Decimal,
    pub rent_cost_per_month: Decimal,
    pub rent_months: u32,
    pub misc_cost: Decimal,

    /// Symbol of the caller's display currency (e.g. `$`).
    pub currency_symbol: String,

    /// Local currency units per base currency unit.
    pub exchange_rate: Decimal,
}

impl EstimatorInput {
    pub fn is_married(&self) -> bool {
        self.household.is_married()
    }

    pub fn num_children(&self) -> u32 {
        self.household.num_children()
    }

    /// Whether a local-currency total is worth showing.
    pub fn has_exchange_rate(&self) -> bool {
        self.exchange_rate > Decimal::ZERO
    }
}

impl Default for EstimatorInput {
    fn default() -> Self {
        Self {
            household: Household::Single,
            duration_years: 0,
            priority_selected: false,
            flight_cost_per_person: Decimal::ZERO,
            rent_cost_per_month: Decimal::ZERO,
            rent_months: 1,
            misc_cost: Decimal::ZERO,
            currency_symbol: String::new(),
            exchange_rate: Decimal::ZERO,
        }
    }
}
