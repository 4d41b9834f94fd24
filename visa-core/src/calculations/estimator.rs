//! Visa cost estimator.
//!
//! Computes every fee category of a visa application for a household and
//! the grand total in both the base currency and the caller's currency.
//!
//! # Breakdown
//!
//! | Step | Category | Formula |
//! |------|----------|---------|
//! | 1    | Applicants | adults (1 or 2) + children |
//! | 2    | Visa fee | applicants × visa fee |
//! | 3    | Priority fee | applicants × priority fee, if selected |
//! | 4    | Adult health surcharge | adults × adult rate × years |
//! | 5    | Child health surcharge | children × child rate × years |
//! | 6    | Flights | applicants × flight cost per person |
//! | 7    | Rent | monthly rent × months |
//! | 8    | Grand total | steps 2–7 + miscellaneous |
//! | 9    | Local total | grand total × exchange rate |
//!
//! Nothing is rounded: the grand total is the exact sum of its parts and the
//! local total is the exact product with the exchange rate. Arithmetic
//! saturates at [`Decimal::MAX`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use visa_core::{EstimatorInput, Household, estimate};
//!
//! let input = EstimatorInput {
//!     household: Household::Married { children: 0 },
//!     duration_years: 1,
//!     ..EstimatorInput::default()
//! };
//!
//! let output = estimate(&input);
//!
//! assert_eq!(output.total_people, 2);
//! assert_eq!(output.visa_fee_total, dec!(1532));
//! assert_eq!(output.health_surcharge_adult_total, dec!(2070));
//! assert_eq!(output.grand_total_base_currency, dec!(3602));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{EstimatorInput, EstimatorOutput, FeeSchedule};

/// Estimates with the default fee schedule.
///
/// Shorthand for `Estimator::default().estimate(input)`.
pub fn estimate(input: &EstimatorInput) -> EstimatorOutput {
    Estimator::default().estimate(input)
}

/// Calculator for the visa cost breakdown.
///
/// Holds the fee schedule; every call to [`estimate`](Self::estimate) is
/// independent of the previous one.
///
/// ```
/// use rust_decimal_macros::dec;
/// use visa_core::{Estimator, EstimatorInput, FeeSchedule, Household};
///
/// let schedule = FeeSchedule {
///     visa_fee_per_person: dec!(1000),
///     ..FeeSchedule::default()
/// };
/// let estimator = Estimator::new(schedule);
///
/// let output = estimator.estimate(&EstimatorInput {
///     household: Household::Single,
///     ..EstimatorInput::default()
/// });
///
/// assert_eq!(output.visa_fee_total, dec!(1000));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    schedule: FeeSchedule,
}

impl Estimator {
    pub fn new(schedule: FeeSchedule) -> Self {
        Self { schedule }
    }

    /// Computes the full breakdown for `input`.
    ///
    /// Total: any input produces an output. A zero exchange rate still
    /// yields a local total (zero); the caller decides whether to show it.
    pub fn estimate(
        &self,
        input: &EstimatorInput,
    ) -> EstimatorOutput {
        // Step 1: Applicants
        let num_adults = input.household.num_adults();
        let num_children = input.household.num_children();
        let total_people = input.household.total_people();

        // Step 2: Visa fee
        let visa_fee_total = self.visa_fee_total(total_people);

        // Step 3: Priority fee
        let priority_fee_total = self.priority_fee_total(total_people, input.priority_selected);

        // Steps 4 and 5: Health surcharge
        let health_surcharge_adult_total = per_head_per_year(
            num_adults,
            self.schedule.adult_surcharge_per_year,
            input.duration_years,
        );
        let health_surcharge_child_total = per_head_per_year(
            num_children,
            self.schedule.child_surcharge_per_year,
            input.duration_years,
        );

        // Step 6: Flights
        let flight_total = Decimal::from(total_people).saturating_mul(input.flight_cost_per_person);

        // Step 7: Rent
        let rent_total = input
            .rent_cost_per_month
            .saturating_mul(Decimal::from(input.rent_months));

        let misc_total = input.misc_cost;

        // Step 8: Grand total
        let grand_total_base_currency = [
            visa_fee_total,
            priority_fee_total,
            health_surcharge_adult_total,
            health_surcharge_child_total,
            flight_total,
            rent_total,
            misc_total,
        ]
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add);

        // Step 9: Local total
        let grand_total_local_currency =
            grand_total_base_currency.saturating_mul(input.exchange_rate);

        debug!(
            total_people,
            duration_years = input.duration_years,
            priority = input.priority_selected,
            grand_total = %grand_total_base_currency,
            "estimated visa costs"
        );

        EstimatorOutput {
            num_adults,
            total_people,
            visa_fee_total,
            priority_fee_total,
            health_surcharge_adult_total,
            health_surcharge_child_total,
            flight_total,
            rent_total,
            misc_total,
            grand_total_base_currency,
            grand_total_local_currency,
        }
    }

    fn visa_fee_total(
        &self,
        total_people: u32,
    ) -> Decimal {
        Decimal::from(total_people).saturating_mul(self.schedule.visa_fee_per_person)
    }

    fn priority_fee_total(
        &self,
        total_people: u32,
        selected: bool,
    ) -> Decimal {
        if !selected {
            return Decimal::ZERO;
        }
        Decimal::from(total_people).saturating_mul(self.schedule.priority_fee_per_person)
    }
}

/// `heads × rate × years`, the shape of both health surcharge lines.
fn per_head_per_year(
    heads: u32,
    rate: Decimal,
    years: u32,
) -> Decimal {
    Decimal::from(heads)
        .saturating_mul(rate)
        .saturating_mul(Decimal::from(years))
}
