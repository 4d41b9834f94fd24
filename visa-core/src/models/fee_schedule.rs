use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a fee schedule carries an impossible value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeeScheduleError {
    #[error("visa fee per person must be non-negative, got {0}")]
    InvalidVisaFee(Decimal),

    #[error("priority fee per person must be non-negative, got {0}")]
    InvalidPriorityFee(Decimal),

    #[error("adult health surcharge per year must be non-negative, got {0}")]
    InvalidAdultSurcharge(Decimal),

    #[error("child health surcharge per year must be non-negative, got {0}")]
    InvalidChildSurcharge(Decimal),
}

/// Published fees, denominated in the base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    /// Standard visa application fee, charged per applicant.
    pub visa_fee_per_person: Decimal,

    /// Optional expedited processing, charged per applicant.
    pub priority_fee_per_person: Decimal,

    /// Immigration health surcharge for each adult, per year of stay.
    pub adult_surcharge_per_year: Decimal,

    /// Immigration health surcharge for each child, per year of stay.
    pub child_surcharge_per_year: Decimal,
}

impl FeeSchedule {
    pub const VISA_FEE_PER_PERSON: Decimal = Decimal::from_parts(766, 0, 0, false, 0);
    pub const PRIORITY_FEE_PER_PERSON: Decimal = Decimal::from_parts(500, 0, 0, false, 0);
    pub const ADULT_SURCHARGE_PER_YEAR: Decimal = Decimal::from_parts(1035, 0, 0, false, 0);
    pub const CHILD_SURCHARGE_PER_YEAR: Decimal = Decimal::from_parts(776, 0, 0, false, 0);

    /// Checks that no fee is negative.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use visa_core::{FeeSchedule, FeeScheduleError};
    ///
    /// let schedule = FeeSchedule {
    ///     priority_fee_per_person: dec!(-1),
    ///     ..FeeSchedule::default()
    /// };
    ///
    /// assert_eq!(
    ///     schedule.validate(),
    ///     Err(FeeScheduleError::InvalidPriorityFee(dec!(-1)))
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), FeeScheduleError> {
        if self.visa_fee_per_person < Decimal::ZERO {
            return Err(FeeScheduleError::InvalidVisaFee(self.visa_fee_per_person));
        }
        if self.priority_fee_per_person < Decimal::ZERO {
            return Err(FeeScheduleError::InvalidPriorityFee(
                self.priority_fee_per_person,
            ));
        }
        if self.adult_surcharge_per_year < Decimal::ZERO {
            return Err(FeeScheduleError::InvalidAdultSurcharge(
                self.adult_surcharge_per_year,
            ));
        }
        if self.child_surcharge_per_year < Decimal::ZERO {
            return Err(FeeScheduleError::InvalidChildSurcharge(
                self.child_surcharge_per_year,
            ));
        }
        Ok(())
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            visa_fee_per_person: Self::VISA_FEE_PER_PERSON,
            priority_fee_per_person: Self::PRIORITY_FEE_PER_PERSON,
            adult_surcharge_per_year: Self::ADULT_SURCHARGE_PER_YEAR,
            child_surcharge_per_year: Self::CHILD_SURCHARGE_PER_YEAR,
        }
    }
}
