//! Turns raw form fields into a ready-to-estimate [`EstimatorInput`].
//!
//! Nothing here fails: a value that cannot be read becomes zero (or one
//! month of rent) and a warning is logged naming the field.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::warn;
use visa_core::calculations::common::whole_years;
use visa_core::{EstimatorInput, Household};

static LEADING_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+").expect("valid integer pattern"));

static LEADING_DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d+)?|\.\d+)([eE][+-]?\d+)?").expect("valid decimal pattern")
});

/// Form fields exactly as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFields {
    pub married: bool,
    pub children: String,
    pub duration: String,
    pub priority: bool,
    pub flight: String,
    pub rent: String,
    pub rent_months: String,
    pub misc: String,
    pub currency: String,
    pub rate: String,
}

/// Applies the defaulting rules and builds an [`EstimatorInput`].
#[derive(Debug, Clone)]
pub struct InputCollector {
    default_currency_symbol: String,
}

impl InputCollector {
    /// `default_currency_symbol` is used when the currency field is blank.
    pub fn new(default_currency_symbol: impl Into<String>) -> Self {
        Self {
            default_currency_symbol: default_currency_symbol.into(),
        }
    }

    pub fn collect(
        &self,
        raw: &RawFields,
    ) -> EstimatorInput {
        let requested_children = parse_count("children", &raw.children);

        let currency_symbol = match raw.currency.trim() {
            "" => self.default_currency_symbol.clone(),
            symbol => symbol.to_string(),
        };

        EstimatorInput {
            household: Household::from_request(raw.married, requested_children),
            duration_years: whole_years(parse_real("duration", &raw.duration)),
            priority_selected: raw.priority,
            flight_cost_per_person: parse_whole_amount("flight", &raw.flight),
            rent_cost_per_month: parse_whole_amount("rent", &raw.rent),
            rent_months: parse_rent_months(&raw.rent_months),
            misc_cost: parse_whole_amount("misc", &raw.misc),
            currency_symbol,
            exchange_rate: parse_real("rate", &raw.rate),
        }
    }
}

/// Normalizes input for numeric parsing: trims whitespace and removes commas (thousands separator).
fn normalize_numeric_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Reads the leading whole number of `s`, the way a form reads an integer
/// field: `"12abc"` and `"12.9"` both give `12`.
///
/// Empty input is zero. Unreadable or negative input is zero and logged.
pub fn parse_whole_amount(
    field: &str,
    s: &str,
) -> Decimal {
    let normalized = normalize_numeric_input(s);
    if normalized.is_empty() {
        return Decimal::ZERO;
    }
    let Some(digits) = LEADING_INTEGER.find(&normalized) else {
        warn!(field, input = %s, "not a number; using 0");
        return Decimal::ZERO;
    };
    match Decimal::from_str(digits.as_str().trim_start_matches('+')) {
        Ok(value) if value < Decimal::ZERO => {
            warn!(field, input = %s, "negative amount; using 0");
            Decimal::ZERO
        }
        Ok(value) => value,
        Err(_) => out_of_range(field, s, digits.as_str()),
    }
}

/// Like [`parse_whole_amount`], for head counts. Saturates at `u32::MAX`.
pub fn parse_count(
    field: &str,
    s: &str,
) -> u32 {
    parse_whole_amount(field, s).to_u32().unwrap_or(u32::MAX)
}

/// Rent months default to one when blank, unreadable or zero.
pub fn parse_rent_months(s: &str) -> u32 {
    match parse_count("rent_months", s) {
        0 => 1,
        months => months,
    }
}

/// Reads the leading decimal number of `s`: `"2.5yrs"` gives `2.5` and
/// `"1e3"` gives `1000`.
///
/// Empty input is zero. Unreadable or negative input is zero and logged.
pub fn parse_real(
    field: &str,
    s: &str,
) -> Decimal {
    let normalized = normalize_numeric_input(s);
    if normalized.is_empty() {
        return Decimal::ZERO;
    }
    let Some(number) = LEADING_DECIMAL.find(&normalized) else {
        warn!(field, input = %s, "not a number; using 0");
        return Decimal::ZERO;
    };
    let number = with_leading_zero(number.as_str());
    let parsed = if number.contains(['e', 'E']) {
        Decimal::from_scientific(&number)
    } else {
        Decimal::from_str(&number)
    };
    match parsed {
        Ok(value) if value < Decimal::ZERO => {
            warn!(field, input = %s, "negative value; using 0");
            Decimal::ZERO
        }
        Ok(value) => value.normalize(),
        Err(_) => out_of_range(field, s, &number),
    }
}

/// A well-formed number `Decimal` cannot hold. Too large saturates at
/// [`Decimal::MAX`]; negative or too small is zero.
fn out_of_range(
    field: &str,
    input: &str,
    number: &str,
) -> Decimal {
    let (mantissa, exponent) = number.split_once(['e', 'E']).unwrap_or((number, ""));
    if mantissa.starts_with('-') {
        warn!(field, input, "negative value; using 0");
        Decimal::ZERO
    } else if exponent.starts_with('-') {
        warn!(field, input, "value too small; using 0");
        Decimal::ZERO
    } else {
        warn!(field, input, "value too large; using maximum");
        Decimal::MAX
    }
}

/// Drops a leading `+` and writes `.5` as `0.5`.
fn with_leading_zero(number: &str) -> String {
    let unsigned = number.trim_start_matches('+');
    match unsigned.strip_prefix('-') {
        Some(rest) if rest.starts_with('.') => format!("-0{rest}"),
        _ if unsigned.starts_with('.') => format!("0{unsigned}"),
        _ => unsigned.to_string(),
    }
}

/// Parses a yes/no cell. Accepts `yes/no`, `y/n`, `true/false` and `1/0`,
/// case-insensitive. Blank is `false`.
pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn collector() -> InputCollector {
        InputCollector::new("$")
    }

    fn raw() -> RawFields {
        RawFields {
            married: true,
            children: "2".to_string(),
            duration: "3".to_string(),
            priority: true,
            flight: "500".to_string(),
            rent: "1000".to_string(),
            rent_months: "6".to_string(),
            misc: "200".to_string(),
            currency: "₹".to_string(),
            rate: "104.5".to_string(),
        }
    }

    // =========================================================================
    // field parsing
    // =========================================================================

    #[test]
    fn parse_whole_amount_reads_leading_integer() {
        assert_eq!(parse_whole_amount("flight", "650"), dec!(650));
        assert_eq!(parse_whole_amount("flight", "12abc"), dec!(12));
        assert_eq!(parse_whole_amount("flight", "12.9"), dec!(12));
    }

    #[test]
    fn parse_whole_amount_accepts_comma_thousands_separator() {
        assert_eq!(parse_whole_amount("rent", "1,250"), dec!(1250));
    }

    #[test]
    fn parse_whole_amount_defaults_malformed_input_to_zero() {
        assert_eq!(parse_whole_amount("misc", ""), dec!(0));
        assert_eq!(parse_whole_amount("misc", "   "), dec!(0));
        assert_eq!(parse_whole_amount("misc", "abc"), dec!(0));
        assert_eq!(parse_whole_amount("misc", "-40"), dec!(0));
    }

    #[test]
    fn parse_count_saturates_huge_values() {
        assert_eq!(parse_count("children", "99999999999"), u32::MAX);
        assert_eq!(parse_count("children", &"9".repeat(30)), u32::MAX);
    }

    #[test]
    fn parse_whole_amount_saturates_beyond_decimal_range() {
        assert_eq!(parse_whole_amount("rent", &"9".repeat(30)), Decimal::MAX);
        assert_eq!(parse_whole_amount("rent", &format!("-{}", "9".repeat(30))), dec!(0));
    }

    #[test]
    fn parse_rent_months_defaults_to_one() {
        assert_eq!(parse_rent_months(""), 1);
        assert_eq!(parse_rent_months("0"), 1);
        assert_eq!(parse_rent_months("soon"), 1);
        assert_eq!(parse_rent_months("6"), 6);
    }

    #[test]
    fn parse_real_reads_leading_decimal() {
        assert_eq!(parse_real("rate", "1.27"), dec!(1.27));
        assert_eq!(parse_real("duration", "2.5yrs"), dec!(2.5));
        assert_eq!(parse_real("rate", ".5"), dec!(0.5));
        assert_eq!(parse_real("rate", "+3"), dec!(3));
    }

    #[test]
    fn parse_real_accepts_exponent() {
        assert_eq!(parse_real("rate", "1e3"), dec!(1000));
        assert_eq!(parse_real("rate", "2.5E-1"), dec!(0.25));
        assert_eq!(parse_real("rate", "4e"), dec!(4));
    }

    #[test]
    fn parse_real_saturates_beyond_decimal_range() {
        assert_eq!(parse_real("rate", "1e40"), Decimal::MAX);
        assert_eq!(parse_real("rate", &"9".repeat(30)), Decimal::MAX);
    }

    #[test]
    fn parse_real_defaults_malformed_input_to_zero() {
        assert_eq!(parse_real("rate", ""), dec!(0));
        assert_eq!(parse_real("rate", "n/a"), dec!(0));
        assert_eq!(parse_real("rate", "-1.5"), dec!(0));
    }

    #[test]
    fn parse_flag_accepts_common_spellings() {
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag("y"), Some(true));
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    // =========================================================================
    // collect
    // =========================================================================

    #[test]
    fn collect_builds_input_from_well_formed_fields() {
        let input = collector().collect(&raw());

        assert_eq!(input.household, Household::Married { children: 2 });
        assert_eq!(input.duration_years, 3);
        assert!(input.priority_selected);
        assert_eq!(input.flight_cost_per_person, dec!(500));
        assert_eq!(input.rent_cost_per_month, dec!(1000));
        assert_eq!(input.rent_months, 6);
        assert_eq!(input.misc_cost, dec!(200));
        assert_eq!(input.currency_symbol, "₹");
        assert_eq!(input.exchange_rate, dec!(104.5));
    }

    #[test]
    fn collect_forces_children_to_zero_when_single() {
        let fields = RawFields {
            married: false,
            ..raw()
        };

        let input = collector().collect(&fields);

        assert_eq!(input.household, Household::Single);
        assert_eq!(input.num_children(), 0);
    }

    #[test]
    fn collect_rounds_fractional_duration_half_up() {
        let fields = RawFields {
            duration: "2.5".to_string(),
            ..raw()
        };

        assert_eq!(collector().collect(&fields).duration_years, 3);
    }

    #[test]
    fn collect_uses_default_currency_when_blank() {
        let fields = RawFields {
            currency: "  ".to_string(),
            ..raw()
        };

        assert_eq!(collector().collect(&fields).currency_symbol, "$");
    }

    #[test]
    fn collect_defaults_every_malformed_field() {
        let fields = RawFields {
            married: true,
            children: "several".to_string(),
            duration: "long".to_string(),
            priority: false,
            flight: "cheap".to_string(),
            rent: "".to_string(),
            rent_months: "".to_string(),
            misc: "-5".to_string(),
            currency: "€".to_string(),
            rate: "tbd".to_string(),
        };

        let input = collector().collect(&fields);

        assert_eq!(input.num_children(), 0);
        assert_eq!(input.duration_years, 0);
        assert_eq!(input.flight_cost_per_person, dec!(0));
        assert_eq!(input.rent_cost_per_month, dec!(0));
        assert_eq!(input.rent_months, 1);
        assert_eq!(input.misc_cost, dec!(0));
        assert_eq!(input.exchange_rate, dec!(0));
        assert!(!input.has_exchange_rate());
    }
}
