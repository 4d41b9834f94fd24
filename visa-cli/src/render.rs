//! Display layer: turns an [`EstimatorOutput`] into labelled, formatted rows.
//!
//! Amounts are shown with a currency symbol, comma grouping and no decimal
//! places. Rows that do not apply (priority service not selected, no
//! children) are left out.

use std::fmt::{self, Write as _};

use rust_decimal::Decimal;
use serde::Serialize;
use visa_core::calculations::common::round_half_up;
use visa_core::{EstimatorInput, EstimatorOutput, Theme};

use crate::config::DisplayConfig;

/// Shown instead of a converted total when the exchange rate is not usable.
pub const INVALID_RATE_TEXT: &str = "Enter valid exchange rate";

/// Formats `amount` as a whole number with comma grouping behind `symbol`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use visa_cli::render::format_currency;
///
/// assert_eq!(format_currency(dec!(24130), "£"), "£24,130");
/// assert_eq!(format_currency(dec!(30645.5), "$"), "$30,646");
/// ```
pub fn format_currency(
    amount: Decimal,
    symbol: &str,
) -> String {
    let rounded = round_half_up(amount);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{symbol}{sign}{}", group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn adults_label(n: u32) -> &'static str {
    if n > 1 { "Adults" } else { "Adult" }
}

fn children_label(n: u32) -> &'static str {
    if n > 1 { "Children" } else { "Child" }
}

fn applicants_label(n: u32) -> &'static str {
    if n == 1 { "applicant" } else { "applicants" }
}

/// One line of the breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub label: String,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Row {
    fn new(
        label: impl Into<String>,
        amount: String,
    ) -> Self {
        Self {
            label: label.into(),
            amount,
            detail: None,
        }
    }

    fn with_detail(
        mut self,
        detail: String,
    ) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// A fully formatted estimate, ready to print or serialise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub rows: Vec<Row>,
    pub grand_total: String,
    /// Converted total, or [`INVALID_RATE_TEXT`] when the rate is zero.
    pub local_total: String,
    pub local_total_valid: bool,
    pub summary: Vec<String>,
}

impl Report {
    pub fn build(
        input: &EstimatorInput,
        output: &EstimatorOutput,
        display: &DisplayConfig,
    ) -> Self {
        let base = display.base_currency_symbol.as_str();
        let years = input.duration_years;
        let num_children = input.num_children();

        let mut rows = vec![
            Row::new("Visa fee", format_currency(output.visa_fee_total, base)).with_detail(
                format!(
                    "({} {})",
                    output.total_people,
                    applicants_label(output.total_people)
                ),
            ),
        ];

        if input.priority_selected {
            rows.push(Row::new(
                "Priority service",
                format_currency(output.priority_fee_total, base),
            ));
        }

        rows.push(
            Row::new(
                "Health surcharge (adults)",
                format_currency(output.health_surcharge_adult_total, base),
            )
            .with_detail(format!(
                "({} {} × {} yrs)",
                output.num_adults,
                adults_label(output.num_adults),
                years
            )),
        );

        if num_children > 0 {
            rows.push(
                Row::new(
                    "Health surcharge (children)",
                    format_currency(output.health_surcharge_child_total, base),
                )
                .with_detail(format!(
                    "({} {} × {} yrs)",
                    num_children,
                    children_label(num_children),
                    years
                )),
            );
        }

        rows.push(Row::new("Flights", format_currency(output.flight_total, base)));
        rows.push(Row::new(
            format!("Rent ({} months)", input.rent_months),
            format_currency(output.rent_total, base),
        ));
        rows.push(Row::new(
            "Miscellaneous",
            format_currency(output.misc_total, base),
        ));

        let local_total_valid = input.has_exchange_rate();
        let local_total = if local_total_valid {
            format!(
                "≈ {}",
                format_currency(output.grand_total_local_currency, &input.currency_symbol)
            )
        } else {
            INVALID_RATE_TEXT.to_string()
        };

        let summary = vec![
            format!(
                "Applicants: {} ({} Adults, {} Children)",
                output.total_people, output.num_adults, num_children
            ),
            format!("Duration: {years} Years"),
            format!(
                "Exchange Rate: 1 {} = {} {}",
                display.base_currency_code,
                input.exchange_rate.normalize(),
                input.currency_symbol
            ),
        ];

        Self {
            rows,
            grand_total: format_currency(output.grand_total_base_currency, base),
            local_total,
            local_total_valid,
            summary,
        }
    }

    /// Plain or ANSI-styled text. Colours follow the theme.
    pub fn render_text(
        &self,
        theme: Theme,
        ansi: bool,
    ) -> String {
        let palette = Palette::new(theme, ansi);
        let label_width = self
            .rows
            .iter()
            .map(|row| row.label.chars().count())
            .chain(["Grand total".len(), "Local total".len()])
            .max()
            .unwrap_or(0);
        let amount_width = self
            .rows
            .iter()
            .map(|row| row.amount.chars().count())
            .chain([self.grand_total.chars().count()])
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        let _ = writeln!(out, "{}Cost breakdown{}", palette.heading, palette.reset);
        for row in &self.rows {
            let _ = write!(
                out,
                "  {:<label_width$}  {:>amount_width$}",
                row.label, row.amount
            );
            if let Some(detail) = &row.detail {
                let _ = write!(out, "  {detail}");
            }
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "  {}{:<label_width$}  {:>amount_width$}{}",
            palette.total, "Grand total", self.grand_total, palette.reset
        );
        let local_style = if self.local_total_valid {
            palette.total
        } else {
            palette.warning
        };
        let _ = writeln!(
            out,
            "  {:<label_width$}  {}{}{}",
            "Local total", local_style, self.local_total, palette.reset
        );

        let _ = writeln!(out, "\n{}Summary{}", palette.heading, palette.reset);
        for line in &self.summary {
            let _ = writeln!(out, "  {line}");
        }
        out
    }
}

impl fmt::Display for Report {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.render_text(Theme::default(), false))
    }
}

/// ANSI escapes for each theme; empty when colour is off.
struct Palette {
    heading: &'static str,
    total: &'static str,
    warning: &'static str,
    reset: &'static str,
}

impl Palette {
    fn new(
        theme: Theme,
        ansi: bool,
    ) -> Self {
        if !ansi {
            return Self {
                heading: "",
                total: "",
                warning: "",
                reset: "",
            };
        }
        match theme {
            Theme::Light => Self {
                heading: "\x1b[1;34m",
                total: "\x1b[1;32m",
                warning: "\x1b[1;31m",
                reset: "\x1b[0m",
            },
            Theme::Dark => Self {
                heading: "\x1b[1;36m",
                total: "\x1b[1;33m",
                warning: "\x1b[1;35m",
                reset: "\x1b[0m",
            },
        }
    }
}
