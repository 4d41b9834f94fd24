//! Wiring between the command line, the estimator and the preference store.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};
use visa_core::prefs::{
    MemoryPreferenceStoreFactory, OpenMode, PreferenceRegistry, load_theme, save_theme,
    toggle_theme,
};
use visa_core::{Estimator, EstimatorInput, EstimatorOutput, PreferenceError, PreferenceStore, Theme};
use visa_prefs_sqlite::SqlitePreferenceStoreFactory;

use crate::collector::{InputCollector, RawFields};
use crate::config::AppConfig;
use crate::csv_loader::Scenario;
use crate::render::Report;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Registry with every preference backend this binary knows about.
pub fn build_registry() -> PreferenceRegistry {
    let mut registry = PreferenceRegistry::new();
    registry.register(Box::new(SqlitePreferenceStoreFactory));
    registry.register(Box::new(MemoryPreferenceStoreFactory));
    registry
}

/// Opens the preference store named in the configuration, creating it if
/// needed.
pub async fn open_store(config: &AppConfig) -> Result<Box<dyn PreferenceStore>> {
    build_registry()
        .open(&config.preferences, OpenMode::Create)
        .await
        .with_context(|| {
            format!(
                "cannot open '{}' preference store at '{}'",
                config.preferences.backend, config.preferences.location
            )
        })
}

/// Reads the stored theme without creating the store. A store that does
/// not exist yet holds the default theme.
pub async fn stored_theme(config: &AppConfig) -> Result<Theme> {
    let opened = build_registry()
        .open(&config.preferences, OpenMode::Existing)
        .await;
    let store = match opened {
        Ok(store) => store,
        Err(PreferenceError::NotFound(location)) => {
            debug!(%location, "no preference store yet; using default theme");
            return Ok(Theme::default());
        }
        Err(error) => {
            return Err(error).with_context(|| {
                format!(
                    "cannot open '{}' preference store at '{}'",
                    config.preferences.backend, config.preferences.location
                )
            });
        }
    };
    show_theme(&*store).await
}

/// Theme for one `estimate` or `batch` run. Any failure only costs the
/// colours, so it falls back to the default theme.
pub async fn startup_theme(config: &AppConfig) -> Theme {
    stored_theme(config).await.unwrap_or_else(|error| {
        warn!(error = %format!("{error:#}"), "cannot read theme; using default");
        Theme::default()
    })
}

/// One computed estimate with its formatted breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub input: EstimatorInput,
    pub output: EstimatorOutput,
    pub report: Report,
}

/// Everything needed to turn raw input into rendered estimates.
#[derive(Debug, Clone)]
pub struct Session {
    config: AppConfig,
    estimator: Estimator,
    collector: InputCollector,
    theme: Theme,
}

impl Session {
    pub fn new(
        config: AppConfig,
        theme: Theme,
    ) -> Self {
        let estimator = Estimator::new(config.fees.clone());
        let collector = InputCollector::new(config.display.default_currency_symbol.clone());
        Self {
            config,
            estimator,
            collector,
            theme,
        }
    }

    pub fn collector(&self) -> &InputCollector {
        &self.collector
    }

    fn estimate_input(
        &self,
        label: Option<String>,
        input: EstimatorInput,
    ) -> Estimate {
        let output = self.estimator.estimate(&input);
        let report = Report::build(&input, &output, &self.config.display);
        Estimate {
            label,
            input,
            output,
            report,
        }
    }

    /// Collects raw fields and estimates them.
    pub fn estimate_fields(
        &self,
        raw: &RawFields,
    ) -> Estimate {
        self.estimate_input(None, self.collector.collect(raw))
    }

    /// Estimates each scenario in order.
    pub fn estimate_scenarios(
        &self,
        scenarios: Vec<Scenario>,
    ) -> Vec<Estimate> {
        info!(count = scenarios.len(), "estimating scenarios");
        scenarios
            .into_iter()
            .map(|s| self.estimate_input(Some(s.label), s.input))
            .collect()
    }

    /// Renders one estimate. JSON output is a single object.
    pub fn render_estimate(
        &self,
        estimate: &Estimate,
        format: OutputFormat,
        ansi: bool,
    ) -> Result<String> {
        match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(estimate).context("cannot serialise estimate")
            }
            OutputFormat::Text => Ok(self.render_text(estimate, ansi)),
        }
    }

    /// Renders a batch in file order. JSON output is always an array, even
    /// for zero or one scenario.
    pub fn render_batch(
        &self,
        estimates: &[Estimate],
        format: OutputFormat,
        ansi: bool,
    ) -> Result<String> {
        match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(estimates).context("cannot serialise estimates")
            }
            OutputFormat::Text => Ok(estimates
                .iter()
                .map(|estimate| self.render_text(estimate, ansi))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn render_text(
        &self,
        estimate: &Estimate,
        ansi: bool,
    ) -> String {
        let body = estimate.report.render_text(self.theme, ansi);
        match &estimate.label {
            Some(label) => format!("== {label} ==\n{body}"),
            None => body,
        }
    }
}

/// `theme show`: the stored theme, or the default.
pub async fn show_theme(store: &dyn PreferenceStore) -> Result<Theme> {
    load_theme(store).await.context("cannot read theme")
}

/// `theme toggle`: flips the stored theme and returns the new one.
pub async fn toggle_stored_theme(store: &dyn PreferenceStore) -> Result<Theme> {
    let current = show_theme(store).await?;
    let next = toggle_theme(store, current)
        .await
        .context("cannot save theme")?;
    info!(theme = %next, "theme changed");
    Ok(next)
}

/// `theme set`: stores `theme` as given.
pub async fn set_stored_theme(
    store: &dyn PreferenceStore,
    theme: Theme,
) -> Result<Theme> {
    save_theme(store, theme).await.context("cannot save theme")?;
    info!(theme = %theme, "theme changed");
    Ok(theme)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use visa_core::prefs::{MemoryPreferenceStore, StoreConfig};

    use super::*;
    use crate::collector::InputCollector;
    use crate::csv_loader;

    fn family_fields() -> RawFields {
        RawFields {
            married: true,
            children: "2".to_string(),
            duration: "3".to_string(),
            priority: true,
            flight: "500".to_string(),
            rent: "1000".to_string(),
            rent_months: "6".to_string(),
            misc: "200".to_string(),
            currency: "$".to_string(),
            rate: "1.27".to_string(),
        }
    }

    fn session() -> Session {
        Session::new(AppConfig::default(), Theme::Light)
    }

    fn memory_config() -> AppConfig {
        AppConfig {
            preferences: StoreConfig {
                backend: "memory".to_string(),
                location: String::new(),
            },
            ..AppConfig::default()
        }
    }

    #[test]
    fn registry_knows_memory_and_sqlite() {
        assert_eq!(build_registry().available_backends(), vec!["memory", "sqlite"]);
    }

    #[test]
    fn estimate_fields_runs_the_full_pipeline() {
        let estimate = session().estimate_fields(&family_fields());

        assert_eq!(estimate.output.total_people, 4);
        assert_eq!(estimate.output.grand_total_base_currency, dec!(24130));
        assert_eq!(estimate.report.grand_total, "£24,130");
        assert_eq!(estimate.report.local_total, "≈ $30,645");
    }

    #[test]
    fn configured_fees_reach_the_estimator() {
        let mut config = AppConfig::default();
        config.fees.visa_fee_per_person = dec!(1000);
        let session = Session::new(config, Theme::Light);

        let estimate = session.estimate_fields(&family_fields());

        assert_eq!(estimate.output.visa_fee_total, dec!(4000));
    }

    #[test]
    fn scenarios_keep_their_labels() {
        let session = session();
        let scenarios = csv_loader::load_from_str(
            "label,married,duration\nsolo,no,1\ncouple,yes,1\n",
            &InputCollector::new("$"),
        )
        .unwrap();

        let estimates = session.estimate_scenarios(scenarios);

        assert_eq!(estimates.len(), 2);
        assert_eq!(estimates[0].label.as_deref(), Some("solo"));
        assert_eq!(estimates[1].output.grand_total_base_currency, dec!(3602));
    }

    fn batch_json(csv: &str) -> serde_json::Value {
        let session = session();
        let scenarios = csv_loader::load_from_str(csv, session.collector()).unwrap();
        let estimates = session.estimate_scenarios(scenarios);
        let json = session
            .render_batch(&estimates, OutputFormat::Json, false)
            .unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn estimate_json_is_an_object() {
        let session = session();
        let estimate = session.estimate_fields(&family_fields());

        let json = session
            .render_estimate(&estimate, OutputFormat::Json, false)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value.is_object());
        assert_eq!(value["output"]["total_people"], 4);
        assert_eq!(value["report"]["grand_total"], "£24,130");
        assert_eq!(value["input"]["household"]["status"], "married");
        assert!(value.get("label").is_none());
    }

    #[test]
    fn batch_json_with_one_row_is_still_an_array() {
        let value = batch_json("married\nyes\n");

        assert_eq!(value.as_array().map(Vec::len), Some(1));
        assert_eq!(value[0]["label"], "row 1");
    }

    #[test]
    fn batch_json_with_several_rows_is_an_array() {
        let value = batch_json("label,married\nsolo,no\ncouple,yes\n");

        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["label"], "couple");
    }

    #[test]
    fn batch_json_with_no_rows_is_an_empty_array() {
        assert_eq!(batch_json("married\n"), serde_json::json!([]));
    }

    #[test]
    fn text_output_prefixes_labels() {
        let session = session();
        let scenarios = csv_loader::load_from_str(
            "label,married\nsolo,no\n",
            &InputCollector::new("$"),
        )
        .unwrap();
        let estimates = session.estimate_scenarios(scenarios);

        let text = session
            .render_batch(&estimates, OutputFormat::Text, false)
            .unwrap();

        assert!(text.starts_with("== solo ==\n"));
        assert!(text.contains("Enter valid exchange rate"));
    }

    #[tokio::test]
    async fn theme_commands_round_trip_through_store() {
        let store = MemoryPreferenceStore::new();

        assert_eq!(show_theme(&store).await.unwrap(), Theme::Light);
        assert_eq!(toggle_stored_theme(&store).await.unwrap(), Theme::Dark);
        assert_eq!(show_theme(&store).await.unwrap(), Theme::Dark);
        assert_eq!(set_stored_theme(&store, Theme::Light).await.unwrap(), Theme::Light);
        assert_eq!(show_theme(&store).await.unwrap(), Theme::Light);
    }

    #[tokio::test]
    async fn startup_theme_defaults_for_fresh_store() {
        assert_eq!(startup_theme(&memory_config()).await, Theme::Light);
    }

    #[tokio::test]
    async fn startup_theme_does_not_create_missing_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.db");
        let config = AppConfig {
            preferences: StoreConfig {
                backend: "sqlite".to_string(),
                location: path.to_string_lossy().into_owned(),
            },
            ..AppConfig::default()
        };

        assert_eq!(startup_theme(&config).await, Theme::Light);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn startup_theme_reads_theme_saved_by_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            preferences: StoreConfig {
                backend: "sqlite".to_string(),
                location: dir.path().join("preferences.db").to_string_lossy().into_owned(),
            },
            ..AppConfig::default()
        };
        {
            let store = open_store(&config).await.unwrap();
            toggle_stored_theme(&*store).await.unwrap();
        }

        assert_eq!(startup_theme(&config).await, Theme::Dark);
    }

    #[tokio::test]
    async fn stored_theme_reports_unknown_backend() {
        let config = AppConfig {
            preferences: StoreConfig {
                backend: "redis".to_string(),
                location: String::new(),
            },
            ..AppConfig::default()
        };

        let err = stored_theme(&config).await.unwrap_err();

        assert!(format!("{err:#}").contains("redis"));
    }

    #[tokio::test]
    async fn startup_theme_falls_back_when_backend_is_unknown() {
        let config = AppConfig {
            preferences: StoreConfig {
                backend: "redis".to_string(),
                location: String::new(),
            },
            ..AppConfig::default()
        };

        assert_eq!(startup_theme(&config).await, Theme::Light);
    }

    #[tokio::test]
    async fn open_store_reports_unknown_backend() {
        let config = AppConfig {
            preferences: StoreConfig {
                backend: "redis".to_string(),
                location: String::new(),
            },
            ..AppConfig::default()
        };

        let err = open_store(&config).await.err().unwrap();

        assert!(format!("{err:#}").contains("redis"));
    }
}
