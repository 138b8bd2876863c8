//! Derivation configuration.
//!
//! [FilterConfig] gathers every constant the filter derivation depends on. It is built once at
//! startup from the command line arguments and shared read-only with the selector graph.

use crate::cli::CommandLineArgs;
use crate::models::{Api, FilterOption};
use crate::top_emitters::RankOrder;

/// Query value meaning "no restriction on this field".
pub const ALL_SELECTED: &str = "all-selected";

/// Metric of absolute (non-normalised) emissions.
pub const METRIC_ABSOLUTE: &str = "absolute";

/// Separator of multi-value query strings.
pub const VALUE_SEPARATOR: &str = ",";

/// Separator between the model and metric parts of a break-by value.
pub const BREAK_BY_SEPARATOR: char = '-';

/// A data source option and the API serving it
#[derive(Clone, Debug, PartialEq)]
pub struct SourceOption {
    pub option: FilterOption,
    pub api: Api,
}

/// Display labels of the synthetic options
#[derive(Clone, Debug, PartialEq)]
pub struct Labels {
    pub all_selected: String,
    pub national: String,
    pub top_emitters: String,
}

impl Default for Labels {
    fn default() -> Self {
        Labels {
            all_selected: "All selected".to_string(),
            national: "National".to_string(),
            top_emitters: "top 10".to_string(),
        }
    }
}

/// Filter derivation configuration
#[derive(Clone, Debug, PartialEq)]
pub struct FilterConfig {
    /// ISO code of the whole-country aggregate location
    pub country_iso: String,
    /// Code of the sector category holding total emissions
    pub sector_total: String,
    /// Ranking direction of the top emitters option
    pub top_emitters_order: RankOrder,
    pub labels: Labels,
    pub source_options: Vec<SourceOption>,
    pub chart_type_options: Vec<FilterOption>,
    pub break_by_options: Vec<FilterOption>,
    /// Default source, matched against the source options
    pub default_source: String,
    /// Default chart type, matched against the chart type options
    pub default_chart_type: String,
    /// Default break-by, matched against the break-by options
    pub default_break_by: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let break_by = |value: &str, label: &str| FilterOption::new(label, value);
        FilterConfig {
            country_iso: "IDN".to_string(),
            sector_total: "Total".to_string(),
            top_emitters_order: RankOrder::Ascending,
            labels: Labels::default(),
            source_options: vec![
                SourceOption {
                    option: FilterOption::new("SIGN SMART", "SIGN_SMART").with_name("SIGN SMART"),
                    api: Api::Indo,
                },
                SourceOption {
                    option: FilterOption::new("CAIT", "CAIT").with_name("CAIT"),
                    api: Api::Cw,
                },
            ],
            chart_type_options: vec![
                FilterOption::new("area", "area"),
                FilterOption::new("line", "line"),
            ],
            break_by_options: vec![
                break_by("region-absolute", "Region - Absolute value"),
                break_by("region-per_capita", "Region - per capita"),
                break_by("region-per_gdp", "Region - per GDP"),
                break_by("sector-absolute", "Sector - Absolute value"),
                break_by("sector-per_capita", "Sector - per capita"),
                break_by("sector-per_gdp", "Sector - per GDP"),
                break_by("gas-absolute", "Gas - Absolute value"),
            ],
            default_source: "SIGN SMART".to_string(),
            default_chart_type: "line".to_string(),
            default_break_by: "region-absolute".to_string(),
        }
    }
}

impl From<&CommandLineArgs> for FilterConfig {
    fn from(args: &CommandLineArgs) -> Self {
        FilterConfig {
            country_iso: args.country_iso.clone(),
            sector_total: args.sector_total.clone(),
            top_emitters_order: args.top_emitters_order,
            labels: Labels {
                all_selected: args.all_selected_label.clone(),
                national: args.national_label.clone(),
                top_emitters: args.top_emitters_label.clone(),
            },
            ..Default::default()
        }
    }
}

impl FilterConfig {
    /// Returns the option standing for [ALL_SELECTED].
    pub fn all_selected_option(&self) -> FilterOption {
        FilterOption::new(&self.labels.all_selected, ALL_SELECTED).overriding()
    }

    /// Returns the source options without their APIs.
    pub fn source_filter_options(&self) -> Vec<FilterOption> {
        self.source_options
            .iter()
            .map(|source| source.option.clone())
            .collect()
    }

    /// Returns the API serving a source option value.
    pub fn api_for_source(&self, value: &str) -> Option<Api> {
        self.source_options
            .iter()
            .find(|source| source.option.value == value)
            .map(|source| source.api)
    }
}
