//! Top emitters aggregation.
//!
//! Derives the synthetic "top 10" region option by ranking regions on their cumulative absolute
//! emissions.
//!
//! By default regions are ranked in ascending order and the head of the ranking is taken, which
//! selects the *lowest* emitters. [RankOrder::Descending] selects the highest emitters instead.

use crate::config::{FilterConfig, METRIC_ABSOLUTE, VALUE_SEPARATOR};
use crate::models::{CategoryRecord, EmissionRecord, FilterOption};
use crate::options::{find_option, FindBy};

use hashbrown::HashMap;
use tracing::{event, Level};

/// Number of regions in the top emitters option.
pub const TOP_EMITTERS_COUNT: usize = 10;

/// Direction of the emissions ranking
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum RankOrder {
    /// Rank ascending and take the head (lowest emitters)
    Ascending,
    /// Rank descending and take the head (highest emitters)
    Descending,
}

/// Returns each region's representative total, in first-seen order.
///
/// The whole-country aggregate is excluded. A region's total is the cumulative value of its
/// absolute, total-sector record, or zero when it has none.
pub fn region_totals<'a>(data: &'a [EmissionRecord], config: &FilterConfig) -> Vec<(&'a str, f64)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, Option<f64>)> = Vec::new();
    for record in data {
        let iso = record.iso_code3.as_str();
        if iso == config.country_iso {
            continue;
        }
        let position = match index.get(iso) {
            Some(position) => *position,
            None => {
                totals.push((iso, None));
                index.insert(iso, totals.len() - 1);
                totals.len() - 1
            }
        };
        // The first representative record of a region wins.
        let representative =
            record.metric == METRIC_ABSOLUTE && record.sector == config.sector_total;
        if representative && totals[position].1.is_none() {
            totals[position].1 = Some(record.total());
        }
    }
    totals
        .into_iter()
        .map(|(iso, total)| (iso, total.unwrap_or(0.0)))
        .collect()
}

/// Returns the ISO codes of the top emitting regions, at most [TOP_EMITTERS_COUNT].
///
/// Sorting is stable, so regions with equal totals keep their first-seen order.
pub fn top_emitter_isos<'a>(data: &'a [EmissionRecord], config: &FilterConfig) -> Vec<&'a str> {
    let mut totals = region_totals(data, config);
    match config.top_emitters_order {
        RankOrder::Ascending => totals.sort_by(|a, b| a.1.total_cmp(&b.1)),
        RankOrder::Descending => totals.sort_by(|a, b| b.1.total_cmp(&a.1)),
    }
    totals
        .into_iter()
        .take(TOP_EMITTERS_COUNT)
        .map(|(iso, _)| iso)
        .collect()
}

/// Build the top emitters region option.
///
/// The option value joins the location values of the ranked regions. When the data does not
/// yield exactly [TOP_EMITTERS_COUNT] regions with a location record, `fallback` is returned.
///
/// # Arguments
///
/// * `data`: Emissions dataset, if loaded
/// * `locations`: Location metadata records, if loaded
/// * `config`: Filter configuration
/// * `fallback`: Option to return when no top emitters option can be built
pub fn top_emitters_option(
    data: Option<&[EmissionRecord]>,
    locations: Option<&[CategoryRecord]>,
    config: &FilterConfig,
    fallback: Option<FilterOption>,
) -> Option<FilterOption> {
    let (Some(data), Some(locations)) = (data, locations) else {
        return fallback;
    };
    if data.is_empty() {
        return fallback;
    }
    let isos = top_emitter_isos(data, config);
    let values: Vec<&str> = isos
        .iter()
        .filter_map(|iso| find_option(locations, iso, &[FindBy::IsoCode3]))
        .map(|record| record.value.as_str())
        .collect();
    if isos.len() != TOP_EMITTERS_COUNT || values.len() != TOP_EMITTERS_COUNT {
        event!(
            Level::DEBUG,
            regions = isos.len(),
            resolved = values.len(),
            "top emitters unavailable, using fallback"
        );
        return fallback;
    }
    Some(
        FilterOption::new(&config.labels.top_emitters, values.join(VALUE_SEPARATOR))
            .overriding(),
    )
}

/// Expand the top emitters option into the location options it stands for.
///
/// Values without a location record are skipped.
pub fn expand_top_emitters(
    option: Option<&FilterOption>,
    locations: Option<&[CategoryRecord]>,
) -> Option<Vec<FilterOption>> {
    let (option, locations) = (option?, locations?);
    let expanded = option
        .value
        .split(VALUE_SEPARATOR)
        .filter_map(|value| find_option(locations, value, &[FindBy::Value]))
        .map(|location| {
            let option = FilterOption::new(&location.label, &location.value);
            match &location.iso_code3 {
                Some(iso) => option.with_code(iso),
                None => option,
            }
        })
        .collect();
    Some(expanded)
}
