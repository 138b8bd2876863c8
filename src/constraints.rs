//! Cross-field constraints between selections.

use crate::break_by;
use crate::config::{FilterConfig, METRIC_ABSOLUTE};
use crate::models::{FilterOption, Selection};

/// Constrain the sector selection by the break-by metric.
///
/// Normalised metrics (per capita, per GDP) are only meaningful for total emissions, so when the
/// break-by metric exists and is not absolute the sector is forced to the option whose code is
/// the configured total sector. The resolved selection is kept when there is no such option.
///
/// Returns `None` when the sector options or the break-by selection are absent.
///
/// # Arguments
///
/// * `sector`: Resolved sector selection
/// * `sector_options`: Sector option list, if available
/// * `break_by`: Resolved break-by selection
/// * `config`: Filter configuration
pub fn constrain_sector(
    sector: Option<Selection>,
    sector_options: Option<&[FilterOption]>,
    break_by: Option<&Selection>,
    config: &FilterConfig,
) -> Option<Selection> {
    let (Some(sector_options), Some(break_by)) = (sector_options, break_by) else {
        return None;
    };
    let metric = break_by::decompose(Some(break_by)).metric;
    match metric.as_deref() {
        Some(metric) if metric != METRIC_ABSOLUTE => {
            let total = sector_options
                .iter()
                .find(|option| option.code.as_deref() == Some(config.sector_total.as_str()));
            match total {
                Some(total) => Some(Selection::Single(total.clone())),
                None => sector,
            }
        }
        _ => sector,
    }
}
