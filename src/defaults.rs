//! Default selections.

use crate::config::FilterConfig;
use crate::models::{FilterField, FilterOption, FilterOptions, SelectedOptions, Selection};
use crate::options::{find_option, OPTION_KEYS};

/// Find `value` in an optional option list and wrap it as a single selection.
fn single(options: Option<&[FilterOption]>, value: &str) -> Option<Selection> {
    find_option(options?, value, &OPTION_KEYS)
        .cloned()
        .map(Selection::Single)
}

/// Build the default selection of every field.
///
/// The defaults depend only on the option lists and the synthetic national option, never on the
/// query state.
///
/// # Arguments
///
/// * `options`: Option lists of every field
/// * `national`: Synthetic whole-country region option
/// * `config`: Filter configuration
pub fn defaults(
    options: &FilterOptions,
    national: Option<&FilterOption>,
    config: &FilterConfig,
) -> SelectedOptions {
    let option_list = |field: FilterField| options.get(field).as_deref();
    SelectedOptions {
        source: single(option_list(FilterField::Source), &config.default_source),
        chart_type: single(option_list(FilterField::ChartType), &config.default_chart_type),
        break_by: single(option_list(FilterField::BreakBy), &config.default_break_by),
        region: national.cloned().map(Selection::Single),
        sector: Some(Selection::AllSelected(config.all_selected_option())),
        gas: Some(Selection::AllSelected(config.all_selected_option())),
    }
}
