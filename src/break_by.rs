//! Break-by decomposition.

use crate::config::BREAK_BY_SEPARATOR;
use crate::models::Selection;

use serde::{Deserialize, Serialize};

/// Grouping dimension and normalisation metric of a break-by selection
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct BreakBy {
    /// Grouping dimension, e.g. `region`
    pub model: Option<String>,
    /// Normalisation metric, e.g. `per_capita`
    pub metric: Option<String>,
}

/// Split a break-by selection into its model and metric.
///
/// Both parts are absent unless the selection is a single option.
pub fn decompose(break_by: Option<&Selection>) -> BreakBy {
    let Some(option) = break_by.and_then(Selection::as_single) else {
        return BreakBy::default();
    };
    let mut parts = option.value.split(BREAK_BY_SEPARATOR);
    BreakBy {
        model: parts.next().map(str::to_owned),
        metric: parts.next().map(str::to_owned),
    }
}
