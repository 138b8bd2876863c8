//! Selection resolution.
//!
//! Reconciles raw query values with the available options, and computes the query value that
//! follows a change to a multi-select field.

use crate::config::{ALL_SELECTED, VALUE_SEPARATOR};
use crate::models::{FilterOption, Selection};
use crate::options::{find_option, OPTION_KEYS};

use hashbrown::HashSet;

/// Resolve the selection of one field.
///
/// * An absent or empty query value resolves to the default.
/// * The [ALL_SELECTED] sentinel resolves to [Selection::AllSelected] carrying `all_selected`.
/// * A comma-joined value resolves each token on its own. Unmatched tokens leave holes.
/// * Any other value resolves to the matching option, or to nothing.
///
/// # Arguments
///
/// * `query_value`: Raw query value of the field
/// * `default`: Default selection of the field
/// * `options`: Option list of the field, if available
/// * `all_selected`: Option standing for the sentinel
pub fn resolve_selection(
    query_value: Option<&str>,
    default: Option<&Selection>,
    options: Option<&[FilterOption]>,
    all_selected: &FilterOption,
) -> Option<Selection> {
    let query_value = match query_value {
        None | Some("") => return default.cloned(),
        Some(ALL_SELECTED) => return Some(Selection::AllSelected(all_selected.clone())),
        Some(query_value) => query_value,
    };
    let find = |token: &str| {
        options
            .and_then(|options| find_option(options, token, &OPTION_KEYS))
            .cloned()
    };
    if query_value.contains(VALUE_SEPARATOR) {
        Some(Selection::Multi(
            query_value.split(VALUE_SEPARATOR).map(find).collect(),
        ))
    } else {
        find(query_value).map(Selection::Single)
    }
}

/// Compute the query value for the options picked in a multi-select field.
///
/// When the most recently picked option is an override, its value replaces the selection.
/// Otherwise the values of the plain options are unioned, keeping pick order. Returns `None`
/// when nothing is picked, which clears the field.
pub fn next_query_value(picked: &[FilterOption]) -> Option<String> {
    let last = picked.last()?;
    if last.is_override {
        return Some(last.value.clone());
    }
    let mut seen = HashSet::new();
    let values: Vec<&str> = picked
        .iter()
        .filter(|option| !option.is_override)
        .map(|option| option.value.as_str())
        .filter(|value| seen.insert(*value))
        .collect();
    Some(values.join(VALUE_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all() -> FilterOption {
        FilterOption::new("All selected", ALL_SELECTED).overriding()
    }

    fn options() -> Vec<FilterOption> {
        vec![
            FilterOption::new("Option A", "A"),
            FilterOption::new("Option B", "B").with_code("BB"),
            FilterOption::new("Option C", "C").with_name("see"),
        ]
    }

    #[test]
    fn resolve_empty_query_uses_default() {
        let default = Selection::Single(FilterOption::new("Option C", "C"));
        let options = options();
        assert_eq!(
            Some(default.clone()),
            resolve_selection(None, Some(&default), Some(options.as_slice()), &all())
        );
        assert_eq!(
            Some(default.clone()),
            resolve_selection(Some(""), Some(&default), Some(options.as_slice()), &all())
        );
        assert_eq!(None, resolve_selection(None, None, Some(options.as_slice()), &all()));
    }

    #[test]
    fn resolve_all_selected_sentinel() {
        let options = options();
        assert_eq!(
            Some(Selection::AllSelected(all())),
            resolve_selection(Some(ALL_SELECTED), None, Some(options.as_slice()), &all())
        );
        assert_eq!(
            Some(Selection::AllSelected(all())),
            resolve_selection(Some(ALL_SELECTED), None, Some(&[][..]), &all())
        );
        assert_eq!(
            Some(Selection::AllSelected(all())),
            resolve_selection(Some(ALL_SELECTED), None, None, &all())
        );
    }

    #[test]
    fn resolve_multi_value() {
        let options = options();
        assert_eq!(
            Some(Selection::Multi(vec![
                Some(options[0].clone()),
                Some(options[1].clone())
            ])),
            resolve_selection(Some("A,B"), None, Some(options.as_slice()), &all())
        );
    }

    #[test]
    fn resolve_multi_value_with_holes() {
        let options = options();
        assert_eq!(
            Some(Selection::Multi(vec![
                Some(options[0].clone()),
                None,
                Some(options[2].clone())
            ])),
            resolve_selection(Some("A,Z,see"), None, Some(options.as_slice()), &all())
        );
    }

    #[test]
    fn resolve_single_value() {
        let options = options();
        assert_eq!(
            Some(Selection::Single(options[1].clone())),
            resolve_selection(Some("BB"), None, Some(options.as_slice()), &all())
        );
        assert_eq!(
            Some(Selection::Single(options[0].clone())),
            resolve_selection(Some("Option A"), None, Some(options.as_slice()), &all())
        );
    }

    #[test]
    fn resolve_unmatched_single_value() {
        let options = options();
        let default = Selection::AllSelected(all());
        assert_eq!(
            None,
            resolve_selection(Some("Z"), Some(&default), Some(options.as_slice()), &all())
        );
        assert_eq!(None, resolve_selection(Some("A"), Some(&default), None, &all()));
    }

    #[test]
    fn next_query_value_unions_plain_options() {
        let picked = vec![
            FilterOption::new("A", "A"),
            FilterOption::new("B", "B"),
            FilterOption::new("A again", "A"),
        ];
        assert_eq!(Some("A,B".to_string()), next_query_value(&picked));
    }

    #[test]
    fn next_query_value_drops_deselected_override() {
        // The user had "all selected" and then picked two plain options.
        let picked = vec![
            FilterOption::new("All selected", ALL_SELECTED).overriding(),
            FilterOption::new("A", "A"),
            FilterOption::new("B", "B"),
        ];
        assert_eq!(Some("A,B".to_string()), next_query_value(&picked));
    }

    #[test]
    fn next_query_value_override_replaces() {
        let picked = vec![
            FilterOption::new("A", "A"),
            FilterOption::new("top 10", "1,2,3").overriding(),
        ];
        assert_eq!(Some("1,2,3".to_string()), next_query_value(&picked));
    }

    #[test]
    fn next_query_value_nothing_picked() {
        assert_eq!(None, next_query_value(&[]));
    }
}
