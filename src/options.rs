//! Option builder.
//!
//! Converts raw metadata fields into normalised [FilterOption] lists. Each metadata field is
//! handled by its own transform, looked up in a strategy table. Data source options come from the
//! configuration rather than the metadata, so that field has no transform.

use crate::config::FilterConfig;
use crate::models::{Api, CategoryRecord, FilterOption, MetaField, Metadata};

/// Keys by which an option or record can be matched
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FindBy {
    Value,
    Name,
    Label,
    Code,
    IsoCode3,
}

/// Key precedence used when matching query values against options.
pub const OPTION_KEYS: [FindBy; 4] = [FindBy::Value, FindBy::Name, FindBy::Label, FindBy::Code];

/// Trait for items that can be looked up by [FindBy] keys.
pub trait Findable {
    /// Returns the string form of a key, if the item has it.
    fn key(&self, by: FindBy) -> Option<&str>;
}

impl Findable for FilterOption {
    fn key(&self, by: FindBy) -> Option<&str> {
        match by {
            FindBy::Value => Some(&self.value),
            FindBy::Name => self.name.as_deref(),
            FindBy::Label => Some(&self.label),
            FindBy::Code => self.code.as_deref(),
            FindBy::IsoCode3 => None,
        }
    }
}

impl Findable for CategoryRecord {
    fn key(&self, by: FindBy) -> Option<&str> {
        match by {
            FindBy::Value => Some(&self.value),
            FindBy::Name => None,
            FindBy::Label => Some(&self.label),
            FindBy::Code => self.code.as_deref(),
            FindBy::IsoCode3 => self.iso_code3.as_deref(),
        }
    }
}

/// Find the item matching `needle`.
///
/// Keys are tried in the order given; for each key the first matching item wins. The lookup is
/// key-major: an option matching on a higher-precedence key beats an earlier option that only
/// matches on a lower one, unlike a scan that stops at the first option matching any key.
///
/// # Arguments
///
/// * `items`: Items to search
/// * `needle`: Value to look for
/// * `keys`: Keys to compare, highest precedence first
pub fn find_option<'a, T: Findable>(
    items: &'a [T],
    needle: &str,
    keys: &[FindBy],
) -> Option<&'a T> {
    keys.iter()
        .find_map(|by| items.iter().find(|item| item.key(*by) == Some(needle)))
}

/// Inputs shared by the per-field option transforms
pub struct OptionContext<'a> {
    pub config: &'a FilterConfig,
    /// API serving the selected data source
    pub api: Api,
    /// Synthetic whole-country region option
    pub national: Option<&'a FilterOption>,
    /// Synthetic top emitters region option
    pub top_emitters: Option<&'a FilterOption>,
}

/// Transform from the records of one metadata field to options.
pub type OptionTransform = fn(&[CategoryRecord], &OptionContext<'_>) -> Vec<FilterOption>;

/// Per-field option transforms.
const STRATEGIES: [(MetaField, OptionTransform); 3] = [
    (MetaField::Location, location_options as OptionTransform),
    (MetaField::Sector, sector_options as OptionTransform),
    (MetaField::Gas, plain_options as OptionTransform),
];

/// Returns the transform registered for a metadata field, if it has one.
pub fn strategy(field: MetaField) -> Option<OptionTransform> {
    STRATEGIES
        .iter()
        .find(|(registered, _)| *registered == field)
        .map(|(_, transform)| *transform)
}

/// Build the options of a metadata field.
///
/// Returns `None` when the metadata or the field has not been loaded, so that "not loaded" stays
/// distinguishable from "no options". Fields without a transform also build nothing.
pub fn field_options(
    metadata: Option<&Metadata>,
    field: MetaField,
    context: &OptionContext,
) -> Option<Vec<FilterOption>> {
    let transform = strategy(field)?;
    let records = metadata?.records(field)?;
    Some(transform(records, context))
}

/// Convert a raw record into an option.
///
/// The option code is the first non-empty of ISO code, code and label.
pub fn to_option(record: &CategoryRecord) -> FilterOption {
    let code = [record.iso_code3.as_deref(), record.code.as_deref()]
        .into_iter()
        .flatten()
        .find(|code| !code.is_empty())
        .unwrap_or(record.label.as_str());
    FilterOption::new(&record.label, &record.value).with_code(code)
}

fn plain_options(records: &[CategoryRecord], _context: &OptionContext) -> Vec<FilterOption> {
    records.iter().map(to_option).collect()
}

/// Climate Watch sector lists keep only top-level sectors that aggregate nothing.
fn sector_options(records: &[CategoryRecord], context: &OptionContext) -> Vec<FilterOption> {
    records
        .iter()
        .filter(|record| context.api != Api::Cw || !(record.is_aggregate() || record.has_parent()))
        .map(to_option)
        .collect()
}

/// Locations without the whole-country record, headed by the national and top emitters options.
fn location_options(records: &[CategoryRecord], context: &OptionContext) -> Vec<FilterOption> {
    let country_iso = context.config.country_iso.as_str();
    let synthetic = [context.national, context.top_emitters]
        .into_iter()
        .flatten()
        .cloned();
    let regions = records
        .iter()
        .filter(|record| record.iso_code3.as_deref() != Some(country_iso))
        .map(to_option);
    synthetic.chain(regions).collect()
}

/// Build the synthetic whole-country region option.
///
/// The option takes its value from the location record of the configured country, falling back
/// to the country ISO code when location metadata has no such record.
pub fn national_option(
    metadata: Option<&Metadata>,
    config: &FilterConfig,
) -> Option<FilterOption> {
    let metadata = metadata?;
    let country = metadata
        .records(MetaField::Location)
        .and_then(|locations| find_option(locations, &config.country_iso, &[FindBy::IsoCode3]));
    let value = country.map_or(config.country_iso.as_str(), |record| record.value.as_str());
    Some(
        FilterOption::new(&config.labels.national, value)
            .with_code(&config.country_iso)
            .overriding(),
    )
}
