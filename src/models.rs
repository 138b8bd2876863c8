//! Data types and associated functions and methods

use std::fmt;

use hashbrown::HashSet;
use serde::{de, Deserialize, Deserializer, Serialize};
use strum_macros::Display;
use validator::{Validate, ValidationError, ValidationErrors};

/// Filter fields exposed to the dashboard
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum FilterField {
    /// Data source (and the API behind it)
    Source,
    /// Chart type
    ChartType,
    /// Composite grouping dimension and normalisation metric
    BreakBy,
    /// Region, built from location metadata
    Region,
    /// Emission sector
    Sector,
    /// Greenhouse gas
    Gas,
}

impl FilterField {
    /// Every filter field, in display order.
    pub const ALL: [FilterField; 6] = [
        FilterField::Source,
        FilterField::ChartType,
        FilterField::BreakBy,
        FilterField::Region,
        FilterField::Sector,
        FilterField::Gas,
    ];
}

/// Metadata fields supplied by the metadata source
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[strum(serialize_all = "camelCase")]
pub enum MetaField {
    Location,
    Sector,
    Gas,
    DataSource,
}

impl MetaField {
    pub const ALL: [MetaField; 4] = [
        MetaField::Location,
        MetaField::Sector,
        MetaField::Gas,
        MetaField::DataSource,
    ];
}

/// Data API serving a data source
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Api {
    /// Climate Watch
    Cw,
    /// National (SIGN SMART) inventory
    Indo,
}

/// A selectable labelled value in a filter dropdown
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct FilterOption {
    /// Display label
    pub label: String,
    /// Canonical identifier used in query strings
    pub value: String,
    /// Short code, e.g. an ISO code for locations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Alternative name used when matching query values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Pseudo-option whose selection replaces rather than unions with other selections
    #[serde(
        default,
        rename = "override",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_override: bool,
}

impl FilterOption {
    /// Return a new FilterOption with only a label and value.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        FilterOption {
            label: label.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark the option as an override pseudo-option.
    pub fn overriding(mut self) -> Self {
        self.is_override = true;
        self
    }
}

/// Deserialise a JSON string or number into its string form.
///
/// Category identifiers arrive as integers from some APIs and as strings from others, while query
/// strings always carry text.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumber;

    impl<'de> de::Visitor<'de> for StringOrNumber {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_owned())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<String, E> {
            if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
                Ok((value as i64).to_string())
            } else {
                Ok(value.to_string())
            }
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}

/// A raw category record as supplied by the metadata source
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
pub struct CategoryRecord {
    #[validate(length(min = 1, message = "category label must not be empty"))]
    pub label: String,
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_code3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Sectors aggregated by this sector, if it is an aggregate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregated_sector_ids: Option<Vec<serde_json::Value>>,
    /// Parent sector, if this is a sub-sector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<serde_json::Value>,
}

impl CategoryRecord {
    /// Return a new CategoryRecord with only a label and value.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        CategoryRecord {
            label: label.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_iso_code3(mut self, iso_code3: impl Into<String>) -> Self {
        self.iso_code3 = Some(iso_code3.into());
        self
    }

    /// Returns true if the record aggregates other sectors.
    pub fn is_aggregate(&self) -> bool {
        matches!(&self.aggregated_sector_ids, Some(ids) if !ids.is_empty())
    }

    /// Returns true if the record references a parent category.
    ///
    /// Null, zero, false and empty strings do not count as a reference.
    pub fn has_parent(&self) -> bool {
        match &self.parent_id {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::Number(n)) => n.as_f64() != Some(0.0),
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

/// Category metadata, keyed by field
///
/// A field that has not been loaded is `None`, which is distinct from a loaded field with no
/// records.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
#[validate(schema(function = "validate_metadata"))]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate]
    pub location: Option<Vec<CategoryRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate]
    pub sector: Option<Vec<CategoryRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate]
    pub gas: Option<Vec<CategoryRecord>>,
    #[serde(default, rename = "dataSource", skip_serializing_if = "Option::is_none")]
    #[validate]
    pub data_source: Option<Vec<CategoryRecord>>,
}

impl Metadata {
    /// Returns the records of a metadata field, if loaded.
    pub fn records(&self, field: MetaField) -> Option<&[CategoryRecord]> {
        match field {
            MetaField::Location => self.location.as_deref(),
            MetaField::Sector => self.sector.as_deref(),
            MetaField::Gas => self.gas.as_deref(),
            MetaField::DataSource => self.data_source.as_deref(),
        }
    }
}

/// Validate that category values are unique within each field
fn validate_metadata(metadata: &Metadata) -> Result<(), ValidationError> {
    for field in MetaField::ALL {
        let Some(records) = metadata.records(field) else {
            continue;
        };
        let mut seen = HashSet::new();
        for record in records {
            if !seen.insert(record.value.as_str()) {
                let mut error =
                    ValidationError::new("category values must be unique within a field");
                error.add_param("field".into(), &field.to_string());
                error.add_param("value".into(), &record.value);
                return Err(error);
            }
        }
    }
    Ok(())
}

/// A single year of an emissions time series
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct EmissionPoint {
    pub year: i32,
    pub value: Option<f64>,
}

/// Emissions time series for one region, sector, metric and gas
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
pub struct EmissionRecord {
    /// Region identifier
    #[serde(alias = "location")]
    #[validate(length(min = 1, message = "iso_code3 must not be empty"))]
    pub iso_code3: String,
    #[validate(length(min = 1, message = "sector must not be empty"))]
    pub sector: String,
    #[validate(length(min = 1, message = "metric must not be empty"))]
    pub metric: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    #[serde(default)]
    pub emissions: Vec<EmissionPoint>,
}

impl EmissionRecord {
    /// Cumulative emissions over the whole series. Missing years count as zero.
    pub fn total(&self) -> f64 {
        self.emissions.iter().filter_map(|point| point.value).sum()
    }
}

/// The full emissions dataset
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EmissionsData(pub Vec<EmissionRecord>);

impl Validate for EmissionsData {
    fn validate(&self) -> Result<(), ValidationErrors> {
        for record in &self.0 {
            record.validate()?;
        }
        Ok(())
    }
}

impl std::ops::Deref for EmissionsData {
    type Target = [EmissionRecord];

    fn deref(&self) -> &[EmissionRecord] {
        &self.0
    }
}

/// Raw URL query state, one optional value per filter field
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterQuery {
    pub source: Option<String>,
    pub chart_type: Option<String>,
    pub break_by: Option<String>,
    pub region: Option<String>,
    pub sector: Option<String>,
    pub gas: Option<String>,
}

impl FilterQuery {
    /// Returns the raw query value of a field.
    pub fn get(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Source => self.source.as_deref(),
            FilterField::ChartType => self.chart_type.as_deref(),
            FilterField::BreakBy => self.break_by.as_deref(),
            FilterField::Region => self.region.as_deref(),
            FilterField::Sector => self.sector.as_deref(),
            FilterField::Gas => self.gas.as_deref(),
        }
    }
}

/// The resolved selection of a filter field
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", content = "option", rename_all = "snake_case")]
pub enum Selection {
    /// One option
    Single(FilterOption),
    /// Several options. Query tokens that match no option leave a hole.
    Multi(Vec<Option<FilterOption>>),
    /// No restriction on the field, carrying the option that stands for it
    AllSelected(FilterOption),
}

impl Selection {
    /// Returns the option of a single selection.
    pub fn as_single(&self) -> Option<&FilterOption> {
        match self {
            Selection::Single(option) => Some(option),
            _ => None,
        }
    }
}

/// One value per filter field
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerField<T> {
    pub source: T,
    pub chart_type: T,
    pub break_by: T,
    pub region: T,
    pub sector: T,
    pub gas: T,
}

impl<T> PerField<T> {
    /// Build a PerField by calling `f` once per field.
    pub fn from_fn(mut f: impl FnMut(FilterField) -> T) -> Self {
        PerField {
            source: f(FilterField::Source),
            chart_type: f(FilterField::ChartType),
            break_by: f(FilterField::BreakBy),
            region: f(FilterField::Region),
            sector: f(FilterField::Sector),
            gas: f(FilterField::Gas),
        }
    }

    pub fn get(&self, field: FilterField) -> &T {
        match field {
            FilterField::Source => &self.source,
            FilterField::ChartType => &self.chart_type,
            FilterField::BreakBy => &self.break_by,
            FilterField::Region => &self.region,
            FilterField::Sector => &self.sector,
            FilterField::Gas => &self.gas,
        }
    }
}

/// Option list per field. `None` means the list is not available yet.
pub type FilterOptions = PerField<Option<Vec<FilterOption>>>;

/// Active selection per field. `None` means the selection cannot be resolved yet.
pub type SelectedOptions = PerField<Option<Selection>>;

/// Request body for computing the next query value of a multi-select field
#[derive(Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct QueryValueRequest {
    /// Picked options, most recent last
    pub picked: Vec<FilterOption>,
}

/// Next query value of a multi-select field. `None` clears the field.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct QueryValueResponse {
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;
    use serde_test::{assert_de_tokens, assert_de_tokens_error, assert_tokens, Token};

    #[test]
    fn test_category_record_numeric_value() {
        let record = CategoryRecord::new("Aceh", "11");
        assert_de_tokens(
            &record,
            &[
                Token::Struct {
                    name: "CategoryRecord",
                    len: 2,
                },
                Token::Str("label"),
                Token::Str("Aceh"),
                Token::Str("value"),
                Token::U64(11),
                Token::StructEnd,
            ],
        );
    }

    #[test]
    fn test_category_record_string_value() {
        let record = CategoryRecord::new("Energy", "energy");
        assert_de_tokens(
            &record,
            &[
                Token::Struct {
                    name: "CategoryRecord",
                    len: 2,
                },
                Token::Str("label"),
                Token::Str("Energy"),
                Token::Str("value"),
                Token::Str("energy"),
                Token::StructEnd,
            ],
        );
    }

    #[test]
    fn test_category_record_invalid_value() {
        assert_de_tokens_error::<CategoryRecord>(
            &[
                Token::Struct {
                    name: "CategoryRecord",
                    len: 2,
                },
                Token::Str("label"),
                Token::Str("Energy"),
                Token::Str("value"),
                Token::Bool(true),
                Token::StructEnd,
            ],
            "invalid type: boolean `true`, expected a string or a number",
        )
    }

    #[test]
    fn test_filter_option_tokens() {
        let option = FilterOption::new("top 10", "1,2").overriding();
        assert_tokens(
            &option,
            &[
                Token::Struct {
                    name: "FilterOption",
                    len: 3,
                },
                Token::Str("label"),
                Token::Str("top 10"),
                Token::Str("value"),
                Token::Str("1,2"),
                Token::Str("override"),
                Token::Bool(true),
                Token::StructEnd,
            ],
        );
    }

    #[test]
    fn test_json_metadata() {
        let json = r#"{
            "location": [{"label": "Aceh", "value": 11, "iso_code3": "ID.AC"}],
            "sector": [{"label": "Energy", "value": 1, "aggregated_sector_ids": [], "parent_id": null}],
            "dataSource": [{"label": "SIGN SMART", "value": "SIGN_SMART"}]
        }"#;
        let metadata = serde_json::from_str::<Metadata>(json).unwrap();
        assert_eq!(
            Some(&[CategoryRecord::new("Aceh", "11").with_iso_code3("ID.AC")][..]),
            metadata.records(MetaField::Location)
        );
        let sector = &metadata.records(MetaField::Sector).unwrap()[0];
        assert!(!sector.is_aggregate());
        assert!(!sector.has_parent());
        assert!(metadata.records(MetaField::Gas).is_none());
        assert_eq!(1, metadata.records(MetaField::DataSource).unwrap().len());
        metadata.validate().unwrap();
    }

    #[test]
    fn test_aggregate_and_parent() {
        let json = r#"[
            {"label": "Total", "value": 1, "aggregated_sector_ids": [2, 3]},
            {"label": "Energy", "value": 2, "parent_id": 1},
            {"label": "Waste", "value": 3, "parent_id": 0}
        ]"#;
        let records = serde_json::from_str::<Vec<CategoryRecord>>(json).unwrap();
        assert!(records[0].is_aggregate());
        assert!(!records[0].has_parent());
        assert!(records[1].has_parent());
        assert!(!records[2].has_parent());
    }

    #[test]
    #[should_panic(expected = "category values must be unique within a field")]
    fn test_duplicate_metadata_values() {
        let mut metadata = test_utils::get_test_metadata();
        metadata.gas = Some(vec![
            CategoryRecord::new("CO2", "1"),
            CategoryRecord::new("CH4", "1"),
        ]);
        metadata.validate().unwrap()
    }

    #[test]
    #[should_panic(expected = "category label must not be empty")]
    fn test_empty_metadata_label() {
        let mut metadata = test_utils::get_test_metadata();
        metadata.gas = Some(vec![CategoryRecord::new("", "1")]);
        metadata.validate().unwrap()
    }

    #[test]
    fn test_json_emission_record_location_alias() {
        let json = r#"{"location": "ID.AC", "sector": "Total", "metric": "absolute",
            "emissions": [{"year": 2000, "value": 1.5}, {"year": 2001, "value": null}, {"year": 2002, "value": 2.5}]}"#;
        let record = serde_json::from_str::<EmissionRecord>(json).unwrap();
        assert_eq!("ID.AC", record.iso_code3);
        assert_eq!(4.0, record.total());
        record.validate().unwrap();
    }

    #[test]
    #[should_panic(expected = "metric must not be empty")]
    fn test_invalid_emissions_data() {
        let mut data = test_utils::get_test_emissions(3);
        data.0[1].metric = "".to_string();
        data.validate().unwrap()
    }

    #[test]
    fn test_query_from_urlencoded_field_names() {
        let json = r#"{"breakBy": "sector-per_capita", "chartType": "area", "region": "1,2"}"#;
        let query = serde_json::from_str::<FilterQuery>(json).unwrap();
        assert_eq!(Some("sector-per_capita"), query.get(FilterField::BreakBy));
        assert_eq!(Some("area"), query.get(FilterField::ChartType));
        assert_eq!(Some("1,2"), query.get(FilterField::Region));
        assert_eq!(None, query.get(FilterField::Gas));
    }

    #[test]
    fn test_selection_json() {
        let all = FilterOption::new("All selected", "all-selected").overriding();
        let json = serde_json::to_string(&Selection::AllSelected(all)).unwrap();
        assert_eq!(
            concat!(
                r#"{"type":"all_selected","option":"#,
                r#"{"label":"All selected","value":"all-selected","override":true}}"#
            ),
            json
        );
        let json = serde_json::to_string(&Selection::Multi(vec![
            Some(FilterOption::new("A", "a")),
            None,
        ]))
        .unwrap();
        assert_eq!(
            r#"{"type":"multi","option":[{"label":"A","value":"a"},null]}"#,
            json
        );
    }

    #[test]
    fn test_per_field_from_fn() {
        let fields = PerField::from_fn(|field| field.to_string());
        for field in FilterField::ALL {
            assert_eq!(&field.to_string(), fields.get(field));
        }
        assert_eq!("chartType", fields.chart_type);
    }
}
