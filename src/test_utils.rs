use crate::config::FilterConfig;
use crate::models::*;
use crate::options::{field_options, national_option, OptionContext};

/// Create a FilterConfig with the default settings.
pub(crate) fn get_test_config() -> FilterConfig {
    FilterConfig::default()
}

/// Create a Metadata object with every field set.
///
/// Locations hold the whole-country record (value `100`) followed by twelve provinces with values
/// `1` to `12` and ISO codes `ID.01` to `ID.12`. Sectors include a sub-sector and an aggregate.
pub(crate) fn get_test_metadata() -> Metadata {
    let mut location = vec![CategoryRecord::new("Indonesia", "100").with_iso_code3("IDN")];
    location.extend(
        (1..=12).map(|i| {
            CategoryRecord::new(format!("Province {}", i), i.to_string())
                .with_iso_code3(format!("ID.{:02}", i))
        }),
    );
    let mut sub_sector = CategoryRecord::new("Energy Industries", "4");
    sub_sector.parent_id = Some(2.into());
    let mut aggregate = CategoryRecord::new("Total excluding LUCF", "5");
    aggregate.aggregated_sector_ids = Some(vec![2.into(), 3.into()]);
    Metadata {
        location: Some(location),
        sector: Some(vec![
            CategoryRecord::new("Total", "1"),
            CategoryRecord::new("Energy", "2"),
            CategoryRecord::new("Agriculture", "3"),
            sub_sector,
            aggregate,
        ]),
        gas: Some(vec![
            CategoryRecord::new("All GHG", "1"),
            CategoryRecord::new("CO2", "2"),
            CategoryRecord::new("CH4", "3"),
        ]),
        data_source: Some(vec![
            CategoryRecord::new("SIGN SMART", "1"),
            CategoryRecord::new("CAIT", "2"),
        ]),
    }
}

fn get_test_record(iso: &str, sector: &str, metric: &str, value: f64) -> EmissionRecord {
    EmissionRecord {
        iso_code3: iso.to_string(),
        sector: sector.to_string(),
        metric: metric.to_string(),
        gas: Some("All GHG".to_string()),
        emissions: vec![
            EmissionPoint {
                year: 2000,
                value: Some(value),
            },
            EmissionPoint {
                year: 2001,
                value: Some(value),
            },
        ],
    }
}

/// Create an EmissionsData object covering `regions` provinces.
///
/// Province `k` has a cumulative absolute total of `10 * k`. Provinces are listed in reverse
/// order, each with an additional per capita record, and the whole-country record comes last.
pub(crate) fn get_test_emissions(regions: usize) -> EmissionsData {
    let mut records = Vec::new();
    for k in (1..=regions).rev() {
        let iso = format!("ID.{:02}", k);
        records.push(get_test_record(&iso, "Total", "per_capita", 1000.0 - k as f64));
        records.push(get_test_record(&iso, "Total", "absolute", 5.0 * k as f64));
    }
    records.push(get_test_record("IDN", "Total", "absolute", 1.0e6));
    EmissionsData(records)
}

/// Create a FilterOptions object from the test metadata, using the national inventory API and no
/// top emitters option.
pub(crate) fn get_test_filter_options(config: &FilterConfig) -> FilterOptions {
    let metadata = get_test_metadata();
    let national = national_option(Some(&metadata), config);
    let context = OptionContext {
        config,
        api: Api::Indo,
        national: national.as_ref(),
        top_emitters: None,
    };
    FilterOptions {
        source: Some(config.source_filter_options()),
        chart_type: Some(config.chart_type_options.clone()),
        break_by: Some(config.break_by_options.clone()),
        region: field_options(Some(&metadata), MetaField::Location, &context),
        sector: field_options(Some(&metadata), MetaField::Sector, &context),
        gas: field_options(Some(&metadata), MetaField::Gas, &context),
    }
}
