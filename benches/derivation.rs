/// Benchmarks for filter derivation.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use emission_filters::config::FilterConfig;
use emission_filters::models::{
    CategoryRecord, EmissionPoint, EmissionRecord, EmissionsData, FilterQuery, Metadata,
};
use emission_filters::selectors::{FilterInputs, FilterSelectors};
use std::sync::Arc;

fn get_metadata(regions: usize) -> Metadata {
    let mut location = vec![CategoryRecord::new("Indonesia", "0").with_iso_code3("IDN")];
    location.extend((1..=regions).map(|i| {
        CategoryRecord::new(format!("Province {}", i), i.to_string())
            .with_iso_code3(format!("ID.{:03}", i))
    }));
    let sector = (1..=20)
        .map(|i| CategoryRecord::new(format!("Sector {}", i), i.to_string()))
        .collect();
    let gas = ["All GHG", "CO2", "CH4", "N2O"]
        .iter()
        .enumerate()
        .map(|(i, label)| CategoryRecord::new(*label, i.to_string()))
        .collect();
    Metadata {
        location: Some(location),
        sector: Some(sector),
        gas: Some(gas),
        data_source: None,
    }
}

fn get_emissions(regions: usize, years: i32) -> EmissionsData {
    let mut records = Vec::new();
    for i in 1..=regions {
        let series = [
            ("Total", "absolute"),
            ("Total", "per_capita"),
            ("Energy", "absolute"),
        ];
        for (sector, metric) in series {
            records.push(EmissionRecord {
                iso_code3: format!("ID.{:03}", i),
                sector: sector.to_string(),
                metric: metric.to_string(),
                gas: None,
                emissions: (2000..2000 + years)
                    .map(|year| EmissionPoint {
                        year,
                        value: Some((i as f64) * (year - 1999) as f64),
                    })
                    .collect(),
            });
        }
    }
    EmissionsData(records)
}

fn criterion_benchmark(c: &mut Criterion) {
    let config = Arc::new(FilterConfig::default());
    for regions in [34, 514] {
        let inputs = FilterInputs {
            metadata: Some(Arc::new(get_metadata(regions))),
            emissions: Some(Arc::new(get_emissions(regions, 30))),
            query: Arc::new(FilterQuery {
                break_by: Some("sector-per_capita".to_string()),
                region: Some("1,2,3".to_string()),
                ..Default::default()
            }),
        };
        let name = format!("derive cold({})", regions);
        c.bench_function(&name, |b| {
            b.iter(|| {
                let mut selectors = FilterSelectors::new(config.clone());
                black_box(selectors.derive(&inputs))
            })
        });
        let name = format!("derive memoised({})", regions);
        let mut selectors = FilterSelectors::new(config.clone());
        c.bench_function(&name, |b| b.iter(|| black_box(selectors.derive(&inputs))));
        let name = format!("derive new query({})", regions);
        let mut selectors = FilterSelectors::new(config.clone());
        c.bench_function(&name, |b| {
            b.iter(|| {
                let inputs = FilterInputs {
                    query: Arc::new(FilterQuery {
                        sector: Some("2".to_string()),
                        ..Default::default()
                    }),
                    ..inputs.clone()
                };
                black_box(selectors.derive(&inputs))
            })
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
