//! Memoised selector graph.
//!
//! [FilterSelectors] wires the option builder, the top emitters aggregator, the defaults and
//! selection resolvers, the cross-field constraint and the decomposer into one derivation. Each
//! derived value lives in its own [Memo] cell keyed by the identity of its inputs, so a new query
//! only recomputes the query-dependent cells, and a new metadata or emissions snapshot only
//! recomputes the cells downstream of it.

use crate::break_by::{self, BreakBy};
use crate::config::FilterConfig;
use crate::constraints::constrain_sector;
use crate::defaults::defaults;
use crate::memo::Memo;
use crate::models::{
    Api, EmissionsData, FilterField, FilterOption, FilterOptions, FilterQuery, MetaField,
    Metadata, SelectedOptions, Selection,
};
use crate::options::{field_options, find_option, national_option, OptionContext, OPTION_KEYS};
use crate::selection::resolve_selection;
use crate::top_emitters::{expand_top_emitters, top_emitters_option};

use hashbrown::HashMap;
use serde::Serialize;
use std::sync::Arc;

type OptionList = Option<Vec<FilterOption>>;

/// Inputs of a derivation
#[derive(Clone, Debug, Default)]
pub struct FilterInputs {
    /// Category metadata snapshot, if loaded
    pub metadata: Option<Arc<Metadata>>,
    /// Emissions snapshot, if loaded
    pub emissions: Option<Arc<EmissionsData>>,
    /// URL query state
    pub query: Arc<FilterQuery>,
}

/// Derived filter state
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Derivation {
    pub options: Arc<FilterOptions>,
    pub selected: Arc<SelectedOptions>,
    pub break_by: Arc<BreakBy>,
    /// Locations behind the top emitters region option
    pub top_emitters: Arc<OptionList>,
}

/// The selector graph
pub struct FilterSelectors {
    config: Arc<FilterConfig>,
    national: Memo<Option<Arc<Metadata>>, Option<FilterOption>>,
    top_emitters: Memo<(Option<Arc<EmissionsData>>, Option<Arc<Metadata>>), Option<FilterOption>>,
    region_options: Memo<
        (
            Option<Arc<Metadata>>,
            Arc<Option<FilterOption>>,
            Arc<Option<FilterOption>>,
        ),
        OptionList,
    >,
    sector_options: Memo<(Option<Arc<Metadata>>, Api), OptionList>,
    gas_options: Memo<Option<Arc<Metadata>>, OptionList>,
    options: Memo<(Arc<OptionList>, Arc<OptionList>, Arc<OptionList>), FilterOptions>,
    defaults: Memo<(Arc<FilterOptions>, Arc<Option<FilterOption>>), SelectedOptions>,
    selected: Memo<(Arc<FilterQuery>, Arc<FilterOptions>, Arc<SelectedOptions>), SelectedOptions>,
    break_by: Memo<Arc<SelectedOptions>, BreakBy>,
    expanded_top_emitters: Memo<(Arc<Option<FilterOption>>, Option<Arc<Metadata>>), OptionList>,
}

impl FilterSelectors {
    /// Return a new FilterSelectors with empty cells
    pub fn new(config: Arc<FilterConfig>) -> Self {
        FilterSelectors {
            config,
            national: Memo::new("national"),
            top_emitters: Memo::new("top_emitters"),
            region_options: Memo::new("region_options"),
            sector_options: Memo::new("sector_options"),
            gas_options: Memo::new("gas_options"),
            options: Memo::new("filter_options"),
            defaults: Memo::new("defaults"),
            selected: Memo::new("selected"),
            break_by: Memo::new("break_by"),
            expanded_top_emitters: Memo::new("expanded_top_emitters"),
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Returns the API serving the data source selected by `query`.
    ///
    /// Falls back to the API of the default source when the query selects no single source.
    pub fn active_api(&self, query: &FilterQuery) -> Api {
        let config = self.config.as_ref();
        let sources = config.source_filter_options();
        let default = find_option(&sources, &config.default_source, &OPTION_KEYS);
        let api_of = |option: &FilterOption| config.api_for_source(&option.value);
        let selected = resolve_selection(
            query.get(FilterField::Source),
            None,
            Some(sources.as_slice()),
            &config.all_selected_option(),
        );
        selected
            .as_ref()
            .and_then(Selection::as_single)
            .and_then(api_of)
            .or_else(|| default.and_then(api_of))
            .unwrap_or(Api::Indo)
    }

    /// Derive the filter state of `inputs`.
    ///
    /// Calling this again with identical inputs returns pointer-equal outputs.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn derive(&mut self, inputs: &FilterInputs) -> Derivation {
        let config = self.config.as_ref();
        let metadata = inputs.metadata.clone();
        let api = self.active_api(&inputs.query);

        let national = self
            .national
            .get_or_compute(metadata.clone(), |metadata| {
                national_option(metadata.as_deref(), config)
            });
        let top_emitters = self.top_emitters.get_or_compute(
            (inputs.emissions.clone(), metadata.clone()),
            |(emissions, metadata)| {
                let locations = metadata
                    .as_deref()
                    .and_then(|metadata| metadata.records(MetaField::Location));
                let emissions = emissions.as_deref().map(|emissions| &**emissions);
                top_emitters_option(emissions, locations, config, None)
            },
        );

        let region_options = self.region_options.get_or_compute(
            (metadata.clone(), national.clone(), top_emitters.clone()),
            |(metadata, national, top_emitters)| {
                let context = OptionContext {
                    config,
                    api,
                    national: (**national).as_ref(),
                    top_emitters: (**top_emitters).as_ref(),
                };
                field_options(metadata.as_deref(), MetaField::Location, &context)
            },
        );
        let sector_options =
            self.sector_options
                .get_or_compute((metadata.clone(), api), |(metadata, api)| {
                    let context = OptionContext {
                        config,
                        api: *api,
                        national: None,
                        top_emitters: None,
                    };
                    field_options(metadata.as_deref(), MetaField::Sector, &context)
                });
        let gas_options = self.gas_options.get_or_compute(metadata.clone(), |metadata| {
            let context = OptionContext {
                config,
                api,
                national: None,
                top_emitters: None,
            };
            field_options(metadata.as_deref(), MetaField::Gas, &context)
        });

        let options = self.options.get_or_compute(
            (region_options, sector_options, gas_options),
            |(region, sector, gas)| FilterOptions {
                source: Some(config.source_filter_options()),
                chart_type: Some(config.chart_type_options.clone()),
                break_by: Some(config.break_by_options.clone()),
                region: (**region).clone(),
                sector: (**sector).clone(),
                gas: (**gas).clone(),
            },
        );
        let defaults = self.defaults.get_or_compute(
            (options.clone(), national),
            |(options, national)| defaults(options, (**national).as_ref(), config),
        );
        let selected = self.selected.get_or_compute(
            (inputs.query.clone(), options.clone(), defaults),
            |(query, options, defaults)| {
                let all_selected = config.all_selected_option();
                let mut selected = SelectedOptions::from_fn(|field| {
                    resolve_selection(
                        query.get(field),
                        defaults.get(field).as_ref(),
                        options.get(field).as_deref(),
                        &all_selected,
                    )
                });
                selected.sector = constrain_sector(
                    selected.sector.take(),
                    options.sector.as_deref(),
                    selected.break_by.as_ref(),
                    config,
                );
                selected
            },
        );
        let break_by = self
            .break_by
            .get_or_compute(selected.clone(), |selected| {
                break_by::decompose(selected.break_by.as_ref())
            });
        let expanded = self.expanded_top_emitters.get_or_compute(
            (top_emitters, metadata),
            |(top_emitters, metadata)| {
                let locations = metadata
                    .as_deref()
                    .and_then(|metadata| metadata.records(MetaField::Location));
                expand_top_emitters((**top_emitters).as_ref(), locations)
            },
        );

        Derivation {
            options,
            selected,
            break_by,
            top_emitters: expanded,
        }
    }

    /// Returns how many times each cell has computed a value.
    pub fn recomputations(&self) -> HashMap<&'static str, u64> {
        HashMap::from([
            ("national", self.national.recomputations()),
            ("top_emitters", self.top_emitters.recomputations()),
            ("region_options", self.region_options.recomputations()),
            ("sector_options", self.sector_options.recomputations()),
            ("gas_options", self.gas_options.recomputations()),
            ("filter_options", self.options.recomputations()),
            ("defaults", self.defaults.recomputations()),
            ("selected", self.selected.recomputations()),
            ("break_by", self.break_by.recomputations()),
            (
                "expanded_top_emitters",
                self.expanded_top_emitters.recomputations(),
            ),
        ])
    }
}
