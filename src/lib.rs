//! This crate derives the filter state of an emissions dashboard. Given category metadata
//! (locations, sectors, gases and data sources), an emissions dataset and the URL query state, it
//! computes the dropdown options of every filter field, the active selection of each field, and
//! the grouping dimension and metric behind the break-by selection.
//!
//! The derivation is a graph of memoised selectors ([selectors::FilterSelectors]). Each derived
//! value is recomputed only when the identity of one of its inputs changes, so repeated requests
//! for the same data snapshot and query are served from the cache.
//!
//! The derivation is hosted in a small HTTP service built on a number of open source components.
//!
//! * [Tokio](tokio), the most popular asynchronous Rust runtime.
//! * [Axum](axum) web framework, built by the Tokio team, on top of the [hyper] HTTP library.
//! * [Serde](serde) performs (de)serialisation of JSON request and response data.
//! * [validator] checks uploaded metadata and emissions data.
//! * [prometheus] exposes request and recomputation metrics.

pub mod app;
pub mod app_state;
pub mod break_by;
pub mod cli;
pub mod config;
pub mod constraints;
pub mod defaults;
pub mod error;
pub mod memo;
pub mod metrics;
pub mod models;
pub mod options;
pub mod selection;
pub mod selectors;
pub mod server;
#[cfg(test)]
pub mod test_utils;
pub mod top_emitters;
pub mod tracing;
pub mod validated_json;
