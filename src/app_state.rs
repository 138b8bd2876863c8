use crate::cli::CommandLineArgs;
use crate::config::FilterConfig;
use crate::error::FilterError;
use crate::models::{EmissionsData, FilterQuery, Metadata};
use crate::selectors::{Derivation, FilterInputs, FilterSelectors};

use expanduser::expanduser;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{event, Level};
use validator::Validate;

/// The latest metadata and emissions snapshots.
#[derive(Clone, Debug, Default)]
pub struct DataSnapshot {
    pub metadata: Option<Arc<Metadata>>,
    pub emissions: Option<Arc<EmissionsData>>,
}

/// Shared application state passed to each request handler.
pub struct AppState {
    /// Command line arguments.
    pub args: CommandLineArgs,

    /// Filter derivation configuration.
    pub config: Arc<FilterConfig>,

    /// Data snapshot, replaced as a whole on upload.
    data: RwLock<DataSnapshot>,

    /// Memoised selector graph.
    selectors: Mutex<FilterSelectors>,
}

/// Read, parse and validate a JSON data file.
fn load_data_file<T>(path: &str) -> Result<T, FilterError>
where
    T: DeserializeOwned + Validate,
{
    let abs_path = expanduser(path).map_err(|source| FilterError::DataFileRead {
        path: path.to_string(),
        source,
    })?;
    let contents =
        std::fs::read_to_string(&abs_path).map_err(|source| FilterError::DataFileRead {
            path: path.to_string(),
            source,
        })?;
    let value: T =
        serde_json::from_str(&contents).map_err(|source| FilterError::DataFileParse {
            path: path.to_string(),
            source,
        })?;
    value
        .validate()
        .map_err(|source| FilterError::DataFileValidation {
            path: path.to_string(),
            source,
        })?;
    event!(Level::INFO, path, "loaded data file");
    Ok(value)
}

impl AppState {
    /// Create and return an [AppState].
    ///
    /// Loads the initial metadata and emissions snapshots from the files named in `args`, if any.
    pub fn new(args: &CommandLineArgs) -> Result<Self, FilterError> {
        let config = Arc::new(FilterConfig::from(args));
        let metadata = match &args.metadata_file {
            Some(path) => Some(Arc::new(load_data_file::<Metadata>(path)?)),
            None => None,
        };
        let emissions = match &args.emissions_file {
            Some(path) => Some(Arc::new(load_data_file::<EmissionsData>(path)?)),
            None => None,
        };
        Ok(Self::with_data(
            args,
            config,
            DataSnapshot {
                metadata,
                emissions,
            },
        ))
    }

    /// Create and return an [AppState] holding `data`.
    pub fn with_data(
        args: &CommandLineArgs,
        config: Arc<FilterConfig>,
        data: DataSnapshot,
    ) -> Self {
        Self {
            args: args.clone(),
            selectors: Mutex::new(FilterSelectors::new(config.clone())),
            config,
            data: RwLock::new(data),
        }
    }

    /// Returns the current data snapshot.
    pub fn snapshot(&self) -> Result<DataSnapshot, FilterError> {
        self.data
            .read()
            .map(|data| data.clone())
            .map_err(|_| FilterError::StatePoisoned { name: "data" })
    }

    /// Replace the metadata snapshot.
    pub fn set_metadata(&self, metadata: Metadata) -> Result<(), FilterError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| FilterError::StatePoisoned { name: "data" })?;
        data.metadata = Some(Arc::new(metadata));
        Ok(())
    }

    /// Replace the emissions snapshot.
    pub fn set_emissions(&self, emissions: EmissionsData) -> Result<(), FilterError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| FilterError::StatePoisoned { name: "data" })?;
        data.emissions = Some(Arc::new(emissions));
        Ok(())
    }

    /// Derive the filter state of `query` against the current data snapshot.
    pub fn derive(&self, query: FilterQuery) -> Result<Derivation, FilterError> {
        let snapshot = self.snapshot()?;
        let inputs = FilterInputs {
            metadata: snapshot.metadata,
            emissions: snapshot.emissions,
            query: Arc::new(query),
        };
        let mut selectors = self
            .selectors
            .lock()
            .map_err(|_| FilterError::StatePoisoned { name: "selector" })?;
        Ok(selectors.derive(&inputs))
    }
}

/// AppState wrapped in an Atomic Reference Count (Arc) to allow multiple references.
pub type SharedAppState = Arc<AppState>;
