//! Command Line Interface (CLI) arguments.

use crate::top_emitters::RankOrder;

use clap::Parser;

/// Emission filters command line interface
#[derive(Clone, Debug, Parser)]
pub struct CommandLineArgs {
    /// The IP address on which the server should listen
    #[arg(long, default_value = "0.0.0.0", env = "EMISSION_FILTERS_HOST")]
    pub host: String,
    /// The port to which the server should bind
    #[arg(long, default_value_t = 8080, env = "EMISSION_FILTERS_PORT")]
    pub port: u16,
    /// Flag indicating whether HTTPS should be used
    #[arg(long, default_value_t = false, env = "EMISSION_FILTERS_HTTPS")]
    pub https: bool,
    /// Path to the certificate file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/emission-filters/certs/cert.pem",
        env = "EMISSION_FILTERS_CERT_FILE"
    )]
    pub cert_file: String,
    /// Path to the key file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/emission-filters/certs/key.pem",
        env = "EMISSION_FILTERS_KEY_FILE"
    )]
    pub key_file: String,
    /// Maximum time in seconds to wait for requests to complete upon receiving `ctrl+c` signal.
    #[arg(long, default_value_t = 60, env = "EMISSION_FILTERS_SHUTDOWN_TIMEOUT")]
    pub graceful_shutdown_timeout: u64,
    /// ISO code of the whole-country aggregate location
    #[arg(long, default_value = "IDN", env = "EMISSION_FILTERS_COUNTRY_ISO")]
    pub country_iso: String,
    /// Code of the sector category holding total emissions
    #[arg(long, default_value = "Total", env = "EMISSION_FILTERS_SECTOR_TOTAL")]
    pub sector_total: String,
    /// Which end of the ascending emissions ranking forms the "top 10" option
    #[arg(
        long,
        value_enum,
        default_value_t = RankOrder::Ascending,
        env = "EMISSION_FILTERS_TOP_EMITTERS_ORDER"
    )]
    pub top_emitters_order: RankOrder,
    /// Label of the option meaning "no restriction"
    #[arg(
        long,
        default_value = "All selected",
        env = "EMISSION_FILTERS_ALL_SELECTED_LABEL"
    )]
    pub all_selected_label: String,
    /// Label of the whole-country region option
    #[arg(long, default_value = "National", env = "EMISSION_FILTERS_NATIONAL_LABEL")]
    pub national_label: String,
    /// Label of the top emitters region option
    #[arg(long, default_value = "top 10", env = "EMISSION_FILTERS_TOP_EMITTERS_LABEL")]
    pub top_emitters_label: String,
    /// Optional JSON file holding the initial category metadata
    #[arg(long, env = "EMISSION_FILTERS_METADATA_FILE")]
    pub metadata_file: Option<String>,
    /// Optional JSON file holding the initial emissions dataset
    #[arg(long, env = "EMISSION_FILTERS_EMISSIONS_FILE")]
    pub emissions_file: Option<String>,
}

/// Returns parsed command line arguments.
pub fn parse() -> CommandLineArgs {
    CommandLineArgs::parse()
}
