//! Integration tests for the bucket browser, run against real sled stores

mod test_utils;

mod browse_scenarios;
mod config_layers;
mod export_files;
mod mutation_scenarios;
mod open_errors;
mod read_only;
mod reload_recovery;
