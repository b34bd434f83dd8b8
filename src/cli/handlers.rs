use std::sync::Arc;

use tracing::{error, info};

use crate::catalog::{CatalogClient, RestCatalogClient};
use crate::cli::commands::{CheckArgs, ProcessArgs, ScanArgs};
use crate::cli::output::OutputFormatter;
use crate::config::PipelineConfig;
use crate::pipeline::SetPipeline;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFIG: i32 = 2;

pub async fn handle_process(args: &ProcessArgs, quiet: bool) -> i32 {
    let pipeline = match build_pipeline(args.dry_run) {
        Ok(pipeline) => pipeline,
        Err(code) => return code,
    };
    let formatter = OutputFormatter::new(args.format.into());

    match pipeline.process_entry(&args.entry_id).await {
        Ok(outcome) => match formatter.format_outcome(&outcome) {
            Ok(text) => {
                if !quiet {
                    println!("{text}");
                }
                EXIT_SUCCESS
            }
            Err(e) => {
                error!("Failed to render output: {}", e);
                EXIT_FAILURE
            }
        },
        Err(e) => {
            error!("Processing failed for '{}': {}", args.entry_id, e);
            eprintln!("Error: {e}");
            EXIT_FAILURE
        }
    }
}

pub async fn handle_check(args: &CheckArgs) -> i32 {
    let pipeline = match build_pipeline(true) {
        Ok(pipeline) => pipeline,
        Err(code) => return code,
    };
    let formatter = OutputFormatter::new(args.format.into());

    match pipeline.check_entry(&args.entry_id).await {
        Ok(report) => match formatter.format_check(&report) {
            Ok(text) => {
                println!("{text}");
                EXIT_SUCCESS
            }
            Err(e) => {
                error!("Failed to render output: {}", e);
                EXIT_FAILURE
            }
        },
        Err(e) => {
            error!("Check failed for '{}': {}", args.entry_id, e);
            eprintln!("Error: {e}");
            EXIT_FAILURE
        }
    }
}

pub async fn handle_scan(args: &ScanArgs) -> i32 {
    let pipeline = match build_pipeline(true) {
        Ok(pipeline) => pipeline,
        Err(code) => return code,
    };
    let formatter = OutputFormatter::new(args.format.into());

    match pipeline.find_unprocessed_sets().await {
        Ok(entries) => {
            info!("Found {} unprocessed set entries", entries.len());
            match formatter.format_scan(&entries) {
                Ok(text) => {
                    println!("{text}");
                    EXIT_SUCCESS
                }
                Err(e) => {
                    error!("Failed to render output: {}", e);
                    EXIT_FAILURE
                }
            }
        }
        Err(e) => {
            error!("Catalog scan failed: {}", e);
            eprintln!("Error: {e}");
            EXIT_FAILURE
        }
    }
}

fn build_pipeline(dry_run: bool) -> Result<SetPipeline, i32> {
    let config = match PipelineConfig::from_env() {
        Ok(config) => config.with_dry_run(dry_run),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            eprintln!("Configuration error: {e}");
            return Err(EXIT_CONFIG);
        }
    };

    let (endpoint, token) = match config.catalog_credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("Missing catalog credentials: {}", e);
            eprintln!("Configuration error: {e}");
            return Err(EXIT_CONFIG);
        }
    };

    let client: Arc<dyn CatalogClient> = Arc::new(RestCatalogClient::with_timeout(
        endpoint.to_string(),
        token.to_string(),
        config.request_timeout,
    ));

    Ok(SetPipeline::new(client, config))
}
