// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Interactive relation picker
//!
//! Opens a picker against one collection of the events directory API and
//! prints the final selection as JSON: an id, `""` when nothing is selected,
//! or an id array with `--multi`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use evd_api_contract::{parse_extra_param, ExtraParams, RecordId, ScalarValue};
use evd_client_api::OptionSource;
use evd_config::paths::discover_paths;
use evd_logging::CliLoggingArgs;
use evd_rest_client::{NetworkConfig, RestClient};
use evd_rest_mock_client::MockRestClient;
use evd_tui::picker_loop::run_picker;
use evd_tui::view_model::relation_picker::{DEFAULT_BULK_LIMIT, DEFAULT_SEARCH_LIMIT};
use evd_tui::{PickerProps, RelationPickerViewModel};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "evd-pick", about = "Pick related records from the events directory", version)]
struct Cli {
    /// Collection to pick from, e.g. `tags` or `entities`
    #[arg(long)]
    endpoint: String,

    /// Field label shown above the input
    #[arg(long)]
    label: Option<String>,

    #[arg(long)]
    placeholder: Option<String>,

    /// Allow selecting several records
    #[arg(long)]
    multi: bool,

    /// Ids already bound to the field
    #[arg(long = "value", num_args = 1..)]
    value: Vec<RecordId>,

    /// Extra filter passed with every search, as key=value
    #[arg(long = "extra", value_parser = parse_extra)]
    extra: Vec<(String, ScalarValue)>,

    /// Fetch one bulk page and filter it locally
    #[arg(long)]
    client_side_filtering: bool,

    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Events directory API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Use built-in demo data instead of the network
    #[arg(long)]
    mock: bool,

    /// Additional configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    logging: CliLoggingArgs,
}

fn parse_extra(pair: &str) -> Result<(String, ScalarValue), String> {
    parse_extra_param(pair).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.logging.clone().init("evd-pick", true)?;

    let mut flags: Vec<(&str, String)> = Vec::new();
    if let Some(base_url) = &cli.base_url {
        flags.push(("service-base-url", base_url.clone()));
    }
    if let Some(debounce_ms) = cli.debounce_ms {
        flags.push(("picker.debounce-ms", debounce_ms.to_string()));
    }
    let flag_refs: Vec<(&str, &str)> = flags.iter().map(|(k, v)| (*k, v.as_str())).collect();

    let resolved = evd_config::load_all(&discover_paths(cli.config.as_deref()), &flag_refs)
        .context("loading configuration")?;
    let client_config = resolved.client()?;
    let picker_config = resolved.picker()?;
    debug!(?client_config, ?picker_config, "Configuration loaded");

    let source: Arc<dyn OptionSource> = if cli.mock {
        info!("Using built-in demo data");
        Arc::new(MockRestClient::with_demo_data())
    } else {
        let base_url = client_config.service_base_url.context(
            "no service base URL configured; pass --base-url, set service-base-url, or use --mock",
        )?;
        let mut network = NetworkConfig::new(base_url);
        if let Some(timeout_ms) = client_config.request_timeout_ms {
            network = network.with_timeout_ms(timeout_ms);
        }
        Arc::new(RestClient::new(&network)?)
    };

    let label = cli.label.clone().unwrap_or_else(|| cli.endpoint.clone());
    let mut props = PickerProps::new(label, cli.endpoint.clone())
        .with_extra_params(cli.extra.iter().cloned().collect::<ExtraParams>())
        .with_client_side_filtering(cli.client_side_filtering)
        .with_limits(
            picker_config.search_limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
            picker_config.bulk_limit.unwrap_or(DEFAULT_BULK_LIMIT),
        );
    if let Some(debounce_ms) = picker_config.debounce_ms {
        props = props.with_debounce_ms(debounce_ms);
    }
    if let Some(placeholder) = &cli.placeholder {
        props = props.with_placeholder(placeholder.clone());
    }
    if cli.multi {
        props = props.multi();
    }

    let mut view_model = RelationPickerViewModel::new(props, source);
    view_model.set_value(cli.value.iter().copied());
    view_model.on_change(|change| info!(?change, "Selection changed"));
    view_model.start();

    let selection = run_picker(view_model)
        .await
        .map_err(|e| anyhow::anyhow!("picker failed: {}", e))?;
    println!("{}", serde_json::to_string(&selection.to_json())?);
    Ok(())
}
