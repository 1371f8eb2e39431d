//! Fibery bridge CLI
//!
//! Lists and runs the bridge tools against one workspace. Tool output goes
//! to stdout; logs go to stderr.

#![warn(missing_docs)]
#![warn(clippy::all)]

use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use fibery_client::config::{DEFAULT_TIMEOUT, HOST_ENV, TIMEOUT_ENV, TOKEN_ENV};
use fibery_client::{ClientConfig, FiberyClient, WorkspaceApi};
use fibery_core::Command;
use fibery_tool::ToolRegistry;
use serde_json::Value;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "fibery=info";

#[derive(Parser)]
#[command(name = "fibery")]
#[command(about = "Fibery workspace tool bridge - guarded entity tools for one workspace", long_about = None)]
struct Cli {
    /// Workspace host, e.g. acme.fibery.io
    #[arg(long, env = HOST_ENV, global = true)]
    host: Option<String>,

    /// API token
    #[arg(long, env = TOKEN_ENV, global = true, hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = TIMEOUT_ENV, global = true, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available tools
    Tools,
    /// Run a tool
    Call {
        /// Tool name
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
    /// Run one raw command through the command guard
    Command {
        /// Command as JSON, e.g. {"command": "fibery.schema/query", "args": {}}
        #[arg(short, long)]
        json: String,
    },
    /// Print the input schema of a tool
    Schema {
        /// Tool name
        tool: String,
    },
}

impl Cli {
    fn client(&self) -> Result<FiberyClient> {
        let config = ClientConfig::new(
            self.host.clone().unwrap_or_default(),
            self.token.clone().unwrap_or_default(),
        )?
        .with_timeout(Duration::from_secs(self.timeout_secs));
        Ok(FiberyClient::from_config(&config)?)
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let registry = ToolRegistry::standard();

    match &cli.command {
        Commands::Tools => {
            for schema in registry.schemas() {
                println!("{}\t{}", schema.name, schema.description);
            }
            Ok(())
        }
        Commands::Schema { tool } => {
            let tool = registry.get(tool)?;
            println!("{}", serde_json::to_string_pretty(tool.schema())?);
            Ok(())
        }
        Commands::Call { tool, args } => {
            let args: Value = serde_json::from_str(args).map_err(|e| eyre!("invalid --args JSON: {e}"))?;
            let client = cli.client()?;
            let output = registry.call(tool, &client, args).await?;
            println!("{}", output.text);
            if output.is_error {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Command { json } => {
            let command: Command = serde_json::from_str(json).map_err(|e| eyre!("invalid command: {e}"))?;
            let client = cli.client()?;
            let response = client.execute_command(command).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            if !response.success {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
