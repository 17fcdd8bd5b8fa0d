use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info};

use token_console::api::TokenApiClient;
use token_console::transport::{HttpTransport, QueryPayload};
use token_console::utils::config_loader;
use token_console::utils::logging::{self, LogLevel};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "token-console.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// Payload as a JSON object
    #[arg(long, global = true)]
    data: Option<String>,
    /// Extra payload field, key=value; repeatable, overrides --data
    #[arg(long = "field", global = true)]
    fields: Vec<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// List tokens matching the payload filter
    List,
    /// Create a token
    Create,
    /// Delete a token
    Delete,
    /// Print the curl command for a token
    Curl,
    /// Enable or disable a token
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args, load YAML config
    // -------------------------------

    let args = Args::parse();
    let client_config = config_loader::run(&args.config)?;
    logging::run(&client_config, args.log_level);

    // -------------------------------
    // 2. Build transport and client
    // -------------------------------

    let transport = HttpTransport::from_config(&client_config)?;
    info!("console: {}", transport.base_url());
    let client = TokenApiClient::new(transport, client_config.endpoints.clone());

    // -------------------------------
    // 3. Run the operation
    // -------------------------------

    let payload = build_payload(args.data.as_deref(), &args.fields)?;
    debug!("command {:?}, payload fields {:?}", args.command, payload.keys().collect::<Vec<_>>());

    let result = match args.command {
        Command::List => client.list(&payload).await,
        Command::Create => client.create(&payload).await,
        Command::Delete => client.delete_token(&payload).await,
        Command::Curl => client.copy_curl(&payload).await,
        Command::Status => client.update_token_status(&payload).await,
    }?;

    match result {
        Value::String(text) => println!("{}", text),
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }
    Ok(())
}

fn build_payload(data: Option<&str>, fields: &[String]) -> Result<QueryPayload> {
    let mut payload = match data {
        Some(raw) => match serde_json::from_str::<Value>(raw).context("--data is not valid JSON")? {
            Value::Object(map) => map,
            _ => return Err(anyhow!("--data must be a JSON object")),
        },
        None => QueryPayload::new(),
    };

    for field in fields {
        let (key, value) = field
            .split_once('=')
            .ok_or_else(|| anyhow!("--field '{}' must be key=value", field))?;
        payload.insert(key.to_owned(), Value::String(value.to_owned()));
    }
    Ok(payload)
}
