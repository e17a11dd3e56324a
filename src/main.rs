//! web-util demo server.
//!
//! Mounts the helpers behind a small axum router:
//!
//! ```text
//! GET  /whoami         → {"remote_addr": ...}
//! POST /echo           → {"value": name, "alphanumeric": ...}   (form or JSON body)
//! GET  /check/{value}  → {"value": ..., "alphanumeric": ...}
//! ```

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};
use tokio::net::TcpListener;

use web_util::config::{load_config, validate_config, ConfigError, TrustMode, UtilConfig};
use web_util::flags::FlagArray;
use web_util::http::HttpServer;
use web_util::observability::logging;

fn cli() -> Command {
    Command::new("web-util")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Demo server for the web-util helpers")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("bind")
                .short('b')
                .long("bind")
                .value_name("ADDR")
                .help("Override server.bind_address"),
        )
        .arg(
            Arg::new("trusted-proxy")
                .long("trusted-proxy")
                .value_name("IP")
                .action(ArgAction::Append)
                .help("Trust X-Forwarded-For from this peer (repeatable)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Override observability.log_level"),
        )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => load_config(path)?,
        None => UtilConfig::default(),
    };

    if let Some(bind) = matches.get_one::<String>("bind") {
        config.server.bind_address = bind.clone();
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.observability.log_level = level.clone();
    }

    let proxies = FlagArray::from_matches(&matches, "trusted-proxy")?;
    if !proxies.is_empty() {
        config.forwarded.trust = TrustMode::Peers;
        config.forwarded.trusted_proxies = proxies.iter().cloned().collect();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability.log_level);

    tracing::info!("web-util v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        trust = ?config.forwarded.trust,
        trusted_proxies = %proxies,
        content_type_match = ?config.body.content_type_match,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.server.bind_address).await?;

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
