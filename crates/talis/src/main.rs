//! Talis server binary.
//!
//! One executable, two processes: `talis portal` owns the client sockets and
//! listens on the bus address, `talis game` connects to it and runs the game.
//! The game process can be restarted while the portal keeps clients
//! connected.

mod cli;
mod commands;
mod config;
mod logging;
mod signals;

use anyhow::anyhow;
use cli::{CliArgs, Role};
use config::AppConfig;
use game_host::{GameHost, MemorySessionStore};
use portal_server::PortalServer;
use session_bus::{BusClient, BusHandle, BusServer};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Runs the portal until `shutdown` fires.
async fn run_portal(config: &AppConfig, shutdown: CancellationToken) -> anyhow::Result<()> {
    let bus = BusHandle::new();
    let server = PortalServer::new(config.to_server_config()?, bus.clone())?;
    let bus_server = BusServer::new(bus, server.bus_handlers());
    let bus_address = config.bus_address()?;

    info!("📋 Portal configuration:");
    info!("  🌐 Cleartext: {}", config.portal.bind_address);
    if config.portal.tls_enabled {
        info!(
            "  🔒 TLS: {} ({})",
            config.portal.tls_bind_address, config.portal.cert_path
        );
    } else {
        info!("  🔒 TLS: disabled");
    }
    info!("  🔗 Bus: {}", bus_address);

    tokio::try_join!(
        async {
            server
                .start(shutdown.clone())
                .await
                .map_err(anyhow::Error::from)
        },
        async {
            bus_server
                .run(bus_address, shutdown.clone())
                .await
                .map_err(anyhow::Error::from)
        },
    )?;

    info!("🛑 Portal stopped");
    Ok(())
}

/// Runs the game process, reconnecting to the portal until `shutdown` fires.
async fn run_game(config: &AppConfig, shutdown: CancellationToken) -> anyhow::Result<()> {
    let bus = BusHandle::new();
    let store = Arc::new(MemorySessionStore::new());
    let host = Arc::new(
        GameHost::new(commands::command_table()?, store, bus.clone())
            .with_welcome(config.game.welcome.clone()),
    );
    let address = config.bus_address()?;
    let delay = Duration::from_millis(config.bus.reconnect_delay_ms);

    info!("🎮 Game ready with {} commands", host.table().len());

    while !shutdown.is_cancelled() {
        let client = BusClient::new(bus.clone(), host.bus_handlers());
        match client.run(address, shutdown.clone()).await {
            Ok(()) => info!("Portal connection closed"),
            Err(e) => warn!("Cannot reach portal at {}: {}", address, e),
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    Ok(())
}

async fn run(args: CliArgs) -> anyhow::Result<()> {
    let mut config = AppConfig::load_from_file(&args.config_path).await?;

    if let Some(bind_address) = args.bind_address {
        config.portal.bind_address = bind_address;
    }
    if let Some(bus_address) = args.bus_address {
        config.bus.address = bus_address;
    }
    if let Some(log_level) = args.log_level {
        config.logging.level = log_level;
    }
    if args.json_logs {
        config.logging.json_format = true;
    }

    config
        .validate()
        .map_err(|e| anyhow!("Configuration validation failed: {e}"))?;

    logging::setup_logging(&config.logging, args.json_logs)?;
    info!(
        "🌟 Talis v{} starting as {:?} | Config: {}",
        env!("CARGO_PKG_VERSION"),
        args.role,
        args.config_path.display()
    );

    let shutdown = CancellationToken::new();
    signals::cancel_on_signal(shutdown.clone());

    match args.role {
        Role::Portal => run_portal(&config, shutdown).await?,
        Role::Game => run_game(&config, shutdown).await?,
    }

    info!("👋 Shutdown complete");
    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let args = CliArgs::parse();

    if let Err(e) = run(args).await {
        error!("❌ {:#}", e);
        eprintln!("❌ Failed to run: {e:#}");
        std::process::exit(1);
    }
}
