//! resgate gateway server.
//!
//! # Architecture Overview
//!
//! ```text
//!   argv ──▶ config::args ──▶ config::resolve ◀──▶ config file
//!                                   │
//!                                   ▼
//!                            Config (immutable)
//!                                   │
//!                                   ▼
//!   signals ───────────────▶ lifecycle::Lifecycle
//!                              │  build → start → wait → stop (10s deadline)
//!                              ▼
//!                         gateway::GatewayService
//!                              │
//!                              ▼
//!                       http router (WebSocket, web resources, CORS)
//! ```

use std::process::ExitCode;

use resgate::config::defaults::{PROTOCOL_VERSION, VERSION};
use resgate::config::options::usage;
use resgate::config::{self, Config, FileStore, Invocation};
use resgate::lifecycle::{signals, Lifecycle, LifecycleError};
use resgate::observability::logging;
use resgate::GatewayService;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match config::args::parse(std::env::args_os()) {
        Ok(Invocation::Run(cli)) => cli,
        Ok(Invocation::Help) => {
            println!("{}", usage());
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Version) => {
            println!("resgate  v{VERSION}\nprotocol v{PROTOCOL_VERSION}");
            return ExitCode::SUCCESS;
        }
        Err(e) => return fail(&e.to_string(), e.show_usage()),
    };

    let logging = logging::init();

    let config = match config::resolve(Config::default(), &cli, &FileStore) {
        Ok(config) => config,
        Err(e) => return fail(&e.to_string(), e.show_usage()),
    };
    logging.apply(config.debug, config.trace);

    tracing::info!(
        version = VERSION,
        protocol = PROTOCOL_VERSION,
        "resgate starting"
    );

    let termination = match signals::termination() {
        Ok(termination) => termination,
        Err(e) => return fail(&format!("Failed to install signal handlers: {e}"), false),
    };

    match Lifecycle::new()
        .run(GatewayService::new(&config), termination)
        .await
    {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(LifecycleError::ShutdownTimeout(deadline)) => {
            tracing::error!(deadline = ?deadline, "Shutdown timed out");
            eprintln!("Shutdown timed out");
            std::process::abort()
        }
        Err(e) => fail(&e.to_string(), false),
    }
}

/// Report a fatal error on stderr.
fn fail(message: &str, show_usage: bool) -> ExitCode {
    eprintln!("{message}");
    if show_usage {
        eprintln!("{}", usage());
    }
    ExitCode::FAILURE
}
