#![forbid(unsafe_code)]

use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod session_cli;

/// Installs the stderr subscriber. `RUST_LOG` overrides the default filter,
/// which is `info` for the rando crates and `warn` for everything else.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("warn,rando_tools=info,rando_os=info,rando_engines=info")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
