//! Pure financial projection math (FIRE targets, real returns, savings and
//! debt schedules, goal outlooks, subscription gating) with a small CLI and
//! HTTP JSON surface.

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber once. `RUST_LOG` overrides the
/// default `finance_engine=info` directive.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("finance_engine=info"));

        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    });
}
