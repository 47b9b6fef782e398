pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

use crate::domain::error::Result;
use crate::infrastructure::bootstrap::{load_config, setup};
use crate::infrastructure::config::{AppConfig, ConfigService};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn run() -> Result<()> {
    let config = match load_config(&ConfigService::default()) {
        Ok(config) => {
            init_tracing(&config.log_level);
            config
        }
        Err(err) => {
            init_tracing("info");
            error!(error = %err, "Falling back to default configuration");
            AppConfig::default()
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let context = setup(config)?;
        info!("Starting demo session");
        let outcome = interfaces::demo::run_session(&context).await;
        if let Err(err) = &outcome {
            error!(error = %err, "Demo session failed");
        }
        for entry in context.notifications.entries() {
            info!(
                time = %entry.time,
                severity = %entry.severity,
                "{}",
                entry.message
            );
        }
        outcome
    })
}
