use std::sync::Arc;

use tracing::{error, info};

use crate::application::Workbench;
use crate::domain::error::Result;
use crate::infrastructure::config::{AppConfig, ConfigService};
use crate::infrastructure::notifier::{FanoutNotifier, MemoryNotifier, Notifier, TracingNotifier};
use crate::infrastructure::preferences::PreferencesService;
use crate::infrastructure::random;
use crate::infrastructure::scheduler::{Scheduler, TokioScheduler};
use crate::infrastructure::store::seeds::SeedCatalog;
use crate::infrastructure::store::Stores;

/// Everything a front end needs, wired once per process.
pub struct AppContext {
    pub config: AppConfig,
    pub workbench: Workbench,
    pub preferences: PreferencesService,
    pub notifications: MemoryNotifier,
}

pub fn load_config(service: &ConfigService) -> Result<AppConfig> {
    service.load().map_err(|err| {
        error!(
            error = %err,
            config_path = %service.path().display(),
            "Failed to load configuration"
        );
        err
    })
}

pub fn setup(config: AppConfig) -> Result<AppContext> {
    let seeds = SeedCatalog::embedded().map_err(|err| {
        error!(error = %err, "Failed to load seed data");
        err
    })?;
    Ok(setup_with_seeds(config, seeds, TokioScheduler::shared()))
}

pub fn setup_with_seeds(
    config: AppConfig,
    seeds: SeedCatalog,
    scheduler: Arc<dyn Scheduler>,
) -> AppContext {
    let notifications = MemoryNotifier::new();
    let notifier: Arc<dyn Notifier> = Arc::new(FanoutNotifier::new(vec![
        Arc::new(TracingNotifier),
        Arc::new(notifications.clone()),
    ]));

    let stores = Stores::new(seeds, &config.stores, Arc::clone(&scheduler));
    let workbench = Workbench::new(
        stores,
        scheduler,
        random::from_seed(config.random_seed),
        notifier,
        &config,
    );
    let preferences = PreferencesService::new(config.preferences_path.clone());

    info!(
        seeded = config.random_seed.is_some(),
        dark_mode = preferences.dark_mode(),
        "Workbench ready"
    );

    AppContext {
        config,
        workbench,
        preferences,
        notifications,
    }
}
