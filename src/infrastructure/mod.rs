pub mod bootstrap;
pub mod config;
pub mod notifier;
pub mod preferences;
pub mod random;
pub mod scheduler;
pub mod store;
