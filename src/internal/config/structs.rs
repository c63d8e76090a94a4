pub mod config_error;
pub mod env_config;
pub mod fetch_config;

pub use config_error::ConfigError;
pub use env_config::EnvConfig;
pub use fetch_config::FetchConfig;
