pub mod load_env_config;

pub use load_env_config::{load_env_config, load_process_env_config, output_name_from_url};
