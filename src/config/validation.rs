use super::{AppConfig, ConfigError};
use crate::pool::{is_valid_pool_size, MAX_POOL_SIZE};

const VALID_LOG_LEVELS: [&str; 6] = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL", "DISABLED"];

/// Validate the full application config, returning an error if any rule is violated.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] when any configuration invariant is violated.
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    validate_pool_config(config)?;
    validate_output_config(config)?;
    validate_log_level(config)?;
    Ok(())
}

fn validation_err(msg: impl Into<String>) -> ConfigError {
    ConfigError::Validation(msg.into())
}

fn validate_pool_config(config: &AppConfig) -> Result<(), ConfigError> {
    let size = config.pool.size;
    if !is_valid_pool_size(size) {
        return Err(validation_err(format!(
            "pool.size must be a power of two between 1 and {MAX_POOL_SIZE}, got {size}"
        )));
    }
    Ok(())
}

fn validate_output_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.output.count == 0 {
        return Err(validation_err("output.count must be greater than 0"));
    }
    Ok(())
}

fn validate_log_level(config: &AppConfig) -> Result<(), ConfigError> {
    if !VALID_LOG_LEVELS.contains(&config.features.log_level.to_uppercase().as_str()) {
        return Err(validation_err(format!(
            "log_level must be one of {VALID_LOG_LEVELS:?}"
        )));
    }
    Ok(())
}
