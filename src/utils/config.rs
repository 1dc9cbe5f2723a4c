/******************************************************************************
   Author: Hub Sync Contributors
   Date: 19/10/26
******************************************************************************/
use crate::error::AppError;
use std::env;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::error;

/// Gets an environment variable or returns a default value if not found or cannot be parsed
///
/// # Arguments
///
/// * `env_var` - The name of the environment variable
/// * `default` - The default value to use if the environment variable is not found or cannot be parsed
pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

/// Gets an environment variable and parses it, returning None if not found, empty or invalid
pub fn get_env_or_none<T: FromStr>(env_var: &str) -> Option<T>
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) if !val.trim().is_empty() => val.parse::<T>().ok(),
        _ => None,
    }
}

/// Gets a non-empty environment variable or fails with [`AppError::InvalidInput`]
pub fn get_env_required(env_var: &str) -> Result<String, AppError> {
    get_env_or_none::<String>(env_var)
        .ok_or_else(|| AppError::InvalidInput(format!("{env_var} is not set")))
}
