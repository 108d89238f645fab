use thiserror::Error;

/// Errors raised while reading process environment variables.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The variable is not set.
    #[error("Missing environment variable: {0}")]
    Missing(String),

    /// The variable is set but is empty or only whitespace.
    #[error("Environment variable {0} is empty")]
    Empty(String),

    /// The variable is set but does not hold valid unicode.
    #[error("Environment variable {0} is not valid unicode")]
    NotUnicode(String),
}

/// Reads a required environment variable.
///
/// Surrounding whitespace is trimmed; a blank value is reported as
/// [`EnvError::Empty`] so a credential exported as `""` fails early
/// instead of reaching the remote API.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, EnvError> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => Err(EnvError::Empty(name.to_string())),
        Ok(value) => Ok(value.trim().to_string()),
        Err(std::env::VarError::NotPresent) => Err(EnvError::Missing(name.to_string())),
        Err(std::env::VarError::NotUnicode(_)) => Err(EnvError::NotUnicode(name.to_string())),
    }
}
