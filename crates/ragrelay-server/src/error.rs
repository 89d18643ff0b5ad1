use thiserror::Error;

pub const ENV_PREFIX: &str = "RAGRELAY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Environment variable that sets a dotted configuration key
pub fn to_env_var(field: &str) -> String {
    format!("{}_{}", ENV_PREFIX, field.replace('.', "__").to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_env_var() {
        assert_eq!(to_env_var("index.api_key"), "RAGRELAY_INDEX__API_KEY");
        assert_eq!(to_env_var("index"), "RAGRELAY_INDEX");
    }
}
