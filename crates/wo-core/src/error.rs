//! Configuration errors
//!
//! Runtime failures carry their own error types at each layer (repository,
//! import, API); the only error minted here is for rejected configuration
//! values.

use thiserror::Error;

/// A set-but-unparseable environment variable
#[derive(Debug, Error)]
#[error("invalid value for {name}: {value:?}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_the_variable() {
        let err = ConfigError {
            name: "PORT",
            value: "eighty".into(),
        };
        assert_eq!(err.to_string(), "invalid value for PORT: \"eighty\"");
    }
}
