//! Typed access to the user configuration handed to a pipeline
//!
//! Hosts pass configuration as an arbitrary JSON value. Contexts decode the parts they
//! understand into their own `serde` types with [`parse_configuration`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// The configuration value does not have the shape a context expects
#[derive(Debug, Error)]
#[error("invalid configuration for {target}: {source}")]
pub struct ConfigurationError {
    /// Type the configuration was decoded into
    pub target: &'static str,
    #[source]
    pub source: serde_json::Error,
}

/// Decodes `configuration` into `T`
///
/// A `null` configuration is read as an empty object, so a type whose fields all carry
/// `#[serde(default)]` accepts a host that passes no configuration at all.
pub fn parse_configuration<T: DeserializeOwned>(configuration: &Value) -> Result<T, ConfigurationError> {
    let result = match configuration {
        Value::Null => serde_json::from_value(Value::Object(Default::default())),
        other => T::deserialize(other),
    };
    result.map_err(|source| ConfigurationError {
        target: std::any::type_name::<T>(),
        source,
    })
}
