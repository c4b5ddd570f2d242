use crate::error::{GatewayError, Result};
use serde_json::Value;

/// Merchant credentials and environment selection for the PxOrder service.
///
/// Immutable once validated; an [`OrderGatewayClient`](crate::application::client::OrderGatewayClient)
/// refuses to start with an invalid config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub account_number: String,
    pub encryption_key: String,
    pub sandbox: bool,
}

impl GatewayConfig {
    /// Creates a validated config.
    pub fn new(
        account_number: impl Into<String>,
        encryption_key: impl Into<String>,
        sandbox: bool,
    ) -> Result<Self> {
        let config = Self {
            account_number: account_number.into(),
            encryption_key: encryption_key.into(),
            sandbox,
        };
        config.validate()?;
        Ok(config)
    }

    /// Builds a config from loosely-typed options such as a parsed JSON file.
    ///
    /// Unlike plain deserialization this reports every problem as
    /// [`GatewayError::InvalidConfig`], and it only accepts a real JSON boolean
    /// for `sandbox` (`"true"` or `1` are rejected).
    pub fn from_options(options: &Value) -> Result<Self> {
        let options = options.as_object().ok_or_else(|| {
            GatewayError::InvalidConfig("The options must be a JSON object.".to_string())
        })?;

        let account_number = required_string(options.get("accountNumber"), "accountNumber")?;
        let encryption_key = required_string(options.get("encryptionKey"), "encryptionKey")?;
        let sandbox = match options.get("sandbox") {
            Some(Value::Bool(sandbox)) => *sandbox,
            _ => {
                return Err(GatewayError::InvalidConfig(
                    "The boolean sandbox option must be set.".to_string(),
                ));
            }
        };

        Self::new(account_number, encryption_key, sandbox)
    }

    /// Rejects blank credentials. `"0"` counts as blank, as it does for the
    /// gateway's own option handling.
    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.account_number) {
            return Err(GatewayError::InvalidConfig(
                "The accountNumber option must be set.".to_string(),
            ));
        }
        if is_blank(&self.encryption_key) {
            return Err(GatewayError::InvalidConfig(
                "The encryptionKey option must be set.".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_blank(value: &str) -> bool {
    value.is_empty() || value == "0"
}

fn required_string(value: Option<&Value>, name: &str) -> Result<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        // Account numbers are often written as bare JSON numbers.
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(GatewayError::InvalidConfig(format!(
            "The {name} option must be set."
        ))),
    }
}
