use crate::domain::config::GatewayConfig;
use crate::domain::parameters::{CallParameters, ParamValue};
use crate::error::{GatewayError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Parses a `KEY=VALUE` command-line argument.
///
/// A value is sent as an integer only when it is the canonical decimal form
/// of one, so `007` or `-0` keep their exact text for hashing.
pub fn parse_param(arg: &str) -> std::result::Result<(String, ParamValue), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {arg:?}"))?;
    if key.is_empty() {
        return Err(format!("missing parameter name in {arg:?}"));
    }

    let value = match value.parse::<i64>() {
        Ok(n) if n.to_string() == value => ParamValue::Integer(n),
        _ => ParamValue::Text(value.to_string()),
    };
    Ok((key.to_string(), value))
}

pub fn to_parameters(pairs: Vec<(String, ParamValue)>) -> CallParameters {
    pairs.into_iter().collect()
}

/// Reads gateway options from a JSON file.
pub fn load_options(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| {
        GatewayError::InvalidConfig(format!("{} is not valid JSON: {e}", path.display()))
    })
}

/// Combines file options with command-line overrides into a validated config.
///
/// Flags win over file values. Without a file, an absent `sandbox` flag
/// selects production.
pub fn resolve_config(
    file_options: Option<Value>,
    account_number: Option<String>,
    encryption_key: Option<String>,
    sandbox: Option<bool>,
) -> Result<GatewayConfig> {
    let mut options = match file_options {
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(GatewayError::InvalidConfig(
                "The options must be a JSON object.".to_string(),
            ));
        }
        None => {
            let mut map = Map::new();
            map.insert("sandbox".to_string(), Value::Bool(false));
            map
        }
    };

    if let Some(account_number) = account_number {
        options.insert("accountNumber".to_string(), Value::String(account_number));
    }
    if let Some(encryption_key) = encryption_key {
        options.insert("encryptionKey".to_string(), Value::String(encryption_key));
    }
    if let Some(sandbox) = sandbox {
        options.insert("sandbox".to_string(), Value::Bool(sandbox));
    }

    GatewayConfig::from_options(&Value::Object(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hash::{INITIALIZE8_FIELDS, calculate_hash};
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("price=100").unwrap(),
            ("price".to_string(), ParamValue::Integer(100))
        );
        assert_eq!(
            parse_param("vat=-5").unwrap(),
            ("vat".to_string(), ParamValue::Integer(-5))
        );
        assert_eq!(
            parse_param("description=a=b").unwrap(),
            ("description".to_string(), ParamValue::from("a=b"))
        );
        assert_eq!(
            parse_param("productNumber=007x").unwrap().1,
            ParamValue::from("007x")
        );
        assert_eq!(parse_param("view=").unwrap().1, ParamValue::from(""));
        assert_eq!(parse_param("price=+5").unwrap().1, ParamValue::from("+5"));
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=1").is_err());
    }

    #[test]
    fn test_parse_param_keeps_exact_text() {
        assert_eq!(
            parse_param("orderID=007").unwrap(),
            ("orderID".to_string(), ParamValue::from("007"))
        );
        assert_eq!(parse_param("vat=-0").unwrap().1, ParamValue::from("-0"));
        assert_eq!(
            parse_param("price=99999999999999999999").unwrap().1,
            ParamValue::from("99999999999999999999")
        );

        // The hash covers the digits as typed.
        let (key, value) = parse_param("orderID=007").unwrap();
        let typed = CallParameters::new().with(key, value);
        let literal = CallParameters::new().with("orderID", "007");
        assert_eq!(
            calculate_hash(&typed, INITIALIZE8_FIELDS, "secret"),
            calculate_hash(&literal, INITIALIZE8_FIELDS, "secret")
        );
        assert_eq!(
            calculate_hash(&typed, INITIALIZE8_FIELDS, "secret"),
            "9200c5ccce7a81d50a0d6a34f00ec119"
        );
    }

    #[test]
    fn test_resolve_config_from_flags() {
        let config =
            resolve_config(None, Some("123".into()), Some("secret".into()), Some(true)).unwrap();
        assert_eq!(config, GatewayConfig::new("123", "secret", true).unwrap());

        let production =
            resolve_config(None, Some("123".into()), Some("secret".into()), None).unwrap();
        assert!(!production.sandbox);

        let missing = resolve_config(None, None, Some("secret".into()), None);
        assert!(matches!(missing, Err(GatewayError::InvalidConfig(_))));
    }

    #[test]
    fn test_flags_override_file() {
        let file = json!({"accountNumber": "1", "encryptionKey": "k", "sandbox": false});
        let config = resolve_config(Some(file), Some("2".into()), None, Some(true)).unwrap();
        assert_eq!(config.account_number, "2");
        assert_eq!(config.encryption_key, "k");
        assert!(config.sandbox);
    }

    #[test]
    fn test_flag_selects_production_over_file() {
        let file = json!({"accountNumber": "1", "encryptionKey": "k", "sandbox": true});
        let config = resolve_config(Some(file.clone()), None, None, Some(false)).unwrap();
        assert!(!config.sandbox);

        let kept = resolve_config(Some(file), None, None, None).unwrap();
        assert!(kept.sandbox);
    }

    #[test]
    fn test_file_sandbox_must_be_boolean() {
        let file = json!({"accountNumber": "1", "encryptionKey": "k", "sandbox": "false"});
        assert!(matches!(
            resolve_config(Some(file), None, None, None),
            Err(GatewayError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_options() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"accountNumber": "1", "encryptionKey": "k", "sandbox": true}}"#).unwrap();
        let options = load_options(file.path()).unwrap();
        assert_eq!(options["accountNumber"], "1");

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "{{not json").unwrap();
        assert!(matches!(
            load_options(broken.path()),
            Err(GatewayError::InvalidConfig(_))
        ));

        assert!(matches!(
            load_options(Path::new("/nonexistent/pxorder.json")),
            Err(GatewayError::Io(_))
        ));
    }
}
