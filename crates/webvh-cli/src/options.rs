// Proof option parsing for the --proof flag
//
// Each flag is a key=value pair merged over the registry's default proof
// options. The literal value `null` resets a key to its default.

use anyhow::{anyhow, Result};
use serde_json::{Map, Value};

/// Parses `key=value` strings into a proof options mapping.
///
/// ```text
/// proofPurpose=authentication  -> {"proofPurpose": "authentication"}
/// created=2026-01-30T12:00:00Z -> {"created": "2026-01-30T12:00:00Z"}
/// proofPurpose=null            -> {"proofPurpose": null}
/// ```
pub fn parse_proof_options(args: &[String]) -> Result<Map<String, Value>> {
    let mut options = Map::new();

    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid proof option: '{}'. Expected 'key=value'", arg))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(anyhow!("Empty key in proof option: '{}'", arg));
        }

        let value = match value.trim() {
            "null" => Value::Null,
            other => Value::String(other.to_string()),
        };
        options.insert(key.to_string(), value);
    }

    Ok(options)
}

/// Splits comma-separated attribute names, dropping blanks.
pub fn parse_attr_names(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_simple_key_value() {
        let result = parse_proof_options(&strings(&["proofPurpose=authentication"])).unwrap();
        assert_eq!(result["proofPurpose"], "authentication");
    }

    #[test]
    fn test_null_resets() {
        let result = parse_proof_options(&strings(&["proofPurpose=null"])).unwrap();
        assert!(result["proofPurpose"].is_null());
    }

    #[test]
    fn test_value_with_equals_sign() {
        let result = parse_proof_options(&strings(&["domain=a=b"])).unwrap();
        assert_eq!(result["domain"], "a=b");
    }

    #[test]
    fn test_later_flag_wins() {
        let result = parse_proof_options(&strings(&["proofPurpose=a", "proofPurpose=b"])).unwrap();
        assert_eq!(result["proofPurpose"], "b");
    }

    #[test]
    fn test_invalid_format() {
        let err = parse_proof_options(&strings(&["no_equals_sign"])).unwrap_err();
        assert!(err.to_string().contains("Expected 'key=value'"));

        let err = parse_proof_options(&strings(&["  =value"])).unwrap_err();
        assert!(err.to_string().contains("Empty key"));
    }

    #[test]
    fn test_whitespace_trimming() {
        let result = parse_proof_options(&strings(&["  created  =  2026-01-30T12:00:00Z  "])).unwrap();
        assert_eq!(result["created"], "2026-01-30T12:00:00Z");
    }

    #[test]
    fn test_attr_names() {
        assert_eq!(
            parse_attr_names(&strings(&["name, age", "email", ","])),
            vec!["name", "age", "email"]
        );
    }
}
