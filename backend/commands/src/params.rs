//! Positional parameter parsing.
//!
//! Specs are consumed in declared order, one token each. A pure function
//! of its inputs: no side effects, no clock, no I/O.

use std::collections::HashMap;
use std::time::Duration;

use lingobot_core::ParameterError;

use crate::types::{ParamKind, ParamValue, ParameterSpec};

/// Convert positional tokens into typed values keyed by parameter name.
///
/// Missing required parameter → `ParameterError::Missing`. A missing
/// optional parameter contributes its default when one is declared and is
/// otherwise simply absent. The validator (when present) runs on the raw
/// token before type conversion; either failing aborts the whole parse.
pub fn parse_parameters(
    specs: &[ParameterSpec],
    tokens: &[String],
) -> Result<HashMap<String, ParamValue>, ParameterError> {
    let mut values = HashMap::new();

    for (i, spec) in specs.iter().enumerate() {
        let raw = match tokens.get(i) {
            Some(token) => token.as_str(),
            None if spec.required => return Err(ParameterError::Missing(spec.name.clone())),
            None => {
                if let Some(default) = &spec.default {
                    values.insert(spec.name.clone(), default.clone());
                }
                continue;
            }
        };

        if let Some(validator) = spec.validator {
            validator(raw).map_err(|detail| ParameterError::Invalid {
                name: spec.name.clone(),
                detail,
            })?;
        }

        let value = parse_value(raw, spec.kind).map_err(|detail| ParameterError::Invalid {
            name: spec.name.clone(),
            detail,
        })?;
        values.insert(spec.name.clone(), value);
    }

    Ok(values)
}

fn parse_value(raw: &str, kind: ParamKind) -> Result<ParamValue, String> {
    match kind {
        ParamKind::String => Ok(ParamValue::Str(raw.to_string())),
        ParamKind::Int => raw
            .parse::<i64>()
            .map(ParamValue::Int)
            .map_err(|e| e.to_string()),
        ParamKind::Float => raw
            .parse::<f64>()
            .map(ParamValue::Float)
            .map_err(|e| e.to_string()),
        ParamKind::Bool => {
            let lower = raw.to_lowercase();
            Ok(ParamValue::Bool(matches!(lower.as_str(), "true" | "yes" | "1")))
        }
        ParamKind::Duration => parse_duration(raw).map(ParamValue::Duration),
    }
}

/// Parse a human-friendly duration string.
///
/// Supported suffixes: `s` (seconds), `m` (minutes), `h` (hours), `d` (days).
/// Examples: `"30s"`, `"5m"`, `"2h"`, `"1d"`.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty duration string".to_string());
    }

    let (num_str, suffix) = match input.find(|c: char| c.is_alphabetic()) {
        Some(i) => (&input[..i], &input[i..]),
        None => return Err(format!("duration missing unit suffix (s/m/h/d): {input}")),
    };

    let value: u64 = num_str
        .parse()
        .map_err(|_| format!("invalid number in duration: {num_str}"))?;

    let secs = match suffix {
        "s" => value,
        "m" => value * 60,
        "h" => value * 3_600,
        "d" => value * 86_400,
        _ => return Err(format!("unknown duration suffix: {suffix} (expected s/m/h/d)")),
    };

    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParameterSpec;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn missing_required_parameter_fails() {
        let specs = [ParameterSpec::new("url", ParamKind::String, "target").required()];
        let err = parse_parameters(&specs, &[]).unwrap_err();
        assert_eq!(err, ParameterError::Missing("url".into()));
    }

    #[test]
    fn missing_optional_uses_default() {
        let specs = [ParameterSpec::new("cycles", ParamKind::Int, "count")
            .default_value(ParamValue::Int(10))];
        let values = parse_parameters(&specs, &[]).unwrap();
        assert_eq!(values["cycles"], ParamValue::Int(10));
    }

    #[test]
    fn missing_optional_without_default_is_absent() {
        let specs = [ParameterSpec::new("subreddit", ParamKind::String, "source")];
        let values = parse_parameters(&specs, &[]).unwrap();
        assert!(!values.contains_key("subreddit"));
    }

    #[test]
    fn validator_failure_aborts_before_conversion() {
        fn reject(_: &str) -> Result<(), String> {
            Err("nope".to_string())
        }
        let specs =
            [ParameterSpec::new("n", ParamKind::Int, "count").validator(reject)];
        // "abc" would also fail Int conversion; the validator error wins.
        let err = parse_parameters(&specs, &tokens(&["abc"])).unwrap_err();
        assert_eq!(
            err,
            ParameterError::Invalid { name: "n".into(), detail: "nope".into() }
        );
    }

    #[test]
    fn type_conversion_failure_is_invalid() {
        let specs = [ParameterSpec::new("n", ParamKind::Int, "count")];
        let err = parse_parameters(&specs, &tokens(&["five"])).unwrap_err();
        assert!(matches!(err, ParameterError::Invalid { name, .. } if name == "n"));
    }

    #[test]
    fn parses_each_kind() {
        let specs = [
            ParameterSpec::new("s", ParamKind::String, ""),
            ParameterSpec::new("i", ParamKind::Int, ""),
            ParameterSpec::new("f", ParamKind::Float, ""),
            ParameterSpec::new("b", ParamKind::Bool, ""),
            ParameterSpec::new("d", ParamKind::Duration, ""),
        ];
        let values =
            parse_parameters(&specs, &tokens(&["hi", "-3", "0.5", "yes", "2m"])).unwrap();
        assert_eq!(values["s"], ParamValue::Str("hi".into()));
        assert_eq!(values["i"], ParamValue::Int(-3));
        assert_eq!(values["f"], ParamValue::Float(0.5));
        assert_eq!(values["b"], ParamValue::Bool(true));
        assert_eq!(values["d"], ParamValue::Duration(Duration::from_secs(120)));
    }

    #[test]
    fn duration_rejects_bad_suffix() {
        assert!(parse_duration("10x").is_err());
        assert!(parse_duration("abc").is_err());
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
    }
}
