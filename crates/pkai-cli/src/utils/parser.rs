use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE (e.g., 'encoding.cutoff-radius=12').")]
    MissingSeparator(String),

    #[error("Component '{component}' cannot be empty in '{pair}'.")]
    EmptyComponent {
        component: &'static str,
        pair: String,
    },

    #[error("Unsupported configuration key for --set: '{0}'")]
    UnknownKey(String),

    #[error("Invalid {expected} value for '{key}': '{value}'")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// Splits a `KEY=VALUE` override into its trimmed parts.
pub fn parse_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| ParseError::MissingSeparator(pair.to_string()))?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "key",
            pair: pair.to_string(),
        });
    }
    if value.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "value",
            pair: pair.to_string(),
        });
    }
    Ok((key, value))
}

/// Parses `value` as `T`, naming `key` and the expected kind on failure.
pub fn parse_value<T: std::str::FromStr>(
    key: &str,
    value: &str,
    expected: &'static str,
) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_value_splits_on_first_equals() {
        assert_eq!(
            parse_key_value("model.name=pkai+"),
            Ok(("model.name", "pkai+"))
        );
        assert_eq!(parse_key_value(" a = b=c "), Ok(("a", "b=c")));
    }

    #[test]
    fn parse_key_value_rejects_malformed_pairs() {
        assert_eq!(
            parse_key_value("model.name"),
            Err(ParseError::MissingSeparator("model.name".to_string()))
        );
        assert!(matches!(
            parse_key_value("=pkai"),
            Err(ParseError::EmptyComponent {
                component: "key",
                ..
            })
        ));
        assert!(matches!(
            parse_key_value("model.name= "),
            Err(ParseError::EmptyComponent {
                component: "value",
                ..
            })
        ));
    }

    #[test]
    fn parse_value_reports_key_and_kind() {
        assert_eq!(parse_value::<f64>("k", "1.5", "float"), Ok(1.5));
        assert_eq!(
            parse_value::<usize>("model.load-retries", "-1", "integer"),
            Err(ParseError::InvalidValue {
                key: "model.load-retries".to_string(),
                value: "-1".to_string(),
                expected: "integer",
            })
        );
    }
}
