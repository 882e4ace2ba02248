use std::collections::HashMap;

use crate::error::CoercionError;

const QUOTES: &[char] = &['"', '\'', '`', '«', '»', '‘', '’', '“', '”'];

/// Parse a boolean.
///
/// Accepts `1 t T true TRUE True yes YES Yes` and `0 f F false FALSE False no NO No`.
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::parse_bool;
///
/// assert_eq!(parse_bool("Yes"), Ok(true));
/// assert_eq!(parse_bool("0"), Ok(false));
/// assert!(parse_bool("maybe").is_err());
/// ```
pub fn parse_bool(value: &str) -> Result<bool, CoercionError> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" | "yes" | "YES" | "Yes" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" | "no" | "NO" | "No" => Ok(false),
        _ => Err(CoercionError::NotABoolean(value.to_string())),
    }
}

/// Parse an integer of any base.
///
/// An optional sign may be followed by `0x` (hex), `0o` or a leading `0` (octal), `0b` (binary), or decimal digits.
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::parse_int;
///
/// assert_eq!(parse_int("42"), Ok(42));
/// assert_eq!(parse_int("-0x1f"), Ok(-31));
/// assert_eq!(parse_int("010"), Ok(8));
/// assert!(parse_int("4x2").is_err());
/// ```
pub fn parse_int(value: &str) -> Result<i64, CoercionError> {
    let error = || CoercionError::NotAnInteger(value.to_string());
    let (negative, unsigned) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };

    let (radix, digits) = if let Some(rest) = strip_base(unsigned, 'x') {
        (16, rest)
    } else if let Some(rest) = strip_base(unsigned, 'o') {
        (8, rest)
    } else if let Some(rest) = strip_base(unsigned, 'b') {
        (2, rest)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    // from_str_radix would otherwise accept a second sign.
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(error());
    }

    let magnitude = i64::from_str_radix(digits, radix).map_err(|_| error())?;

    if negative {
        magnitude.checked_neg().ok_or_else(error)
    } else {
        Ok(magnitude)
    }
}

fn strip_base(value: &str, marker: char) -> Option<&str> {
    let rest = value.strip_prefix('0')?;
    rest.strip_prefix(marker)
        .or_else(|| rest.strip_prefix(marker.to_ascii_uppercase()))
}

/// Split a comma separated list, ignoring commas inside quotes.
///
/// Items are trimmed of whitespace and empty items are dropped; quotes are kept.
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::split_list;
///
/// assert_eq!(split_list("one, two,,three"), vec!["one", "two", "three"]);
/// assert_eq!(split_list(r#""1,234",5"#), vec![r#""1,234""#, "5"]);
/// ```
pub fn split_list(value: &str) -> Vec<String> {
    let mut items = Vec::default();
    let mut current = String::default();
    let mut quote: Option<char> = None;

    for c in value.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if QUOTES.contains(&c) => quote = Some(c),
            None if c == ',' => {
                items.push(std::mem::take(&mut current));
                continue;
            }
            None => {}
        }

        current.push(c);
    }

    items.push(current);
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

#[derive(Debug, PartialEq, Eq)]
enum MapToken {
    Text(String),
    Equals,
    Comma,
}

// Splits `key=value,...` into tokens, each with its character position.
fn tokenize(value: &str) -> Vec<(usize, MapToken)> {
    let mut tokens = Vec::default();
    let mut current = String::default();
    let mut start = 0;
    let mut quote: Option<char> = None;

    fn flush(tokens: &mut Vec<(usize, MapToken)>, current: &mut String, start: usize) {
        let text = current.trim();
        if !text.is_empty() {
            let offset = current.chars().count() - current.trim_start().chars().count();
            tokens.push((start + offset, MapToken::Text(text.to_string())));
        }
        current.clear();
    }

    for (position, c) in value.chars().enumerate() {
        if current.is_empty() {
            start = position;
        }

        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if QUOTES.contains(&c) => quote = Some(c),
            None if c == '=' || c == ',' => {
                flush(&mut tokens, &mut current, start);
                let token = if c == '=' {
                    MapToken::Equals
                } else {
                    MapToken::Comma
                };
                tokens.push((position, token));
                continue;
            }
            None => {}
        }

        current.push(c);
    }

    flush(&mut tokens, &mut current, start);
    tokens
}

/// Parse a map from comma separated `key=value` pairs, or from a JSON object.
///
/// Quoted segments may contain `=` and `,`; quotes are kept.
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::parse_map;
///
/// let pairs = parse_map("k1=v1, k2=v2").unwrap();
/// let json = parse_map(r#"{"k1": "v1", "k2": "v2"}"#).unwrap();
/// assert_eq!(pairs, json);
/// assert_eq!(pairs["k2"], "v2");
/// ```
pub fn parse_map(value: &str) -> Result<HashMap<String, String>, CoercionError> {
    if value.trim_start().starts_with('{') {
        return parse_json(value);
    }

    let mut result = HashMap::default();
    let mut tokens = tokenize(value).into_iter().peekable();
    let end = value.chars().count();

    loop {
        let key = match tokens.next() {
            Some((_, MapToken::Text(key))) => key,
            other => return Err(unexpected("expected key", other, end)),
        };

        match tokens.next() {
            Some((_, MapToken::Equals)) => {}
            other => {
                return Err(unexpected(
                    &format!("expected '=' after '{key}'"),
                    other,
                    end,
                ))
            }
        }

        let value = match tokens.next() {
            Some((_, MapToken::Text(value))) => value,
            other => {
                return Err(unexpected(
                    &format!("expected value after '{key}='"),
                    other,
                    end,
                ))
            }
        };

        match tokens.next() {
            None => {
                result.insert(key, value);
                return Ok(result);
            }
            Some((_, MapToken::Comma)) => {
                result.insert(key, value);
            }
            other => {
                return Err(unexpected(
                    &format!("expected ',' after '{value}'"),
                    other,
                    end,
                ))
            }
        }
    }
}

fn unexpected(expected: &str, found: Option<(usize, MapToken)>, end: usize) -> CoercionError {
    let (found, position) = match found {
        Some((position, MapToken::Text(text))) => (format!("'{text}'"), position),
        Some((position, MapToken::Equals)) => ("'='".to_string(), position),
        Some((position, MapToken::Comma)) => ("','".to_string(), position),
        None => ("none".to_string(), end),
    };

    CoercionError::MapSyntax {
        message: format!("{expected} but found {found}"),
        position,
    }
}

fn parse_json(value: &str) -> Result<HashMap<String, String>, CoercionError> {
    let object: HashMap<String, serde_json::Value> =
        serde_json::from_str(value).map_err(|error| CoercionError::MapSyntax {
            message: format!("JSON map decoding for '{value}' failed with '{error}'"),
            position: error.column().saturating_sub(1),
        })?;

    Ok(object
        .into_iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(text) => (key, text),
            other => (key, other.to_string()),
        })
        .collect())
}
