//! Value grammars for the right-hand side of a statement
//!
//! [`parse_value`] classifies a raw value by shape. The annotation files use
//! narrower grammars that are applied by key family rather than by shape:
//! [`parse_string_list`] for bad channels, [`parse_index_pairs`] for bad
//! segments and [`parse_mixed_list`] for ICA classification.

use serde::{Deserialize, Serialize};

use crate::error::HcpError;

/// Bracket and separator characters stripped before numeric parsing
const LITERAL_NOISE: &[char] = &['[', ']', '{', '}', ';', ','];

/// A typed statement value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Real scalar
    Real(f64),
    /// Integer scalar
    Integer(i64),
    /// Flat numeric vector
    Vector(Vec<f64>),
    /// Numeric matrix, row-major
    Matrix {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
        /// Row-major entries
        data: Vec<f64>,
    },
    /// Single string (quotes removed)
    Text(String),
    /// List of quoted strings
    TextList(Vec<String>),
}

impl Value {
    /// Numeric entries of a scalar, vector or matrix value
    pub fn as_numbers(&self) -> Option<Vec<f64>> {
        match self {
            Value::Real(v) => Some(vec![*v]),
            Value::Integer(v) => Some(vec![*v as f64]),
            Value::Vector(data) | Value::Matrix { data, .. } => Some(data.clone()),
            _ => None,
        }
    }

    /// String payload of a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Element of an ICA classification list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    /// Component index (as written in the source)
    Index(i64),
    /// Category label or free-text token
    Label(String),
}

/// Classify and parse a raw value by its shape.
///
/// Never fails: a value that matches no richer grammar is kept as text.
pub fn parse_value(raw: &str) -> Value {
    let value = raw.trim();

    if let Some(inner) = unquote(value) {
        return Value::Text(inner.to_string());
    }

    if value.contains('[') {
        if let Some(rows) = numeric_rows(value) {
            let cols = rows.first().map(Vec::len).unwrap_or(0);
            if rows.len() >= 2 && rows.iter().all(|row| row.len() == cols) {
                return Value::Matrix {
                    rows: rows.len(),
                    cols,
                    data: rows.into_iter().flatten().collect(),
                };
            }
            return Value::Vector(rows.into_iter().flatten().collect());
        }
    }

    if value.contains('\'') {
        return Value::TextList(parse_string_list(value));
    }

    if let Ok(integer) = value.parse::<i64>() {
        return Value::Integer(integer);
    }
    if let Ok(real) = value.parse::<f64>() {
        return Value::Real(real);
    }

    Value::Text(value.to_string())
}

/// Parse every number in a value, ignoring brackets and row separators.
pub fn parse_numbers(key: &str, raw: &str) -> Result<Vec<f64>, HcpError> {
    literal_tokens(raw)
        .map(|token| {
            token.parse::<f64>().map_err(|_| {
                HcpError::invalid_value(key, format!("'{}' is not a number", token))
            })
        })
        .collect()
}

/// Bad-channel grammar: the alphanumeric fragments between `'` delimiters.
pub fn parse_string_list(raw: &str) -> Vec<String> {
    raw.split('\'')
        .filter(|fragment| is_alphanumeric(fragment))
        .map(str::to_string)
        .collect()
}

/// Bad-segment grammar: 1-based inclusive `[start end]` pairs.
///
/// Each token keeps only its ASCII digits, so stray signs or brackets glued
/// to a number do not hide it. The result is 0-based and still inclusive.
pub fn parse_index_pairs(key: &str, raw: &str) -> Result<Vec<[usize; 2]>, HcpError> {
    let indices = literal_tokens(raw)
        .map(|token| token.chars().filter(char::is_ascii_digit).collect::<String>())
        .filter(|digits| !digits.is_empty())
        .map(|digits| {
            digits
                .parse::<i64>()
                .map_err(|_| HcpError::invalid_value(key, format!("index {} overflows", digits)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if indices.len() % 2 != 0 {
        return Err(HcpError::invalid_value(
            key,
            format!("{} boundaries cannot form start/end pairs", indices.len()),
        ));
    }

    indices
        .chunks_exact(2)
        .map(|pair| Ok([to_zero_based(pair[0])?, to_zero_based(pair[1])?]))
        .collect()
}

/// ICA grammar: numeric lists are split on whitespace, quoted lists on `'`.
pub fn parse_mixed_list(raw: &str) -> Vec<ListItem> {
    let tokens: Vec<&str> = if raw.contains('[') {
        literal_tokens(raw).collect()
    } else {
        raw.split('\'').collect()
    };

    tokens
        .into_iter()
        .filter(|token| is_alphanumeric(token))
        .map(|token| {
            if token.chars().all(|c| c.is_ascii_digit()) {
                token
                    .parse::<i64>()
                    .map(ListItem::Index)
                    .unwrap_or_else(|_| ListItem::Label(token.to_string()))
            } else {
                ListItem::Label(token.to_string())
            }
        })
        .collect()
}

/// Whitespace-separated tokens with literal brackets and separators removed
fn literal_tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| c.is_whitespace() || LITERAL_NOISE.contains(&c))
        .filter(|token| !token.is_empty())
}

/// Rows of a numeric literal; `None` if any token is not a number
fn numeric_rows(value: &str) -> Option<Vec<Vec<f64>>> {
    let mut rows = Vec::new();
    for line in value.split(|c: char| c == ';' || c == '\n') {
        let row = literal_tokens(line)
            .map(|token| token.parse::<f64>().ok())
            .collect::<Option<Vec<_>>>()?;
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Some(rows)
}

fn unquote(value: &str) -> Option<&str> {
    ['\'', '"'].into_iter().find_map(|quote| {
        let inner = value.strip_prefix(quote)?.strip_suffix(quote)?;
        (!inner.contains(quote)).then_some(inner)
    })
}

fn is_alphanumeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphanumeric)
}

fn to_zero_based(index: i64) -> Result<usize, HcpError> {
    if index < 1 {
        return Err(HcpError::IndexOutOfRange {
            context: "bad segment",
            index,
            bound: 0,
        });
    }
    Ok((index - 1) as usize)
}
