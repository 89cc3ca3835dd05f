use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::Serialize;

use super::Transform;
use crate::error::HcpError;
use crate::text::{parse_numbers, tokenize};

/// Prefix marking an inverted entry in a composition chain
pub const INVERSE_PREFIX: &str = "inv:";

/// Named transforms parsed from a `*_MEG_anatomy_transform.txt` file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransformTable {
    transforms: BTreeMap<String, Transform>,
}

/// One link of a composition chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformRef {
    /// The named transform as stored
    Forward(String),
    /// The inverse of the named transform
    Inverse(String),
}

impl TransformRef {
    /// Reference a transform as stored
    pub fn forward(name: &str) -> Self {
        Self::Forward(name.to_string())
    }

    /// Reference the inverse of a transform
    pub fn inverse(name: &str) -> Self {
        Self::Inverse(name.to_string())
    }
}

impl FromStr for TransformRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.strip_prefix(INVERSE_PREFIX) {
            Some(name) => Self::Inverse(name.trim().to_string()),
            None => Self::Forward(s.to_string()),
        })
    }
}

impl fmt::Display for TransformRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward(name) => write!(f, "{}", name),
            Self::Inverse(name) => write!(f, "{}{}", INVERSE_PREFIX, name),
        }
    }
}

impl TransformTable {
    /// Build a table from already-parsed entries
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Transform)>,
    {
        Self {
            transforms: entries.into_iter().collect(),
        }
    }

    /// Look up a transform by name
    pub fn get(&self, name: &str) -> Result<&Transform, HcpError> {
        self.transforms
            .get(name)
            .ok_or_else(|| HcpError::MissingTransform(name.to_string()))
    }

    /// Number of transforms
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// True if the table holds no transforms
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Transform names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transforms.keys().map(String::as_str)
    }

    /// Iterate over `(name, transform)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Transform)> {
        self.transforms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolve a single chain link
    pub fn resolve(&self, link: &TransformRef) -> Result<Transform, HcpError> {
        match link {
            TransformRef::Forward(name) => self.get(name).copied(),
            TransformRef::Inverse(name) => self.get(name)?.inverse(),
        }
    }

    /// Multiply the referenced matrices in the order given.
    ///
    /// The result is `M_0 · M_1 · … · M_n`, so the last link is the first
    /// one applied to a column vector. An empty chain is the identity.
    pub fn compose(&self, chain: &[TransformRef]) -> Result<Transform, HcpError> {
        chain.iter().try_fold(Transform::IDENTITY, |acc, link| {
            Ok(acc * self.resolve(link)?)
        })
    }
}

/// Parse a transform dump into a [`TransformTable`].
///
/// Each `transform.<name> = [16 floats];` statement becomes a row-major 4×4
/// matrix. Quoted-string statements (such as the source `filename`) are
/// metadata and skipped. With `convert_to_meter`, translations are divided
/// by 1000.
pub fn parse_transforms(text: &str, convert_to_meter: bool) -> Result<TransformTable, HcpError> {
    let mut transforms = BTreeMap::new();

    for statement in tokenize(text)? {
        if statement.value.starts_with('\'') || statement.value.starts_with('"') {
            debug!("Skipping non-matrix entry '{}'", statement.path);
            continue;
        }

        let values = parse_numbers(&statement.key, &statement.value)?;
        let mut transform = Transform::from_row_major(&values).ok_or_else(|| {
            HcpError::invalid_value(
                &statement.key,
                format!("expected 16 values for a 4x4 matrix, found {}", values.len()),
            )
        })?;

        if convert_to_meter {
            transform = transform.to_meters();
        }

        if transforms.insert(statement.key.clone(), transform).is_some() {
            warn!("Transform '{}' defined twice; keeping the last", statement.key);
        }
    }

    if transforms.is_empty() {
        return Err(HcpError::EmptyResult { what: "transforms" });
    }

    debug!("Parsed {} transforms", transforms.len());
    Ok(TransformTable { transforms })
}

/// Parse a bare 4×4 matrix: four lines of four whitespace-separated floats.
///
/// This is the structural-scan RAS file (`c_ras.mat`), which has no
/// `key = value` wrapper.
pub fn read_ras_transform(text: &str) -> Result<Transform, HcpError> {
    const KEY: &str = "ras";

    let rows = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.split_whitespace()
                .map(|token| {
                    token.parse::<f64>().map_err(|_| {
                        HcpError::invalid_value(KEY, format!("'{}' is not a number", token))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    if rows.len() != 4 || rows.iter().any(|row| row.len() != 4) {
        return Err(HcpError::invalid_value(
            KEY,
            format!(
                "expected 4 rows of 4 values, found row lengths {:?}",
                rows.iter().map(Vec::len).collect::<Vec<_>>()
            ),
        ));
    }

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Transform::from_row_major(&flat)
        .ok_or_else(|| HcpError::invalid_value(KEY, "expected 16 values"))
}
