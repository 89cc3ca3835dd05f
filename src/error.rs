use crate::matfile::MatError;

/// Errors that can occur while reading HCP MEG text dumps, transforms and meshes
#[derive(Debug, thiserror::Error)]
pub enum HcpError {
    /// A statement could not be split into a key and a value on `" = "`
    #[error("Malformed statement: {statement:?}")]
    MalformedStatement {
        /// The offending statement text (trimmed)
        statement: String,
    },

    /// A parse produced zero entries; the input does not match the expected grammar
    #[error("No {what} could be parsed")]
    EmptyResult {
        /// What was expected (e.g. "transforms")
        what: &'static str,
    },

    /// An expected file is absent from a resolved path set or archive listing
    #[error("Missing artifact for subject {subject}: {artifact}")]
    MissingArtifact {
        /// Subject identifier
        subject: String,
        /// Name or suffix of the missing file
        artifact: String,
    },

    /// A corrected face or segment index falls outside its bound
    #[error("Index out of range in {context}: {index} (bound {bound})")]
    IndexOutOfRange {
        /// Where the index was found
        context: &'static str,
        /// The offending index, as found in the source (1-based)
        index: i64,
        /// Exclusive upper bound of valid source indices (0 if unbounded)
        bound: usize,
    },

    /// A value does not fit the grammar required by its key
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue {
        /// Statement key
        key: String,
        /// Human-readable explanation
        reason: String,
    },

    /// A named transform is not present in the table
    #[error("Transform not found: {0}")]
    MissingTransform(String),

    /// A transform could not be inverted
    #[error("Transform is singular and cannot be inverted (determinant {0})")]
    SingularTransform(f64),

    /// A required field is absent from a MAT container
    #[error("Missing field in MAT container: {0}")]
    MissingField(String),

    /// MAT container decoding error
    #[error("MAT file error: {0}")]
    Mat(#[from] MatError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HcpError {
    pub(crate) fn invalid_value(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing_artifact(subject: &str, artifact: &str) -> Self {
        Self::MissingArtifact {
            subject: subject.to_string(),
            artifact: artifact.to_string(),
        }
    }
}
