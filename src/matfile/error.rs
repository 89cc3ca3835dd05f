/// Errors that can occur while decoding a MAT container
#[derive(Debug, thiserror::Error)]
pub enum MatError {
    /// I/O error reading the file or inflating a compressed element
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The header does not identify a MAT v5 file
    #[error("Not a MAT file: {0}")]
    NotMatFile(String),

    /// MAT version other than 5 (e.g. v7.3, which is HDF5)
    #[error("Unsupported MAT version 0x{0:04x}")]
    UnsupportedVersion(u16),

    /// A data element extends past the end of its container
    #[error("Truncated data: needed {needed} bytes, {available} available")]
    Truncated {
        /// Bytes required
        needed: usize,
        /// Bytes left in the buffer
        available: usize,
    },

    /// Array class the reader does not decode (sparse, object, function handle)
    #[error("Unsupported array class {0}")]
    UnsupportedClass(u8),

    /// Data element type the reader does not decode
    #[error("Unsupported data type {0}")]
    UnsupportedDataType(u32),

    /// Structurally invalid element
    #[error("Corrupt element: {0}")]
    Corrupt(String),
}
