//! # Text dump parsing
//!
//! The HCP MEG pipeline stores transforms, fiducials and annotations as
//! MATLAB-style assignment scripts:
//!
//! ```text
//! transform.bti2spm = [0.99 -0.01 0.02 -1.5
//! 0.01 0.99 0.05 12.1
//! -0.02 -0.05 0.99 40.3
//! 0 0 0 1];
//! bads.badchannels = {'A2' 'A147'};
//! ```
//!
//! Parsing happens in two stages: the [`Tokenizer`] splits text into
//! [`Statement`]s, then a value grammar from [`value`] turns each raw value
//! into typed data.

pub mod tokenizer;
pub mod value;


pub use tokenizer::{tokenize, Statement, Tokenizer, TokenizerConfig};
pub use value::{
    parse_index_pairs, parse_mixed_list, parse_numbers, parse_string_list, parse_value, ListItem,
    Value,
};
