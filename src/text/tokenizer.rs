//! Statement tokenizer for `key = value;` dumps
//!
//! The HCP pipeline writes its annotations and transforms as MATLAB-style
//! assignment statements. A `;` normally ends a statement, but bracketed
//! literals (`[...]`, `{...}`) may contain `;` as a row separator and may
//! span several lines, so the scan tracks bracket depth and quote state and
//! only ends a statement on a `;` at the top level.

use log::debug;

use crate::error::HcpError;

/// Separator between the key path and the raw value
pub const ASSIGNMENT: &str = " = ";

/// Tokenizer behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Bracketed literals may span lines and contain `;`.
    /// When false every line is exactly one statement.
    pub multiline_literals: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            multiline_literals: true,
        }
    }
}

impl TokenizerConfig {
    /// One statement per line (landmark files)
    pub fn single_line() -> Self {
        Self {
            multiline_literals: false,
        }
    }
}

/// A single `path = value` assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Full dotted key path, e.g. `transform.bti2spm`
    pub path: String,
    /// Final segment of the key path, e.g. `bti2spm`
    pub key: String,
    /// Raw value text, trimmed, without the statement terminator
    pub value: String,
}

impl Statement {
    /// Split a statement fragment on the first `" = "`.
    ///
    /// Returns `Ok(None)` for whitespace-only fragments.
    pub fn parse(fragment: &str) -> Result<Option<Self>, HcpError> {
        let trimmed = fragment.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let malformed = || HcpError::MalformedStatement {
            statement: trimmed.to_string(),
        };

        let (path, value) = trimmed.split_once(ASSIGNMENT).ok_or_else(malformed)?;
        let path = path.trim();
        if path.is_empty() {
            return Err(malformed());
        }

        let key = path.rsplit('.').next().unwrap_or(path);

        Ok(Some(Self {
            path: path.to_string(),
            key: key.to_string(),
            value: value.trim().to_string(),
        }))
    }
}

/// Iterator over the statements of a text buffer
pub struct Tokenizer<'a> {
    text: &'a str,
    pos: usize,
    config: TokenizerConfig,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over `text`
    pub fn new(text: &'a str, config: TokenizerConfig) -> Self {
        Self {
            text,
            pos: 0,
            config,
        }
    }

    /// Yield only well-formed statements, logging and dropping the rest.
    ///
    /// Used for hand-curated annotation files where stray characters
    /// between statements are common.
    pub fn skip_malformed(self) -> impl Iterator<Item = Statement> + 'a {
        self.filter_map(|result| match result {
            Ok(statement) => Some(statement),
            Err(e) => {
                debug!("Skipping annotation fragment: {}", e);
                None
            }
        })
    }

    /// Next raw fragment when literals may span lines
    fn next_fragment(&mut self) -> &'a str {
        let rest = &self.text[self.pos..];
        let mut depth = 0usize;
        let mut in_quote = false;
        let mut prev = None;

        for (i, c) in rest.char_indices() {
            match c {
                '\'' if in_quote => in_quote = false,
                // `x'`, `[1 2]'` and `a.'` are transposes, not string openers
                '\'' if prev.is_some_and(is_transposable) => {}
                '\'' => in_quote = true,
                // MATLAB strings never span lines; recover from a stray quote
                '\n' => in_quote = false,
                '[' | '{' if !in_quote => depth += 1,
                ']' | '}' if !in_quote => depth = depth.saturating_sub(1),
                ';' if !in_quote && depth == 0 => {
                    self.pos += i + 1;
                    return &rest[..i];
                }
                _ => {}
            }
            prev = Some(c);
        }

        self.pos = self.text.len();
        rest
    }

    /// Next line, with its trailing `;` removed
    fn next_line(&mut self) -> &'a str {
        let rest = &self.text[self.pos..];
        let line = match rest.find('\n') {
            Some(end) => {
                self.pos += end + 1;
                &rest[..end]
            }
            None => {
                self.pos = self.text.len();
                rest
            }
        };
        let line = line.trim_end();
        line.strip_suffix(';').unwrap_or(line)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Statement, HcpError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.text.len() {
            let fragment = if self.config.multiline_literals {
                self.next_fragment()
            } else {
                self.next_line()
            };

            match Statement::parse(fragment) {
                Ok(None) => continue,
                Ok(Some(statement)) => return Some(Ok(statement)),
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

/// Characters after which a `'` is the transpose operator
fn is_transposable(c: char) -> bool {
    matches!(c, ']' | '}' | ')' | '.' | '_') || c.is_ascii_alphanumeric()
}

/// Tokenize `text` strictly: the first malformed statement aborts.
pub fn tokenize(text: &str) -> Result<Vec<Statement>, HcpError> {
    Tokenizer::new(text, TokenizerConfig::default()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_statements() {
        let statements = tokenize("a.b = 1;\nc.d = 'x';\n").unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].path, "a.b");
        assert_eq!(statements[0].key, "b");
        assert_eq!(statements[0].value, "1");
        assert_eq!(statements[1].key, "d");
        assert_eq!(statements[1].value, "'x'");
    }

    #[test]
    fn test_semicolon_inside_brackets() {
        let text = "badsegments.badsegment = [1 10; 20 30];\nbadsegments.all = [\n5 6;\n7 8\n];\n";
        let statements = tokenize(text).unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].value, "[1 10; 20 30]");
        assert_eq!(statements[1].key, "all");
        assert!(statements[1].value.contains("5 6;"));
    }

    #[test]
    fn test_cell_literal_with_quoted_semicolon() {
        let text = "icaclass.comments = {'a;b' 'c'};\nicaclass.total = 3;";
        let statements = tokenize(text).unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].value, "{'a;b' 'c'}");
        assert_eq!(statements[1].value, "3");
    }

    #[test]
    fn test_transpose_does_not_open_quote() {
        let text = "icaclass.brain = [1 2 3]';\nicaclass.ecg = [4 5];\nicaclass.total = 9;\n";
        let statements = tokenize(text).unwrap();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].value, "[1 2 3]'");
        assert_eq!(statements[1].key, "ecg");
        assert_eq!(statements[1].value, "[4 5]");
        assert_eq!(statements[2].value, "9");
    }

    #[test]
    fn test_adjacent_quoted_strings_still_quoted() {
        let text = "bads.all = {'A1' 'x;y'};\nbads.n = 2;";
        let statements = tokenize(text).unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].value, "{'A1' 'x;y'}");
    }

    #[test]
    fn test_blank_fragments_dropped() {
        let statements = tokenize("\n\n  ;\n;a.b = 2;\n\n").unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].key, "b");
    }

    #[test]
    fn test_unterminated_final_statement() {
        let statements = tokenize("a.b = 1;\na.c = 2").unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1].value, "2");
    }

    #[test]
    fn test_malformed_statement_is_error() {
        let err = tokenize("a.b = 1;\ngarbage;\n").unwrap_err();
        assert!(matches!(err, HcpError::MalformedStatement { .. }));
    }

    #[test]
    fn test_skip_malformed() {
        let text = "a.b = 1;\ngarbage;\na.c = [1 2];";
        let statements: Vec<_> = Tokenizer::new(text, TokenizerConfig::default())
            .skip_malformed()
            .collect();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1].key, "c");
    }

    #[test]
    fn test_single_line_mode() {
        let text = "fid.nas = [ 1 2 3 ];\nfid.coordsys = 'bti';\n";
        let statements: Vec<_> = Tokenizer::new(text, TokenizerConfig::single_line())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].value, "[ 1 2 3 ]");
        assert_eq!(statements[1].value, "'bti'");
    }

    #[test]
    fn test_empty_key_is_malformed() {
        assert!(Statement::parse(" = 5").is_err());
        assert!(Statement::parse("   ").unwrap().is_none());
    }
}
