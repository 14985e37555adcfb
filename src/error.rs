use std::path::PathBuf;

/// Errors from tokenizing and parsing proto3 source text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("lexical error at offset {offset}: {message}")]
    Lexical { offset: usize, message: String },

    #[error("syntax error at offset {offset}: expected {expected}, found {found}")]
    Syntax {
        offset: usize,
        found: String,
        expected: String,
    },

    #[error("syntax error at offset {offset}: proto files must start with syntax = \"proto3\"; found {found}")]
    MissingPreamble { offset: usize, found: String },

    #[error("syntax error at offset {offset}: multiple {modifier} modifiers found")]
    DuplicateModifier { offset: usize, modifier: String },

    #[error("syntax error at offset {offset}: declarations nested deeper than {limit} levels")]
    NestingTooDeep { offset: usize, limit: usize },

    #[error("lexical error at offset {offset}: invalid utf-8")]
    InvalidUtf8 { offset: usize },

    #[error("{filename}: {source}")]
    InFile {
        filename: String,
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Byte offset into the source where the error was detected.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Lexical { offset, .. }
            | ParseError::Syntax { offset, .. }
            | ParseError::MissingPreamble { offset, .. }
            | ParseError::DuplicateModifier { offset, .. }
            | ParseError::NestingTooDeep { offset, .. }
            | ParseError::InvalidUtf8 { offset } => *offset,
            ParseError::InFile { source, .. } => source.offset(),
        }
    }

    /// Attach a file name to the error for diagnostics.
    pub fn in_file(self, filename: impl Into<String>) -> Self {
        ParseError::InFile {
            filename: filename.into(),
            source: Box::new(self),
        }
    }

    /// The error without any file-name wrapping.
    pub fn root(&self) -> &ParseError {
        match self {
            ParseError::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Top-level error type covering reading and parsing a source file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result type alias for file-level operations.
pub type Result<T> = std::result::Result<T, Error>;
