pub mod lexer;
pub mod ast;
pub mod grammar;

use std::path::Path;

use crate::error::{self, Error, ParseError};
use ast::File;

/// Parse proto3 source bytes into a syntax tree.
///
/// `filename` only decorates error messages; it has no effect on parsing.
pub fn parse(source: &[u8], filename: Option<&str>) -> Result<File, ParseError> {
    let result = std::str::from_utf8(source)
        .map_err(|e| ParseError::InvalidUtf8 {
            offset: e.valid_up_to(),
        })
        .and_then(grammar::parse_proto);
    match filename {
        Some(name) => result.map_err(|e| e.in_file(name)),
        None => result,
    }
}

/// Parse proto3 source text into a syntax tree.
pub fn parse_str(source: &str) -> Result<File, ParseError> {
    grammar::parse_proto(source)
}

/// Read and parse a file from disk.
pub fn parse_file(path: impl AsRef<Path>) -> error::Result<File> {
    let path = path.as_ref();
    let source = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path.display().to_string();
    Ok(parse(&source, Some(&name))?)
}
