// src/script/mod.rs

//! Reads command scripts, one command per line, into operations.

mod decoder;
mod error;

pub use decoder::decode;
pub use error::{DecodeError, ScriptError};

use std::io::BufRead;

use log::{debug, warn};

use crate::painter::Operation;

/// Result of decoding a whole script.
///
/// Decoding stops at the first bad line; every operation decoded before it is
/// kept in `operations`.
#[derive(Debug)]
pub struct ParsedScript {
    pub operations: Vec<Operation>,
    pub error: Option<ScriptError>,
}

impl ParsedScript {
    /// True when every line decoded.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Converts to a plain `Result`, discarding the partial operations on error.
    pub fn into_result(self) -> Result<Vec<Operation>, ScriptError> {
        match self.error {
            None => Ok(self.operations),
            Some(e) => Err(e),
        }
    }
}

/// Decodes every line of `input`. Blank lines are skipped.
pub fn parse_script<R: BufRead>(input: R) -> ParsedScript {
    let mut operations = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("parse_script: read failed after {} operations", operations.len());
                return ParsedScript {
                    operations,
                    error: Some(ScriptError::from(e)),
                };
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match decode(&line) {
            Ok(op) => operations.push(op),
            Err(error) => {
                let line = index + 1;
                warn!("parse_script: line {}: {}", line, error);
                return ParsedScript {
                    operations,
                    error: Some(ScriptError::Decode { line, error }),
                };
            }
        }
    }

    debug!("parse_script: decoded {} operations", operations.len());
    ParsedScript {
        operations,
        error: None,
    }
}

/// Convenience wrapper around `parse_script` for in-memory text.
pub fn parse_str(text: &str) -> ParsedScript {
    parse_script(text.as_bytes())
}
