// src/script/error.rs

//! Error types for decoding command scripts.

use std::fmt;
use std::io;

/// Why a single line could not be turned into an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The first token is not a known command.
    UnknownCommand { command: String },
    /// The command got more or fewer arguments than it takes.
    WrongArgumentCount {
        command: &'static str,
        expected: usize,
        found: usize,
    },
    /// An argument is not a real number.
    NonNumericArgument {
        command: &'static str,
        argument: String,
    },
    /// An argument is a number outside `[0, 1]`.
    OutOfRangeArgument { command: &'static str, value: f32 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnknownCommand { command } => {
                write!(f, "unknown command '{}'", command)
            }
            DecodeError::WrongArgumentCount {
                command,
                expected,
                found,
            } => write!(
                f,
                "'{}' takes {} argument(s), got {}",
                command, expected, found
            ),
            DecodeError::NonNumericArgument { command, argument } => {
                write!(f, "'{}' argument '{}' is not a number", command, argument)
            }
            DecodeError::OutOfRangeArgument { command, value } => {
                write!(f, "'{}' argument {} is outside [0, 1]", command, value)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Why a script stopped decoding.
#[derive(Debug)]
pub enum ScriptError {
    /// Line `line` (1-based) failed to decode.
    Decode { line: usize, error: DecodeError },
    /// Reading the script failed.
    Io(io::Error),
}

impl ScriptError {
    /// The decode error, if this was one.
    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            ScriptError::Decode { error, .. } => Some(error),
            ScriptError::Io(_) => None,
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Decode { line, error } => write!(f, "line {}: {}", line, error),
            ScriptError::Io(e) => write!(f, "failed to read script: {}", e),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScriptError::Decode { error, .. } => Some(error),
            ScriptError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for ScriptError {
    fn from(err: io::Error) -> Self {
        ScriptError::Io(err)
    }
}
