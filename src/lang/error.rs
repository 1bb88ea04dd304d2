//! Error type for command script parsing.

use std::fmt;
use std::io;

/// Why a parse session was aborted.
///
/// `line` is 1-based. Argument indices are 0-based and count only the
/// arguments after the command keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A command received the wrong number of arguments.
    ArgumentCount {
        line: usize,
        command: String,
        expected: usize,
        found: usize,
    },
    /// An argument was not a finite number.
    NumberFormat {
        line: usize,
        command: String,
        index: usize,
        token: String,
    },
    /// The first token is not a known command.
    UnknownCommand { line: usize, token: String },
    /// The underlying reader failed.
    Io {
        line: usize,
        kind: io::ErrorKind,
        message: String,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::ArgumentCount { line, .. }
            | ParseError::NumberFormat { line, .. }
            | ParseError::UnknownCommand { line, .. }
            | ParseError::Io { line, .. } => *line,
        }
    }

    /// The command the error is attributed to, if any.
    pub fn command(&self) -> Option<&str> {
        match self {
            ParseError::ArgumentCount { command, .. } | ParseError::NumberFormat { command, .. } => {
                Some(command)
            }
            ParseError::UnknownCommand { token, .. } => Some(token),
            ParseError::Io { .. } => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::ArgumentCount {
                line,
                command,
                expected,
                found,
            } => write!(
                f,
                "line {}: {}: {} arguments expected, got {}",
                line, command, expected, found
            ),
            ParseError::NumberFormat {
                line,
                command,
                index,
                token,
            } => write!(
                f,
                "line {}: {}: argument {} is not a valid number: {:?}",
                line, command, index, token
            ),
            ParseError::UnknownCommand { line, token } => {
                write!(f, "line {}: unknown command: {}", line, token)
            }
            ParseError::Io {
                line,
                kind,
                message,
            } => write!(f, "line {}: read failed ({:?}): {}", line, kind, message),
        }
    }
}

impl std::error::Error for ParseError {}
