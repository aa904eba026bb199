use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::utils::parse_clock;

/// Kind of token expected in one column of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `HH:MM`, converted to minutes.
    Time,
    Number,
}

impl Field {
    pub fn parse(self, token: &str) -> Option<f32> {
        match self {
            Field::Time => parse_clock(token).map(|minute| minute as f32),
            Field::Number => token.parse::<f32>().ok(),
        }
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{name} has already been loaded, clear it before loading again")]
    AlreadyLoaded { name: &'static str },

    #[error("could not read {}: {source}", .path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("format error in {} at line {line}: {reason}", .path.display())]
    Format {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("unknown quantity '{0}'")]
    UnknownQuantity(String),
}

impl LoadError {
    pub(crate) fn unreadable(path: &Path, source: io::Error) -> Self {
        LoadError::Source {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn malformed(path: &Path, line: usize, reason: impl Into<String>) -> Self {
        LoadError::Format {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }
}
