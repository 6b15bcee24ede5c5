//! Error taxonomy shared by every stage of the engine.
//!
//! Errors fall into three classes: setup failures (a data file is missing or
//! unreadable), located syntax errors raised while compiling a rule source,
//! and invalid query arguments passed to the spec algebra. "No match" is not
//! an error anywhere in the crate; lookups return [`Option`] instead.

use std::path::PathBuf;

pub use crate::spec::SpecError;
pub use crate::validate::SyntaxError;

/// Convenience alias used by fallible public APIs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error returned by the loaders, the compiler and the resolver.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A data file could not be read.
    #[error("setup failed: cannot read {}: {source}", .path.display())]
    Setup {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The symbol table file was readable but malformed.
    #[error("setup failed: invalid symbol table {}: {message}", .path.display())]
    SymbolTable {
        /// The symbol table file.
        path: PathBuf,
        /// What was wrong with it.
        message: String,
    },

    /// A rule source failed to compile.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A query named an unknown property or value.
    #[error(transparent)]
    Spec(#[from] SpecError),
}

impl Error {
    /// Returns `true` for errors that mean the engine could not be set up at
    /// all (missing or malformed data files).
    #[must_use]
    pub fn is_setup(&self) -> bool {
        matches!(self, Error::Setup { .. } | Error::SymbolTable { .. })
    }

    pub(crate) fn setup(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Setup {
            path: path.into(),
            source,
        }
    }
}
