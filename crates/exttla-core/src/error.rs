//! Error types for module building and extension resolution.
//!
//! Every variant is a configuration error in the source DSL; there is
//! no local recovery, the first error aborts the run.

use thiserror::Error;

/// Which entity category an invalid override targeted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverrideKind {
    Constant,
    Operation,
}

impl std::fmt::Display for OverrideKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverrideKind::Constant => write!(f, "constant"),
            OverrideKind::Operation => write!(f, "operation"),
        }
    }
}

/// Module building / resolution error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("module {name} is declared more than once")]
    DuplicateModule { name: String },

    #[error("parse event outside of a module declaration")]
    EventOutsideModule,

    #[error("unterminated module declaration {name}")]
    UnterminatedModule { name: String },

    #[error("no such module {name}")]
    UnknownModule { name: String },

    #[error("no such module {name}, extended by {referenced_by}")]
    NoSuchModule {
        name: String,
        referenced_by: String,
    },

    #[error("extension cycle: {}", chain.join(" -> "))]
    ExtensionCycle { chain: Vec<String> },

    #[error("invalid override keyword for {kind} {name} in module {module}")]
    InvalidOverride {
        kind: OverrideKind,
        name: String,
        module: String,
    },
}
