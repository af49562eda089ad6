//! Error taxonomy for version resolution and tool surface generation.
//!
//! Configuration errors (unsupported annotation shapes, untyped output
//! parameters, colliding flags) are raised while building a command line
//! surface and are fatal to that build. Errors raised by registered
//! implementations pass through [`VcError::Implementation`] unchanged.

use thiserror::Error;

use crate::version::VersionKey;

/// Boxed error returned by registered implementations and result routines.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the version registry, the dispatcher and the CLI builder.
#[derive(Debug, Error)]
pub enum VcError {
    #[error("Malformed version '{input}': expected yyyymmdd")]
    MalformedVersion { input: String },

    #[error(
        "The method {name} is not available at version {requested}.\nThe first available version is {first_available}."
    )]
    VersionUnavailable {
        name: String,
        requested: VersionKey,
        first_available: VersionKey,
    },

    #[error("No versioned function registered under '{name}'")]
    UnknownFunction { name: String },

    #[error("Malformed versioned symbol '{symbol}': expected _<name>_<yyyymmdd>")]
    MalformedSymbol { symbol: String },

    #[error("Tool {tool}: parameter '{param}' has unsupported annotation {shape}; only scalars and list[T] are supported")]
    UnsupportedAnnotationShape {
        tool: String,
        param: String,
        shape: String,
    },

    #[error("Tool {tool}: output parameter '{param}' of the result routine needs an explicit type")]
    MissingTypeForOutputParameter { tool: String, param: String },

    #[error("Tool {tool}: flag '-{flag}' is declared more than once")]
    DuplicateFlag { tool: String, flag: String },

    #[error(transparent)]
    Implementation(BoxError),
}

impl VcError {
    /// Returns true for errors detected while building a tool surface.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedAnnotationShape { .. }
                | Self::MissingTypeForOutputParameter { .. }
                | Self::DuplicateFlag { .. }
        )
    }
}
