//! Crate-wide error type.

use thiserror::Error;

use crate::{BindingError, ConversionError, SchemaError};

/// Any failure raised while building schemas or binding input.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid command declarations.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A value could not be converted to its field type.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// Required fields left unset, or a mismatched command instance.
    #[error(transparent)]
    Binding(#[from] BindingError),
}

/// Result alias using [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
