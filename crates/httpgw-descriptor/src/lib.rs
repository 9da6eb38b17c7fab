pub mod error;
pub mod node;
pub mod path;
pub mod registry;
pub mod types;
pub mod validate;

/// Fully-qualified name of the well-known update-mask message type. A request
/// message field of this type is eligible as the method's field-mask field.
pub const FIELD_MASK_TYPE: &str = ".google.protobuf.FieldMask";

/// Maximum length for service and method identifiers.
pub const MAX_IDENT_LEN: usize = 128;

use crate::{error::ErrorTree, registry::RegistryError};
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        FIELD_MASK_TYPE, err,
        error::ErrorTree,
        node::*,
        path::{FieldPath, PathTemplate},
        registry::Registry,
        types::{FieldKind, HttpVerb, ScalarKind},
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    RegistryError(#[from] RegistryError),

    #[error(transparent)]
    ValidateError(#[from] ErrorTree),
}
