pub mod config;
pub mod emit;
pub mod fieldmask;
pub mod handler;
mod helper;
pub mod normalize;
pub mod param;
pub mod query;
pub mod shape;
pub mod trailer;
pub mod trie;

pub use config::{GenConfig, Separator};
pub use emit::{Artifact, generate, generate_file};
pub use shape::MethodShape;

use httpgw_descriptor::{error::ErrorTree, registry::RegistryError};
use thiserror::Error as ThisError;

///
/// GenError
///
/// Generation-time failures are fatal for the affected target file; the
/// driver never emits partial output.
///

#[derive(Debug, ThisError)]
pub enum GenError {
    #[error("no service with HTTP bindings in '{file}'")]
    NoTargetService { file: String },

    #[error("repeated field '{path}' not allowed in body of '{route}'")]
    RepeatedFieldInBody { route: String, path: String },

    #[error("body not allowed on DELETE binding '{route}'")]
    DeleteWithBody { route: String },

    #[error("additional import '{import}' is not a valid use path")]
    InvalidImport { import: String },

    #[error(transparent)]
    RegistryError(#[from] RegistryError),

    #[error(transparent)]
    ValidateError(#[from] ErrorTree),
}
