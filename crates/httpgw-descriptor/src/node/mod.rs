mod binding;
mod r#enum;
mod field;
mod file;
mod message;
mod method;
mod parameter;
mod service;

pub use binding::*;
pub use field::*;
pub use file::*;
pub use message::*;
pub use method::*;
pub use parameter::*;
pub use r#enum::*;
pub use service::*;
