use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// HttpVerb
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum HttpVerb {
    #[display("DELETE")]
    Delete,
    #[display("GET")]
    Get,
    #[display("PATCH")]
    Patch,
    #[display("POST")]
    Post,
    #[display("PUT")]
    Put,
}

#[derive(Debug, ThisError)]
#[error("unknown HTTP verb '{0}'")]
pub struct UnknownVerb(pub String);

impl std::str::FromStr for HttpVerb {
    type Err = UnknownVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DELETE" => Ok(Self::Delete),
            "GET" => Ok(Self::Get),
            "PATCH" => Ok(Self::Patch),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            other => Err(UnknownVerb(other.to_string())),
        }
    }
}

///
/// ScalarKind
///
/// The protobuf scalar value kinds a path or query parameter can target.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, Ord, PartialEq, PartialOrd, Serialize,
)]
#[remain::sorted]
pub enum ScalarKind {
    Bool,
    Bytes,
    Double,
    Fixed32,
    Fixed64,
    Float,
    Int32,
    Int64,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
    String,
    Uint32,
    Uint64,
}

impl ScalarKind {
    /// Runtime converter for a single raw path-parameter value of this kind.
    #[must_use]
    pub const fn converter(self) -> &'static str {
        match self {
            Self::Bool => "parse_bool",
            Self::Bytes => "parse_bytes",
            Self::Double => "parse_f64",
            Self::Float => "parse_f32",
            Self::Int32 | Self::Sfixed32 | Self::Sint32 => "parse_i32",
            Self::Int64 | Self::Sfixed64 | Self::Sint64 => "parse_i64",
            Self::String => "parse_string",
            Self::Fixed32 | Self::Uint32 => "parse_u32",
            Self::Fixed64 | Self::Uint64 => "parse_u64",
        }
    }

    /// Runtime converter for a separator-joined repeated value of this kind.
    #[must_use]
    pub const fn repeated_converter(self) -> &'static str {
        match self {
            Self::Bool => "parse_bool_slice",
            Self::Bytes => "parse_bytes_slice",
            Self::Double => "parse_f64_slice",
            Self::Float => "parse_f32_slice",
            Self::Int32 | Self::Sfixed32 | Self::Sint32 => "parse_i32_slice",
            Self::Int64 | Self::Sfixed64 | Self::Sint64 => "parse_i64_slice",
            Self::String => "parse_string_slice",
            Self::Fixed32 | Self::Uint32 => "parse_u32_slice",
            Self::Fixed64 | Self::Uint64 => "parse_u64_slice",
        }
    }
}

///
/// FieldKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FieldKind {
    Scalar(ScalarKind),
    /// Message-typed field; carries the fully-qualified type name.
    Message(String),
    /// Enum-typed field; carries the fully-qualified type name.
    Enum(String),
}

impl FieldKind {
    /// Fully-qualified type name for message and enum fields.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Scalar(_) => None,
            Self::Message(name) | Self::Enum(name) => Some(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_round_trips_through_display() {
        for verb in ["GET", "PUT", "POST", "DELETE", "PATCH"] {
            let parsed: HttpVerb = verb.parse().unwrap();
            assert_eq!(parsed.to_string(), verb);
        }
        assert!("TRACE".parse::<HttpVerb>().is_err());
    }

    #[test]
    fn converters_cover_aliased_widths() {
        assert_eq!(ScalarKind::Sint64.converter(), "parse_i64");
        assert_eq!(ScalarKind::Fixed32.converter(), "parse_u32");
        assert_eq!(
            ScalarKind::Double.repeated_converter(),
            "parse_f64_slice"
        );
    }
}
