use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Separator
///
/// How a repeated path parameter's raw value is split before per-element
/// conversion. Process-wide, not per-parameter.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum Separator {
    #[default]
    #[display("csv")]
    Csv,
    #[display("pipes")]
    Pipes,
    #[display("ssv")]
    Ssv,
    #[display("tsv")]
    Tsv,
}

impl Separator {
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Csv => ',',
            Self::Pipes => '|',
            Self::Ssv => ' ',
            Self::Tsv => '\t',
        }
    }
}

#[derive(Debug, ThisError)]
#[error("unsupported repeated path parameter separator '{0}'")]
pub struct UnsupportedSeparator(pub String);

impl std::str::FromStr for Separator {
    type Err = UnsupportedSeparator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "pipes" => Ok(Self::Pipes),
            "ssv" => Ok(Self::Ssv),
            "tsv" => Ok(Self::Tsv),
            other => Err(UnsupportedSeparator(other.to_string())),
        }
    }
}

///
/// GenConfig
///
/// All generation flags, threaded explicitly into every component so the
/// same engine can serve multiple configurations at once.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GenConfig {
    /// Derive the RPC cancellation scope from the inbound HTTP request's
    /// own signal rather than the caller-supplied context.
    pub use_request_context: bool,
    /// Suffix of generated `register_*` procedures.
    pub register_func_suffix: String,
    /// Enable PATCH field-mask synthesis.
    pub allow_patch_feature: bool,
    /// Permit colons in the final path segment; inverted into the emitted
    /// pattern's assume-colon-verb option.
    pub allow_colon_final_segments: bool,
    pub repeated_path_param_separator: Separator,
    /// Permit repeated fields as body sub-fields.
    pub allow_repeated_fields_in_body: bool,
    /// Unless set, DELETE bindings may not carry a body.
    pub allow_delete_body: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            use_request_context: true,
            register_func_suffix: "Handler".to_string(),
            allow_patch_feature: true,
            allow_colon_final_segments: false,
            repeated_path_param_separator: Separator::Csv,
            allow_repeated_fields_in_body: false,
            allow_delete_body: false,
        }
    }
}

impl GenConfig {
    /// The pattern option emitted into generated route tables.
    #[must_use]
    pub const fn assume_colon_verb(&self) -> bool {
        !self.allow_colon_final_segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_parse_and_char() {
        assert_eq!("csv".parse::<Separator>().unwrap().as_char(), ',');
        assert_eq!("pipes".parse::<Separator>().unwrap().as_char(), '|');
        assert_eq!("ssv".parse::<Separator>().unwrap().as_char(), ' ');
        assert_eq!("tsv".parse::<Separator>().unwrap().as_char(), '\t');
    }

    #[test]
    fn unsupported_separator_is_fatal() {
        let err = "semicolons".parse::<Separator>().unwrap_err();
        assert!(err.to_string().contains("semicolons"));
    }

    #[test]
    fn defaults_match_flag_defaults() {
        let config = GenConfig::default();
        assert!(config.use_request_context);
        assert_eq!(config.register_func_suffix, "Handler");
        assert!(config.allow_patch_feature);
        assert!(config.assume_colon_verb());
        assert_eq!(config.repeated_path_param_separator, Separator::Csv);
    }
}
