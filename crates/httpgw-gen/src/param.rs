//! Path-parameter classification and value-conversion emission.

use crate::{config::GenConfig, helper};
use httpgw_descriptor::{
    node::Parameter,
    registry::Registry,
    types::{FieldKind, ScalarKind},
};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use serde::Serialize;

///
/// ParamClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum ParamClass {
    Scalar,
    RepeatedScalar,
    Enum,
    RepeatedEnum,
    NestedPath,
}

/// Classify a path parameter. Priority order: nested addressing wins over
/// everything, then enum resolution, then plain scalars. An enum type name
/// that does not resolve in the registry demotes the parameter to a scalar.
#[must_use]
pub fn classify(param: &Parameter, registry: &Registry) -> ParamClass {
    if param.is_nested() {
        return ParamClass::NestedPath;
    }

    if let Some(type_name) = param.target.type_name() {
        if matches!(param.target.kind, FieldKind::Enum(_)) && registry.lookup_enum(type_name).is_some()
        {
            return if param.is_repeated() {
                ParamClass::RepeatedEnum
            } else {
                ParamClass::Enum
            };
        }
    }

    if param.is_repeated() {
        ParamClass::RepeatedScalar
    } else {
        ParamClass::Scalar
    }
}

/// Emit the lookup-and-convert statements for one path parameter. Failures
/// surface at proxy runtime as invalid-argument, naming the parameter and
/// the underlying parse error.
#[must_use]
pub fn bind_tokens(param: &Parameter, registry: &Registry, config: &GenConfig) -> TokenStream {
    let name = param.name();
    let lookup = quote! {
        let val = path_params
            .get(#name)
            .ok_or_else(|| ::tonic::Status::invalid_argument(
                format!("missing parameter {}", #name),
            ))?;
    };

    let convert = match classify(param, registry) {
        ParamClass::Scalar => scalar(param, &name),
        ParamClass::RepeatedScalar => repeated_scalar(param, &name, config),
        ParamClass::Enum => enum_value(param, &name),
        ParamClass::RepeatedEnum => repeated_enum(param, &name, config),
        ParamClass::NestedPath => nested(&name),
    };

    quote! {
        #lookup
        #convert
    }
}

// the terminal field's scalar kind, defaulting unresolved enums and odd
// message targets to string conversion
fn scalar_kind(param: &Parameter) -> ScalarKind {
    match &param.target.kind {
        FieldKind::Scalar(kind) => *kind,
        FieldKind::Message(_) | FieldKind::Enum(_) => ScalarKind::String,
    }
}

fn mismatch(name: &str) -> TokenStream {
    quote! {
        .map_err(|e| ::tonic::Status::invalid_argument(
            format!("type mismatch, parameter: {}, error: {e}", #name),
        ))?
    }
}

fn scalar(param: &Parameter, name: &str) -> TokenStream {
    let field = format_ident!("{}", helper::snake(&param.target.name));
    let conv = format_ident!("{}", scalar_kind(param).converter());
    let check = mismatch(name);

    quote! {
        proto_req.#field = ::httpgw_runtime::convert::#conv(val)#check;
    }
}

fn repeated_scalar(param: &Parameter, name: &str, config: &GenConfig) -> TokenStream {
    let field = format_ident!("{}", helper::snake(&param.target.name));
    let conv = format_ident!("{}", scalar_kind(param).repeated_converter());
    let sep = config.repeated_path_param_separator.as_char();
    let check = mismatch(name);

    quote! {
        proto_req.#field = ::httpgw_runtime::convert::#conv(val, #sep)#check;
    }
}

fn enum_value(param: &Parameter, name: &str) -> TokenStream {
    let field = format_ident!("{}", helper::snake(&param.target.name));
    let ty = enum_target(param);

    quote! {
        proto_req.#field = #ty::from_str_name(val)
            .ok_or_else(|| ::tonic::Status::invalid_argument(
                format!("type mismatch, parameter: {}, error: unknown value '{val}'", #name),
            ))? as i32;
    }
}

fn repeated_enum(param: &Parameter, name: &str, config: &GenConfig) -> TokenStream {
    let field = format_ident!("{}", helper::snake(&param.target.name));
    let ty = enum_target(param);
    let sep = config.repeated_path_param_separator.as_char();

    quote! {
        let mut values = ::std::vec::Vec::new();
        for token in val.split(#sep) {
            let value = #ty::from_str_name(token)
                .ok_or_else(|| ::tonic::Status::invalid_argument(
                    format!("type mismatch, parameter: {}, error: unknown value '{token}'", #name),
                ))?;
            values.push(value as i32);
        }
        proto_req.#field = values;
    }
}

// generic population by dotted path; direct assignment cannot reach through
// sub-messages
fn nested(name: &str) -> TokenStream {
    quote! {
        ::httpgw_runtime::populate_field_from_path(&mut proto_req, #name, val)
            .map_err(|e| ::tonic::Status::invalid_argument(
                format!("type mismatch, parameter: {}, error: {e}", #name),
            ))?;
    }
}

fn enum_target(param: &Parameter) -> TokenStream {
    param
        .target
        .type_name()
        .map_or_else(|| quote!(super::Unknown), helper::enum_ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpgw_descriptor::{
        node::{Enum, EnumVariant, Field},
        path::FieldPath,
    };

    fn registry_with_color() -> Registry {
        let mut reg = Registry::new();
        reg.insert_enum(
            ".test.Color",
            Enum {
                name: "Color".to_string(),
                variants: vec![EnumVariant {
                    name: "RED".to_string(),
                    number: 1,
                }],
            },
        );
        reg
    }

    fn param(path: &str, kind: FieldKind, repeated: bool) -> Parameter {
        Parameter {
            field_path: FieldPath::parse(path),
            target: Field {
                name: path.rsplit('.').next().unwrap().to_string(),
                kind,
                repeated,
            },
        }
    }

    #[test]
    fn classification_priority_order() {
        let reg = registry_with_color();

        // nested beats enum
        let nested = param("a.color", FieldKind::Enum(".test.Color".to_string()), false);
        assert_eq!(classify(&nested, &reg), ParamClass::NestedPath);

        let enum_p = param("color", FieldKind::Enum(".test.Color".to_string()), false);
        assert_eq!(classify(&enum_p, &reg), ParamClass::Enum);

        let rep_enum = param("colors", FieldKind::Enum(".test.Color".to_string()), true);
        assert_eq!(classify(&rep_enum, &reg), ParamClass::RepeatedEnum);

        // unresolved enum type demotes to scalar
        let ghost = param("ghost", FieldKind::Enum(".test.Ghost".to_string()), false);
        assert_eq!(classify(&ghost, &reg), ParamClass::Scalar);

        let scalar = param("id", FieldKind::Scalar(ScalarKind::String), false);
        assert_eq!(classify(&scalar, &reg), ParamClass::Scalar);
        let rep = param("ids", FieldKind::Scalar(ScalarKind::Int64), true);
        assert_eq!(classify(&rep, &reg), ParamClass::RepeatedScalar);
    }

    #[test]
    fn repeated_enum_conversion_splits_and_maps() {
        let reg = registry_with_color();
        let config = GenConfig::default();
        let p = param("colors", FieldKind::Enum(".test.Color".to_string()), true);

        let text = bind_tokens(&p, &reg, &config).to_string();
        assert!(text.contains("val . split (','")); // configured separator
        assert!(text.contains("from_str_name"));
        assert!(text.contains("invalid_argument"));
        assert!(text.contains("colors"));
    }

    #[test]
    fn repeated_scalar_uses_configured_separator() {
        let reg = Registry::new();
        let config = GenConfig {
            repeated_path_param_separator: crate::Separator::Pipes,
            ..GenConfig::default()
        };
        let p = param("ids", FieldKind::Scalar(ScalarKind::Int64), true);

        let text = bind_tokens(&p, &reg, &config).to_string();
        assert!(text.contains("parse_i64_slice"));
        assert!(text.contains("'|'"));
    }

    #[test]
    fn nested_path_population_goes_through_the_generic_call() {
        let reg = Registry::new();
        let config = GenConfig::default();
        let p = param("item.id", FieldKind::Scalar(ScalarKind::String), false);

        let text = bind_tokens(&p, &reg, &config).to_string();
        assert!(text.contains("populate_field_from_path"));
        assert!(text.contains("item.id"));
    }
}
