//! Whole-file emission driver.
//!
//! One generated artifact per descriptor file that declares at least one
//! bound service: a plain-text header, then the per-binding filter statics
//! and request functions, then the route patterns and per-service
//! registration procedures. Emission is deterministic; the same model and
//! configuration always produce byte-identical output.

use crate::{
    GenError,
    config::GenConfig,
    handler::{self, BindingContext},
    normalize, trailer,
};
use httpgw_descriptor::{
    node::{Body, File},
    registry::Registry,
    types::HttpVerb,
    validate,
};
use proc_macro2::TokenStream;
use std::collections::BTreeSet;
use std::fmt::Write;

///
/// Artifact
///
/// One generated output file.
///

#[derive(Clone, Debug)]
pub struct Artifact {
    /// Output file name, derived from the source name.
    pub name: String,
    pub content: String,
}

/// Generate artifacts for every target file. Files without a bound service
/// yield no artifact; any other failure aborts the whole run.
pub fn generate(
    files: &mut [File],
    registry: &Registry,
    config: &GenConfig,
) -> Result<Vec<Artifact>, GenError> {
    let mut artifacts = Vec::new();

    for file in &mut *files {
        let name = output_name(&file.name);
        match generate_file(file, registry, config) {
            Ok(content) => artifacts.push(Artifact { name, content }),
            Err(GenError::NoTargetService { .. }) => {}
            Err(err) => return Err(err),
        }
    }

    Ok(artifacts)
}

/// Generate the gateway module for one descriptor file.
pub fn generate_file(
    file: &mut File,
    registry: &Registry,
    config: &GenConfig,
) -> Result<String, GenError> {
    validate::validate_file(file, registry)?;

    // the single rename pass; every later consumer sees canonical names
    normalize::file(file);

    check_bindings(file, registry, config)?;

    let mut body = TokenStream::new();
    let mut trailers = TokenStream::new();
    let mut eligible = 0usize;

    for service in &file.services {
        if !service.has_bound_method() {
            continue;
        }
        eligible += 1;

        for method in &service.methods {
            for binding in &method.bindings {
                let ctx = BindingContext {
                    package: &file.package,
                    service,
                    method,
                    binding,
                    registry,
                    config,
                };

                if let Some(filter) = handler::filter_static(&ctx)? {
                    body.extend(filter);
                }
                body.extend(handler::request_fn(&ctx)?);
                trailers.extend(trailer::pattern_static(&ctx));
            }
        }

        trailers.extend(trailer::register_fn(&file.package, service, registry, config)?);
    }

    if eligible == 0 {
        return Err(GenError::NoTargetService {
            file: file.name.clone(),
        });
    }

    let mut out = header(file, &additional_imports(file)?);
    let _ = write!(out, "{body}\n{trailers}\n");

    Ok(out)
}

// Service-requested imports, validated as use-tree paths, deduplicated,
// in stable order.
fn additional_imports(file: &File) -> Result<Vec<String>, GenError> {
    let imports: BTreeSet<&str> = file
        .services
        .iter()
        .flat_map(|s| s.additional_imports.iter().map(String::as_str))
        .collect();

    for import in &imports {
        if syn::parse_str::<syn::UseTree>(import).is_err() {
            return Err(GenError::InvalidImport {
                import: (*import).to_string(),
            });
        }
    }

    Ok(imports.into_iter().map(str::to_string).collect())
}

// Flag-gated binding shape checks the descriptor layer cannot make on its
// own: it has no configuration.
fn check_bindings(file: &File, registry: &Registry, config: &GenConfig) -> Result<(), GenError> {
    for service in &file.services {
        for method in &service.methods {
            let request = registry.lookup_message(&method.request_type)?;
            for binding in &method.bindings {
                let route = format!("{}.{}/{}", file.package, service.name, method.name);

                if binding.verb == HttpVerb::Delete
                    && binding.body.is_some()
                    && !config.allow_delete_body
                {
                    return Err(GenError::DeleteWithBody { route });
                }

                if let Some(Body::Field(path)) = &binding.body {
                    let (_, target) = registry.resolve_field_path(request, &path.to_string())?;
                    if target.repeated && !config.allow_repeated_fields_in_body {
                        return Err(GenError::RepeatedFieldInBody {
                            route,
                            path: path.to_string(),
                        });
                    }
                }
            }
        }
    }

    Ok(())
}

fn header(file: &File, imports: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// Code generated by httpgw-gen. DO NOT EDIT.");
    let _ = writeln!(out, "// source: {}", file.name);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "//! HTTP/JSON to gRPC reverse-proxy routes for `{}`.",
        file.package
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "#![allow(dead_code, unused_imports, unused_mut, unused_variables)]"
    );
    let _ = writeln!(out);

    for import in imports {
        let _ = writeln!(out, "use {import};");
    }
    if !imports.is_empty() {
        let _ = writeln!(out);
    }

    out
}

fn output_name(source: &str) -> String {
    let stem = source.strip_suffix(".proto").unwrap_or(source);

    format!("{stem}.gw.rs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_replaces_the_proto_suffix() {
        assert_eq!(output_name("items/v1/items.proto"), "items/v1/items.gw.rs");
        assert_eq!(output_name("odd_name"), "odd_name.gw.rs");
    }
}
