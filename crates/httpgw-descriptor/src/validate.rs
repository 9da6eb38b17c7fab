//! Model validation, staged: per-node identifier checks first, then
//! file-wide invariants that need the registry.

use crate::{
    MAX_IDENT_LEN, err,
    error::ErrorTree,
    node::{Body, File, Method},
    registry::Registry,
};
use std::collections::BTreeSet;

/// Run full validation for one target file in a deterministic order.
pub fn validate_file(file: &File, registry: &Registry) -> Result<(), ErrorTree> {
    let mut errs = ErrorTree::new();

    validate_nodes(file, &mut errs);
    validate_global(file, registry, &mut errs);

    errs.result()
}

/// Ensure an identifier is non-empty, ASCII, and within the maximum length.
pub(crate) fn validate_ident(ident: &str) -> Result<(), String> {
    if ident.is_empty() {
        return Err("ident is empty".to_string());
    }
    if ident.len() > MAX_IDENT_LEN {
        return Err(format!(
            "ident '{ident}' exceeds max length {MAX_IDENT_LEN}"
        ));
    }
    if !ident.is_ascii() {
        return Err(format!("ident '{ident}' must be ASCII"));
    }

    Ok(())
}

// Structural, node-local checks.
fn validate_nodes(file: &File, errs: &mut ErrorTree) {
    for svc in &file.services {
        if let Err(e) = validate_ident(&svc.name) {
            errs.add_at(&svc.name, e);
        }
        for meth in &svc.methods {
            let route = format!("{}.{}", svc.name, meth.name);
            if let Err(e) = validate_ident(&meth.name) {
                errs.add_at(&route, e);
            }
            validate_binding_indexes(meth, &route, errs);
        }
    }
}

// Binding indexes must equal the binding's position: generated symbol names
// derive from them, so a gap or repeat silently renames emitted code.
fn validate_binding_indexes(meth: &Method, route: &str, errs: &mut ErrorTree) {
    for (pos, binding) in meth.bindings.iter().enumerate() {
        if binding.index != pos {
            err!(
                errs,
                "{route}: binding at position {pos} carries index {}",
                binding.index
            );
        }
    }
}

// File-wide invariants that need the full registry view.
fn validate_global(file: &File, registry: &Registry, errs: &mut ErrorTree) {
    let mut service_names = BTreeSet::new();
    for svc in &file.services {
        if !service_names.insert(svc.name.clone()) {
            err!(errs, "duplicate service name '{}'", svc.name);
        }

        let mut method_names = BTreeSet::new();
        for meth in &svc.methods {
            if !method_names.insert(meth.name.clone()) {
                err!(errs, "duplicate method name '{}.{}'", svc.name, meth.name);
            }
            validate_bindings(meth, registry, &svc.name, errs);
        }
    }
}

// Every body path, response-body path, and path parameter must resolve
// against its message's field tree.
fn validate_bindings(meth: &Method, registry: &Registry, svc_name: &str, errs: &mut ErrorTree) {
    let meth_name = meth.name.as_str();
    let request = match registry.lookup_message(&meth.request_type) {
        Ok(msg) => msg,
        Err(e) => {
            errs.add_at(format!("{svc_name}.{meth_name}"), e);
            return;
        }
    };
    let response = match registry.lookup_message(&meth.response_type) {
        Ok(msg) => msg,
        Err(e) => {
            errs.add_at(format!("{svc_name}.{meth_name}"), e);
            return;
        }
    };

    for binding in &meth.bindings {
        let route = format!("{svc_name}.{meth_name}[{}]", binding.index);

        if let Some(Body::Field(path)) = &binding.body {
            if let Err(e) = registry.resolve_field_path(request, &path.to_string()) {
                errs.add_at(&route, e);
            }
        }
        if let Some(path) = &binding.response_body {
            if let Err(e) = registry.resolve_field_path(response, &path.to_string()) {
                errs.add_at(&route, e);
            }
        }
        for param in &binding.path_params {
            if let Err(e) = registry.resolve_field_path(request, &param.name()) {
                errs.add_at(&route, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        node::{Binding, Field, Message, Method, Parameter, Service},
        path::{FieldPath, PathTemplate},
        types::{FieldKind, HttpVerb, ScalarKind},
    };

    fn request_message() -> Message {
        Message {
            name: "GetItemRequest".to_string(),
            fields: vec![Field {
                name: "id".to_string(),
                kind: FieldKind::Scalar(ScalarKind::String),
                repeated: false,
            }],
        }
    }

    fn response_message() -> Message {
        Message {
            name: "GetItemResponse".to_string(),
            fields: vec![],
        }
    }

    fn binding(index: usize, params: Vec<Parameter>) -> Binding {
        Binding {
            index,
            verb: HttpVerb::Get,
            path: PathTemplate::default(),
            body: None,
            response_body: None,
            path_params: params,
        }
    }

    fn model(bindings: Vec<Binding>) -> (File, Registry) {
        let file = File {
            name: "items.proto".to_string(),
            package: "items".to_string(),
            messages: vec![request_message(), response_message()],
            services: vec![Service {
                name: "Items".to_string(),
                additional_imports: vec![],
                methods: vec![Method {
                    name: "GetItem".to_string(),
                    request_type: ".items.GetItemRequest".to_string(),
                    response_type: ".items.GetItemResponse".to_string(),
                    client_streaming: false,
                    server_streaming: false,
                    bindings,
                    comment: None,
                }],
            }],
        };
        let mut reg = Registry::new();
        reg.load_file(&file);

        (file, reg)
    }

    fn param(path: &str) -> Parameter {
        Parameter {
            field_path: FieldPath::parse(path),
            target: Field {
                name: path.to_string(),
                kind: FieldKind::Scalar(ScalarKind::String),
                repeated: false,
            },
        }
    }

    #[test]
    fn valid_model_passes() {
        let (file, reg) = model(vec![binding(0, vec![param("id")])]);
        assert!(validate_file(&file, &reg).is_ok());
    }

    #[test]
    fn unresolved_path_param_fails() {
        let (file, reg) = model(vec![binding(0, vec![param("nope")])]);
        let errs = validate_file(&file, &reg).unwrap_err();
        assert!(errs.to_string().contains("nope"));
    }

    #[test]
    fn out_of_position_binding_index_fails() {
        let (file, reg) = model(vec![binding(1, vec![])]);
        let errs = validate_file(&file, &reg).unwrap_err();
        assert!(errs.to_string().contains("carries index 1"));
    }

    #[test]
    fn rejects_non_ascii_ident() {
        assert!(validate_ident("héllo").is_err());
        assert!(validate_ident("").is_err());
        assert!(validate_ident("GetItem").is_ok());
    }
}
