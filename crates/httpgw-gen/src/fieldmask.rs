//! Field-mask resolution for PATCH partial-update synthesis.

use httpgw_descriptor::{node::{Field, Method}, registry::Registry};

/// The request message's single field of the well-known update-mask type.
///
/// Returns `None` for zero matches, and — deliberately — also for more than
/// one: ambiguity silently disables mask synthesis for the method instead of
/// failing the run. Known sharp edge, pinned by tests.
#[must_use]
pub fn resolve_field_mask<'a>(method: &Method, registry: &'a Registry) -> Option<&'a Field> {
    let request = registry.lookup_message(&method.request_type).ok()?;

    let mut found = None;
    for field in request.field_mask_fields() {
        if found.is_some() {
            return None;
        }
        found = Some(field);
    }

    found
}
