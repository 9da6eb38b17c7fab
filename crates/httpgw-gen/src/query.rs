//! Binding field-set analysis: which request fields must be populated from
//! the query string, and the exclusion filter the generated code embeds.

use crate::trie::DoubleArray;
use httpgw_descriptor::node::{Binding, Body, Message};
use std::collections::BTreeSet;

/// Whether the binding needs query-string population.
///
/// A wildcard body short-circuits to `false`: the whole message is already
/// satisfied by the body, path parameters notwithstanding. Otherwise this is
/// a conservative over-approximation — it may report `true` for a binding
/// whose residual field set turns out empty at runtime, which only costs a
/// little unreachable generated code.
#[must_use]
pub fn has_query_params(binding: &Binding, request: &Message) -> bool {
    if matches!(binding.body, Some(Body::Wildcard)) {
        return false;
    }

    let mut fields: BTreeSet<&str> = request.fields.iter().map(|f| f.name.as_str()).collect();

    // removal is by the full dotted path, so a nested body or parameter
    // path leaves its top-level field in the residual set
    if let Some(Body::Field(path)) = &binding.body {
        let dotted = path.to_string();
        fields.remove(dotted.as_str());
    }
    for param in &binding.path_params {
        let name = param.name();
        fields.remove(name.as_str());
    }

    !fields.is_empty()
}

/// The exclusion filter for query-string population: every body-bound and
/// path-bound field path, compiled into a double-array trie.
#[must_use]
pub fn query_filter(binding: &Binding) -> DoubleArray {
    let mut seqs: Vec<Vec<String>> = Vec::new();

    if let Some(Body::Field(path)) = &binding.body {
        seqs.push(path.segments().to_vec());
    }
    for param in &binding.path_params {
        seqs.push(param.field_path.segments().to_vec());
    }

    DoubleArray::new(seqs)
}
