//! Identifier and type-path helpers shared by the emission modules.

use convert_case::{Case, Casing};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

pub(crate) fn snake(s: &str) -> String {
    s.to_case(Case::Snake)
}

pub(crate) fn pascal(s: &str) -> String {
    s.to_case(Case::Pascal)
}

pub(crate) fn shouty(s: &str) -> String {
    snake(s).to_ascii_uppercase()
}

/// Unqualified type name of a fully-qualified descriptor type name.
pub(crate) fn last_segment(fq_name: &str) -> &str {
    fq_name.rsplit('.').next().map_or(fq_name, |s| s)
}

/// Path of a generated message type, addressed relative to the module that
/// hosts the emitted file (a sibling of the RPC-codegen output).
pub(crate) fn message_ty(fq_name: &str) -> TokenStream {
    let ident = format_ident!("{}", pascal(last_segment(fq_name)));

    quote!(super::#ident)
}

/// Path of a generated enum type.
pub(crate) fn enum_ty(fq_name: &str) -> TokenStream {
    message_ty(fq_name)
}

/// RPC client type for a service, as emitted by the transport codegen.
pub(crate) fn client_ty(service: &str) -> TokenStream {
    let module = format_ident!("{}_client", snake(service));
    let client = format_ident!("{}Client", pascal(service));

    quote!(super::#module::#client<::tonic::transport::Channel>)
}

pub(crate) fn client_new(service: &str) -> TokenStream {
    let module = format_ident!("{}_client", snake(service));
    let client = format_ident!("{}Client", pascal(service));

    quote!(super::#module::#client::new)
}

/// Per-binding function symbol, e.g. `request_items_get_item_0`.
pub(crate) fn binding_fn(prefix: &str, service: &str, method: &str, index: usize) -> Ident {
    format_ident!("{prefix}_{}_{}_{index}", snake(service), snake(method))
}

/// Per-binding static symbol, e.g. `FILTER_ITEMS_GET_ITEM_0`.
pub(crate) fn binding_static(prefix: &str, service: &str, method: &str, index: usize) -> Ident {
    format_ident!("{prefix}_{}_{}_{index}", shouty(service), shouty(method))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_index_disambiguated() {
        assert_eq!(
            binding_fn("request", "Items", "GetItem", 1).to_string(),
            "request_items_get_item_1"
        );
        assert_eq!(
            binding_static("PATTERN", "Items", "GetItem", 0).to_string(),
            "PATTERN_ITEMS_GET_ITEM_0"
        );
    }

    #[test]
    fn message_path_uses_unqualified_pascal_name() {
        assert_eq!(
            message_ty(".items.v1.GetItemRequest").to_string(),
            quote!(super::GetItemRequest).to_string()
        );
    }
}
