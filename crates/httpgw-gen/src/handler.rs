//! Per-binding request-translation synthesis.
//!
//! Each handler is assembled from one token builder per state:
//! body decode, field-mask patch, path-parameter bind, query-parameter
//! bind, invoke. Transitions are strictly left-to-right and a state is
//! skipped when its precondition does not hold, so every generated function
//! is straight-line and terminating. Decode and conversion failures return
//! invalid-argument before the RPC is ever invoked; RPC failures propagate
//! with their original status.

use crate::{
    GenError,
    config::GenConfig,
    fieldmask, helper, param, query,
    shape::MethodShape,
};
use httpgw_descriptor::{
    node::{Binding, Body, Message, Method, Service},
    registry::Registry,
    types::HttpVerb,
};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

///
/// BindingContext
///
/// Everything the synthesis states need about one binding, with the
/// registry and configuration threaded explicitly.
///

pub struct BindingContext<'a> {
    pub package: &'a str,
    pub service: &'a Service,
    pub method: &'a Method,
    pub binding: &'a Binding,
    pub registry: &'a Registry,
    pub config: &'a GenConfig,
}

impl BindingContext<'_> {
    pub(crate) fn request_message(&self) -> Result<&Message, GenError> {
        Ok(self.registry.lookup_message(&self.method.request_type)?)
    }

    pub(crate) fn request_fn_ident(&self) -> Ident {
        helper::binding_fn(
            "request",
            &self.service.name,
            &self.method.name,
            self.binding.index,
        )
    }

    pub(crate) fn filter_ident(&self) -> Ident {
        helper::binding_static(
            "FILTER",
            &self.service.name,
            &self.method.name,
            self.binding.index,
        )
    }

    pub(crate) fn pattern_ident(&self) -> Ident {
        helper::binding_static(
            "PATTERN",
            &self.service.name,
            &self.method.name,
            self.binding.index,
        )
    }

    /// Route key consulted by every registration callback.
    pub(crate) fn method_key(&self) -> String {
        format!(
            "{}.{}/{}",
            self.package, self.service.name, self.method.name
        )
    }

    fn rpc_ident(&self) -> Ident {
        format_ident!("{}", helper::snake(&self.method.name))
    }
}

/// The embedded query filter for this binding, when it needs one.
pub fn filter_static(ctx: &BindingContext<'_>) -> Result<Option<TokenStream>, GenError> {
    // streaming-body handlers consume the body whole; nothing is left for
    // the query string
    if MethodShape::of(ctx.method).streams_body() {
        return Ok(None);
    }
    let request = ctx.request_message()?;
    if !query::has_query_params(ctx.binding, request) {
        return Ok(None);
    }

    let ident = ctx.filter_ident();
    let filter = query::query_filter(ctx.binding);

    Ok(Some(quote! {
        static #ident: ::httpgw_runtime::DoubleArray = #filter;
    }))
}

/// The request-translation function for one binding.
pub fn request_fn(ctx: &BindingContext<'_>) -> Result<TokenStream, GenError> {
    match MethodShape::of(ctx.method) {
        MethodShape::Unary | MethodShape::ServerStream => unary_like(ctx),
        MethodShape::ClientStream => client_stream(ctx),
        MethodShape::BidiStream => bidi_stream(ctx),
    }
}

fn signature(ctx: &BindingContext<'_>) -> TokenStream {
    let fn_name = ctx.request_fn_ident();
    let client_ty = helper::client_ty(&ctx.service.name);
    let resp_ty = helper::message_ty(&ctx.method.response_type);
    let doc = ctx.method.comment.as_ref().map(|c| quote!(#[doc = #c]));

    let ret = if MethodShape::of(ctx.method).returns_stream() {
        quote!((::tonic::Streaming<#resp_ty>, ::httpgw_runtime::ServerMetadata))
    } else {
        quote!((#resp_ty, ::httpgw_runtime::ServerMetadata))
    };

    quote! {
        #doc
        #[allow(dead_code, unused_mut)]
        async fn #fn_name(
            ctx: &::httpgw_runtime::CallContext,
            marshaler: &dyn ::httpgw_runtime::Marshaler,
            client: &mut #client_ty,
            req: &mut ::httpgw_runtime::HttpRequest,
            path_params: &::std::collections::HashMap<::std::string::String, ::std::string::String>,
        ) -> ::std::result::Result<#ret, ::tonic::Status>
    }
}

// BodyDecode: populate the body-bound part of the request, tolerating EOF
// (an absent body leaves defaults in place).
pub(crate) fn body_decode(ctx: &BindingContext<'_>) -> Option<TokenStream> {
    let body_spec = ctx.binding.body.as_ref()?;

    let assign = match body_spec {
        Body::Wildcard => quote!(proto_req),
        Body::Field(path) => {
            let segs = path
                .segments()
                .iter()
                .map(|s| format_ident!("{}", helper::snake(s)));
            quote!(proto_req #(.#segs)*)
        }
    };

    Some(quote! {
        let body = ::httpgw_runtime::read_body(req)
            .map_err(|e| ::tonic::Status::invalid_argument(e.to_string()))?;
        if let Err(e) = marshaler.decode(&body, &mut #assign) {
            if !e.is_eof() {
                return Err(::tonic::Status::invalid_argument(e.to_string()));
            }
        }
    })
}

// FieldMaskPatch: PATCH-only. An explicit non-empty mask is normalized in
// place. With a wildcard body the mask is otherwise inferred from the paths
// literally present in the raw payload — the decoded message cannot tell
// "absent" from "default value", the raw bytes can.
pub(crate) fn field_mask_patch(ctx: &BindingContext<'_>) -> Option<TokenStream> {
    if !ctx.config.allow_patch_feature || ctx.binding.verb != HttpVerb::Patch {
        return None;
    }
    ctx.binding.body.as_ref()?;
    let mask = fieldmask::resolve_field_mask(ctx.method, ctx.registry)?;
    let ident = format_ident!("{}", helper::snake(&mask.name));

    if matches!(ctx.binding.body, Some(Body::Wildcard)) {
        Some(quote! {
            match proto_req.#ident.as_mut() {
                Some(mask) if !mask.paths.is_empty() => {
                    ::httpgw_runtime::normalize_field_mask(mask);
                }
                _ => {
                    let mask = ::httpgw_runtime::field_mask_from_request_body(&body)
                        .map_err(|e| ::tonic::Status::invalid_argument(e.to_string()))?;
                    proto_req.#ident = ::std::option::Option::Some(mask);
                }
            }
        })
    } else {
        Some(quote! {
            if let ::std::option::Option::Some(mask) = proto_req.#ident.as_mut() {
                if !mask.paths.is_empty() {
                    ::httpgw_runtime::normalize_field_mask(mask);
                }
            }
        })
    }
}

// PathParamBind: one lookup-and-convert block per parameter, in binding
// order.
pub(crate) fn path_param_bind(ctx: &BindingContext<'_>) -> Option<TokenStream> {
    if ctx.binding.path_params.is_empty() {
        return None;
    }

    let binds = ctx
        .binding
        .path_params
        .iter()
        .map(|p| param::bind_tokens(p, ctx.registry, ctx.config));

    Some(quote! {
        #(#binds)*
    })
}

// QueryParamBind: populate the residual fields from the query string,
// excluding body- and path-bound paths through the embedded filter.
pub(crate) fn query_param_bind(
    ctx: &BindingContext<'_>,
) -> Result<Option<TokenStream>, GenError> {
    let request = ctx.request_message()?;
    if !query::has_query_params(ctx.binding, request) {
        return Ok(None);
    }

    let filter = ctx.filter_ident();

    Ok(Some(quote! {
        let query = ::httpgw_runtime::parse_query(req)
            .map_err(|e| ::tonic::Status::invalid_argument(e.to_string()))?;
        ::httpgw_runtime::populate_query_parameters(&mut proto_req, &query, &#filter)
            .map_err(|e| ::tonic::Status::invalid_argument(e.to_string()))?;
    }))
}

// Invoke + Respond for the single-request shapes.
fn invoke(ctx: &BindingContext<'_>) -> TokenStream {
    let rpc = ctx.rpc_ident();

    if MethodShape::of(ctx.method).returns_stream() {
        quote! {
            let response = client.#rpc(ctx.request(proto_req)).await?;
            let (meta, stream, _extensions) = response.into_parts();
            metadata.headers = meta.into_headers();
            Ok((stream, metadata))
        }
    } else {
        quote! {
            let response = client.#rpc(ctx.request(proto_req)).await?;
            let (meta, message, _extensions) = response.into_parts();
            metadata.headers = meta.into_headers();
            Ok((message, metadata))
        }
    }
}

fn unary_like(ctx: &BindingContext<'_>) -> Result<TokenStream, GenError> {
    let sig = signature(ctx);
    let req_ty = helper::message_ty(&ctx.method.request_type);
    let body = body_decode(ctx);
    let mask = field_mask_patch(ctx);
    let params = path_param_bind(ctx);
    let query = query_param_bind(ctx)?;
    let invoke = invoke(ctx);

    Ok(quote! {
        #sig {
            let mut proto_req = #req_ty::default();
            let mut metadata = ::httpgw_runtime::ServerMetadata::default();
            #body
            #mask
            #params
            #query
            #invoke
        }
    })
}

// The body is a stream of request elements, decoded to exhaustion and sent
// as the client stream; one response plus trailers comes back.
fn client_stream(ctx: &BindingContext<'_>) -> Result<TokenStream, GenError> {
    let sig = signature(ctx);
    let req_ty = helper::message_ty(&ctx.method.request_type);
    let rpc = ctx.rpc_ident();

    Ok(quote! {
        #sig {
            let mut metadata = ::httpgw_runtime::ServerMetadata::default();
            let body = ::httpgw_runtime::read_body(req)
                .map_err(|e| ::tonic::Status::invalid_argument(e.to_string()))?;
            let mut decoder = marshaler.stream_decoder(body);
            let mut requests = ::std::vec::Vec::new();
            loop {
                let mut proto_req = #req_ty::default();
                match decoder.decode(&mut proto_req) {
                    Ok(true) => requests.push(proto_req),
                    Ok(false) => break,
                    Err(e) => return Err(::tonic::Status::invalid_argument(e.to_string())),
                }
            }
            let response = client
                .#rpc(ctx.stream_request(::tokio_stream::iter(requests)))
                .await?;
            let (meta, message, _extensions) = response.into_parts();
            metadata.headers = meta.into_headers();
            Ok((message, metadata))
        }
    })
}

// Bidi: the inbound forwarding loop runs in its own task, concurrent with
// header retrieval; the channel is the only coordination between the two
// directions. The stream handle returns as soon as headers are available.
fn bidi_stream(ctx: &BindingContext<'_>) -> Result<TokenStream, GenError> {
    let sig = signature(ctx);
    let req_ty = helper::message_ty(&ctx.method.request_type);
    let rpc = ctx.rpc_ident();

    Ok(quote! {
        #sig {
            let mut metadata = ::httpgw_runtime::ServerMetadata::default();
            let body = ::httpgw_runtime::read_body(req)
                .map_err(|e| ::tonic::Status::invalid_argument(e.to_string()))?;
            let (tx, rx) = ::tokio::sync::mpsc::channel(1);
            let mut decoder = marshaler.stream_decoder(body);
            ::tokio::spawn(async move {
                loop {
                    let mut proto_req = #req_ty::default();
                    match decoder.decode(&mut proto_req) {
                        Ok(true) => {
                            if tx.send(proto_req).await.is_err() {
                                break;
                            }
                        }
                        Ok(false) | Err(_) => break,
                    }
                }
            });
            let requests = ::tokio_stream::wrappers::ReceiverStream::new(rx);
            let response = client.#rpc(ctx.stream_request(requests)).await?;
            let (meta, stream, _extensions) = response.into_parts();
            metadata.headers = meta.into_headers();
            Ok((stream, metadata))
        }
    })
}
