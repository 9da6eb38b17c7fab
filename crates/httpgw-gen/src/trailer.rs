//! Service registration emission.
//!
//! The trailer of a generated file: one lazily-built route pattern per
//! binding, then one `register_*` procedure per eligible service wiring
//! every binding into the serve mux. The registration closure owns the full
//! request lifecycle around the translation function: latency measurement,
//! admission, connection leasing, completion notification, and response
//! forwarding.

use crate::{GenError, config::GenConfig, handler::BindingContext, helper, shape::MethodShape};
use httpgw_descriptor::{node::Service, registry::Registry};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// The compiled route pattern for one binding.
pub fn pattern_static(ctx: &BindingContext<'_>) -> TokenStream {
    let ident = ctx.pattern_ident();
    let tmpl = &ctx.binding.path;
    let version = tmpl.version;
    let op_codes = &tmpl.op_codes;
    let pool = &tmpl.pool;
    let verb = tmpl.verb.as_deref().unwrap_or("");
    let assume_colon_verb = ctx.config.assume_colon_verb();

    quote! {
        static #ident: ::std::sync::LazyLock<::httpgw_runtime::Pattern> =
            ::std::sync::LazyLock::new(|| ::httpgw_runtime::Pattern::new(
                #version,
                &[#(#op_codes),*],
                &[#(#pool),*],
                #verb,
                #assume_colon_verb,
            ));
    }
}

/// The registration procedure for one service, covering every binding of
/// every method.
pub fn register_fn(
    package: &str,
    service: &Service,
    registry: &Registry,
    config: &GenConfig,
) -> Result<TokenStream, GenError> {
    let fn_name = format_ident!(
        "register_{}_{}",
        helper::snake(&service.name),
        helper::snake(&config.register_func_suffix),
    );
    let service_name = &service.name;

    let mut routes = Vec::new();
    for method in &service.methods {
        for binding in &method.bindings {
            let ctx = BindingContext {
                package,
                service,
                method,
                binding,
                registry,
                config,
            };
            routes.push(route(&ctx));
        }
    }

    Ok(quote! {
        #[doc = concat!(
            "Register HTTP routes for `", #service_name,
            "` onto `mux`, proxying to connections leased from `endpoint`.",
        )]
        #[allow(clippy::too_many_lines)]
        pub fn #fn_name(
            ctx: ::httpgw_runtime::ServeContext,
            mux: &mut ::httpgw_runtime::ServeMux,
            endpoint: ::httpgw_runtime::EndpointResolver,
            opts: ::httpgw_runtime::DialOptions,
            conns: ::std::option::Option<::httpgw_runtime::ConnProvider>,
            admit: ::httpgw_runtime::AdmissionHook,
            done: ::httpgw_runtime::CompletionHook,
            latency: ::httpgw_runtime::LatencyHook,
        ) -> ::std::result::Result<(), ::httpgw_runtime::RegisterError> {
            let factory = ::httpgw_runtime::ConnFactory::new(endpoint, opts, conns)?;
            #(#routes)*
            Ok(())
        }
    })
}

// One mux route: the closure captures its service-wide collaborators by
// clone and drives the binding's request function.
fn route(ctx: &BindingContext<'_>) -> TokenStream {
    let verb = ctx.binding.verb.to_string();
    let pattern = ctx.pattern_ident();
    let method_key = ctx.method_key();
    let request_fn = ctx.request_fn_ident();
    let client_new = helper::client_new(&ctx.service.name);

    // generation-time choice: cancellation scope follows the inbound
    // request, or stays detached from it
    let call_ctx = if ctx.config.use_request_context {
        quote!(let call_ctx = ctx.for_request(&req);)
    } else {
        quote!(let call_ctx = ctx.detached();)
    };

    let forward = forward(ctx);

    quote! {
        {
            let ctx = ctx.clone();
            let factory = factory.clone();
            let admit = admit.clone();
            let done = done.clone();
            let latency = latency.clone();
            mux.handle(
                #verb,
                &#pattern,
                ::httpgw_runtime::route(move |w, mut req, path_params| {
                    let ctx = ctx.clone();
                    let factory = factory.clone();
                    let admit = admit.clone();
                    let done = done.clone();
                    let latency = latency.clone();
                    async move {
                        let _timer = ::httpgw_runtime::LatencyTimer::start(#method_key, latency);
                        #call_ctx
                        let marshaler = ::httpgw_runtime::marshaler_for_request(&req);
                        match admit(#method_key, &req).await {
                            Ok(true) => {}
                            Ok(false) => {
                                ::httpgw_runtime::forward_error(
                                    w,
                                    &req,
                                    marshaler.as_ref(),
                                    ::tonic::Status::unauthenticated("not login yet"),
                                );
                                return;
                            }
                            Err(status) => {
                                ::httpgw_runtime::forward_error(w, &req, marshaler.as_ref(), status);
                                return;
                            }
                        }
                        let lease = match factory.acquire().await {
                            Ok(lease) => lease,
                            Err(e) => {
                                ::httpgw_runtime::forward_error(
                                    w,
                                    &req,
                                    marshaler.as_ref(),
                                    ::tonic::Status::unavailable(e.to_string()),
                                );
                                return;
                            }
                        };
                        let mut client = #client_new(lease.channel());
                        match #request_fn(&call_ctx, marshaler.as_ref(), &mut client, &mut req, &path_params).await {
                            #forward
                            Err(status) => {
                                ::httpgw_runtime::forward_error(w, &req, marshaler.as_ref(), status);
                            }
                        }
                    }
                }),
            );
        }
    }
}

// The success arm: notify the completion hook, then forward either the
// single message (optionally narrowed to a response sub-field) or the
// stream handle.
fn forward(ctx: &BindingContext<'_>) -> TokenStream {
    let method_key = ctx.method_key();

    if MethodShape::of(ctx.method).returns_stream() {
        quote! {
            Ok((stream, metadata)) => {
                done(#method_key, ::httpgw_runtime::Outcome::Stream, w, &req);
                ::httpgw_runtime::forward_response_stream(
                    &call_ctx, metadata, marshaler.as_ref(), w, &req, stream,
                );
            }
        }
    } else {
        let resp_expr = ctx.binding.response_body.as_ref().map_or_else(
            || quote!(&resp),
            |path| {
                let segs = path
                    .segments()
                    .iter()
                    .map(|s| format_ident!("{}", helper::snake(s)));
                quote!(&resp #(.#segs)*)
            },
        );

        quote! {
            Ok((resp, metadata)) => {
                done(#method_key, ::httpgw_runtime::Outcome::Message(&resp), w, &req);
                ::httpgw_runtime::forward_response_message(
                    &call_ctx, metadata, marshaler.as_ref(), w, &req, #resp_expr,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpgw_descriptor::{
        node::{Binding, Field, Message, Method},
        path::{FieldPath, PathTemplate},
        types::{FieldKind, HttpVerb, ScalarKind},
    };

    fn service() -> (Service, Registry) {
        let request = Message {
            name: "GetItemRequest".to_string(),
            fields: vec![Field {
                name: "id".to_string(),
                kind: FieldKind::Scalar(ScalarKind::String),
                repeated: false,
            }],
        };
        let response = Message {
            name: "GetItemResponse".to_string(),
            fields: vec![Field {
                name: "item".to_string(),
                kind: FieldKind::Message(".items.Item".to_string()),
                repeated: false,
            }],
        };

        let mut registry = Registry::new();
        registry.insert_message(".items.GetItemRequest", request);
        registry.insert_message(".items.GetItemResponse", response);

        let service = Service {
            name: "Items".to_string(),
            additional_imports: vec![],
            methods: vec![Method {
                name: "GetItem".to_string(),
                request_type: ".items.GetItemRequest".to_string(),
                response_type: ".items.GetItemResponse".to_string(),
                client_streaming: false,
                server_streaming: false,
                bindings: vec![Binding {
                    index: 0,
                    verb: HttpVerb::Get,
                    path: PathTemplate {
                        version: 1,
                        op_codes: vec![2, 0, 2, 1, 1, 0],
                        pool: vec!["v1".to_string(), "items".to_string()],
                        verb: None,
                        template: "/v1/items/{id}".to_string(),
                    },
                    body: None,
                    response_body: None,
                    path_params: vec![],
                }],
                comment: None,
            }],
        };

        (service, registry)
    }

    fn ctx<'a>(
        service: &'a Service,
        registry: &'a Registry,
        config: &'a GenConfig,
    ) -> BindingContext<'a> {
        BindingContext {
            package: "items",
            service,
            method: &service.methods[0],
            binding: &service.methods[0].bindings[0],
            registry,
            config,
        }
    }

    #[test]
    fn pattern_static_carries_the_compiled_template() {
        let (service, registry) = service();
        let config = GenConfig::default();
        let text = pattern_static(&ctx(&service, &registry, &config)).to_string();

        assert!(text.contains("PATTERN_ITEMS_GET_ITEM_0"));
        assert!(text.contains("LazyLock"));
        assert!(text.contains("\"v1\" , \"items\""));
        // assume-colon-verb default
        assert!(text.contains("true"));
    }

    #[test]
    fn colon_segments_flag_inverts_into_the_pattern() {
        let (service, registry) = service();
        let config = GenConfig {
            allow_colon_final_segments: true,
            ..GenConfig::default()
        };
        let text = pattern_static(&ctx(&service, &registry, &config)).to_string();
        assert!(text.contains("false"));
    }

    #[test]
    fn register_fn_name_follows_the_configured_suffix() {
        let (service, registry) = service();
        let config = GenConfig {
            register_func_suffix: "GatewayClient".to_string(),
            ..GenConfig::default()
        };
        let text = register_fn("items", &service, &registry, &config)
            .unwrap()
            .to_string();
        assert!(text.contains("register_items_gateway_client"));
    }

    #[test]
    fn route_runs_admission_before_leasing_a_connection() {
        let (service, registry) = service();
        let config = GenConfig::default();
        let text = register_fn("items", &service, &registry, &config)
            .unwrap()
            .to_string();

        let admit = text.find("admit (\"items.Items/GetItem\"").unwrap();
        let lease = text.find("factory . acquire").unwrap();
        let call = text.find("request_items_get_item_0").unwrap();
        assert!(admit < lease && lease < call);
        assert!(text.contains("not login yet"));
        assert!(text.contains("LatencyTimer :: start"));
    }

    #[test]
    fn request_context_choice_is_burned_in_at_generation_time() {
        let (service, registry) = service();

        let scoped = register_fn("items", &service, &registry, &GenConfig::default())
            .unwrap()
            .to_string();
        assert!(scoped.contains("ctx . for_request"));

        let detached_cfg = GenConfig {
            use_request_context: false,
            ..GenConfig::default()
        };
        let detached = register_fn("items", &service, &registry, &detached_cfg)
            .unwrap()
            .to_string();
        assert!(detached.contains("ctx . detached"));
        assert!(!detached.contains("for_request"));
    }

    #[test]
    fn response_body_narrows_the_forwarded_message() {
        let (mut service, registry) = service();
        service.methods[0].bindings[0].response_body = Some(FieldPath::parse("item"));
        let config = GenConfig::default();
        let text = register_fn("items", &service, &registry, &config)
            .unwrap()
            .to_string();

        assert!(text.contains("& resp . item"));
        // completion hook still sees the whole response
        assert!(text.contains("Outcome :: Message (& resp)"));
    }

    #[test]
    fn streaming_route_forwards_the_stream_handle() {
        let (mut service, registry) = service();
        service.methods[0].server_streaming = true;
        let config = GenConfig::default();
        let text = register_fn("items", &service, &registry, &config)
            .unwrap()
            .to_string();

        assert!(text.contains("Outcome :: Stream"));
        assert!(text.contains("forward_response_stream"));
        assert!(!text.contains("forward_response_message"));
    }
}
