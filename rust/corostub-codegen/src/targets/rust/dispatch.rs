//! `MethodHandlers<S, Req, Resp>`: the typed dispatch table.
//!
//! `bind_service` creates one handler value per method, carrying the method
//! ID. Each shape gets one `server_calls::*Method` impl per distinct
//! request/response pair, so a handler can only be bound to a method whose
//! messages match; the `match` on the ID picks among methods sharing a pair.
//! Shapes with no methods get no impl.

use codegen::{Block, Scope};
use corostub_schema::{CallShape, Method, Service};

use super::names::{
    future_of, handler_name, request_type, response_type, server_method_trait, type_path,
};
use super::server::impl_base_name;
use crate::render::ShapeBuckets;

/// Arms of one `server_calls::*Method<Req, Resp>` impl.
#[derive(Debug, Default)]
pub(super) struct DispatchImpl {
    input: String,
    output: String,
    arms: Vec<String>,
}

pub(super) fn add_branch(impls: &mut Vec<DispatchImpl>, method: &Method, tracing: bool) {
    let input = type_path(method.input_type());
    let output = type_path(method.output_type());

    let call = format!("service_impl.{}(request)", handler_name(method));
    let call = if tracing {
        format!(
            "::tracing::Instrument::instrument({call}, ::tracing::debug_span!(\"dispatch\", service = SERVICE_NAME, method = {:?}))",
            method.name()
        )
    } else {
        call
    };
    let arm = format!("method_id::{} => {call}.await,", method.id_name());

    match impls
        .iter_mut()
        .find(|existing| existing.input == input && existing.output == output)
    {
        Some(existing) => existing.arms.push(arm),
        None => impls.push(DispatchImpl {
            input,
            output,
            arms: vec![arm],
        }),
    }
}

pub(super) fn push_method_handlers(
    scope: &mut Scope,
    service: &Service,
    dispatch: &ShapeBuckets<Vec<DispatchImpl>>,
) {
    scope
        .new_struct("MethodHandlers")
        .doc("Routes calls for one bound method to its handler.")
        .generic("S")
        .generic("Req")
        .generic("Resp")
        .field("service_impl", "Arc<S>")
        .field("method_id", "u32")
        .field("_types", "PhantomData<fn(Req) -> Resp>");

    scope
        .new_impl("MethodHandlers")
        .generic("S")
        .generic("Req")
        .generic("Resp")
        .target_generic("S")
        .target_generic("Req")
        .target_generic("Resp")
        .new_fn("new")
        .arg("service_impl", "Arc<S>")
        .arg("method_id", "u32")
        .ret("Self")
        .line("Self {")
        .line("    service_impl,")
        .line("    method_id,")
        .line("    _types: PhantomData,")
        .line("}");

    for (shape, impls) in dispatch.iter() {
        for dispatch_impl in impls {
            push_router(scope, service, shape, dispatch_impl);
        }
    }
}

fn push_router(scope: &mut Scope, service: &Service, shape: CallShape, dispatch_impl: &DispatchImpl) {
    let DispatchImpl {
        input,
        output,
        arms,
    } = dispatch_impl;

    let mut router = Block::new("match id");
    for arm in arms {
        router.line(arm);
    }
    let unknown = format!(
        "method id {{other}} is not a {shape} method of {}",
        service.proto_name().replace('{', "{{").replace('}', "}}")
    );
    router.line(format!("other => unreachable!({unknown:?}),"));

    let mut body = Block::new("async move");
    body.push_block(router);

    scope
        .new_impl(&format!("MethodHandlers<S, {input}, {output}>"))
        .generic("S")
        .impl_trait(format!("{}<{input}, {output}>", server_method_trait(shape)))
        .bound("S", impl_base_name(service))
        .new_fn("invoke")
        .arg_ref_self()
        .arg("request", request_type(shape, input))
        .ret(future_of(&response_type(shape, output)))
        .line("let service_impl = Arc::clone(&self.service_impl);")
        .line("let id = self.method_id;")
        .push_block(body);
}
