//! `<Name>ImplBase` and `bind_service`.

use std::fmt;

use codegen::Trait;
use corostub_schema::{Method, Service};

use super::names::{
    call_helper, future_of, handler_name, request_type, response_type, type_path,
};
use crate::code_writer::CodeWriter;
use crate::cw_writeln;

pub(super) fn impl_base_name(service: &Service) -> String {
    format!("{}ImplBase", service.name())
}

pub(super) fn new_impl_base(service: &Service) -> Trait {
    let doc = match service.doc() {
        Some(doc) => doc.to_string(),
        None => format!(
            "Server-side handlers for `{}`. Every method defaults to `UNIMPLEMENTED`.",
            service.proto_name()
        ),
    };

    let mut impl_base = Trait::new(&impl_base_name(service));
    impl_base
        .vis("pub")
        .bound("Self", "Send + Sync + 'static")
        .doc(&doc);
    impl_base
}

/// A default method failing with `UNIMPLEMENTED` naming the method.
pub(super) fn add_handler(impl_base: &mut Trait, method: &Method) {
    let shape = method.call_shape();
    let input = type_path(method.input_type());
    let output = type_path(method.output_type());
    let message = format!("Method {} is unimplemented", method.full_method_name());

    let handler = impl_base.new_fn(&handler_name(method));
    if let Some(doc) = method.doc() {
        handler.doc(doc);
    }
    handler
        .arg_ref_self()
        .arg("request", request_type(shape, &input))
        .ret(future_of(&response_type(shape, &output)))
        .line(format!("async {{ Err(Status::unimplemented({message:?})) }}"));
}

/// One `.add_method(...)` routing the descriptor through the dispatch table.
pub(super) fn write_binding(w: &mut CodeWriter<&mut String>, method: &Method) -> fmt::Result {
    let input = type_path(method.input_type());
    let output = type_path(method.output_type());

    w.writeln(".add_method(")?;
    {
        let _args = w.indent();
        cw_writeln!(w, "&*{},", method.field_name())?;
        cw_writeln!(
            w,
            "server_calls::{}(MethodHandlers::<S, {input}, {output}>::new(",
            call_helper(method.call_shape())
        )?;
        {
            let _ctor = w.indent();
            w.writeln("Arc::clone(&service_impl),")?;
            cw_writeln!(w, "method_id::{},", method.id_name())?;
        }
        w.writeln(")),")?;
    }
    w.writeln(")")
}

pub(super) fn write_bind_service(
    w: &mut CodeWriter<&mut String>,
    service: &Service,
    bindings: &str,
) -> fmt::Result {
    cw_writeln!(
        w,
        "/// Register every `{}` method, dispatching to `service_impl`.",
        service.proto_name()
    )?;
    w.block(
        &format!(
            "pub fn bind_service<S: {}>(service_impl: Arc<S>) -> ServerServiceDefinition",
            impl_base_name(service)
        ),
        |w| {
            w.writeln("ServerServiceDefinition::builder(&*SERVICE_DESCRIPTOR)")?;
            let _calls = w.indent();
            w.write_fragment(bindings)?;
            w.writeln(".build()")
        },
    )
}
