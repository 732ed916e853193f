//! `<Name>ImplBase`: overridable handlers and `bindService()`.

use std::fmt;

use corostub_schema::{Method, Service};

use super::names::{call_helper, fn_name, request_type, response_type, unimplemented_call};
use crate::code_writer::CodeWriter;
use crate::cw_writeln;

/// A handler whose default fails with `UNIMPLEMENTED` naming the method.
pub(super) fn write_handler(w: &mut CodeWriter<&mut String>, method: &Method) -> fmt::Result {
    if let Some(doc) = method.doc() {
        w.kdoc_pre(doc)?;
    }
    w.block(
        &format!(
            "open suspend fun {}(req: {}): {}",
            fn_name(method),
            request_type(method),
            response_type(method)
        ),
        |w| {
            cw_writeln!(
                w,
                "return ServerCallsKt.{}({})",
                unimplemented_call(method.call_shape()),
                method.field_name()
            )
        },
    )
}

/// One `.addMethod(...)` routing the descriptor through the dispatch table.
pub(super) fn write_binding(w: &mut CodeWriter<&mut String>, method: &Method) -> fmt::Result {
    w.writeln(".addMethod(")?;
    let _args = w.indent();
    cw_writeln!(w, "{},", method.field_name())?;
    cw_writeln!(
        w,
        "ServerCallsKt.{}(MethodHandlers<{}, {}>(this, {})))",
        call_helper(method.call_shape()),
        method.input_type(),
        method.output_type(),
        method.id_name()
    )
}

pub(super) fn write_impl_base(
    w: &mut CodeWriter<&mut String>,
    service: &Service,
    handlers: &str,
    bindings: &str,
) -> fmt::Result {
    if let Some(doc) = service.doc() {
        w.kdoc_pre(doc)?;
    }
    w.block(
        &format!(
            "abstract class {}ImplBase : io.grpc.BindableService",
            service.name()
        ),
        |w| {
            if !handlers.is_empty() {
                w.write_fragment(handlers)?;
                w.blank_line()?;
            }
            w.block(
                "override fun bindService(): io.grpc.ServerServiceDefinition",
                |w| {
                    w.writeln(
                        "return io.grpc.ServerServiceDefinition.builder(serviceDescriptor)",
                    )?;
                    let _calls = w.indent();
                    w.write_fragment(bindings)?;
                    w.writeln(".build()")
                },
            )
        },
    )
}
