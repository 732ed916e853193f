//! `<Name>Stub` and the `newStub` factories.

use std::fmt;

use corostub_schema::{Method, Service};

use super::names::{call_helper, fn_name, request_type, response_type};
use crate::code_writer::CodeWriter;
use crate::cw_writeln;

/// A suspending call with the same shape as the server handler.
pub(super) fn write_stub_call(w: &mut CodeWriter<&mut String>, method: &Method) -> fmt::Result {
    if let Some(doc) = method.doc() {
        w.kdoc_pre(doc)?;
    }
    w.block(
        &format!(
            "suspend fun {}(req: {}): {}",
            fn_name(method),
            request_type(method),
            response_type(method)
        ),
        |w| {
            cw_writeln!(w, "return ClientCallsKt.{}(", call_helper(method.call_shape()))?;
            let _args = w.indent();
            cw_writeln!(
                w,
                "getChannel().newCall({}, callOptions), req)",
                method.field_name()
            )
        },
    )
}

pub(super) fn write_factories(w: &mut CodeWriter<&mut String>, service: &Service) -> fmt::Result {
    let stub = format!("{}Stub", service.name());

    w.writeln("/**")?;
    w.writeln(" * Creates a new coroutine stub")?;
    w.writeln(" */")?;
    w.block(
        &format!("fun newStub(channel: io.grpc.Channel): {stub}"),
        |w| cw_writeln!(w, "return {stub}(channel)"),
    )?;
    w.blank_line()?;
    w.writeln("/**")?;
    w.writeln(" * Creates a new coroutine stub with call options")?;
    w.writeln(" */")?;
    w.block(
        &format!(
            "fun newStub(channel: io.grpc.Channel, callOptions: io.grpc.CallOptions): {stub}"
        ),
        |w| cw_writeln!(w, "return {stub}(channel, callOptions)"),
    )
}

pub(super) fn write_stub(
    w: &mut CodeWriter<&mut String>,
    service: &Service,
    calls: &str,
) -> fmt::Result {
    let stub = format!("{}Stub", service.name());

    if let Some(doc) = service.doc() {
        w.kdoc_pre(doc)?;
    }
    cw_writeln!(
        w,
        "class {stub} internal constructor(channel: io.grpc.Channel, callOptions: io.grpc.CallOptions)"
    )?;
    {
        let _continuation = w.indent();
        cw_writeln!(
            w,
            ": io.grpc.stub.AbstractStub<{stub}>(channel, callOptions) {{"
        )?;
    }
    {
        let _body = w.indent();
        w.writeln(
            "internal constructor(channel: io.grpc.Channel): this(channel, io.grpc.CallOptions.DEFAULT)",
        )?;
        w.blank_line()?;
        w.block(
            &format!(
                "override fun build(channel: io.grpc.Channel, callOptions: io.grpc.CallOptions): {stub}"
            ),
            |w| cw_writeln!(w, "return {stub}(channel, callOptions)"),
        )?;
        if !calls.is_empty() {
            w.blank_line()?;
            w.write_fragment(calls)?;
        }
    }
    w.writeln("}")
}
