//! `MethodHandlers`: the method-ID keyed dispatch table.
//!
//! The runtime hands every call to one of four erased entry points; each one
//! switches on the method ID the handler was bound with. IDs that land in the
//! wrong sub-router are a generator bug and throw `AssertionError`.

use std::fmt;

use corostub_schema::{CallShape, Method, Service};

use super::names::{erased_response, fn_name, invoke_signature, method_interface, request_type};
use crate::code_writer::CodeWriter;
use crate::cw_writeln;
use crate::render::ShapeBuckets;

pub(super) fn write_branch(w: &mut CodeWriter<&mut String>, method: &Method) -> fmt::Result {
    cw_writeln!(
        w,
        "{} -> serviceImpl.{}(req as {}) as {}",
        method.id_name(),
        fn_name(method),
        request_type(method),
        erased_response(method.call_shape())
    )
}

pub(super) fn write_method_handlers(
    w: &mut CodeWriter<&mut String>,
    service: &Service,
    branches: &ShapeBuckets<String>,
) -> fmt::Result {
    cw_writeln!(
        w,
        "private class MethodHandlers<REQ, RESP>(private val serviceImpl: {}ImplBase, private val methodId: Int) :",
        service.name()
    )?;
    {
        let _supertypes = w.indent();
        for shape in CallShape::ALL {
            let terminator = if shape == CallShape::BidiStreaming {
                " {"
            } else {
                ","
            };
            cw_writeln!(
                w,
                "ServerCallsKt.{}<REQ, RESP>{terminator}",
                method_interface(shape)
            )?;
        }
    }
    {
        let _body = w.indent();
        for (shape, shape_branches) in branches.iter() {
            w.blank_line()?;
            w.writeln("@Suppress(\"UNCHECKED_CAST\")")?;
            w.block(
                &format!("override suspend fun {}", invoke_signature(shape)),
                |w| {
                    w.block("return when (methodId)", |w| {
                        w.write_fragment(shape_branches)?;
                        w.writeln("else -> throw AssertionError()")
                    })
                },
            )?;
        }
    }
    w.writeln("}")
}
