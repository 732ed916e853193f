//! `LazyLock` method descriptors, ID constants and the service descriptor.

use std::fmt;

use corostub_schema::{Method, Service};
use heck::ToSnakeCase;

use super::names::{method_type, type_path};
use crate::code_writer::CodeWriter;
use crate::cw_writeln;

pub(super) fn write_descriptor(w: &mut CodeWriter<&mut String>, method: &Method) -> fmt::Result {
    let input = type_path(method.input_type());
    let output = type_path(method.output_type());

    cw_writeln!(
        w,
        "pub static {}: LazyLock<MethodDescriptor<{input}, {output}>> = LazyLock::new(|| {{",
        method.field_name()
    )?;
    {
        let _body = w.indent();
        w.writeln("MethodDescriptor::builder()")?;
        let _calls = w.indent();
        cw_writeln!(w, ".method_type({})", method_type(method.call_shape()))?;
        cw_writeln!(
            w,
            ".full_method_name(generate_full_method_name(SERVICE_NAME, {:?}))",
            method.name()
        )?;
        cw_writeln!(w, ".request_marshaller(marshaller::<{input}>())")?;
        cw_writeln!(w, ".response_marshaller(marshaller::<{output}>())")?;
        w.writeln(".build()")?;
    }
    w.writeln("});")
}

pub(super) fn write_method_id(w: &mut CodeWriter<&mut String>, method: &Method) -> fmt::Result {
    cw_writeln!(w, "pub const {}: u32 = {};", method.id_name(), method.id())
}

pub(super) fn write_metadata_entry(
    w: &mut CodeWriter<&mut String>,
    method: &Method,
) -> fmt::Result {
    cw_writeln!(w, ".add_method(&*{})", method.field_name())
}

/// `SERVICE_DESCRIPTOR`, pointing at the outer module's file descriptor when
/// the service names one.
pub(super) fn write_service_descriptor(
    w: &mut CodeWriter<&mut String>,
    service: &Service,
    entries: &str,
) -> fmt::Result {
    w.writeln(
        "pub static SERVICE_DESCRIPTOR: LazyLock<ServiceDescriptor> = LazyLock::new(|| {",
    )?;
    {
        let _body = w.indent();
        w.writeln("ServiceDescriptor::builder(SERVICE_NAME)")?;
        let _calls = w.indent();
        if let Some(outer) = service.outer_class_name() {
            cw_writeln!(
                w,
                ".schema_descriptor({}::file_descriptor)",
                type_path(&outer.to_snake_case())
            )?;
        }
        w.write_fragment(entries)?;
        w.writeln(".build()")?;
    }
    w.writeln("});")
}
