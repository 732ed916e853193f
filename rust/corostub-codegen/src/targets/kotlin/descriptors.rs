//! Method descriptors, method ID constants and the service descriptor.

use std::fmt;

use corostub_schema::{Method, Service};

use super::names::{method_type, string_literal};
use crate::code_writer::CodeWriter;
use crate::cw_writeln;

/// One `val METHOD_*: io.grpc.MethodDescriptor<In, Out>` built eagerly with
/// the enclosing object.
pub(super) fn write_descriptor(
    w: &mut CodeWriter<&mut String>,
    service: &Service,
    method: &Method,
) -> fmt::Result {
    let input = method.input_type();
    let output = method.output_type();

    w.writeln("@io.grpc.ExperimentalApi(\"https://github.com/grpc/grpc-java/issues/1901\")")?;
    cw_writeln!(
        w,
        "val {}: io.grpc.MethodDescriptor<{input}, {output}> =",
        method.field_name()
    )?;
    let _builder = w.indent();
    cw_writeln!(w, "io.grpc.MethodDescriptor.newBuilder<{input}, {output}>()")?;
    let _calls = w.indent();
    cw_writeln!(
        w,
        ".setType(io.grpc.MethodDescriptor.MethodType.{})",
        method_type(method.call_shape())
    )?;
    cw_writeln!(
        w,
        ".setFullMethodName(generateFullMethodName({}, {}))",
        string_literal(service.proto_name()),
        string_literal(method.name())
    )?;
    cw_writeln!(
        w,
        ".setRequestMarshaller(io.grpc.protobuf.ProtoUtils.marshaller({input}.getDefaultInstance()))"
    )?;
    cw_writeln!(
        w,
        ".setResponseMarshaller(io.grpc.protobuf.ProtoUtils.marshaller({output}.getDefaultInstance()))"
    )?;
    w.writeln(".build()")
}

pub(super) fn write_method_id(w: &mut CodeWriter<&mut String>, method: &Method) -> fmt::Result {
    cw_writeln!(w, "const val {} = {}", method.id_name(), method.id())
}

pub(super) fn write_metadata_entry(
    w: &mut CodeWriter<&mut String>,
    method: &Method,
) -> fmt::Result {
    cw_writeln!(w, ".addMethod({})", method.field_name())
}

/// The schema supplier (when the service names an outer class) and the
/// `serviceDescriptor` aggregate, built on first access.
pub(super) fn write_service_descriptor(
    w: &mut CodeWriter<&mut String>,
    service: &Service,
    entries: &str,
) -> fmt::Result {
    let supplier = format!("{}DescriptorSupplier", service.name());

    if let Some(outer) = service.outer_class_name() {
        let holder = if service.package_name().is_empty() {
            outer.to_string()
        } else {
            format!("{}.{outer}", service.package_name())
        };
        w.block(
            &format!("private class {supplier} : io.grpc.protobuf.ProtoFileDescriptorSupplier"),
            |w| {
                w.block(
                    "override fun getFileDescriptor(): com.google.protobuf.Descriptors.FileDescriptor",
                    |w| cw_writeln!(w, "return {holder}.getDescriptor()"),
                )
            },
        )?;
        w.blank_line()?;
    }

    w.block("val serviceDescriptor: io.grpc.ServiceDescriptor by lazy", |w| {
        w.writeln("io.grpc.ServiceDescriptor.newBuilder(SERVICE_NAME)")?;
        let _calls = w.indent();
        if service.outer_class_name().is_some() {
            cw_writeln!(w, ".setSchemaDescriptor({supplier}())")?;
        }
        w.write_fragment(entries)?;
        w.writeln(".build()")
    })
}
