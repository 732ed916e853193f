//! Kotlin coroutine bindings for grpc-java.
//!
//! The output is one `<Name>GrpcKt` object per service, laid out the way
//! grpc-kt has always generated it, so existing callers and implementations
//! keep compiling against regenerated code:
//!
//! - `SERVICE_NAME` and one `METHOD_*` descriptor per method
//! - `newStub(channel)` / `newStub(channel, callOptions)`
//! - `<Name>ImplBase` with `open suspend` handlers and `bindService()`
//! - `<Name>Stub` with one `suspend` call per method
//! - `METHODID_*` constants and the private `MethodHandlers` dispatch table
//! - `serviceDescriptor`, plus `<Name>DescriptorSupplier` when the service
//!   has an outer class hosting its file descriptor

use std::fmt;

use corostub_schema::Service;
use tracing::{debug, trace};

use crate::code_writer::CodeWriter;
use crate::render::{ShapeBuckets, fragment};
use crate::{CodegenError, GeneratedFile, cw_write, cw_writeln};

mod client;
mod descriptors;
mod dispatch;
mod names;
mod server;

use names::string_literal;

const IMPORTS: &[&str] = &[
    "import kotlinx.coroutines.channels.ReceiveChannel",
    "import io.grpc.MethodDescriptor.generateFullMethodName",
    "import io.grpc.kt.stub.ClientCallsKt",
    "import io.grpc.kt.stub.ServerCallsKt",
];

/// Options for Kotlin code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KotlinCodegenOptions {
    /// Recorded in the `@javax.annotation.Generated` annotation.
    pub compiler_version: String,
    pub indent_spaces: usize,
}

impl Default for KotlinCodegenOptions {
    fn default() -> Self {
        Self {
            compiler_version: "0.5.0".to_string(),
            indent_spaces: 2,
        }
    }
}

impl KotlinCodegenOptions {
    fn validate(&self) -> Result<(), CodegenError> {
        if self.indent_spaces == 0 {
            return Err(CodegenError::InvalidOption {
                option: "indent_spaces",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.compiler_version.trim().is_empty() {
            return Err(CodegenError::InvalidOption {
                option: "compiler_version",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// `<package dirs>/<Name>GrpcKt.kt`.
pub fn file_path(service: &Service) -> String {
    let file_name = format!("{}GrpcKt.kt", service.name());
    if service.package_name().is_empty() {
        file_name
    } else {
        format!("{}/{file_name}", service.package_name().replace('.', "/"))
    }
}

/// Render the `<Name>GrpcKt.kt` file for one service.
pub fn generate_service(
    service: &Service,
    options: &KotlinCodegenOptions,
) -> Result<GeneratedFile, CodegenError> {
    options.validate()?;
    debug!(
        service = service.proto_name(),
        methods = service.methods().len(),
        "generating kotlin bindings"
    );

    let sections = Sections::collect(service, options.indent_spaces)?;

    let mut contents = String::new();
    let mut w = CodeWriter::with_indent_spaces(&mut contents, options.indent_spaces);
    write_file(&mut w, service, options, &sections)?;

    Ok(GeneratedFile {
        path: file_path(service),
        contents,
    })
}

/// Per-sub-artifact buffers filled in one pass over the methods.
#[derive(Default)]
struct Sections {
    descriptors: String,
    handlers: String,
    bindings: String,
    stub_calls: String,
    method_ids: String,
    metadata: String,
    branches: ShapeBuckets<String>,
}

impl Sections {
    fn collect(service: &Service, indent_spaces: usize) -> Result<Self, fmt::Error> {
        let mut sections = Self::default();

        for method in service.methods() {
            trace!(
                method = method.full_method_name(),
                shape = %method.call_shape(),
                id = method.id().0,
                "emitting method"
            );

            separate(&mut sections.descriptors)?;
            descriptors::write_descriptor(
                &mut fragment(&mut sections.descriptors, indent_spaces),
                service,
                method,
            )?;

            separate(&mut sections.handlers)?;
            server::write_handler(&mut fragment(&mut sections.handlers, indent_spaces), method)?;
            server::write_binding(&mut fragment(&mut sections.bindings, indent_spaces), method)?;

            separate(&mut sections.stub_calls)?;
            client::write_stub_call(&mut fragment(&mut sections.stub_calls, indent_spaces), method)?;

            descriptors::write_method_id(
                &mut fragment(&mut sections.method_ids, indent_spaces),
                method,
            )?;
            descriptors::write_metadata_entry(
                &mut fragment(&mut sections.metadata, indent_spaces),
                method,
            )?;
            dispatch::write_branch(
                &mut fragment(&mut sections.branches[method.call_shape()], indent_spaces),
                method,
            )?;
        }

        Ok(sections)
    }
}

/// Blank line between consecutive declarations of one section.
fn separate(buf: &mut String) -> fmt::Result {
    if !buf.is_empty() {
        fmt::Write::write_char(buf, '\n')?;
    }
    Ok(())
}

fn write_file(
    w: &mut CodeWriter<&mut String>,
    service: &Service,
    options: &KotlinCodegenOptions,
    sections: &Sections,
) -> fmt::Result {
    if !service.package_name().is_empty() {
        cw_writeln!(w, "package {}", service.package_name())?;
        w.blank_line()?;
    }
    for import in IMPORTS {
        w.writeln(import)?;
    }
    w.blank_line()?;

    if let Some(doc) = service.doc() {
        w.kdoc_pre(doc)?;
    }
    w.writeln("@javax.annotation.Generated(")?;
    {
        let _args = w.indent();
        cw_write!(
            w,
            "value = [{}]",
            string_literal(&format!(
                "by gRPC proto compiler (version {})",
                options.compiler_version
            ))
        )?;
        match service.proto_file() {
            Some(proto_file) => {
                w.writeln(",")?;
                cw_writeln!(
                    w,
                    "comments = {})",
                    string_literal(&format!("Source: {proto_file}"))
                )?;
            }
            None => w.writeln(")")?,
        }
    }

    w.block(&format!("object {}GrpcKt", service.name()), |w| {
        cw_writeln!(
            w,
            "const val SERVICE_NAME = {}",
            string_literal(service.proto_name())
        )?;
        w.blank_line()?;
        w.writeln("// Static method descriptors that strictly reflect the proto.")?;
        if !sections.descriptors.is_empty() {
            w.write_fragment(&sections.descriptors)?;
        }
        w.blank_line()?;

        client::write_factories(w, service)?;
        w.blank_line()?;
        server::write_impl_base(w, service, &sections.handlers, &sections.bindings)?;
        w.blank_line()?;
        client::write_stub(w, service, &sections.stub_calls)?;
        w.blank_line()?;

        if !sections.method_ids.is_empty() {
            w.write_fragment(&sections.method_ids)?;
            w.blank_line()?;
        }
        dispatch::write_method_handlers(w, service, &sections.branches)?;
        w.blank_line()?;
        descriptors::write_service_descriptor(w, service, &sections.metadata)
    })
}

#[cfg(test)]
mod tests {
    use corostub_schema::{CallShape, MethodSpec, ServiceBuilder};

    use super::*;

    #[test]
    fn path_follows_package() {
        let nested = ServiceBuilder::new("Echo", "a.b.Echo")
            .package_name("a.b")
            .build()
            .unwrap();
        assert_eq!(file_path(&nested), "a/b/EchoGrpcKt.kt");

        let bare = ServiceBuilder::new("Echo", "Echo").build().unwrap();
        assert_eq!(file_path(&bare), "EchoGrpcKt.kt");
    }

    #[test]
    fn zero_indent_is_rejected() {
        let service = ServiceBuilder::new("Echo", "test.Echo").build().unwrap();
        let options = KotlinCodegenOptions {
            indent_spaces: 0,
            ..Default::default()
        };
        assert!(matches!(
            generate_service(&service, &options),
            Err(CodegenError::InvalidOption {
                option: "indent_spaces",
                ..
            })
        ));
    }

    #[test]
    fn sections_separate_declarations() {
        let service = ServiceBuilder::new("Echo", "test.Echo")
            .method(MethodSpec::new("A", "In", "Out", CallShape::Unary))
            .method(MethodSpec::new("B", "In", "Out", CallShape::Unary))
            .build()
            .unwrap();
        let sections = Sections::collect(&service, 2).unwrap();

        assert_eq!(
            sections.method_ids,
            "const val METHODID_A = 0\nconst val METHODID_B = 1\n"
        );
        assert!(sections.handlers.contains("}\n\nopen suspend fun b("));
        assert!(sections.branches[CallShape::ServerStreaming].is_empty());
        assert_eq!(
            sections.branches[CallShape::Unary].lines().count(),
            2
        );
    }
}
