//! Rust async bindings.
//!
//! Generates one `pub mod <service>` per service, meant to be written to
//! `OUT_DIR` from a build script and pulled in with `include!`:
//!
//! - `SERVICE_NAME`, `method_id::METHODID_*` and `LazyLock` method
//!   descriptors, built on first use and shared for the process lifetime
//! - `<Name>ImplBase`, an async trait whose methods default to
//!   `Status::unimplemented`, and `bind_service`
//! - the private `MethodHandlers` dispatch table
//! - `<Name>Stub` with `new_stub` / `new_stub_with_call_options`
//!
//! Message references are resolved relative to the module that includes the
//! generated file (see [`RustCodegenOptions`] for the runtime path).

use std::fmt;

use codegen::{Impl, Scope, Trait};
use corostub_schema::Service;
use tracing::{debug, trace};

use crate::code_writer::CodeWriter;
use crate::render::{ShapeBuckets, fragment};
use crate::{CodegenError, GeneratedFile, cw_writeln};

mod client;
mod descriptors;
mod dispatch;
mod names;
mod server;

use dispatch::DispatchImpl;
use names::{escape_identifier, module_stem};

const INDENT_SPACES: usize = 4;

/// Options for Rust code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RustCodegenOptions {
    /// Wrap each dispatched call in a `tracing::debug_span!` carrying the
    /// service and method name.
    ///
    /// Requires the `tracing` crate in the consuming crate.
    pub tracing: bool,

    /// Path of the runtime crate providing channels, descriptors and the
    /// `server_calls` / `client_calls` helpers.
    pub runtime_crate: String,
}

impl Default for RustCodegenOptions {
    fn default() -> Self {
        Self {
            tracing: false,
            runtime_crate: "::corostub".to_string(),
        }
    }
}

impl RustCodegenOptions {
    fn validate(&self) -> Result<(), CodegenError> {
        let path = self.runtime_crate.trim();
        let relative = path.strip_prefix("::").unwrap_or(path);
        let valid = !relative.is_empty()
            && relative.split("::").all(|segment| {
                let mut chars = segment.chars();
                matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            });
        if !valid {
            return Err(CodegenError::InvalidOption {
                option: "runtime_crate",
                reason: format!("`{}` is not a Rust path", self.runtime_crate),
            });
        }
        Ok(())
    }
}

/// `<snake_name>.rs`.
pub fn file_path(service: &Service) -> String {
    format!("{}.rs", module_stem(service))
}

/// Render the Rust bindings for one service.
pub fn generate_service(
    service: &Service,
    options: &RustCodegenOptions,
) -> Result<GeneratedFile, CodegenError> {
    options.validate()?;
    debug!(
        service = service.proto_name(),
        methods = service.methods().len(),
        tracing = options.tracing,
        "generating rust bindings"
    );

    let sections = Sections::collect(service, options)?;

    let mut contents = String::new();
    let mut w = CodeWriter::with_indent_spaces(&mut contents, INDENT_SPACES);
    write_file(&mut w, service, options, sections)?;

    Ok(GeneratedFile {
        path: file_path(service),
        contents,
    })
}

struct Sections {
    method_ids: String,
    descriptors: String,
    metadata: String,
    bindings: String,
    impl_base: Trait,
    stub: Impl,
    dispatch: ShapeBuckets<Vec<DispatchImpl>>,
}

impl Sections {
    fn collect(service: &Service, options: &RustCodegenOptions) -> Result<Self, fmt::Error> {
        let mut sections = Self {
            method_ids: String::new(),
            descriptors: String::new(),
            metadata: String::new(),
            bindings: String::new(),
            impl_base: server::new_impl_base(service),
            stub: client::new_stub_impl(service),
            dispatch: ShapeBuckets::default(),
        };

        for method in service.methods() {
            trace!(
                method = method.full_method_name(),
                shape = %method.call_shape(),
                id = method.id().0,
                "emitting method"
            );

            descriptors::write_method_id(
                &mut fragment(&mut sections.method_ids, INDENT_SPACES),
                method,
            )?;

            if !sections.descriptors.is_empty() {
                fmt::Write::write_char(&mut sections.descriptors, '\n')?;
            }
            descriptors::write_descriptor(
                &mut fragment(&mut sections.descriptors, INDENT_SPACES),
                method,
            )?;
            descriptors::write_metadata_entry(
                &mut fragment(&mut sections.metadata, INDENT_SPACES),
                method,
            )?;

            server::add_handler(&mut sections.impl_base, method);
            server::write_binding(&mut fragment(&mut sections.bindings, INDENT_SPACES), method)?;
            dispatch::add_branch(
                &mut sections.dispatch[method.call_shape()],
                method,
                options.tracing,
            );
            client::add_stub_call(&mut sections.stub, method);
        }

        Ok(sections)
    }
}

fn write_file(
    w: &mut CodeWriter<&mut String>,
    service: &Service,
    options: &RustCodegenOptions,
    sections: Sections,
) -> fmt::Result {
    let Sections {
        method_ids,
        descriptors: descriptor_section,
        metadata,
        bindings,
        impl_base,
        stub,
        dispatch: dispatch_impls,
    } = sections;

    w.writeln("// @generated by corostub-codegen. Do not edit.")?;
    if let Some(proto_file) = service.proto_file() {
        cw_writeln!(w, "// source: {proto_file}")?;
    }
    w.blank_line()?;
    w.writeln("#[allow(clippy::all, unused)]")?;

    let module = escape_identifier(module_stem(service));
    w.block(&format!("pub mod {module}"), |w| {
        cw_writeln!(
            w,
            "use {}::{{CallOptions, Channel, MethodDescriptor, MethodType, ServerServiceDefinition, ServiceDescriptor, Status, Streaming, client_calls, generate_full_method_name, marshaller, server_calls}};",
            options.runtime_crate.trim()
        )?;
        w.writeln("use std::marker::PhantomData;")?;
        w.writeln("use std::sync::{Arc, LazyLock};")?;
        w.blank_line()?;

        cw_writeln!(w, "pub const SERVICE_NAME: &str = {:?};", service.proto_name())?;
        w.blank_line()?;
        w.block("pub mod method_id", |w| w.write_fragment(&method_ids))?;
        w.blank_line()?;

        if !descriptor_section.is_empty() {
            w.write_fragment(&descriptor_section)?;
            w.blank_line()?;
        }
        descriptors::write_service_descriptor(w, service, &metadata)?;
        w.blank_line()?;

        let mut server_scope = Scope::new();
        server_scope.push_trait(impl_base);
        w.write_fragment(&server_scope.to_string())?;
        w.blank_line()?;
        server::write_bind_service(w, service, &bindings)?;
        w.blank_line()?;

        let mut dispatch_scope = Scope::new();
        dispatch::push_method_handlers(&mut dispatch_scope, service, &dispatch_impls);
        w.write_fragment(&dispatch_scope.to_string())?;
        w.blank_line()?;

        let mut client_scope = Scope::new();
        client::push_stub(&mut client_scope, service, stub);
        w.write_fragment(&client_scope.to_string())
    })
}

#[cfg(test)]
mod tests {
    use corostub_schema::ServiceBuilder;

    use super::*;

    #[test]
    fn runtime_crate_must_be_a_path() {
        let service = ServiceBuilder::new("Echo", "test.Echo").build().unwrap();

        for runtime_crate in ["", "::", "corostub::", "my-runtime", "a::1b"] {
            let options = RustCodegenOptions {
                runtime_crate: runtime_crate.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(
                    generate_service(&service, &options),
                    Err(CodegenError::InvalidOption {
                        option: "runtime_crate",
                        ..
                    })
                ),
                "{runtime_crate:?} should be rejected"
            );
        }

        for runtime_crate in ["::corostub", "crate::rt", "corostub_runtime"] {
            let options = RustCodegenOptions {
                runtime_crate: runtime_crate.to_string(),
                ..Default::default()
            };
            assert!(generate_service(&service, &options).is_ok());
        }
    }

    #[test]
    fn keyword_service_names_are_escaped() {
        let service = ServiceBuilder::new("Type", "test.Type").build().unwrap();
        let file = generate_service(&service, &RustCodegenOptions::default()).unwrap();

        assert_eq!(file.path, "type.rs");
        assert!(file.contents.contains("pub mod r#type {"));
    }
}
