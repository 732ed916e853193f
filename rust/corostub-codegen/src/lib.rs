#![deny(unsafe_code)]

//! Code generation for corostub RPC bindings.
//!
//! # Where This Sits
//!
//! A protoc plugin front end reads the `CodeGeneratorRequest`, builds one
//! [`Service`] per `service` declaration with
//! [`ServiceBuilder`](corostub_schema::ServiceBuilder), and hands it to a
//! target here. The target returns a [`GeneratedFile`]; writing it out is the
//! caller's job.
//!
//! ```text
//! .proto  →  protoc front end  →  Service  →  corostub-codegen  →  EchoGrpcKt.kt / echo.rs
//! ```
//!
//! # Targets
//!
//! - [`targets::kotlin`]: coroutine stubs for grpc-java, symbol for symbol
//!   compatible with existing grpc-kt generated code.
//! - [`targets::rust`]: an async handler trait with unimplemented defaults,
//!   lazily built descriptors and a typed dispatch table.
//!
//! # Usage
//!
//! ```
//! use corostub_codegen::targets::kotlin::{self, KotlinCodegenOptions};
//! use corostub_schema::{CallShape, MethodSpec, ServiceBuilder};
//!
//! let service = ServiceBuilder::new("Echo", "test.Echo")
//!     .package_name("test")
//!     .method(MethodSpec::new("Say", "Req", "Resp", CallShape::Unary))
//!     .build()
//!     .unwrap();
//!
//! let file = kotlin::generate_service(&service, &KotlinCodegenOptions::default()).unwrap();
//! assert_eq!(file.path, "test/EchoGrpcKt.kt");
//! assert!(file.contents.contains("abstract class EchoImplBase"));
//! ```
//!
//! Generation is a pure function of the service and the options: the same
//! inputs always produce byte-identical output, and independent services can
//! be rendered in parallel.

pub mod code_writer;
mod error;
mod render;
pub mod targets;

pub use corostub_schema::Service;
pub use error::CodegenError;

/// One rendered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Conventional location relative to the output root, `/`-separated.
    pub path: String,
    pub contents: String,
}
