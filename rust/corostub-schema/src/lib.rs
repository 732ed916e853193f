#![deny(unsafe_code)]

//! Service and method model for corostub code generation.
//!
//! A [`Service`] is the normalized, render-ready description of one RPC
//! service: its names, where its reflection metadata lives, and its methods in
//! declaration order. The upstream front end (a protoc plugin reading a
//! `FileDescriptorProto`) fills a [`ServiceBuilder`]; the builder derives
//! identifiers, assigns method IDs by position and rejects inputs that would
//! render colliding symbols.
//!
//! ```
//! use corostub_schema::{CallShape, MethodSpec, ServiceBuilder};
//!
//! let service = ServiceBuilder::new("Echo", "test.Echo")
//!     .package_name("test")
//!     .method(MethodSpec::new("Say", "Req", "Resp", CallShape::Unary))
//!     .build()
//!     .unwrap();
//!
//! let say = &service.methods()[0];
//! assert_eq!(say.field_name(), "METHOD_SAY");
//! assert_eq!(say.id_name(), "METHODID_SAY");
//! assert_eq!(say.id().0, 0);
//! assert_eq!(say.full_method_name(), "test.Echo/Say");
//! ```
//!
//! Once built, a service is immutable: everything is exposed through
//! accessors, so the emitter can rely on the invariants the builder checked.

use std::fmt;

mod builder;
mod error;

pub use builder::{MethodSpec, ServiceBuilder, field_name_for, id_name_for};
pub use error::SchemaError;

/// The cardinality of a call in each direction.
///
/// Every method has exactly one shape, and the shape alone decides the
/// descriptor type tag, the client-call helper and the dispatch sub-router a
/// method lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CallShape {
    /// One request, one response.
    Unary,
    /// One request, a stream of responses.
    ServerStreaming,
    /// A stream of requests, one response.
    ClientStreaming,
    /// Independently paced request and response streams.
    BidiStreaming,
}

impl CallShape {
    /// All shapes, in dispatch-table order.
    pub const ALL: [CallShape; 4] = [
        CallShape::Unary,
        CallShape::ServerStreaming,
        CallShape::ClientStreaming,
        CallShape::BidiStreaming,
    ];

    /// Shape from protoc's `client_streaming` / `server_streaming` flags.
    pub fn from_streaming(client_streaming: bool, server_streaming: bool) -> Self {
        match (client_streaming, server_streaming) {
            (false, false) => CallShape::Unary,
            (false, true) => CallShape::ServerStreaming,
            (true, false) => CallShape::ClientStreaming,
            (true, true) => CallShape::BidiStreaming,
        }
    }

    /// Whether the caller sends a stream of requests.
    pub fn is_client_streaming(self) -> bool {
        matches!(self, CallShape::ClientStreaming | CallShape::BidiStreaming)
    }

    /// Whether the callee answers with a stream of responses.
    pub fn is_server_streaming(self) -> bool {
        matches!(self, CallShape::ServerStreaming | CallShape::BidiStreaming)
    }

    /// Position in [`CallShape::ALL`]. Also the numeric tag the shape is
    /// serialized as.
    pub fn index(self) -> usize {
        match self {
            CallShape::Unary => 0,
            CallShape::ServerStreaming => 1,
            CallShape::ClientStreaming => 2,
            CallShape::BidiStreaming => 3,
        }
    }
}

impl TryFrom<u8> for CallShape {
    type Error = SchemaError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        CallShape::ALL
            .get(usize::from(tag))
            .copied()
            .ok_or(SchemaError::UnknownCallShape(tag))
    }
}

impl fmt::Display for CallShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CallShape::Unary => "unary",
            CallShape::ServerStreaming => "server-streaming",
            CallShape::ClientStreaming => "client-streaming",
            CallShape::BidiStreaming => "bidi-streaming",
        })
    }
}

/// Position of a method within its service, used as the dispatch discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct MethodId(pub u32);

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A complete, validated service definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub(crate) name: String,
    pub(crate) proto_name: String,
    pub(crate) package_name: String,
    pub(crate) outer_class_name: Option<String>,
    pub(crate) proto_file: Option<String>,
    pub(crate) doc: Option<String>,
    pub(crate) methods: Vec<Method>,
}

impl Service {
    /// Base name all generated type names derive from (e.g. `Echo`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified service name as declared in the proto (e.g. `test.Echo`).
    pub fn proto_name(&self) -> &str {
        &self.proto_name
    }

    /// Namespace for generated declarations. Empty for the default package.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Holder of the file descriptor for this service's message types.
    pub fn outer_class_name(&self) -> Option<&str> {
        self.outer_class_name.as_deref()
    }

    /// The `.proto` file the service was declared in.
    pub fn proto_file(&self) -> Option<&str> {
        self.proto_file.as_deref()
    }

    /// Leading comment of the service declaration.
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Methods in declaration order; `methods()[i].id().0 == i`.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Look up a method by its ID.
    pub fn method_by_id(&self, id: MethodId) -> Option<&Method> {
        self.methods.get(usize::try_from(id.0).ok()?)
    }

    /// Methods of one shape, in declaration order.
    pub fn methods_with_shape(&self, shape: CallShape) -> impl Iterator<Item = &Method> + '_ {
        self.methods
            .iter()
            .filter(move |m| m.call_shape == shape)
    }
}

/// A single RPC method of a [`Service`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub(crate) name: String,
    pub(crate) field_name: String,
    pub(crate) id_name: String,
    pub(crate) id: MethodId,
    pub(crate) full_method_name: String,
    pub(crate) input_type: String,
    pub(crate) output_type: String,
    pub(crate) call_shape: CallShape,
    pub(crate) doc: Option<String>,
}

impl Method {
    /// Short name as declared in the proto (e.g. `Say`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the method descriptor value (e.g. `METHOD_SAY`).
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Name of the method ID constant (e.g. `METHODID_SAY`).
    pub fn id_name(&self) -> &str {
        &self.id_name
    }

    pub fn id(&self) -> MethodId {
        self.id
    }

    /// Wire-level name, `<proto_name>/<name>`.
    pub fn full_method_name(&self) -> &str {
        &self.full_method_name
    }

    pub fn input_type(&self) -> &str {
        &self.input_type
    }

    pub fn output_type(&self) -> &str {
        &self.output_type
    }

    pub fn call_shape(&self) -> CallShape {
        self.call_shape
    }

    /// Leading comment of the rpc declaration.
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_from_streaming_flags() {
        assert_eq!(CallShape::from_streaming(false, false), CallShape::Unary);
        assert_eq!(
            CallShape::from_streaming(false, true),
            CallShape::ServerStreaming
        );
        assert_eq!(
            CallShape::from_streaming(true, false),
            CallShape::ClientStreaming
        );
        assert_eq!(
            CallShape::from_streaming(true, true),
            CallShape::BidiStreaming
        );
    }

    #[test]
    fn shape_flags_round_trip_through_from_streaming() {
        for shape in CallShape::ALL {
            let back =
                CallShape::from_streaming(shape.is_client_streaming(), shape.is_server_streaming());
            assert_eq!(back, shape);
        }
    }

    #[test]
    fn shape_index_matches_all_order() {
        for (i, shape) in CallShape::ALL.iter().enumerate() {
            assert_eq!(shape.index(), i);
            assert_eq!(CallShape::try_from(i as u8), Ok(*shape));
        }
    }

    #[test]
    fn out_of_range_shape_tag_is_rejected() {
        assert_eq!(
            CallShape::try_from(4),
            Err(SchemaError::UnknownCallShape(4))
        );
    }

    #[test]
    fn method_lookup_by_id_and_shape() {
        let service = ServiceBuilder::new("Mixed", "pkg.Mixed")
            .method(MethodSpec::new("A", "In", "Out", CallShape::Unary))
            .method(MethodSpec::new("B", "In", "Out", CallShape::BidiStreaming))
            .method(MethodSpec::new("C", "In", "Out", CallShape::Unary))
            .build()
            .unwrap();

        assert_eq!(service.method_by_id(MethodId(1)).unwrap().name(), "B");
        assert!(service.method_by_id(MethodId(3)).is_none());

        let unary: Vec<_> = service
            .methods_with_shape(CallShape::Unary)
            .map(Method::name)
            .collect();
        assert_eq!(unary, ["A", "C"]);
        assert_eq!(
            service
                .methods_with_shape(CallShape::ClientStreaming)
                .count(),
            0
        );
    }
}
