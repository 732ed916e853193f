//! Rust spellings of shapes, types and identifiers.

use corostub_schema::{CallShape, Method, Service};
use heck::ToSnakeCase;

/// Strict and reserved keywords that can be written as raw identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const PATH_KEYWORDS: &[&str] = &["self", "Self", "super", "crate"];

/// Inherent items of the generated stub.
const STUB_RESERVED: &[&str] = &["new", "with_call_options", "clone"];

pub(super) fn escape_identifier(name: String) -> String {
    if PATH_KEYWORDS.contains(&name.as_str()) {
        format!("{name}_")
    } else if KEYWORDS.contains(&name.as_str()) {
        format!("r#{name}")
    } else {
        name
    }
}

/// Handler name on the server trait.
pub(super) fn handler_name(method: &Method) -> String {
    escape_identifier(method.name().to_snake_case())
}

/// Call name on the stub; avoids the stub's own constructors.
pub(super) fn stub_call_name(method: &Method) -> String {
    let name = method.name().to_snake_case();
    if STUB_RESERVED.contains(&name.as_str()) {
        format!("{name}_")
    } else {
        escape_identifier(name)
    }
}

/// Name of the generated module, before escaping.
pub(super) fn module_stem(service: &Service) -> String {
    service.name().to_snake_case()
}

/// Map a message reference to a path usable inside the generated module.
///
/// Absolute paths are kept. Everything else, dotted or not, lives next to
/// the generated module: `pkg.Req` becomes `super::pkg::Req`.
pub(super) fn type_path(reference: &str) -> String {
    let reference = reference.trim();
    if reference.starts_with("::")
        || reference.starts_with("crate::")
        || reference.starts_with("super::")
    {
        return reference.to_string();
    }
    let segments: Vec<&str> = reference
        .trim_start_matches('.')
        .split('.')
        .filter(|segment| !segment.is_empty())
        .collect();
    format!("super::{}", segments.join("::"))
}

pub(super) fn method_type(shape: CallShape) -> &'static str {
    match shape {
        CallShape::Unary => "MethodType::Unary",
        CallShape::ServerStreaming => "MethodType::ServerStreaming",
        CallShape::ClientStreaming => "MethodType::ClientStreaming",
        CallShape::BidiStreaming => "MethodType::BidiStreaming",
    }
}

/// `server_calls` trait a dispatch impl satisfies.
pub(super) fn server_method_trait(shape: CallShape) -> &'static str {
    match shape {
        CallShape::Unary => "server_calls::UnaryMethod",
        CallShape::ServerStreaming => "server_calls::ServerStreamingMethod",
        CallShape::ClientStreaming => "server_calls::ClientStreamingMethod",
        CallShape::BidiStreaming => "server_calls::BidiStreamingMethod",
    }
}

/// Function shared by `server_calls` and `client_calls`.
pub(super) fn call_helper(shape: CallShape) -> &'static str {
    match shape {
        CallShape::Unary => "unary_call",
        CallShape::ServerStreaming => "server_streaming_call",
        CallShape::ClientStreaming => "client_streaming_call",
        CallShape::BidiStreaming => "bidi_streaming_call",
    }
}

/// Request parameter type for a shape, given the message path.
pub(super) fn request_type(shape: CallShape, message: &str) -> String {
    if shape.is_client_streaming() {
        format!("Streaming<{message}>")
    } else {
        message.to_string()
    }
}

/// Successful response type for a shape, given the message path.
pub(super) fn response_type(shape: CallShape, message: &str) -> String {
    if shape.is_server_streaming() {
        format!("Streaming<{message}>")
    } else {
        message.to_string()
    }
}

/// The `impl Future` every handler and sub-router returns.
pub(super) fn future_of(response: &str) -> String {
    format!("impl ::std::future::Future<Output = Result<{response}, Status>> + Send")
}
