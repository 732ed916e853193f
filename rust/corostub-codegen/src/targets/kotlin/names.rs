//! Kotlin spellings of shapes, types and identifiers.

use corostub_schema::{CallShape, Method};

/// Hard keywords; a method named after one needs backticks.
const KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
];

/// Name of the handler on the server base and of the call on the stub.
///
/// Only the first character is lowered, as grpc-java does, so acronyms
/// survive (`GetHTTPStatus` → `getHTTPStatus`).
pub(super) fn fn_name(method: &Method) -> String {
    let mut chars = method.name().chars();
    let name: String = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    };
    if KEYWORDS.contains(&name.as_str()) {
        format!("`{name}`")
    } else {
        name
    }
}

/// `io.grpc.MethodDescriptor.MethodType` constant.
pub(super) fn method_type(shape: CallShape) -> &'static str {
    match shape {
        CallShape::Unary => "UNARY",
        CallShape::ServerStreaming => "SERVER_STREAMING",
        CallShape::ClientStreaming => "CLIENT_STREAMING",
        CallShape::BidiStreaming => "BIDI_STREAMING",
    }
}

/// Helper on both `ClientCallsKt` and `ServerCallsKt`.
pub(super) fn call_helper(shape: CallShape) -> &'static str {
    match shape {
        CallShape::Unary => "unaryCall",
        CallShape::ServerStreaming => "serverStreamingCall",
        CallShape::ClientStreaming => "clientStreamingCall",
        CallShape::BidiStreaming => "bidiStreamingCall",
    }
}

/// `ServerCallsKt` helper a default handler fails through; picked by the
/// handler's return type.
pub(super) fn unimplemented_call(shape: CallShape) -> &'static str {
    match shape {
        CallShape::Unary | CallShape::ClientStreaming => "unimplementedUnaryCall",
        CallShape::ServerStreaming | CallShape::BidiStreaming => "unimplementedStreamingCall",
    }
}

/// The `ServerCallsKt.*Method` interface a sub-router implements.
pub(super) fn method_interface(shape: CallShape) -> &'static str {
    match shape {
        CallShape::Unary => "UnaryMethod",
        CallShape::ServerStreaming => "ServerStreamingMethod",
        CallShape::ClientStreaming => "ClientStreamingMethod",
        CallShape::BidiStreaming => "BidiStreamingMethod",
    }
}

/// Sub-router signature inside `MethodHandlers<REQ, RESP>`.
pub(super) fn invoke_signature(shape: CallShape) -> &'static str {
    match shape {
        CallShape::Unary => "unaryInvoke(req: REQ): RESP",
        CallShape::ServerStreaming => "serverStreamingInvoke(req: REQ): ReceiveChannel<RESP>",
        CallShape::ClientStreaming => "clientStreamingInvoke(req: ReceiveChannel<REQ>): RESP",
        CallShape::BidiStreaming => {
            "bidiStreamingInvoke(req: ReceiveChannel<REQ>): ReceiveChannel<RESP>"
        }
    }
}

/// What a sub-router casts a handler's result back to.
pub(super) fn erased_response(shape: CallShape) -> &'static str {
    if shape.is_server_streaming() {
        "ReceiveChannel<RESP>"
    } else {
        "RESP"
    }
}

/// Parameter type of the handler and the stub call.
pub(super) fn request_type(method: &Method) -> String {
    if method.call_shape().is_client_streaming() {
        format!("ReceiveChannel<{}>", method.input_type())
    } else {
        method.input_type().to_string()
    }
}

/// Return type of the handler and the stub call.
pub(super) fn response_type(method: &Method) -> String {
    if method.call_shape().is_server_streaming() {
        format!("ReceiveChannel<{}>", method.output_type())
    } else {
        method.output_type().to_string()
    }
}

/// Double-quoted Kotlin string literal.
pub(super) fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use corostub_schema::{MethodSpec, ServiceBuilder};

    use super::*;

    fn method(name: &str, shape: CallShape) -> Method {
        ServiceBuilder::new("Svc", "pkg.Svc")
            .method(MethodSpec::new(name, "In", "Out", shape))
            .build()
            .unwrap()
            .methods()[0]
            .clone()
    }

    #[test]
    fn keywords_are_backticked() {
        assert_eq!(fn_name(&method("Object", CallShape::Unary)), "`object`");
        assert_eq!(fn_name(&method("SayHello", CallShape::Unary)), "sayHello");
    }

    #[test]
    fn only_the_first_character_is_lowered() {
        assert_eq!(fn_name(&method("GetHTTPStatus", CallShape::Unary)), "getHTTPStatus");
        assert_eq!(fn_name(&method("say_hello", CallShape::Unary)), "say_hello");
    }

    #[test]
    fn streaming_sides_use_receive_channels() {
        let bidi = method("Chat", CallShape::BidiStreaming);
        assert_eq!(request_type(&bidi), "ReceiveChannel<In>");
        assert_eq!(response_type(&bidi), "ReceiveChannel<Out>");

        let client = method("Upload", CallShape::ClientStreaming);
        assert_eq!(request_type(&client), "ReceiveChannel<In>");
        assert_eq!(response_type(&client), "Out");
        assert_eq!(unimplemented_call(CallShape::ClientStreaming), "unimplementedUnaryCall");
    }

    #[test]
    fn literal_escapes_templates() {
        assert_eq!(string_literal("a\"b$c"), "\"a\\\"b\\$c\"");
    }
}
