//! `<Name>Stub` and the `new_stub` factories.

use codegen::{Impl, Scope};
use corostub_schema::{Method, Service};

use super::names::{call_helper, request_type, response_type, stub_call_name, type_path};

pub(super) fn stub_name(service: &Service) -> String {
    format!("{}Stub", service.name())
}

/// The stub's inherent impl with its constructors; calls are added per method.
pub(super) fn new_stub_impl(service: &Service) -> Impl {
    let mut stub = Impl::new(stub_name(service).as_str());
    stub.new_fn("new")
        .vis("pub")
        .arg("channel", "Channel")
        .ret("Self")
        .line("Self::with_call_options(channel, CallOptions::default())");
    stub.new_fn("with_call_options")
        .vis("pub")
        .arg("channel", "Channel")
        .arg("call_options", "CallOptions")
        .ret("Self")
        .line("Self {")
        .line("    channel,")
        .line("    call_options,")
        .line("}");
    stub
}

pub(super) fn add_stub_call(stub: &mut Impl, method: &Method) {
    let shape = method.call_shape();
    let input = type_path(method.input_type());
    let output = type_path(method.output_type());

    let call = stub.new_fn(&stub_call_name(method));
    if let Some(doc) = method.doc() {
        call.doc(doc);
    }
    call.vis("pub")
        .set_async(true)
        .arg_ref_self()
        .arg("request", request_type(shape, &input))
        .ret(format!("Result<{}, Status>", response_type(shape, &output)))
        .line(format!("client_calls::{}(", call_helper(shape)))
        .line(format!(
            "    self.channel.new_call(&*{}, self.call_options.clone()),",
            method.field_name()
        ))
        .line("    request,")
        .line(")")
        .line(".await");
}

pub(super) fn push_stub(scope: &mut Scope, service: &Service, stub: Impl) {
    let name = stub_name(service);
    let doc = match service.doc() {
        Some(doc) => doc.to_string(),
        None => format!("Client for `{}`.", service.proto_name()),
    };

    scope
        .new_struct(&name)
        .vis("pub")
        .derive("Clone")
        .doc(&doc)
        .field("channel", "Channel")
        .field("call_options", "CallOptions");
    scope.push_impl(stub);

    scope
        .new_fn("new_stub")
        .vis("pub")
        .arg("channel", "Channel")
        .ret(name.as_str())
        .line(format!("{name}::new(channel)"));
    scope
        .new_fn("new_stub_with_call_options")
        .vis("pub")
        .arg("channel", "Channel")
        .arg("call_options", "CallOptions")
        .ret(name.as_str())
        .line(format!("{name}::with_call_options(channel, call_options)"));
}
