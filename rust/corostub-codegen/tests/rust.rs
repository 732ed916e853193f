use corostub_codegen::CodegenError;
use corostub_codegen::targets::rust::{self, RustCodegenOptions};
use corostub_schema::{CallShape, MethodSpec, Service, ServiceBuilder};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn echo_service() -> Service {
    ServiceBuilder::new("Echo", "test.Echo")
        .package_name("test")
        .method(MethodSpec::new("Say", "Req", "Resp", CallShape::Unary))
        .build()
        .unwrap()
}

fn catalog_service() -> Service {
    ServiceBuilder::new("Catalog", "shop.v1.Catalog")
        .package_name("shop.v1")
        .outer_class_name("CatalogProto")
        .proto_file("shop/v1/catalog.proto")
        .method(MethodSpec::new("Watch", "pb.Query", "pb.Event", CallShape::BidiStreaming))
        .method(MethodSpec::new("Get", "pb.Key", "pb.Item", CallShape::Unary))
        .method(MethodSpec::new("Upload", "pb.Item", "pb.Summary", CallShape::ClientStreaming))
        .method(MethodSpec::new("List", "pb.Query", "pb.Item", CallShape::ServerStreaming))
        .build()
        .unwrap()
}

fn generate_with(service: &Service, options: &RustCodegenOptions) -> String {
    init_tracing();
    let file = rust::generate_service(service, options).unwrap();
    println!("{}", file.contents);
    file.contents
}

fn generate(service: &Service) -> String {
    generate_with(service, &RustCodegenOptions::default())
}

#[test]
fn echo_service_generation() {
    let file = rust::generate_service(&echo_service(), &RustCodegenOptions::default()).unwrap();
    let out = &file.contents;

    assert_eq!(file.path, "echo.rs");
    assert!(out.starts_with("// @generated by corostub-codegen. Do not edit.\n\n"));
    assert!(out.contains("#[allow(clippy::all, unused)]\npub mod echo {\n"));
    assert!(out.contains("    use ::corostub::{CallOptions, Channel,"));
    assert!(out.contains("    pub const SERVICE_NAME: &str = \"test.Echo\";\n"));
    assert!(out.contains(
        "    pub mod method_id {\n        pub const METHODID_SAY: u32 = 0;\n    }\n"
    ));

    // Descriptor
    assert!(out.contains(
        "    pub static METHOD_SAY: LazyLock<MethodDescriptor<super::Req, super::Resp>> = LazyLock::new(|| {\n"
    ));
    assert!(out.contains(".method_type(MethodType::Unary)"));
    assert!(out.contains(".full_method_name(generate_full_method_name(SERVICE_NAME, \"Say\"))"));
    assert!(out.contains(".request_marshaller(marshaller::<super::Req>())"));

    // Server base
    assert!(out.contains("pub trait EchoImplBase"));
    assert!(out.contains(
        "fn say(&self, request: super::Req) -> impl ::std::future::Future<Output = Result<super::Resp, Status>> + Send {"
    ));
    assert!(out.contains(
        "async { Err(Status::unimplemented(\"Method test.Echo/Say is unimplemented\")) }"
    ));
    assert!(out.contains(
        "    pub fn bind_service<S: EchoImplBase>(service_impl: Arc<S>) -> ServerServiceDefinition {\n"
    ));
    assert!(out.contains(
        "server_calls::unary_call(MethodHandlers::<S, super::Req, super::Resp>::new(\n"
    ));

    // Dispatch
    assert!(out.contains(
        "server_calls::UnaryMethod<super::Req, super::Resp> for MethodHandlers<S, super::Req, super::Resp>"
    ));
    assert!(out.contains("method_id::METHODID_SAY => service_impl.say(request).await,"));
    assert!(out.contains(
        "other => unreachable!(\"method id {other} is not a unary method of test.Echo\"),"
    ));

    // Client stub
    assert!(out.contains("pub struct EchoStub {"));
    assert!(out.contains(
        "pub async fn say(&self, request: super::Req) -> Result<super::Resp, Status> {"
    ));
    assert!(out.contains("self.channel.new_call(&*METHOD_SAY, self.call_options.clone()),"));
    assert!(out.contains("pub fn new_stub(channel: Channel) -> EchoStub {"));
    assert!(out.contains("EchoStub::with_call_options(channel, call_options)"));

    // Metadata
    assert_eq!(out.matches(".add_method(&*METHOD_SAY)").count(), 1);
    assert!(!out.contains(".schema_descriptor("));
    assert!(!out.contains("::tracing::"));
}

#[test]
fn generation_is_deterministic() {
    let service = catalog_service();
    assert_eq!(generate(&service), generate(&service));
}

#[test]
fn method_ids_follow_declaration_order() {
    let out = generate(&catalog_service());

    let positions: Vec<usize> = ["WATCH", "GET", "UPLOAD", "LIST"]
        .iter()
        .enumerate()
        .map(|(id, name)| {
            out.find(&format!("pub const METHODID_{name}: u32 = {id};\n"))
                .unwrap_or_else(|| panic!("METHODID_{name} should be {id}"))
        })
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn streaming_shapes_and_paths() {
    let file = rust::generate_service(&catalog_service(), &RustCodegenOptions::default())
        .unwrap();
    let out = &file.contents;

    assert_eq!(file.path, "catalog.rs");
    assert!(out.contains("// source: shop/v1/catalog.proto\n"));
    assert!(out.contains(".schema_descriptor(super::catalog_proto::file_descriptor)"));

    for (handler, stub) in [
        (
            "fn get(&self, request: super::pb::Key) -> impl ::std::future::Future<Output = Result<super::pb::Item, Status>> + Send",
            "pub async fn get(&self, request: super::pb::Key) -> Result<super::pb::Item, Status>",
        ),
        (
            "fn list(&self, request: super::pb::Query) -> impl ::std::future::Future<Output = Result<Streaming<super::pb::Item>, Status>> + Send",
            "pub async fn list(&self, request: super::pb::Query) -> Result<Streaming<super::pb::Item>, Status>",
        ),
        (
            "fn upload(&self, request: Streaming<super::pb::Item>) -> impl ::std::future::Future<Output = Result<super::pb::Summary, Status>> + Send",
            "pub async fn upload(&self, request: Streaming<super::pb::Item>) -> Result<super::pb::Summary, Status>",
        ),
        (
            "fn watch(&self, request: Streaming<super::pb::Query>) -> impl ::std::future::Future<Output = Result<Streaming<super::pb::Event>, Status>> + Send",
            "pub async fn watch(&self, request: Streaming<super::pb::Query>) -> Result<Streaming<super::pb::Event>, Status>",
        ),
    ] {
        assert!(out.contains(handler), "missing handler `{handler}`");
        assert!(out.contains(stub), "missing stub call `{stub}`");
    }

    assert!(out.contains("client_calls::bidi_streaming_call("));
    assert!(out.contains("server_calls::client_streaming_call(MethodHandlers::<S, super::pb::Item, super::pb::Summary>::new("));
    assert!(out.contains(".method_type(MethodType::ServerStreaming)"));
}

#[test]
fn one_dispatch_impl_per_shape_and_pair() {
    let out = generate(&catalog_service());

    for (shape_trait, arm) in [
        (
            "server_calls::UnaryMethod<super::pb::Key, super::pb::Item>",
            "method_id::METHODID_GET => service_impl.get(request).await,",
        ),
        (
            "server_calls::ServerStreamingMethod<super::pb::Query, super::pb::Item>",
            "method_id::METHODID_LIST => service_impl.list(request).await,",
        ),
        (
            "server_calls::ClientStreamingMethod<super::pb::Item, super::pb::Summary>",
            "method_id::METHODID_UPLOAD => service_impl.upload(request).await,",
        ),
        (
            "server_calls::BidiStreamingMethod<super::pb::Query, super::pb::Event>",
            "method_id::METHODID_WATCH => service_impl.watch(request).await,",
        ),
    ] {
        assert_eq!(out.matches(shape_trait).count(), 1, "{shape_trait}");
        assert_eq!(out.matches(arm).count(), 1, "{arm}");
    }
    assert_eq!(out.matches("other => unreachable!(").count(), 4);
}

#[test]
fn methods_sharing_messages_share_an_impl() {
    let service = ServiceBuilder::new("Kv", "test.Kv")
        .method(MethodSpec::new("Get", "Key", "Value", CallShape::Unary))
        .method(MethodSpec::new("Delete", "Key", "Value", CallShape::Unary))
        .method(MethodSpec::new("Stats", "Empty", "Value", CallShape::Unary))
        .build()
        .unwrap();
    let out = generate(&service);

    assert_eq!(out.matches("server_calls::UnaryMethod<").count(), 2);
    assert!(out.contains(
        "method_id::METHODID_GET => service_impl.get(request).await,\n                    method_id::METHODID_DELETE => service_impl.delete(request).await,\n"
    ));
    assert!(!out.contains("server_calls::ServerStreamingMethod<"));
}

#[test]
fn empty_service_is_well_formed() {
    let service = ServiceBuilder::new("Empty", "test.Empty").build().unwrap();
    let out = generate(&service);

    assert!(out.contains("    pub mod method_id {\n    }\n"));
    assert!(out.contains(
        "        ServiceDescriptor::builder(SERVICE_NAME)\n            .build()\n"
    ));
    assert!(out.contains("pub trait EmptyImplBase"));
    assert!(out.contains(
        "        ServerServiceDefinition::builder(&*SERVICE_DESCRIPTOR)\n            .build()\n"
    ));
    assert!(out.contains("struct MethodHandlers<S, Req, Resp>"));
    assert!(!out.contains("impl<S> server_calls::"));
    assert!(out.contains("pub struct EmptyStub {"));
    assert!(!out.contains("pub static METHOD_"));
}

#[test]
fn tracing_spans_wrap_dispatch() {
    let out = generate_with(
        &echo_service(),
        &RustCodegenOptions {
            tracing: true,
            ..Default::default()
        },
    );

    assert!(out.contains(
        "method_id::METHODID_SAY => ::tracing::Instrument::instrument(service_impl.say(request), ::tracing::debug_span!(\"dispatch\", service = SERVICE_NAME, method = \"Say\")).await,"
    ));
}

#[test]
fn custom_runtime_crate() {
    let out = generate_with(
        &echo_service(),
        &RustCodegenOptions {
            runtime_crate: "crate::rpc".to_string(),
            ..Default::default()
        },
    );
    assert!(out.contains("    use crate::rpc::{CallOptions,"));

    let err = rust::generate_service(
        &echo_service(),
        &RustCodegenOptions {
            runtime_crate: "not a path".to_string(),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CodegenError::InvalidOption {
            option: "runtime_crate",
            ..
        }
    ));
}

#[test]
fn keyword_and_reserved_method_names() {
    let service = ServiceBuilder::new("Registry", "test.Registry")
        .method(MethodSpec::new("Type", "Req", "Resp", CallShape::Unary))
        .method(MethodSpec::new("New", "Req", "Resp", CallShape::Unary))
        .build()
        .unwrap();
    let out = generate(&service);

    assert!(out.contains("fn r#type(&self, request: super::Req)"));
    assert!(out.contains("pub async fn r#type(&self, request: super::Req)"));
    assert!(out.contains("method_id::METHODID_TYPE => service_impl.r#type(request).await,"));

    // The handler keeps the plain name; the stub steps around its constructor.
    assert!(out.contains("    fn new(&self, request: super::Req)"));
    assert!(out.contains("pub async fn new_(&self, request: super::Req)"));
    assert!(out.contains("pub fn new(channel: Channel) -> Self {"));
}
