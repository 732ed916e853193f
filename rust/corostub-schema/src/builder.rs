use std::collections::HashMap;

use heck::{ToShoutySnakeCase, ToSnakeCase};

use crate::{CallShape, Method, MethodId, SchemaError, Service};

/// Default descriptor field name for a method (`SayHello` → `METHOD_SAY_HELLO`).
pub fn field_name_for(method_name: &str) -> String {
    format!("METHOD_{}", method_name.to_shouty_snake_case())
}

/// Default method ID constant name for a method (`SayHello` → `METHODID_SAY_HELLO`).
pub fn id_name_for(method_name: &str) -> String {
    format!("METHODID_{}", method_name.to_shouty_snake_case())
}

/// One rpc declaration, as handed over by the front end.
#[derive(Debug, Clone)]
pub struct MethodSpec {
    name: String,
    input_type: String,
    output_type: String,
    call_shape: CallShape,
    field_name: Option<String>,
    id_name: Option<String>,
    doc: Option<String>,
}

impl MethodSpec {
    pub fn new(
        name: impl Into<String>,
        input_type: impl Into<String>,
        output_type: impl Into<String>,
        call_shape: CallShape,
    ) -> Self {
        Self {
            name: name.into(),
            input_type: input_type.into(),
            output_type: output_type.into(),
            call_shape,
            field_name: None,
            id_name: None,
            doc: None,
        }
    }

    /// Use an explicit descriptor field name instead of [`field_name_for`].
    pub fn field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    /// Use an explicit ID constant name instead of [`id_name_for`].
    pub fn id_name(mut self, id_name: impl Into<String>) -> Self {
        self.id_name = Some(id_name.into());
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// Collects a service description and validates it into a [`Service`].
#[derive(Debug, Clone)]
pub struct ServiceBuilder {
    name: String,
    proto_name: String,
    package_name: String,
    outer_class_name: Option<String>,
    proto_file: Option<String>,
    doc: Option<String>,
    methods: Vec<MethodSpec>,
}

impl ServiceBuilder {
    pub fn new(name: impl Into<String>, proto_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            proto_name: proto_name.into(),
            package_name: String::new(),
            outer_class_name: None,
            proto_file: None,
            doc: None,
            methods: Vec::new(),
        }
    }

    pub fn package_name(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = package_name.into();
        self
    }

    pub fn outer_class_name(mut self, outer_class_name: impl Into<String>) -> Self {
        self.outer_class_name = Some(outer_class_name.into());
        self
    }

    pub fn proto_file(mut self, proto_file: impl Into<String>) -> Self {
        self.proto_file = Some(proto_file.into());
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Append a method. Declaration order becomes ID order.
    pub fn method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    pub fn methods(mut self, methods: impl IntoIterator<Item = MethodSpec>) -> Self {
        self.methods.extend(methods);
        self
    }

    /// Validate names, derive identifiers and assign method IDs.
    pub fn build(self) -> Result<Service, SchemaError> {
        require_identifier("service name", &self.name)?;
        require_non_empty("service proto name", &self.proto_name)?;
        if !self.package_name.is_empty() {
            for segment in self.package_name.split('.') {
                require_identifier("package name segment", segment)?;
            }
        }
        if let Some(outer) = &self.outer_class_name {
            require_identifier("outer class name", outer)?;
        }

        let mut field_owners: HashMap<String, String> = HashMap::new();
        let mut id_owners: HashMap<String, String> = HashMap::new();
        let mut handler_owners: HashMap<String, String> = HashMap::new();
        let mut methods = Vec::with_capacity(self.methods.len());

        for (index, spec) in self.methods.into_iter().enumerate() {
            let id = u32::try_from(index).map_err(|_| SchemaError::TooManyMethods {
                service: self.name.clone(),
            })?;

            require_identifier("method name", &spec.name)?;
            require_non_empty("method input type", &spec.input_type)?;
            require_non_empty("method output type", &spec.output_type)?;

            let field_name = spec
                .field_name
                .unwrap_or_else(|| field_name_for(&spec.name));
            let id_name = spec.id_name.unwrap_or_else(|| id_name_for(&spec.name));
            require_derived("descriptor field name", &field_name, &spec.name)?;
            require_derived("method id constant", &id_name, &spec.name)?;

            if let Some(first) = field_owners.get(&field_name) {
                return Err(SchemaError::DuplicateFieldName {
                    field_name,
                    first: first.clone(),
                    second: spec.name,
                });
            }
            if let Some(first) = id_owners.get(&id_name) {
                return Err(SchemaError::DuplicateIdName {
                    id_name,
                    first: first.clone(),
                    second: spec.name,
                });
            }
            // snake_case is the coarsest handler spelling any target uses.
            let handler_name = spec.name.to_snake_case();
            if let Some(first) = handler_owners.get(&handler_name) {
                return Err(SchemaError::DuplicateHandlerName {
                    handler_name,
                    first: first.clone(),
                    second: spec.name,
                });
            }
            field_owners.insert(field_name.clone(), spec.name.clone());
            id_owners.insert(id_name.clone(), spec.name.clone());
            handler_owners.insert(handler_name, spec.name.clone());

            methods.push(Method {
                full_method_name: format!("{}/{}", self.proto_name, spec.name),
                name: spec.name,
                field_name,
                id_name,
                id: MethodId(id),
                input_type: spec.input_type,
                output_type: spec.output_type,
                call_shape: spec.call_shape,
                doc: spec.doc,
            });
        }

        Ok(Service {
            name: self.name,
            proto_name: self.proto_name,
            package_name: self.package_name,
            outer_class_name: self.outer_class_name,
            proto_file: self.proto_file,
            doc: self.doc,
            methods,
        })
    }
}

fn require_non_empty(what: &'static str, value: &str) -> Result<(), SchemaError> {
    if value.trim().is_empty() {
        return Err(SchemaError::EmptyName { what });
    }
    Ok(())
}

fn require_identifier(what: &'static str, value: &str) -> Result<(), SchemaError> {
    require_non_empty(what, value)?;
    if !is_identifier(value) {
        return Err(SchemaError::InvalidIdentifier {
            what,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Derived names must still be identifiers after case conversion; `_` alone
/// converts to nothing and leaves a bare `METHOD_` prefix.
fn require_derived(what: &'static str, derived: &str, method_name: &str) -> Result<(), SchemaError> {
    if !is_identifier(derived) || derived.ends_with('_') {
        return Err(SchemaError::InvalidIdentifier {
            what,
            value: format!("{derived} (from `{method_name}`)"),
        });
    }
    Ok(())
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
