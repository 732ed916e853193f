use thiserror::Error;

/// Reasons a service description cannot be turned into a [`Service`](crate::Service).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{what} must not be empty")]
    EmptyName { what: &'static str },

    #[error("{what} `{value}` is not a valid identifier")]
    InvalidIdentifier { what: &'static str, value: String },

    #[error("methods `{first}` and `{second}` both map to descriptor field `{field_name}`")]
    DuplicateFieldName {
        field_name: String,
        first: String,
        second: String,
    },

    #[error("methods `{first}` and `{second}` both map to method id constant `{id_name}`")]
    DuplicateIdName {
        id_name: String,
        first: String,
        second: String,
    },

    #[error("methods `{first}` and `{second}` both map to handler `{handler_name}`")]
    DuplicateHandlerName {
        handler_name: String,
        first: String,
        second: String,
    },

    #[error("service `{service}` declares more methods than fit in a method id")]
    TooManyMethods { service: String },

    #[error("call shape tag {0} is out of range (expected 0..=3)")]
    UnknownCallShape(u8),
}
