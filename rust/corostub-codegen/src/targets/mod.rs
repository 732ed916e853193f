//! One module per output language.
//!
//! Every target renders the same five sub-artifacts from a
//! [`Service`](corostub_schema::Service): method descriptors, the server base,
//! the dispatch table, the client stub and the service metadata.

pub mod kotlin;
pub mod rust;
