//! JSON documents: a top-level array of flat row objects.

mod service;

pub use service::{JsonSourceService, decode_records};
