//! Byte resources behind `file:`, `http:` and `https:` urls.

mod connector;
mod resource;

pub use connector::FileConnector;
pub use resource::Resource;
