//! HTTP response domain types

mod error;
mod spec;

pub use error::ResponseError;
pub use spec::{Response, ResponseHeaders};
