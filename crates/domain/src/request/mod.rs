//! HTTP Request domain types

mod draft;
mod headers;
mod item;
mod method;

pub use draft::RequestDraft;
pub use headers::{RequestHeaders, header_value, parse_header_block};
pub use item::RequestItem;
pub use method::HttpMethod;
