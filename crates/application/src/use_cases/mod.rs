//! Application use cases (business logic orchestration).

mod save_request;

pub use save_request::*;
