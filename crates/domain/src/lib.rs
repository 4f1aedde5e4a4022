//! Courier Domain - Core value types
//!
//! This crate defines the value objects shared by the request pipeline and
//! the persistent store. All types here are pure Rust with no I/O dependencies.

pub mod collection;
pub mod environment;
pub mod error;
pub mod history;
pub mod id;
pub mod request;
pub mod response;
pub mod settings;

pub use collection::{Collection, DEFAULT_COLLECTION};
pub use environment::Environment;
pub use error::{DomainError, DomainResult};
pub use history::RequestHistory;
pub use id::generate_id;
pub use request::{HttpMethod, RequestDraft, RequestHeaders, RequestItem, parse_header_block};
pub use response::{Response, ResponseError, ResponseHeaders};
pub use settings::AppConfig;
