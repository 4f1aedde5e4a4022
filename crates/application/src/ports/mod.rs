//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the request pipeline and external
//! systems. Each port is a trait implemented by adapters in the
//! infrastructure layer.

mod clock;
mod http_client;
mod store;

pub use clock::Clock;
pub use http_client::{
    BodyOutcome, HttpClient, HttpClientError, OutboundRequest, RawResponse, ResponseHead,
};
pub use store::{RequestStore, StoreError};
