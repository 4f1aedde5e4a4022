//! Courier Application - Request pipeline and ports
//!
//! This crate defines the application layer with:
//! - Port traits for the HTTP transport, the persistent store and the clock
//! - Variable resolution against the active environment
//! - Response decoding and formatting
//! - The request executor that ties them together

pub mod error;
pub mod execute_request;
pub mod ports;
pub mod response_decoder;
pub mod use_cases;
pub mod variable_resolver;

pub use error::{ApplicationError, ApplicationResult};
pub use execute_request::{
    BACKSTOP_GRACE, DEFAULT_USER_AGENT, Execution, HistoryWrite, LARGE_BODY_NOTICE_BYTES,
    MAX_BODY_BYTES, RequestExecutor,
};
pub use ports::{
    BodyOutcome, Clock, HttpClient, HttpClientError, OutboundRequest, RawResponse, RequestStore,
    ResponseHead, StoreError,
};
pub use response_decoder::{DecoderOptions, ResponseDecoder};
pub use use_cases::{SaveRequest, SaveRequestInput};
pub use variable_resolver::EnvironmentResolver;
