//! Response body decoding
//!
//! Turns capped raw bytes plus a `Content-Type` into display-ready text.
//! Decoding never fails: unknown charsets, invalid bytes and malformed
//! JSON all degrade to something printable.

pub mod charset;
pub mod format;

use encoding_rs::Encoding;

pub use charset::{decode_bytes, default_fallbacks, extract_charset};
pub use format::{LARGE_BODY_BYTES, PREVIEW_CHARS, TRUNCATION_NOTICE, format_body, truncate_preview};

/// Formatting switches taken from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Pretty-print JSON bodies.
    pub auto_format_json: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            auto_format_json: true,
        }
    }
}

/// Decodes and formats response bodies.
#[derive(Debug, Clone)]
pub struct ResponseDecoder {
    options: DecoderOptions,
    fallbacks: Vec<&'static Encoding>,
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::new(DecoderOptions::default())
    }
}

impl ResponseDecoder {
    /// Creates a decoder with the default fallback encodings.
    #[must_use]
    pub fn new(options: DecoderOptions) -> Self {
        Self {
            options,
            fallbacks: default_fallbacks(),
        }
    }

    /// Replaces the fallback encodings tried after UTF-8.
    #[must_use]
    pub fn with_fallbacks(mut self, fallbacks: Vec<&'static Encoding>) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    /// Decodes bytes using the charset declared in `content_type`.
    #[must_use]
    pub fn decode(&self, bytes: &[u8], content_type: &str) -> String {
        let charset = extract_charset(content_type);
        decode_bytes(bytes, charset.as_deref(), &self.fallbacks).into_owned()
    }

    /// Decodes bytes and applies the display policy.
    #[must_use]
    pub fn decode_and_format(&self, bytes: &[u8], content_type: &str) -> String {
        let text = self.decode(bytes, content_type);
        format_body(&text, content_type, self.options.auto_format_json)
    }
}
