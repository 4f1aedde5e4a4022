//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use courier_domain::{HttpMethod, RequestDraft};

/// Send one HTTP request, substituting `{{VAR}}` from the active environment.
#[derive(Parser, Debug)]
#[command(name = "courier", version, about, long_about = None)]
pub struct Cli {
    /// HTTP method (GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS)
    pub method: HttpMethod,

    /// Target URL, may contain `{{VAR}}` placeholders
    pub url: String,

    /// Request header as `Key: Value`; repeatable
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Request body (ignored for GET and HEAD)
    #[arg(short = 'd', long = "data", value_name = "BODY")]
    pub body: Option<String>,

    /// Switch to this environment before sending
    #[arg(short = 'e', long = "env", value_name = "NAME")]
    pub env: Option<String>,

    /// Also save the request to the Default collection
    #[arg(short = 's', long)]
    pub save: bool,

    /// Use this configuration directory instead of the default
    #[arg(long, value_name = "PATH")]
    pub config_dir: Option<PathBuf>,
}

impl Cli {
    /// Builds the unresolved draft described by the arguments.
    #[must_use]
    pub fn draft(&self) -> RequestDraft {
        RequestDraft::new(self.method, self.url.clone())
            .with_headers_text(self.headers.join("\n"))
            .with_body(self.body.clone().unwrap_or_default())
    }
}
