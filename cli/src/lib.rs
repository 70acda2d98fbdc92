//! Helpers behind the `check-credentials` and `generate-curl-call` binaries.
//!
//! - [`Config`]: credentials loaded from `duo.conf` and the environment
//! - [`HttpSend`]: the transport used to reach the Duo API
//! - [`check_credentials`]: verifies that a credential can call the Auth or
//!   Admin API
//! - [`curl_command`]: renders signed components as a curl invocation

#![warn(missing_docs)]

mod constants;
pub use constants::*;

mod config;
pub use config::Config;

mod http;
pub use http::{HttpSend, ReqwestHttpSend};

mod check;
pub use check::{check_credentials, Api, CheckOutcome};

mod curl;
pub use curl::{curl_command, parse_headers, parse_params};
