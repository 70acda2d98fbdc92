//! Core components for signing Duo API requests.
//!
//! Duo authenticates API calls with an HMAC over a "canonical string" built
//! from the request. This crate computes everything a transport needs to send
//! such a call: the final URI, the body and the headers including
//! `Authorization`. It performs no I/O.
//!
//! ## Overview
//!
//! The pipeline runs leaf-first:
//!
//! - [`validate_headers`]: rejects malformed caller headers, reporting every
//!   problem at once
//! - [`prepare_parameters`]: JSON body for `POST`/`PUT`/`PATCH`, normalized
//!   query parameters otherwise
//! - [`canonical_string`]: the seven line, order-independent representation
//!   of the request
//! - [`authorization_header`]: HMAC-SHA512 of the canonical string, wrapped in
//!   a `Basic` credential
//! - [`Signer`]: orchestrates the steps above
//!
//! ## Example
//!
//! ```
//! use duo_hmac_core::{Credential, Parameters, Signer, StaticDateStringProvider};
//!
//! # fn main() -> duo_hmac_core::Result<()> {
//! let signer = Signer::new(Credential::new(
//!     "DIABCDEFGHIJKLMNOPQR",
//!     "testtesttesttesttesttesttesttesttesttest",
//!     "api-xxxxxxxx.duosecurity.com",
//! ))
//! .with_date_provider(StaticDateStringProvider::new("Fri, 24 May 2024 12:00:00 -0000"));
//!
//! let params = Parameters::from_iter([("foo", "bar")]);
//! let (uri, body, headers) = signer
//!     .get_authentication_components("GET", "/api/path", Some(&params), None)?
//!     .into_parts();
//!
//! assert_eq!(uri, "api-xxxxxxxx.duosecurity.com/api/path?foo=bar");
//! assert_eq!(body, None);
//! assert!(headers.get("Authorization").unwrap().starts_with("Basic "));
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Date providers and formatting
//! - [`utils`]: General utilities including secret redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod constants;

mod error;
pub use error::{Error, ErrorKind, Result};

mod credential;
pub use credential::Credential;

mod header;
pub use header::{is_x_duo_header, validate_headers, Headers, UncheckedHeaders};

mod param;
pub use param::{
    jsonize_parameters, normalize_parameters, prepare_parameters, ParamValue, ParameterPlacement,
    Parameters, QueryParameters, Scalar,
};

mod canonical;
pub use canonical::{
    canonical_string, canonicalize_body, canonicalize_parameters, canonicalize_x_duo_headers,
};

mod sign;
pub use sign::{authorization_header, sign_canonical_string};

mod signer;
pub use signer::{AuthenticationComponents, Signer};

pub use time::{DateStringProvider, StaticDateStringProvider, SystemDateStringProvider};
