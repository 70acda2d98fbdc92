use std::sync::Arc;

use http::header::HeaderName;
use http::HeaderValue;
use log::debug;

use crate::canonical::canonical_string;
use crate::constants::*;
use crate::header::{validate_headers, Headers, UncheckedHeaders};
use crate::param::{prepare_parameters, ParameterPlacement, Parameters};
use crate::sign::authorization_header;
use crate::time::{DateStringProvider, SystemDateStringProvider};
use crate::{Credential, Result};

/// Signer is the main struct used to compute the authentication components
/// of a Duo API call.
///
/// It holds nothing but the credential and the date provider, so one signer
/// can be shared by many threads.
#[derive(Clone, Debug)]
pub struct Signer {
    credential: Credential,
    date: Arc<dyn DateStringProvider>,
}

impl Signer {
    /// Create a new signer taking the date from the system clock.
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            date: Arc::new(SystemDateStringProvider),
        }
    }

    /// Replace the date provider.
    pub fn with_date_provider(mut self, date: impl DateStringProvider) -> Self {
        self.date = Arc::new(date);
        self
    }

    /// Get the credential this signer uses.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Compute the uri, body and headers of a request.
    ///
    /// - `POST`, `PUT` and `PATCH` send `params` as a JSON body and add
    ///   `Content-type: application/json`; other methods put them in the
    ///   query string.
    /// - `x-duo-date` is always set, replacing any caller value, and is
    ///   signed together with the other x-duo headers.
    /// - `Authorization` carries the signature.
    ///
    /// The caller's headers are validated first. Any error aborts the call
    /// before anything is computed.
    pub fn get_authentication_components(
        &self,
        method: &str,
        path: &str,
        params: Option<&Parameters>,
        headers: Option<&UncheckedHeaders>,
    ) -> Result<AuthenticationComponents> {
        let mut headers = validate_headers(headers)?;

        let date = self.date.rfc_2822_date_string();

        let placement = ParameterPlacement::for_method(method);
        debug!("parameters of {method} {path} are placed in {placement:?}");
        let (query, body) = prepare_parameters(params, placement)?;

        headers.insert(X_DUO_DATE, date.as_str());
        let x_duo_headers = headers.x_duo_headers();

        let canonical = canonical_string(
            &date,
            method,
            &self.credential.api_host,
            path,
            Some(&query),
            body.as_deref(),
            Some(&x_duo_headers),
        );
        let authorization = authorization_header(&self.credential, &canonical);

        let mut uri = format!("{}{path}", self.credential.api_host);
        let query_string = query.to_query_string();
        if !query_string.is_empty() {
            uri.push('?');
            uri.push_str(&query_string);
        }

        headers.insert(AUTHORIZATION, authorization);
        if placement == ParameterPlacement::Body {
            headers.insert(CONTENT_TYPE, CONTENT_TYPE_JSON);
        }

        Ok(AuthenticationComponents { uri, body, headers })
    }
}

/// The signed pieces of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationComponents {
    /// Host, path and query string, without scheme.
    pub uri: String,
    /// JSON body, only for methods that carry parameters in the body.
    pub body: Option<String>,
    /// Caller headers plus `x-duo-date`, `Authorization` and, with a body,
    /// `Content-type`.
    pub headers: Headers,
}

impl AuthenticationComponents {
    /// Split into `(uri, body, headers)`.
    pub fn into_parts(self) -> (String, Option<String>, Headers) {
        (self.uri, self.body, self.headers)
    }

    /// Build an `https` request out of the components.
    ///
    /// Header names are lowercased by `http`; the `Authorization` value is
    /// marked sensitive.
    pub fn to_http_request(&self, method: &str) -> Result<http::Request<String>> {
        let mut req = http::Request::new(self.body.clone().unwrap_or_default());
        *req.method_mut() = http::Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
        *req.uri_mut() = format!("https://{}", self.uri).parse()?;

        for (k, v) in self.headers.iter() {
            let name = HeaderName::from_bytes(k.as_bytes())?;
            let mut value = HeaderValue::from_str(v)?;
            if name == http::header::AUTHORIZATION {
                value.set_sensitive(true);
            }
            req.headers_mut().append(name, value);
        }

        Ok(req)
    }
}
