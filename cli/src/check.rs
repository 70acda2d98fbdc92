use std::fmt::{Display, Formatter};

use bytes::Bytes;
use duo_hmac_core::{Parameters, Result, Signer, UncheckedHeaders};
use http::StatusCode;
use log::debug;
use serde::Deserialize;

use crate::constants::*;
use crate::http::HttpSend;

/// The Duo API a credential was able to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    /// Auth API, checked with `/auth/v2/check`.
    Auth,
    /// Admin API, checked with `/admin/v1/settings`.
    Admin,
}

impl Display for Api {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Api::Auth => write!(f, "Auth API"),
            Api::Admin => write!(f, "Admin API"),
        }
    }
}

/// Result of [`check_credentials`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The credential successfully called the api.
    Success(Api),
    /// The last call failed; `message` is taken from the Duo error body.
    Failure {
        /// Status of the last call.
        status: StatusCode,
        /// Message of the Duo error body, if the body was JSON.
        message: Option<String>,
    },
}

impl CheckOutcome {
    /// Whether the credential could call any api.
    pub fn is_success(&self) -> bool {
        matches!(self, CheckOutcome::Success(_))
    }
}

impl Display for CheckOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckOutcome::Success(api) => write!(f, "Your credentials successfully called the {api}"),
            CheckOutcome::Failure {
                status,
                message: Some(message),
            } => write!(f, "API call failed with status {}: {message}", status.as_u16()),
            CheckOutcome::Failure {
                status,
                message: None,
            } => write!(f, "API call failed with status {}", status.as_u16()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    code: Option<i64>,
    message: Option<String>,
}

/// Check which Duo API the signer's credential is able to call.
///
/// `/auth/v2/check` is tried first. A `40301` error means the credential
/// belongs to an Admin API application, so `/admin/v1/settings` is tried
/// next.
pub async fn check_credentials(signer: &Signer, client: &dyn HttpSend) -> Result<CheckOutcome> {
    let cred = signer.credential();
    debug!(
        "checking credential {} against {}",
        cred.integration_key, cred.api_host
    );

    let (status, resp) = attempt_api_call(signer, client, AUTH_CHECK_PATH).await?;
    if status == StatusCode::OK {
        return Ok(CheckOutcome::Success(Api::Auth));
    }

    let Some(resp) = resp else {
        return Ok(CheckOutcome::Failure {
            status,
            message: None,
        });
    };
    if resp.code != Some(ADMIN_CREDENTIALS_CODE) {
        return Ok(CheckOutcome::Failure {
            status,
            message: resp.message,
        });
    }

    debug!("auth api rejected admin credentials, try admin api instead");
    let (status, resp) = attempt_api_call(signer, client, ADMIN_SETTINGS_PATH).await?;
    if status == StatusCode::OK {
        return Ok(CheckOutcome::Success(Api::Admin));
    }

    Ok(CheckOutcome::Failure {
        status,
        message: resp.and_then(|v| v.message),
    })
}

async fn attempt_api_call(
    signer: &Signer,
    client: &dyn HttpSend,
    path: &str,
) -> Result<(StatusCode, Option<ErrorResponse>)> {
    let components = signer.get_authentication_components(
        "GET",
        path,
        Some(&Parameters::new()),
        Some(&UncheckedHeaders::new()),
    )?;
    let req = components.to_http_request("GET")?.map(Bytes::from);

    let resp = client.http_send(req).await?;
    let status = resp.status();
    debug!("GET {path} responded with status {status}");

    let body = match serde_json::from_slice::<ErrorResponse>(resp.body()) {
        Ok(body) => Some(body),
        Err(err) => {
            debug!("response of GET {path} is not valid json: {err}");
            None
        }
    };

    Ok((status, body))
}
