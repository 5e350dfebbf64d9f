//! JSON error responses for `/api/messages`.
//!
//! Operators look at these in the browser's network tab when the screen stops
//! updating, so every failure carries a human hint about what to check in the
//! Apps Script deployment.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use common::error::FetchError;
use serde::Serialize;
use thiserror::Error;

use crate::services::messages::CORS_HEADERS;

const AUTH_HINT: &str = "Please check your Google Apps Script deployment settings. \
    Make sure \"Who has access\" is set to \"Anyone\".";
const DEPLOYMENT_HINT: &str = "Please verify that your Google Apps Script URL is correct \
    and the script is deployed as a Web app.";

#[derive(Error, Debug)]
#[error("{cause}")]
pub struct ProxyError {
    #[source]
    pub cause: FetchError,
    /// Include the error chain in the body. Only set in development.
    pub expose_stack: bool,
}

impl ProxyError {
    pub fn new(cause: FetchError, expose_stack: bool) -> Self {
        Self {
            cause,
            expose_stack,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: &'static str,
    message: String,
    hint: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
}

impl ProxyError {
    fn body(&self) -> ErrorBody {
        let hint = match self.cause {
            FetchError::AuthMisconfiguration => AUTH_HINT,
            _ => DEPLOYMENT_HINT,
        };
        let stack = self.expose_stack.then(|| format!("{:#?}", self.cause));

        match &self.cause {
            FetchError::Network {
                status: Some(status),
                status_text,
                details,
            } => ErrorBody {
                error: "Failed to fetch data from Google Apps Script",
                message: self.cause.to_string(),
                hint,
                status: Some(*status),
                status_text: Some(status_text.clone()),
                details: Some(details.clone()),
                stack,
            },
            _ => ErrorBody {
                error: "Failed to fetch from Google Apps Script",
                message: self.cause.to_string(),
                hint,
                status: None,
                status_text: None,
                details: None,
                stack,
            },
        }
    }
}

impl ResponseError for ProxyError {
    /// Upstream error statuses are relayed as-is; everything else is a 500.
    fn status_code(&self) -> StatusCode {
        match self.cause {
            FetchError::Network {
                status: Some(status),
                ..
            } => StatusCode::from_u16(status)
                .ok()
                .filter(|code| code.is_client_error() || code.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        for header in CORS_HEADERS {
            response.insert_header(header);
        }
        response.json(self.body())
    }
}
