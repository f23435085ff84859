//! Response builders and error-to-response mapping.

use std::error::Error as _;

use circles_core::application::{application_error_to_status_code, ApplicationError, ErrorKind};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use super::ApiGatewayResponse;

/// Failure of a controller invocation.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The event did not have the expected shape.
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl ControllerError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

pub fn ok(body: &impl Serialize) -> ApiGatewayResponse {
    match serde_json::to_string(body) {
        Ok(body) => ApiGatewayResponse::new(200, body),
        Err(err) => {
            tracing::error!(error = %err, "Failed to serialize response body");
            internal_server_error("Failed to serialize response")
        }
    }
}

pub fn created(location: impl Into<String>) -> ApiGatewayResponse {
    ApiGatewayResponse::new(201, "{}").with_header("location", location)
}

pub fn no_content() -> ApiGatewayResponse {
    ApiGatewayResponse::new(204, "{}")
}

fn error_body(status_code: u16, name: &str, message: &str) -> ApiGatewayResponse {
    ApiGatewayResponse::new(
        status_code,
        json!({ "name": name, "message": message }).to_string(),
    )
}

pub fn bad_request(message: &str) -> ApiGatewayResponse {
    error_body(400, "BadRequest", message)
}

pub fn internal_server_error(message: &str) -> ApiGatewayResponse {
    error_body(500, "InternalServerError", message)
}

/// Maps a controller failure to a response.
///
/// Unexpected failures are logged with their cause and answered with
/// `failure_message` only, so storage details never reach the caller.
pub fn error_response(error: &ControllerError, failure_message: &str) -> ApiGatewayResponse {
    let error = match error {
        ControllerError::BadRequest(message) => {
            tracing::warn!(message = %message, "Rejected malformed request");
            return bad_request(message);
        }
        ControllerError::Application(error) => error,
    };

    let status_code = application_error_to_status_code(error);
    let message = error.to_string();
    match error.kind() {
        ErrorKind::Argument => {
            tracing::warn!(error = %error, "Rejected request");
            error_body(status_code, "BadRequest", &message)
        }
        ErrorKind::NotFound => {
            tracing::warn!(error = %error, "Resource not found");
            error_body(status_code, "NotFound", &message)
        }
        ErrorKind::Duplicate | ErrorKind::Conflict => {
            tracing::warn!(error = %error, "Request conflicts with stored state");
            error_body(status_code, "Conflict", &message)
        }
        ErrorKind::Indeterminate => {
            tracing::error!(
                error = %error,
                cause = ?error.source(),
                "Write outcome unknown, the change may have been applied"
            );
            error_body(status_code, "GatewayTimeout", &message)
        }
        ErrorKind::Unknown => {
            tracing::error!(
                error = %error,
                cause = ?error.source(),
                "{failure_message}"
            );
            error_body(status_code, "InternalServerError", failure_message)
        }
    }
}

/// Turns a controller result into the response returned to API Gateway.
pub fn respond(
    result: Result<ApiGatewayResponse, ControllerError>,
    failure_message: &str,
) -> ApiGatewayResponse {
    result.unwrap_or_else(|error| error_response(&error, failure_message))
}

#[cfg(test)]
mod tests {
    use circles_core::storage::RepositoryError;
    use serde_json::Value;

    use super::*;

    fn body(response: &ApiGatewayResponse) -> Value {
        response.json_body().unwrap()
    }

    #[test]
    fn test_bad_request_shape() {
        let response = error_response(
            &ControllerError::bad_request("request body is null"),
            "Failed to register circle",
        );

        assert_eq!(response.status_code, 400);
        assert_eq!(
            body(&response),
            json!({ "name": "BadRequest", "message": "request body is null" })
        );
    }

    #[test]
    fn test_duplicate_is_conflict() {
        let error = ApplicationError::CircleDuplicate {
            circle_name: "Foo".to_string(),
            source: RepositoryError::Duplicate {
                entity_type: "Circle",
                field: "circleName",
                value: "Foo".to_string(),
            },
        };

        let response = error_response(&error.into(), "Failed to register circle");

        assert_eq!(response.status_code, 409);
        assert_eq!(body(&response)["name"], "Conflict");
    }

    #[test]
    fn test_unknown_hides_cause() {
        let error = ApplicationError::Unknown {
            source: RepositoryError::Unknown("ProvisionedThroughputExceeded".to_string()),
        };

        let response = error_response(&error.into(), "Failed to list user");

        assert_eq!(response.status_code, 500);
        assert_eq!(
            body(&response),
            json!({ "name": "InternalServerError", "message": "Failed to list user" })
        );
    }

    #[test]
    fn test_indeterminate_write_is_gateway_timeout() {
        let error = ApplicationError::Indeterminate {
            source: RepositoryError::Indeterminate("dispatch failure".to_string()),
        };

        let response = error_response(&error.into(), "Failed to register user");

        assert_eq!(response.status_code, 504);
        assert_eq!(body(&response)["name"], "GatewayTimeout");
        assert_ne!(body(&response)["message"], "Failed to register user");
    }

    #[test]
    fn test_created_carries_location() {
        let response = created("http://localhost/circles/c1");

        assert_eq!(response.status_code, 201);
        assert_eq!(
            response.headers.get("location").map(String::as_str),
            Some("http://localhost/circles/c1")
        );
        assert_eq!(response.body, "{}");
    }
}
