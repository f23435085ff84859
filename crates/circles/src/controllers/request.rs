//! Request body and parameter extraction.

use serde_json::{Map, Value};

use super::{ApiGatewayEvent, ControllerError};

/// A JSON object request body.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(Map<String, Value>);

impl JsonBody {
    pub fn parse(event: &ApiGatewayEvent) -> Result<Self, ControllerError> {
        let raw = event
            .body
            .as_deref()
            .ok_or_else(|| ControllerError::bad_request("request body is null"))?;

        match serde_json::from_str(raw) {
            Ok(Value::Object(fields)) => Ok(Self(fields)),
            Ok(_) => Err(ControllerError::bad_request(
                "request body is not a JSON object",
            )),
            Err(_) => Err(ControllerError::bad_request("request body is not valid JSON")),
        }
    }

    /// Returns the string at `field`. `null` counts as absent.
    pub fn optional_string(&self, field: &str) -> Result<Option<String>, ControllerError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(ControllerError::bad_request(format!(
                "{field} type is not string"
            ))),
        }
    }

    pub fn required_string(&self, field: &str) -> Result<String, ControllerError> {
        self.optional_string(field)?
            .ok_or_else(|| ControllerError::bad_request(format!("{field} is required")))
    }

    /// Returns the array of strings at `field`. `null` counts as absent.
    pub fn optional_string_list(
        &self,
        field: &str,
    ) -> Result<Option<Vec<String>>, ControllerError> {
        let invalid = || ControllerError::bad_request(format!("{field} type is not string[]"));

        match self.0.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(values)) => values
                .iter()
                .map(|value| value.as_str().map(str::to_string).ok_or_else(invalid))
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(invalid()),
        }
    }
}

/// Returns the path parameter `name` or a bad request naming `label`.
pub fn required_path_parameter(
    event: &ApiGatewayEvent,
    name: &str,
    label: &str,
) -> Result<String, ControllerError> {
    event
        .path_parameter(name)
        .map(str::to_string)
        .ok_or_else(|| ControllerError::bad_request(format!("{label} type is not string")))
}
