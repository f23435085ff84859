//! Circle controllers.

use circles_core::application::{
    CircleDeleteCommand, CircleDeleteService, CircleGetCommand, CircleGetService,
    CircleRegisterCommand, CircleRegisterService, CircleUpdateCommand, CircleUpdateService,
};

use super::request::{required_path_parameter, JsonBody};
use super::response::{created, no_content, ok, respond, ControllerError};
use super::{ApiGatewayEvent, ApiGatewayResponse};

const CIRCLE_ID: &str = "circleId";

/// `POST /circles` with `{ "circle_name", "owner_id" }`.
pub struct CircleRegisterController {
    service: CircleRegisterService,
    root_uri: String,
}

impl CircleRegisterController {
    pub fn new(service: CircleRegisterService, root_uri: impl Into<String>) -> Self {
        Self {
            service,
            root_uri: root_uri.into(),
        }
    }

    pub async fn handle(&self, event: ApiGatewayEvent) -> ApiGatewayResponse {
        respond(self.register(event).await, "Failed to register circle")
    }

    async fn register(
        &self,
        event: ApiGatewayEvent,
    ) -> Result<ApiGatewayResponse, ControllerError> {
        let body = JsonBody::parse(&event)?;
        let command = CircleRegisterCommand::new(
            body.required_string("owner_id")?,
            body.required_string("circle_name")?,
        );

        let circle = self.service.handle(command).await?;
        Ok(created(format!("{}circles/{}", self.root_uri, circle.circle_id)))
    }
}

/// `PUT /circles/{circleId}` with any of `{ "circle_name", "owner_id", "member_ids" }`.
pub struct CircleUpdateController {
    service: CircleUpdateService,
}

impl CircleUpdateController {
    pub fn new(service: CircleUpdateService) -> Self {
        Self { service }
    }

    pub async fn handle(&self, event: ApiGatewayEvent) -> ApiGatewayResponse {
        respond(self.update(event).await, "Failed to update circle")
    }

    async fn update(&self, event: ApiGatewayEvent) -> Result<ApiGatewayResponse, ControllerError> {
        let body = JsonBody::parse(&event)?;
        let circle_id = required_path_parameter(&event, CIRCLE_ID, "circle id")?;

        let command = CircleUpdateCommand {
            circle_id,
            circle_name: body.optional_string("circle_name")?,
            owner_id: body.optional_string("owner_id")?,
            member_ids: body.optional_string_list("member_ids")?,
        };
        if command.circle_name.is_none()
            && command.owner_id.is_none()
            && command.member_ids.is_none()
        {
            return Err(ControllerError::bad_request(
                "circle_name, owner_id or member_ids are undefined",
            ));
        }

        self.service.handle(command).await?;
        Ok(no_content())
    }
}

/// `GET /circles/{circleId}` or `GET /circles?circle_name=<name>`.
pub struct CircleGetController {
    service: CircleGetService,
}

impl CircleGetController {
    pub fn new(service: CircleGetService) -> Self {
        Self { service }
    }

    pub async fn handle(&self, event: ApiGatewayEvent) -> ApiGatewayResponse {
        respond(self.get(event).await, "Failed to get circle")
    }

    async fn get(&self, event: ApiGatewayEvent) -> Result<ApiGatewayResponse, ControllerError> {
        let command = CircleGetCommand {
            circle_id: event.path_parameter(CIRCLE_ID).map(str::to_string),
            circle_name: event.query_parameter("circle_name").map(str::to_string),
        };
        if command.circle_id.is_none() && command.circle_name.is_none() {
            return Err(ControllerError::bad_request(
                "circle id or circle_name is required",
            ));
        }

        let circle = self.service.handle(command).await?;
        Ok(ok(&circle))
    }
}

/// `DELETE /circles/{circleId}`. Succeeds when the circle does not exist.
pub struct CircleDeleteController {
    service: CircleDeleteService,
}

impl CircleDeleteController {
    pub fn new(service: CircleDeleteService) -> Self {
        Self { service }
    }

    pub async fn handle(&self, event: ApiGatewayEvent) -> ApiGatewayResponse {
        respond(self.delete(event).await, "Failed to delete circle")
    }

    async fn delete(&self, event: ApiGatewayEvent) -> Result<ApiGatewayResponse, ControllerError> {
        let circle_id = required_path_parameter(&event, CIRCLE_ID, "circle id")?;

        self.service
            .handle(CircleDeleteCommand::new(circle_id))
            .await?;
        Ok(no_content())
    }
}
