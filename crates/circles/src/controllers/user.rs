//! User controllers.

use circles_core::application::{
    UserDeleteCommand, UserDeleteService, UserGetCommand, UserGetService, UserListCommand,
    UserListService, UserRegisterCommand, UserRegisterService, UserUpdateCommand,
    UserUpdateService,
};

use super::request::{required_path_parameter, JsonBody};
use super::response::{created, no_content, ok, respond, ControllerError};
use super::{ApiGatewayEvent, ApiGatewayResponse};

const USER_ID: &str = "userId";

/// `POST /users` with `{ "user_name", "mail_address" }`.
pub struct UserRegisterController {
    service: UserRegisterService,
    root_uri: String,
}

impl UserRegisterController {
    pub fn new(service: UserRegisterService, root_uri: impl Into<String>) -> Self {
        Self {
            service,
            root_uri: root_uri.into(),
        }
    }

    pub async fn handle(&self, event: ApiGatewayEvent) -> ApiGatewayResponse {
        respond(self.register(event).await, "Failed to register user")
    }

    async fn register(
        &self,
        event: ApiGatewayEvent,
    ) -> Result<ApiGatewayResponse, ControllerError> {
        let body = JsonBody::parse(&event)?;
        let command = UserRegisterCommand::new(
            body.required_string("user_name")?,
            body.required_string("mail_address")?,
        );

        let user = self.service.handle(command).await?;
        Ok(created(format!("{}users/{}", self.root_uri, user.user_id)))
    }
}

/// `PUT /users/{userId}` with any of `{ "user_name", "mail_address" }`.
pub struct UserUpdateController {
    service: UserUpdateService,
}

impl UserUpdateController {
    pub fn new(service: UserUpdateService) -> Self {
        Self { service }
    }

    pub async fn handle(&self, event: ApiGatewayEvent) -> ApiGatewayResponse {
        respond(self.update(event).await, "Failed to update user")
    }

    async fn update(&self, event: ApiGatewayEvent) -> Result<ApiGatewayResponse, ControllerError> {
        let body = JsonBody::parse(&event)?;
        let user_id = required_path_parameter(&event, USER_ID, "user id")?;

        let command = UserUpdateCommand {
            user_id,
            user_name: body.optional_string("user_name")?,
            mail_address: body.optional_string("mail_address")?,
        };
        if command.user_name.is_none() && command.mail_address.is_none() {
            return Err(ControllerError::bad_request(
                "user_name or mail_address are undefined",
            ));
        }

        self.service.handle(command).await?;
        Ok(no_content())
    }
}

/// `GET /users/{userId}` or `GET /users?mail_address=<mail>`.
pub struct UserGetController {
    service: UserGetService,
}

impl UserGetController {
    pub fn new(service: UserGetService) -> Self {
        Self { service }
    }

    pub async fn handle(&self, event: ApiGatewayEvent) -> ApiGatewayResponse {
        respond(self.get(event).await, "Failed to get user")
    }

    async fn get(&self, event: ApiGatewayEvent) -> Result<ApiGatewayResponse, ControllerError> {
        let command = UserGetCommand {
            user_id: event.path_parameter(USER_ID).map(str::to_string),
            mail_address: event.query_parameter("mail_address").map(str::to_string),
        };
        if command.user_id.is_none() && command.mail_address.is_none() {
            return Err(ControllerError::bad_request(
                "user id or mail_address is required",
            ));
        }

        let user = self.service.handle(command).await?;
        Ok(ok(&user))
    }
}

/// `DELETE /users/{userId}`. Succeeds when the user does not exist.
pub struct UserDeleteController {
    service: UserDeleteService,
}

impl UserDeleteController {
    pub fn new(service: UserDeleteService) -> Self {
        Self { service }
    }

    pub async fn handle(&self, event: ApiGatewayEvent) -> ApiGatewayResponse {
        respond(self.delete(event).await, "Failed to delete user")
    }

    async fn delete(&self, event: ApiGatewayEvent) -> Result<ApiGatewayResponse, ControllerError> {
        let user_id = required_path_parameter(&event, USER_ID, "user id")?;

        self.service.handle(UserDeleteCommand::new(user_id)).await?;
        Ok(no_content())
    }
}

/// `GET /users?limit=<n>`.
pub struct UserListController {
    service: UserListService,
}

impl UserListController {
    pub fn new(service: UserListService) -> Self {
        Self { service }
    }

    pub async fn handle(&self, event: ApiGatewayEvent) -> ApiGatewayResponse {
        respond(self.list(event).await, "Failed to list user")
    }

    async fn list(&self, event: ApiGatewayEvent) -> Result<ApiGatewayResponse, ControllerError> {
        let limit = event
            .query_parameter("limit")
            .map(|limit| {
                limit
                    .parse::<usize>()
                    .map_err(|_| ControllerError::bad_request("Limit type is not number"))
            })
            .transpose()?;

        let users = self.service.handle(UserListCommand { limit }).await?;
        Ok(ok(&users))
    }
}
