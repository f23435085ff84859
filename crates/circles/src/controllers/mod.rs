//! Lambda-style controllers.
//!
//! Each controller turns an API Gateway proxy event into an application
//! command, runs the service and maps the outcome to a proxy response.
//! [`Controllers`] wires every controller to a pair of repositories and
//! dispatches by [`Route`].

mod circle;
mod event;
mod request;
mod response;
mod user;

use std::sync::Arc;

use circles_core::application::{
    CircleDeleteService, CircleGetService, CircleRegisterService, CircleUpdateService,
    UserDeleteService, UserGetService, UserListService, UserRegisterService, UserUpdateService,
};
use circles_core::storage::{CircleRepository, UserRepository};

pub use circle::{
    CircleDeleteController, CircleGetController, CircleRegisterController, CircleUpdateController,
};
pub use event::{ApiGatewayEvent, ApiGatewayResponse};
pub use request::JsonBody;
pub use response::{error_response, ControllerError};
pub use user::{
    UserDeleteController, UserGetController, UserListController, UserRegisterController,
    UserUpdateController,
};

/// Every controller the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Route {
    CircleRegister,
    CircleUpdate,
    CircleGet,
    CircleDelete,
    UserRegister,
    UserUpdate,
    UserGet,
    UserDelete,
    UserList,
}

/// All controllers, wired to the same repositories.
pub struct Controllers {
    circle_register: CircleRegisterController,
    circle_update: CircleUpdateController,
    circle_get: CircleGetController,
    circle_delete: CircleDeleteController,
    user_register: UserRegisterController,
    user_update: UserUpdateController,
    user_get: UserGetController,
    user_delete: UserDeleteController,
    user_list: UserListController,
}

impl Controllers {
    pub fn new(
        circle_repository: Arc<dyn CircleRepository>,
        user_repository: Arc<dyn UserRepository>,
        root_uri: impl Into<String>,
    ) -> Self {
        let root_uri = root_uri.into();
        Self {
            circle_register: CircleRegisterController::new(
                CircleRegisterService::new(circle_repository.clone(), user_repository.clone()),
                root_uri.clone(),
            ),
            circle_update: CircleUpdateController::new(CircleUpdateService::new(
                circle_repository.clone(),
                user_repository.clone(),
            )),
            circle_get: CircleGetController::new(CircleGetService::new(circle_repository.clone())),
            circle_delete: CircleDeleteController::new(CircleDeleteService::new(circle_repository)),
            user_register: UserRegisterController::new(
                UserRegisterService::new(user_repository.clone()),
                root_uri,
            ),
            user_update: UserUpdateController::new(UserUpdateService::new(
                user_repository.clone(),
            )),
            user_get: UserGetController::new(UserGetService::new(user_repository.clone())),
            user_delete: UserDeleteController::new(UserDeleteService::new(
                user_repository.clone(),
            )),
            user_list: UserListController::new(UserListService::new(user_repository)),
        }
    }

    pub async fn dispatch(&self, route: Route, event: ApiGatewayEvent) -> ApiGatewayResponse {
        tracing::debug!(?route, "Dispatching event");
        match route {
            Route::CircleRegister => self.circle_register.handle(event).await,
            Route::CircleUpdate => self.circle_update.handle(event).await,
            Route::CircleGet => self.circle_get.handle(event).await,
            Route::CircleDelete => self.circle_delete.handle(event).await,
            Route::UserRegister => self.user_register.handle(event).await,
            Route::UserUpdate => self.user_update.handle(event).await,
            Route::UserGet => self.user_get.handle(event).await,
            Route::UserDelete => self.user_delete.handle(event).await,
            Route::UserList => self.user_list.handle(event).await,
        }
    }
}
