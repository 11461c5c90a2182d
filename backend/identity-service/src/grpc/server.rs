/// gRPC server implementation for identity-service
///
/// Implements `Login`: verifies a username/password pair against the
/// credential store and issues an access token.
use crate::error::IdentityError;
use crate::grpc::pb::auth_service_server::AuthService;
use crate::grpc::pb::{LoginRequest, LoginResponse};
use crate::store::UserStore;
use grpc_jwt_auth::TokenManager;
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::{error, info, warn};

/// Identity service gRPC handler
#[derive(Clone)]
pub struct AuthServiceImpl {
    users: Arc<dyn UserStore>,
    tokens: TokenManager,
}

impl AuthServiceImpl {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenManager) -> Self {
        Self { users, tokens }
    }

    async fn login_user(&self, req: LoginRequest) -> Result<String, IdentityError> {
        let user = self
            .users
            .find(&req.username)
            .await
            .map_err(|e| IdentityError::Store(e.to_string()))?;

        // Unknown user and wrong password look the same to the caller
        let user = match user {
            Some(user) if user.is_correct_password(&req.password)? => user,
            _ => return Err(IdentityError::InvalidCredentials),
        };

        let token = self.tokens.issue(&user.username, user.role)?;
        info!(username = %user.username, role = %user.role, "User logged in");

        Ok(token)
    }
}

#[tonic::async_trait]
impl AuthService for AuthServiceImpl {
    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> std::result::Result<Response<LoginResponse>, Status> {
        let req = request.into_inner();
        let username = req.username.clone();

        match self.login_user(req).await {
            Ok(access_token) => Ok(Response::new(LoginResponse { access_token })),
            Err(IdentityError::InvalidCredentials) => {
                warn!(username = %username, "Login failed: incorrect username/password");
                Err(IdentityError::InvalidCredentials.to_status())
            }
            Err(err) => {
                error!(username = %username, error = %err, "Login failed");
                Err(err.to_status())
            }
        }
    }
}
