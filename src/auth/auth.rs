use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data};
use futures::future::{Ready, ready};

use crate::config::Config;
use crate::error::ApiError;
use crate::model::role::Role;

use super::jwt::verify_token;

/// Authenticated principal, passed explicitly into every workflow call.
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ErrorUnauthorized("Missing token"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Config missing",
                )));
            }
        };

        let claims = match verify_token(token, &config.jwt_secret) {
            Ok(c) => c,
            Err(_) => return ready(Err(ErrorUnauthorized("Invalid token"))),
        };

        ready(Ok(AuthUser {
            user_id: claims.user_id,
            email: claims.sub,
            role: claims.role,
        }))
    }
}

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::forbidden("Admin only"))
        }
    }

    /// Roles allowed to act on a pending request. Identity against the
    /// request's assigned supervisor is checked separately by the handler.
    pub fn require_supervisor_or_admin(&self) -> Result<(), ApiError> {
        if matches!(self.role, Role::Supervisor | Role::Admin) {
            Ok(())
        } else {
            Err(ApiError::forbidden("Supervisor/Admin only"))
        }
    }

    pub fn require_admin_or_super_admin(&self) -> Result<(), ApiError> {
        if matches!(self.role, Role::Admin | Role::SuperAdmin) {
            Ok(())
        } else {
            Err(ApiError::forbidden("Admin/SuperAdmin only"))
        }
    }
}
