use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use utoipa::ToSchema;

use crate::config::Config;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::model::user::User;

use super::jwt::generate_access_token;
use super::password::verify_password;

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jane@company.test", format = "email")]
    pub email: String,
    pub password: String,
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = Object, example = json!({
            "access_token": "eyJ...",
            "token_type": "Bearer"
        })),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(payload.email.to_lowercase())
        .fetch_optional(pool.get_ref())
        .await?;

    let Some(user) = user else {
        return Ok(HttpResponse::Unauthorized().json(json!({"message": "Invalid credentials"})));
    };

    if verify_password(&payload.password, &user.password).is_err() {
        warn!(email = %payload.email, "login failed");
        return Ok(HttpResponse::Unauthorized().json(json!({"message": "Invalid credentials"})));
    }

    let token = generate_access_token(
        user.id,
        user.email.clone(),
        user.role,
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "token signing failed");
        ApiError::Internal("Could not issue token".into())
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "access_token": token,
        "token_type": "Bearer"
    })))
}
