use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::config::Config;
use crate::error::ApiError;
use crate::model::role::Role;
use crate::models::Claims;

/// Identity extracted from the bearer token. Handlers take this as an
/// argument and call the `require_*` guards for role gating.
pub struct AuthUser {
    pub user_id: u64,
    pub email: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ApiError::Auth("Missing token".into()))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => return ready(Err(ApiError::Store)),
        };

        let data = match decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(d) => d,
            Err(_) => return ready(Err(ApiError::Auth("Invalid or expired token".into()))),
        };

        let role = match Role::from_id(data.claims.role) {
            Some(r) => r,
            None => return ready(Err(ApiError::Auth("Invalid role".into()))),
        };

        ready(Ok(AuthUser {
            user_id: data.claims.user_id,
            email: data.claims.sub,
            role,
        }))
    }
}

impl AuthUser {
    pub fn require_employee(&self) -> Result<(), ApiError> {
        if self.role == Role::Employee {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Employee only".into()))
        }
    }

    pub fn require_manager(&self) -> Result<(), ApiError> {
        if self.role == Role::Manager {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Manager only".into()))
        }
    }
}
