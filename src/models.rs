use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;
use crate::model::user::UserDto;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReq {
    #[schema(example = "Alice Johnson")]
    pub name: String,
    #[schema(example = "alice@company.com", format = "email")]
    pub email: String,
    #[schema(example = "employee123")]
    pub password: String,
    #[schema(example = "EMP001")]
    pub employee_id: String,
    #[schema(example = "Engineering")]
    pub department: String,
    /// Defaults to `employee` when omitted.
    pub role: Option<Role>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "alice@company.com", format = "email")]
    pub email: String,
    #[schema(example = "employee123")]
    pub password: String,
}

/// Registration and login both answer with the user plus a bearer token.
#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: UserDto,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// Email address.
    pub sub: String,
    /// Numeric role id, see `Role::from_id`.
    pub role: u8,
    pub exp: usize,
    pub jti: String,
}
