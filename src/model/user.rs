use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

/// Full row, password hash included. Only the auth handlers ever load this.
#[derive(Debug, sqlx::FromRow)]
pub struct UserSql {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role_id: u8,
    pub employee_id: String,
    pub department: String,
}

/// What the API returns for a user. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Alice Johnson")]
    pub name: String,
    #[schema(example = "alice@company.com")]
    pub email: String,
    pub role: Role,
    #[schema(example = "EMP001")]
    pub employee_id: String,
    #[schema(example = "Engineering")]
    pub department: String,
}

impl UserDto {
    pub fn from_row(row: UserSql) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            role: Role::from_id(row.role_id).unwrap_or(Role::Employee),
            employee_id: row.employee_id,
            department: row.department,
        }
    }
}

/// Slim projection used by the roster and the absent-today scan.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[schema(example = "EMP001")]
    pub employee_id: String,
    pub department: String,
}
