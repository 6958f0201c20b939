use serde::{Deserialize, Serialize};

/// Stored as a numeric id in `users.role_id`; every JSON surface uses the
/// lowercase string form instead.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee = 1,
    Manager = 2,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Employee),
            2 => Some(Role::Manager),
            _ => None,
        }
    }

    pub fn as_id(self) -> u8 {
        self as u8
    }
}
