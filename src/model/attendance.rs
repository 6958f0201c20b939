use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Stored as the kebab-case string in `attendance.status`; `absent` never
/// hits the table (a day with no row is absent), it only appears on read
/// paths that synthesize missing days.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type, Display,
    EnumString, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Late,
    HalfDay,
    Absent,
}

/// One employee's attendance for one calendar day.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 42)]
    pub user_id: u64,
    #[schema(example = "2026-08-29", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "2026-08-29T09:15:00", value_type = Option<String>)]
    pub check_in_time: Option<NaiveDateTime>,
    #[schema(example = "2026-08-29T17:30:00", value_type = Option<String>)]
    pub check_out_time: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    #[schema(example = 8.25)]
    pub total_hours: f64,
}

/// Attendance row joined with its owner. The user columns come from a LEFT
/// JOIN and stay `None` when the reference does not resolve; aggregation
/// buckets such rows under "Unknown" instead of dropping them.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceWithUser {
    pub id: u64,
    pub user_id: u64,
    #[schema(example = "2026-08-29", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(value_type = Option<String>)]
    pub check_in_time: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>)]
    pub check_out_time: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    pub total_hours: f64,
    pub name: Option<String>,
    pub email: Option<String>,
    #[schema(example = "EMP001")]
    pub employee_id: Option<String>,
    pub department: Option<String>,
}
