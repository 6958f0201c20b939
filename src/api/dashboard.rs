use std::collections::{BTreeMap, HashSet};

use actix_web::{HttpResponse, web};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::{
    auth::auth::AuthUser,
    engine::aggregate::{
        PeriodStats, StatusCounts, TodaySnapshot, TrendPoint, daily_trend, department_counts,
        period_stats, today_snapshot,
    },
    error::ApiError,
    model::{
        attendance::{Attendance, AttendanceStatus, AttendanceWithUser},
        role::Role,
        user::UserSummary,
    },
    utils::dates,
};

const SELECT_RECORD: &str = "SELECT id, user_id, date, check_in_time, check_out_time, status, \
     total_hours FROM attendance";

const SELECT_JOINED: &str = "SELECT a.id, a.user_id, a.date, a.check_in_time, a.check_out_time, \
     a.status, a.total_hours, u.name, u.email, u.employee_id, u.department \
     FROM attendance a LEFT JOIN users u ON u.id = a.user_id";

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentEntry {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[schema(value_type = Option<String>)]
    pub check_in_time: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>)]
    pub check_out_time: Option<NaiveDateTime>,
    pub total_hours: f64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDashboard {
    pub today: TodaySnapshot,
    pub month_stats: PeriodStats,
    pub last30_days_stats: PeriodStats,
    pub recent_attendance: Vec<RecentEntry>,
}

async fn fetch_user_range(
    pool: &MySqlPool,
    user_id: u64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<Attendance>, ApiError> {
    sqlx::query_as::<_, Attendance>(&format!(
        "{SELECT_RECORD} WHERE user_id = ? AND date >= ? AND date <= ?"
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
    .map_err(ApiError::store)
}

/// Employee dashboard: today, month stats, 30-day stats, recent days
#[utoipa::path(
    get,
    path = "/api/dashboard/employee",
    responses((status = 200, body = EmployeeDashboard)),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn employee_dashboard(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_employee()?;

    let today = dates::today_local();
    let (month_from, month_to) = dates::month_bounds(today.year(), today.month())
        .ok_or(ApiError::Store)?;
    let last30_from = today - Duration::days(30);

    let today_record = sqlx::query_as::<_, Attendance>(&format!(
        "{SELECT_RECORD} WHERE user_id = ? AND date = ?"
    ))
    .bind(auth.user_id)
    .bind(today)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(ApiError::store)?;

    let month_rows = fetch_user_range(pool.get_ref(), auth.user_id, month_from, month_to).await?;
    let last30_rows = fetch_user_range(pool.get_ref(), auth.user_id, last30_from, today).await?;

    let recent = sqlx::query_as::<_, Attendance>(&format!(
        "{SELECT_RECORD} WHERE user_id = ? AND date >= ? AND date <= ? \
         ORDER BY date DESC LIMIT 7"
    ))
    .bind(auth.user_id)
    .bind(today - Duration::days(7))
    .bind(today)
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::store)?;

    Ok(HttpResponse::Ok().json(EmployeeDashboard {
        today: today_snapshot(today_record.as_ref()),
        month_stats: period_stats(&month_rows),
        last30_days_stats: period_stats(&last30_rows),
        recent_attendance: recent
            .into_iter()
            .map(|r| RecentEntry {
                date: r.date,
                status: r.status,
                check_in_time: r.check_in_time,
                check_out_time: r.check_out_time,
                total_hours: r.total_hours,
            })
            .collect(),
    }))
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    /// Present-or-late count.
    pub present: u32,
    /// Employees with no record at all today. Counted directly from the
    /// roster rather than derived by subtracting the present-or-late
    /// count, so a half-day never reads as an absence.
    pub absent: u32,
    pub late: u32,
    pub checked_in: u32,
    pub checked_out: u32,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LateEntry {
    pub name: Option<String>,
    pub employee_id: Option<String>,
    pub department: Option<String>,
    #[schema(value_type = Option<String>)]
    pub check_in_time: Option<NaiveDateTime>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AbsentEntry {
    pub name: String,
    pub employee_id: String,
    pub department: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerDashboard {
    pub total_employees: i64,
    pub today_stats: TodayStats,
    pub month_stats: PeriodStats,
    #[schema(value_type = Object)]
    pub trend_data: BTreeMap<String, TrendPoint>,
    pub late_today: Vec<LateEntry>,
    pub absent_today: Vec<AbsentEntry>,
    #[schema(value_type = Object)]
    pub department_stats: BTreeMap<String, StatusCounts>,
}

/// Manager dashboard: org-wide today stats, month stats, 30-day trend,
/// late/absent rosters, department-wise month stats
#[utoipa::path(
    get,
    path = "/api/dashboard/manager",
    responses((status = 200, body = ManagerDashboard)),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn manager_dashboard(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager()?;

    let today = dates::today_local();
    let (month_from, month_to) = dates::month_bounds(today.year(), today.month())
        .ok_or(ApiError::Store)?;
    let last30_from = today - Duration::days(30);

    let total_employees =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role_id = ?")
            .bind(Role::Employee.as_id())
            .fetch_one(pool.get_ref())
            .await
            .map_err(ApiError::store)?;

    let today_rows = sqlx::query_as::<_, AttendanceWithUser>(&format!(
        "{SELECT_JOINED} WHERE a.date = ?"
    ))
    .bind(today)
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::store)?;

    let month_rows = sqlx::query_as::<_, AttendanceWithUser>(&format!(
        "{SELECT_JOINED} WHERE a.date >= ? AND a.date <= ?"
    ))
    .bind(month_from)
    .bind(month_to)
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::store)?;

    let last30_rows = sqlx::query_as::<_, Attendance>(&format!(
        "{SELECT_RECORD} WHERE date >= ? AND date <= ?"
    ))
    .bind(last30_from)
    .bind(today)
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::store)?;

    let employees = sqlx::query_as::<_, UserSummary>(
        "SELECT id, name, email, employee_id, department FROM users WHERE role_id = ?",
    )
    .bind(Role::Employee.as_id())
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::store)?;

    let recorded_today: HashSet<u64> = today_rows.iter().map(|r| r.user_id).collect();

    let present_or_late = today_rows
        .iter()
        .filter(|r| matches!(r.status, AttendanceStatus::Present | AttendanceStatus::Late))
        .count() as u32;

    let today_stats = TodayStats {
        present: present_or_late,
        absent: (total_employees - recorded_today.len() as i64).max(0) as u32,
        late: today_rows
            .iter()
            .filter(|r| r.status == AttendanceStatus::Late)
            .count() as u32,
        checked_in: today_rows.iter().filter(|r| r.check_in_time.is_some()).count() as u32,
        checked_out: today_rows.iter().filter(|r| r.check_out_time.is_some()).count() as u32,
    };

    let late_today = today_rows
        .iter()
        .filter(|r| r.status == AttendanceStatus::Late)
        .map(|r| LateEntry {
            name: r.name.clone(),
            employee_id: r.employee_id.clone(),
            department: r.department.clone(),
            check_in_time: r.check_in_time,
        })
        .collect();

    let absent_today = employees
        .into_iter()
        .filter(|emp| !recorded_today.contains(&emp.id))
        .map(|emp| AbsentEntry {
            name: emp.name,
            employee_id: emp.employee_id,
            department: emp.department,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ManagerDashboard {
        total_employees,
        today_stats,
        month_stats: period_stats(&month_rows),
        trend_data: daily_trend(&last30_rows),
        late_today,
        absent_today,
        department_stats: department_counts(&month_rows),
    }))
}
