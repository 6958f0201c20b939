use std::str::FromStr;

use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use tracing::{debug, info};
use utoipa::IntoParams;

use crate::{
    auth::auth::AuthUser,
    config::Config,
    engine::{
        aggregate::{month_summary, range_summary, today_roster, today_snapshot},
        csv,
        status::{check_out_gate, worked_hours},
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

async fn fetch_day(
    pool: &MySqlPool,
    user_id: u64,
    date: NaiveDate,
) -> Result<Option<Attendance>, ApiError> {
    sqlx::query_as::<_, Attendance>(&format!("{SELECT_RECORD} WHERE user_id = ? AND date = ?"))
        .bind(user_id)
        .bind(date)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::store)
}

/// Joined rows for an inclusive date range, newest first. No range means
/// every record (the export and summary endpoints accept that).
async fn fetch_range(
    pool: &MySqlPool,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<AttendanceWithUser>, ApiError> {
    let rows = match range {
        Some((from, to)) => {
            let sql = format!(
                "{SELECT_JOINED} WHERE a.date >= ? AND a.date <= ? \
                 ORDER BY a.date DESC, a.id DESC"
            );
            sqlx::query_as::<_, AttendanceWithUser>(&sql)
                .bind(from)
                .bind(to)
                .fetch_all(pool)
                .await
        }
        None => {
            let sql = format!("{SELECT_JOINED} ORDER BY a.date DESC, a.id DESC");
            sqlx::query_as::<_, AttendanceWithUser>(&sql).fetch_all(pool).await
        }
    };
    rows.map_err(ApiError::store)
}

/// Check in for today
#[utoipa::path(
    post,
    path = "/api/attendance/checkin",
    responses(
        (status = 201, description = "Checked in", body = Attendance),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    auth.require_employee()?;

    let now = dates::now_local();
    let today = now.date();
    let status = config.policy().status_for_check_in(now.time());

    // Atomic create: the unique (user_id, date) key arbitrates concurrent
    // check-ins instead of a read-then-write sequence.
    let result = sqlx::query(
        "INSERT INTO attendance (user_id, date, check_in_time, status) VALUES (?, ?, ?, ?)",
    )
    .bind(auth.user_id)
    .bind(today)
    .bind(now)
    .bind(status)
    .execute(pool.get_ref())
    .await;

    if let Err(e) = result {
        let duplicate = matches!(
            &e,
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23000")
        );
        if !duplicate {
            return Err(ApiError::store(e));
        }

        // A row already exists for today. Claim it only if it has no
        // check-in yet; otherwise this is a repeat check-in.
        let updated = sqlx::query(
            "UPDATE attendance SET check_in_time = ?, status = ? \
             WHERE user_id = ? AND date = ? AND check_in_time IS NULL",
        )
        .bind(now)
        .bind(status)
        .bind(auth.user_id)
        .bind(today)
        .execute(pool.get_ref())
        .await
        .map_err(ApiError::store)?;

        if updated.rows_affected() == 0 {
            return Err(ApiError::Conflict("Already checked in today".into()));
        }
    }

    info!(user_id = auth.user_id, %status, "checked in");

    let record = fetch_day(pool.get_ref(), auth.user_id, today)
        .await?
        .ok_or(ApiError::Store)?;
    Ok(HttpResponse::Created().json(record))
}

/// Check out for today
#[utoipa::path(
    post,
    path = "/api/attendance/checkout",
    responses(
        (status = 200, description = "Checked out", body = Attendance),
        (status = 400, description = "No check-in yet, or already checked out", body = Object, example = json!({
            "message": "Please check in first"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    auth.require_employee()?;

    let now = dates::now_local();
    let today = now.date();

    let (record, check_in) =
        check_out_gate(fetch_day(pool.get_ref(), auth.user_id, today).await?)?;

    let total_hours = worked_hours(check_in, now);
    let status = config.policy().status_for_check_out(record.status, total_hours);

    // Guarded write: only the first checkout of the day lands.
    let updated = sqlx::query(
        "UPDATE attendance SET check_out_time = ?, total_hours = ?, status = ? \
         WHERE id = ? AND check_out_time IS NULL",
    )
    .bind(now)
    .bind(total_hours)
    .bind(status)
    .bind(record.id)
    .execute(pool.get_ref())
    .await
    .map_err(ApiError::store)?;

    if updated.rows_affected() == 0 {
        return Err(ApiError::Conflict("Already checked out today".into()));
    }

    info!(user_id = auth.user_id, total_hours, %status, "checked out");

    let record = fetch_day(pool.get_ref(), auth.user_id, today)
        .await?
        .ok_or(ApiError::Store)?;
    Ok(HttpResponse::Ok().json(record))
}

#[derive(Deserialize, IntoParams)]
pub struct MonthQuery {
    /// `YYYY-MM`; defaults to the current month.
    pub month: Option<String>,
}

/// My attendance for one month, newest first
#[utoipa::path(
    get,
    path = "/api/attendance/my-history",
    params(MonthQuery),
    responses((status = 200, body = Vec<Attendance>)),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn my_history(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_employee()?;

    let (from, to) = dates::parse_month(query.month.as_deref())?;
    let rows = sqlx::query_as::<_, Attendance>(&format!(
        "{SELECT_RECORD} WHERE user_id = ? AND date >= ? AND date <= ? ORDER BY date DESC"
    ))
    .bind(auth.user_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::store)?;

    Ok(HttpResponse::Ok().json(rows))
}

/// My per-status counts and summed hours for one month
#[utoipa::path(
    get,
    path = "/api/attendance/my-summary",
    params(MonthQuery),
    responses((status = 200, body = crate::engine::aggregate::MonthSummary)),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn my_summary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_employee()?;

    let (from, to) = dates::parse_month(query.month.as_deref())?;
    let rows = sqlx::query_as::<_, Attendance>(&format!(
        "{SELECT_RECORD} WHERE user_id = ? AND date >= ? AND date <= ?"
    ))
    .bind(auth.user_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::store)?;

    Ok(HttpResponse::Ok().json(month_summary(&rows)))
}

/// My today snapshot; a day with no record reads as absent
#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses((status = 200, body = crate::engine::aggregate::TodaySnapshot)),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn today(auth: AuthUser, pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    auth.require_employee()?;

    let record = fetch_day(pool.get_ref(), auth.user_id, dates::today_local()).await?;
    Ok(HttpResponse::Ok().json(today_snapshot(record.as_ref())))
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceFilter {
    /// Human-facing employee code, exact match.
    pub employee_id: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// `present` | `late` | `half-day` | `absent`
    pub status: Option<String>,
    pub department: Option<String>,
}

/// Filtered listing across all employees, capped at 100 rows
#[utoipa::path(
    get,
    path = "/api/attendance/all",
    params(AttendanceFilter),
    responses((status = 200, body = Vec<AttendanceWithUser>)),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn all(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    filter: web::Query<AttendanceFilter>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager()?;

    // An employeeId filter resolves through users first; an unmatched code
    // is an empty result, not an error.
    let mut user_id: Option<u64> = None;
    if let Some(code) = filter.employee_id.as_deref() {
        let resolved =
            sqlx::query_scalar::<_, u64>("SELECT id FROM users WHERE employee_id = ?")
                .bind(code)
                .fetch_optional(pool.get_ref())
                .await
                .map_err(ApiError::store)?;
        match resolved {
            Some(id) => user_id = Some(id),
            None => return Ok(HttpResponse::Ok().json(Vec::<AttendanceWithUser>::new())),
        }
    }

    let date = filter.date.as_deref().map(dates::parse_date).transpose()?;
    let status = filter
        .status
        .as_deref()
        .map(|raw| {
            AttendanceStatus::from_str(raw)
                .map_err(|_| ApiError::Validation(format!("Invalid status: {raw}")))
        })
        .transpose()?;

    let mut conditions: Vec<&str> = Vec::new();
    if user_id.is_some() {
        conditions.push("a.user_id = ?");
    }
    if date.is_some() {
        conditions.push("a.date = ?");
    }
    if status.is_some() {
        conditions.push("a.status = ?");
    }
    if filter.department.is_some() {
        conditions.push("u.department = ?");
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // Hard cap of 100 rows: a resource bound, not pagination.
    let sql = format!(
        "{SELECT_JOINED} {where_clause} ORDER BY a.date DESC, a.id DESC LIMIT 100"
    );
    debug!(sql = %sql, "listing attendance");

    let mut query = sqlx::query_as::<_, AttendanceWithUser>(&sql);
    if let Some(id) = user_id {
        query = query.bind(id);
    }
    if let Some(d) = date {
        query = query.bind(d);
    }
    if let Some(s) = status {
        query = query.bind(s);
    }
    if let Some(dept) = filter.department.as_deref() {
        query = query.bind(dept);
    }

    let rows = query.fetch_all(pool.get_ref()).await.map_err(ApiError::store)?;
    Ok(HttpResponse::Ok().json(rows))
}

/// One employee's month, by user id
#[utoipa::path(
    get,
    path = "/api/attendance/employee/{id}",
    params(
        ("id", Path, description = "User id"),
        MonthQuery
    ),
    responses((status = 200, body = Vec<AttendanceWithUser>)),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn employee_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager()?;

    let user_id = path.into_inner();
    let (from, to) = dates::parse_month(query.month.as_deref())?;

    let rows = sqlx::query_as::<_, AttendanceWithUser>(&format!(
        "{SELECT_JOINED} WHERE a.user_id = ? AND a.date >= ? AND a.date <= ? \
         ORDER BY a.date DESC"
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::store)?;

    Ok(HttpResponse::Ok().json(rows))
}

#[derive(Deserialize, IntoParams)]
pub struct RangeQuery {
    /// `YYYY-MM-DD`, inclusive.
    pub from: Option<String>,
    /// `YYYY-MM-DD`, inclusive.
    pub to: Option<String>,
}

impl RangeQuery {
    fn bounds(&self) -> Result<Option<(NaiveDate, NaiveDate)>, ApiError> {
        match (self.from.as_deref(), self.to.as_deref()) {
            (Some(from), Some(to)) => {
                Ok(Some((dates::parse_date(from)?, dates::parse_date(to)?)))
            }
            // With either bound missing, every record is in range.
            _ => Ok(None),
        }
    }
}

/// Range summary with department and employee breakdowns
#[utoipa::path(
    get,
    path = "/api/attendance/summary",
    params(RangeQuery),
    responses((status = 200, body = crate::engine::aggregate::RangeSummary)),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn summary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager()?;

    let rows = fetch_range(pool.get_ref(), query.bounds()?).await?;
    Ok(HttpResponse::Ok().json(range_summary(&rows)))
}

/// Today's status for every employee, present or not
#[utoipa::path(
    get,
    path = "/api/attendance/today-status",
    responses((status = 200, body = Vec<crate::engine::aggregate::RosterEntry>)),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn today_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager()?;

    let today = dates::today_local();
    let rows = fetch_range(pool.get_ref(), Some((today, today))).await?;

    let users = sqlx::query_as::<_, UserSummary>(
        "SELECT id, name, email, employee_id, department FROM users WHERE role_id = ?",
    )
    .bind(Role::Employee.as_id())
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::store)?;

    Ok(HttpResponse::Ok().json(today_roster(users, &rows)))
}

/// CSV export of a date range
#[utoipa::path(
    get,
    path = "/api/attendance/export",
    params(RangeQuery),
    responses(
        (status = 200, description = "CSV file download", content_type = "text/csv"),
        (status = 500, description = "Failures degrade to a JSON error body, never a truncated file")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn export(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager()?;

    let rows = fetch_range(pool.get_ref(), query.bounds()?).await?;
    let body = csv::render(&rows);

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            "Content-Disposition",
            format!(
                "attachment; filename=attendance-{}.csv",
                Utc::now().timestamp_millis()
            ),
        ))
        .body(body))
}
