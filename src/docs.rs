use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

use crate::api::dashboard::{
    AbsentEntry, EmployeeDashboard, LateEntry, ManagerDashboard, RecentEntry, TodayStats,
};
use crate::engine::aggregate::{
    EmployeeBreakdown, MonthSummary, PeriodStats, RangeSummary, RosterEntry, StatusCounts,
    TodaySnapshot, TrendPoint,
};
use crate::model::attendance::{Attendance, AttendanceStatus, AttendanceWithUser};
use crate::model::role::Role;
use crate::model::user::{UserDto, UserSummary};
use crate::models::{AuthResponse, LoginReq, RegisterReq};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendly API",
        version = "1.0.0",
        description = r#"
## Employee Attendance Tracker

Employees check in and out and review their own history; managers see
org-wide aggregates, filter records, and export CSV reports.

### Key features
- **Check-in / Check-out** with late (after 09:00) and half-day (< 4 h) status rules
- **History & summaries** per employee, per month
- **Manager views**: filtered listings, range summaries, full today roster
- **Dashboards** for both roles, including a 30-day trend
- **CSV export** over any date range

### Security
All endpoints except register/login require **JWT Bearer authentication**.
Manager-only endpoints reject employee tokens with 403.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::me,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::my_history,
        crate::api::attendance::my_summary,
        crate::api::attendance::today,
        crate::api::attendance::all,
        crate::api::attendance::employee_attendance,
        crate::api::attendance::summary,
        crate::api::attendance::today_status,
        crate::api::attendance::export,

        crate::api::dashboard::employee_dashboard,
        crate::api::dashboard::manager_dashboard,
    ),
    components(
        schemas(
            Role,
            UserDto,
            UserSummary,
            RegisterReq,
            LoginReq,
            AuthResponse,
            Attendance,
            AttendanceWithUser,
            AttendanceStatus,
            MonthSummary,
            PeriodStats,
            StatusCounts,
            RangeSummary,
            EmployeeBreakdown,
            TodaySnapshot,
            RosterEntry,
            TrendPoint,
            RecentEntry,
            EmployeeDashboard,
            TodayStats,
            LateEntry,
            AbsentEntry,
            ManagerDashboard,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login, current user"),
        (name = "Attendance", description = "Check-in/out, history, summaries, export"),
        (name = "Dashboard", description = "Role-specific dashboards"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
