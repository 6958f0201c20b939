use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::engine::status::round2;
use crate::model::attendance::{Attendance, AttendanceStatus, AttendanceWithUser};
use crate::model::user::UserSummary;

/// Bucket used when an attendance row's user reference does not resolve.
/// Such rows are kept in every aggregate rather than silently dropped.
pub const UNKNOWN: &str = "Unknown";

/// Anything that carries a day's status and worked hours. Lets the same
/// accumulators run over plain rows and user-joined rows.
pub trait DayRecord {
    fn status(&self) -> AttendanceStatus;
    fn hours(&self) -> f64;
}

impl DayRecord for Attendance {
    fn status(&self) -> AttendanceStatus {
        self.status
    }
    fn hours(&self) -> f64 {
        self.total_hours
    }
}

impl DayRecord for AttendanceWithUser {
    fn status(&self) -> AttendanceStatus {
        self.status
    }
    fn hours(&self) -> f64 {
        self.total_hours
    }
}

/// Per-status counters, accumulated in a single pass.
#[derive(Debug, Default, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub present: u32,
    pub late: u32,
    pub absent: u32,
    pub half_day: u32,
}

impl StatusCounts {
    pub fn record(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::HalfDay => self.half_day += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.present + self.late + self.absent + self.half_day
    }
}

/// Status counts plus summed hours over an arbitrary set of records.
/// Dashboards serve this directly as their period stats.
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub present: u32,
    pub late: u32,
    pub absent: u32,
    pub half_day: u32,
    pub total_hours: f64,
}

pub fn period_stats<R: DayRecord>(rows: &[R]) -> PeriodStats {
    let mut counts = StatusCounts::default();
    let mut hours = 0.0;
    for row in rows {
        counts.record(row.status());
        hours += row.hours();
    }
    PeriodStats {
        present: counts.present,
        late: counts.late,
        absent: counts.absent,
        half_day: counts.half_day,
        total_hours: round2(hours),
    }
}

/// The per-employee month summary. An empty month yields all zeros.
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    #[schema(example = 22)]
    pub total_days: u32,
    pub present: u32,
    pub late: u32,
    pub absent: u32,
    pub half_day: u32,
    pub total_hours: f64,
}

pub fn month_summary<R: DayRecord>(rows: &[R]) -> MonthSummary {
    let stats = period_stats(rows);
    MonthSummary {
        total_days: rows.len() as u32,
        present: stats.present,
        late: stats.late,
        absent: stats.absent,
        half_day: stats.half_day,
        total_hours: stats.total_hours,
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeBreakdown {
    pub name: String,
    pub present: u32,
    pub late: u32,
    pub absent: u32,
    pub half_day: u32,
    pub total_hours: f64,
}

/// Manager-facing range summary: totals plus nested department and
/// employee breakdowns. BTreeMaps keep the key order deterministic.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RangeSummary {
    pub total_records: u32,
    pub present: u32,
    pub late: u32,
    pub absent: u32,
    pub half_day: u32,
    pub total_hours: f64,
    #[schema(value_type = Object)]
    pub by_department: BTreeMap<String, StatusCounts>,
    #[schema(value_type = Object)]
    pub by_employee: BTreeMap<String, EmployeeBreakdown>,
}

/// Per-department status counts; the manager dashboard serves this on its
/// own and the range summary nests it.
pub fn department_counts(rows: &[AttendanceWithUser]) -> BTreeMap<String, StatusCounts> {
    let mut by_department: BTreeMap<String, StatusCounts> = BTreeMap::new();
    for row in rows {
        let dept = row.department.as_deref().unwrap_or(UNKNOWN);
        by_department
            .entry(dept.to_owned())
            .or_default()
            .record(row.status);
    }
    by_department
}

pub fn range_summary(rows: &[AttendanceWithUser]) -> RangeSummary {
    let stats = period_stats(rows);
    let by_department = department_counts(rows);

    let mut by_employee: BTreeMap<String, EmployeeBreakdown> = BTreeMap::new();

    for row in rows {
        let emp_id = row.employee_id.as_deref().unwrap_or(UNKNOWN);
        let entry = by_employee
            .entry(emp_id.to_owned())
            .or_insert_with(|| EmployeeBreakdown {
                name: row.name.clone().unwrap_or_else(|| UNKNOWN.to_owned()),
                present: 0,
                late: 0,
                absent: 0,
                half_day: 0,
                total_hours: 0.0,
            });
        match row.status {
            AttendanceStatus::Present => entry.present += 1,
            AttendanceStatus::Late => entry.late += 1,
            AttendanceStatus::Absent => entry.absent += 1,
            AttendanceStatus::HalfDay => entry.half_day += 1,
        }
        entry.total_hours = round2(entry.total_hours + row.total_hours);
    }

    RangeSummary {
        total_records: rows.len() as u32,
        present: stats.present,
        late: stats.late,
        absent: stats.absent,
        half_day: stats.half_day,
        total_hours: stats.total_hours,
        by_department,
        by_employee,
    }
}

/// One point of the 30-day trend. `present` counts present-or-late days,
/// mirroring how the dashboard chart has always read.
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub present: u32,
    pub late: u32,
    pub absent: u32,
}

pub fn daily_trend(rows: &[Attendance]) -> BTreeMap<String, TrendPoint> {
    let mut trend: BTreeMap<String, TrendPoint> = BTreeMap::new();
    for row in rows {
        let point = trend
            .entry(row.date.format("%Y-%m-%d").to_string())
            .or_default();
        match row.status {
            AttendanceStatus::Present | AttendanceStatus::Late => {
                point.present += 1;
                if row.status == AttendanceStatus::Late {
                    point.late += 1;
                }
            }
            AttendanceStatus::Absent => point.absent += 1,
            AttendanceStatus::HalfDay => {}
        }
    }
    trend
}

/// The per-user "today" view. A missing row reads as a synthesized
/// absence, so callers never have to special-case absent days.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodaySnapshot {
    pub checked_in: bool,
    pub checked_out: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub check_in_time: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub check_out_time: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    pub total_hours: f64,
}

pub fn today_snapshot(row: Option<&Attendance>) -> TodaySnapshot {
    match row {
        Some(att) => TodaySnapshot {
            checked_in: att.check_in_time.is_some(),
            checked_out: att.check_out_time.is_some(),
            check_in_time: att.check_in_time,
            check_out_time: att.check_out_time,
            status: att.status,
            total_hours: att.total_hours,
        },
        None => TodaySnapshot {
            checked_in: false,
            checked_out: false,
            check_in_time: None,
            check_out_time: None,
            status: AttendanceStatus::Absent,
            total_hours: 0.0,
        },
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub user: UserSummary,
    pub checked_in: bool,
    pub checked_out: bool,
    pub status: AttendanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub check_in_time: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub check_out_time: Option<NaiveDateTime>,
    pub total_hours: f64,
}

/// Full-roster today view: exactly one entry per employee-role user,
/// whether or not a record exists for the day.
pub fn today_roster(users: Vec<UserSummary>, rows: &[AttendanceWithUser]) -> Vec<RosterEntry> {
    let by_user: HashMap<u64, &AttendanceWithUser> =
        rows.iter().map(|row| (row.user_id, row)).collect();

    users
        .into_iter()
        .map(|user| match by_user.get(&user.id) {
            Some(att) => RosterEntry {
                checked_in: att.check_in_time.is_some(),
                checked_out: att.check_out_time.is_some(),
                status: att.status,
                check_in_time: att.check_in_time,
                check_out_time: att.check_out_time,
                total_hours: att.total_hours,
                user,
            },
            None => RosterEntry {
                checked_in: false,
                checked_out: false,
                status: AttendanceStatus::Absent,
                check_in_time: None,
                check_out_time: None,
                total_hours: 0.0,
                user,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    fn row(
        id: u64,
        user_id: u64,
        d: u32,
        status: AttendanceStatus,
        hours: f64,
        user: Option<(&str, &str, &str, &str)>,
    ) -> AttendanceWithUser {
        AttendanceWithUser {
            id,
            user_id,
            date: day(d),
            check_in_time: day(d).and_hms_opt(9, 0, 0),
            check_out_time: None,
            status,
            total_hours: hours,
            name: user.map(|u| u.0.to_owned()),
            email: user.map(|u| u.1.to_owned()),
            employee_id: user.map(|u| u.2.to_owned()),
            department: user.map(|u| u.3.to_owned()),
        }
    }

    fn alice() -> Option<(&'static str, &'static str, &'static str, &'static str)> {
        Some(("Alice Johnson", "alice@company.com", "EMP001", "Engineering"))
    }

    fn carol() -> Option<(&'static str, &'static str, &'static str, &'static str)> {
        Some(("Carol Williams", "carol@company.com", "EMP003", "Sales"))
    }

    #[test]
    fn empty_month_summary_is_all_zero() {
        let summary = month_summary::<Attendance>(&[]);
        assert_eq!(summary.total_days, 0);
        assert_eq!(summary.present, 0);
        assert_eq!(summary.total_hours, 0.0);
    }

    #[test]
    fn range_summary_counts_add_up() {
        let rows = vec![
            row(1, 1, 1, AttendanceStatus::Present, 8.0, alice()),
            row(2, 1, 2, AttendanceStatus::Late, 7.5, alice()),
            row(3, 3, 1, AttendanceStatus::HalfDay, 2.0, carol()),
            row(4, 3, 2, AttendanceStatus::Present, 8.25, carol()),
            row(5, 9, 3, AttendanceStatus::Late, 6.0, None),
        ];
        let summary = range_summary(&rows);

        assert_eq!(summary.total_records, 5);
        assert_eq!(
            summary.present + summary.late + summary.absent + summary.half_day,
            summary.total_records
        );
        assert_eq!(summary.total_hours, 31.75);

        let dept_total: u32 = summary.by_department.values().map(StatusCounts::total).sum();
        assert_eq!(dept_total, summary.total_records);
    }

    #[test]
    fn unresolved_user_buckets_under_unknown() {
        let rows = vec![
            row(1, 1, 1, AttendanceStatus::Present, 8.0, alice()),
            row(2, 9, 1, AttendanceStatus::Late, 6.0, None),
        ];
        let summary = range_summary(&rows);

        let unknown_dept = summary.by_department.get(UNKNOWN).expect("Unknown dept");
        assert_eq!(unknown_dept.late, 1);

        let unknown_emp = summary.by_employee.get(UNKNOWN).expect("Unknown employee");
        assert_eq!(unknown_emp.name, UNKNOWN);
        assert_eq!(unknown_emp.late, 1);
        assert_eq!(unknown_emp.total_hours, 6.0);
    }

    #[test]
    fn by_employee_accumulates_hours() {
        let rows = vec![
            row(1, 1, 1, AttendanceStatus::Present, 8.0, alice()),
            row(2, 1, 2, AttendanceStatus::Late, 7.17, alice()),
        ];
        let summary = range_summary(&rows);
        let emp = summary.by_employee.get("EMP001").unwrap();
        assert_eq!(emp.name, "Alice Johnson");
        assert_eq!(emp.present, 1);
        assert_eq!(emp.late, 1);
        assert_eq!(emp.total_hours, 15.17);
    }

    #[test]
    fn roster_has_exactly_one_entry_per_employee() {
        let users = vec![
            UserSummary {
                id: 1,
                name: "Alice Johnson".into(),
                email: "alice@company.com".into(),
                employee_id: "EMP001".into(),
                department: "Engineering".into(),
            },
            UserSummary {
                id: 2,
                name: "Bob Smith".into(),
                email: "bob@company.com".into(),
                employee_id: "EMP002".into(),
                department: "Engineering".into(),
            },
        ];
        let rows = vec![row(1, 1, 29, AttendanceStatus::Late, 0.0, alice())];

        let roster = today_roster(users, &rows);
        assert_eq!(roster.len(), 2);

        let with_record = &roster[0];
        assert!(with_record.checked_in);
        assert_eq!(with_record.status, AttendanceStatus::Late);

        let absent = &roster[1];
        assert!(!absent.checked_in);
        assert!(!absent.checked_out);
        assert_eq!(absent.status, AttendanceStatus::Absent);
        assert_eq!(absent.total_hours, 0.0);
    }

    #[test]
    fn trend_groups_by_date() {
        let rows = vec![
            Attendance {
                id: 1,
                user_id: 1,
                date: day(1),
                check_in_time: None,
                check_out_time: None,
                status: AttendanceStatus::Present,
                total_hours: 8.0,
            },
            Attendance {
                id: 2,
                user_id: 2,
                date: day(1),
                check_in_time: None,
                check_out_time: None,
                status: AttendanceStatus::Late,
                total_hours: 7.0,
            },
            Attendance {
                id: 3,
                user_id: 1,
                date: day(2),
                check_in_time: None,
                check_out_time: None,
                status: AttendanceStatus::HalfDay,
                total_hours: 2.0,
            },
        ];
        let trend = daily_trend(&rows);

        let first = trend.get("2026-08-01").unwrap();
        assert_eq!(first.present, 2);
        assert_eq!(first.late, 1);
        assert_eq!(first.absent, 0);

        // half-day contributes a key but no present/late/absent increments
        let second = trend.get("2026-08-02").unwrap();
        assert_eq!(second.present, 0);
    }

    #[test]
    fn snapshot_of_missing_day_reads_absent() {
        let snap = today_snapshot(None);
        assert!(!snap.checked_in);
        assert!(!snap.checked_out);
        assert_eq!(snap.status, AttendanceStatus::Absent);
        assert_eq!(snap.total_hours, 0.0);
        assert!(snap.check_in_time.is_none());
    }
}
