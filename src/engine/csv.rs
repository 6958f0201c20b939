use crate::model::attendance::AttendanceWithUser;

/// Column order is part of the export contract; downstream spreadsheets
/// key off this exact header line.
pub const HEADER: &str = "Date,Employee ID,Name,Email,Department,Check In,Check Out,Status,Total Hours";

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Serializes the rows as CSV, one line per record. Missing optional
/// fields render as empty strings, never as a "null" placeholder.
pub fn render(rows: &[AttendanceWithUser]) -> String {
    let mut out = String::with_capacity(64 * (rows.len() + 1));
    out.push_str(HEADER);
    out.push('\n');

    for row in rows {
        let check_in = row
            .check_in_time
            .map(|t| t.format(DATETIME_FMT).to_string())
            .unwrap_or_default();
        let check_out = row
            .check_out_time
            .map(|t| t.format(DATETIME_FMT).to_string())
            .unwrap_or_default();

        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            row.date.format("%Y-%m-%d"),
            row.employee_id.as_deref().unwrap_or(""),
            row.name.as_deref().unwrap_or(""),
            row.email.as_deref().unwrap_or(""),
            row.department.as_deref().unwrap_or(""),
            check_in,
            check_out,
            row.status,
            row.total_hours,
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;
    use chrono::NaiveDate;

    fn sample(with_user: bool, with_checkout: bool) -> AttendanceWithUser {
        let date = NaiveDate::from_ymd_opt(2026, 8, 28).unwrap();
        AttendanceWithUser {
            id: 1,
            user_id: 1,
            date,
            check_in_time: date.and_hms_opt(8, 50, 0),
            check_out_time: if with_checkout {
                date.and_hms_opt(17, 0, 0)
            } else {
                None
            },
            status: AttendanceStatus::Present,
            total_hours: if with_checkout { 8.17 } else { 0.0 },
            name: with_user.then(|| "Alice Johnson".to_owned()),
            email: with_user.then(|| "alice@company.com".to_owned()),
            employee_id: with_user.then(|| "EMP001".to_owned()),
            department: with_user.then(|| "Engineering".to_owned()),
        }
    }

    #[test]
    fn header_is_exact() {
        let csv = render(&[]);
        assert_eq!(
            csv,
            "Date,Employee ID,Name,Email,Department,Check In,Check Out,Status,Total Hours\n"
        );
    }

    #[test]
    fn full_row_renders_all_columns() {
        let csv = render(&[sample(true, true)]);
        let line = csv.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "2026-08-28,EMP001,Alice Johnson,alice@company.com,Engineering,\
             2026-08-28 08:50:00,2026-08-28 17:00:00,present,8.17"
        );
    }

    #[test]
    fn missing_fields_render_empty_not_null() {
        let csv = render(&[sample(false, false)]);
        let line = csv.lines().nth(1).unwrap();
        assert_eq!(line, "2026-08-28,,,,,2026-08-28 08:50:00,,present,0");
        assert!(!line.contains("null"));
    }
}
