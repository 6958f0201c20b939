use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::error::ApiError;
use crate::model::attendance::{Attendance, AttendanceStatus};

/// Policy constants behind the status state machine. Defaults match the
/// long-standing behavior (late after 09:00, half-day under 4 hours) and
/// can be overridden through `LATE_CUTOFF` / `HALF_DAY_HOURS`.
#[derive(Debug, Clone, Copy)]
pub struct AttendancePolicy {
    pub late_cutoff: NaiveTime,
    pub half_day_hours: f64,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            late_cutoff: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            half_day_hours: 4.0,
        }
    }
}

impl AttendancePolicy {
    /// Status assigned at check-in. The comparison is minute-precision:
    /// 09:00:59 with a 09:00 cutoff still counts as on time.
    pub fn status_for_check_in(&self, at: NaiveTime) -> AttendanceStatus {
        let late = at.hour() > self.late_cutoff.hour()
            || (at.hour() == self.late_cutoff.hour() && at.minute() > self.late_cutoff.minute());
        if late {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        }
    }

    /// Status recomputed at check-out. This is a one-way ratchet: a short
    /// day demotes `present`/`late` to `half-day`, a full day preserves
    /// `late`, and nothing ever moves back to `present` from `half-day`.
    pub fn status_for_check_out(
        &self,
        prior: AttendanceStatus,
        total_hours: f64,
    ) -> AttendanceStatus {
        if total_hours > 0.0 && total_hours < self.half_day_hours {
            AttendanceStatus::HalfDay
        } else if total_hours >= self.half_day_hours {
            match prior {
                AttendanceStatus::Late => AttendanceStatus::Late,
                _ => AttendanceStatus::Present,
            }
        } else {
            prior
        }
    }
}

/// Gate for the check-out transition. The day's record must exist, carry a
/// check-in, and not be checked out already; the caller gets the record
/// back together with the check-in instant the hours run from.
pub fn check_out_gate(
    record: Option<Attendance>,
) -> Result<(Attendance, NaiveDateTime), ApiError> {
    let record = match record {
        Some(r) => r,
        None => return Err(ApiError::Conflict("Please check in first".into())),
    };
    let check_in = record
        .check_in_time
        .ok_or_else(|| ApiError::Conflict("Please check in first".into()))?;
    if record.check_out_time.is_some() {
        return Err(ApiError::Conflict("Already checked out today".into()));
    }
    Ok((record, check_in))
}

/// Hours between check-in and check-out, rounded to 2 decimals. Never
/// negative; a checkout that somehow predates the check-in yields 0.
pub fn worked_hours(check_in: NaiveDateTime, check_out: NaiveDateTime) -> f64 {
    let seconds = (check_out - check_in).num_seconds();
    if seconds <= 0 {
        return 0.0;
    }
    round2(seconds as f64 / 3600.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn dt(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 28)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn check_in_before_cutoff_is_present() {
        let policy = AttendancePolicy::default();
        assert_eq!(policy.status_for_check_in(at(8, 50, 0)), AttendanceStatus::Present);
        assert_eq!(policy.status_for_check_in(at(0, 0, 0)), AttendanceStatus::Present);
    }

    #[test]
    fn check_in_exactly_at_cutoff_is_present() {
        let policy = AttendancePolicy::default();
        assert_eq!(policy.status_for_check_in(at(9, 0, 0)), AttendanceStatus::Present);
        // seconds are ignored on purpose
        assert_eq!(policy.status_for_check_in(at(9, 0, 59)), AttendanceStatus::Present);
    }

    #[test]
    fn check_in_after_cutoff_is_late() {
        let policy = AttendancePolicy::default();
        assert_eq!(policy.status_for_check_in(at(9, 1, 0)), AttendanceStatus::Late);
        assert_eq!(policy.status_for_check_in(at(9, 15, 0)), AttendanceStatus::Late);
        assert_eq!(policy.status_for_check_in(at(10, 0, 0)), AttendanceStatus::Late);
        assert_eq!(policy.status_for_check_in(at(23, 59, 0)), AttendanceStatus::Late);
    }

    #[test]
    fn custom_cutoff_is_honored() {
        let policy = AttendancePolicy {
            late_cutoff: at(10, 30, 0),
            ..AttendancePolicy::default()
        };
        assert_eq!(policy.status_for_check_in(at(10, 30, 0)), AttendanceStatus::Present);
        assert_eq!(policy.status_for_check_in(at(10, 31, 0)), AttendanceStatus::Late);
    }

    #[test]
    fn worked_hours_rounds_to_two_decimals() {
        // 08:50 -> 17:00 is 8h10m = 8.1666... -> 8.17
        assert_eq!(worked_hours(dt(8, 50), dt(17, 0)), 8.17);
        // 09:15 -> 09:45 is 0.5
        assert_eq!(worked_hours(dt(9, 15), dt(9, 45)), 0.5);
        assert_eq!(worked_hours(dt(9, 0), dt(17, 0)), 8.0);
    }

    #[test]
    fn worked_hours_never_negative() {
        assert_eq!(worked_hours(dt(17, 0), dt(9, 0)), 0.0);
        assert_eq!(worked_hours(dt(9, 0), dt(9, 0)), 0.0);
    }

    #[test]
    fn short_day_ratchets_to_half_day() {
        let policy = AttendancePolicy::default();
        assert_eq!(
            policy.status_for_check_out(AttendanceStatus::Late, 0.5),
            AttendanceStatus::HalfDay
        );
        assert_eq!(
            policy.status_for_check_out(AttendanceStatus::Present, 3.99),
            AttendanceStatus::HalfDay
        );
    }

    #[test]
    fn full_day_preserves_late() {
        let policy = AttendancePolicy::default();
        assert_eq!(
            policy.status_for_check_out(AttendanceStatus::Late, 4.0),
            AttendanceStatus::Late
        );
        assert_eq!(
            policy.status_for_check_out(AttendanceStatus::Present, 8.17),
            AttendanceStatus::Present
        );
    }

    #[test]
    fn zero_hours_keeps_prior_status() {
        let policy = AttendancePolicy::default();
        assert_eq!(
            policy.status_for_check_out(AttendanceStatus::Late, 0.0),
            AttendanceStatus::Late
        );
    }

    fn record(
        check_in: Option<NaiveDateTime>,
        check_out: Option<NaiveDateTime>,
    ) -> Attendance {
        Attendance {
            id: 1,
            user_id: 42,
            date: NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
            check_in_time: check_in,
            check_out_time: check_out,
            status: AttendanceStatus::Present,
            total_hours: 0.0,
        }
    }

    #[test]
    fn check_out_requires_a_check_in() {
        let err = check_out_gate(None).unwrap_err();
        assert_eq!(err.to_string(), "Please check in first");

        // A row with no check-in yet reads the same as no row
        let err = check_out_gate(Some(record(None, None))).unwrap_err();
        assert_eq!(err.to_string(), "Please check in first");
    }

    #[test]
    fn repeated_check_out_is_rejected() {
        let err = check_out_gate(Some(record(Some(dt(9, 0)), Some(dt(17, 0))))).unwrap_err();
        assert_eq!(err.to_string(), "Already checked out today");
    }

    #[test]
    fn open_day_passes_the_gate_with_its_check_in() {
        let (rec, check_in) = check_out_gate(Some(record(Some(dt(8, 50)), None))).unwrap();
        assert_eq!(check_in, dt(8, 50));
        assert_eq!(rec.status, AttendanceStatus::Present);
    }

    #[test]
    fn worked_examples_from_the_field() {
        let policy = AttendancePolicy::default();

        // 09:15 check-in, 09:45 check-out: late, then half-day
        let status = policy.status_for_check_in(at(9, 15, 0));
        assert_eq!(status, AttendanceStatus::Late);
        let hours = worked_hours(dt(9, 15), dt(9, 45));
        assert_eq!(hours, 0.5);
        assert_eq!(policy.status_for_check_out(status, hours), AttendanceStatus::HalfDay);

        // 08:50 check-in, 17:00 check-out: present all the way
        let status = policy.status_for_check_in(at(8, 50, 0));
        assert_eq!(status, AttendanceStatus::Present);
        let hours = worked_hours(dt(8, 50), dt(17, 0));
        assert_eq!(hours, 8.17);
        assert_eq!(policy.status_for_check_out(status, hours), AttendanceStatus::Present);
    }
}
