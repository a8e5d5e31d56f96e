use chrono::{DateTime, Timelike, Utc};

use crate::models::{clamp_pct, Context, GradeTrend, MealSlot, MealStatus, Snapshot};
use crate::windows::{self, DeadlineTier};

/// Attendance below this percentage counts against the subject.
pub const LOW_ATTENDANCE_THRESHOLD: f64 = 80.0;

/// Stress above this level triggers high-priority surfacing.
pub const HIGH_STRESS_THRESHOLD: f64 = 60.0;

/// Stress points added per subject with low attendance.
const ATTENDANCE_PENALTY: f64 = 12.0;

/// Stress points added per subject with a downward grade trend.
const TREND_PENALTY: f64 = 8.0;

/// Build the derived context snapshot for one generation pass. Never fails:
/// empty collections simply contribute no signal. The hour of day is read
/// once here so every rule in the pass sees the same value.
pub fn build_context(snapshot: &Snapshot, now: DateTime<Utc>) -> Context {
    let unsubmitted_assignments = snapshot
        .assignments
        .iter()
        .filter(|a| a.status.is_open())
        .count();
    let low_attendance_subjects = snapshot
        .attendance
        .iter()
        .filter(|a| clamp_pct(a.percentage, "attendance") < LOW_ATTENDANCE_THRESHOLD)
        .count();
    let down_trend_subjects = snapshot
        .grades
        .iter()
        .filter(|g| g.trend == GradeTrend::Down)
        .count();

    Context {
        hour_of_day: now.hour(),
        academic_stress: academic_stress(snapshot, now),
        meal_status: meal_status(&snapshot.meals, now),
        unsubmitted_assignments,
        low_attendance_subjects,
        down_trend_subjects,
    }
}

/// Academic stress in [0,100]: each unsubmitted assignment contributes its
/// grade weight scaled by an urgency factor that rises as the due date
/// approaches and maxes out once overdue, plus a fixed penalty per subject
/// with low attendance or a downward grade trend. Every term is
/// non-negative, so adding a qualifying record can only raise the score.
pub fn academic_stress(snapshot: &Snapshot, now: DateTime<Utc>) -> f64 {
    let mut stress = 0.0;

    for assignment in snapshot.assignments.iter().filter(|a| a.status.is_open()) {
        let urgency = if assignment.due_date <= now {
            1.0
        } else {
            match windows::deadline_tier(assignment.due_date, now) {
                DeadlineTier::Critical => 0.9,
                DeadlineTier::Urgent => 0.7,
                DeadlineTier::Normal => 0.4,
            }
        };
        stress += clamp_pct(assignment.weight_pct, "assignment weight") * urgency;
    }

    for record in &snapshot.attendance {
        if clamp_pct(record.percentage, "attendance") < LOW_ATTENDANCE_THRESHOLD {
            stress += ATTENDANCE_PENALTY;
        }
    }

    for grade in &snapshot.grades {
        if grade.trend == GradeTrend::Down {
            stress += TREND_PENALTY;
        }
    }

    stress.clamp(0.0, 100.0)
}

/// Meal status for the context. This deployment has no consumption
/// tracking, so the documented default applies: pending while a meal window
/// contains `now`, done otherwise. Skipped is reserved for deployments that
/// do track consumption.
pub fn meal_status(meals: &[MealSlot], now: DateTime<Utc>) -> MealStatus {
    if windows::current_meal(meals, now).current.is_some() {
        MealStatus::Pending
    } else {
        MealStatus::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Assignment, AssignmentStatus, AttendanceRecord, CrowdLevel, GradeRecord, MealKind,
    };
    use chrono::{Duration, NaiveTime, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
    }

    fn sample_assignment(id: &str, due: DateTime<Utc>, weight_pct: f64) -> Assignment {
        Assignment {
            id: id.to_string(),
            title: format!("Assignment {id}"),
            subject_code: "CS301".to_string(),
            subject: "Database Systems".to_string(),
            due_date: due,
            weight_pct,
            max_marks: 100,
            status: AssignmentStatus::InProgress,
            grade: None,
        }
    }

    fn sample_attendance(code: &str, percentage: f64) -> AttendanceRecord {
        AttendanceRecord {
            subject_code: code.to_string(),
            subject: code.to_string(),
            percentage,
        }
    }

    fn sample_grade(code: &str, percentage: f64, trend: GradeTrend) -> GradeRecord {
        GradeRecord {
            subject_code: code.to_string(),
            subject: code.to_string(),
            current_grade: "B".to_string(),
            percentage,
            assignments_pct: percentage,
            quizzes_pct: percentage,
            trend,
        }
    }

    fn sample_meal(start: NaiveTime, end: NaiveTime) -> MealSlot {
        MealSlot {
            kind: MealKind::Breakfast,
            start_time: start,
            end_time: end,
            crowd_level: CrowdLevel::Low,
            items: vec![],
            recommendation: None,
        }
    }

    #[test]
    fn empty_snapshot_yields_zero_stress_and_no_meal_pending() {
        let now = at(12, 0);
        let ctx = build_context(&Snapshot::default(), now);

        assert_eq!(ctx.academic_stress, 0.0);
        assert_eq!(ctx.meal_status, MealStatus::Done);
        assert_eq!(ctx.hour_of_day, 12);
        assert_eq!(ctx.unsubmitted_assignments, 0);
    }

    #[test]
    fn adding_an_overdue_high_weight_assignment_never_lowers_stress() {
        let now = at(12, 0);
        let mut snapshot = Snapshot {
            assignments: vec![sample_assignment("a", now + Duration::hours(30), 20.0)],
            attendance: vec![sample_attendance("CS301", 85.0)],
            ..Snapshot::default()
        };
        let before = academic_stress(&snapshot, now);

        snapshot
            .assignments
            .push(sample_assignment("b", now - Duration::hours(2), 30.0));
        let after = academic_stress(&snapshot, now);

        assert!(after >= before);
    }

    #[test]
    fn low_attendance_and_down_trends_raise_stress() {
        let now = at(12, 0);
        let base = Snapshot::default();
        let with_attendance = Snapshot {
            attendance: vec![sample_attendance("CS301", 70.0)],
            ..Snapshot::default()
        };
        let with_trend = Snapshot {
            grades: vec![sample_grade("CS301", 65.0, GradeTrend::Down)],
            ..Snapshot::default()
        };

        assert!(academic_stress(&with_attendance, now) > academic_stress(&base, now));
        assert!(academic_stress(&with_trend, now) > academic_stress(&base, now));
    }

    #[test]
    fn stress_is_clamped_to_one_hundred() {
        let now = at(12, 0);
        let snapshot = Snapshot {
            assignments: (0..10)
                .map(|i| sample_assignment(&i.to_string(), now - Duration::hours(1), 90.0))
                .collect(),
            ..Snapshot::default()
        };

        assert_eq!(academic_stress(&snapshot, now), 100.0);
    }

    #[test]
    fn malformed_attendance_is_clamped_not_fatal() {
        let now = at(12, 0);
        let snapshot = Snapshot {
            attendance: vec![sample_attendance("CS301", -40.0)],
            ..Snapshot::default()
        };
        let ctx = build_context(&snapshot, now);

        // -40 clamps to 0, which is below threshold.
        assert_eq!(ctx.low_attendance_subjects, 1);
        assert!(ctx.academic_stress > 0.0);
    }

    #[test]
    fn meal_status_is_pending_only_inside_a_window() {
        let breakfast = sample_meal(
            NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        );
        let meals = vec![breakfast];

        assert_eq!(meal_status(&meals, at(8, 0)), MealStatus::Pending);
        assert_eq!(meal_status(&meals, at(11, 0)), MealStatus::Done);
        assert_eq!(meal_status(&[], at(8, 0)), MealStatus::Done);
    }
}
