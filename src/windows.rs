use chrono::{DateTime, Duration, Utc};

use crate::models::{Assignment, MealSlot, TimetableEntry};

/// One day's timetable bucketed relative to an explicit instant.
#[derive(Debug, Clone, Default)]
pub struct DaySchedule {
    pub past: Vec<TimetableEntry>,
    pub current: Option<TimetableEntry>,
    pub upcoming: Vec<TimetableEntry>,
}

/// Classify today's classes as past, current, or upcoming. An entry is
/// current iff `now` falls within `[start_time, end_time)`; past iff its
/// end time has been reached. When overlapping entries both contain `now`
/// (a data error), the earliest-starting one wins and the rest are treated
/// as upcoming, so there is always at most one current class.
pub fn today_schedule(entries: &[TimetableEntry], now: DateTime<Utc>) -> DaySchedule {
    let time = now.time();
    let mut schedule = DaySchedule::default();

    for entry in entries {
        if entry.end_time <= time {
            schedule.past.push(entry.clone());
        } else if entry.start_time <= time {
            match schedule.current.take() {
                None => schedule.current = Some(entry.clone()),
                Some(current) if entry.start_time < current.start_time => {
                    schedule.upcoming.push(current);
                    schedule.current = Some(entry.clone());
                }
                Some(current) => {
                    schedule.current = Some(current);
                    schedule.upcoming.push(entry.clone());
                }
            }
        } else {
            schedule.upcoming.push(entry.clone());
        }
    }

    schedule
}

#[derive(Debug, Clone, Default)]
pub struct MealWindows {
    pub current: Option<MealSlot>,
    pub next: Option<MealSlot>,
    pub all: Vec<MealSlot>,
}

/// Find the meal window containing `now` and the soonest one still ahead.
/// A slot whose end time equals `now` has already closed. Overlapping slots
/// resolve the same way as classes: the earliest-starting containing slot
/// wins. `next` is `None` once nothing remains today; that is normal, not
/// an error.
pub fn current_meal(slots: &[MealSlot], now: DateTime<Utc>) -> MealWindows {
    let time = now.time();
    let current = slots
        .iter()
        .filter(|slot| slot.start_time <= time && time < slot.end_time)
        .min_by_key(|slot| slot.start_time)
        .cloned();
    let next = slots
        .iter()
        .filter(|slot| slot.start_time > time)
        .min_by_key(|slot| slot.start_time)
        .cloned();

    MealWindows {
        current,
        next,
        all: slots.to_vec(),
    }
}

/// Unsubmitted assignments still ahead of `now`, soonest first. Overdue
/// work is the insight generator's concern, not this query's.
pub fn upcoming_deadlines(assignments: &[Assignment], now: DateTime<Utc>) -> Vec<Assignment> {
    let mut due: Vec<Assignment> = assignments
        .iter()
        .filter(|a| a.status.is_open() && a.due_date > now)
        .cloned()
        .collect();
    due.sort_by_key(|a| a.due_date);
    due
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineTier {
    Critical,
    Urgent,
    Normal,
}

/// Fixed urgency tiers: critical within 24 hours, urgent within 48.
/// The boundaries are inclusive, so exactly 24h out is still critical.
pub fn deadline_tier(due: DateTime<Utc>, now: DateTime<Utc>) -> DeadlineTier {
    let remaining = due - now;
    if remaining <= Duration::hours(24) {
        DeadlineTier::Critical
    } else if remaining <= Duration::hours(48) {
        DeadlineTier::Urgent
    } else {
        DeadlineTier::Normal
    }
}

/// Breakfast reminder window, 07:00–09:00 by hour of day.
pub fn in_breakfast_window(hour_of_day: u32) -> bool {
    (7..9).contains(&hour_of_day)
}

/// Evening sports window: a slot qualifies when it starts between 16:00 and
/// 20:00 inclusive.
pub fn in_sports_window(start: chrono::NaiveTime) -> bool {
    use chrono::Timelike;
    let seconds = start.num_seconds_from_midnight();
    (16 * 3600..=20 * 3600).contains(&seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssignmentStatus, CrowdLevel, MealKind};
    use chrono::{NaiveTime, TimeZone};

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
    }

    fn sample_entry(id: &str, start: NaiveTime, end: NaiveTime) -> TimetableEntry {
        TimetableEntry {
            id: id.to_string(),
            code: "CS301".to_string(),
            subject: "Database Systems".to_string(),
            start_time: start,
            end_time: end,
            room: "LH-2".to_string(),
            kind: "lecture".to_string(),
            color: "#4f46e5".to_string(),
        }
    }

    fn sample_meal(kind: MealKind, start: NaiveTime, end: NaiveTime) -> MealSlot {
        MealSlot {
            kind,
            start_time: start,
            end_time: end,
            crowd_level: CrowdLevel::Medium,
            items: vec!["dal".to_string(), "rice".to_string()],
            recommendation: None,
        }
    }

    fn sample_assignment(id: &str, due: DateTime<Utc>, status: AssignmentStatus) -> Assignment {
        Assignment {
            id: id.to_string(),
            title: format!("Assignment {id}"),
            subject_code: "CS301".to_string(),
            subject: "Database Systems".to_string(),
            due_date: due,
            weight_pct: 20.0,
            max_marks: 100,
            status,
            grade: None,
        }
    }

    #[test]
    fn schedule_partitions_the_day_exhaustively() {
        let entries = vec![
            sample_entry("a", hm(8, 0), hm(9, 0)),
            sample_entry("b", hm(10, 0), hm(11, 30)),
            sample_entry("c", hm(14, 0), hm(15, 0)),
        ];
        let schedule = today_schedule(&entries, at(10, 15));

        assert_eq!(schedule.past.len(), 1);
        assert_eq!(schedule.current.as_ref().map(|e| e.id.as_str()), Some("b"));
        assert_eq!(schedule.upcoming.len(), 1);

        let mut seen: Vec<&str> = schedule.past.iter().map(|e| e.id.as_str()).collect();
        seen.extend(schedule.current.as_ref().map(|e| e.id.as_str()));
        seen.extend(schedule.upcoming.iter().map(|e| e.id.as_str()));
        seen.sort();
        assert_eq!(seen, vec!["a", "b", "c"]);
    }

    #[test]
    fn schedule_with_no_current_class_splits_past_and_upcoming() {
        let entries = vec![
            sample_entry("a", hm(8, 0), hm(9, 0)),
            sample_entry("b", hm(14, 0), hm(15, 0)),
        ];
        let schedule = today_schedule(&entries, at(12, 0));

        assert!(schedule.current.is_none());
        assert_eq!(schedule.past.len(), 1);
        assert_eq!(schedule.upcoming.len(), 1);
    }

    #[test]
    fn class_ending_exactly_now_is_past() {
        let entries = vec![sample_entry("a", hm(9, 0), hm(10, 0))];
        let schedule = today_schedule(&entries, at(10, 0));

        assert_eq!(schedule.past.len(), 1);
        assert!(schedule.current.is_none());
    }

    #[test]
    fn overlapping_entries_keep_earliest_start_as_current() {
        let entries = vec![
            sample_entry("late", hm(10, 30), hm(12, 0)),
            sample_entry("early", hm(10, 0), hm(11, 0)),
        ];
        let schedule = today_schedule(&entries, at(10, 45));

        assert_eq!(
            schedule.current.as_ref().map(|e| e.id.as_str()),
            Some("early")
        );
        assert_eq!(schedule.upcoming.len(), 1);
        assert_eq!(schedule.upcoming[0].id, "late");
    }

    #[test]
    fn meal_ending_exactly_now_is_not_current() {
        let slots = vec![
            sample_meal(MealKind::Breakfast, hm(7, 30), hm(9, 30)),
            sample_meal(MealKind::Lunch, hm(12, 0), hm(14, 0)),
        ];
        let windows = current_meal(&slots, at(9, 30));

        assert!(windows.current.is_none());
        assert_eq!(windows.next.as_ref().map(|s| s.kind), Some(MealKind::Lunch));
    }

    #[test]
    fn overlapping_meals_keep_earliest_start_as_current() {
        let slots = vec![
            sample_meal(MealKind::Snacks, hm(16, 30), hm(17, 30)),
            sample_meal(MealKind::Lunch, hm(12, 0), hm(17, 0)),
        ];
        let windows = current_meal(&slots, at(16, 45));

        assert_eq!(
            windows.current.as_ref().map(|s| s.kind),
            Some(MealKind::Lunch)
        );
    }

    #[test]
    fn no_next_meal_after_the_last_window_opens() {
        let slots = vec![sample_meal(MealKind::Dinner, hm(19, 30), hm(21, 30))];
        let windows = current_meal(&slots, at(20, 0));

        assert_eq!(
            windows.current.as_ref().map(|s| s.kind),
            Some(MealKind::Dinner)
        );
        assert!(windows.next.is_none());
    }

    #[test]
    fn upcoming_deadlines_exclude_submitted_and_overdue_work() {
        let now = at(12, 0);
        let assignments = vec![
            sample_assignment("done", now + Duration::hours(10), AssignmentStatus::Submitted),
            sample_assignment("late", now - Duration::hours(2), AssignmentStatus::InProgress),
            sample_assignment("far", now + Duration::hours(72), AssignmentStatus::NotStarted),
            sample_assignment("soon", now + Duration::hours(6), AssignmentStatus::InProgress),
        ];

        let due = upcoming_deadlines(&assignments, now);
        let ids: Vec<&str> = due.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["soon", "far"]);
    }

    #[test]
    fn deadline_tier_boundaries_are_inclusive() {
        let now = at(12, 0);
        assert_eq!(
            deadline_tier(now + Duration::hours(24), now),
            DeadlineTier::Critical
        );
        assert_eq!(
            deadline_tier(now + Duration::hours(24) + Duration::seconds(1), now),
            DeadlineTier::Urgent
        );
        assert_eq!(
            deadline_tier(now + Duration::hours(48), now),
            DeadlineTier::Urgent
        );
        assert_eq!(
            deadline_tier(now + Duration::hours(48) + Duration::seconds(1), now),
            DeadlineTier::Normal
        );
    }

    #[test]
    fn time_of_day_windows() {
        assert!(in_breakfast_window(7));
        assert!(in_breakfast_window(8));
        assert!(!in_breakfast_window(9));
        assert!(!in_breakfast_window(6));

        assert!(in_sports_window(hm(16, 0)));
        assert!(in_sports_window(hm(19, 45)));
        assert!(in_sports_window(hm(20, 0)));
        assert!(!in_sports_window(hm(20, 1)));
        assert!(!in_sports_window(hm(15, 59)));
    }
}
