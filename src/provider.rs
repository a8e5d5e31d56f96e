use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::models::{
    Assignment, AssignmentStatus, AttendanceRecord, CrowdLevel, GradeRecord, GradeTrend,
    MarketplaceListing, MealKind, MealSlot, ScholarshipDeadline, ScholarshipStatus, Snapshot,
    SportsSlot, TimetableEntry, WellnessReminder,
};

/// Supplies the engine's record snapshot for the current user. The engine
/// is agnostic to where the data comes from; a database-backed
/// implementation slots in behind this same trait.
pub trait SnapshotProvider {
    fn snapshot(&self) -> anyhow::Result<Snapshot>;
}

/// Reads a snapshot from a JSON file on disk.
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotProvider for JsonFileProvider {
    fn snapshot(&self) -> anyhow::Result<Snapshot> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading snapshot from {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing snapshot JSON in {}", self.path.display()))
    }
}

/// Built-in sample data anchored to a reference instant, used when no
/// snapshot file is supplied.
pub struct SampleProvider {
    now: DateTime<Utc>,
}

impl SampleProvider {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl SnapshotProvider for SampleProvider {
    fn snapshot(&self) -> anyhow::Result<Snapshot> {
        sample_snapshot(self.now)
    }
}

/// Pick a provider from CLI input: a JSON file when a path is given, the
/// built-in sample otherwise.
pub fn load_snapshot(path: Option<&Path>, now: DateTime<Utc>) -> anyhow::Result<Snapshot> {
    match path {
        Some(path) => JsonFileProvider::new(path).snapshot(),
        None => SampleProvider::new(now).snapshot(),
    }
}

fn hm(hour: u32, minute: u32) -> anyhow::Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0).context("invalid time")
}

/// A realistic single-student snapshot. Due dates and deadlines are offset
/// from `now` so every rule family has something to say in a demo run.
pub fn sample_snapshot(now: DateTime<Utc>) -> anyhow::Result<Snapshot> {
    let assignments = vec![
        Assignment {
            id: "asg-101".to_string(),
            title: "DBMS Assignment 4".to_string(),
            subject_code: "CS301".to_string(),
            subject: "Database Systems".to_string(),
            due_date: now + Duration::hours(20),
            weight_pct: 30.0,
            max_marks: 50,
            status: AssignmentStatus::InProgress,
            grade: None,
        },
        Assignment {
            id: "asg-102".to_string(),
            title: "OS Lab Report 6".to_string(),
            subject_code: "CS302".to_string(),
            subject: "Operating Systems".to_string(),
            due_date: now + Duration::hours(40),
            weight_pct: 20.0,
            max_marks: 25,
            status: AssignmentStatus::NotStarted,
            grade: None,
        },
        Assignment {
            id: "asg-103".to_string(),
            title: "Maths Problem Set 7".to_string(),
            subject_code: "MA201".to_string(),
            subject: "Linear Algebra".to_string(),
            due_date: now + Duration::days(6),
            weight_pct: 10.0,
            max_marks: 40,
            status: AssignmentStatus::NotStarted,
            grade: None,
        },
        Assignment {
            id: "asg-100".to_string(),
            title: "DBMS Assignment 3".to_string(),
            subject_code: "CS301".to_string(),
            subject: "Database Systems".to_string(),
            due_date: now - Duration::days(12),
            weight_pct: 10.0,
            max_marks: 50,
            status: AssignmentStatus::Graded,
            grade: Some(41.0),
        },
    ];

    let grades = vec![
        GradeRecord {
            subject_code: "CS301".to_string(),
            subject: "Database Systems".to_string(),
            current_grade: "B-".to_string(),
            percentage: 68.0,
            assignments_pct: 72.0,
            quizzes_pct: 64.0,
            trend: GradeTrend::Down,
        },
        GradeRecord {
            subject_code: "CS302".to_string(),
            subject: "Operating Systems".to_string(),
            current_grade: "B+".to_string(),
            percentage: 81.0,
            assignments_pct: 84.0,
            quizzes_pct: 78.0,
            trend: GradeTrend::Stable,
        },
        GradeRecord {
            subject_code: "MA201".to_string(),
            subject: "Linear Algebra".to_string(),
            current_grade: "A".to_string(),
            percentage: 88.0,
            assignments_pct: 90.0,
            quizzes_pct: 86.0,
            trend: GradeTrend::Up,
        },
    ];

    let attendance = vec![
        AttendanceRecord {
            subject_code: "CS301".to_string(),
            subject: "Database Systems".to_string(),
            percentage: 74.0,
        },
        AttendanceRecord {
            subject_code: "CS302".to_string(),
            subject: "Operating Systems".to_string(),
            percentage: 85.0,
        },
        AttendanceRecord {
            subject_code: "MA201".to_string(),
            subject: "Linear Algebra".to_string(),
            percentage: 91.0,
        },
    ];

    let timetable = vec![
        TimetableEntry {
            id: "tt-1".to_string(),
            code: "CS301".to_string(),
            subject: "Database Systems".to_string(),
            start_time: hm(9, 0)?,
            end_time: hm(10, 0)?,
            room: "LH-2".to_string(),
            kind: "lecture".to_string(),
            color: "#4f46e5".to_string(),
        },
        TimetableEntry {
            id: "tt-2".to_string(),
            code: "MA201".to_string(),
            subject: "Linear Algebra".to_string(),
            start_time: hm(11, 0)?,
            end_time: hm(12, 30)?,
            room: "LH-5".to_string(),
            kind: "lecture".to_string(),
            color: "#059669".to_string(),
        },
        TimetableEntry {
            id: "tt-3".to_string(),
            code: "CS302".to_string(),
            subject: "Operating Systems".to_string(),
            start_time: hm(14, 30)?,
            end_time: hm(16, 30)?,
            room: "Lab-3".to_string(),
            kind: "lab".to_string(),
            color: "#d97706".to_string(),
        },
    ];

    let meals = vec![
        MealSlot {
            kind: MealKind::Breakfast,
            start_time: hm(7, 30)?,
            end_time: hm(9, 30)?,
            crowd_level: CrowdLevel::Low,
            items: vec!["poha".to_string(), "boiled eggs".to_string(), "tea".to_string()],
            recommendation: Some("Light crowd before 8:15".to_string()),
        },
        MealSlot {
            kind: MealKind::Lunch,
            start_time: hm(12, 0)?,
            end_time: hm(14, 0)?,
            crowd_level: CrowdLevel::High,
            items: vec!["dal".to_string(), "rice".to_string(), "paneer".to_string()],
            recommendation: None,
        },
        MealSlot {
            kind: MealKind::Snacks,
            start_time: hm(16, 30)?,
            end_time: hm(17, 30)?,
            crowd_level: CrowdLevel::Medium,
            items: vec!["samosa".to_string(), "chai".to_string()],
            recommendation: None,
        },
        MealSlot {
            kind: MealKind::Dinner,
            start_time: hm(19, 30)?,
            end_time: hm(21, 30)?,
            crowd_level: CrowdLevel::Medium,
            items: vec!["roti".to_string(), "chicken curry".to_string()],
            recommendation: None,
        },
    ];

    let scholarships = vec![
        ScholarshipDeadline {
            name: "Merit Scholarship 2026".to_string(),
            provider: "AICTE".to_string(),
            amount: "₹50,000".to_string(),
            deadline: now + Duration::days(10),
            status: ScholarshipStatus::Open,
        },
        ScholarshipDeadline {
            name: "Sports Excellence Grant".to_string(),
            provider: "State Sports Board".to_string(),
            amount: "₹25,000".to_string(),
            deadline: now - Duration::days(4),
            status: ScholarshipStatus::Closed,
        },
    ];

    let sports = vec![
        SportsSlot {
            sport: "Badminton".to_string(),
            facility: "Indoor Court 2".to_string(),
            start_time: hm(17, 0)?,
            end_time: hm(18, 0)?,
            current_players: 4,
            max_players: 8,
        },
        SportsSlot {
            sport: "Football".to_string(),
            facility: "Main Ground".to_string(),
            start_time: hm(6, 0)?,
            end_time: hm(7, 0)?,
            current_players: 22,
            max_players: 22,
        },
    ];

    let wellness = vec![
        WellnessReminder {
            id: "well-1".to_string(),
            message: "Drink a glass of water".to_string(),
            scheduled_time: "10:00".to_string(),
            kind: "hydration".to_string(),
            is_active: true,
        },
        WellnessReminder {
            id: "well-2".to_string(),
            message: "Evening walk around campus".to_string(),
            scheduled_time: "18:00".to_string(),
            kind: "activity".to_string(),
            is_active: true,
        },
        WellnessReminder {
            id: "well-3".to_string(),
            message: "Wind down, screens off".to_string(),
            scheduled_time: "23:00".to_string(),
            kind: "sleep".to_string(),
            is_active: false,
        },
    ];

    let marketplace = vec![MarketplaceListing {
        id: "mkt-1".to_string(),
        title: "Scientific calculator (FX-991)".to_string(),
        price: 650.0,
        category: "electronics".to_string(),
        posted_at: now - Duration::days(2),
    }];

    Ok(Snapshot {
        student_name: "Aarav".to_string(),
        assignments,
        grades,
        attendance,
        timetable,
        meals,
        scholarships,
        sports,
        wellness,
        marketplace,
    })
}
