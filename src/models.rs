use std::fmt;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    NotStarted,
    InProgress,
    Submitted,
    Graded,
}

impl AssignmentStatus {
    /// Still awaiting submission, so it counts toward deadlines and stress.
    pub fn is_open(self) -> bool {
        matches!(self, AssignmentStatus::NotStarted | AssignmentStatus::InProgress)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub subject_code: String,
    pub subject: String,
    pub due_date: DateTime<Utc>,
    pub weight_pct: f64,
    pub max_marks: u32,
    pub status: AssignmentStatus,
    #[serde(default)]
    pub grade: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeTrend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    pub subject_code: String,
    pub subject: String,
    pub current_grade: String,
    pub percentage: f64,
    pub assignments_pct: f64,
    pub quizzes_pct: f64,
    pub trend: GradeTrend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub subject_code: String,
    pub subject: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub id: String,
    pub code: String,
    pub subject: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealKind {
    Breakfast,
    Lunch,
    Snacks,
    Dinner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrowdLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSlot {
    #[serde(rename = "type")]
    pub kind: MealKind,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub crowd_level: CrowdLevel,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default, rename = "aiRecommendation")]
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScholarshipStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipDeadline {
    pub name: String,
    pub provider: String,
    pub amount: String,
    pub deadline: DateTime<Utc>,
    pub status: ScholarshipStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportsSlot {
    pub sport: String,
    pub facility: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub current_players: u32,
    pub max_players: u32,
}

impl SportsSlot {
    pub fn has_capacity(&self) -> bool {
        self.current_players < self.max_players
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessReminder {
    pub id: String,
    pub message: String,
    /// Wall-clock time as "HH:MM", matching the dashboard's wire format.
    pub scheduled_time: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_active: bool,
}

impl WellnessReminder {
    /// Hour component of `scheduled_time`; `None` when the string is not "HH:MM".
    pub fn scheduled_hour(&self) -> Option<u32> {
        let (hour, minute) = self.scheduled_time.split_once(':')?;
        let hour: u32 = hour.parse().ok()?;
        let _: u32 = minute.parse().ok()?;
        (hour < 24).then_some(hour)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceListing {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub category: String,
    pub posted_at: DateTime<Utc>,
}

/// The full record set the engine runs over. Every collection defaults to
/// empty on deserialization; absence of data is "no signal", never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub student_name: String,
    pub assignments: Vec<Assignment>,
    pub grades: Vec<GradeRecord>,
    pub attendance: Vec<AttendanceRecord>,
    pub timetable: Vec<TimetableEntry>,
    pub meals: Vec<MealSlot>,
    pub scholarships: Vec<ScholarshipDeadline>,
    pub sports: Vec<SportsSlot>,
    pub wellness: Vec<WellnessReminder>,
    pub marketplace: Vec<MarketplaceListing>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealStatus {
    Pending,
    Done,
    Skipped,
}

impl fmt::Display for MealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MealStatus::Pending => "pending",
            MealStatus::Done => "done",
            MealStatus::Skipped => "skipped",
        };
        f.write_str(label)
    }
}

/// Derived scalar snapshot, built fresh on every pass and never mutated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub hour_of_day: u32,
    pub academic_stress: f64,
    pub meal_status: MealStatus,
    pub unsubmitted_assignments: usize,
    pub low_attendance_subjects: usize,
    pub down_trend_subjects: usize,
}

/// Variant order doubles as feed order: an ascending stable sort puts
/// critical first and ambient last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightPriority {
    Critical,
    High,
    Medium,
    Low,
    Ambient,
}

impl fmt::Display for InsightPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InsightPriority::Critical => "critical",
            InsightPriority::High => "high",
            InsightPriority::Medium => "medium",
            InsightPriority::Low => "low",
            InsightPriority::Ambient => "ambient",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: InsightPriority,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub action_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Action,
    Alert,
    Suggestion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    Academic,
    Wellness,
    Admin,
    Mess,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    pub score: f64,
    pub source: RecommendationSource,
    #[serde(default)]
    pub action_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendResponse {
    pub recommendations: Vec<RecommendationItem>,
    pub generated_at: DateTime<Utc>,
    pub total_signals: usize,
}

/// Normalize a percentage into [0,100]. Malformed provider data is clamped
/// with a warning rather than rejected, keeping the engine total over its
/// input domain.
pub fn clamp_pct(value: f64, field: &str) -> f64 {
    if value.is_nan() {
        tracing::warn!(field, "percentage is NaN, treating as 0");
        return 0.0;
    }
    if !(0.0..=100.0).contains(&value) {
        tracing::warn!(field, value, "percentage outside [0,100], clamping");
    }
    value.clamp(0.0, 100.0)
}
