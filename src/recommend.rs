use std::collections::HashSet;

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::context::{self, HIGH_STRESS_THRESHOLD, LOW_ATTENDANCE_THRESHOLD};
use crate::models::{
    clamp_pct, MealStatus, RecommendResponse, RecommendationItem, RecommendationKind,
    RecommendationSource, ScholarshipStatus, Snapshot,
};
use crate::windows;

const SCORE_DEADLINE_SOON: f64 = 95.0;
const SCORE_HIGH_STRESS: f64 = 90.0;
const SCORE_LOW_ATTENDANCE: f64 = 85.0;
const SCORE_DEADLINE_LATER: f64 = 70.0;
const SCORE_SCHOLARSHIP: f64 = 65.0;
const SCORE_MEAL_PENDING: f64 = 50.0;
const SCORE_WELLNESS: f64 = 40.0;
const SCORE_SPORTS: f64 = 35.0;

/// Only the nearest unsubmitted assignments ever reach the deadline rule,
/// so distant coursework cannot flood the list.
const DEADLINE_CANDIDATES: usize = 2;

type RuleFn = fn(&Snapshot, DateTime<Utc>, &mut Vec<RecommendationItem>);

pub struct RecommendRule {
    pub signal: &'static str,
    pub emit: RuleFn,
}

/// Structurally parallel to the insight rule table but independently owned:
/// the endpoint re-derives its own lightweight context from the snapshot.
pub const RECOMMEND_RULES: &[RecommendRule] = &[
    RecommendRule { signal: "stress", emit: stress_rule },
    RecommendRule { signal: "attendance", emit: attendance_rule },
    RecommendRule { signal: "deadline", emit: deadline_rule },
    RecommendRule { signal: "scholarship", emit: scholarship_rule },
    RecommendRule { signal: "wellness", emit: wellness_rule },
    RecommendRule { signal: "sports", emit: sports_rule },
    RecommendRule { signal: "meal", emit: meal_rule },
];

/// Run the scoring rules and return the flat list sorted by score
/// descending. The sort is stable, so equal scores keep insertion order.
pub fn recommend(snapshot: &Snapshot, now: DateTime<Utc>) -> Vec<RecommendationItem> {
    let mut candidates = Vec::new();
    for rule in RECOMMEND_RULES {
        (rule.emit)(snapshot, now, &mut candidates);
    }

    let mut seen = HashSet::new();
    let mut items: Vec<RecommendationItem> = candidates
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .collect();

    items.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    items
}

/// The endpoint body: the scored list plus generation metadata.
/// `total_signals` counts the final deduplicated list, not raw candidates.
pub fn respond(snapshot: &Snapshot, now: DateTime<Utc>) -> RecommendResponse {
    let recommendations = recommend(snapshot, now);
    RecommendResponse {
        total_signals: recommendations.len(),
        generated_at: now,
        recommendations,
    }
}

fn stress_rule(snapshot: &Snapshot, now: DateTime<Utc>, out: &mut Vec<RecommendationItem>) {
    let stress = context::academic_stress(snapshot, now);
    if stress > HIGH_STRESS_THRESHOLD {
        out.push(RecommendationItem {
            id: "stress".to_string(),
            kind: RecommendationKind::Alert,
            title: "Academic load is heavy".to_string(),
            description: format!(
                "Your academic stress is at {stress:.0}/100. Block time for the nearest deadline today."
            ),
            score: SCORE_HIGH_STRESS,
            source: RecommendationSource::Academic,
            action_url: Some("/academics".to_string()),
        });
    }
}

fn attendance_rule(snapshot: &Snapshot, _now: DateTime<Utc>, out: &mut Vec<RecommendationItem>) {
    for record in &snapshot.attendance {
        let percentage = clamp_pct(record.percentage, "attendance");
        if percentage < LOW_ATTENDANCE_THRESHOLD {
            out.push(RecommendationItem {
                id: format!("attendance-{}", record.subject_code),
                kind: RecommendationKind::Alert,
                title: format!("Attend {} classes", record.subject_code),
                description: format!(
                    "{} attendance is at {:.0}%, below the {:.0}% requirement.",
                    record.subject, percentage, LOW_ATTENDANCE_THRESHOLD,
                ),
                score: SCORE_LOW_ATTENDANCE,
                source: RecommendationSource::Academic,
                action_url: Some("/academics/attendance".to_string()),
            });
        }
    }
}

fn deadline_rule(snapshot: &Snapshot, now: DateTime<Utc>, out: &mut Vec<RecommendationItem>) {
    for assignment in windows::upcoming_deadlines(&snapshot.assignments, now)
        .into_iter()
        .take(DEADLINE_CANDIDATES)
    {
        let soon = assignment.due_date - now <= Duration::days(2);
        let score = if soon { SCORE_DEADLINE_SOON } else { SCORE_DEADLINE_LATER };
        out.push(RecommendationItem {
            id: format!("assignment-{}", assignment.id),
            kind: RecommendationKind::Action,
            title: format!("Finish {}", assignment.title),
            description: format!(
                "{} for {} is due on {}.",
                assignment.title,
                assignment.subject,
                assignment.due_date.format("%-d %b, %H:%M"),
            ),
            score,
            source: RecommendationSource::Academic,
            action_url: Some("/academics/assignments".to_string()),
        });
    }
}

fn scholarship_rule(snapshot: &Snapshot, _now: DateTime<Utc>, out: &mut Vec<RecommendationItem>) {
    // A single most prominent scholarship, chosen by soonest deadline.
    let soonest = snapshot
        .scholarships
        .iter()
        .filter(|s| s.status == ScholarshipStatus::Open)
        .min_by_key(|s| s.deadline);
    if let Some(scholarship) = soonest {
        out.push(RecommendationItem {
            id: "scholarship".to_string(),
            kind: RecommendationKind::Suggestion,
            title: format!("Apply for {}", scholarship.name),
            description: format!(
                "{} ({}) from {} closes on {}.",
                scholarship.name,
                scholarship.amount,
                scholarship.provider,
                scholarship.deadline.format("%-d %b %Y"),
            ),
            score: SCORE_SCHOLARSHIP,
            source: RecommendationSource::Admin,
            action_url: Some("/beyond/scholarships".to_string()),
        });
    }
}

fn wellness_rule(snapshot: &Snapshot, now: DateTime<Utc>, out: &mut Vec<RecommendationItem>) {
    let hour = now.hour();
    for reminder in snapshot.wellness.iter().filter(|r| r.is_active) {
        let Some(scheduled) = reminder.scheduled_hour() else {
            continue;
        };
        if (scheduled as i64 - hour as i64).abs() <= 1 {
            out.push(RecommendationItem {
                id: format!("wellness-{}", reminder.id),
                kind: RecommendationKind::Suggestion,
                title: reminder.message.clone(),
                description: format!("Scheduled for {}.", reminder.scheduled_time),
                score: SCORE_WELLNESS,
                source: RecommendationSource::Wellness,
                action_url: Some("/wellness".to_string()),
            });
        }
    }
}

fn sports_rule(snapshot: &Snapshot, _now: DateTime<Utc>, out: &mut Vec<RecommendationItem>) {
    // First qualifying slot only.
    let open = snapshot
        .sports
        .iter()
        .find(|s| windows::in_sports_window(s.start_time) && s.has_capacity());
    if let Some(slot) = open {
        out.push(RecommendationItem {
            id: "sports".to_string(),
            kind: RecommendationKind::Suggestion,
            title: format!("Join {} at {}", slot.sport, slot.facility),
            description: format!(
                "{} of {} spots filled, starting {}.",
                slot.current_players,
                slot.max_players,
                slot.start_time.format("%H:%M"),
            ),
            score: SCORE_SPORTS,
            source: RecommendationSource::Wellness,
            action_url: Some("/sports".to_string()),
        });
    }
}

fn meal_rule(snapshot: &Snapshot, now: DateTime<Utc>, out: &mut Vec<RecommendationItem>) {
    let pending = context::meal_status(&snapshot.meals, now) == MealStatus::Pending;
    if pending && windows::in_breakfast_window(now.hour()) {
        out.push(RecommendationItem {
            id: "meal-breakfast".to_string(),
            kind: RecommendationKind::Action,
            title: "Have breakfast".to_string(),
            description: "The breakfast window is open at the mess right now.".to_string(),
            score: SCORE_MEAL_PENDING,
            source: RecommendationSource::Mess,
            action_url: Some("/mess".to_string()),
        });
    }
}
