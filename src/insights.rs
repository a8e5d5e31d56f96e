use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::context::{HIGH_STRESS_THRESHOLD, LOW_ATTENDANCE_THRESHOLD};
use crate::models::{
    clamp_pct, Context, Insight, InsightPriority, MealStatus, ScholarshipStatus, Snapshot,
};
use crate::windows::{self, DeadlineTier};

/// How many insights the dashboard feed shows by default.
pub const DEFAULT_FEED_LIMIT: usize = 5;

type RuleFn = fn(&Snapshot, &Context, DateTime<Utc>, &mut Vec<Insight>);

/// One entry in the rule table. Keeping the rules as data makes the set
/// enumerable and lets each rule be unit-tested on its own.
pub struct InsightRule {
    pub signal: &'static str,
    pub emit: RuleFn,
}

/// Evaluation order is also tie-break order within a priority tier, since
/// the final sort is stable.
pub const INSIGHT_RULES: &[InsightRule] = &[
    InsightRule { signal: "overdue", emit: overdue_rule },
    InsightRule { signal: "deadline", emit: deadline_rule },
    InsightRule { signal: "stress", emit: stress_rule },
    InsightRule { signal: "attendance", emit: attendance_rule },
    InsightRule { signal: "scholarship", emit: scholarship_rule },
    InsightRule { signal: "meal", emit: meal_rule },
    InsightRule { signal: "wellness", emit: wellness_rule },
    InsightRule { signal: "sports", emit: sports_rule },
];

/// Run every rule, drop duplicate ids (first emission wins), and
/// stable-sort by priority. Returns the full sorted list; callers truncate
/// with [`feed`] so a "view all" screen can still see everything.
pub fn generate_insights(snapshot: &Snapshot, ctx: &Context, now: DateTime<Utc>) -> Vec<Insight> {
    let mut candidates = Vec::new();
    for rule in INSIGHT_RULES {
        let before = candidates.len();
        (rule.emit)(snapshot, ctx, now, &mut candidates);
        tracing::debug!(
            signal = rule.signal,
            emitted = candidates.len() - before,
            "insight rule evaluated"
        );
    }

    let mut seen = HashSet::new();
    let mut insights: Vec<Insight> = candidates
        .into_iter()
        .filter(|insight| seen.insert(insight.id.clone()))
        .collect();

    insights.sort_by_key(|insight| insight.priority);
    insights
}

/// The capped feed shown in the dashboard widget.
pub fn feed(insights: &[Insight], limit: usize) -> Vec<Insight> {
    insights.iter().take(limit).cloned().collect()
}

fn overdue_rule(snapshot: &Snapshot, _ctx: &Context, now: DateTime<Utc>, out: &mut Vec<Insight>) {
    for assignment in snapshot
        .assignments
        .iter()
        .filter(|a| a.status.is_open() && a.due_date <= now)
    {
        out.push(Insight {
            id: format!("overdue-{}", assignment.id),
            title: format!("{} is overdue", assignment.title),
            description: format!(
                "{} ({}) passed its due date and is still unsubmitted. It carries {:.0}% of your grade.",
                assignment.title,
                assignment.subject_code,
                clamp_pct(assignment.weight_pct, "assignment weight"),
            ),
            priority: InsightPriority::Critical,
            icon: Some("alert-triangle".to_string()),
            action_url: Some("/academics/assignments".to_string()),
        });
    }
}

fn deadline_rule(snapshot: &Snapshot, _ctx: &Context, now: DateTime<Utc>, out: &mut Vec<Insight>) {
    for assignment in windows::upcoming_deadlines(&snapshot.assignments, now) {
        let priority = match windows::deadline_tier(assignment.due_date, now) {
            DeadlineTier::Critical => InsightPriority::Critical,
            DeadlineTier::Urgent => InsightPriority::High,
            DeadlineTier::Normal => continue,
        };
        let hours_left = (assignment.due_date - now).num_hours();
        out.push(Insight {
            id: format!("deadline-{}", assignment.id),
            title: format!("{} due in {}h", assignment.title, hours_left),
            description: format!(
                "{} for {} is due in about {} hours and is worth {:.0}% of your grade.",
                assignment.title,
                assignment.subject,
                hours_left,
                clamp_pct(assignment.weight_pct, "assignment weight"),
            ),
            priority,
            icon: Some("clock".to_string()),
            action_url: Some("/academics/assignments".to_string()),
        });
    }
}

fn stress_rule(snapshot: &Snapshot, ctx: &Context, _now: DateTime<Utc>, out: &mut Vec<Insight>) {
    if ctx.academic_stress <= HIGH_STRESS_THRESHOLD {
        return;
    }
    let focus = snapshot.grades.iter().min_by(|a, b| {
        a.percentage
            .partial_cmp(&b.percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let description = match focus {
        Some(grade) => format!(
            "Your academic load is running hot ({:.0}/100). {} is your weakest subject right now at {:.0}%.",
            ctx.academic_stress,
            grade.subject,
            clamp_pct(grade.percentage, "grade percentage"),
        ),
        None => format!(
            "Your academic load is running hot ({:.0}/100). Consider clearing the nearest deadline first.",
            ctx.academic_stress,
        ),
    };
    out.push(Insight {
        id: "stress-high".to_string(),
        title: "Heavy academic load".to_string(),
        description,
        priority: InsightPriority::High,
        icon: Some("activity".to_string()),
        action_url: Some("/academics".to_string()),
    });
}

fn attendance_rule(
    snapshot: &Snapshot,
    _ctx: &Context,
    _now: DateTime<Utc>,
    out: &mut Vec<Insight>,
) {
    for record in &snapshot.attendance {
        let percentage = clamp_pct(record.percentage, "attendance");
        if percentage < LOW_ATTENDANCE_THRESHOLD {
            out.push(Insight {
                id: format!("attendance-{}", record.subject_code),
                title: format!("{} attendance at {:.0}%", record.subject_code, percentage),
                description: format!(
                    "{} attendance has slipped to {:.0}%, below the {:.0}% requirement.",
                    record.subject, percentage, LOW_ATTENDANCE_THRESHOLD,
                ),
                priority: InsightPriority::High,
                icon: Some("user-check".to_string()),
                action_url: Some("/academics/attendance".to_string()),
            });
        }
    }
}

fn scholarship_rule(
    snapshot: &Snapshot,
    _ctx: &Context,
    _now: DateTime<Utc>,
    out: &mut Vec<Insight>,
) {
    // Only the most pressing open scholarship surfaces, not every one.
    let soonest = snapshot
        .scholarships
        .iter()
        .filter(|s| s.status == ScholarshipStatus::Open)
        .min_by_key(|s| s.deadline);
    if let Some(scholarship) = soonest {
        out.push(Insight {
            id: "scholarship-open".to_string(),
            title: format!("{} applications open", scholarship.name),
            description: format!(
                "{} from {} ({}) closes on {}.",
                scholarship.name,
                scholarship.provider,
                scholarship.amount,
                scholarship.deadline.format("%-d %b %Y"),
            ),
            priority: InsightPriority::Medium,
            icon: Some("award".to_string()),
            action_url: Some("/beyond/scholarships".to_string()),
        });
    }
}

fn meal_rule(_snapshot: &Snapshot, ctx: &Context, _now: DateTime<Utc>, out: &mut Vec<Insight>) {
    if ctx.meal_status == MealStatus::Pending && windows::in_breakfast_window(ctx.hour_of_day) {
        out.push(Insight {
            id: "meal-breakfast".to_string(),
            title: "Breakfast window is open".to_string(),
            description: "The mess is serving breakfast right now. Grab it before the window closes."
                .to_string(),
            priority: InsightPriority::Medium,
            icon: Some("coffee".to_string()),
            action_url: Some("/mess".to_string()),
        });
    }
}

fn wellness_rule(snapshot: &Snapshot, ctx: &Context, _now: DateTime<Utc>, out: &mut Vec<Insight>) {
    for reminder in snapshot.wellness.iter().filter(|r| r.is_active) {
        let Some(hour) = reminder.scheduled_hour() else {
            tracing::warn!(
                id = %reminder.id,
                time = %reminder.scheduled_time,
                "unparseable wellness reminder time"
            );
            continue;
        };
        if (hour as i64 - ctx.hour_of_day as i64).abs() <= 1 {
            out.push(Insight {
                id: format!("wellness-{}", reminder.id),
                title: reminder.message.clone(),
                description: format!(
                    "Scheduled for {} as part of your wellness routine.",
                    reminder.scheduled_time
                ),
                priority: InsightPriority::Low,
                icon: Some("heart".to_string()),
                action_url: Some("/wellness".to_string()),
            });
        }
    }
}

fn sports_rule(snapshot: &Snapshot, _ctx: &Context, _now: DateTime<Utc>, out: &mut Vec<Insight>) {
    for slot in &snapshot.sports {
        if windows::in_sports_window(slot.start_time) && slot.has_capacity() {
            out.push(Insight {
                id: format!("sports-{}", slot.sport),
                title: format!("{} slot open at {}", slot.sport, slot.facility),
                description: format!(
                    "{} at {} has {} of {} spots filled, starting {}.",
                    slot.sport,
                    slot.facility,
                    slot.current_players,
                    slot.max_players,
                    slot.start_time.format("%H:%M"),
                ),
                priority: InsightPriority::Ambient,
                icon: Some("dumbbell".to_string()),
                action_url: Some("/sports".to_string()),
            });
        }
    }
}
