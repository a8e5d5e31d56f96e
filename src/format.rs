use crate::models::{Context, MealStatus};

/// Time-of-day greeting shown at the top of the dashboard.
pub fn greeting(name: &str, hour_of_day: u32) -> String {
    let part = if hour_of_day < 12 {
        "Good morning"
    } else if hour_of_day < 17 {
        "Good afternoon"
    } else {
        "Good evening"
    };
    if name.is_empty() {
        part.to_string()
    } else {
        format!("{part}, {name}")
    }
}

/// One-line context summary for the dashboard header.
pub fn status_line(ctx: &Context) -> String {
    let load = if ctx.academic_stress > 60.0 {
        "heavy"
    } else if ctx.academic_stress > 30.0 {
        "steady"
    } else {
        "light"
    };
    let meal = match ctx.meal_status {
        MealStatus::Pending => "a meal window is open",
        MealStatus::Done => "no meal window right now",
        MealStatus::Skipped => "a meal was skipped",
    };
    format!(
        "Academic load is {load} ({:.0}/100) with {} assignments open; {meal}.",
        ctx.academic_stress, ctx.unsubmitted_assignments,
    )
}
