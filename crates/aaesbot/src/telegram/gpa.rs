//! GPA calculator replies.

use aaescore::gpa::{calculate_gpa, GpaSummary};

pub fn format_summary(summary: &GpaSummary) -> String {
    format!(
        "🎓 GPA: {:.2}\nQuality points: {}\nCredits: {}",
        summary.gpa, summary.quality_points, summary.credits
    )
}

/// Reply for a pasted course list, and whether the input was accepted.
pub fn reply_for(text: &str) -> (String, bool) {
    let lines: Vec<&str> = text.lines().collect();
    match calculate_gpa(lines.as_slice()) {
        Ok(summary) if summary.credits > 0 => (format_summary(&summary), true),
        Ok(_) => ("❌ No courses found. Send at least one line or /cancel.".to_string(), false),
        Err(e) => (format!("❌ {}\nFix the line and send the list again, or /cancel.", e), false),
    }
}
