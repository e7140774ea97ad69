//! Admin-only commands.

use aaescore::drive::{configured_roots, RebuildReport};
use aaescore::AppError;
use itertools::Itertools;

use super::handlers::HandlerDeps;

pub fn is_admin(admin_ids: &[u64], user_id: u64) -> bool {
    admin_ids.contains(&user_id)
}

pub fn format_report(report: &RebuildReport) -> String {
    let mut text = format!(
        "✅ Index rebuilt at {}\nFiles: {}",
        report.built_at.format("%Y-%m-%d %H:%M UTC"),
        report.total
    );
    if !report.per_type.is_empty() {
        let counts = report.per_type.iter().map(|(kind, n)| format!("{}: {}", kind, n)).join(", ");
        text.push_str(&format!("\nBy type: {}", counts));
    }
    if !report.skipped_roots.is_empty() {
        text.push_str(&format!("\n⚠️ Skipped roots: {}", report.skipped_roots.join(", ")));
    }
    text
}

/// Rebuilds the flat index from the configured roots and returns the reply text.
pub async fn rebuild_index(deps: &HandlerDeps) -> String {
    let result = deps.store.sync_roots(deps.provider.as_ref(), &configured_roots()).await;
    reply_for(result)
}

fn reply_for(result: Result<RebuildReport, AppError>) -> String {
    match result {
        Ok(report) => format_report(&report),
        Err(AppError::Validation(reason)) => format!("❌ Nothing to rebuild: {}", reason),
        Err(e) => {
            log::error!("Index rebuild failed: {}", e);
            format!("❌ Index rebuild failed: {}", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn test_is_admin() {
        assert!(is_admin(&[1, 42], 42));
        assert!(!is_admin(&[], 42));
    }

    #[test]
    fn test_reply_for_errors() {
        let reply = reply_for(Err(AppError::Validation("no index roots configured".to_string())));
        assert_eq!(reply, "❌ Nothing to rebuild: no index roots configured");

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let reply = reply_for(Err(aaescore::drive::IndexError::from(io).into()));
        assert!(reply.starts_with("❌ Index rebuild failed: Index error"));
    }

    #[test]
    fn test_format_report() {
        let report = RebuildReport {
            total: 5,
            per_type: BTreeMap::from([("pastq".to_string(), 2), ("slides".to_string(), 3)]),
            skipped_roots: vec!["loop".to_string()],
            built_at: Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap(),
        };
        assert_eq!(
            format_report(&report),
            "✅ Index rebuilt at 2026-03-01 08:30 UTC\nFiles: 5\nBy type: pastq: 2, slides: 3\n⚠️ Skipped roots: loop"
        );
    }
}
