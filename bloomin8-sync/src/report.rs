//! Human-readable run reports: gallery listing, pre-sync overview and the
//! post-sync summary. Rendered to strings so the orchestrator can log them
//! line by line.

use crate::reconcile::{SyncPlan, SyncResult};
use bloomin8_client::transfer::progress::{format_megabytes, format_speed};
use std::fmt::Write;

const RULE: &str = "============================================================";

/// One line of the gallery enumeration.
pub fn gallery_line(name: &str, image_count: Option<u64>, is_target: bool) -> String {
    let marker = if is_target { " [TARGET]" } else { "" };
    match image_count {
        Some(count) => format!("  - {} ({} images){}", name, count, marker),
        None => format!("  - {}{}", name, marker),
    }
}

fn section<I, S>(out: &mut String, title: &str, symbol: char, names: I)
where
    I: ExactSizeIterator<Item = S>,
    S: AsRef<str>,
{
    let _ = writeln!(out, "\n{} ({}):", title, names.len());
    let mut any = false;
    for name in names {
        any = true;
        let _ = writeln!(out, "  {} {}", symbol, name.as_ref());
    }
    if !any {
        let _ = writeln!(out, "  (none)");
    }
}

/// Overview shown before confirmation.
///
/// `orphans` are the remote names with no local file; they are listed even
/// when mirror mode is off and nothing will be deleted.
pub fn overview(gallery: &str, gallery_exists: bool, plan: &SyncPlan, orphans: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "SYNCHRONIZATION OVERVIEW");
    let _ = writeln!(out, "{}", RULE);

    if !gallery_exists {
        let _ = writeln!(out, "\nGallery to create: {}", gallery);
    }

    section(
        &mut out,
        "New files to upload",
        '+',
        plan.to_upload.iter().map(|image| image.filename.as_str()),
    );
    section(
        &mut out,
        "Existing files (already on device)",
        '=',
        plan.unchanged.iter().map(|image| image.filename.as_str()),
    );
    section(&mut out, "Files to remove from device", '-', orphans.iter());

    let _ = writeln!(out, "\n{}", RULE);
    out
}

/// Summary after `execute`; warnings for failures come last.
pub fn summary(result: &SyncResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "SYNCHRONIZATION COMPLETE");
    let _ = writeln!(out, "{}", RULE);

    let _ = writeln!(out, "\nFiles uploaded: {}/{}", result.uploaded, result.planned_uploads);
    if result.planned_deletes > 0 {
        let _ = writeln!(out, "Files deleted: {}/{}", result.deleted, result.planned_deletes);
    }

    if !result.elapsed.is_zero() && result.bytes_transferred > 0 {
        let _ = writeln!(out, "Total time: {:.2} seconds", result.elapsed.as_secs_f64());
        let _ = writeln!(out, "Total data transferred: {}", format_megabytes(result.bytes_transferred));
        let _ = writeln!(out, "Average upload speed: {}", format_speed(result.average_speed()));
    }

    if result.upload_failures > 0 {
        let _ = writeln!(out, "\nWarning: {} file(s) failed to upload", result.upload_failures);
    }
    if result.delete_failures > 0 {
        let _ = writeln!(out, "Warning: {} file(s) failed to delete", result.delete_failures);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::plan::fixtures::{local, remote};
    use crate::reconcile::{orphans, plan};
    use std::time::Duration;

    #[test]
    fn test_gallery_line() {
        assert_eq!(gallery_line("default", Some(3), false), "  - default (3 images)");
        assert_eq!(gallery_line("bloomin8-sync", Some(0), true), "  - bloomin8-sync (0 images) [TARGET]");
        assert_eq!(gallery_line("broken", None, false), "  - broken");
    }

    #[test]
    fn test_overview_lists_every_group() {
        let local = local(&["a.jpg", "b.jpg"]);
        let remote = remote(&["b.jpg", "c.jpg"]);
        let plan = plan(&local, &remote, false);
        let text = overview("family", true, &plan, &orphans(&local, &remote));

        assert!(text.contains("New files to upload (1):\n  + a.jpg"));
        assert!(text.contains("Existing files (already on device) (1):\n  = b.jpg"));
        assert!(text.contains("Files to remove from device (1):\n  - c.jpg"));
        assert!(!text.contains("Gallery to create"));
    }

    #[test]
    fn test_overview_for_new_gallery() {
        let plan = plan(&local(&["a.jpg"]), &[], true);
        let text = overview("holiday", false, &plan, &[]);

        assert!(text.contains("Gallery to create: holiday"));
        assert!(text.contains("Existing files (already on device) (0):\n  (none)"));
        assert!(text.contains("Files to remove from device (0):\n  (none)"));
    }

    #[test]
    fn test_summary_with_failures() {
        let result = SyncResult {
            planned_uploads: 3,
            uploaded: 2,
            upload_failures: 1,
            planned_deletes: 1,
            deleted: 1,
            delete_failures: 0,
            bytes_transferred: 3 * 1024 * 1024,
            elapsed: Duration::from_secs(2),
        };
        let text = summary(&result);

        assert!(text.contains("Files uploaded: 2/3"));
        assert!(text.contains("Files deleted: 1/1"));
        assert!(text.contains("Total time: 2.00 seconds"));
        assert!(text.contains("Total data transferred: 3.00 MB"));
        assert!(text.contains("Average upload speed: 1.50 MB/s"));
        assert!(text.contains("Warning: 1 file(s) failed to upload"));
        assert!(!text.contains("failed to delete"));
    }

    #[test]
    fn test_summary_slow_link_uses_kilobytes() {
        let result = SyncResult {
            planned_uploads: 1,
            uploaded: 1,
            bytes_transferred: 512 * 1024,
            elapsed: Duration::from_secs(1),
            ..SyncResult::default()
        };
        let text = summary(&result);
        assert!(text.contains("Average upload speed: 512.00 KB/s"));
        assert!(!text.contains("Files deleted"));
    }
}
