//! Grievance lifecycle engine
//!
//! Pure functions over a record; the store commits the result. Status
//! transitions are unrestricted by design (administrative override is
//! allowed, e.g. resolved back to pending), so no transition is rejected.
//! Remarks and timeline are independent append-only logs: a remark never
//! produces a timeline event, and a transition never touches the remarks.

use crate::grievance::{Grievance, Status, TimelineEvent};
use crate::tracking;
use chrono::Utc;

/// Default timeline message when the actor supplies none
pub fn default_transition_message(status: Status) -> String {
    format!("Status updated to {}", status)
}

/// Apply a status change to a grievance
///
/// If the status actually changes, exactly one timeline event is appended
/// with the new status, the given actor and the message (or a default
/// derived from the status). A same-status call appends nothing. Either way
/// the returned record has `updated_at` bumped to now.
pub fn apply_status_change(
    grievance: &Grievance,
    new_status: Status,
    message: Option<&str>,
    actor: &str,
) -> Grievance {
    let now = Utc::now();
    let mut updated = grievance.clone();

    if new_status != grievance.status {
        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| default_transition_message(new_status));
        updated.timeline.push(TimelineEvent {
            id: tracking::generate_id("grv-evt"),
            status: new_status,
            message,
            timestamp: now,
            by: actor.to_string(),
        });
        updated.status = new_status;
    }

    updated.updated_at = now;
    updated
}

/// Append an admin remark to a grievance
///
/// The timeline is untouched; only the remark log grows.
pub fn add_remark(grievance: &Grievance, remark: &str) -> Grievance {
    let mut updated = grievance.clone();
    updated.admin_remarks.push(remark.to_string());
    updated.updated_at = Utc::now();
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grievance::{Category, NewGrievance};

    fn pending_grievance() -> Grievance {
        Grievance::register(
            "grv-test1".to_string(),
            "TMC2024001".to_string(),
            NewGrievance {
                citizen_id: "c1".to_string(),
                citizen_name: "Asha Patil".to_string(),
                category: Category::Garbage,
                ward: "Kalwa".to_string(),
                description: "Uncollected garbage for 5 days".to_string(),
                priority: None,
                location: None,
                image_ref: None,
            },
        )
    }

    #[test]
    fn test_transition_appends_one_event() {
        let g = pending_grievance();
        let updated = apply_status_change(&g, Status::Resolved, Some("Issue fixed"), "Admin");

        assert_eq!(updated.timeline.len(), g.timeline.len() + 1);
        let event = updated.timeline.last().unwrap();
        assert_eq!(event.status, Status::Resolved);
        assert_eq!(event.by, "Admin");
        assert_eq!(event.message, "Issue fixed");
        assert_eq!(updated.status, Status::Resolved);
        assert_eq!(updated.last_timeline_status(), Some(Status::Resolved));
    }

    #[test]
    fn test_same_status_appends_nothing() {
        let g = pending_grievance();
        let updated = apply_status_change(&g, g.status, Some("still looking"), "Admin");

        assert_eq!(updated.timeline.len(), g.timeline.len());
        assert_eq!(updated.status, g.status);
        assert!(updated.updated_at >= g.updated_at);
    }

    #[test]
    fn test_default_message_derived_from_status() {
        let g = pending_grievance();
        let updated = apply_status_change(&g, Status::InProgress, None, "Admin");

        let event = updated.timeline.last().unwrap();
        assert_eq!(event.message, "Status updated to in-progress");
    }

    #[test]
    fn test_timeline_timestamps_non_decreasing() {
        let g = pending_grievance();
        let g = apply_status_change(&g, Status::InProgress, None, "Admin");
        let g = apply_status_change(&g, Status::Escalated, None, "Admin");
        let g = apply_status_change(&g, Status::Resolved, None, "Field Officer");

        assert!(g.timeline.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(g.status, g.last_timeline_status().unwrap());
    }

    #[test]
    fn test_reopening_resolved_is_allowed() {
        // Unrestricted machine: administrative override back to pending
        let g = pending_grievance();
        let g = apply_status_change(&g, Status::Resolved, None, "Admin");
        let g = apply_status_change(&g, Status::Pending, Some("Reopened on appeal"), "Admin");

        assert_eq!(g.status, Status::Pending);
        assert_eq!(g.timeline.len(), 3);
    }

    #[test]
    fn test_remark_leaves_timeline_alone() {
        let g = pending_grievance();
        let updated = add_remark(&g, "Forwarded to sanitation department");

        assert_eq!(updated.timeline.len(), g.timeline.len());
        assert_eq!(updated.admin_remarks, vec!["Forwarded to sanitation department"]);
        assert_eq!(updated.status, g.status);
    }
}
