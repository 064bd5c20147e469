//! Aggregate statistics over the grievance set
//!
//! A pure fold: no side effects, no hidden state. The presentation layer
//! rounds for display; the engine does not.

use crate::grievance::{Grievance, Status};
use serde::Serialize;
use std::collections::BTreeMap;

/// Dashboard statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub escalated: usize,

    /// Count per ward; wards absent from the input are omitted, not zeroed
    pub by_ward: BTreeMap<String, usize>,

    /// Count per category, same omission rule
    pub by_category: BTreeMap<String, usize>,

    /// Mean of (updated_at - created_at) in fractional days over resolved
    /// grievances; 0.0 when none are resolved
    pub avg_resolution_days: f64,
}

/// Compute aggregate statistics for a grievance snapshot
pub fn compute_stats(grievances: &[&Grievance]) -> Stats {
    let mut stats = Stats {
        total: grievances.len(),
        ..Stats::default()
    };

    let mut resolution_days_sum = 0.0;

    for g in grievances {
        match g.status {
            Status::Pending => stats.pending += 1,
            Status::InProgress => stats.in_progress += 1,
            Status::Resolved => stats.resolved += 1,
            Status::Escalated => stats.escalated += 1,
        }

        *stats.by_ward.entry(g.ward.clone()).or_insert(0) += 1;
        *stats.by_category.entry(g.category.to_string()).or_insert(0) += 1;

        if g.status.is_resolved() {
            resolution_days_sum += g.age_days();
        }
    }

    if stats.resolved > 0 {
        stats.avg_resolution_days = resolution_days_sum / stats.resolved as f64;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grievance::{Category, NewGrievance};
    use chrono::Duration;

    fn grievance(ward: &str, category: Category, status: Status, open_days: i64) -> Grievance {
        let mut g = Grievance::register(
            crate::tracking::generate_id("grv"),
            "TMC2024001".to_string(),
            NewGrievance {
                citizen_id: "c1".to_string(),
                citizen_name: "Citizen".to_string(),
                category,
                ward: ward.to_string(),
                description: "test complaint".to_string(),
                priority: None,
                location: None,
                image_ref: None,
            },
        );
        g.status = status;
        g.created_at -= Duration::days(open_days);
        for event in &mut g.timeline {
            event.timestamp = g.created_at;
        }
        g
    }

    #[test]
    fn test_counts_and_avg_resolution() {
        let set = vec![
            grievance("Kalwa", Category::Garbage, Status::Pending, 0),
            grievance("Kopri", Category::Drainage, Status::Pending, 0),
            grievance("Kalwa", Category::WaterSupply, Status::Pending, 0),
            grievance("Diva", Category::Garbage, Status::Resolved, 1),
            grievance("Kalwa", Category::Electricity, Status::Resolved, 3),
        ];
        let refs: Vec<&Grievance> = set.iter().collect();
        let stats = compute_stats(&refs);

        assert_eq!(stats.total, 5);
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.resolved, 2);
        assert_eq!(stats.in_progress, 0);
        assert_eq!(stats.escalated, 0);
        assert!((stats.avg_resolution_days - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_resolved_means_zero_avg() {
        let set = vec![
            grievance("Kalwa", Category::Garbage, Status::Pending, 4),
            grievance("Kopri", Category::Drainage, Status::Escalated, 9),
        ];
        let refs: Vec<&Grievance> = set.iter().collect();
        let stats = compute_stats(&refs);

        assert_eq!(stats.resolved, 0);
        assert_eq!(stats.avg_resolution_days, 0.0);
        assert_eq!(stats.escalated, 1);
    }

    #[test]
    fn test_breakdowns_omit_absent_keys() {
        let set = vec![
            grievance("Kalwa", Category::Garbage, Status::Pending, 0),
            grievance("Kalwa", Category::Garbage, Status::InProgress, 0),
            grievance("Mumbra", Category::Drainage, Status::Pending, 0),
        ];
        let refs: Vec<&Grievance> = set.iter().collect();
        let stats = compute_stats(&refs);

        assert_eq!(stats.by_ward.get("Kalwa"), Some(&2));
        assert_eq!(stats.by_ward.get("Mumbra"), Some(&1));
        assert!(!stats.by_ward.contains_key("Diva"));
        assert_eq!(stats.by_category.get("garbage"), Some(&2));
        assert!(!stats.by_category.contains_key("electricity"));
    }

    #[test]
    fn test_empty_input() {
        let stats = compute_stats(&[]);
        assert_eq!(stats, Stats::default());
    }
}
