//! Grievance data model for griv
//!
//! A grievance is a citizen-filed complaint with an append-only status
//! timeline and an append-only admin remark log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Actor recorded on the registration timeline event
pub const SYSTEM_ACTOR: &str = "System";

/// Message recorded on the registration timeline event
pub const REGISTERED_MESSAGE: &str = "Complaint registered successfully";

/// Grievance status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Resolved,
    Escalated,
}

impl Status {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Status::Resolved)
    }
}

impl std::str::FromStr for Status {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "in-progress" | "in_progress" | "inprogress" => Ok(Status::InProgress),
            "resolved" => Ok(Status::Resolved),
            "escalated" => Ok(Status::Escalated),
            _ => Err(crate::Error::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pending => write!(f, "pending"),
            Status::InProgress => write!(f, "in-progress"),
            Status::Resolved => write!(f, "resolved"),
            Status::Escalated => write!(f, "escalated"),
        }
    }
}

/// Complaint category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    WaterSupply,
    RoadMaintenance,
    Garbage,
    Electricity,
    Drainage,
    #[default]
    Other,
}

impl Category {
    /// All categories, in submission-form order
    pub const ALL: [Category; 6] = [
        Category::WaterSupply,
        Category::RoadMaintenance,
        Category::Garbage,
        Category::Electricity,
        Category::Drainage,
        Category::Other,
    ];

    /// Human-readable label as shown on the submission form
    pub fn label(&self) -> &'static str {
        match self {
            Category::WaterSupply => "Water Supply",
            Category::RoadMaintenance => "Road Maintenance",
            Category::Garbage => "Garbage Collection",
            Category::Electricity => "Street Lighting",
            Category::Drainage => "Drainage Issues",
            Category::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "water-supply" | "water_supply" | "water" => Ok(Category::WaterSupply),
            "road-maintenance" | "road_maintenance" | "road" => Ok(Category::RoadMaintenance),
            "garbage" => Ok(Category::Garbage),
            "electricity" => Ok(Category::Electricity),
            "drainage" => Ok(Category::Drainage),
            "other" => Ok(Category::Other),
            _ => Err(crate::Error::InvalidCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::WaterSupply => write!(f, "water-supply"),
            Category::RoadMaintenance => write!(f, "road-maintenance"),
            Category::Garbage => write!(f, "garbage"),
            Category::Electricity => write!(f, "electricity"),
            Category::Drainage => write!(f, "drainage"),
            Category::Other => write!(f, "other"),
        }
    }
}

/// Grievance priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl std::str::FromStr for Priority {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(crate::Error::InvalidPriority(s.to_string())),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Critical => write!(f, "critical"),
        }
    }
}

/// Pinned map location for a grievance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// One immutable entry in a grievance's status timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Unique event id (grv-evt-xxxxxxxx)
    pub id: String,

    /// Status as of this event
    pub status: Status,

    /// Human-readable message for the event
    pub message: String,

    /// When the event was recorded
    pub timestamp: DateTime<Utc>,

    /// Actor name/role that recorded the event
    pub by: String,
}

/// Input for filing a new grievance
///
/// The submission UI resolves category/ward/identity before calling the
/// store; the store validates the rest.
#[derive(Debug, Clone)]
pub struct NewGrievance {
    pub citizen_id: String,
    pub citizen_name: String,
    pub category: Category,
    pub ward: String,
    pub description: String,
    pub priority: Option<Priority>,
    pub location: Option<Location>,
    pub image_ref: Option<String>,
}

/// Core grievance record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grievance {
    /// Opaque unique identifier (grv-xxxxxxxx), immutable
    pub id: String,

    /// Human-readable tracking code (TMC + 7 digits), immutable
    pub tracking_id: String,

    /// Submitting citizen (weak reference, trusted as given)
    pub citizen_id: String,

    /// Submitting citizen's display name
    pub citizen_name: String,

    /// Complaint category
    pub category: Category,

    /// Municipal ward the complaint belongs to
    pub ward: String,

    /// Free-text complaint description, never empty
    pub description: String,

    /// Current status, always equal to the last timeline entry's status
    pub status: Status,

    /// Priority
    pub priority: Priority,

    /// Optional pinned map location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Optional reference to an attached image in the media store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,

    /// When the grievance was filed
    pub created_at: DateTime<Utc>,

    /// When the grievance was last mutated
    pub updated_at: DateTime<Utc>,

    /// Handler the grievance is assigned to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    /// Admin remark log, append-only, independent of the timeline
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admin_remarks: Vec<String>,

    /// Status timeline, append-only, never reordered or deleted
    pub timeline: Vec<TimelineEvent>,
}

impl Grievance {
    /// Register a new grievance
    ///
    /// Status is forced to `pending` and the timeline is seeded with one
    /// registration event authored by the system.
    pub fn register(id: String, tracking_id: String, input: NewGrievance) -> Self {
        let now = Utc::now();
        Self {
            id,
            tracking_id,
            citizen_id: input.citizen_id,
            citizen_name: input.citizen_name,
            category: input.category,
            ward: input.ward,
            description: input.description,
            status: Status::Pending,
            priority: input.priority.unwrap_or_default(),
            location: input.location,
            image_ref: input.image_ref,
            created_at: now,
            updated_at: now,
            assigned_to: None,
            admin_remarks: Vec::new(),
            timeline: vec![TimelineEvent {
                id: crate::tracking::generate_id("grv-evt"),
                status: Status::Pending,
                message: REGISTERED_MESSAGE.to_string(),
                timestamp: now,
                by: SYSTEM_ACTOR.to_string(),
            }],
        }
    }

    /// Status recorded by the most recent timeline event
    pub fn last_timeline_status(&self) -> Option<Status> {
        self.timeline.last().map(|e| e.status)
    }

    /// Elapsed time between filing and last update, in fractional days
    pub fn age_days(&self) -> f64 {
        (self.updated_at - self.created_at).num_milliseconds() as f64 / 86_400_000.0
    }
}

impl std::fmt::Display for Grievance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] [{}] {} ({}) - {}",
            self.tracking_id, self.priority, self.category, self.status, self.ward, self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> NewGrievance {
        NewGrievance {
            citizen_id: "citizen-1".to_string(),
            citizen_name: "Asha Patil".to_string(),
            category: Category::Garbage,
            ward: "Kalwa".to_string(),
            description: "Uncollected garbage for 5 days".to_string(),
            priority: None,
            location: None,
            image_ref: None,
        }
    }

    #[test]
    fn test_register_seeds_pending_timeline() {
        let g = Grievance::register("grv-test1".into(), "TMC2024001".into(), sample_input());

        assert_eq!(g.status, Status::Pending);
        assert_eq!(g.timeline.len(), 1);
        assert_eq!(g.timeline[0].status, Status::Pending);
        assert_eq!(g.timeline[0].by, SYSTEM_ACTOR);
        assert_eq!(g.timeline[0].message, REGISTERED_MESSAGE);
        assert_eq!(g.priority, Priority::Medium);
        assert_eq!(g.updated_at, g.created_at);
    }

    #[test]
    fn test_status_parse_accepts_kebab_and_snake() {
        assert_eq!("in-progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("in_progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("Resolved".parse::<Status>().unwrap(), Status::Resolved);
        assert!("done".parse::<Status>().is_err());
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::Electricity.label(), "Street Lighting");
        assert_eq!("water-supply".parse::<Category>().unwrap(), Category::WaterSupply);
        assert!("potholes".parse::<Category>().is_err());
    }
}
