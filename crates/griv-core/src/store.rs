//! JSONL store for griv grievances
//!
//! Owns the authoritative grievance set for the running session, with
//! secondary indices by citizen and by tracking code. One record per line,
//! timeline nested as an array. No database, no daemon - just files.

use crate::config::Config;
use crate::grievance::{Grievance, Location, NewGrievance, Priority, Status, TimelineEvent};
use crate::{Error, Result, tracking};
use chrono::Utc;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

const GRIV_DIR: &str = ".griv";
const GRIEVANCES_FILE: &str = "grievances.jsonl";
const CONFIG_FILE: &str = "config.toml";

/// Partial update applied by [`GrievanceStore::update`]
///
/// The store merges whatever is present and bumps `updated_at`; it does not
/// check that `status` and `timeline` stay consistent. Callers that change
/// status go through the lifecycle engine, which supplies both together.
#[derive(Debug, Clone, Default)]
pub struct GrievancePatch {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the assignment
    pub assigned_to: Option<Option<String>>,
    pub description: Option<String>,
    pub location: Option<Location>,
    pub image_ref: Option<String>,
    pub timeline: Option<Vec<TimelineEvent>>,
    pub admin_remarks: Option<Vec<String>>,
}

/// In-memory grievance store with optional JSONL persistence
pub struct GrievanceStore {
    /// Repository root; `None` for a purely in-memory store
    root: Option<PathBuf>,
    config: Config,
    records: HashMap<String, Grievance>,
    /// Record ids, most-recent-first
    order: Vec<String>,
    /// Lowercased tracking code -> record id
    by_tracking: HashMap<String, String>,
    /// Citizen id -> record ids, most-recent-first
    by_citizen: HashMap<String, Vec<String>>,
    /// Next tracking sequence to issue, never reused
    next_seq: u64,
}

impl GrievanceStore {
    /// Create a store with no backing file
    ///
    /// Used by tests and embedders that manage persistence themselves.
    pub fn in_memory(config: Config) -> Self {
        let next_seq = config.series_base + 1;
        Self {
            root: None,
            config,
            records: HashMap::new(),
            order: Vec::new(),
            by_tracking: HashMap::new(),
            by_citizen: HashMap::new(),
            next_seq,
        }
    }

    /// Find and open the store for the current directory
    pub fn open() -> Result<Self> {
        let root = Self::find_root()?;
        let config = Config::load(&root.join(GRIV_DIR).join(CONFIG_FILE))?;
        let mut store = Self {
            root: Some(root),
            next_seq: config.series_base + 1,
            config,
            records: HashMap::new(),
            order: Vec::new(),
            by_tracking: HashMap::new(),
            by_citizen: HashMap::new(),
        };
        store.load()?;
        Ok(store)
    }

    /// Initialize a new store in the current directory
    pub fn init(series_base: Option<u64>) -> Result<Self> {
        let root = std::env::current_dir()?;
        let griv_dir = root.join(GRIV_DIR);

        if griv_dir.exists() {
            return Err(Error::AlreadyInitialized(griv_dir.display().to_string()));
        }

        fs::create_dir_all(&griv_dir)?;

        let mut config = Config::default();
        if let Some(base) = series_base {
            config.series_base = base;
            config.save(&griv_dir.join(CONFIG_FILE))?;
        } else {
            fs::write(griv_dir.join(CONFIG_FILE), Config::default_with_comments())?;
        }

        // Create empty grievances file
        fs::write(griv_dir.join(GRIEVANCES_FILE), "")?;

        Ok(Self {
            root: Some(root),
            next_seq: config.series_base + 1,
            config,
            records: HashMap::new(),
            order: Vec::new(),
            by_tracking: HashMap::new(),
            by_citizen: HashMap::new(),
        })
    }

    /// Find the repository root (directory containing .griv)
    fn find_root() -> Result<PathBuf> {
        let mut current = std::env::current_dir()?;
        loop {
            if current.join(GRIV_DIR).exists() {
                return Ok(current);
            }
            if !current.pop() {
                return Err(Error::NotInitialized);
            }
        }
    }

    /// Path to the .griv directory
    ///
    /// Errors for in-memory stores, which have no filesystem footprint.
    pub fn griv_dir(&self) -> Result<PathBuf> {
        self.root
            .as_ref()
            .map(|r| r.join(GRIV_DIR))
            .ok_or(Error::NotInitialized)
    }

    /// Path to grievances.jsonl
    pub fn grievances_path(&self) -> Result<PathBuf> {
        Ok(self.griv_dir()?.join(GRIEVANCES_FILE))
    }

    /// Path to config.toml
    pub fn config_path(&self) -> Result<PathBuf> {
        Ok(self.griv_dir()?.join(CONFIG_FILE))
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load all grievances from JSONL and rebuild indices
    fn load(&mut self) -> Result<()> {
        let path = self.grievances_path()?;
        if !path.exists() {
            return Ok(());
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let grievance: Grievance = serde_json::from_str(&line)?;
            self.records.insert(grievance.id.clone(), grievance);
        }

        // Most-recent-first order, then indices
        let mut ids: Vec<String> = self.records.keys().cloned().collect();
        ids.sort_by(|a, b| {
            let ga = &self.records[a];
            let gb = &self.records[b];
            gb.created_at.cmp(&ga.created_at).then_with(|| gb.tracking_id.cmp(&ga.tracking_id))
        });
        self.order = ids;

        self.by_tracking.clear();
        self.by_citizen.clear();
        let mut max_seq = self.config.series_base;
        for id in &self.order {
            let g = &self.records[id];
            self.by_tracking.insert(g.tracking_id.to_lowercase(), id.clone());
            self.by_citizen.entry(g.citizen_id.clone()).or_default().push(id.clone());
            if let Some(seq) = tracking::parse_tracking_seq(&g.tracking_id) {
                max_seq = max_seq.max(seq);
            }
        }
        self.next_seq = max_seq + 1;

        Ok(())
    }

    /// Save all grievances to JSONL
    ///
    /// No-op for in-memory stores.
    pub fn save(&self) -> Result<()> {
        if self.root.is_none() {
            return Ok(());
        }
        let path = self.grievances_path()?;
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);

        for id in &self.order {
            if let Some(grievance) = self.records.get(id) {
                serde_json::to_writer(&mut writer, grievance)?;
                writeln!(writer)?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// File a new grievance
    ///
    /// Validates the input, assigns the record id and the next tracking code,
    /// forces status to pending and seeds the timeline with the registration
    /// event. The new record goes to the head of the order.
    pub fn create(&mut self, input: NewGrievance) -> Result<Grievance> {
        if input.description.trim().is_empty() {
            return Err(Error::Validation("description must not be empty".to_string()));
        }
        if input.citizen_id.trim().is_empty() {
            return Err(Error::Validation("citizen id must not be empty".to_string()));
        }
        if !self.config.has_ward(&input.ward) {
            return Err(Error::UnknownWard(input.ward));
        }

        let mut input = input;
        if input.priority.is_none() {
            input.priority = self.config.default_priority.parse().ok();
        }

        let id = tracking::generate_id("grv");
        let tracking_id = tracking::format_tracking_id(self.next_seq);
        self.next_seq += 1;

        let grievance = Grievance::register(id.clone(), tracking_id.clone(), input);

        self.by_tracking.insert(tracking_id.to_lowercase(), id.clone());
        self.by_citizen
            .entry(grievance.citizen_id.clone())
            .or_default()
            .insert(0, id.clone());
        self.order.insert(0, id.clone());
        self.records.insert(id, grievance.clone());
        self.save()?;

        Ok(grievance)
    }

    /// Merge a patch onto an existing record
    ///
    /// Always bumps `updated_at`, even for an empty patch.
    pub fn update(&mut self, id: &str, patch: GrievancePatch) -> Result<Grievance> {
        let grievance = self
            .records
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if let Some(status) = patch.status {
            grievance.status = status;
        }
        if let Some(priority) = patch.priority {
            grievance.priority = priority;
        }
        if let Some(assigned_to) = patch.assigned_to {
            grievance.assigned_to = assigned_to;
        }
        if let Some(description) = patch.description {
            grievance.description = description;
        }
        if let Some(location) = patch.location {
            grievance.location = Some(location);
        }
        if let Some(image_ref) = patch.image_ref {
            grievance.image_ref = Some(image_ref);
        }
        if let Some(timeline) = patch.timeline {
            grievance.timeline = timeline;
        }
        if let Some(admin_remarks) = patch.admin_remarks {
            grievance.admin_remarks = admin_remarks;
        }
        grievance.updated_at = Utc::now();

        let grievance = grievance.clone();
        self.save()?;
        Ok(grievance)
    }

    /// Replace a record the lifecycle engine produced
    ///
    /// Timestamps are taken as given; the lifecycle engine already set them.
    pub fn commit(&mut self, grievance: Grievance) -> Result<()> {
        if !self.records.contains_key(&grievance.id) {
            return Err(Error::NotFound(grievance.id));
        }
        self.records.insert(grievance.id.clone(), grievance);
        self.save()
    }

    /// Get a grievance by record id
    pub fn get(&self, id: &str) -> Option<&Grievance> {
        self.records.get(id)
    }

    /// Get a grievance by tracking code, case-insensitive
    pub fn get_by_tracking(&self, code: &str) -> Option<&Grievance> {
        self.by_tracking
            .get(&code.trim().to_lowercase())
            .and_then(|id| self.records.get(id))
    }

    /// All grievances filed by a citizen, most-recent-first
    pub fn get_by_citizen(&self, citizen_id: &str) -> Vec<&Grievance> {
        self.by_citizen
            .get(citizen_id)
            .map(|ids| ids.iter().filter_map(|id| self.records.get(id)).collect())
            .unwrap_or_default()
    }

    /// Full snapshot, most-recent-first
    pub fn all(&self) -> Vec<&Grievance> {
        self.order.iter().filter_map(|id| self.records.get(id)).collect()
    }

    /// Number of grievances in the store
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store has no grievances
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grievance::Category;

    fn store() -> GrievanceStore {
        GrievanceStore::in_memory(Config::default())
    }

    fn input(citizen: &str, ward: &str, description: &str) -> NewGrievance {
        NewGrievance {
            citizen_id: citizen.to_string(),
            citizen_name: format!("Citizen {}", citizen),
            category: Category::Garbage,
            ward: ward.to_string(),
            description: description.to_string(),
            priority: None,
            location: None,
            image_ref: None,
        }
    }

    #[test]
    fn test_create_assigns_sequential_tracking_codes() {
        let mut store = store();
        let first = store.create(input("c1", "Kalwa", "Uncollected garbage for 5 days")).unwrap();
        let second = store.create(input("c1", "Kopri", "Overflowing bins")).unwrap();

        assert_eq!(first.tracking_id, "TMC2024001");
        assert_eq!(second.tracking_id, "TMC2024002");
        assert_ne!(first.id, second.id);
        assert_eq!(first.status, Status::Pending);
        assert_eq!(first.timeline.len(), 1);
    }

    #[test]
    fn test_tracking_codes_match_contract() {
        let mut store = store();
        for i in 0..5 {
            let g = store.create(input("c1", "Kalwa", &format!("complaint {}", i))).unwrap();
            assert!(tracking::is_tracking_id(&g.tracking_id));
        }
        let codes: std::collections::HashSet<_> =
            store.all().iter().map(|g| g.tracking_id.clone()).collect();
        assert_eq!(codes.len(), 5);
    }

    #[test]
    fn test_all_is_most_recent_first() {
        let mut store = store();
        store.create(input("c1", "Kalwa", "first")).unwrap();
        store.create(input("c2", "Kopri", "second")).unwrap();
        store.create(input("c1", "Diva", "third")).unwrap();

        let all = store.all();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].description, "third");
        assert_eq!(all[2].description, "first");
    }

    #[test]
    fn test_get_by_tracking_is_case_insensitive() {
        let mut store = store();
        let g = store.create(input("c1", "Kalwa", "streetlight out")).unwrap();

        let found = store.get_by_tracking(&g.tracking_id.to_lowercase()).unwrap();
        assert_eq!(found.id, g.id);
        assert!(store.get_by_tracking("TMC9999999").is_none());
    }

    #[test]
    fn test_get_by_citizen_preserves_order() {
        let mut store = store();
        store.create(input("c1", "Kalwa", "first")).unwrap();
        store.create(input("c2", "Kopri", "other citizen")).unwrap();
        store.create(input("c1", "Diva", "second")).unwrap();

        let mine = store.get_by_citizen("c1");
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].description, "second");
        assert_eq!(mine[1].description, "first");
        assert!(store.get_by_citizen("nobody").is_empty());
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let mut store = store();

        let err = store.create(input("c1", "Kalwa", "   ")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = store.create(input("", "Kalwa", "valid description")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = store.create(input("c1", "Atlantis", "valid description")).unwrap_err();
        assert!(matches!(err, Error::UnknownWard(_)));
    }

    #[test]
    fn test_update_merges_and_bumps_updated_at() {
        let mut store = store();
        let g = store.create(input("c1", "Kalwa", "pothole")).unwrap();

        let patch = GrievancePatch {
            priority: Some(Priority::High),
            assigned_to: Some(Some("Municipal Officer".to_string())),
            ..Default::default()
        };
        let updated = store.update(&g.id, patch).unwrap();

        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.assigned_to.as_deref(), Some("Municipal Officer"));
        assert!(updated.updated_at >= g.updated_at);
        // untouched fields survive the merge
        assert_eq!(updated.description, "pothole");
        assert_eq!(updated.tracking_id, g.tracking_id);
    }

    #[test]
    fn test_update_unknown_id_fails() {
        let mut store = store();
        let err = store.update("grv-missing", GrievancePatch::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_commit_unknown_record_fails() {
        let mut store = store();
        let g = Grievance::register(
            "grv-ghost".to_string(),
            "TMC2024999".to_string(),
            input("c1", "Kalwa", "never created through the store"),
        );
        assert!(matches!(store.commit(g), Err(Error::NotFound(_))));
    }
}
