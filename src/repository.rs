//! Volunteer lookup.
//!
//! The certificate service only needs `get` and `list`, expressed by [`VolunteerRepository`].
//! [`InMemoryVolunteerStore`] backs it with an ordered map that can be seeded with the sample
//! roster or loaded from a JSON array of [`VolunteerRecord`]s.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::info;

use crate::error::RosterError;
use crate::record::{VolunteerId, VolunteerRecord};

/// Read access to volunteer records.
pub trait VolunteerRepository {
    /// Returns the record for `id`, or `None` when the id is unknown.
    fn get(&self, id: VolunteerId) -> Option<VolunteerRecord>;

    /// Returns every record, ordered by id.
    fn list(&self) -> Vec<VolunteerRecord>;
}

impl<R: VolunteerRepository + ?Sized> VolunteerRepository for &R {
    fn get(&self, id: VolunteerId) -> Option<VolunteerRecord> {
        (**self).get(id)
    }

    fn list(&self) -> Vec<VolunteerRecord> {
        (**self).list()
    }
}

/// A volunteer roster held in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryVolunteerStore {
    records: BTreeMap<VolunteerId, VolunteerRecord>,
}

impl InMemoryVolunteerStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `records`; later records replace earlier ones with the same id.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = VolunteerRecord>,
    {
        let mut store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Inserts or replaces a record, returning the previous one.
    pub fn insert(&mut self, record: VolunteerRecord) -> Option<VolunteerRecord> {
        self.records.insert(record.id, record)
    }

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Parses a JSON array of records.
    pub fn from_json_str(json: &str) -> Result<Self, RosterError> {
        let records: Vec<VolunteerRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    /// Loads a JSON array of records from `path`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let store = Self::from_json_str(&json)?;
        info!("Loaded {} volunteers from {}", store.len(), path.display());
        Ok(store)
    }

    /// The sample roster the EventIQ demo ships with.
    pub fn sample() -> Self {
        Self::from_records([
            VolunteerRecord::new(1, "John Smith", 25.0)
                .with_email("john.smith@example.com")
                .with_role("Registration Coordinator")
                .with_booth_assignment("Registration Desk")
                .with_skills(["Communication", "Organization"]),
            VolunteerRecord::new(2, "Sarah Johnson", 18.0)
                .with_email("sarah.johnson@example.com")
                .with_role("Event Setup Assistant")
                .with_booth_assignment("Main Stage Area")
                .with_skills(["Technical Setup", "Coordination"]),
            VolunteerRecord::new(3, "Mike Wilson", 22.0)
                .with_email("mike.wilson@example.com")
                .with_role("Information Desk Volunteer")
                .with_booth_assignment("Information Booth")
                .with_skills(["Customer Service", "Problem Solving"]),
        ])
    }
}

impl VolunteerRepository for InMemoryVolunteerStore {
    fn get(&self, id: VolunteerId) -> Option<VolunteerRecord> {
        self.records.get(&id).cloned()
    }

    fn list(&self) -> Vec<VolunteerRecord> {
        self.records.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_roster_has_three_active_volunteers() {
        let store = InMemoryVolunteerStore::sample();
        let records = store.list();

        assert_eq!(records.len(), 3);
        assert_eq!(
            records.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(records.iter().all(|r| r.is_active && r.total_hours > 0.0));
        assert_eq!(
            store.get(1).and_then(|r| r.booth_assignment),
            Some("Registration Desk".to_owned())
        );
    }

    #[test]
    fn unknown_id_is_none() {
        assert!(InMemoryVolunteerStore::sample().get(42).is_none());
    }

    #[test]
    fn list_is_ordered_by_id() {
        let store = InMemoryVolunteerStore::from_records([
            VolunteerRecord::new(9, "Nine", 1.0),
            VolunteerRecord::new(2, "Two", 1.0),
            VolunteerRecord::new(5, "Five", 1.0),
        ]);
        let ids: Vec<_> = store.list().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn insert_replaces_existing_record() {
        let mut store = InMemoryVolunteerStore::new();
        assert!(store.insert(VolunteerRecord::new(1, "First", 1.0)).is_none());
        let previous = store.insert(VolunteerRecord::new(1, "Second", 2.0));

        assert_eq!(previous.map(|r| r.full_name), Some("First".to_owned()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn json_roster_loads() {
        let store = InMemoryVolunteerStore::from_json_str(
            r#"[
                {"id": 4, "full_name": "Lin Park", "total_hours": 12.5,
                 "booth_assignments": [{"booth_id": 1, "booth_name": "Booth A"},
                                       {"booth_name": "Booth B"}]},
                {"id": 5, "full_name": "Sam Ortiz", "is_active": false}
            ]"#,
        )
        .expect("roster parses");

        let lin = store.get(4).expect("record 4 present");
        assert_eq!(lin.assignment_display(), "Booth A, Booth B");
        let sam = store.get(5).expect("record 5 present");
        assert_eq!(sam.total_hours, 0.0);
        assert!(!sam.is_active);
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = InMemoryVolunteerStore::from_json_str("{\"id\": 1}").unwrap_err();
        assert!(matches!(err, RosterError::Json(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = InMemoryVolunteerStore::from_json_file("/__eventiq_missing_roster__.json")
            .unwrap_err();
        assert!(err.to_string().contains("__eventiq_missing_roster__"));
    }
}
