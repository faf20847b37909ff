//! The catalog: an insertion-ordered map of patient records.
//!
//! Serialized as a JSON object whose key order is the insertion order.
//! Identifier assignment depends on that order, so the catalog keeps its
//! entries in a `Vec` rather than a hash map. Lookups are linear; catalogs
//! hold tens to low thousands of records.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{PatientId, PatientRecord, SortField, SortOrder};

/// Insertion-ordered mapping from identifier to record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<(PatientId, PatientRecord)>,
}

/// Content hash of a catalog. Two catalogs with the same entries in the
/// same order have the same revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogRevision(String);

impl CatalogRevision {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact-match lookup.
    pub fn get(&self, id: &str) -> Option<&PatientRecord> {
        self.entries
            .iter()
            .find(|(key, _)| key.as_str() == id)
            .map(|(_, record)| record)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&PatientId, &PatientRecord)> {
        self.entries.iter().map(|(id, record)| (id, record))
    }

    /// Records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &PatientRecord> {
        self.entries.iter().map(|(_, record)| record)
    }

    /// Identifier the next appended record receives: `size + 1`, advanced
    /// past any identifier already taken.
    pub fn next_id(&self) -> PatientId {
        let mut sequence = self.entries.len() + 1;
        loop {
            let candidate = PatientId::from_sequence(sequence);
            if !self.contains(candidate.as_str()) {
                return candidate;
            }
            sequence += 1;
        }
    }

    /// Append a record under a freshly generated identifier.
    pub fn append(&mut self, record: PatientRecord) -> PatientId {
        let id = self.next_id();
        self.entries.push((id.clone(), record));
        id
    }

    /// Insert under an explicit key. An existing key keeps its position and
    /// takes the new value (last write wins, as with a JSON object).
    pub fn insert(&mut self, id: PatientId, record: PatientRecord) -> Option<PatientRecord> {
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some((_, slot)) => Some(std::mem::replace(slot, record)),
            None => {
                self.entries.push((id, record));
                None
            }
        }
    }

    /// Records ordered by a measurement. The sort is stable, so ties keep
    /// insertion order.
    pub fn sorted_by(&self, field: SortField, order: SortOrder) -> Vec<PatientRecord> {
        let mut records: Vec<PatientRecord> = self.records().cloned().collect();
        records.sort_by(|a, b| {
            let ordering = a.field(field).total_cmp(&b.field(field));
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
        records
    }

    /// Content revision: blake3 over the compact JSON encoding.
    ///
    /// Encoding a catalog cannot fail: keys are strings, every record field
    /// is a string or a number, and the hasher's writer never errors.
    pub fn revision(&self) -> CatalogRevision {
        let mut hasher = blake3::Hasher::new();
        let encoded = serde_json::to_writer(&mut hasher, self);
        debug_assert!(encoded.is_ok(), "catalog encoding failed: {encoded:?}");
        CatalogRevision(hasher.finalize().to_hex().to_string())
    }

    /// Parse a persisted catalog document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Encode as the persisted document: pretty JSON, 4-space indent.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        Ok(out)
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, record) in &self.entries {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = Catalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of patient identifiers to records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Catalog, A::Error> {
                let mut catalog = Catalog::new();
                while let Some((id, record)) = access.next_entry::<PatientId, PatientRecord>()? {
                    catalog.insert(id, record);
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

impl FromIterator<(PatientId, PatientRecord)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (PatientId, PatientRecord)>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for (id, record) in iter {
            catalog.insert(id, record);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, bmi: f64) -> PatientRecord {
        PatientRecord {
            name: name.to_string(),
            city: "Unknown".to_string(),
            age: 30,
            gender: "male".to_string(),
            height: 1.75,
            weight: 70.0,
            bmi,
            verdict: "Normal".to_string(),
        }
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.append(record("a", 20.0)), "P001");
        assert_eq!(catalog.append(record("b", 21.0)), "P002");
        assert_eq!(catalog.append(record("c", 22.0)), "P003");
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_next_id_skips_occupied_slot() {
        // P001 removed out-of-band: size is 1, so size+1 = P002 is taken.
        let catalog: Catalog = [(PatientId::from("P002"), record("b", 21.0))]
            .into_iter()
            .collect();
        assert_eq!(catalog.next_id(), "P003");
    }

    #[test]
    fn test_key_order_survives_roundtrip() {
        let catalog: Catalog = [
            (PatientId::from("P010"), record("z", 20.0)),
            (PatientId::from("P002"), record("y", 21.0)),
            (PatientId::from("P001"), record("x", 22.0)),
        ]
        .into_iter()
        .collect();
        let bytes = catalog.to_json_pretty().unwrap();
        let back = Catalog::from_json(&bytes).unwrap();
        let ids: Vec<&str> = back.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["P010", "P002", "P001"]);
        assert_eq!(back, catalog);
    }

    #[test]
    fn test_floats_survive_roundtrip_bit_for_bit() {
        let mut catalog = Catalog::new();
        let mut r = record("a", 20.0);
        r.weight = 14.335428197623635;
        r.height = 0.1 + 0.2;
        catalog.append(r);

        let back = Catalog::from_json(&catalog.to_json_pretty().unwrap()).unwrap();
        let weight = back.get("P001").unwrap().weight;
        assert_eq!(weight.to_bits(), 14.335428197623635f64.to_bits());
        assert_eq!(back, catalog);
        assert_eq!(back.revision(), catalog.revision());
    }

    #[test]
    fn test_pretty_document_uses_four_space_indent() {
        let mut catalog = Catalog::new();
        catalog.append(record("a", 20.0));
        let text = String::from_utf8(catalog.to_json_pretty().unwrap()).unwrap();
        assert!(text.starts_with("{\n    \"P001\": {\n        \"name\": \"a\""));
    }

    #[test]
    fn test_non_object_document_is_rejected() {
        assert!(Catalog::from_json(b"[1, 2, 3]").is_err());
        assert!(Catalog::from_json(b"{\"P001\": ").is_err());
        assert!(Catalog::from_json(b"").is_err());
    }

    #[test]
    fn test_revision_tracks_content() {
        let mut catalog = Catalog::new();
        let empty = catalog.revision();
        assert_eq!(empty, Catalog::new().revision());
        catalog.append(record("a", 20.0));
        let one = catalog.revision();
        assert_ne!(empty, one);
        assert_eq!(one, catalog.clone().revision());
    }

    #[test]
    fn test_sorted_by_bmi_descending() {
        let mut catalog = Catalog::new();
        catalog.append(record("a", 22.0));
        catalog.append(record("b", 30.5));
        catalog.append(record("c", 18.0));
        let sorted = catalog.sorted_by(SortField::Bmi, SortOrder::Descending);
        let bmis: Vec<f64> = sorted.iter().map(|r| r.bmi).collect();
        assert_eq!(bmis, [30.5, 22.0, 18.0]);
    }
}
