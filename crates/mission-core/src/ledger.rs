//! Symmetric pairwise relationship ledger.
//!
//! Each unordered agent pair owns exactly one record, stored under a
//! canonical (lesser, greater) key, so the A→B and B→A views are the same
//! record by construction and can never drift apart. Records are mutated
//! only through deltas, never overwritten wholesale.

use std::collections::BTreeMap;

use contracts::{BondKind, Relationship, RelationshipDelta};

/// Canonical unordered key for an agent pair. `None` for self-pairs, which
/// the ledger rejects.
fn pair_key(a: &str, b: &str) -> Option<(String, String)> {
    match a.cmp(b) {
        std::cmp::Ordering::Less => Some((a.to_string(), b.to_string())),
        std::cmp::Ordering::Greater => Some((b.to_string(), a.to_string())),
        std::cmp::Ordering::Equal => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct RelationshipLedger {
    records: BTreeMap<(String, String), Relationship>,
}

impl RelationshipLedger {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Seed a relationship record during scenario setup. Engine code goes
    /// through `apply_delta` instead.
    pub fn insert(&mut self, a: &str, b: &str, relationship: Relationship) {
        if let Some(key) = pair_key(a, b) {
            self.records.insert(key, relationship);
        }
    }

    /// The record for a pair, in either argument order.
    pub fn get(&self, a: &str, b: &str) -> Option<&Relationship> {
        pair_key(a, b).and_then(|key| self.records.get(&key))
    }

    /// Trust for a pair; missing records count as zero trust.
    pub fn trust_between(&self, a: &str, b: &str) -> f64 {
        self.get(a, b).map(|r| r.trust).unwrap_or(0.0)
    }

    /// Apply a delta to a pair's record, creating it at neutral defaults if
    /// absent. Every field clamps to its range and the bond tag is rederived
    /// from the new affinity. Self-pairs are rejected.
    pub fn apply_delta(&mut self, a: &str, b: &str, delta: &RelationshipDelta) -> bool {
        let Some(key) = pair_key(a, b) else {
            return false;
        };
        let record = self.records.entry(key).or_default();
        record.affinity = (record.affinity + delta.affinity).clamp(-100.0, 100.0);
        record.trust = (record.trust + delta.trust).clamp(0.0, 1.0);
        record.loyalty = (record.loyalty + delta.loyalty).clamp(0.0, 1.0);
        record.bond = BondKind::from_affinity(record.affinity);
        true
    }

    /// Relax every record toward neutral by its own decay rate: affinity
    /// shrinks proportionally, trust and loyalty lose half the rate. Called
    /// by the turn scheduler between turns.
    pub fn decay_tick(&mut self) {
        for record in self.records.values_mut() {
            let rate = record.decay_rate.clamp(0.0, 1.0);
            record.affinity *= 1.0 - rate;
            record.trust = (record.trust - rate * 0.5).max(0.0);
            record.loyalty = (record.loyalty - rate * 0.5).max(0.0);
            record.bond = BondKind::from_affinity(record.affinity);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read-only access to all records under their canonical keys.
    pub fn records(&self) -> &BTreeMap<(String, String), Relationship> {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_delta_creates_and_modifies() {
        let mut ledger = RelationshipLedger::new();
        let applied = ledger.apply_delta(
            "agent:b",
            "agent:a",
            &RelationshipDelta {
                affinity: 10.0,
                trust: 0.2,
                loyalty: 0.1,
            },
        );
        assert!(applied);
        let record = ledger.get("agent:a", "agent:b").expect("record exists");
        assert_eq!(record.affinity, 10.0);
        assert_eq!(record.trust, 0.2);
        assert_eq!(record.loyalty, 0.1);
    }

    #[test]
    fn both_argument_orders_see_the_same_record() {
        let mut ledger = RelationshipLedger::new();
        ledger.apply_delta(
            "agent:a",
            "agent:b",
            &RelationshipDelta {
                affinity: 25.0,
                trust: 0.4,
                loyalty: 0.0,
            },
        );
        assert_eq!(ledger.get("agent:a", "agent:b"), ledger.get("agent:b", "agent:a"));
        assert_eq!(ledger.trust_between("agent:b", "agent:a"), 0.4);
    }

    #[test]
    fn deltas_clamp_to_field_ranges() {
        let mut ledger = RelationshipLedger::new();
        ledger.apply_delta(
            "a",
            "b",
            &RelationshipDelta {
                affinity: 500.0,
                trust: 3.0,
                loyalty: -2.0,
            },
        );
        let record = ledger.get("a", "b").expect("record exists");
        assert_eq!(record.affinity, 100.0);
        assert_eq!(record.trust, 1.0);
        assert_eq!(record.loyalty, 0.0);
        assert_eq!(record.bond, BondKind::Confidant);
    }

    #[test]
    fn self_pairs_are_rejected() {
        let mut ledger = RelationshipLedger::new();
        let applied = ledger.apply_delta("a", "a", &RelationshipDelta::default());
        assert!(!applied);
        assert!(ledger.is_empty());
    }

    #[test]
    fn missing_pairs_report_zero_trust() {
        let ledger = RelationshipLedger::new();
        assert_eq!(ledger.trust_between("a", "b"), 0.0);
        assert!(ledger.get("a", "b").is_none());
    }

    #[test]
    fn decay_moves_records_toward_neutral() {
        let mut ledger = RelationshipLedger::new();
        ledger.insert(
            "a",
            "b",
            Relationship {
                affinity: -80.0,
                trust: 0.9,
                loyalty: 0.6,
                bond: BondKind::Rival,
                decay_rate: 0.1,
            },
        );
        ledger.decay_tick();
        let record = ledger.get("a", "b").expect("record exists");
        assert!(record.affinity > -80.0 && record.affinity < 0.0);
        assert!(record.trust < 0.9);
        assert!(record.loyalty < 0.6);
    }
}
