//! Campaign state: the persistent stores mission resolution mutates.
//!
//! Composes the relationship ledger, per-agent emotional store, faction
//! aggregates, append-only narrative log, delayed-effect queue, betrayal-plan
//! store, and mission history into a single `CampaignState` handle passed
//! explicitly into the state applier. Only the applier writes here during
//! resolution; the turn scheduler drives `advance_turn` between missions.

use std::collections::BTreeMap;

use contracts::{
    AggregateMetric, BetrayalPlan, EmotionalState, MissionRecord, NarrativeEntry, ScheduledEffect,
};
use tracing::warn;

use crate::ledger::RelationshipLedger;

// ---------------------------------------------------------------------------
// Faction aggregates
// ---------------------------------------------------------------------------

/// Faction-level aggregates, each clamped to [0.0, 1.0].
#[derive(Debug, Clone, PartialEq)]
pub struct FactionMetrics {
    pub morale: f64,
    pub reputation: f64,
    pub network_heat: f64,
    pub intel_reserve: f64,
}

impl Default for FactionMetrics {
    fn default() -> Self {
        Self {
            morale: 0.5,
            reputation: 0.5,
            network_heat: 0.1,
            intel_reserve: 0.1,
        }
    }
}

impl FactionMetrics {
    pub fn get(&self, metric: AggregateMetric) -> f64 {
        match metric {
            AggregateMetric::FactionMorale => self.morale,
            AggregateMetric::FactionReputation => self.reputation,
            AggregateMetric::NetworkHeat => self.network_heat,
            AggregateMetric::IntelReserve => self.intel_reserve,
        }
    }

    pub fn apply(&mut self, metric: AggregateMetric, delta: f64) {
        let slot = match metric {
            AggregateMetric::FactionMorale => &mut self.morale,
            AggregateMetric::FactionReputation => &mut self.reputation,
            AggregateMetric::NetworkHeat => &mut self.network_heat,
            AggregateMetric::IntelReserve => &mut self.intel_reserve,
        };
        *slot = (*slot + delta).clamp(0.0, 1.0);
    }
}

// ---------------------------------------------------------------------------
// Narrative log
// ---------------------------------------------------------------------------

/// Append-only campaign narrative. Entries are never edited or removed.
#[derive(Debug, Clone, Default)]
pub struct NarrativeLog {
    entries: Vec<NarrativeEntry>,
}

impl NarrativeLog {
    pub fn append(&mut self, turn: u64, text: impl Into<String>) {
        self.entries.push(NarrativeEntry {
            turn,
            text: text.into(),
        });
    }

    pub fn entries(&self) -> &[NarrativeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Delayed effects
// ---------------------------------------------------------------------------

/// Queue of aggregate effects waiting for their due turn.
#[derive(Debug, Clone, Default)]
pub struct DelayedEffectQueue {
    pending: Vec<ScheduledEffect>,
}

impl DelayedEffectQueue {
    pub fn schedule(&mut self, effect: ScheduledEffect) {
        self.pending.push(effect);
    }

    /// Remove and return every effect due exactly at `turn`. Effects whose
    /// due turn has already passed missed their window; they are dropped
    /// with a warning rather than retried.
    pub fn drain_due(&mut self, turn: u64) -> Vec<ScheduledEffect> {
        let mut due = Vec::new();
        let mut keep = Vec::new();
        for effect in self.pending.drain(..) {
            if effect.due_turn == turn {
                due.push(effect);
            } else if effect.due_turn < turn {
                warn!(
                    due_turn = effect.due_turn,
                    current_turn = turn,
                    metric = ?effect.metric,
                    "dropping stale delayed effect"
                );
            } else {
                keep.push(effect);
            }
        }
        self.pending = keep;
        due
    }

    pub fn pending(&self) -> &[ScheduledEffect] {
        &self.pending
    }
}

// ---------------------------------------------------------------------------
// CampaignState
// ---------------------------------------------------------------------------

/// Everything persistent the engine reads and writes, passed explicitly into
/// the applier rather than reached through globals.
#[derive(Debug, Clone, Default)]
pub struct CampaignState {
    pub relationships: RelationshipLedger,
    pub emotions: BTreeMap<String, EmotionalState>,
    pub faction: FactionMetrics,
    pub narrative: NarrativeLog,
    pub delayed: DelayedEffectQueue,
    pub betrayal_plans: Vec<BetrayalPlan>,
    pub mission_history: Vec<MissionRecord>,
    pub current_turn: u64,
}

impl CampaignState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent in the emotional store. Agents missing from the
    /// store are skipped, not created, when consequences reference them.
    pub fn register_agent(&mut self, agent_id: impl Into<String>, emotions: EmotionalState) {
        self.emotions.insert(agent_id.into(), emotions);
    }

    pub fn remove_agent(&mut self, agent_id: &str) {
        self.emotions.remove(agent_id);
    }

    /// Advance the campaign clock one turn, applying every delayed effect
    /// that comes due. Returns the replayed effects for the caller's own
    /// bookkeeping.
    pub fn advance_turn(&mut self) -> Vec<ScheduledEffect> {
        self.current_turn += 1;
        let due = self.delayed.drain_due(self.current_turn);
        for effect in &due {
            self.faction.apply(effect.metric, effect.amount);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::ConsequenceKind;

    fn heat_effect(due_turn: u64, amount: f64) -> ScheduledEffect {
        ScheduledEffect {
            due_turn,
            metric: AggregateMetric::NetworkHeat,
            amount,
            source: ConsequenceKind::GovernmentCrackdown,
        }
    }

    #[test]
    fn faction_metrics_clamp_to_unit_interval() {
        let mut metrics = FactionMetrics::default();
        metrics.apply(AggregateMetric::FactionMorale, 5.0);
        assert_eq!(metrics.morale, 1.0);
        metrics.apply(AggregateMetric::FactionMorale, -5.0);
        assert_eq!(metrics.morale, 0.0);
    }

    #[test]
    fn delayed_effects_fire_exactly_on_their_due_turn() {
        let mut state = CampaignState::new();
        state.delayed.schedule(heat_effect(2, 0.2));
        let heat_before = state.faction.network_heat;

        assert!(state.advance_turn().is_empty());
        assert_eq!(state.faction.network_heat, heat_before);

        let due = state.advance_turn();
        assert_eq!(due.len(), 1);
        assert!((state.faction.network_heat - (heat_before + 0.2)).abs() < 1e-9);
        assert!(state.delayed.pending().is_empty());
    }

    #[test]
    fn stale_delayed_effects_are_dropped_not_replayed() {
        let mut queue = DelayedEffectQueue::default();
        queue.schedule(heat_effect(1, 0.2));
        queue.schedule(heat_effect(5, 0.1));
        let due = queue.drain_due(3);
        assert!(due.is_empty());
        assert_eq!(queue.pending().len(), 1);
        assert_eq!(queue.pending()[0].due_turn, 5);
    }

    #[test]
    fn narrative_log_appends_in_order() {
        let mut log = NarrativeLog::default();
        log.append(1, "first");
        log.append(2, "second");
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].text, "first");
        assert_eq!(log.entries()[1].turn, 2);
    }

    #[test]
    fn removed_agents_leave_the_emotional_store() {
        let mut state = CampaignState::new();
        state.register_agent("agent:a", EmotionalState::default());
        assert!(state.emotions.contains_key("agent:a"));
        state.remove_agent("agent:a");
        assert!(!state.emotions.contains_key("agent:a"));
    }
}
