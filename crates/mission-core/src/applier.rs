//! State applier: the only component that writes consequence deltas into
//! campaign state. Emotional impacts are summed across all consequences
//! before one clamped apply per agent per axis; relationship deltas go
//! through the symmetric ledger; immediate effects hit the faction
//! aggregates; delayed effects are queued for the turn scheduler; narrative
//! hooks are appended verbatim. A missing agent or relationship skips that
//! single delta with a warning; the rest of the batch still applies.

use std::collections::BTreeMap;

use contracts::{Consequence, EmotionKind, RelationshipDelta, ScheduledEffect};
use tracing::warn;

use crate::state::CampaignState;

/// What application actually changed, for the mission report.
#[derive(Debug, Clone, Default)]
pub struct AppliedChanges {
    /// Emotional deltas actually applied after clamping, per agent per axis.
    pub emotional_impacts: BTreeMap<String, BTreeMap<EmotionKind, f64>>,
    /// Relationship changes actually applied after clamping, merged per
    /// canonical pair.
    pub relationship_changes: Vec<(String, String, RelationshipDelta)>,
    /// Narrative lines appended this resolution.
    pub narrative_lines: Vec<String>,
    /// Deltas skipped because their target no longer exists.
    pub skipped: Vec<String>,
}

pub fn apply(state: &mut CampaignState, consequences: &[Consequence]) -> AppliedChanges {
    let mut changes = AppliedChanges::default();

    apply_emotional_impacts(state, consequences, &mut changes);
    apply_relationship_impacts(state, consequences, &mut changes);

    for consequence in consequences {
        for (metric, amount) in &consequence.immediate_effects {
            state.faction.apply(*metric, *amount);
        }

        if !consequence.delayed_effects.is_empty() {
            let due_turn = state.current_turn + consequence.recovery_time.max(1);
            for (metric, amount) in &consequence.delayed_effects {
                state.delayed.schedule(ScheduledEffect {
                    due_turn,
                    metric: *metric,
                    amount: *amount,
                    source: consequence.kind,
                });
            }
        }

        for hook in &consequence.narrative_hooks {
            state.narrative.append(state.current_turn, hook.clone());
            changes.narrative_lines.push(hook.clone());
        }
    }

    changes
}

/// Sum every consequence's emotional deltas first, then clamp-apply the
/// total once per agent per axis. Trauma goes through its own accumulator
/// inside `EmotionalState::apply`. The report records the post-clamp
/// before/after difference, not the requested sum.
fn apply_emotional_impacts(
    state: &mut CampaignState,
    consequences: &[Consequence],
    changes: &mut AppliedChanges,
) {
    let mut summed: BTreeMap<String, BTreeMap<EmotionKind, f64>> = BTreeMap::new();
    for consequence in consequences {
        for (agent_id, deltas) in &consequence.emotional_impacts {
            let entry = summed.entry(agent_id.clone()).or_default();
            for (kind, delta) in deltas {
                *entry.entry(*kind).or_insert(0.0) += delta;
            }
        }
    }

    for (agent_id, deltas) in summed {
        match state.emotions.get_mut(&agent_id) {
            Some(emotions) => {
                let mut applied = BTreeMap::new();
                for (kind, delta) in &deltas {
                    let before = emotions.get(*kind);
                    emotions.apply(*kind, *delta);
                    applied.insert(*kind, emotions.get(*kind) - before);
                }
                changes.emotional_impacts.insert(agent_id, applied);
            }
            None => {
                warn!(agent_id = %agent_id, "skipping emotional impact for missing agent");
                changes
                    .skipped
                    .push(format!("emotional impact for missing agent {agent_id}"));
            }
        }
    }
}

/// Apply relationship deltas in consequence order. Each write lands on the
/// single canonical record for the pair, so both directions stay symmetric.
/// The report merges the post-clamp before/after difference of every write,
/// which telescopes to the pair's net applied change.
fn apply_relationship_impacts(
    state: &mut CampaignState,
    consequences: &[Consequence],
    changes: &mut AppliedChanges,
) {
    let mut merged: BTreeMap<(String, String), RelationshipDelta> = BTreeMap::new();

    for consequence in consequences {
        for (a, b, delta) in &consequence.relationship_impacts {
            if a == b {
                warn!(agent_id = %a, "skipping self-referential relationship delta");
                changes
                    .skipped
                    .push(format!("self-referential relationship delta for {a}"));
                continue;
            }
            if !state.emotions.contains_key(a) || !state.emotions.contains_key(b) {
                warn!(a = %a, b = %b, "skipping relationship delta with missing endpoint");
                changes
                    .skipped
                    .push(format!("relationship delta for missing pair {a}/{b}"));
                continue;
            }

            let before = state.relationships.get(a, b).cloned().unwrap_or_default();
            state.relationships.apply_delta(a, b, delta);
            let after = state.relationships.get(a, b).cloned().unwrap_or_default();

            let key = if a < b {
                (a.clone(), b.clone())
            } else {
                (b.clone(), a.clone())
            };
            let entry = merged.entry(key).or_default();
            entry.affinity += after.affinity - before.affinity;
            entry.trust += after.trust - before.trust;
            entry.loyalty += after.loyalty - before.loyalty;
        }
    }

    changes.relationship_changes = merged
        .into_iter()
        .map(|((a, b), delta)| (a, b, delta))
        .collect();
}
