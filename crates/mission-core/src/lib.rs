//! Mission outcome and consequence engine for the insurgency campaign
//! simulator.
//!
//! One resolution runs Collaboration Analyzer → Success Probability
//! Estimator → Outcome Resolver → Consequence Generator → State Applier,
//! synchronously and in that order. Randomness comes from a single seeded
//! source owned by the engine; all persistent stores are mutated by the
//! applier alone, through an explicit `CampaignState` handle.

pub mod applier;
pub mod collaboration;
pub mod consequence;
pub mod engine;
pub mod ledger;
pub mod outcome;
pub mod probability;
pub mod rng;
pub mod state;

pub use engine::MissionEngine;
pub use ledger::RelationshipLedger;
pub use rng::EngineRng;
pub use state::{CampaignState, DelayedEffectQueue, FactionMetrics, NarrativeLog};
