//! Dialogue engine.
//!
//! The engine owns a parsed [`Script`](crate::Script), the matchers compiled
//! from it, and the little bit of conversation state that survives between
//! turns (reassembly cursors live on the rules, the memory queue lives here).
//!
//! ## How the parts work together
//!
//! ```text
//! script ──┐
//!          │  CompiledRules::new              (compiled_rules.rs)
//!          └──────────────┬───────────────
//!                         │
//! input ── scan ──────────┼─ clauses, tokens, alias substitution
//!         (scan.rs)       │  push hits onto the Keystack (keystack.rs)
//!                         v
//!               Engine::turn (dialogue.rs)
//!                 - pop keywords by rank
//!                 - resolve each one            (resolve.rs)
//!                     · entry-level redirection
//!                     · first matching rule, next reassembly
//!                     · =KEY / PRE / NEWKEY / text
//!                 - memory rules feed the memory queue
//!                         │
//!                         v
//!           response ◀─ memory queue ◀─ fallback keyword ◀─ default reply
//! ```
//!
//! Each turn is recorded in a [`TurnDetails`] (metrics.rs). The plain
//! `get_response` path builds the same record and drops it.
//!
//! ## Responsibilities by module
//!
//! - `compiled_rules.rs`: one matcher per rule in the script's arena, built once
//!   after the whole script (and therefore every `DLIST`) is known.
//! - `scan.rs`: clause splitting, keyword detection and the reflected text.
//! - `keystack.rs`: the deduplicated, rank-ordered worklist for one turn.
//! - `resolve.rs`: redirection following with cycle detection and a hop limit.
//! - `dialogue.rs`: the turn state machine and the memory queue.
//! - `metrics.rs`: per-turn trace data.
//!
//! ## Debugging
//!
//! Every stage emits `tracing` events; `RUST_LOG=eliza=trace` shows the whole
//! turn, including each keyword attempt and redirection hop.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/dialogue.rs"]
mod dialogue;
#[path = "engine/keystack.rs"]
mod keystack;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/scan.rs"]
mod scan;

pub(crate) use dialogue::Engine;
pub use metrics::{Attempt, AttemptOutcome, ResponseSource, TurnDetails};
