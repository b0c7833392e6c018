//! Partner battle controller engine.
//!
//! Runs the partner battler: the controlling side writes opcode-prefixed
//! commands into a per-battler channel, and the partner's controller
//! state machine dispatches each one, polls whatever it started across
//! frames, and sets the battler's completion bit when done.
//!
//! # Architecture
//!
//! ```text
//!   controlling side                       Battle (one per battle)
//!   ────────────────                       ─────────────────────────────────────
//!   issue(battler, bytes) ──► CommandChannel[battler] + CompletionSignals
//!                                         │
//!   tick() ─────────────────► controllers[0..4]: RunCommand ─dispatch─► handler
//!                                         │         parked state ─guard─► …
//!                             TaskScheduler: experience, intro ball throw
//!                                         │
//!                             Presentation::advance_frame()
//!   is_complete(battler) ◄─── completion bit
//!   responses()          ◄─── crossbeam channel of Emitted
//! ```
//!
//! Everything runs on the caller's thread. A handler never blocks:
//! waiting means returning without completing and being polled again on
//! the next tick.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod battle;
pub mod channel;
pub mod config;
pub mod controller;
mod dispatch;
pub mod error;
mod exp;
mod handlers;
mod intro;
pub mod scheduler;
pub mod state;

pub use battle::{Battle, TickReport};
pub use channel::{CommandChannel, CompletionSignals, CHANNEL_CAPACITY};
pub use config::{BattleFlags, ConfigError, EngineConfig, PartnerProfile};
pub use controller::ControllerState;
pub use error::{AssignError, IssueError, SchedulerError};
pub use exp::EXP_TASK_PRIORITY;
pub use intro::INTRO_TASK_PRIORITY;
pub use scheduler::{ExpStep, Task, TaskFunc, TaskScheduler, TASK_DATA_LEN};
pub use state::{BattleState, BattlerAnimState};
