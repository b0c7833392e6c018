//! Core types and traits for the Tandem partner battle controller.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the engine and save crates: identifiers, the
//! opcode set and command payloads, responses, the party member record
//! and its byte layouts, growth curves, collaborator traits and errors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod command;
pub mod error;
pub mod id;
pub mod mon;
pub mod opcode;
pub mod record;
pub mod request;
pub mod response;
pub mod species;
pub mod traits;

pub use command::{CommandPayload, MoveAnimationArgs, PartySelector, PartySummaryEntry};
pub use error::{CapacityExceeded, PayloadError};
pub use id::{BattlerId, Generation, PartyIndex, Side, TaskId, TickId, MAX_BATTLERS, PARTY_SIZE};
pub use mon::{MonField, Party, Pokemon, Stat};
pub use opcode::Opcode;
pub use request::MonDataRequest;
pub use response::{Emitted, Response, ReturnKind, MON_DATA_CAPACITY};
pub use species::{recalculate_stats, BaseStats, GrowthRate, MAX_LEVEL};
pub use traits::{
    BarSetup, BattleBar, CryKind, HealthboxUpdate, MoveChoice, MoveTarget, PartnerAi,
    Presentation, SoundPlayer, SpecialAnim, SpeciesInfo, SpriteStage, TextPrinter, TrainerPic,
    TrainerPlacement,
};
