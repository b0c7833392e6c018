//! Opcode handlers, grouped by the collaborator they drive.
//!
//! Every handler is a `Battle` method returning the [`Step`](crate::controller::Step)
//! the dispatcher applies: complete now, park in a polling state, or
//! stay pending.

mod ai;
mod anim;
mod data;
mod misc;
mod ui;

/// Sound effect played as a battler faints.
pub const SE_FAINT: u16 = 26;
/// Sound effect looped while the experience bar fills.
pub const SE_EXP: u16 = 33;
/// Move id that leaves a substitute doll behind.
pub const MOVE_SUBSTITUTE: u16 = 164;
/// Pan used for the fainting cry.
pub const FAINTING_CRY_PAN: i8 = -25;
/// Fade speed for the end-of-battle music fade.
pub const END_MUSIC_FADE_SPEED: u8 = 5;
