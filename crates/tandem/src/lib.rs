//! Tandem: a partner battle controller and save relocation engine.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Tandem sub-crates. For most users, adding `tandem` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tandem::prelude::*;
//! use tandem::types::{GrowthRate, BaseStats, MoveChoice, MoveTarget, Pokemon};
//! # use tandem::types::{
//! #     BarSetup, BattleBar, CryKind, HealthboxUpdate, MoveAnimationArgs, PartySummaryEntry,
//! #     SpecialAnim, TrainerPic, TrainerPlacement,
//! # };
//! # struct Quiet;
//! # impl SpriteStage for Quiet {
//! #     fn load_mon_sprite(&mut self, _: BattlerId, _: &Pokemon) {}
//! #     fn sprite_slide_finished(&self, _: BattlerId) -> bool { true }
//! #     fn sprite_idle(&self, _: BattlerId) -> bool { true }
//! #     fn sprite_present(&self, _: BattlerId) -> bool { true }
//! #     fn destroy_sprite(&mut self, _: BattlerId) {}
//! #     fn set_sprite_invisible(&mut self, _: BattlerId, _: bool) {}
//! #     fn sprite_invisible(&self, _: BattlerId) -> bool { false }
//! #     fn clear_temporary_sprite_data(&mut self, _: BattlerId, _: bool) {}
//! #     fn start_faint_slide(&mut self, _: BattlerId) {}
//! #     fn faint_slide_finished(&self, _: BattlerId) -> bool { true }
//! #     fn trainer_pic_size(&self, _: TrainerPic) -> u8 { 8 }
//! #     fn draw_trainer_pic(&mut self, _: BattlerId, _: TrainerPlacement) {}
//! #     fn start_trainer_slide_back(&mut self, _: BattlerId) {}
//! #     fn start_intro_trainer_slide_out(&mut self, _: BattlerId) {}
//! #     fn start_send_out(&mut self, _: BattlerId, _: &Pokemon) {}
//! #     fn ball_animation_active(&self, _: BattlerId) -> bool { false }
//! #     fn ball_sprite_idle(&self, _: BattlerId) -> bool { true }
//! #     fn destroy_ball_sprite(&mut self, _: BattlerId) {}
//! #     fn start_shiny_animation(&mut self, _: BattlerId, _: &Pokemon) {}
//! #     fn shiny_animation_finished(&self, _: BattlerId) -> bool { true }
//! #     fn update_healthbox(&mut self, _: BattlerId, _: &Pokemon, _: HealthboxUpdate) {}
//! #     fn set_healthbox_visible(&mut self, _: BattlerId, _: bool) {}
//! #     fn healthbox_idle(&self, _: BattlerId) -> bool { true }
//! #     fn start_hit_effect(&mut self, _: BattlerId) {}
//! #     fn start_bar(&mut self, _: BattlerId, _: BattleBar, _: BarSetup) {}
//! #     fn step_bar(&mut self, _: BattlerId, _: BattleBar) -> Option<i32> { None }
//! #     fn launch_special_animation(&mut self, _: BattlerId, _: SpecialAnim) {}
//! #     fn special_animation_active(&self, _: BattlerId) -> bool { false }
//! #     fn start_move_animation(&mut self, _: BattlerId, _: &MoveAnimationArgs) {}
//! #     fn step_move_animation(&mut self) {}
//! #     fn move_animation_active(&self) -> bool { false }
//! #     fn launch_status_animation(&mut self, _: BattlerId, _: bool, _: u32) {}
//! #     fn status_animation_active(&self, _: BattlerId) -> bool { false }
//! #     fn launch_table_animation(&mut self, _: BattlerId, _: u8, _: u16) -> bool { false }
//! #     fn table_animation_active(&self, _: BattlerId) -> bool { false }
//! #     fn show_party_status_summary(&mut self, _: BattlerId, _: &[PartySummaryEntry], _: bool) {}
//! #     fn hide_party_status_summary(&mut self, _: BattlerId) {}
//! #     fn party_status_summary_hide_pending(&self, _: BattlerId) -> bool { false }
//! #     fn intro_slide(&mut self, _: u8) {}
//! #     fn begin_battle_end_fade(&mut self) {}
//! #     fn palette_fade_active(&self) -> bool { false }
//! # }
//! # impl TextPrinter for Quiet {
//! #     fn print_battle_string(&mut self, _: BattlerId, _: u16) {}
//! #     fn printer_active(&self) -> bool { false }
//! # }
//! # impl SoundPlayer for Quiet {
//! #     fn play_se(&mut self, _: u16, _: i8) {}
//! #     fn stop_se(&mut self, _: u16) {}
//! #     fn play_bgm(&mut self, _: u16) {}
//! #     fn play_fanfare(&mut self, _: u16) {}
//! #     fn play_cry(&mut self, _: u16, _: i8, _: CryKind) {}
//! #     fn sound_busy(&self, _: BattlerId) -> bool { false }
//! #     fn update_low_hp_music(&mut self, _: BattlerId, _: &Pokemon) {}
//! #     fn stop_low_hp_sound(&mut self) {}
//! #     fn fade_out_music(&mut self, _: u8) {}
//! # }
//!
//! // The partner always picks its first move against the left foe.
//! struct FirstMove;
//! impl PartnerAi for FirstMove {
//!     fn choose_action(&mut self, _: BattlerId) {}
//!     fn choose_move(&mut self, _: BattlerId, _: &[u16; 4]) -> MoveChoice {
//!         MoveChoice { slot: 0, target: BattlerId::OPPONENT_LEFT }
//!     }
//!     fn move_target(&self, _: u16) -> MoveTarget { MoveTarget::SELECTED }
//!     fn choose_switch(&mut self, _: BattlerId) -> Option<PartyIndex> { None }
//! }
//!
//! struct Flat;
//! impl SpeciesInfo for Flat {
//!     fn growth_rate(&self, _: u16) -> GrowthRate { GrowthRate::MediumFast }
//!     fn base_stats(&self, _: u16) -> BaseStats { BaseStats::default() }
//! }
//!
//! let party = Party::from_members((1..=6).map(|species| Pokemon {
//!     species,
//!     hp: 20,
//!     max_hp: 20,
//!     moves: [33, 0, 0, 0],
//!     ..Pokemon::default()
//! }));
//! let mut battle = Battle::new(
//!     EngineConfig::default(),
//!     party,
//!     Quiet,
//!     Box::new(FirstMove),
//!     Box::new(Flat),
//! )
//! .unwrap();
//! let partner = BattlerId::PLAYER_RIGHT;
//! battle.assign_partner(partner, PartyIndex(3)).unwrap();
//! battle.issue(partner, &[Opcode::ChooseMove.as_byte()]).unwrap();
//! battle.tick();
//! assert!(battle.is_complete(partner));
//! assert_eq!(battle.responses().len(), 1);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tandem-core` | IDs, opcodes, payloads, party records, collaborator traits |
//! | [`engine`] | `tandem-engine` | Battle facade, controllers, dispatch, scheduler |
//! | [`save`] | `tandem-save` | Save blocks, relocation, key rotation |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`tandem-core`).
///
/// Contains the opcode set, command payloads, responses, the party member
/// record, growth curves, and the collaborator traits
/// ([`types::SpriteStage`], [`types::TextPrinter`], [`types::SoundPlayer`],
/// [`types::PartnerAi`], [`types::SpeciesInfo`]).
pub use tandem_core as types;

/// Partner battle controller (`tandem-engine`).
///
/// [`engine::Battle`] owns the controllers and drives them one frame per
/// [`engine::Battle::tick`].
pub use tandem_engine as engine;

/// Persistent save blocks (`tandem-save`).
///
/// [`save::SaveManager`] owns the blocks and relocates them with
/// [`save::SaveManager::relocate`].
pub use tandem_save as save;

/// Common imports for typical Tandem usage.
///
/// ```rust
/// use tandem::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use tandem_core::{
        BattlerId, Emitted, Opcode, Party, PartyIndex, PartnerAi, Presentation, Response,
        SoundPlayer, SpeciesInfo, SpriteStage, TextPrinter,
    };

    // Errors
    pub use tandem_core::{CapacityExceeded, PayloadError};
    pub use tandem_engine::{AssignError, ConfigError, IssueError};
    pub use tandem_save::{SaveConfigError, SaveError};

    // Engine
    pub use tandem_engine::{Battle, ControllerState, EngineConfig, TickReport};

    // Save
    pub use tandem_save::{BlockConsumer, BlockId, SaveConfig, SaveManager};
}
