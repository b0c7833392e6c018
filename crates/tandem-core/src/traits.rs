//! Collaborator traits the controller drives but does not implement.
//!
//! Rendering, text, audio, species data and AI decisions all live
//! outside the engine. Handlers call out through these traits and poll
//! their query methods from controller states; every query must be free
//! of side effects so that re-polling a state is idempotent.

use crate::command::{MoveAnimationArgs, PartySummaryEntry};
use crate::id::{BattlerId, PartyIndex};
use crate::mon::Pokemon;
use crate::species::{BaseStats, GrowthRate};

// ── Species data ───────────────────────────────────────────────

/// Read-only species tables.
pub trait SpeciesInfo {
    /// Experience curve for `species`.
    fn growth_rate(&self, species: u16) -> GrowthRate;

    /// Base stats for `species`.
    fn base_stats(&self, species: u16) -> BaseStats;

    /// Elemental types for `species`.
    fn types(&self, _species: u16) -> [u8; 2] {
        [0, 0]
    }

    /// Ability id for `species` given the member's ability slot.
    fn ability(&self, _species: u16, _ability_num: u8) -> u8 {
        0
    }
}

// ── Presentation ───────────────────────────────────────────────

/// Short scripted animations played on a battler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecialAnim {
    /// Swap the substitute doll back to the battler.
    SubstituteToMon,
    /// Swap the battler to its substitute doll.
    MonToSubstitute,
    /// Recall animation.
    SwitchOut,
    /// Level-up sparkle.
    LevelUp,
}

/// What a healthbox refresh should redraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HealthboxUpdate {
    /// Everything.
    All,
    /// Only the status icon.
    StatusIcon,
    /// Only the HP readout, with an interim value.
    HpText(i32),
    /// Only the experience bar.
    ExpBar,
}

/// Animated bars inside a healthbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BattleBar {
    /// HP bar.
    Health,
    /// Experience bar.
    Exp,
}

/// Start parameters for a [`BattleBar`] animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarSetup {
    /// Full-bar value.
    pub max: i32,
    /// Current value.
    pub current: i32,
    /// Amount to move by. Positive drains HP or fills experience.
    pub delta: i32,
}

/// Which trainer graphic to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrainerPic {
    /// A back-facing trainer graphic.
    Back(u16),
    /// A front-facing trainer graphic.
    Front(u16),
}

/// Where to draw a trainer graphic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrainerPlacement {
    /// Graphic to draw.
    pub pic: TrainerPic,
    /// Screen x.
    pub x: i16,
    /// Screen y.
    pub y: i16,
}

/// Battler sprites, healthboxes, battle animations and screen effects.
pub trait SpriteStage {
    // Battler sprite.

    /// Load the battler sprite off screen and start sliding it in.
    fn load_mon_sprite(&mut self, battler: BattlerId, mon: &Pokemon);
    /// Whether the slide-in started by `load_mon_sprite` has finished.
    fn sprite_slide_finished(&self, battler: BattlerId) -> bool;
    /// Whether the battler sprite has no running callback.
    fn sprite_idle(&self, battler: BattlerId) -> bool;
    /// Whether a sprite currently exists for the battler.
    fn sprite_present(&self, battler: BattlerId) -> bool;
    /// Free the battler sprite.
    fn destroy_sprite(&mut self, battler: BattlerId);
    /// Show or hide the battler sprite.
    fn set_sprite_invisible(&mut self, battler: BattlerId, invisible: bool);
    /// Whether the battler sprite is hidden.
    fn sprite_invisible(&self, battler: BattlerId) -> bool;
    /// Reset per-switch sprite bookkeeping.
    fn clear_temporary_sprite_data(&mut self, battler: BattlerId, keep_substitute: bool);
    /// Start the fainting slide.
    fn start_faint_slide(&mut self, battler: BattlerId);
    /// Whether the fainting slide has left the screen.
    fn faint_slide_finished(&self, battler: BattlerId) -> bool;

    // Trainer sprite.

    /// Height class of a trainer graphic, in 8-pixel rows of empty space.
    fn trainer_pic_size(&self, pic: TrainerPic) -> u8;
    /// Draw the trainer sprite in the battler's slot.
    fn draw_trainer_pic(&mut self, battler: BattlerId, placement: TrainerPlacement);
    /// Slide the trainer sprite back off screen.
    fn start_trainer_slide_back(&mut self, battler: BattlerId);
    /// Slide the trainer out during the intro ball throw.
    fn start_intro_trainer_slide_out(&mut self, battler: BattlerId);

    // Send-out.

    /// Create the ball and a hidden battler sprite for a send-out.
    fn start_send_out(&mut self, battler: BattlerId, mon: &Pokemon);
    /// Whether the send-out ball animation is running.
    fn ball_animation_active(&self, battler: BattlerId) -> bool;
    /// Whether the ball sprite has no running callback.
    fn ball_sprite_idle(&self, battler: BattlerId) -> bool;
    /// Free the ball sprite.
    fn destroy_ball_sprite(&mut self, battler: BattlerId);
    /// Start the shiny sparkle check for a freshly sent-out member.
    fn start_shiny_animation(&mut self, battler: BattlerId, mon: &Pokemon);
    /// Whether the shiny sparkle check has finished.
    fn shiny_animation_finished(&self, battler: BattlerId) -> bool;

    // Healthbox.

    /// Redraw part of the healthbox.
    fn update_healthbox(&mut self, battler: BattlerId, mon: &Pokemon, update: HealthboxUpdate);
    /// Show or hide the healthbox.
    fn set_healthbox_visible(&mut self, battler: BattlerId, visible: bool);
    /// Whether the healthbox has no running callback.
    fn healthbox_idle(&self, battler: BattlerId) -> bool;
    /// Start the healthbox shake played on a hit.
    fn start_hit_effect(&mut self, battler: BattlerId);
    /// Start a bar animation.
    fn start_bar(&mut self, battler: BattlerId, bar: BattleBar, setup: BarSetup);
    /// Advance a bar one frame. Returns the interim value, or `None` once done.
    fn step_bar(&mut self, battler: BattlerId, bar: BattleBar) -> Option<i32>;

    // Animations.

    /// Launch a special animation on the battler.
    fn launch_special_animation(&mut self, battler: BattlerId, anim: SpecialAnim);
    /// Whether a special animation is running on the battler.
    fn special_animation_active(&self, battler: BattlerId) -> bool;
    /// Start a move animation script.
    fn start_move_animation(&mut self, battler: BattlerId, args: &MoveAnimationArgs);
    /// Run one frame of the move animation script.
    fn step_move_animation(&mut self);
    /// Whether the move animation script is still running.
    fn move_animation_active(&self) -> bool;
    /// Launch a status animation.
    fn launch_status_animation(&mut self, battler: BattlerId, status2: bool, status: u32);
    /// Whether a status animation is running on the battler.
    fn status_animation_active(&self, battler: BattlerId) -> bool;
    /// Launch a table animation. Returns `false` when there is nothing to play.
    fn launch_table_animation(&mut self, battler: BattlerId, anim_id: u8, argument: u16) -> bool;
    /// Whether a table animation is running on the battler.
    fn table_animation_active(&self, battler: BattlerId) -> bool;

    // Screen.

    /// Show the party status summary.
    fn show_party_status_summary(
        &mut self,
        battler: BattlerId,
        entries: &[PartySummaryEntry],
        battle_start: bool,
    );
    /// Hide the party status summary.
    fn hide_party_status_summary(&mut self, battler: BattlerId);
    /// Whether a hide of the summary is still in flight.
    fn party_status_summary_hide_pending(&self, battler: BattlerId) -> bool;
    /// Start the battle intro slide.
    fn intro_slide(&mut self, environment: u8);
    /// Start the end-of-battle palette fade.
    fn begin_battle_end_fade(&mut self);
    /// Whether a palette fade is running.
    fn palette_fade_active(&self) -> bool;

    /// Advance collaborator-owned animations by one frame.
    ///
    /// Called once at the end of every engine tick.
    fn advance_frame(&mut self) {}
}

/// Battle text window.
pub trait TextPrinter {
    /// Print a battle string on behalf of `battler`.
    fn print_battle_string(&mut self, battler: BattlerId, string_id: u16);
    /// Whether the printer is still drawing.
    fn printer_active(&self) -> bool;
}

/// Cry flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CryKind {
    /// Regular cry.
    Normal,
    /// Slowed fainting cry.
    Fainting,
}

/// Sound effects, music and cries.
pub trait SoundPlayer {
    /// Play a sound effect. Pan is -64 (left) to 63 (right).
    fn play_se(&mut self, se: u16, pan: i8);
    /// Stop a sound effect.
    fn stop_se(&mut self, se: u16);
    /// Switch background music.
    fn play_bgm(&mut self, song: u16);
    /// Play a fanfare over the music.
    fn play_fanfare(&mut self, song: u16);
    /// Play a species cry.
    fn play_cry(&mut self, species: u16, pan: i8, kind: CryKind);
    /// Whether a cry tied to `battler` is still playing.
    fn sound_busy(&self, battler: BattlerId) -> bool;
    /// Re-evaluate the low-HP warning for `battler`'s member.
    fn update_low_hp_music(&mut self, battler: BattlerId, mon: &Pokemon);
    /// Stop the low-HP warning.
    fn stop_low_hp_sound(&mut self);
    /// Fade out the map music.
    fn fade_out_music(&mut self, speed: u8);
}

/// Everything a battle needs to present itself.
pub trait Presentation: SpriteStage + TextPrinter + SoundPlayer {}

impl<T: SpriteStage + TextPrinter + SoundPlayer> Presentation for T {}

// ── AI ────────────────────────────────────────────────────────

/// Targeting flags of a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct MoveTarget(pub u8);

impl MoveTarget {
    /// The AI's selected target.
    pub const SELECTED: Self = Self(0);
    /// Depends on the move.
    pub const DEPENDS: Self = Self(1 << 0);
    /// The user or a selected ally.
    pub const USER_OR_SELECTED: Self = Self(1 << 1);
    /// A random foe.
    pub const RANDOM: Self = Self(1 << 2);
    /// Both foes.
    pub const BOTH: Self = Self(1 << 3);
    /// The user.
    pub const USER: Self = Self(1 << 4);
    /// Everyone but the user.
    pub const FOES_AND_ALLY: Self = Self(1 << 5);
    /// The foes' side of the field.
    pub const OPPONENTS_FIELD: Self = Self(1 << 6);

    /// Whether any flag in `other` is set.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl std::ops::BitOr for MoveTarget {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A move pick from the AI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveChoice {
    /// Move slot 0..4.
    pub slot: u8,
    /// Target the AI wants when the move is single-target.
    pub target: BattlerId,
}

/// Decision-making for the partner.
pub trait PartnerAi {
    /// Decide whether to switch or use an item this turn.
    fn choose_action(&mut self, battler: BattlerId);
    /// Pick a move slot and target.
    fn choose_move(&mut self, battler: BattlerId, moves: &[u16; 4]) -> MoveChoice;
    /// Targeting flags of `move_id`.
    fn move_target(&self, move_id: u16) -> MoveTarget;
    /// Best member to switch in, or `None` to fall back to the first healthy one.
    fn choose_switch(&mut self, battler: BattlerId) -> Option<PartyIndex>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_flags_combine() {
        let t = MoveTarget::USER | MoveTarget::BOTH;
        assert!(t.intersects(MoveTarget::USER_OR_SELECTED | MoveTarget::USER));
        assert!(t.intersects(MoveTarget::BOTH));
        assert!(!MoveTarget::SELECTED.intersects(MoveTarget::BOTH));
    }
}
