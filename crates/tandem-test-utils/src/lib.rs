//! Test utilities and mock collaborators for Tandem development.
//!
//! Provides a scripted [`Presentation`](tandem_core::Presentation) that
//! records every call and finishes animations after configurable frame
//! counts, a fixed [`PartnerAi`], a table-backed [`SpeciesInfo`], and
//! party fixtures.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use indexmap::IndexMap;
use tandem_core::{
    BarSetup, BaseStats, BattleBar, BattlerId, CryKind, GrowthRate, HealthboxUpdate,
    MoveAnimationArgs, MoveChoice, MoveTarget, PartnerAi, PartyIndex, PartySummaryEntry,
    Pokemon, SoundPlayer, SpecialAnim, SpeciesInfo, SpriteStage, TextPrinter, TrainerPic,
    TrainerPlacement, MAX_BATTLERS,
};

// ── Call log ────────────────────────────────────────────────────

/// One mutating call made on a [`ScriptedPresentation`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    LoadMonSprite { battler: BattlerId, species: u16 },
    DestroySprite { battler: BattlerId },
    SetSpriteInvisible { battler: BattlerId, invisible: bool },
    ClearTemporarySpriteData { battler: BattlerId, keep_substitute: bool },
    StartFaintSlide { battler: BattlerId },
    DrawTrainerPic { battler: BattlerId, placement: TrainerPlacement },
    StartTrainerSlideBack { battler: BattlerId },
    StartIntroTrainerSlideOut { battler: BattlerId },
    StartSendOut { battler: BattlerId },
    DestroyBallSprite { battler: BattlerId },
    StartShinyAnimation { battler: BattlerId },
    UpdateHealthbox { battler: BattlerId, update: HealthboxUpdate },
    SetHealthboxVisible { battler: BattlerId, visible: bool },
    StartHitEffect { battler: BattlerId },
    StartBar { battler: BattlerId, bar: BattleBar, setup: BarSetup },
    SpecialAnimation { battler: BattlerId, anim: SpecialAnim },
    StartMoveAnimation { battler: BattlerId, move_id: u16 },
    StatusAnimation { battler: BattlerId, status2: bool, status: u32 },
    TableAnimation { battler: BattlerId, anim_id: u8, argument: u16 },
    ShowPartyStatusSummary { battler: BattlerId, battle_start: bool },
    HidePartyStatusSummary { battler: BattlerId },
    IntroSlide { environment: u8 },
    BeginBattleEndFade,
    PrintString { battler: BattlerId, string_id: u16 },
    PlaySe { se: u16, pan: i8 },
    StopSe { se: u16 },
    PlayBgm { song: u16 },
    PlayFanfare { song: u16 },
    PlayCry { species: u16, pan: i8, kind: CryKind },
    UpdateLowHpMusic { battler: BattlerId },
    StopLowHpSound,
    FadeOutMusic { speed: u8 },
}

// ── ScriptedPresentation ────────────────────────────────────────

/// Frames each presentation effect stays active after it starts.
///
/// Zero means the effect is already over on the next poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timings {
    pub sprite_slide: u32,
    pub trainer_slide: u32,
    pub faint_slide: u32,
    pub ball: u32,
    pub shiny: u32,
    pub healthbox: u32,
    pub special_anim: u32,
    pub status_anim: u32,
    pub table_anim: u32,
    pub move_anim: u32,
    pub print: u32,
    pub palette_fade: u32,
    pub bar_steps: u32,
}

#[derive(Clone, Copy, Debug, Default)]
struct Bar {
    setup: Option<BarSetup>,
    steps: u32,
    done: u32,
}

impl Bar {
    fn target(setup: BarSetup, bar: BattleBar) -> i32 {
        let end = match bar {
            BattleBar::Health => setup.current - setup.delta,
            BattleBar::Exp => setup.current + setup.delta,
        };
        end.clamp(0, setup.max.max(0))
    }
}

#[derive(Clone, Copy, Debug)]
struct Stage {
    present: bool,
    invisible: bool,
    healthbox_visible: bool,
    sprite_busy: u32,
    faint: u32,
    ball: u32,
    shiny: u32,
    healthbox: u32,
    special: u32,
    status: u32,
    table: u32,
    sound_busy: bool,
    bars: [Bar; 2],
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            present: true,
            invisible: false,
            healthbox_visible: false,
            sprite_busy: 0,
            faint: 0,
            ball: 0,
            shiny: 0,
            healthbox: 0,
            special: 0,
            status: 0,
            table: 0,
            sound_busy: false,
            bars: [Bar::default(); 2],
        }
    }
}

fn tick_down(n: &mut u32) {
    *n = n.saturating_sub(1);
}

fn bar_slot(bar: BattleBar) -> usize {
    match bar {
        BattleBar::Health => 0,
        BattleBar::Exp => 1,
    }
}

/// Deterministic [`Presentation`](tandem_core::Presentation) that logs
/// calls and counts down effects.
///
/// Every effect started through the trait stays active for the number of
/// frames in [`Timings`], counted down by `advance_frame`. The move
/// animation is the exception: it counts down on each
/// `step_move_animation` call, like the engine drives it.
#[derive(Clone, Debug)]
pub struct ScriptedPresentation {
    timings: Timings,
    stages: [Stage; MAX_BATTLERS],
    calls: Vec<Call>,
    move_anim: u32,
    printer: u32,
    palette_fade: u32,
    summary_hide_pending: bool,
    table_animations_available: bool,
    trainer_pic_size: u8,
}

impl ScriptedPresentation {
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            stages: [Stage::default(); MAX_BATTLERS],
            calls: Vec::new(),
            move_anim: 0,
            printer: 0,
            palette_fade: 0,
            summary_hide_pending: false,
            table_animations_available: true,
            trainer_pic_size: 8,
        }
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Drain the recorded calls.
    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    pub fn timings_mut(&mut self) -> &mut Timings {
        &mut self.timings
    }

    pub fn set_sound_busy(&mut self, battler: BattlerId, busy: bool) {
        self.stages[battler.index()].sound_busy = busy;
    }

    /// Keep the text printer busy for `frames` frames.
    pub fn set_printer_active(&mut self, frames: u32) {
        self.printer = frames;
    }

    pub fn set_summary_hide_pending(&mut self, pending: bool) {
        self.summary_hide_pending = pending;
    }

    pub fn set_table_animations_available(&mut self, available: bool) {
        self.table_animations_available = available;
    }

    pub fn set_palette_fade_ticks(&mut self, frames: u32) {
        self.timings.palette_fade = frames;
    }

    pub fn set_move_animation_frames(&mut self, frames: u32) {
        self.timings.move_anim = frames;
    }

    /// Number of `step_bar` calls that report a value before the bar stops.
    pub fn set_bar_steps(&mut self, steps: u32) {
        self.timings.bar_steps = steps;
    }

    pub fn set_sprite_present(&mut self, battler: BattlerId, present: bool) {
        self.stages[battler.index()].present = present;
    }

    pub fn set_trainer_pic_size(&mut self, size: u8) {
        self.trainer_pic_size = size;
    }

    pub fn healthbox_visible(&self, battler: BattlerId) -> bool {
        self.stages[battler.index()].healthbox_visible
    }

    fn stage(&self, battler: BattlerId) -> &Stage {
        &self.stages[battler.index()]
    }

    fn stage_mut(&mut self, battler: BattlerId) -> &mut Stage {
        &mut self.stages[battler.index()]
    }
}

impl Default for ScriptedPresentation {
    fn default() -> Self {
        Self::new(Timings::default())
    }
}

impl SpriteStage for ScriptedPresentation {
    fn load_mon_sprite(&mut self, battler: BattlerId, mon: &Pokemon) {
        self.calls.push(Call::LoadMonSprite {
            battler,
            species: mon.species,
        });
        let frames = self.timings.sprite_slide;
        let stage = self.stage_mut(battler);
        stage.present = true;
        stage.sprite_busy = frames;
    }

    fn sprite_slide_finished(&self, battler: BattlerId) -> bool {
        self.stage(battler).sprite_busy == 0
    }

    fn sprite_idle(&self, battler: BattlerId) -> bool {
        self.stage(battler).sprite_busy == 0
    }

    fn sprite_present(&self, battler: BattlerId) -> bool {
        self.stage(battler).present
    }

    fn destroy_sprite(&mut self, battler: BattlerId) {
        self.calls.push(Call::DestroySprite { battler });
        let stage = self.stage_mut(battler);
        stage.present = false;
        stage.sprite_busy = 0;
    }

    fn set_sprite_invisible(&mut self, battler: BattlerId, invisible: bool) {
        self.calls.push(Call::SetSpriteInvisible { battler, invisible });
        self.stage_mut(battler).invisible = invisible;
    }

    fn sprite_invisible(&self, battler: BattlerId) -> bool {
        self.stage(battler).invisible
    }

    fn clear_temporary_sprite_data(&mut self, battler: BattlerId, keep_substitute: bool) {
        self.calls.push(Call::ClearTemporarySpriteData {
            battler,
            keep_substitute,
        });
    }

    fn start_faint_slide(&mut self, battler: BattlerId) {
        self.calls.push(Call::StartFaintSlide { battler });
        let frames = self.timings.faint_slide;
        self.stage_mut(battler).faint = frames;
    }

    fn faint_slide_finished(&self, battler: BattlerId) -> bool {
        self.stage(battler).faint == 0
    }

    fn trainer_pic_size(&self, _pic: TrainerPic) -> u8 {
        self.trainer_pic_size
    }

    fn draw_trainer_pic(&mut self, battler: BattlerId, placement: TrainerPlacement) {
        self.calls.push(Call::DrawTrainerPic { battler, placement });
        self.stage_mut(battler).present = true;
    }

    fn start_trainer_slide_back(&mut self, battler: BattlerId) {
        self.calls.push(Call::StartTrainerSlideBack { battler });
        let frames = self.timings.trainer_slide;
        self.stage_mut(battler).sprite_busy = frames;
    }

    fn start_intro_trainer_slide_out(&mut self, battler: BattlerId) {
        self.calls.push(Call::StartIntroTrainerSlideOut { battler });
    }

    fn start_send_out(&mut self, battler: BattlerId, _mon: &Pokemon) {
        self.calls.push(Call::StartSendOut { battler });
        let frames = self.timings.ball;
        let stage = self.stage_mut(battler);
        stage.present = true;
        stage.ball = frames;
    }

    fn ball_animation_active(&self, battler: BattlerId) -> bool {
        self.stage(battler).ball > 0
    }

    fn ball_sprite_idle(&self, battler: BattlerId) -> bool {
        self.stage(battler).ball == 0
    }

    fn destroy_ball_sprite(&mut self, battler: BattlerId) {
        self.calls.push(Call::DestroyBallSprite { battler });
    }

    fn start_shiny_animation(&mut self, battler: BattlerId, _mon: &Pokemon) {
        self.calls.push(Call::StartShinyAnimation { battler });
        let frames = self.timings.shiny;
        self.stage_mut(battler).shiny = frames;
    }

    fn shiny_animation_finished(&self, battler: BattlerId) -> bool {
        self.stage(battler).shiny == 0
    }

    fn update_healthbox(&mut self, battler: BattlerId, _mon: &Pokemon, update: HealthboxUpdate) {
        self.calls.push(Call::UpdateHealthbox { battler, update });
        let frames = self.timings.healthbox;
        self.stage_mut(battler).healthbox = frames;
    }

    fn set_healthbox_visible(&mut self, battler: BattlerId, visible: bool) {
        if self.stage(battler).healthbox_visible != visible {
            self.calls.push(Call::SetHealthboxVisible { battler, visible });
        }
        self.stage_mut(battler).healthbox_visible = visible;
    }

    fn healthbox_idle(&self, battler: BattlerId) -> bool {
        self.stage(battler).healthbox == 0
    }

    fn start_hit_effect(&mut self, battler: BattlerId) {
        self.calls.push(Call::StartHitEffect { battler });
    }

    fn start_bar(&mut self, battler: BattlerId, bar: BattleBar, setup: BarSetup) {
        self.calls.push(Call::StartBar {
            battler,
            bar,
            setup,
        });
        let steps = self.timings.bar_steps;
        self.stage_mut(battler).bars[bar_slot(bar)] = Bar {
            setup: Some(setup),
            steps,
            done: 0,
        };
    }

    fn step_bar(&mut self, battler: BattlerId, bar: BattleBar) -> Option<i32> {
        let state = &mut self.stage_mut(battler).bars[bar_slot(bar)];
        let setup = state.setup?;
        if state.done >= state.steps {
            state.setup = None;
            return None;
        }
        state.done += 1;
        let target = Bar::target(setup, bar);
        let span = (target - setup.current) as i64;
        let value = setup.current as i64 + span * state.done as i64 / state.steps as i64;
        Some(value as i32)
    }

    fn launch_special_animation(&mut self, battler: BattlerId, anim: SpecialAnim) {
        self.calls.push(Call::SpecialAnimation { battler, anim });
        let frames = self.timings.special_anim;
        self.stage_mut(battler).special = frames;
    }

    fn special_animation_active(&self, battler: BattlerId) -> bool {
        self.stage(battler).special > 0
    }

    fn start_move_animation(&mut self, battler: BattlerId, args: &MoveAnimationArgs) {
        self.calls.push(Call::StartMoveAnimation {
            battler,
            move_id: args.move_id,
        });
        self.move_anim = self.timings.move_anim;
    }

    fn step_move_animation(&mut self) {
        tick_down(&mut self.move_anim);
    }

    fn move_animation_active(&self) -> bool {
        self.move_anim > 0
    }

    fn launch_status_animation(&mut self, battler: BattlerId, status2: bool, status: u32) {
        self.calls.push(Call::StatusAnimation {
            battler,
            status2,
            status,
        });
        let frames = self.timings.status_anim;
        self.stage_mut(battler).status = frames;
    }

    fn status_animation_active(&self, battler: BattlerId) -> bool {
        self.stage(battler).status > 0
    }

    fn launch_table_animation(&mut self, battler: BattlerId, anim_id: u8, argument: u16) -> bool {
        if !self.table_animations_available {
            return false;
        }
        self.calls.push(Call::TableAnimation {
            battler,
            anim_id,
            argument,
        });
        let frames = self.timings.table_anim;
        self.stage_mut(battler).table = frames;
        true
    }

    fn table_animation_active(&self, battler: BattlerId) -> bool {
        self.stage(battler).table > 0
    }

    fn show_party_status_summary(
        &mut self,
        battler: BattlerId,
        _entries: &[PartySummaryEntry],
        battle_start: bool,
    ) {
        self.calls.push(Call::ShowPartyStatusSummary {
            battler,
            battle_start,
        });
    }

    fn hide_party_status_summary(&mut self, battler: BattlerId) {
        self.calls.push(Call::HidePartyStatusSummary { battler });
    }

    fn party_status_summary_hide_pending(&self, _battler: BattlerId) -> bool {
        self.summary_hide_pending
    }

    fn intro_slide(&mut self, environment: u8) {
        self.calls.push(Call::IntroSlide { environment });
    }

    fn begin_battle_end_fade(&mut self) {
        self.calls.push(Call::BeginBattleEndFade);
        self.palette_fade = self.timings.palette_fade;
    }

    fn palette_fade_active(&self) -> bool {
        self.palette_fade > 0
    }

    fn advance_frame(&mut self) {
        tick_down(&mut self.printer);
        tick_down(&mut self.palette_fade);
        for stage in &mut self.stages {
            tick_down(&mut stage.sprite_busy);
            tick_down(&mut stage.faint);
            tick_down(&mut stage.ball);
            tick_down(&mut stage.shiny);
            tick_down(&mut stage.healthbox);
            tick_down(&mut stage.special);
            tick_down(&mut stage.status);
            tick_down(&mut stage.table);
        }
    }
}

impl TextPrinter for ScriptedPresentation {
    fn print_battle_string(&mut self, battler: BattlerId, string_id: u16) {
        self.calls.push(Call::PrintString { battler, string_id });
        self.printer = self.timings.print;
    }

    fn printer_active(&self) -> bool {
        self.printer > 0
    }
}

impl SoundPlayer for ScriptedPresentation {
    fn play_se(&mut self, se: u16, pan: i8) {
        self.calls.push(Call::PlaySe { se, pan });
    }

    fn stop_se(&mut self, se: u16) {
        self.calls.push(Call::StopSe { se });
    }

    fn play_bgm(&mut self, song: u16) {
        self.calls.push(Call::PlayBgm { song });
    }

    fn play_fanfare(&mut self, song: u16) {
        self.calls.push(Call::PlayFanfare { song });
    }

    fn play_cry(&mut self, species: u16, pan: i8, kind: CryKind) {
        self.calls.push(Call::PlayCry { species, pan, kind });
    }

    fn sound_busy(&self, battler: BattlerId) -> bool {
        self.stage(battler).sound_busy
    }

    fn update_low_hp_music(&mut self, battler: BattlerId, _mon: &Pokemon) {
        self.calls.push(Call::UpdateLowHpMusic { battler });
    }

    fn stop_low_hp_sound(&mut self) {
        self.calls.push(Call::StopLowHpSound);
    }

    fn fade_out_music(&mut self, speed: u8) {
        self.calls.push(Call::FadeOutMusic { speed });
    }
}

// ── FixedAi ─────────────────────────────────────────────────────

/// [`PartnerAi`] that always makes the same choices.
#[derive(Clone, Debug)]
pub struct FixedAi {
    choice: MoveChoice,
    target: MoveTarget,
    switch: Option<PartyIndex>,
}

impl Default for FixedAi {
    fn default() -> Self {
        Self {
            choice: MoveChoice {
                slot: 0,
                target: BattlerId::OPPONENT_LEFT,
            },
            target: MoveTarget::SELECTED,
            switch: None,
        }
    }
}

impl FixedAi {
    pub fn with_move(mut self, slot: u8, target: BattlerId) -> Self {
        self.choice = MoveChoice { slot, target };
        self
    }

    /// Targeting flags reported for every move.
    pub fn with_target(mut self, target: MoveTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_switch(mut self, index: PartyIndex) -> Self {
        self.switch = Some(index);
        self
    }
}

impl PartnerAi for FixedAi {
    fn choose_action(&mut self, _battler: BattlerId) {}

    fn choose_move(&mut self, _battler: BattlerId, _moves: &[u16; 4]) -> MoveChoice {
        self.choice
    }

    fn move_target(&self, _move_id: u16) -> MoveTarget {
        self.target
    }

    fn choose_switch(&mut self, _battler: BattlerId) -> Option<PartyIndex> {
        self.switch
    }
}

// ── TableSpecies ────────────────────────────────────────────────

/// [`SpeciesInfo`] backed by an ordered table.
///
/// Species missing from the table use [`GrowthRate::MediumFast`] and
/// [`TableSpecies::FALLBACK_STATS`].
#[derive(Clone, Debug, Default)]
pub struct TableSpecies {
    entries: IndexMap<u16, (GrowthRate, BaseStats)>,
}

impl TableSpecies {
    pub const FALLBACK_STATS: BaseStats = BaseStats {
        hp: 60,
        attack: 60,
        defense: 60,
        speed: 60,
        sp_attack: 60,
        sp_defense: 60,
    };

    pub fn with(mut self, species: u16, rate: GrowthRate, stats: BaseStats) -> Self {
        self.entries.insert(species, (rate, stats));
        self
    }
}

impl SpeciesInfo for TableSpecies {
    fn growth_rate(&self, species: u16) -> GrowthRate {
        self.entries
            .get(&species)
            .map_or(GrowthRate::MediumFast, |e| e.0)
    }

    fn base_stats(&self, species: u16) -> BaseStats {
        self.entries
            .get(&species)
            .map_or(Self::FALLBACK_STATS, |e| e.1)
    }
}
