//! Experience gain and leveling, run as a scheduler task.
//!
//! The `ExpUpdate` handler parks the battler in
//! [`AwaitTask`](crate::ControllerState::AwaitTask) and creates a task
//! that walks this chain, one step per tick:
//!
//! ```text
//!   GiveExp ─┬─ (double battle, or member not fielded by this battler)
//!            │      apply directly ─┬─ leveled, member on field ──► LevelUpAnim
//!            │                      ├─ leveled, member benched  ──► FinishExp
//!            │                      └─ no level ──► WaitText, task destroyed
//!            └─ PrepareExpBar ──► ExpBarFill (pre-delay, then bar)
//!                                   └─ bar done ─┬─ leveled ──► LevelUpAnim
//!                                                └─ no level ──► WaitText, task destroyed
//!   LevelUpAnim ──► WaitLevelUpAnim ──► FinishExp ──► WaitText, task destroyed
//! ```
//!
//! Crossing a level threshold caps experience at the threshold, recomputes
//! stats and reports the experience left over with
//! [`ReturnKind::LeveledUp`].

use log::{debug, error, warn};
use tandem_core::{
    recalculate_stats, BarSetup, BattleBar, BattlerId, HealthboxUpdate, PartyIndex,
    Presentation, Response, ReturnKind, SpecialAnim, TaskId,
};

use crate::battle::Battle;
use crate::controller::{ControllerState, Step};
use crate::handlers::SE_EXP;
use crate::scheduler::{ExpStep, TaskFunc};

/// Scheduler priority of experience tasks.
pub const EXP_TASK_PRIORITY: u8 = 10;

// Task data slots.
const MON: usize = 0;
const GAINED: usize = 1; // and 2
const BATTLER: usize = 3;
const FRAMES: usize = 10;

/// Result of applying experience to one member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Applied {
    LeveledUp,
    Gained,
}

/// Unpacked task data.
#[derive(Clone, Copy, Debug)]
struct ExpTask {
    mon: PartyIndex,
    gained: u32,
    battler: BattlerId,
}

impl<P: Presentation> Battle<P> {
    pub(crate) fn exp_update(&mut self, battler: BattlerId, mon: PartyIndex, amount: u32) -> Step {
        let Some(member) = self.state.party.get(mon) else {
            warn!("battler {battler}: experience for invalid party slot {mon}");
            return Step::Complete;
        };
        if member.level >= self.config.max_level {
            return Step::Complete;
        }
        let first = TaskFunc::Exp(ExpStep::GiveExp);
        let id = match self.scheduler.create(first, EXP_TASK_PRIORITY) {
            Ok(id) => id,
            Err(e) => {
                error!("battler {battler}: cannot start experience task: {e}");
                return Step::Complete;
            }
        };
        if let Some(task) = self.scheduler.get_mut(id) {
            task.data[MON] = mon.0 as i16;
            task.set_u32(GAINED, amount);
            task.data[BATTLER] = battler.0 as i16;
        }
        Step::Goto(ControllerState::AwaitTask)
    }

    fn exp_task(&self, id: TaskId) -> Option<ExpTask> {
        let task = self.scheduler.get(id)?;
        Some(ExpTask {
            mon: PartyIndex(task.data[MON] as u8),
            gained: task.get_u32(GAINED),
            battler: BattlerId(task.data[BATTLER] as u8),
        })
    }

    fn set_task_func(&mut self, id: TaskId, step: ExpStep) {
        if let Some(task) = self.scheduler.get_mut(id) {
            task.func = TaskFunc::Exp(step);
        }
    }

    /// Hand the battler back to the text wait and drop the task.
    fn end_exp_task(&mut self, id: TaskId, battler: BattlerId) {
        self.set_controller(battler, ControllerState::WaitText);
        self.scheduler.destroy(id);
    }

    /// Add `gained` to a member, stopping at the next level threshold.
    fn apply_exp(&mut self, t: ExpTask) -> Applied {
        let max_level = self.config.max_level;
        let Some(mon) = self.state.party.get_mut(t.mon) else {
            return Applied::Gained;
        };
        let next = self
            .species
            .growth_rate(mon.species)
            .experience_for_level(mon.level.saturating_add(1));
        if mon.experience.saturating_add(t.gained) < next {
            mon.experience = mon.experience.saturating_add(t.gained);
            return Applied::Gained;
        }
        let remainder = t.gained.saturating_sub(next.saturating_sub(mon.experience));
        mon.experience = next;
        recalculate_stats(mon, &*self.species, max_level);
        debug!(
            "party slot {} reached level {}, {remainder} experience left over",
            t.mon, mon.level
        );
        self.emit(
            t.battler,
            Response::TwoReturnValues {
                kind: ReturnKind::LeveledUp,
                value: remainder,
            },
        );
        Applied::LeveledUp
    }

    /// Run one step of an experience task.
    pub(crate) fn run_exp_task(&mut self, id: TaskId, step: ExpStep) {
        let Some(t) = self.exp_task(id) else {
            return;
        };
        match step {
            ExpStep::GiveExp => self.give_exp(id, t),
            ExpStep::PrepareExpBar => self.prepare_exp_bar(id, t),
            ExpStep::ExpBarFill => self.exp_bar_fill(id, t),
            ExpStep::LevelUpAnim => {
                let target = self.level_up_target(t);
                self.presentation
                    .launch_special_animation(target, SpecialAnim::LevelUp);
                self.set_task_func(id, ExpStep::WaitLevelUpAnim);
            }
            ExpStep::WaitLevelUpAnim => {
                let target = self.level_up_target(t);
                if self.presentation.special_animation_active(target) {
                    return;
                }
                if let Some(mon) = self.state.party.get(t.mon) {
                    self.presentation
                        .update_healthbox(target, mon, HealthboxUpdate::All);
                }
                self.set_task_func(id, ExpStep::FinishExp);
            }
            ExpStep::FinishExp => self.end_exp_task(id, t.battler),
        }
    }

    fn give_exp(&mut self, id: TaskId, t: ExpTask) {
        let double = self.config.is_double();
        let fielded = self.state.party_index(t.battler);
        if !double && t.mon == fielded {
            self.set_task_func(id, ExpStep::PrepareExpBar);
            return;
        }
        match self.apply_exp(t) {
            Applied::LeveledUp => {
                let on_field =
                    t.mon == fielded || t.mon == self.state.party_index(t.battler.flank());
                let next = if double && on_field {
                    ExpStep::LevelUpAnim
                } else {
                    ExpStep::FinishExp
                };
                self.set_task_func(id, next);
            }
            Applied::Gained => self.end_exp_task(id, t.battler),
        }
    }

    fn prepare_exp_bar(&mut self, id: TaskId, t: ExpTask) {
        let Some(mon) = self.state.party.get(t.mon) else {
            self.end_exp_task(id, t.battler);
            return;
        };
        let rate = self.species.growth_rate(mon.species);
        let current_level = rate.experience_for_level(mon.level);
        let next_level = rate.experience_for_level(mon.level.saturating_add(1));
        let setup = BarSetup {
            max: clamp_i32(next_level.saturating_sub(current_level)),
            current: clamp_i32(mon.experience.saturating_sub(current_level)),
            delta: clamp_i32(t.gained),
        };
        self.presentation
            .start_bar(t.battler, BattleBar::Exp, setup);
        self.presentation.play_se(SE_EXP, 0);
        self.set_task_func(id, ExpStep::ExpBarFill);
    }

    fn exp_bar_fill(&mut self, id: TaskId, t: ExpTask) {
        let delay = self.config.exp_bar_delay;
        if let Some(task) = self.scheduler.get_mut(id) {
            if task.data[FRAMES] < delay {
                task.data[FRAMES] += 1;
                return;
            }
        }
        let value = self.presentation.step_bar(t.battler, BattleBar::Exp);
        self.presentation.set_healthbox_visible(t.battler, true);
        if value.is_some() {
            return;
        }
        self.presentation.stop_se(SE_EXP);
        match self.apply_exp(t) {
            Applied::LeveledUp => self.set_task_func(id, ExpStep::LevelUpAnim),
            Applied::Gained => self.end_exp_task(id, t.battler),
        }
    }

    /// The battler whose sprite shows the level-up: the flank if it fields
    /// the member in a double battle.
    fn level_up_target(&self, t: ExpTask) -> BattlerId {
        let flank = t.battler.flank();
        if self.config.is_double() && t.mon == self.state.party_index(flank) {
            flank
        } else {
            t.battler
        }
    }
}

fn clamp_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}
