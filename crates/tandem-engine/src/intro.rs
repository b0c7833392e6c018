//! Battle intro: the partner trainer slides out and throws the first ball.
//!
//! `IntroTrainerBallThrow` parks the battler in
//! [`AwaitIntroTask`](crate::ControllerState::AwaitIntroTask) and starts a
//! task that waits [`EngineConfig::intro_ball_delay`](crate::EngineConfig)
//! ticks before sending out the battler's member, and its flank's in a
//! non-multi double battle. The controller then waits for the ball
//! animations and healthboxes.

use log::error;
use tandem_core::{BattlerId, Presentation, TaskId};

use crate::battle::Battle;
use crate::controller::{ControllerState, Step};
use crate::scheduler::TaskFunc;

/// Scheduler priority of the intro task.
pub const INTRO_TASK_PRIORITY: u8 = 5;

const BATTLER: usize = 0;
const FRAMES: usize = 1;

impl<P: Presentation> Battle<P> {
    pub(crate) fn intro_trainer_ball_throw(&mut self, battler: BattlerId) -> Step {
        self.presentation.start_intro_trainer_slide_out(battler);
        let id = match self
            .scheduler
            .create(TaskFunc::IntroBallThrow, INTRO_TASK_PRIORITY)
        {
            Ok(id) => id,
            Err(e) => {
                error!("battler {battler}: cannot start intro task: {e}");
                return Step::Complete;
            }
        };
        if let Some(task) = self.scheduler.get_mut(id) {
            task.data[BATTLER] = battler.0 as i16;
        }
        let anim = self.state.anim_mut(battler);
        if anim.summary_shown {
            anim.summary_shown = false;
            self.presentation.hide_party_status_summary(battler);
        }
        self.state.intro_sequence_active = true;
        Step::Goto(ControllerState::AwaitIntroTask)
    }

    pub(crate) fn run_intro_task(&mut self, id: TaskId) {
        let delay = self.config.intro_ball_delay;
        let Some(task) = self.scheduler.get_mut(id) else {
            return;
        };
        if task.data[FRAMES] < delay {
            task.data[FRAMES] += 1;
            return;
        }
        let battler = BattlerId(task.data[BATTLER] as u8);
        let flank = self.config.sends_out_flank().then(|| battler.flank());
        for b in std::iter::once(battler).chain(flank) {
            let mon = self.state.active(b);
            self.presentation.start_send_out(b, mon);
        }
        self.set_controller(battler, ControllerState::IntroWaitBallAnims { primed: false });
        self.scheduler.destroy(id);
    }
}
