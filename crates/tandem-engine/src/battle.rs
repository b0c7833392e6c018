//! The battle facade: participants, channels and the per-frame tick.
//!
//! [`Battle`] is the user-facing API. The controlling side assigns the
//! partner to a battler slot, writes commands with
//! [`issue()`](Battle::issue), drives frames with [`tick()`](Battle::tick)
//! and polls [`is_complete()`](Battle::is_complete). Responses the partner
//! sends back are read with [`responses()`](Battle::responses) or from a
//! cloned [`Receiver`].
//!
//! # Tick order
//!
//! ```text
//!   tick N:  controllers 0..4 ──► live tasks by (priority, slot) ──► advance_frame
//! ```
//!
//! A task created by a controller runs in the same tick. A task destroyed
//! by an earlier task in the same tick is skipped.
//!
//! # Ownership model
//!
//! `Battle` is single-threaded. All mutating methods take `&mut self`, so
//! no handler can observe another mid-step. The response channel is the
//! only part meant to leave the thread.

use crossbeam_channel::{Receiver, Sender};
use log::debug;
use smallvec::SmallVec;
use tandem_core::{
    BattlerId, Emitted, Party, PartyIndex, PartnerAi, Presentation, Response, SpeciesInfo,
    TickId, MAX_BATTLERS,
};

use crate::channel::{CommandChannel, CompletionSignals};
use crate::config::{ConfigError, EngineConfig};
use crate::controller::ControllerState;
use crate::error::{AssignError, IssueError};
use crate::scheduler::{TaskFunc, TaskScheduler};
use crate::state::{BattlerAnimState, BattleState};

// ── TickReport ──────────────────────────────────────────────────

/// What one [`Battle::tick()`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// The frame that just ran.
    pub tick: TickId,
    /// Battlers whose command completed this frame, in slot order.
    pub completed: SmallVec<[BattlerId; MAX_BATTLERS]>,
    /// Number of task steps run.
    pub tasks_run: usize,
}

// ── Battle ──────────────────────────────────────────────────────

/// A battle with the partner controller on one or more battler slots.
///
/// Created from an [`EngineConfig`] via [`new()`](Battle::new).
///
/// # Example
///
/// ```ignore
/// let mut battle = Battle::new(config, party, presentation, ai, species)?;
/// battle.assign_partner(BattlerId::PLAYER_RIGHT, PartyIndex(3))?;
/// battle.issue(BattlerId::PLAYER_RIGHT, &[Opcode::DrawTrainerPic.as_byte()])?;
/// while !battle.is_complete(BattlerId::PLAYER_RIGHT) {
///     battle.tick();
/// }
/// ```
pub struct Battle<P: Presentation> {
    pub(crate) config: EngineConfig,
    pub(crate) tick: TickId,
    pub(crate) controllers: [Option<ControllerState>; MAX_BATTLERS],
    pub(crate) channels: [CommandChannel; MAX_BATTLERS],
    pub(crate) signals: CompletionSignals,
    pub(crate) scheduler: TaskScheduler,
    pub(crate) state: BattleState,
    pub(crate) presentation: P,
    pub(crate) ai: Box<dyn PartnerAi>,
    pub(crate) species: Box<dyn SpeciesInfo>,
    outbox: Sender<Emitted>,
    inbox: Receiver<Emitted>,
}

impl<P: Presentation> Battle<P> {
    /// Create a battle with no partner assigned yet.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(
        config: EngineConfig,
        party: Party,
        presentation: P,
        ai: Box<dyn PartnerAi>,
        species: Box<dyn SpeciesInfo>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (outbox, inbox) = crossbeam_channel::unbounded();
        Ok(Self {
            scheduler: TaskScheduler::new(config.max_tasks),
            config,
            tick: TickId::default(),
            controllers: [None; MAX_BATTLERS],
            channels: Default::default(),
            signals: CompletionSignals::default(),
            state: BattleState::new(party),
            presentation,
            ai,
            species,
            outbox,
            inbox,
        })
    }

    /// Put the partner controller on `battler`, fielding `party_index`.
    ///
    /// The battler starts idle in [`ControllerState::RunCommand`].
    ///
    /// # Errors
    ///
    /// Returns [`AssignError`] for an unknown battler or party slot.
    pub fn assign_partner(
        &mut self,
        battler: BattlerId,
        party_index: PartyIndex,
    ) -> Result<(), AssignError> {
        if battler.index() >= MAX_BATTLERS {
            return Err(AssignError::UnknownBattler { battler });
        }
        self.state.set_party_index(battler, party_index)?;
        self.controllers[battler.index()] = Some(ControllerState::RunCommand);
        debug!("partner assigned to battler {battler} with party slot {party_index}");
        Ok(())
    }

    /// Write a command into `battler`'s channel and mark it pending.
    ///
    /// # Errors
    ///
    /// Rejects the command, leaving the channel untouched, if the battler
    /// is unknown or unassigned, its previous command has not completed,
    /// or `bytes` is empty or longer than the channel.
    pub fn issue(&mut self, battler: BattlerId, bytes: &[u8]) -> Result<(), IssueError> {
        let slot = battler.index();
        if slot >= MAX_BATTLERS {
            return Err(IssueError::UnknownBattler { battler });
        }
        if self.controllers[slot].is_none() {
            return Err(IssueError::NoController { battler });
        }
        if self.signals.is_pending(battler) {
            return Err(IssueError::Busy { battler });
        }
        self.channels[slot].load(bytes)?;
        self.signals.accept(battler)
    }

    /// Whether `battler` has no command in flight. Polling has no effect.
    pub fn is_complete(&self, battler: BattlerId) -> bool {
        self.signals.is_complete(battler)
    }

    /// Run one frame.
    pub fn tick(&mut self) -> TickReport {
        let mut completed = SmallVec::new();
        for battler in BattlerId::ALL {
            if self.advance(battler) {
                completed.push(battler);
            }
        }

        let mut tasks_run = 0;
        for id in self.scheduler.run_order() {
            let Some(func) = self.scheduler.get(id).map(|t| t.func) else {
                continue;
            };
            match func {
                TaskFunc::IntroBallThrow => self.run_intro_task(id),
                TaskFunc::Exp(step) => self.run_exp_task(id, step),
            }
            tasks_run += 1;
        }

        self.presentation.advance_frame();
        let tick = self.tick;
        self.tick = TickId(tick.0 + 1);
        TickReport {
            tick,
            completed,
            tasks_run,
        }
    }

    /// Drain every response emitted so far.
    pub fn responses(&self) -> Vec<Emitted> {
        self.inbox.try_iter().collect()
    }

    /// A receiver for responses, for reading them off the battle's thread.
    pub fn response_receiver(&self) -> Receiver<Emitted> {
        self.inbox.clone()
    }

    /// Tear down every partner controller and running task.
    ///
    /// Commands still in flight are dropped: channels are cleared, every
    /// completion bit is set again and per-battler sprite flags are reset.
    /// The battle accepts no commands until a partner is assigned again.
    pub fn end(&mut self) {
        for (slot, controller) in self.controllers.iter_mut().enumerate() {
            if controller.take().is_some() {
                debug!("partner controller on battler {slot} destroyed");
            }
        }
        for id in self.scheduler.run_order() {
            self.scheduler.destroy(id);
        }
        self.channels = Default::default();
        self.signals = CompletionSignals::default();
        self.state.anim = [BattlerAnimState::default(); MAX_BATTLERS];
    }

    /// Current controller state of `battler`, or `None` if unassigned.
    pub fn controller(&self, battler: BattlerId) -> Option<ControllerState> {
        self.controllers.get(battler.index()).copied().flatten()
    }

    /// Number of frames run.
    pub fn current_tick(&self) -> TickId {
        self.tick
    }

    /// The configuration the battle was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Completion bits of all battlers.
    pub fn signals(&self) -> CompletionSignals {
        self.signals
    }

    /// Running tasks.
    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }

    /// Battle-wide state.
    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// Battle-wide state, mutably.
    pub fn state_mut(&mut self) -> &mut BattleState {
        &mut self.state
    }

    /// The presentation collaborator.
    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    /// The presentation collaborator, mutably.
    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    pub(crate) fn emit(&mut self, battler: BattlerId, response: Response) {
        // The battle holds the receiver, so the channel cannot disconnect.
        let _ = self.outbox.send(Emitted { battler, response });
    }
}

impl<P: Presentation> std::fmt::Debug for Battle<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Battle")
            .field("tick", &self.tick)
            .field("controllers", &self.controllers)
            .field("signals", &self.signals)
            .field("tasks", &self.scheduler.len())
            .finish()
    }
}

// ── Test builders ───────────────────────────────────────────────

#[cfg(test)]
pub(crate) fn test_battle_full(
    config: EngineConfig,
    ai: tandem_test_utils::FixedAi,
) -> Battle<tandem_test_utils::ScriptedPresentation> {
    Battle::new(
        config,
        tandem_test_utils::fixtures::partner_party(),
        tandem_test_utils::ScriptedPresentation::default(),
        Box::new(ai),
        Box::new(tandem_test_utils::TableSpecies::default()),
    )
    .unwrap()
}

#[cfg(test)]
pub(crate) fn test_battle() -> Battle<tandem_test_utils::ScriptedPresentation> {
    test_battle_full(EngineConfig::default(), Default::default())
}

#[cfg(test)]
pub(crate) fn test_battle_with(
    config: EngineConfig,
) -> Battle<tandem_test_utils::ScriptedPresentation> {
    test_battle_full(config, Default::default())
}

#[cfg(test)]
pub(crate) fn test_battle_with_ai(
    ai: tandem_test_utils::FixedAi,
) -> Battle<tandem_test_utils::ScriptedPresentation> {
    test_battle_full(EngineConfig::default(), ai)
}
