//! The closed opcode enumeration carried in byte 0 of every command.
//!
//! Values are dense from 0 to [`Opcode::COUNT`] - 1. Any byte outside
//! that range decodes to `None` and is treated by the dispatcher as a
//! terminator: nothing runs and the command never completes.

/// Command opcodes understood by the partner controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Opcode {
    /// Pack requested fields of party members into a data response.
    GetMonData = 0,
    /// Raw party image read. No partner behaviour.
    GetRawMonData = 1,
    /// Write a field or record into party members.
    SetMonData = 2,
    /// Overwrite bytes of the active member's party image.
    SetRawMonData = 3,
    /// Load the battler sprite and slide it in.
    LoadMonSprite = 4,
    /// Send the battler out from its ball.
    SwitchInAnim = 5,
    /// Recall the battler.
    ReturnMonToBall = 6,
    /// Draw the partner trainer.
    DrawTrainerPic = 7,
    /// Trainer slide-in. No partner behaviour.
    TrainerSlide = 8,
    /// Slide the partner trainer off screen.
    TrainerSlideBack = 9,
    /// Fainting sequence.
    FaintAnimation = 10,
    /// No partner behaviour.
    PaletteFade = 11,
    /// No partner behaviour.
    SuccessBallThrowAnim = 12,
    /// No partner behaviour.
    BallThrowAnim = 13,
    /// No partner behaviour.
    Pause = 14,
    /// Play a move animation.
    MoveAnimation = 15,
    /// Print a battle string and wait for the printer.
    PrintString = 16,
    /// Player-only string. No partner behaviour.
    PrintSelectionString = 17,
    /// Let the AI choose an action.
    ChooseAction = 18,
    /// No partner behaviour.
    YesNoBox = 19,
    /// Let the AI choose a move and target.
    ChooseMove = 20,
    /// No partner behaviour.
    OpenBag = 21,
    /// Let the AI choose a switch-in.
    ChoosePokemon = 22,
    /// Unused slot.
    Cmd23 = 23,
    /// Animate the health bar.
    HealthBarUpdate = 24,
    /// Grant experience.
    ExpUpdate = 25,
    /// Refresh the status icon.
    StatusIconUpdate = 26,
    /// Play a status animation.
    StatusAnimation = 27,
    /// No partner behaviour.
    StatusXor = 28,
    /// No partner behaviour.
    DataTransfer = 29,
    /// No partner behaviour.
    Dma3Transfer = 30,
    /// No partner behaviour.
    PlayBgm = 31,
    /// Unused slot.
    Cmd32 = 32,
    /// No partner behaviour.
    TwoReturnValues = 33,
    /// No partner behaviour.
    ChosenMonReturnValue = 34,
    /// No partner behaviour.
    OneReturnValue = 35,
    /// No partner behaviour.
    OneReturnValueDuplicate = 36,
    /// Zero the shared battle variable.
    ClearSharedVar = 37,
    /// Set the shared battle variable.
    SetSharedVar = 38,
    /// Clear the shared battle flag.
    ClearSharedFlag = 39,
    /// Toggle the shared battle flag.
    ToggleSharedFlag = 40,
    /// Blink the battler after a hit.
    HitAnimation = 41,
    /// No partner behaviour.
    CantSwitch = 42,
    /// Play a sound effect panned by side.
    PlaySe = 43,
    /// Play a fanfare or background music.
    PlayFanfareOrBgm = 44,
    /// Play the fainting cry.
    FaintingCry = 45,
    /// Start the battle intro slide.
    IntroSlide = 46,
    /// Throw the intro ball.
    IntroTrainerBallThrow = 47,
    /// Show the party status summary.
    DrawPartyStatusSummary = 48,
    /// Hide the party status summary.
    HidePartyStatusSummary = 49,
    /// No partner behaviour.
    EndBounceEffect = 50,
    /// Show or hide the battler sprite.
    SpriteInvisibility = 51,
    /// Play a battle animation from the table.
    BattleAnimation = 52,
    /// No partner behaviour.
    LinkStandbyMsg = 53,
    /// No partner behaviour.
    ResetActionMoveSelection = 54,
    /// Record the outcome and fade out.
    EndLinkBattle = 55,
    /// No partner behaviour.
    DebugMenu = 56,
    /// Terminator. Never completes.
    TerminatorNop = 57,
}

impl Opcode {
    /// Number of declared opcodes.
    pub const COUNT: usize = 58;

    const TABLE: [Opcode; Self::COUNT] = [
        Self::GetMonData,
        Self::GetRawMonData,
        Self::SetMonData,
        Self::SetRawMonData,
        Self::LoadMonSprite,
        Self::SwitchInAnim,
        Self::ReturnMonToBall,
        Self::DrawTrainerPic,
        Self::TrainerSlide,
        Self::TrainerSlideBack,
        Self::FaintAnimation,
        Self::PaletteFade,
        Self::SuccessBallThrowAnim,
        Self::BallThrowAnim,
        Self::Pause,
        Self::MoveAnimation,
        Self::PrintString,
        Self::PrintSelectionString,
        Self::ChooseAction,
        Self::YesNoBox,
        Self::ChooseMove,
        Self::OpenBag,
        Self::ChoosePokemon,
        Self::Cmd23,
        Self::HealthBarUpdate,
        Self::ExpUpdate,
        Self::StatusIconUpdate,
        Self::StatusAnimation,
        Self::StatusXor,
        Self::DataTransfer,
        Self::Dma3Transfer,
        Self::PlayBgm,
        Self::Cmd32,
        Self::TwoReturnValues,
        Self::ChosenMonReturnValue,
        Self::OneReturnValue,
        Self::OneReturnValueDuplicate,
        Self::ClearSharedVar,
        Self::SetSharedVar,
        Self::ClearSharedFlag,
        Self::ToggleSharedFlag,
        Self::HitAnimation,
        Self::CantSwitch,
        Self::PlaySe,
        Self::PlayFanfareOrBgm,
        Self::FaintingCry,
        Self::IntroSlide,
        Self::IntroTrainerBallThrow,
        Self::DrawPartyStatusSummary,
        Self::HidePartyStatusSummary,
        Self::EndBounceEffect,
        Self::SpriteInvisibility,
        Self::BattleAnimation,
        Self::LinkStandbyMsg,
        Self::ResetActionMoveSelection,
        Self::EndLinkBattle,
        Self::DebugMenu,
        Self::TerminatorNop,
    ];

    /// Decode an opcode byte. Returns `None` outside the declared range.
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::TABLE.get(byte as usize).copied()
    }

    /// The wire byte for this opcode.
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Every declared opcode in wire order.
    pub fn all() -> &'static [Opcode] {
        &Self::TABLE
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> Self {
        op as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_discriminants() {
        for (i, op) in Opcode::all().iter().enumerate() {
            assert_eq!(op.as_byte() as usize, i);
            assert_eq!(Opcode::from_byte(i as u8), Some(*op));
        }
    }

    #[test]
    fn out_of_range_is_none() {
        assert_eq!(Opcode::from_byte(Opcode::COUNT as u8), None);
        assert_eq!(Opcode::from_byte(u8::MAX), None);
    }

    #[test]
    fn terminator_is_last() {
        assert_eq!(Opcode::from_byte(57), Some(Opcode::TerminatorNop));
    }
}
