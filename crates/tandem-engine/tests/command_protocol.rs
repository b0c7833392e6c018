//! Integration test: the command protocol seen from the controlling side.
//!
//! Issues byte commands through the public `Battle` API only and checks
//! completion timing, responses and the busy-channel contract.

use proptest::prelude::*;
use tandem_core::{
    BattlerId, Emitted, GrowthRate, MonDataRequest, Opcode, PartyIndex, Response, ReturnKind,
    MAX_LEVEL,
};
use tandem_engine::{Battle, ControllerState, EngineConfig};
use tandem_test_utils::{fixtures, Call, FixedAi, ScriptedPresentation, TableSpecies, Timings};

const PARTNER: BattlerId = BattlerId::PLAYER_RIGHT;
const PARTNER_MON: PartyIndex = PartyIndex(3);

fn battle_with(timings: Timings) -> Battle<ScriptedPresentation> {
    let mut battle = Battle::new(
        EngineConfig::default(),
        fixtures::partner_party(),
        ScriptedPresentation::new(timings),
        Box::new(FixedAi::default()),
        Box::new(TableSpecies::default()),
    )
    .unwrap();
    battle.assign_partner(PARTNER, PARTNER_MON).unwrap();
    battle
}

fn battle() -> Battle<ScriptedPresentation> {
    battle_with(Timings::default())
}

fn ticks_until_complete(battle: &mut Battle<ScriptedPresentation>, limit: u32) -> u32 {
    for n in 1..=limit {
        battle.tick();
        if battle.is_complete(PARTNER) {
            return n;
        }
    }
    panic!("command did not complete within {limit} ticks");
}

fn exp_cmd(mon: PartyIndex, amount: u32) -> Vec<u8> {
    let mut cmd = vec![Opcode::ExpUpdate.as_byte(), mon.0];
    cmd.extend_from_slice(&amount.to_le_bytes());
    cmd
}

fn leveled_up(responses: &[Emitted]) -> Option<u32> {
    responses.iter().find_map(|e| match e.response {
        Response::TwoReturnValues {
            kind: ReturnKind::LeveledUp,
            value,
        } => Some(value),
        _ => None,
    })
}

// ── Terminator ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn opcodes_past_the_table_never_complete(op in Opcode::TerminatorNop.as_byte()..=u8::MAX, ticks in 1u32..20) {
        let mut battle = battle();
        battle.issue(PARTNER, &[op, 1, 2, 3]).unwrap();
        let before = battle.state().clone();
        for _ in 0..ticks {
            let report = battle.tick();
            prop_assert!(report.completed.is_empty());
        }
        prop_assert!(!battle.is_complete(PARTNER));
        prop_assert!(battle.presentation().calls().is_empty());
        prop_assert!(battle.responses().is_empty());
        prop_assert_eq!(battle.state(), &before);
        prop_assert_eq!(battle.controller(PARTNER), Some(ControllerState::RunCommand));
    }
}

// ── Set then get ────────────────────────────────────────────────

fn width_mask(bytes: usize) -> u32 {
    if bytes >= 4 {
        u32::MAX
    } else {
        (1u32 << (bytes * 8)) - 1
    }
}

proptest! {
    #[test]
    fn set_then_get_round_trips(req in 0u8..=MonDataRequest::LAST, raw in any::<u32>()) {
        let request = MonDataRequest::from_byte(req).unwrap();
        let Some(field) = request.field() else {
            return Ok(());
        };
        let set_w = request.set_width();
        let value = raw & width_mask(set_w) & width_mask(request.get_width()) & field.max_value();

        let mut battle = battle();
        let mut set = vec![Opcode::SetMonData.as_byte(), req, 0];
        set.extend_from_slice(&value.to_le_bytes()[..set_w]);
        battle.issue(PARTNER, &set).unwrap();
        battle.tick();
        prop_assert!(battle.is_complete(PARTNER));

        battle.issue(PARTNER, &[Opcode::GetMonData.as_byte(), req, 0]).unwrap();
        battle.tick();
        let out = battle.responses();
        let Response::MonData { data, overflow: None } = &out[0].response else {
            panic!("unexpected {out:?}");
        };
        let mut le = [0u8; 4];
        le[..data.len()].copy_from_slice(data);
        prop_assert_eq!(u32::from_le_bytes(le), value);
    }
}

// ── Experience ──────────────────────────────────────────────────

#[test]
fn max_level_exp_is_a_one_tick_no_op() {
    let mut battle = battle();
    let mon = &mut battle.state_mut().party.slots_mut()[PARTNER_MON.index()];
    mon.level = MAX_LEVEL;
    mon.experience = GrowthRate::MediumFast.experience_for_level(MAX_LEVEL);
    let before = battle.state().clone();

    battle.issue(PARTNER, &exp_cmd(PARTNER_MON, 5_000)).unwrap();
    let report = battle.tick();
    assert_eq!(report.completed.as_slice(), &[PARTNER]);
    assert_eq!(battle.state(), &before);
    assert!(battle.responses().is_empty());
    assert!(battle.scheduler().is_empty());
}

#[test]
fn exact_threshold_reports_zero_remainder() {
    let mut battle = battle();
    let mon = battle.state().party.slots()[PARTNER_MON.index()].clone();
    let to_next = GrowthRate::MediumFast.experience_for_level(mon.level + 1) - mon.experience;
    battle.issue(PARTNER, &exp_cmd(PARTNER_MON, to_next)).unwrap();
    ticks_until_complete(&mut battle, 200);
    assert_eq!(leveled_up(&battle.responses()), Some(0));
    assert_eq!(
        battle.state().party.slots()[PARTNER_MON.index()].level,
        mon.level + 1
    );
}

#[test]
fn overshoot_reports_remainder() {
    let mut battle = battle();
    let mon = battle.state().party.slots()[PARTNER_MON.index()].clone();
    let to_next = GrowthRate::MediumFast.experience_for_level(mon.level + 1) - mon.experience;
    battle.issue(PARTNER, &exp_cmd(PARTNER_MON, to_next + 42)).unwrap();
    ticks_until_complete(&mut battle, 200);
    assert_eq!(leveled_up(&battle.responses()), Some(42));
}

#[test]
fn short_of_threshold_reports_nothing() {
    let mut battle = battle();
    battle.issue(PARTNER, &exp_cmd(PARTNER_MON, 1)).unwrap();
    ticks_until_complete(&mut battle, 200);
    assert_eq!(leveled_up(&battle.responses()), None);
}

// ── Idempotent polling ──────────────────────────────────────────

#[test]
fn polling_an_unmet_guard_changes_nothing() {
    let mut battle = battle_with(Timings {
        status_anim: 1_000,
        ..Timings::default()
    });
    battle
        .issue(PARTNER, &[Opcode::StatusAnimation.as_byte(), 0, 8, 0, 0, 0])
        .unwrap();
    battle.tick();
    assert_eq!(
        battle.controller(PARTNER),
        Some(ControllerState::WaitStatusAnimation)
    );
    let calls = battle.presentation().calls().len();
    let state = battle.state().clone();
    for _ in 0..50 {
        battle.tick();
        assert_eq!(
            battle.controller(PARTNER),
            Some(ControllerState::WaitStatusAnimation)
        );
    }
    assert_eq!(battle.presentation().calls().len(), calls);
    assert_eq!(battle.state(), &state);
    assert!(!battle.is_complete(PARTNER));
}

// ── Move animation timing ───────────────────────────────────────

fn move_animation_cmd(move_id: u16) -> Vec<u8> {
    let mut cmd = vec![0u8; 16];
    cmd[0] = Opcode::MoveAnimation.as_byte();
    cmd[1..3].copy_from_slice(&move_id.to_le_bytes());
    cmd
}

proptest! {
    #[test]
    fn move_animation_ticks_are_deterministic(frames in 0u32..40, move_id in 1u16..354) {
        let run = || {
            let mut battle = battle();
            battle.presentation_mut().set_move_animation_frames(frames);
            battle.issue(PARTNER, &move_animation_cmd(move_id)).unwrap();
            ticks_until_complete(&mut battle, 200)
        };
        let first = run();
        prop_assert_eq!(first, run());
        // Dispatch, substitute check, start, at least one drive step, finish.
        prop_assert_eq!(first, 4 + frames.max(1));
    }
}

#[test]
fn substitute_is_hidden_and_restored_around_move() {
    let mut battle = battle();
    battle.state_mut().anim_mut(PARTNER).behind_substitute = true;
    battle.issue(PARTNER, &move_animation_cmd(33)).unwrap();
    ticks_until_complete(&mut battle, 50);
    let anims: Vec<_> = battle
        .presentation()
        .calls()
        .iter()
        .filter_map(|c| match c {
            Call::SpecialAnimation { anim, .. } => Some(*anim),
            _ => None,
        })
        .collect();
    assert_eq!(
        anims,
        vec![
            tandem_core::SpecialAnim::SubstituteToMon,
            tandem_core::SpecialAnim::MonToSubstitute
        ]
    );
}

// ── Busy channel ────────────────────────────────────────────────

#[test]
fn second_command_is_rejected_until_first_completes() {
    let mut battle = battle_with(Timings {
        print: 5,
        ..Timings::default()
    });
    battle
        .issue(PARTNER, &[Opcode::PrintString.as_byte(), 7, 0])
        .unwrap();
    battle.tick();
    assert!(battle
        .issue(PARTNER, &[Opcode::PlaySe.as_byte(), 9, 0])
        .is_err());

    ticks_until_complete(&mut battle, 20);
    assert!(!battle
        .presentation()
        .calls()
        .iter()
        .any(|c| matches!(c, Call::PlaySe { se: 9, .. })));

    battle
        .issue(PARTNER, &[Opcode::PlaySe.as_byte(), 9, 0])
        .unwrap();
    battle.tick();
    assert!(battle
        .presentation()
        .calls()
        .contains(&Call::PlaySe { se: 9, pan: -64 }));
}

#[test]
fn cry_gate_holds_animation_without_side_effects() {
    let mut battle = battle();
    battle.presentation_mut().set_sound_busy(PARTNER, true);
    battle
        .issue(PARTNER, &[Opcode::BattleAnimation.as_byte(), 3, 0, 0])
        .unwrap();
    for _ in 0..5 {
        battle.tick();
    }
    assert!(battle.presentation().calls().is_empty());
    battle.presentation_mut().set_sound_busy(PARTNER, false);
    assert_eq!(ticks_until_complete(&mut battle, 5), 2);
    assert_eq!(
        battle.presentation().calls(),
        &[Call::TableAnimation {
            battler: PARTNER,
            anim_id: 3,
            argument: 0
        }]
    );
}
