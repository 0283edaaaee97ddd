//! Arbitration-priority tests: first matching branch wins, absolutely

use rstest::rstest;
use signal_core::test_utils::harness::Simulator;
use signal_core::{
    default_config, ControlArbiter, Decision, LightPattern, Mode, SwitchState,
};

/// Expected winner per input combination
#[derive(Debug, PartialEq)]
enum Winner {
    Crossing,
    Yellow,
    Green,
    Automatic,
}

#[rstest]
#[case(false, false, false, Winner::Automatic)]
#[case(false, false, true, Winner::Green)]
#[case(false, true, false, Winner::Yellow)]
#[case(false, true, true, Winner::Yellow)]
#[case(true, false, false, Winner::Crossing)]
#[case(true, false, true, Winner::Crossing)]
#[case(true, true, false, Winner::Crossing)]
#[case(true, true, true, Winner::Crossing)]
fn priority_table(
    #[case] pedestrian: bool,
    #[case] yellow: bool,
    #[case] green: bool,
    #[case] expected: Winner,
) {
    let mut arbiter = ControlArbiter::new(default_config());
    let decision = arbiter.evaluate(pedestrian, SwitchState { yellow, green });

    let winner = match decision {
        Decision::Crossing => Winner::Crossing,
        Decision::Drive(Mode::ManualYellow, _) => Winner::Yellow,
        Decision::Drive(Mode::ManualGreen, _) => Winner::Green,
        Decision::Drive(Mode::Automatic, _) => Winner::Automatic,
    };
    assert_eq!(winner, expected);
}

#[rstest]
#[case(Mode::ManualYellow, LightPattern::YELLOW)]
#[case(Mode::ManualGreen, LightPattern::GREEN)]
fn override_patterns(#[case] mode: Mode, #[case] expected: LightPattern) {
    let mut arbiter = ControlArbiter::new(default_config());
    let switches = match mode {
        Mode::ManualYellow => SwitchState { yellow: true, green: false },
        Mode::ManualGreen => SwitchState { yellow: false, green: true },
        Mode::Automatic => SwitchState::released(),
    };

    match arbiter.evaluate(false, switches) {
        Decision::Drive(m, pattern) => {
            assert_eq!(m, mode);
            assert_eq!(pattern, expected);
            assert!(m.is_override());
        }
        Decision::Crossing => panic!("no crossing was requested"),
    }
}

#[test]
fn pedestrian_wins_over_everything_held_at_once() {
    let mut sim = Simulator::new(default_config());
    sim.set_yellow_switch(true);
    sim.set_green_switch(true);
    sim.press_call_button();

    let record = sim.step();
    assert!(record.is_crossing());
    assert_eq!(record.pattern, LightPattern::RED);

    // The crossing consumed the request; yellow now wins over green
    let record = sim.step();
    assert_eq!(record.mode, Some(Mode::ManualYellow));
    assert_eq!(record.pattern, LightPattern::YELLOW);
}

#[test]
fn evaluation_order_is_total_within_one_tick() {
    // One branch per tick: an automatic tick under released switches must
    // not also reset the counter the way an override would
    let mut sim = Simulator::new(default_config());
    sim.run::<8>(5);
    assert_eq!(sim.elapsed_ticks(), 5);

    sim.set_yellow_switch(true);
    sim.step();
    assert_eq!(sim.elapsed_ticks(), 0);

    sim.set_yellow_switch(false);
    sim.step();
    assert_eq!(sim.elapsed_ticks(), 1);
}
