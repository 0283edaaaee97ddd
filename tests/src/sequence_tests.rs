//! Automatic-sequence timing tests over the virtual-tick harness

use proptest::prelude::*;
use signal_core::test_utils::harness::Simulator;
use signal_core::{default_config, ControllerConfig, Duration, LightPattern, Mode, Phase};

fn simulator() -> Simulator {
    Simulator::new(default_config())
}

#[test]
fn undisturbed_cycle_is_280_ticks() {
    let mut sim = simulator();
    let trace = sim.run::<280>(280);

    assert_eq!(trace.len(), 280);
    assert!(trace[..100].iter().all(|r| r.pattern == LightPattern::RED));
    assert!(trace[100..250].iter().all(|r| r.pattern == LightPattern::GREEN));
    assert!(trace[250..280].iter().all(|r| r.pattern == LightPattern::YELLOW));

    // The cycle wraps: tick 281 is red again with a fresh counter
    let record = sim.step();
    assert_eq!(record.pattern, LightPattern::RED);
    assert_eq!(record.phase, Phase::Red);
    assert_eq!(record.elapsed_ticks, 1);
}

#[test]
fn every_automatic_tick_lights_exactly_one_indicator() {
    let mut sim = simulator();
    for _ in 0..600 {
        let record = sim.step();
        assert_eq!(record.mode, Some(Mode::Automatic));
        assert_eq!(record.pattern.lit_count(), 1);
    }
}

#[test]
fn phase_boundaries_land_on_configured_durations() {
    let mut sim = simulator();

    // 99 red ticks in, still red with the counter at 99
    sim.run::<128>(99);
    assert_eq!(sim.phase(), Phase::Red);
    assert_eq!(sim.elapsed_ticks(), 99);

    // Tick 100 shows red and flips the phase in the same iteration
    let record = sim.step();
    assert_eq!(record.pattern, LightPattern::RED);
    assert_eq!(record.phase, Phase::Green);
    assert_eq!(record.elapsed_ticks, 0);
}

#[test]
fn counter_increases_by_one_per_automatic_tick() {
    let mut sim = simulator();
    let mut previous = 0;

    for _ in 0..99 {
        let record = sim.step();
        assert_eq!(record.elapsed_ticks, previous + 1);
        previous = record.elapsed_ticks;
    }
}

#[test]
fn held_override_parks_the_sequence() {
    let mut sim = simulator();
    sim.set_green_switch(true);

    // Far longer than any phase duration
    for _ in 0..500 {
        let record = sim.step();
        assert_eq!(record.mode, Some(Mode::ManualGreen));
        assert_eq!(record.pattern, LightPattern::GREEN);
        assert_eq!(record.elapsed_ticks, 0);
    }
    assert_eq!(sim.phase(), Phase::Red);
}

#[test]
fn release_resumes_interrupted_phase_from_zero() {
    let mut sim = simulator();

    // 140 automatic ticks: Green, 40 ticks in
    sim.run::<160>(140);
    assert_eq!(sim.phase(), Phase::Green);
    assert_eq!(sim.elapsed_ticks(), 40);

    // Yellow switch held for 10 ticks
    sim.set_yellow_switch(true);
    let trace = sim.run::<16>(10);
    assert!(trace.iter().all(|r| r.pattern == LightPattern::YELLOW));

    // Release: Green resumes at tick 1, not 41, not 51
    sim.set_yellow_switch(false);
    let record = sim.step();
    assert_eq!(record.mode, Some(Mode::Automatic));
    assert_eq!(record.pattern, LightPattern::GREEN);
    assert_eq!(record.elapsed_ticks, 1);
}

#[test]
fn short_cycle_walks_all_three_phases_in_order() {
    let config = ControllerConfig::new(
        3,
        4,
        2,
        Duration::from_millis(100),
        Duration::from_millis(10_000),
        50,
    )
    .unwrap();
    let mut sim = Simulator::new(config);

    let trace = sim.run::<9>(9);
    let patterns: Vec<_> = trace.iter().map(|r| r.pattern).collect();
    assert_eq!(
        patterns,
        [
            LightPattern::RED,
            LightPattern::RED,
            LightPattern::RED,
            LightPattern::GREEN,
            LightPattern::GREEN,
            LightPattern::GREEN,
            LightPattern::GREEN,
            LightPattern::YELLOW,
            LightPattern::YELLOW,
        ]
    );
}

proptest! {
    /// Whatever the switches do, the counter stays under the phase
    /// duration and the head never shows two lit indicators.
    #[test]
    fn counter_bounded_under_arbitrary_switch_scripts(
        script in proptest::collection::vec(0u8..4, 1..400)
    ) {
        let config = default_config();
        let mut sim = Simulator::new(config);

        for levels in script {
            sim.set_yellow_switch(levels & 1 != 0);
            sim.set_green_switch(levels & 2 != 0);
            let record = sim.step();

            prop_assert!(record.pattern.is_exclusive());
            prop_assert!(record.elapsed_ticks < config.phase_ticks(record.phase));
        }
    }
}
