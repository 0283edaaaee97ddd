// Controller smoke run over the virtual-tick harness

use signal_core::test_utils::harness::Simulator;
use signal_core::{default_config, LightPattern, Phase};

fn main() {
    println!("🚦 Controller Integration Smoke Run");

    // Walk 1: one undisturbed cycle
    walk_full_cycle();

    // Walk 2: pedestrian crossing from mid-green
    walk_pedestrian_crossing();

    // Walk 3: manual override and release
    walk_manual_override();

    println!("✅ All smoke walks passed!");
    println!();
    println!("📝 Run the full suite with: cargo test");
}

/// One full automatic cycle, counting ticks per phase
fn walk_full_cycle() {
    println!("🔁 Walking one undisturbed cycle...");

    let config = default_config();
    let mut sim = Simulator::new(config);

    let mut red = 0u32;
    let mut green = 0u32;
    let mut yellow = 0u32;

    for _ in 0..config.cycle_ticks() {
        let record = sim.step();
        if record.pattern == LightPattern::RED {
            red += 1;
        } else if record.pattern == LightPattern::GREEN {
            green += 1;
        } else if record.pattern == LightPattern::YELLOW {
            yellow += 1;
        } else {
            panic!("unexpected pattern: {:?}", record.pattern);
        }
    }

    assert_eq!(red, config.red_ticks);
    assert_eq!(green, config.green_ticks);
    assert_eq!(yellow, config.yellow_ticks);
    assert_eq!(sim.phase(), Phase::Red);

    println!(
        "  ✅ Cycle closed: {} red / {} green / {} yellow ticks",
        red, green, yellow
    );
}

/// Press the call button mid-green and watch the sequence restart at red
fn walk_pedestrian_crossing() {
    println!("🚶 Walking a pedestrian crossing...");

    let mut sim = Simulator::new(default_config());
    sim.run::<256>(170); // into Green
    assert_eq!(sim.phase(), Phase::Green);

    assert!(sim.press_call_button());
    let record = sim.step();
    assert!(record.is_crossing());
    assert_eq!(record.pattern, LightPattern::RED);
    assert!(!sim.latch().is_pending());
    assert_eq!(sim.phase(), Phase::Red);

    println!("  ✅ Crossing serviced, sequence back at red");
}

/// Hold yellow mid-green, release, and watch green restart from zero
fn walk_manual_override() {
    println!("🎚️ Walking a manual override...");

    let mut sim = Simulator::new(default_config());
    sim.run::<160>(140); // Green, 40 ticks in
    assert_eq!(sim.elapsed_ticks(), 40);

    sim.set_yellow_switch(true);
    for _ in 0..10 {
        let record = sim.step();
        assert_eq!(record.pattern, LightPattern::YELLOW);
    }

    sim.set_yellow_switch(false);
    let record = sim.step();
    assert_eq!(record.pattern, LightPattern::GREEN);
    assert_eq!(record.elapsed_ticks, 1);

    println!("  ✅ Override held and released, green restarted from zero");
}
