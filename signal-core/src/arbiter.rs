//! Control-mode arbitration and the automatic sequence timer

use crate::latch::PedestrianRequest;
use crate::types::{ControllerConfig, Decision, LightPattern, Mode, Phase, SwitchState};

/// Per-tick arbiter over the four control modes.
///
/// Owns the automatic sequence's phase and countdown. Evaluated once per
/// tick in strict priority order: pedestrian crossing, manual yellow,
/// manual green, automatic sequence. Exactly one branch drives the lights
/// on any tick.
pub struct ControlArbiter {
    phase: Phase,
    elapsed_ticks: u32,
    config: ControllerConfig,
}

impl ControlArbiter {
    /// Create a new arbiter in the power-up state: Red, counter at zero
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            phase: Phase::Red,
            elapsed_ticks: 0,
            config,
        }
    }

    /// Current phase of the automatic sequence
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Ticks spent in the current phase
    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed_ticks
    }

    /// Get current configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Evaluate one tick.
    ///
    /// First matching branch wins; the others are skipped for this tick.
    /// A [`Decision::Crossing`] leaves the arbiter untouched — the caller
    /// holds red for the crossing pause, clears the latch, and then calls
    /// [`finish_crossing`](Self::finish_crossing). Manual overrides reset
    /// the phase counter, so the sequence restarts the interrupted phase
    /// from zero once they end.
    pub fn evaluate(&mut self, crossing_requested: bool, switches: SwitchState) -> Decision {
        if crossing_requested {
            return Decision::Crossing;
        }

        if switches.yellow {
            self.elapsed_ticks = 0;
            return Decision::Drive(Mode::ManualYellow, LightPattern::YELLOW);
        }

        if switches.green {
            self.elapsed_ticks = 0;
            return Decision::Drive(Mode::ManualGreen, LightPattern::GREEN);
        }

        Decision::Drive(Mode::Automatic, self.advance_automatic())
    }

    /// One tick of the automatic sequence: count, drive the current
    /// phase's pattern, and advance on expiry.
    fn advance_automatic(&mut self) -> LightPattern {
        self.elapsed_ticks += 1;
        let pattern = self.phase.pattern();

        if self.elapsed_ticks >= self.config.phase_ticks(self.phase) {
            self.phase = self.phase.next();
            self.elapsed_ticks = 0;
        }

        pattern
    }

    /// Complete a pedestrian crossing: the sequence re-enters Red with the
    /// counter at zero, bypassing the normal Yellow → Red edge.
    ///
    /// Called after the crossing hold has fully elapsed and the request
    /// latch has been cleared.
    pub fn finish_crossing(&mut self) {
        self.phase = Phase::Red;
        self.elapsed_ticks = 0;
    }
}

/// Async task running the control loop against HAL-provided inputs and
/// lamps, with `embassy_time` pauses as the tick reference.
#[cfg(feature = "embassy-time")]
pub async fn control_task<Y, G, L>(
    latch: &PedestrianRequest,
    yellow_switch: &mut Y,
    green_switch: &mut G,
    lamps: &mut L,
    config: ControllerConfig,
) -> !
where
    Y: crate::hal::OverrideSwitch,
    G: crate::hal::OverrideSwitch,
    L: crate::hal::LampBank,
{
    use embassy_time::Timer;

    let mut arbiter = ControlArbiter::new(config);

    // Power-up output state: red before the first evaluation
    lamps.apply(LightPattern::RED).ok();

    loop {
        // A failed level read counts as released; the lights themselves
        // are the only error surface this controller has.
        let switches = SwitchState {
            yellow: yellow_switch.is_active().unwrap_or(false),
            green: green_switch.is_active().unwrap_or(false),
        };

        match arbiter.evaluate(latch.is_pending(), switches) {
            Decision::Crossing => {
                lamps.apply(LightPattern::RED).ok();
                Timer::after(config.crossing_hold).await;
                // Clear only after the full hold: presses that arrived
                // mid-crossing coalesce into the one just serviced.
                latch.clear();
                arbiter.finish_crossing();
                #[cfg(feature = "defmt")]
                defmt::info!("crossing serviced, sequence back at red");
            }
            Decision::Drive(_mode, pattern) => {
                lamps.apply(pattern).ok();
                #[cfg(feature = "defmt")]
                defmt::trace!("tick: {} {}", _mode, pattern);
            }
        }

        Timer::after(config.tick).await;
    }
}
