//! Test utilities for the controller core

pub mod harness {
    //! Deterministic virtual-tick simulation of the control loop

    use crate::arbiter::ControlArbiter;
    use crate::latch::PedestrianRequest;
    use crate::types::{ControllerConfig, Decision, LightPattern, Mode, Phase, SwitchState};
    use heapless::Vec;

    /// What one control-loop iteration showed at the signal head
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct TickRecord {
        /// Pattern driven this tick
        pub pattern: LightPattern,
        /// Branch that drove it; `None` for a crossing tick
        pub mode: Option<Mode>,
        /// Automatic phase after the tick
        pub phase: Phase,
        /// Phase counter after the tick
        pub elapsed_ticks: u32,
    }

    impl TickRecord {
        pub fn is_crossing(&self) -> bool {
            self.mode.is_none()
        }
    }

    /// Virtual-time control loop: no hardware, no real pauses.
    ///
    /// One [`step`](Self::step) is one arbiter tick; the crossing hold is
    /// folded into the tick that services it, exactly as the real loop
    /// blocks through it. Virtual time feeds the latch's debounce window.
    pub struct Simulator {
        arbiter: ControlArbiter,
        latch: PedestrianRequest,
        switches: SwitchState,
        now_ms: u32,
        tick_ms: u32,
        crossing_ms: u32,
        debounce_ms: u32,
    }

    impl Simulator {
        pub fn new(config: ControllerConfig) -> Self {
            Self {
                arbiter: ControlArbiter::new(config),
                latch: PedestrianRequest::new(),
                switches: SwitchState::released(),
                // Start with some uptime so the power-on debounce window
                // is already behind us
                now_ms: 1_000,
                tick_ms: config.tick.as_millis() as u32,
                crossing_ms: config.crossing_hold.as_millis() as u32,
                debounce_ms: config.debounce_ms,
            }
        }

        /// Press the call button at the current virtual instant.
        /// Returns whether the edge survived the debounce window.
        pub fn press_call_button(&mut self) -> bool {
            self.latch.signal(self.now_ms, self.debounce_ms)
        }

        pub fn set_yellow_switch(&mut self, held: bool) {
            self.switches.yellow = held;
        }

        pub fn set_green_switch(&mut self, held: bool) {
            self.switches.green = held;
        }

        pub fn latch(&self) -> &PedestrianRequest {
            &self.latch
        }

        pub fn phase(&self) -> Phase {
            self.arbiter.phase()
        }

        pub fn elapsed_ticks(&self) -> u32 {
            self.arbiter.elapsed_ticks()
        }

        /// Current virtual time in milliseconds
        pub fn now_ms(&self) -> u32 {
            self.now_ms
        }

        /// Run one control-loop iteration
        pub fn step(&mut self) -> TickRecord {
            let decision = self.arbiter.evaluate(self.latch.is_pending(), self.switches);

            let record = match decision {
                Decision::Crossing => {
                    // Red held for the full crossing pause; the latch is
                    // cleared only once the hold has elapsed
                    self.now_ms = self.now_ms.wrapping_add(self.crossing_ms);
                    self.latch.clear();
                    self.arbiter.finish_crossing();
                    TickRecord {
                        pattern: LightPattern::RED,
                        mode: None,
                        phase: self.arbiter.phase(),
                        elapsed_ticks: self.arbiter.elapsed_ticks(),
                    }
                }
                Decision::Drive(mode, pattern) => TickRecord {
                    pattern,
                    mode: Some(mode),
                    phase: self.arbiter.phase(),
                    elapsed_ticks: self.arbiter.elapsed_ticks(),
                },
            };

            self.now_ms = self.now_ms.wrapping_add(self.tick_ms);
            record
        }

        /// Run `n` ticks and capture the trace (up to `N` records)
        pub fn run<const N: usize>(&mut self, n: usize) -> Vec<TickRecord, N> {
            let mut trace = Vec::new();
            for _ in 0..n {
                let record = self.step();
                trace.push(record).ok();
            }
            trace
        }
    }
}
