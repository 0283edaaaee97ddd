//! Core data types for the traffic-light controller

use crate::hal::Duration;

/// The three indicator outputs of one signal head, as one value.
///
/// Automatic and manual modes light at most one indicator; a pedestrian
/// crossing forces exactly the red one.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightPattern {
    pub red: bool,
    pub yellow: bool,
    pub green: bool,
}

impl LightPattern {
    /// All indicators dark.
    pub const ALL_OFF: Self = Self { red: false, yellow: false, green: false };
    /// Red only — also the pattern held for a pedestrian crossing.
    pub const RED: Self = Self { red: true, yellow: false, green: false };
    /// Yellow only.
    pub const YELLOW: Self = Self { red: false, yellow: true, green: false };
    /// Green only.
    pub const GREEN: Self = Self { red: false, yellow: false, green: true };

    /// Number of indicators currently lit
    pub const fn lit_count(&self) -> u8 {
        self.red as u8 + self.yellow as u8 + self.green as u8
    }

    /// Returns true if at most one indicator is lit
    pub const fn is_exclusive(&self) -> bool {
        self.lit_count() <= 1
    }
}

impl Default for LightPattern {
    fn default() -> Self {
        Self::ALL_OFF
    }
}

/// Phases of the automatic sequence
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Stop — power-up phase
    Red,
    /// Go
    Green,
    /// Clear the intersection
    Yellow,
}

impl Phase {
    /// Cyclic successor: Red → Green → Yellow → Red
    pub const fn next(&self) -> Phase {
        match self {
            Phase::Red => Phase::Green,
            Phase::Green => Phase::Yellow,
            Phase::Yellow => Phase::Red,
        }
    }

    /// The pattern this phase drives
    pub const fn pattern(&self) -> LightPattern {
        match self {
            Phase::Red => LightPattern::RED,
            Phase::Green => LightPattern::GREEN,
            Phase::Yellow => LightPattern::YELLOW,
        }
    }
}

/// Live levels of the two manual override switches, sampled once per tick.
///
/// Polarity is normalized by the HAL: `true` means the switch is held.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchState {
    pub yellow: bool,
    pub green: bool,
}

impl SwitchState {
    /// Both switches released
    pub const fn released() -> Self {
        Self { yellow: false, green: false }
    }

    /// Returns true if either switch is held
    pub const fn any(&self) -> bool {
        self.yellow || self.green
    }
}

/// Which branch of the arbiter drove the lights on a given tick
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Yellow switch held
    ManualYellow,
    /// Green switch held
    ManualGreen,
    /// Timed sequence
    Automatic,
}

impl Mode {
    /// Returns true for the manual override branches
    pub const fn is_override(&self) -> bool {
        match self {
            Mode::ManualYellow | Mode::ManualGreen => true,
            Mode::Automatic => false,
        }
    }
}

/// Outcome of one arbiter evaluation.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Decision {
    /// Hold [`LightPattern::RED`] for the full crossing pause, then clear
    /// the request latch and call
    /// [`finish_crossing`](crate::arbiter::ControlArbiter::finish_crossing).
    Crossing,
    /// Drive the pattern for one tick.
    Drive(Mode, LightPattern),
}

impl Decision {
    /// The pattern the lamps must show for this decision
    pub const fn pattern(&self) -> LightPattern {
        match self {
            Decision::Crossing => LightPattern::RED,
            Decision::Drive(_, pattern) => *pattern,
        }
    }

    /// Returns true if this tick services a pedestrian crossing
    pub const fn is_crossing(&self) -> bool {
        matches!(self, Decision::Crossing)
    }
}

/// Controller configuration parameters
#[derive(Copy, Clone, Debug)]
pub struct ControllerConfig {
    /// Red phase length in ticks
    pub red_ticks: u32,
    /// Green phase length in ticks
    pub green_ticks: u32,
    /// Yellow phase length in ticks
    pub yellow_ticks: u32,
    /// Pause at the end of every control-loop iteration — the clock for
    /// the countdown and for switch polling
    pub tick: Duration,
    /// How long red is held for a pedestrian crossing
    pub crossing_hold: Duration,
    /// Call-button debounce window in milliseconds
    pub debounce_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            red_ticks: 100,   // 10 s at a 100 ms tick
            green_ticks: 150, // 15 s
            yellow_ticks: 30, // 3 s
            tick: Duration::from_millis(100),
            crossing_hold: Duration::from_millis(10_000),
            debounce_ms: 50,
        }
    }
}

impl ControllerConfig {
    /// Create a new configuration with validation
    pub fn new(
        red_ticks: u32,
        green_ticks: u32,
        yellow_ticks: u32,
        tick: Duration,
        crossing_hold: Duration,
        debounce_ms: u32,
    ) -> Result<Self, &'static str> {
        if red_ticks == 0 || green_ticks == 0 || yellow_ticks == 0 {
            return Err("Phase durations must be at least one tick");
        }
        if tick.as_millis() == 0 || tick.as_millis() > 1000 {
            return Err("Tick pause must be between 1 and 1000 ms");
        }
        if debounce_ms > 1000 {
            return Err("Debounce must be <= 1000ms");
        }

        Ok(Self {
            red_ticks,
            green_ticks,
            yellow_ticks,
            tick,
            crossing_hold,
            debounce_ms,
        })
    }

    /// Configured length of the given phase, in ticks
    pub const fn phase_ticks(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Red => self.red_ticks,
            Phase::Green => self.green_ticks,
            Phase::Yellow => self.yellow_ticks,
        }
    }

    /// Length of one undisturbed full cycle, in ticks
    pub const fn cycle_ticks(&self) -> u32 {
        self.red_ticks + self.green_ticks + self.yellow_ticks
    }
}
