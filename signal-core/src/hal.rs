//! Hardware Abstraction Layer for the signal-head controller

// Re-export time types based on feature
#[cfg(feature = "embassy-time")]
pub use embassy_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
pub use self::mock_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
mod mock_time {
    /// Mock instant type for compilation without embassy-time
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct Instant(u64);

    impl Instant {
        pub fn now() -> Self {
            Self(0) // Placeholder implementation
        }

        pub fn from_millis(ms: i64) -> Self {
            Self(ms as u64)
        }

        pub fn duration_since(&self, other: Instant) -> Duration {
            Duration::from_millis(self.0.saturating_sub(other.0))
        }

        pub fn as_millis(&self) -> u64 {
            self.0
        }
    }

    /// Mock duration type
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct Duration(u64);

    impl Duration {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn from_secs(secs: u64) -> Self {
            Self(secs * 1000)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }
    }

    impl core::ops::Div<u32> for Duration {
        type Output = Duration;

        fn div(self, rhs: u32) -> Duration {
            Duration(self.0 / rhs as u64)
        }
    }

    impl core::ops::Mul<u32> for Duration {
        type Output = Duration;

        fn mul(self, rhs: u32) -> Duration {
            Duration(self.0 * rhs as u64)
        }
    }
}

use crate::types::LightPattern;
use embedded_hal::digital::{InputPin, OutputPin};

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// Interrupt configuration failed
    InterruptError,
    /// Hardware not initialized
    NotInitialized,
    /// Invalid configuration
    InvalidConfig,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::InterruptError => write!(f, "Interrupt configuration failed"),
            HalError::NotInitialized => write!(f, "Hardware not initialized"),
            HalError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Trait for the level-polled manual override switches
pub trait OverrideSwitch {
    type Error: From<HalError>;

    /// Check if the switch is currently held, polarity already normalized
    fn is_active(&mut self) -> Result<bool, Self::Error>;
}

/// Trait for the three-indicator signal head output
pub trait LampBank {
    type Error: From<HalError>;

    /// Drive all three indicators to the given pattern
    fn apply(&mut self, pattern: LightPattern) -> Result<(), Self::Error>;

    /// Last applied pattern
    fn current(&self) -> Result<LightPattern, Self::Error>;
}

/// Trait for configuring the pedestrian call-button interrupt source
pub trait InterruptConfig {
    type Error: From<HalError>;

    /// Configure edge detection for the call-button line
    fn configure_call_interrupt(&mut self, falling: bool) -> Result<(), Self::Error>;

    /// Enable/disable the call-button interrupt
    fn enable_call_interrupt(&mut self, enable: bool) -> Result<(), Self::Error>;
}

/// Complete controller HAL interface
pub trait TrafficHal {
    type YellowSwitch: OverrideSwitch;
    type GreenSwitch: OverrideSwitch;
    type Lamps: LampBank;
    type InterruptCtrl: InterruptConfig;
    type Error: From<HalError>;

    /// Initialize hardware: inputs configured, lamps at the power-up
    /// pattern, call interrupt armed
    fn initialize(&mut self) -> Result<(), Self::Error>;

    /// Access to the yellow override switch
    fn yellow_switch(&mut self) -> &mut Self::YellowSwitch;

    /// Access to the green override switch
    fn green_switch(&mut self) -> &mut Self::GreenSwitch;

    /// Access to the signal head
    fn lamps(&mut self) -> &mut Self::Lamps;

    /// Access to the interrupt controller
    fn interrupt_controller(&mut self) -> &mut Self::InterruptCtrl;

    /// Shutdown hardware
    fn shutdown(&mut self) -> Result<(), Self::Error>;
}

/// Generic switch over an embedded-hal input pin.
///
/// The reference hardware pulls the line up and grounds it when held, so
/// active means low.
pub struct EmbeddedHalSwitch<P> {
    pin: P,
}

impl<P> EmbeddedHalSwitch<P>
where
    P: InputPin,
{
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P> OverrideSwitch for EmbeddedHalSwitch<P>
where
    P: InputPin,
{
    type Error = HalError;

    fn is_active(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low().map_err(|_| HalError::GpioError)
    }
}

/// Generic signal head over three embedded-hal output pins
pub struct EmbeddedHalLamps<R, Y, G> {
    red: R,
    yellow: Y,
    green: G,
    active_low: bool,
    pattern: LightPattern,
}

impl<R, Y, G> EmbeddedHalLamps<R, Y, G>
where
    R: OutputPin,
    Y: OutputPin,
    G: OutputPin,
{
    pub fn new(red: R, yellow: Y, green: G, active_low: bool) -> Self {
        Self {
            red,
            yellow,
            green,
            active_low,
            pattern: LightPattern::ALL_OFF,
        }
    }

    fn drive<P: OutputPin>(pin: &mut P, lit: bool, active_low: bool) -> Result<(), HalError> {
        if lit != active_low {
            pin.set_high().map_err(|_| HalError::GpioError)
        } else {
            pin.set_low().map_err(|_| HalError::GpioError)
        }
    }
}

impl<R, Y, G> LampBank for EmbeddedHalLamps<R, Y, G>
where
    R: OutputPin,
    Y: OutputPin,
    G: OutputPin,
{
    type Error = HalError;

    fn apply(&mut self, pattern: LightPattern) -> Result<(), Self::Error> {
        Self::drive(&mut self.red, pattern.red, self.active_low)?;
        Self::drive(&mut self.yellow, pattern.yellow, self.active_low)?;
        Self::drive(&mut self.green, pattern.green, self.active_low)?;
        self.pattern = pattern;
        Ok(())
    }

    fn current(&self) -> Result<LightPattern, Self::Error> {
        Ok(self.pattern)
    }
}

/// No-op interrupt controller for targets where the edge source is armed
/// elsewhere
pub struct NoOpInterruptController;

impl InterruptConfig for NoOpInterruptController {
    type Error = HalError;

    fn configure_call_interrupt(&mut self, _falling: bool) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enable_call_interrupt(&mut self, _enable: bool) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use core::cell::RefCell;

    #[derive(Default)]
    pub struct MockSwitch {
        active: RefCell<bool>,
    }

    impl MockSwitch {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_active(&self, active: bool) {
            *self.active.borrow_mut() = active;
        }
    }

    impl OverrideSwitch for MockSwitch {
        type Error = HalError;

        fn is_active(&mut self) -> Result<bool, Self::Error> {
            Ok(*self.active.borrow())
        }
    }

    pub struct MockLamps {
        pattern: RefCell<LightPattern>,
        applied: RefCell<u32>,
    }

    impl MockLamps {
        pub fn new() -> Self {
            Self {
                pattern: RefCell::new(LightPattern::ALL_OFF),
                applied: RefCell::new(0),
            }
        }

        /// Pattern currently on the head, without going through the trait
        pub fn shown(&self) -> LightPattern {
            *self.pattern.borrow()
        }

        /// How many times a pattern has been applied
        pub fn apply_count(&self) -> u32 {
            *self.applied.borrow()
        }
    }

    impl Default for MockLamps {
        fn default() -> Self {
            Self::new()
        }
    }

    impl LampBank for MockLamps {
        type Error = HalError;

        fn apply(&mut self, pattern: LightPattern) -> Result<(), Self::Error> {
            *self.pattern.borrow_mut() = pattern;
            *self.applied.borrow_mut() += 1;
            Ok(())
        }

        fn current(&self) -> Result<LightPattern, Self::Error> {
            Ok(*self.pattern.borrow())
        }
    }
}
