#![no_std]

//! Firmware library exposing mock hardware and tasks for testing

pub use embassy_executor::Spawner;
pub use embassy_time::Duration;
pub use static_cell::StaticCell;

pub use signal_core::*;

// Re-export hardware implementations
pub use crate::ch32v203_hardware::*;
pub use crate::mock_hardware::*;
pub use crate::tasks::*;

// Mock hardware module
pub mod mock_hardware {
    use signal_core::hal::{HalError, InterruptConfig, LampBank, OverrideSwitch};
    use signal_core::types::LightPattern;

    /// Mock override switch implementation
    #[derive(Debug)]
    pub struct MockSwitch {
        active: bool,
    }

    impl MockSwitch {
        pub fn new() -> Self {
            Self { active: false }
        }

        /// Set switch level for testing
        pub fn set_active(&mut self, active: bool) {
            self.active = active;
        }
    }

    impl OverrideSwitch for MockSwitch {
        type Error = HalError;

        fn is_active(&mut self) -> Result<bool, Self::Error> {
            Ok(self.active)
        }
    }

    /// Mock signal head implementation
    #[derive(Debug)]
    pub struct MockLamps {
        pattern: LightPattern,
    }

    impl MockLamps {
        pub fn new() -> Self {
            Self {
                pattern: LightPattern::ALL_OFF,
            }
        }

        /// Get current pattern for testing
        pub fn shown(&self) -> LightPattern {
            self.pattern
        }
    }

    impl LampBank for MockLamps {
        type Error = HalError;

        fn apply(&mut self, pattern: LightPattern) -> Result<(), Self::Error> {
            #[cfg(feature = "defmt")]
            if pattern != self.pattern {
                defmt::info!(
                    "🚦 Lamps: R={} Y={} G={}",
                    pattern.red,
                    pattern.yellow,
                    pattern.green
                );
            }
            self.pattern = pattern;
            Ok(())
        }

        fn current(&self) -> Result<LightPattern, Self::Error> {
            Ok(self.pattern)
        }
    }

    /// Mock interrupt controller
    #[derive(Debug)]
    pub struct MockInterruptCtrl;

    impl InterruptConfig for MockInterruptCtrl {
        type Error = HalError;

        fn configure_call_interrupt(&mut self, _falling: bool) -> Result<(), Self::Error> {
            Ok(())
        }

        fn enable_call_interrupt(&mut self, _enable: bool) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    /// Mock hardware collection
    #[derive(Debug)]
    pub struct MockTrafficHal {
        pub yellow_switch: MockSwitch,
        pub green_switch: MockSwitch,
        pub lamps: MockLamps,
        pub interrupt_ctrl: MockInterruptCtrl,
    }

    impl MockTrafficHal {
        pub fn new() -> Self {
            #[cfg(feature = "defmt")]
            defmt::info!("🧪 Using mock hardware (for testing)");
            Self {
                yellow_switch: MockSwitch::new(),
                green_switch: MockSwitch::new(),
                lamps: MockLamps::new(),
                interrupt_ctrl: MockInterruptCtrl,
            }
        }
    }
}

// Embassy tasks module
pub mod tasks {
    use super::*;

    /// Control loop task over the mock hardware
    #[embassy_executor::task]
    pub async fn control_task_with_mock(
        latch: &'static PedestrianRequest,
        hal: &'static mut crate::mock_hardware::MockTrafficHal,
        config: ControllerConfig,
    ) {
        #[cfg(feature = "defmt")]
        defmt::info!("🧠 Control task started");

        let crate::mock_hardware::MockTrafficHal {
            yellow_switch,
            green_switch,
            lamps,
            interrupt_ctrl: _,
        } = hal;

        signal_core::arbiter::control_task(latch, yellow_switch, green_switch, lamps, config)
            .await
    }

    /// Forward a call-button edge into the latch.
    ///
    /// On real hardware this runs inside the EXTI handler; the mock build
    /// exposes it so bring-up code can fake a press.
    pub fn report_call_edge(latch: &PedestrianRequest, debounce_ms: u32) -> bool {
        let now_ms = embassy_time::Instant::now().as_millis() as u32;
        latch.signal(now_ms, debounce_ms)
    }
}

// CH32V203 hardware module
pub mod ch32v203_hardware;

// Time driver for embassy
mod time_driver;
