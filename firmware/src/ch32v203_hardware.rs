//! CH32V203 Hardware Implementation
//!
//! 64KB Flash / 20KB RAM - Embassy-optimized implementation

use core::sync::atomic::{AtomicBool, Ordering};
use embassy_time::Instant;
use static_cell::StaticCell;

use signal_core::{
    HalError, InterruptConfig, LampBank, LightPattern, OverrideSwitch, PedestrianRequest,
    TrafficHal,
};

/// CH32V203 hardware abstraction layer implementation
pub struct Ch32v203TrafficHal {
    yellow_switch: YellowSwitchPin,
    green_switch: GreenSwitchPin,
    lamps: LampOutputs,
    interrupt_ctrl: CallInterruptCtrl,
}

impl Ch32v203TrafficHal {
    /// Initialize CH32V203 hardware
    pub fn new() -> Self {
        Self {
            yellow_switch: YellowSwitchPin::new(),
            green_switch: GreenSwitchPin::new(),
            lamps: LampOutputs::new(),
            interrupt_ctrl: CallInterruptCtrl,
        }
    }
}

impl TrafficHal for Ch32v203TrafficHal {
    type YellowSwitch = YellowSwitchPin;
    type GreenSwitch = GreenSwitchPin;
    type Lamps = LampOutputs;
    type InterruptCtrl = CallInterruptCtrl;
    type Error = HalError;

    fn initialize(&mut self) -> Result<(), Self::Error> {
        // GPIO initialization; power-up output state is red-only
        self.yellow_switch.init().map_err(|_| HalError::GpioError)?;
        self.green_switch.init().map_err(|_| HalError::GpioError)?;
        self.lamps.init().map_err(|_| HalError::GpioError)?;
        self.lamps.apply(LightPattern::RED)?;

        self.interrupt_ctrl.configure_call_interrupt(true)?;
        self.interrupt_ctrl.enable_call_interrupt(true)?;

        #[cfg(feature = "defmt")]
        defmt::info!("🔌 CH32V203 HAL initialized");

        Ok(())
    }

    fn yellow_switch(&mut self) -> &mut Self::YellowSwitch {
        &mut self.yellow_switch
    }

    fn green_switch(&mut self) -> &mut Self::GreenSwitch {
        &mut self.green_switch
    }

    fn lamps(&mut self) -> &mut Self::Lamps {
        &mut self.lamps
    }

    fn interrupt_controller(&mut self) -> &mut Self::InterruptCtrl {
        &mut self.interrupt_ctrl
    }

    fn shutdown(&mut self) -> Result<(), Self::Error> {
        self.lamps.apply(LightPattern::ALL_OFF)?;
        #[cfg(feature = "defmt")]
        defmt::info!("🔌 CH32V203 HAL shutdown");
        Ok(())
    }
}

/// Call-button interrupt source (EXTI2, PA2)
pub struct CallInterruptCtrl;

impl InterruptConfig for CallInterruptCtrl {
    type Error = HalError;

    fn configure_call_interrupt(&mut self, _falling: bool) -> Result<(), Self::Error> {
        // EXTI2 falling-edge configuration happens in hardware bring-up:
        // 1. AFIO maps PA2 to EXTI line 2
        // 2. FTSR bit 2 set (press pulls the line low)
        // 3. NVIC enable for the EXTI2 vector
        Ok(())
    }

    fn enable_call_interrupt(&mut self, _enable: bool) -> Result<(), Self::Error> {
        // IMR bit 2 masks/unmasks the line
        Ok(())
    }
}

/// Yellow override switch input (PA0, active-low with pull-up).
///
/// EXTI on both edges keeps a level mirror in an atomic; the control loop
/// still samples it once per tick, so the arbiter sees plain level state.
pub struct YellowSwitchPin {
    held: AtomicBool,
}

impl YellowSwitchPin {
    fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }

    fn init(&self) -> Result<(), ()> {
        // Configure PA0 as input with pull-up (active-low)
        // Enable EXTI0 interrupt on both edges to track the level
        Ok(())
    }

    /// Called from the EXTI0 interrupt handler (both edges)
    pub fn on_interrupt(&self, held: bool) {
        self.held.store(held, Ordering::Relaxed);
    }
}

impl OverrideSwitch for YellowSwitchPin {
    type Error = HalError;

    fn is_active(&mut self) -> Result<bool, Self::Error> {
        Ok(self.held.load(Ordering::Relaxed))
    }
}

/// Green override switch input (PA1, active-low with pull-up)
pub struct GreenSwitchPin {
    held: AtomicBool,
}

impl GreenSwitchPin {
    fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }

    fn init(&self) -> Result<(), ()> {
        // Configure PA1 as input with pull-up (active-low)
        // Enable EXTI1 interrupt on both edges to track the level
        Ok(())
    }

    /// Called from the EXTI1 interrupt handler (both edges)
    pub fn on_interrupt(&self, held: bool) {
        self.held.store(held, Ordering::Relaxed);
    }
}

impl OverrideSwitch for GreenSwitchPin {
    type Error = HalError;

    fn is_active(&mut self) -> Result<bool, Self::Error> {
        Ok(self.held.load(Ordering::Relaxed))
    }
}

/// Signal head outputs (PB0/PB1/PB2, active-high)
pub struct LampOutputs {
    red: AtomicBool,
    yellow: AtomicBool,
    green: AtomicBool,
}

impl LampOutputs {
    fn new() -> Self {
        Self {
            red: AtomicBool::new(false),
            yellow: AtomicBool::new(false),
            green: AtomicBool::new(false),
        }
    }

    fn init(&self) -> Result<(), ()> {
        // Configure PB0/PB1/PB2 as push-pull outputs
        Ok(())
    }
}

impl LampBank for LampOutputs {
    type Error = HalError;

    fn apply(&mut self, pattern: LightPattern) -> Result<(), Self::Error> {
        self.red.store(pattern.red, Ordering::Relaxed);
        self.yellow.store(pattern.yellow, Ordering::Relaxed);
        self.green.store(pattern.green, Ordering::Relaxed);
        // TODO: Actual GPIO writes through the BSHR register
        #[cfg(feature = "defmt")]
        defmt::trace!(
            "🚦 Lamps: R={} Y={} G={}",
            pattern.red,
            pattern.yellow,
            pattern.green
        );
        Ok(())
    }

    fn current(&self) -> Result<LightPattern, Self::Error> {
        Ok(LightPattern {
            red: self.red.load(Ordering::Relaxed),
            yellow: self.yellow.load(Ordering::Relaxed),
            green: self.green.load(Ordering::Relaxed),
        })
    }
}

/// Global hardware instance for interrupt handlers
static CH32V203_HAL: StaticCell<Ch32v203TrafficHal> = StaticCell::new();

/// Initialize global hardware instance
pub fn init_global_hal() -> &'static mut Ch32v203TrafficHal {
    CH32V203_HAL.init(Ch32v203TrafficHal::new())
}

// Interrupt handlers (to be connected to actual EXTI handlers)

/// EXTI2 interrupt handler body for the pedestrian call button.
///
/// The latch absorbs edges inside the debounce window, so the handler
/// stays a single call: no pause, no queuing.
pub fn handle_call_interrupt(latch: &PedestrianRequest, debounce_ms: u32) {
    let now_ms = Instant::now().as_millis() as u32;
    latch.signal(now_ms, debounce_ms);
}

/// CH32V203-specific timing utilities
pub mod timing {
    use embassy_time::Duration;
    use signal_core::{ControllerConfig, Phase};

    /// Wall-clock length of one automatic phase at the configured tick
    pub fn phase_hold(config: &ControllerConfig, phase: Phase) -> Duration {
        config.tick * config.phase_ticks(phase)
    }

    /// Wall-clock length of one undisturbed full cycle
    pub fn cycle_hold(config: &ControllerConfig) -> Duration {
        config.tick * config.cycle_ticks()
    }
}

/// CH32V203 pin configuration constants
pub mod pins {
    /// Yellow override switch input
    pub const YELLOW_SWITCH_PIN: u8 = 0; // PA0

    /// Green override switch input
    pub const GREEN_SWITCH_PIN: u8 = 1; // PA1

    /// Pedestrian call-button input (EXTI2)
    pub const CALL_BUTTON_PIN: u8 = 2; // PA2

    /// Red indicator output
    pub const RED_LAMP_PIN: u8 = 0; // PB0

    /// Yellow indicator output
    pub const YELLOW_LAMP_PIN: u8 = 1; // PB1

    /// Green indicator output
    pub const GREEN_LAMP_PIN: u8 = 2; // PB2
}

/// CH32V203 memory layout information
pub mod memory {
    /// Available Flash memory (actual usable)
    pub const FLASH_SIZE: u32 = 60 * 1024; // 60KB usable

    /// Available RAM
    pub const RAM_SIZE: u32 = 20 * 1024; // 20KB

    /// Recommended Embassy task arena size
    pub const TASK_ARENA_SIZE: u32 = 8 * 1024; // 8KB
}
