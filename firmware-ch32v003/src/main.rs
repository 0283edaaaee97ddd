#![no_std]
#![no_main]

// Logging support
#[cfg(feature = "defmt")]
use defmt::info;
#[cfg(feature = "defmt")]
use defmt_rtt as _;
use panic_halt as _;

// Define simple logging macros when defmt is not available
#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($arg:tt)*) => {};
}

// Core imports
use core::sync::atomic::{AtomicU32, Ordering};
use riscv_rt::entry;
use signal_core::{
    ControlArbiter, ControllerConfig, Decision, LightPattern, PedestrianRequest, SwitchState,
};

// Critical section implementation for single-core RISC-V
struct RiscvCriticalSection;
critical_section::set_impl!(RiscvCriticalSection);

unsafe impl critical_section::Impl for RiscvCriticalSection {
    unsafe fn acquire() -> critical_section::RawRestoreState {
        let mstatus = riscv::register::mstatus::read();
        riscv::register::mstatus::clear_mie();
        mstatus.mie() as u8
    }

    unsafe fn release(was_enabled: critical_section::RawRestoreState) {
        if was_enabled != 0 {
            riscv::register::mstatus::set_mie();
        }
    }
}

// ========================================
// CH32V003 Hardware Definitions
// ========================================

/// CH32V003 Memory Map and Register Base Addresses
const RCC_BASE: u32 = 0x4002_1000;
const GPIOC_BASE: u32 = 0x4001_1000;
const GPIOD_BASE: u32 = 0x4001_1400;
const AFIO_BASE: u32 = 0x4001_0000;
const EXTI_BASE: u32 = 0x4001_0400;
const NVIC_BASE: u32 = 0xE000_E000;
const SYSTICK_BASE: u32 = 0xE000_E010;

/// RCC Register offsets
const RCC_APB2PCENR: u32 = 0x18; // APB2 peripheral clock enable register

/// GPIO Register offsets
const GPIO_CRL: u32 = 0x00; // Control Register Low
const GPIO_IDR: u32 = 0x08; // Input Data Register
const GPIO_ODR: u32 = 0x0C; // Output Data Register
const GPIO_BSHR: u32 = 0x10; // Bit Set/Reset Register

/// AFIO Register offsets
const AFIO_EXTICR: u32 = 0x08; // External interrupt port selection

/// EXTI Register offsets
const EXTI_IMR: u32 = 0x00; // Interrupt Mask Register
const EXTI_FTSR: u32 = 0x0C; // Falling Trigger Selection Register
const EXTI_PR: u32 = 0x14; // Pending Register

/// SysTick Register offsets
const SYSTICK_CSR: u32 = 0x00; // Control and Status Register
const SYSTICK_RVR: u32 = 0x04; // Reload Value Register
const SYSTICK_CVR: u32 = 0x08; // Current Value Register

// ========================================
// Global State
// ========================================

/// System tick counter for timing (updated by SysTick interrupt)
static SYSTEM_TICK_MS: AtomicU32 = AtomicU32::new(0);

/// Pending pedestrian-crossing request, shared with the EXTI handler
static PEDESTRIAN: PedestrianRequest = PedestrianRequest::new();

/// Call-button debounce window, matching the reference configuration
const DEBOUNCE_MS: u32 = 50;

// ========================================
// Helper Functions
// ========================================

/// Milliseconds since boot
fn now_ms() -> u32 {
    SYSTEM_TICK_MS.load(Ordering::Relaxed)
}

/// Sleep until `ms` milliseconds have elapsed, riding WFI between SysTick
/// interrupts
fn delay_ms(ms: u32) {
    let start = now_ms();
    while now_ms().wrapping_sub(start) < ms {
        unsafe { riscv::asm::wfi() };
    }
}

// ========================================
// GPIO access
// ========================================

/// CH32V003 GPIO input with real register access
struct Ch32v003Input {
    /// GPIO port base address
    port: u32,
    /// Pin number (0-15)
    pin: u8,
}

impl Ch32v003Input {
    const fn new(port: u32, pin: u8) -> Self {
        Self { port, pin }
    }

    /// Level read; the line is pulled up and grounded when held
    fn is_low(&self) -> bool {
        let idr = unsafe { core::ptr::read_volatile((self.port + GPIO_IDR) as *const u32) };
        (idr & (1 << self.pin)) == 0
    }
}

/// CH32V003 GPIO output with real register access
struct Ch32v003Output {
    /// GPIO port base address
    port: u32,
    /// Pin number (0-15)
    pin: u8,
}

impl Ch32v003Output {
    const fn new(port: u32, pin: u8) -> Self {
        Self { port, pin }
    }

    fn set(&self, on: bool) {
        // BSHR: bits 0-15 set, bits 16-31 reset
        unsafe {
            if on {
                core::ptr::write_volatile((self.port + GPIO_BSHR) as *mut u32, 1 << self.pin);
            } else {
                core::ptr::write_volatile(
                    (self.port + GPIO_BSHR) as *mut u32,
                    1 << (self.pin + 16),
                );
            }
        }
    }
}

// ========================================
// Pin Mapping
// ========================================

// PD2 = Pedestrian call button (EXTI2, active-low with pull-up)
// PD3 = Manual yellow switch (active-low with pull-up)
// PD4 = Manual green switch (active-low with pull-up)
// PC0 = Red lamp (active-high)
// PC1 = Yellow lamp (active-high)
// PC2 = Green lamp (active-high)

static CALL_BUTTON: Ch32v003Input = Ch32v003Input::new(GPIOD_BASE, 2); // PD2
static YELLOW_SWITCH: Ch32v003Input = Ch32v003Input::new(GPIOD_BASE, 3); // PD3
static GREEN_SWITCH: Ch32v003Input = Ch32v003Input::new(GPIOD_BASE, 4); // PD4
static RED_LAMP: Ch32v003Output = Ch32v003Output::new(GPIOC_BASE, 0); // PC0
static YELLOW_LAMP: Ch32v003Output = Ch32v003Output::new(GPIOC_BASE, 1); // PC1
static GREEN_LAMP: Ch32v003Output = Ch32v003Output::new(GPIOC_BASE, 2); // PC2

/// Drive all three lamps to the given pattern
fn drive_lamps(pattern: LightPattern) {
    RED_LAMP.set(pattern.red);
    YELLOW_LAMP.set(pattern.yellow);
    GREEN_LAMP.set(pattern.green);
}

/// Sample the live override switch levels
fn sample_switches() -> SwitchState {
    SwitchState {
        yellow: YELLOW_SWITCH.is_low(),
        green: GREEN_SWITCH.is_low(),
    }
}

// ========================================
// Hardware Initialization
// ========================================

fn hardware_init() {
    enable_peripheral_clocks();
    configure_gpio_pins();
    configure_systick();
    configure_exti_interrupt();

    info!("✅ Hardware initialization complete");
}

/// Enable required peripheral clocks
fn enable_peripheral_clocks() {
    unsafe {
        let rcc_apb2pcenr = (RCC_BASE + RCC_APB2PCENR) as *mut u32;
        let current = core::ptr::read_volatile(rcc_apb2pcenr);
        // Enable AFIO, GPIOC, GPIOD clocks
        // Bit 0 = AFIO, Bit 4 = GPIOC, Bit 5 = GPIOD
        core::ptr::write_volatile(rcc_apb2pcenr, current | (1 << 0) | (1 << 4) | (1 << 5));
    }
}

/// Configure GPIO pins for the lamps and inputs
fn configure_gpio_pins() {
    // PC0/PC1/PC2: push-pull outputs, 50MHz
    unsafe {
        let gpioc_crl = (GPIOC_BASE + GPIO_CRL) as *mut u32;
        let mut crl = core::ptr::read_volatile(gpioc_crl);
        for pin in 0..3 {
            crl &= !(0xF << (pin * 4)); // Clear configuration
            crl |= 0x3 << (pin * 4); // CNF=00 push-pull, MODE=11 50MHz
        }
        core::ptr::write_volatile(gpioc_crl, crl);
    }

    // PD2/PD3/PD4: inputs with pull-up
    unsafe {
        let gpiod_crl = (GPIOD_BASE + GPIO_CRL) as *mut u32;
        let mut crl = core::ptr::read_volatile(gpiod_crl);
        for pin in 2..5 {
            crl &= !(0xF << (pin * 4)); // Clear configuration
            crl |= 0x8 << (pin * 4); // CNF=10 input pull-up/down, MODE=00 input
        }
        core::ptr::write_volatile(gpiod_crl, crl);

        // ODR high selects the pull-up
        let gpiod_odr = (GPIOD_BASE + GPIO_ODR) as *mut u32;
        let odr = core::ptr::read_volatile(gpiod_odr);
        core::ptr::write_volatile(gpiod_odr, odr | (1 << 2) | (1 << 3) | (1 << 4));
    }
}

/// Configure SysTick for 1ms interrupts
fn configure_systick() {
    unsafe {
        // Assuming 24MHz system clock, 1ms = 24000 ticks
        let systick_rvr = (SYSTICK_BASE + SYSTICK_RVR) as *mut u32;
        core::ptr::write_volatile(systick_rvr, 24000 - 1); // 1ms at 24MHz

        let systick_cvr = (SYSTICK_BASE + SYSTICK_CVR) as *mut u32;
        core::ptr::write_volatile(systick_cvr, 0); // Clear current value

        let systick_csr = (SYSTICK_BASE + SYSTICK_CSR) as *mut u32;
        // Enable SysTick, enable interrupt, use core clock
        core::ptr::write_volatile(systick_csr, 0x7);
    }
}

/// Configure the EXTI2 falling-edge interrupt for the call button.
///
/// Falling edge matches the pull-up wiring: a press pulls PD2 low.
fn configure_exti_interrupt() {
    unsafe {
        // Map EXTI line 2 to port D
        let afio_exticr = (AFIO_BASE + AFIO_EXTICR) as *mut u32;
        let exticr = core::ptr::read_volatile(afio_exticr);
        core::ptr::write_volatile(afio_exticr, exticr | (0b11 << 4));

        // Falling edge trigger on line 2 (press only; the release edge is
        // of no interest to the latch)
        let exti_ftsr = (EXTI_BASE + EXTI_FTSR) as *mut u32;
        let ftsr = core::ptr::read_volatile(exti_ftsr);
        core::ptr::write_volatile(exti_ftsr, ftsr | (1 << 2));

        // Unmask line 2
        let exti_imr = (EXTI_BASE + EXTI_IMR) as *mut u32;
        let imr = core::ptr::read_volatile(exti_imr);
        core::ptr::write_volatile(exti_imr, imr | (1 << 2));

        // Enable NVIC for the EXTI7_0 interrupt (covers EXTI0-7),
        // interrupt number 30 on the CH32V003
        let nvic_iser = (NVIC_BASE + 0x100) as *mut u32;
        let iser = core::ptr::read_volatile(nvic_iser);
        core::ptr::write_volatile(nvic_iser, iser | (1 << 30));
    }
}

// ========================================
// Main Control Loop
// ========================================

fn main_loop(config: ControllerConfig) -> ! {
    let mut arbiter = ControlArbiter::new(config);
    let tick_ms = config.tick.as_millis() as u32;
    let crossing_ms = config.crossing_hold.as_millis() as u32;

    info!("🚀 Main loop started");

    loop {
        match arbiter.evaluate(PEDESTRIAN.is_pending(), sample_switches()) {
            Decision::Crossing => {
                // All vehicle traffic stopped for the crossing hold; the
                // switches are not sampled and the sequence does not
                // advance until it has elapsed
                drive_lamps(LightPattern::RED);
                delay_ms(crossing_ms);
                PEDESTRIAN.clear();
                arbiter.finish_crossing();
                info!("🚶 Crossing serviced");
            }
            Decision::Drive(_mode, pattern) => {
                drive_lamps(pattern);
            }
        }

        // The tick pause is the clock for the countdown and for switch
        // polling responsiveness
        delay_ms(tick_ms);
    }
}

#[entry]
fn main() -> ! {
    hardware_init();

    // Power-up output state: red on, yellow and green off, before the
    // loop takes over
    drive_lamps(LightPattern::RED);

    info!("🚦 CH32V003 Traffic-Light Controller");

    main_loop(signal_core::default_config());
}

// ========================================
// Interrupt Handlers
// ========================================

/// SysTick interrupt handler: 1ms tick update
#[no_mangle]
extern "C" fn SysTick() {
    let current = SYSTEM_TICK_MS.load(Ordering::Relaxed);
    SYSTEM_TICK_MS.store(current.wrapping_add(1), Ordering::Relaxed);
}

/// EXTI interrupt handler for the pedestrian call button
#[no_mangle]
extern "C" fn EXTI7_0_IRQHandler() {
    unsafe {
        let exti_pr = (EXTI_BASE + EXTI_PR) as *mut u32;
        let pending = core::ptr::read_volatile(exti_pr);

        // EXTI2 (PD2 - call button) falling edge
        if pending & (1 << 2) != 0 {
            core::ptr::write_volatile(exti_pr, 1 << 2);

            // Latch the request; edges inside the debounce window are
            // absorbed by the latch itself, so the handler stays short
            PEDESTRIAN.signal(now_ms(), DEBOUNCE_MS);
        }
    }
}
