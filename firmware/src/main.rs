#![no_std]
#![no_main]

#[cfg(feature = "defmt")]
use defmt_rtt as _;

// RISC-V runtime
use riscv_rt as _;

// Panic handler
use panic_halt as _;

use embassy_executor::Spawner;
use embassy_time::Duration;
use static_cell::StaticCell;

use rustysignal_firmware::*;
use signal_core::*;

// Static resources
static PEDESTRIAN: PedestrianRequest = PedestrianRequest::new();
static MOCK_HAL: StaticCell<MockTrafficHal> = StaticCell::new();

/// Main firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    #[cfg(feature = "defmt")]
    defmt::info!("🚦 Rusty Signal Firmware Starting...");

    // Initialize hardware
    let hal = init_hardware().await;
    #[cfg(feature = "defmt")]
    defmt::info!("✅ Hardware initialized");

    // Controller configuration: 10 s red, 15 s green, 3 s yellow on a
    // 100 ms tick, 10 s crossing hold, 50 ms call-button debounce
    let config = default_config();
    #[cfg(feature = "defmt")]
    defmt::info!(
        "⚙️ Cycle: {} ticks at {} ms",
        config.cycle_ticks(),
        config.tick.as_millis()
    );

    // Spawn the control loop
    #[cfg(feature = "defmt")]
    defmt::info!("🚀 Spawning control task...");

    spawner.must_spawn(control_task_with_mock(&PEDESTRIAN, hal, config));

    #[cfg(feature = "defmt")]
    defmt::info!("✨ Signal firmware ready!");

    // Main supervision loop
    loop {
        embassy_time::Timer::after(Duration::from_secs(1)).await;
        #[cfg(feature = "defmt")]
        defmt::trace!("💓 Heartbeat");
    }
}

/// Initialize hardware abstraction layer
async fn init_hardware() -> &'static mut MockTrafficHal {
    #[cfg(feature = "defmt")]
    defmt::info!("🔌 Initializing hardware...");

    // For now, use mock hardware for compilation
    // Real CH32V203 wiring will replace this
    MOCK_HAL.init(MockTrafficHal::new())
}
