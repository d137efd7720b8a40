#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_hal::Async;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::timer::timg::TimerGroup;
use log::{error, info, warn};
use static_cell::StaticCell;

// Display-LCD panel specific imports
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use mipidsi::interface::SpiInterface;
use mipidsi::{Builder as MipidsiBuilder, models::ILI9342CRgb565};

use helm_core::events::{self, TouchQueue, TouchSender, TouchTracker};
use helm_core::screen_manager::ScreenManager;
use helm_core::screens;
use helm_core::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, ScreenId};
use helm_firmware::touch::Ft6336u;

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

/// Interval between touch controller scans.
const TOUCH_SCAN_INTERVAL: Duration = Duration::from_millis(20);

/// Pacing between render-loop ticks; keeps the sampler task scheduled.
const UI_TICK_INTERVAL: Duration = Duration::from_millis(2);

static TOUCH_QUEUE: StaticCell<TouchQueue> = StaticCell::new();

/// Producer side of the event pipeline: scans the controller, derives
/// press/drag/release transitions, and enqueues them. Never blocks on the
/// consumer; a full queue drops the sample.
#[embassy_executor::task]
async fn touch_task(mut panel: Ft6336u<I2c<'static, Async>>, mut events: TouchSender<'static>) {
    let mut tracker = TouchTracker::new();
    loop {
        match panel.sample().await {
            Ok(sample) => {
                if let Some(event) = tracker.update(sample) {
                    events.send(event);
                }
            }
            Err(e) => warn!("touch scan failed: {:?}", e),
        }
        Timer::after(TOUCH_SCAN_INTERVAL).await;
    }
}

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    rtt_target::rtt_init_log!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 73744);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    info!("Embassy initialized!");

    // Configure and initialize the display

    // 1. Configure SPI bus
    let spi_bus = Spi::new(peripherals.SPI2, SpiConfig::default())
        .unwrap()
        .with_sck(peripherals.GPIO36)
        .with_mosi(peripherals.GPIO37);

    // 2. Create a dummy CS pin (we don't use hardware CS for this display)
    let cs = Output::new(peripherals.GPIO35, Level::High, OutputConfig::default());

    // 3. Wrap the SPI bus as a SPI device (required by embedded-hal traits)
    let spi_device = ExclusiveDevice::new_no_delay(spi_bus, cs).unwrap();

    // 4. Set up DC (Data/Command) pin
    let dc = Output::new(peripherals.GPIO34, Level::Low, OutputConfig::default());

    // 5. Create a buffer for SPI batching (larger = faster, uses more RAM)
    static SPI_BUFFER: StaticCell<[u8; 512]> = StaticCell::new();
    let spi_buffer = SPI_BUFFER.init([0u8; 512]);

    // 6. Create display interface
    let di = SpiInterface::new(spi_device, dc, spi_buffer);

    // 7. Build and initialize the display driver
    let display = MipidsiBuilder::new(ILI9342CRgb565, di)
        .display_size(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX)
        .init(&mut embassy_time::Delay)
        .expect("Failed to initialize display");

    info!("Display initialized!");

    // Touch controller on the system I2C bus
    let i2c = I2c::new(peripherals.I2C0, I2cConfig::default())
        .unwrap()
        .with_sda(peripherals.GPIO12)
        .with_scl(peripherals.GPIO11)
        .into_async();

    let mut panel = Ft6336u::new(i2c);
    match panel.chip_id().await {
        Ok(id) => info!("Touch controller ready (chip id {:#04x})", id),
        Err(e) => warn!("touch controller not responding: {:?}", e),
    }
    if let Err(e) = panel.set_polling_mode().await {
        warn!("failed to switch touch controller to polling: {:?}", e);
    }

    // Event queue between the sampler task and the render loop
    let queue = TOUCH_QUEUE.init(TouchQueue::new());
    let (sender, mut receiver) = events::split(queue);

    spawner
        .spawn(touch_task(panel, sender))
        .expect("failed to spawn touch task");

    // Screen manager and the top-level selector loop
    let mut manager = ScreenManager::new(display, ScreenId::Home);
    screens::register_all(&mut manager);

    info!("Entering render loop");
    loop {
        if let Err(e) = manager.tick(&mut receiver) {
            error!("display draw failed: {:?}", e);
        }
        Timer::after(UI_TICK_INTERVAL).await;
    }
}
