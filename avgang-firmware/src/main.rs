//! Avgang - Departure Marquee Firmware
//!
//! Main firmware binary for an RP2040 driving a chain of MAX7219 8x8
//! modules. Messages arrive one per line over UART0; the latest one scrolls
//! across the display, and a trailing departure time pauses at the right
//! edge.
//!
//! Pin mapping:
//! - UART0 RX: GPIO1
//! - SPI0 CLK: GPIO18, MOSI: GPIO19, CS: GPIO17
//! - Shutdown button: GPIO15 (active low)

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUartRx, Config as UartConfig};
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use avgang_core::marquee::MarqueeRunner;
use avgang_core::traits::DisplayDevice;
use avgang_drivers::MatrixDisplay;

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// UART receive buffer (must live forever)
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Avgang firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();
    info!(
        "Display: {} modules, block orientation {}, {:?}, reverse={}, brightness {}",
        config.display.cascaded,
        config.display.block_orientation.degrees(),
        config.display.rotate,
        config.display.reverse_order,
        config.display.brightness
    );
    info!(
        "Scroll: {} px/s, pause {} ms, frame {} ms",
        config.scroll.speed_px_per_s, config.scroll.pause_ms, config.scroll.frame_interval_ms
    );

    // SPI0 is TX-only, the MAX7219 has nothing to send back
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = config.display.spi_frequency_hz;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);
    let device = match ExclusiveDevice::new_no_delay(spi, cs) {
        Ok(device) => device,
        Err(e) => match e {},
    };

    let display = match MatrixDisplay::initialize(device, &config.display) {
        Ok(display) => display,
        Err(e) => defmt::panic!("Display initialization failed: {:?}", e),
    };
    info!("Display initialized, {} px wide", display.width());

    let runner = MarqueeRunner::new(display, &config.scroll);

    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.input.baudrate;
    let rx_buf = RX_BUF.init([0u8; 256]);
    let rx = BufferedUartRx::new(p.UART0, Irqs, p.PIN_1, rx_buf, uart_config);
    info!("UART initialized at {} baud", config.input.baudrate);

    let button = Input::new(p.PIN_15, Pull::Up);

    spawner.spawn(tasks::marquee_task(runner, config.scroll.frame_interval_ms)).unwrap();
    spawner.spawn(tasks::message_rx_task(rx, config.input.end_of_stream)).unwrap();
    spawner.spawn(tasks::button_task(button)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
