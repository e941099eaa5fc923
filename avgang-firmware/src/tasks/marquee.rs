//! Marquee task
//!
//! Drives the scroll animation at a fixed frame rate, picks up new messages
//! between frames and blanks the display on shutdown.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::{Duration, Instant, Ticker};
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use portable_atomic::Ordering;

use avgang_core::marquee::{Event, MarqueeRunner, StepReport};
use avgang_drivers::MatrixDisplay;

use crate::channels::{PENDING_MESSAGE, SHUTDOWN, SUPERSEDED_MESSAGES};

/// The MAX7219 chain on SPI0
pub type Display =
    MatrixDisplay<ExclusiveDevice<Spi<'static, SPI0, Blocking>, Output<'static>, NoDelay>>;

/// Marquee task - one frame per tick until shutdown
#[embassy_executor::task]
pub async fn marquee_task(mut runner: MarqueeRunner<Display>, frame_interval_ms: u16) {
    info!("Marquee task started");

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(frame_interval_ms)));
    let start = Instant::now();

    let reason = loop {
        match select(ticker.next(), SHUTDOWN.wait()).await {
            Either::First(()) => {
                let incoming = PENDING_MESSAGE.try_take();
                let now_ms = start.elapsed().as_millis();

                match runner.step(now_ms, incoming.as_deref()) {
                    Ok(report) => log_report(&report),
                    Err(failure) => {
                        error!(
                            "Display failed {} frames in a row, last error: {:?}",
                            failure.consecutive, failure.last_error
                        );
                        blank(&mut runner);
                        defmt::panic!("Rendering failed persistently");
                    }
                }
            }
            Either::Second(reason) => break reason,
        }
    };

    info!("Marquee stopping: {:?}", reason);
    let stats = runner.stats();
    info!(
        "{} frames ({} failed), {} messages, {} interrupted, {} superseded",
        stats.frames,
        stats.failed_frames,
        stats.messages,
        stats.interrupted,
        SUPERSEDED_MESSAGES.load(Ordering::Relaxed)
    );

    blank(&mut runner);
    info!("Marquee stopped");
}

fn blank(runner: &mut MarqueeRunner<Display>) {
    match runner.shutdown() {
        Ok(()) => debug!("Display blanked"),
        Err(e) => error!("Failed to blank display: {:?}", e),
    }
}

fn log_report(report: &StepReport) {
    match report {
        StepReport::Rendered { event: Some(event), draw_x, .. } => log_event(event, *draw_x),
        StepReport::Rendered { event: None, .. } => {}
        StepReport::Skipped {
            error,
            draw_x,
            event,
            consecutive,
        } => {
            warn!("Frame skipped ({} in a row): {:?}", consecutive, error);
            if let Some(event) = event {
                log_event(event, *draw_x);
            }
        }
    }
}

fn log_event(event: &Event, draw_x: i32) {
    match event {
        Event::PauseReached => debug!("Paused at x={}", draw_x),
        event if event.is_interruption() => debug!("Interrupted: {:?} -> {:?}", event, event.target()),
        event => debug!("{:?} -> {:?}", event, event.target()),
    }
}
