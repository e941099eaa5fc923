//! Shutdown button task
//!
//! Holding the button stops the marquee and blanks the display.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{with_timeout, Duration, Timer};

use crate::channels::{ShutdownReason, SHUTDOWN};

/// How long the button must be held
const HOLD_TIME: Duration = Duration::from_millis(1000);

/// Button task - long press requests shutdown
#[embassy_executor::task]
pub async fn button_task(mut btn: Input<'static>) {
    info!("Button task started");

    loop {
        btn.wait_for_falling_edge().await;

        // Debounce
        Timer::after(Duration::from_millis(20)).await;
        if btn.is_high() {
            continue;
        }

        match with_timeout(HOLD_TIME, btn.wait_for_rising_edge()).await {
            Ok(()) => {
                debug!("Button: released early, ignoring");
            }
            Err(_) => {
                info!("Button: held, shutting down");
                SHUTDOWN.signal(ShutdownReason::Button);
                return;
            }
        }

        // Debounce after release
        Timer::after(Duration::from_millis(50)).await;
    }
}
