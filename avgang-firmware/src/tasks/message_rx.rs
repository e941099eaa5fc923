//! Message UART receive task
//!
//! Assembles lines from the UART and hands each one to the marquee.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use avgang_protocol::{Line, LineParser};

use crate::channels::{publish_message, ShutdownReason, SHUTDOWN};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Message RX task - one message per line until end of stream
#[embassy_executor::task]
pub async fn message_rx_task(mut rx: BufferedUartRx, end_of_stream: u8) {
    info!("Message RX task started");

    let mut parser = LineParser::with_end_of_stream(end_of_stream);
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        let n = match rx.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}, ending input", e);
                SHUTDOWN.signal(ShutdownReason::InputFault);
                return;
            }
        };
        trace!("RX: {} bytes", n);

        for &byte in &buf[..n] {
            let truncated = parser.truncated_lines();
            let line = parser.feed(byte);
            if parser.truncated_lines() != truncated {
                warn!("Line longer than {} bytes, truncating", avgang_protocol::MAX_LINE_LEN);
            }

            match line {
                Some(Line::Message(text)) => {
                    if text.is_empty() {
                        debug!("Clear requested");
                    } else {
                        debug!("Message: {=str}", text.as_str());
                    }
                    publish_message(text);
                }
                Some(Line::EndOfStream(trailing)) => {
                    if let Some(text) = trailing {
                        debug!("Message: {=str}", text.as_str());
                        publish_message(text);
                    }
                    info!("End of stream");
                    SHUTDOWN.signal(ShutdownReason::EndOfStream);
                    return;
                }
                None => {}
            }
        }
    }
}
