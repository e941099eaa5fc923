//! Frame presentation and the per-frame driving step
//!
//! [`MarqueeRunner`] owns the backend and the [`ScrollController`] for one
//! display. The firmware calls [`MarqueeRunner::step`] once per frame and
//! [`MarqueeRunner::shutdown`] when the loop ends.

use super::events::Event;
use super::machine::{Phase, RenderInstruction, ScrollController, BLANK};
use crate::config::ScrollConfig;
use crate::traits::{DisplayDevice, DisplayError, MarqueeBackend};

/// Consecutive failed frames before rendering is considered broken
pub const MAX_CONSECUTIVE_FAILURES: u32 = 50;

/// Present one frame on `backend`
///
/// The frame is committed even if clearing or drawing failed, so a
/// half-built frame never stays open. The first error is returned.
pub fn present<B>(
    backend: &mut B,
    frame: &RenderInstruction<'_>,
    baseline_y: i32,
) -> Result<(), DisplayError>
where
    B: MarqueeBackend + ?Sized,
{
    backend.begin_frame()?;

    let drawn = backend.clear().and_then(|()| {
        if frame.is_blank() {
            Ok(())
        } else {
            backend.draw_text(frame.text, frame.draw_x, baseline_y)
        }
    });
    let committed = backend.commit();

    drawn.and(committed)
}

/// Outcome of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepReport {
    /// Frame shown
    Rendered {
        phase: Phase,
        draw_x: i32,
        event: Option<Event>,
    },
    /// Frame could not be shown; the animation carried on regardless
    Skipped {
        error: DisplayError,
        draw_x: i32,
        event: Option<Event>,
        consecutive: u32,
    },
}

impl StepReport {
    /// Transition that happened this frame, if any
    pub fn event(&self) -> Option<Event> {
        match self {
            StepReport::Rendered { event, .. } | StepReport::Skipped { event, .. } => *event,
        }
    }
}

/// Rendering has failed too often in a row to continue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderFailure {
    /// Error from the last attempt
    pub last_error: DisplayError,
    /// Failed frames in a row
    pub consecutive: u32,
}

/// Running totals for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunnerStats {
    pub frames: u32,
    pub failed_frames: u32,
    /// Messages that started scrolling
    pub messages: u32,
    /// Messages cut short by a newer one
    pub interrupted: u32,
}

/// Drives one marquee display
pub struct MarqueeRunner<B> {
    backend: B,
    controller: ScrollController,
    baseline_y: i32,
    failure_limit: u32,
    consecutive_failures: u32,
    stats: RunnerStats,
}

impl<B> MarqueeRunner<B>
where
    B: MarqueeBackend + DisplayDevice,
{
    /// Create a runner; the display width is read from `backend` once
    pub fn new(backend: B, config: &ScrollConfig) -> Self {
        let controller = ScrollController::new(backend.width(), config);
        Self {
            backend,
            controller,
            baseline_y: i32::from(config.baseline_y),
            failure_limit: MAX_CONSECUTIVE_FAILURES,
            consecutive_failures: 0,
            stats: RunnerStats::default(),
        }
    }

    /// Change how many failed frames in a row are tolerated
    pub fn with_failure_limit(mut self, limit: u32) -> Self {
        self.failure_limit = limit.max(1);
        self
    }

    pub fn controller(&self) -> &ScrollController {
        &self.controller
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn stats(&self) -> RunnerStats {
        self.stats
    }

    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Advance the animation to `now_ms` and present the result
    ///
    /// A failed frame is reported and skipped; the animation state is kept.
    /// After too many failures in a row the error is returned and the
    /// caller is expected to shut down.
    pub fn step(&mut self, now_ms: u64, incoming: Option<&str>) -> Result<StepReport, RenderFailure> {
        let frame = self.controller.tick(&self.backend, now_ms, incoming);
        let (phase, draw_x, event) = (frame.phase, frame.draw_x, frame.event);
        let result = present(&mut self.backend, &frame, self.baseline_y);

        self.stats.frames = self.stats.frames.wrapping_add(1);
        if let Some(event) = event {
            self.record(event);
        }

        match result {
            Ok(()) => {
                self.consecutive_failures = 0;
                Ok(StepReport::Rendered {
                    phase,
                    draw_x,
                    event,
                })
            }
            Err(error) => {
                self.stats.failed_frames = self.stats.failed_frames.saturating_add(1);
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                if self.consecutive_failures >= self.failure_limit {
                    return Err(RenderFailure {
                        last_error: error,
                        consecutive: self.consecutive_failures,
                    });
                }
                Ok(StepReport::Skipped {
                    error,
                    draw_x,
                    event,
                    consecutive: self.consecutive_failures,
                })
            }
        }
    }

    /// Blank the display before the loop exits
    ///
    /// Tries a blank frame first and then the device-level blank, so the
    /// display ends up dark even if one of the two paths is broken.
    pub fn shutdown(&mut self) -> Result<(), DisplayError> {
        let framed = present(&mut self.backend, &BLANK, self.baseline_y);
        let blanked = self.backend.blank();
        framed.or(blanked)
    }

    fn record(&mut self, event: Event) {
        if let Event::MessageStarted { .. } = event {
            self.stats.messages = self.stats.messages.saturating_add(1);
        }
        if event.is_interruption() {
            self.stats.interrupted = self.stats.interrupted.saturating_add(1);
        }
    }
}
