//! Scroll/pause state machine
//!
//! Turns (message, text width, wall-clock ticks, arriving messages) into a
//! horizontal draw offset for every frame. The controller owns all animation
//! state; the caller supplies the current time and any message that arrived
//! since the previous tick and renders whatever comes back.
//!
//! ```text
//!            arrival (non-empty), from any phase
//!        ┌───────────────────────────────────────┐
//!        ▼                                       │
//!   ┌──────────┐  suffix at right edge  ┌──────────┐
//!   │Scrolling │ ─────────────────────▶ │  Paused  │
//!   └──────────┘                        └──────────┘
//!        │ scrolled off                      │ dwell elapsed
//!        ▼                                   ▼
//!   ┌──────────────────────────────────────────────┐
//!   │                    Idle                      │ ◀── empty arrival
//!   └──────────────────────────────────────────────┘
//! ```

use super::events::Event;
use super::message::{message_text, Message, MessageText};
use crate::config::ScrollConfig;
use crate::traits::TextWidth;

/// Animation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Nothing to animate
    #[default]
    Idle,
    /// Message moving right to left
    Scrolling,
    /// Time suffix held at the right edge
    Paused,
}

/// What to put on the display for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderInstruction<'a> {
    /// Phase after this tick
    pub phase: Phase,
    /// Left edge of the text in display columns (may be negative)
    pub draw_x: i32,
    /// Text to draw; empty means blank the display
    pub text: &'a str,
    /// Transition that happened during this tick, if any
    pub event: Option<Event>,
}

impl RenderInstruction<'_> {
    /// Returns true if nothing should be drawn
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Blank frame, used for the final pass on shutdown
pub const BLANK: RenderInstruction<'static> = RenderInstruction {
    phase: Phase::Idle,
    draw_x: 0,
    text: "",
    event: None,
};

/// Scroll controller (animation state for a single display)
#[derive(Debug, Clone)]
pub struct ScrollController {
    /// Display width in pixel columns, fixed for the controller's lifetime
    display_width: u32,
    speed_px_per_s: f32,
    pause_ms: u64,
    /// Pin `offset` to the pause threshold when pausing
    clamp_pause: bool,

    phase: Phase,
    active: Message,
    /// Accumulated scroll distance in pixels since scrolling began
    offset: f32,
    draw_x: i32,
    /// Start of the current phase (pause dwell measurement)
    phase_start_ms: u64,
    /// Time of the previous tick (scroll integration)
    last_tick_ms: u64,
    /// Latest message not yet taken up, last write wins
    pending: Option<MessageText>,
}

impl ScrollController {
    /// Create a controller for a display `display_width` pixels wide
    pub fn new(display_width: u32, config: &ScrollConfig) -> Self {
        Self {
            display_width,
            speed_px_per_s: config.speed_px_per_s.max(0.0),
            pause_ms: u64::from(config.pause_ms),
            clamp_pause: config.clamp_pause,
            phase: Phase::Idle,
            active: Message::blank(),
            offset: 0.0,
            draw_x: 0,
            phase_start_ms: 0,
            last_tick_ms: 0,
            pending: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_message(&self) -> &Message {
        &self.active
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn draw_x(&self) -> i32 {
        self.draw_x
    }

    pub fn display_width(&self) -> u32 {
        self.display_width
    }

    /// Check if a message is waiting for the next tick
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Queue a message for the next tick
    ///
    /// Only the most recent message is kept. Returns true if an earlier
    /// pending message was discarded.
    pub fn submit(&mut self, text: &str) -> bool {
        self.pending.replace(message_text(text)).is_some()
    }

    /// Advance the animation to `now_ms`
    ///
    /// `incoming` is a message that arrived since the last tick (an empty
    /// string blanks the display). An arrival always takes priority over the
    /// phase logic for this tick.
    pub fn tick<M>(&mut self, metrics: &M, now_ms: u64, incoming: Option<&str>) -> RenderInstruction<'_>
    where
        M: TextWidth + ?Sized,
    {
        if let Some(text) = incoming {
            self.submit(text);
        }

        let event = match self.pending.take() {
            Some(text) => Some(self.activate(metrics, text, now_ms)),
            None => {
                let event = match self.phase {
                    Phase::Scrolling => self.advance_scroll(now_ms),
                    Phase::Paused => self.advance_pause(now_ms),
                    Phase::Idle => None,
                };
                self.last_tick_ms = now_ms;
                event
            }
        };

        RenderInstruction {
            phase: self.phase,
            draw_x: self.draw_x,
            text: self.active.text(),
            event,
        }
    }

    /// Replace the active message
    fn activate<M>(&mut self, metrics: &M, text: MessageText, now_ms: u64) -> Event
    where
        M: TextWidth + ?Sized,
    {
        let from = self.phase;
        self.offset = 0.0;
        self.phase_start_ms = now_ms;
        self.last_tick_ms = now_ms;

        if text.is_empty() {
            self.active = Message::blank();
            self.phase = Phase::Idle;
            return Event::MessageCleared { from };
        }

        let width = metrics.text_width(&text);
        self.active = Message::new(text, width);
        self.draw_x = self.display_width as i32;
        self.phase = Phase::Scrolling;
        Event::MessageStarted { from }
    }

    fn advance_scroll(&mut self, now_ms: u64) -> Option<Event> {
        let elapsed_ms = now_ms.saturating_sub(self.last_tick_ms);
        self.offset += self.speed_px_per_s * (elapsed_ms as f32 / 1000.0);

        let display_width = self.display_width as i32;
        let message_width = self.active.pixel_width() as i32;

        if self.active.pauses_on(self.display_width) {
            let threshold = (message_width - display_width) as f32;
            if self.offset >= threshold {
                if self.clamp_pause {
                    self.offset = threshold;
                }
                self.draw_x = display_width - message_width;
                self.phase = Phase::Paused;
                self.phase_start_ms = now_ms;
                return Some(Event::PauseReached);
            }
        }

        self.draw_x = display_width - round_px(self.offset);

        // A zero-width message has nothing to show and leaves at once
        if message_width == 0 || self.draw_x < -message_width {
            self.active = Message::blank();
            self.phase = Phase::Idle;
            self.phase_start_ms = now_ms;
            return Some(Event::ScrolledOff);
        }

        None
    }

    fn advance_pause(&mut self, now_ms: u64) -> Option<Event> {
        if now_ms.saturating_sub(self.phase_start_ms) >= self.pause_ms {
            self.active = Message::blank();
            self.phase = Phase::Idle;
            self.phase_start_ms = now_ms;
            return Some(Event::DwellElapsed);
        }
        None
    }
}

/// Round a non-negative pixel distance to the nearest column
fn round_px(offset: f32) -> i32 {
    (offset + 0.5) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every message is the same width
    struct FixedWidth(u32);

    impl TextWidth for FixedWidth {
        fn text_width(&self, text: &str) -> u32 {
            if text.is_empty() {
                0
            } else {
                self.0
            }
        }
    }

    /// Monospace font, 6 px per character
    struct Mono;

    impl TextWidth for Mono {
        fn text_width(&self, text: &str) -> u32 {
            text.chars().count() as u32 * 6
        }
    }

    fn config(speed: f32, pause_ms: u32) -> ScrollConfig {
        ScrollConfig {
            speed_px_per_s: speed,
            pause_ms,
            ..ScrollConfig::default()
        }
    }

    /// Run ticks every `step_ms` until `end_ms`, collecting events
    fn run(
        controller: &mut ScrollController,
        metrics: &impl TextWidth,
        start_ms: u64,
        end_ms: u64,
        step_ms: u64,
        mut on_tick: impl FnMut(u64, &RenderInstruction<'_>),
    ) {
        let mut now = start_ms;
        while now <= end_ms {
            let frame = controller.tick(metrics, now, None);
            on_tick(now, &frame);
            now += step_ms;
        }
    }

    #[test]
    fn test_initial_state() {
        let mut controller = ScrollController::new(32, &ScrollConfig::default());
        assert_eq!(controller.phase(), Phase::Idle);
        let frame = controller.tick(&Mono, 0, None);
        assert!(frame.is_blank());
        assert_eq!(frame.draw_x, 0);
        assert_eq!(frame.event, None);
    }

    #[test]
    fn test_arrival_starts_at_right_edge() {
        let mut controller = ScrollController::new(32, &config(15.0, 10_000));
        let frame = controller.tick(&Mono, 500, Some("Hello"));
        assert_eq!(frame.phase, Phase::Scrolling);
        assert_eq!(frame.draw_x, 32);
        assert_eq!(frame.text, "Hello");
        assert_eq!(frame.event, Some(Event::MessageStarted { from: Phase::Idle }));
        assert_eq!(controller.active_message().pixel_width(), 30);
    }

    #[test]
    fn test_scroll_uses_elapsed_time() {
        let mut controller = ScrollController::new(32, &config(20.0, 10_000));
        controller.tick(&Mono, 1_000, Some("Hello world"));

        let frame = controller.tick(&Mono, 1_500, None);
        assert_eq!(frame.draw_x, 32 - 10);

        // Irregular interval: 250 ms later is 5 px further
        let frame = controller.tick(&Mono, 1_750, None);
        assert_eq!(frame.draw_x, 32 - 15);
    }

    #[test]
    fn test_pause_scenario() {
        // 32 px display, 100 px message, 15 px/s: pause at 68/15 = 4.533 s
        let mut controller = ScrollController::new(32, &config(15.0, 10_000));
        controller.tick(&FixedWidth(100), 0, Some("Slussen 3 min"));

        let mut paused_at = None;
        run(&mut controller, &FixedWidth(100), 10, 6_000, 10, |now, frame| {
            if frame.event == Some(Event::PauseReached) {
                paused_at = Some(now);
            }
        });

        let paused_at = paused_at.expect("message never paused");
        assert!((4_530..=4_550).contains(&paused_at), "paused at {}", paused_at);
        assert_eq!(controller.phase(), Phase::Paused);
        assert_eq!(controller.draw_x(), 32 - 100);
        assert_eq!(controller.offset(), 68.0);
    }

    #[test]
    fn test_pause_holds_for_dwell_then_idles() {
        let mut controller = ScrollController::new(32, &config(15.0, 10_000));
        let metrics = FixedWidth(100);
        controller.tick(&metrics, 0, Some("Slussen 3 min"));

        let mut pauses = 0;
        let mut paused_since = None;
        run(&mut controller, &metrics, 10, 20_000, 10, |now, frame| {
            if frame.event == Some(Event::PauseReached) {
                pauses += 1;
                paused_since = Some(now);
            }
            if frame.phase == Phase::Paused {
                assert_eq!(frame.draw_x, -68);
                assert_eq!(frame.text, "Slussen 3 min");
            }
            if frame.event == Some(Event::DwellElapsed) {
                let since = paused_since.unwrap();
                assert_eq!(now - since, 10_000);
            }
        });

        assert_eq!(pauses, 1);
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.active_message().is_blank());
    }

    #[test]
    fn test_message_without_suffix_scrolls_off() {
        let mut controller = ScrollController::new(32, &config(30.0, 10_000));
        let metrics = FixedWidth(100);
        controller.tick(&metrics, 0, Some("Hello world"));

        let mut phases_seen_paused = false;
        let mut scrolled_off = None;
        run(&mut controller, &metrics, 20, 10_000, 20, |now, frame| {
            phases_seen_paused |= frame.phase == Phase::Paused;
            if frame.event == Some(Event::ScrolledOff) {
                scrolled_off = Some(now);
            }
        });

        assert!(!phases_seen_paused);
        // Off when draw_x < -100, i.e. offset > 132 px: 4.4 s at 30 px/s
        let scrolled_off = scrolled_off.expect("message never left the display");
        assert!((4_400..=4_460).contains(&scrolled_off));
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.active_message().is_blank());
    }

    #[test]
    fn test_short_message_with_suffix_does_not_pause() {
        let mut controller = ScrollController::new(32, &config(30.0, 10_000));
        let metrics = FixedWidth(20);
        controller.tick(&metrics, 0, Some("3 min"));

        let mut paused = false;
        run(&mut controller, &metrics, 20, 5_000, 20, |_, frame| {
            paused |= frame.phase == Phase::Paused;
        });

        assert!(!paused);
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn test_interrupt_while_scrolling() {
        let mut controller = ScrollController::new(32, &config(15.0, 10_000));
        controller.tick(&Mono, 0, Some("First message"));
        controller.tick(&Mono, 1_000, None);
        assert!(controller.offset() > 0.0);

        let frame = controller.tick(&Mono, 1_020, Some("Second"));
        assert_eq!(frame.phase, Phase::Scrolling);
        assert_eq!(frame.text, "Second");
        assert_eq!(frame.draw_x, 32);
        assert_eq!(frame.event, Some(Event::MessageStarted { from: Phase::Scrolling }));
        assert_eq!(controller.offset(), 0.0);

        // Integration restarts from the arrival time
        let frame = controller.tick(&Mono, 2_020, None);
        assert_eq!(frame.draw_x, 32 - 15);
    }

    #[test]
    fn test_interrupt_while_paused() {
        let mut controller = ScrollController::new(32, &config(100.0, 10_000));
        let metrics = FixedWidth(100);
        controller.tick(&metrics, 0, Some("Arriving Nu"));
        controller.tick(&metrics, 1_000, None);
        assert_eq!(controller.phase(), Phase::Paused);

        let frame = controller.tick(&metrics, 3_000, Some("Next 5 min"));
        assert_eq!(frame.phase, Phase::Scrolling);
        assert_eq!(frame.event, Some(Event::MessageStarted { from: Phase::Paused }));
        assert_eq!(controller.offset(), 0.0);
        assert_eq!(controller.active_message().time_suffix(), Some("5 min"));
    }

    #[test]
    fn test_empty_arrival_clears_from_any_phase() {
        let metrics = FixedWidth(100);

        // Scrolling
        let mut controller = ScrollController::new(32, &config(15.0, 10_000));
        controller.tick(&metrics, 0, Some("Hello"));
        let frame = controller.tick(&metrics, 100, Some(""));
        assert_eq!(frame.phase, Phase::Idle);
        assert!(frame.is_blank());
        assert_eq!(frame.event, Some(Event::MessageCleared { from: Phase::Scrolling }));

        // Paused
        let mut controller = ScrollController::new(32, &config(1_000.0, 10_000));
        controller.tick(&metrics, 0, Some("Bus 3 min"));
        controller.tick(&metrics, 1_000, None);
        assert_eq!(controller.phase(), Phase::Paused);
        let frame = controller.tick(&metrics, 1_100, Some(""));
        assert_eq!(frame.phase, Phase::Idle);
        assert!(controller.active_message().is_blank());
        assert_eq!(controller.offset(), 0.0);

        // Idle
        let frame = controller.tick(&metrics, 1_200, Some(""));
        assert_eq!(frame.phase, Phase::Idle);
        assert_eq!(frame.event, Some(Event::MessageCleared { from: Phase::Idle }));
    }

    #[test]
    fn test_back_to_back_arrivals_keep_latest() {
        let mut controller = ScrollController::new(32, &config(15.0, 10_000));
        assert!(!controller.submit("first"));
        assert!(controller.submit("second"));
        assert!(controller.has_pending());

        let frame = controller.tick(&Mono, 0, None);
        assert_eq!(frame.text, "second");
        assert!(!controller.has_pending());

        // Same through the tick argument
        controller.submit("third");
        let frame = controller.tick(&Mono, 10, Some("fourth"));
        assert_eq!(frame.text, "fourth");
    }

    #[test]
    fn test_zero_width_message_leaves_immediately() {
        let mut controller = ScrollController::new(32, &config(15.0, 10_000));
        let metrics = FixedWidth(0);
        let frame = controller.tick(&metrics, 0, Some("invisible"));
        assert_eq!(frame.phase, Phase::Scrolling);

        let frame = controller.tick(&metrics, 20, None);
        assert_eq!(frame.event, Some(Event::ScrolledOff));
        assert_eq!(frame.phase, Phase::Idle);
    }

    #[test]
    fn test_large_step_still_pauses() {
        // One tick jumps far beyond the pause threshold
        let metrics = FixedWidth(100);
        let mut controller = ScrollController::new(32, &config(15.0, 10_000));
        controller.tick(&metrics, 0, Some("Line 4 14:05"));
        let frame = controller.tick(&metrics, 60_000, None);
        assert_eq!(frame.event, Some(Event::PauseReached));
        assert_eq!(frame.draw_x, -68);
        assert_eq!(controller.offset(), 68.0);
    }

    #[test]
    fn test_unclamped_pause_keeps_overshoot() {
        let metrics = FixedWidth(100);
        let mut controller = ScrollController::new(
            32,
            &ScrollConfig {
                clamp_pause: false,
                ..config(15.0, 10_000)
            },
        );
        controller.tick(&metrics, 0, Some("Line 4 14:05"));
        let frame = controller.tick(&metrics, 60_000, None);
        assert_eq!(frame.draw_x, -68);
        assert_eq!(controller.offset(), 900.0);
    }

    #[test]
    fn test_idle_holds_draw_x() {
        let metrics = FixedWidth(100);
        let mut controller = ScrollController::new(32, &config(15.0, 10_000));
        controller.tick(&metrics, 0, Some("Hello"));
        controller.tick(&metrics, 1_000, None);
        let before = controller.draw_x();
        controller.tick(&metrics, 1_100, Some(""));
        let frame = controller.tick(&metrics, 5_000, None);
        assert_eq!(frame.draw_x, before);
        assert_eq!(frame.event, None);
    }

    proptest::proptest! {
        #[test]
        fn prop_frame_rate_independent(steps in proptest::collection::vec(1u64..120, 1..200)) {
            // Very wide message so it never leaves the display
            let metrics = FixedWidth(100_000);
            let total: u64 = steps.iter().sum();

            let mut fine = ScrollController::new(32, &config(15.0, 10_000));
            fine.tick(&metrics, 0, Some("Hello"));
            let mut now = 0;
            for step in &steps {
                now += step;
                fine.tick(&metrics, now, None);
            }

            let mut coarse = ScrollController::new(32, &config(15.0, 10_000));
            coarse.tick(&metrics, 0, Some("Hello"));
            coarse.tick(&metrics, total, None);

            proptest::prop_assert!((fine.draw_x() - coarse.draw_x()).abs() <= 1);
        }

        #[test]
        fn prop_arrival_always_restarts(
            warmup in proptest::collection::vec(1u64..2_000, 0..20),
            width in 0u32..400,
            with_suffix in proptest::bool::ANY,
        ) {
            let metrics = FixedWidth(width);
            let mut controller = ScrollController::new(32, &config(40.0, 3_000));
            controller.tick(&metrics, 0, Some(if with_suffix { "Bus 2 min" } else { "Bus" }));

            let mut now = 0;
            for step in warmup {
                now += step;
                controller.tick(&metrics, now, None);
            }

            let frame = controller.tick(&metrics, now + 1, Some("Replacement 7 min"));
            proptest::prop_assert_eq!(frame.phase, Phase::Scrolling);
            proptest::prop_assert_eq!(frame.text, "Replacement 7 min");
            proptest::prop_assert_eq!(controller.offset(), 0.0);
        }
    }
}
