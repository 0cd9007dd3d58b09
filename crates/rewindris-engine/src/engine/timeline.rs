/// Base rewind speed, in seconds of history consumed per second of wall
/// time.
pub const REWIND_BASE_SPEED: f64 = 1.0;

/// Damping constant for the near-zero throttle: the effective rewind delta
/// is scaled by `t / (t + REWIND_ZERO_DAMPING)`, so reaching the absolute
/// start of the session is asymptotically hard. Gameplay tunable, not a
/// correctness requirement.
pub const REWIND_ZERO_DAMPING: f64 = 0.5;

/// A state mutation that can be applied and exactly undone.
///
/// Every change to shared game state must be expressed as a `Reversible`
/// event and recorded through [`Timeline::record`]; anything mutated outside
/// an event is invisible to rewind and corrupts the apply/undo invariant.
pub trait Reversible {
    type State;

    fn apply(&self, state: &mut Self::State);
    fn undo(&self, state: &mut Self::State);
}

/// An event plus the simulation time at which it was recorded.
#[derive(Debug, Clone)]
pub struct Stamped<E> {
    pub time: f64,
    pub event: E,
}

/// Whether the timeline's clock is advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TimelineState {
    Running,
    Stopped,
}

/// The authoritative clock and the reversible history it guards.
///
/// The timeline owns the ordered event log. Recording an event stamps it
/// with the current time, applies it, and appends it to the log; rewinding
/// pops events whose stamp lies past the rewind target and undoes them in
/// reverse order. At any moment, undoing every stored event returns the
/// state to exactly what it was when the timeline was created.
///
/// Rewind speed ramps up multiplicatively the longer rewind is held and is
/// reset through [`Timeline::reset_rewind_speed`] once the player releases
/// the control. The rewind delta is clamped to the current time, so the
/// clock never goes negative and the log is never popped past its start.
#[derive(Debug, Clone)]
pub struct Timeline<E> {
    current_time: f64,
    events: Vec<Stamped<E>>,
    state: TimelineState,
    rewind_speed: f64,
    rewind_requested: bool,
}

impl<E: Reversible> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Reversible> Timeline<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_time: 0.0,
            events: Vec::new(),
            state: TimelineState::Running,
            rewind_speed: REWIND_BASE_SPEED,
            rewind_requested: false,
        }
    }

    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    #[must_use]
    pub fn state(&self) -> TimelineState {
        self.state
    }

    /// Number of events currently in the log.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn rewind_speed(&self) -> f64 {
        self.rewind_speed
    }

    /// Whether a rewind request is pending for the next update.
    #[must_use]
    pub fn is_rewind_requested(&self) -> bool {
        self.rewind_requested
    }

    /// Stamps `event` with the current time, applies it to `state`, appends
    /// it to the log, and returns the stamp.
    ///
    /// This is the only sanctioned way to mutate `state`.
    pub fn record(&mut self, event: E, state: &mut E::State) -> f64 {
        event.apply(state);
        self.events.push(Stamped {
            time: self.current_time,
            event,
        });
        self.current_time
    }

    /// Advances or rewinds the clock by one frame.
    ///
    /// Without a pending rewind request the clock simply advances by
    /// `elapsed`. With one, a bounded slice of history is undone instead:
    /// the delta is the smallest of the rewind speed, `elapsed` scaled by
    /// that speed, and the current time, further damped near time zero.
    /// Every event stamped at or after the rewind target is popped and
    /// undone, most recent first.
    pub fn update(&mut self, elapsed: f64, state: &mut E::State) {
        if self.state.is_stopped() {
            self.rewind_requested = false;
            return;
        }
        if !self.rewind_requested {
            self.current_time += elapsed;
            return;
        }
        self.rewind_requested = false;

        let mut delta = self
            .rewind_speed
            .min(elapsed * self.rewind_speed)
            .min(self.current_time);
        if self.current_time > 0.0 {
            delta *= self.current_time / (self.current_time + REWIND_ZERO_DAMPING);
        }
        let target = self.current_time - delta;

        while self.events.last().is_some_and(|last| last.time >= target) {
            let stamped = self
                .events
                .pop()
                .expect("rewind target is clamped to recorded history");
            stamped.event.undo(state);
        }
        self.current_time = target;

        // Holding rewind keeps getting faster until released.
        self.rewind_speed *= 1.0 + elapsed;
    }

    /// Requests one frame's worth of rewind; the next [`Timeline::update`]
    /// consumes it. Suited to a "hold to rewind" control scheme.
    pub fn rewind_frame(&mut self) {
        self.rewind_requested = true;
    }

    /// Resets the ramped rewind speed to its base value. Call when the
    /// rewind control is released.
    pub fn reset_rewind_speed(&mut self) {
        self.rewind_speed = REWIND_BASE_SPEED;
    }

    /// Freezes the clock; both forward play and rewind stop. A pending
    /// rewind request is discarded.
    pub fn stop(&mut self) {
        self.state = TimelineState::Stopped;
        self.rewind_requested = false;
    }

    /// Resumes the clock after [`Timeline::stop`].
    pub fn resume(&mut self) {
        self.state = TimelineState::Running;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Toy event for exercising the timeline without a full game state.
    #[derive(Debug, Clone, Copy)]
    struct Push(i32);

    impl Reversible for Push {
        type State = Vec<i32>;

        fn apply(&self, state: &mut Vec<i32>) {
            state.push(self.0);
        }

        fn undo(&self, state: &mut Vec<i32>) {
            let popped = state.pop();
            assert_eq!(popped, Some(self.0), "events must undo in reverse order");
        }
    }

    #[test]
    fn record_applies_and_stamps() {
        let mut timeline = Timeline::new();
        let mut state = Vec::new();

        timeline.update(1.5, &mut state);
        let stamp = timeline.record(Push(7), &mut state);

        assert_eq!(state, vec![7]);
        assert!((stamp - 1.5).abs() < 1e-12);
        assert_eq!(timeline.history_len(), 1);
    }

    #[test]
    fn rewind_restores_initial_state() {
        let mut timeline = Timeline::new();
        let mut state = Vec::new();

        for i in 0..20 {
            timeline.update(0.1, &mut state);
            timeline.record(Push(i), &mut state);
        }

        for _ in 0..10_000 {
            timeline.rewind_frame();
            timeline.update(0.1, &mut state);
            if timeline.history_len() == 0 {
                break;
            }
        }

        assert!(state.is_empty());
        assert!(timeline.current_time() >= 0.0);
    }

    #[test]
    fn rewind_speed_ramps_while_held_and_resets() {
        let mut timeline = Timeline::<Push>::new();
        let mut state = Vec::new();
        timeline.update(10.0, &mut state);

        let mut previous = timeline.rewind_speed();
        for _ in 0..5 {
            timeline.rewind_frame();
            timeline.update(0.1, &mut state);
            assert!(timeline.rewind_speed() >= previous);
            previous = timeline.rewind_speed();
        }
        assert!(timeline.rewind_speed() > REWIND_BASE_SPEED);

        timeline.reset_rewind_speed();
        assert!((timeline.rewind_speed() - REWIND_BASE_SPEED).abs() < 1e-12);
    }

    #[test]
    fn current_time_never_goes_negative() {
        let mut timeline = Timeline::<Push>::new();
        let mut state = Vec::new();
        timeline.update(0.2, &mut state);

        for _ in 0..1_000 {
            timeline.rewind_frame();
            timeline.update(10.0, &mut state);
            assert!(timeline.current_time() >= 0.0);
        }
    }

    #[test]
    fn stopped_timeline_does_not_advance_or_rewind() {
        let mut timeline = Timeline::new();
        let mut state = Vec::new();
        timeline.update(1.0, &mut state);
        timeline.record(Push(1), &mut state);

        timeline.stop();
        timeline.update(1.0, &mut state);
        assert!((timeline.current_time() - 1.0).abs() < 1e-12);

        timeline.rewind_frame();
        timeline.update(1.0, &mut state);
        assert_eq!(state, vec![1]);

        timeline.resume();
        timeline.update(1.0, &mut state);
        assert!(timeline.current_time() > 1.0);
    }
}
