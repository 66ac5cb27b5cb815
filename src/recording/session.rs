//! Recording session state machine.
//!
//! Owns the frame buffer and decides what each sampling tick does. It has
//! no threads or callbacks of its own; [`super::SignalRecorder`] drives it
//! and acts on the returned [`TickOutcome`].

/// Whether a session is currently capturing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
}

/// What the caller must do after a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not recording; the sample was dropped.
    Ignored,
    /// Sample stored.
    Recorded,
    /// Sample stored and a render snapshot is due.
    Render(Vec<u8>),
    /// Sample stored and the buffer is now full; the session must stop.
    Full,
}

/// Fixed-length contrast recording.
#[derive(Debug, Clone)]
pub struct RecordingSession {
    state: SessionState,
    frames: Vec<u8>,
    recorded: usize,
    render_gap: u32,
    render_counter: u32,
}

impl RecordingSession {
    /// Creates an idle session with a zeroed buffer of `capacity` ticks.
    pub fn new(capacity: usize, render_gap: u32) -> Self {
        Self {
            state: SessionState::Idle,
            frames: vec![0; capacity],
            recorded: 0,
            render_gap: render_gap.max(1),
            render_counter: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Ticks recorded in the current or last session.
    #[inline]
    pub fn recorded(&self) -> usize {
        self.recorded
    }

    /// Buffer length.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.frames.len()
    }

    /// The whole buffer, including unrecorded zero tail.
    pub fn frames(&self) -> &[u8] {
        &self.frames
    }

    /// Idle -> Recording. Returns false if already recording.
    pub fn start(&mut self) -> bool {
        if self.is_recording() {
            return false;
        }
        self.frames.fill(0);
        self.recorded = 0;
        self.render_counter = 0;
        self.state = SessionState::Recording;
        true
    }

    /// Recording -> Idle. Returns false if not recording.
    pub fn stop(&mut self) -> bool {
        if !self.is_recording() {
            return false;
        }
        self.state = SessionState::Idle;
        true
    }

    /// Stores one contrast sample if recording.
    pub fn record(&mut self, contrast: u8) -> TickOutcome {
        if !self.is_recording() {
            return TickOutcome::Ignored;
        }
        if self.recorded >= self.frames.len() {
            return TickOutcome::Full;
        }

        self.frames[self.recorded] = contrast;
        self.recorded += 1;

        if self.recorded >= self.frames.len() {
            return TickOutcome::Full;
        }

        self.render_counter += 1;
        if self.render_counter >= self.render_gap {
            self.render_counter = 0;
            return TickOutcome::Render(self.frames.clone());
        }
        TickOutcome::Recorded
    }

    /// Reallocates the buffer. Refused while recording.
    pub fn resize(&mut self, capacity: usize) -> bool {
        if self.is_recording() {
            return false;
        }
        self.frames = vec![0; capacity];
        self.recorded = 0;
        self.render_counter = 0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle_and_ignores_samples() {
        let mut session = RecordingSession::new(10, 4);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.record(9), TickOutcome::Ignored);
        assert_eq!(session.recorded(), 0);
    }

    #[test]
    fn test_start_clears_previous_recording() {
        let mut session = RecordingSession::new(4, 10);
        session.start();
        session.record(7);
        session.record(8);
        session.stop();
        assert_eq!(session.frames(), &[7, 8, 0, 0]);

        assert!(session.start());
        assert_eq!(session.frames(), &[0, 0, 0, 0]);
        assert_eq!(session.recorded(), 0);
    }

    #[test]
    fn test_double_start_and_stop() {
        let mut session = RecordingSession::new(4, 1);
        assert!(!session.stop());
        assert!(session.start());
        assert!(!session.start());
        assert!(session.stop());
        assert!(!session.stop());
    }

    #[test]
    fn test_full_on_last_sample() {
        let mut session = RecordingSession::new(3, 10);
        session.start();
        assert_eq!(session.record(1), TickOutcome::Recorded);
        assert_eq!(session.record(2), TickOutcome::Recorded);
        assert_eq!(session.record(3), TickOutcome::Full);
        assert_eq!(session.recorded(), 3);
        assert_eq!(session.frames(), &[1, 2, 3]);
    }

    #[test]
    fn test_render_every_gap() {
        let mut session = RecordingSession::new(10, 2);
        session.start();
        assert_eq!(session.record(1), TickOutcome::Recorded);
        match session.record(2) {
            TickOutcome::Render(snapshot) => {
                assert_eq!(&snapshot[..3], &[1, 2, 0]);
                assert_eq!(snapshot.len(), 10);
            }
            other => panic!("expected render, got {:?}", other),
        }
        assert_eq!(session.record(3), TickOutcome::Recorded);
    }

    #[test]
    fn test_resize_only_when_idle() {
        let mut session = RecordingSession::new(540, 4);
        session.start();
        assert!(!session.resize(1080));
        assert_eq!(session.capacity(), 540);
        session.record(5);
        session.stop();

        assert!(session.resize(1080));
        assert_eq!(session.capacity(), 1080);
        assert_eq!(session.recorded(), 0);
    }
}
