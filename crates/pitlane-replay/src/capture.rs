//! Bounded in-memory input capture.

use pitlane_core::DriverInput;

/// The inputs applied to every car during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplayFrame {
    /// One input per car, in car order.
    pub inputs: Vec<DriverInput>,
}

impl ReplayFrame {
    /// Build a frame holding exactly `car_count` inputs: the given inputs
    /// first, padded with [`DriverInput::NEUTRAL`] or truncated.
    pub fn padded(inputs: &[DriverInput], car_count: usize) -> Self {
        let mut frame = Vec::with_capacity(car_count);
        frame.extend(inputs.iter().take(car_count).copied());
        frame.resize(car_count, DriverInput::NEUTRAL);
        Self { inputs: frame }
    }
}

/// What happened to a tick offered to [`ReplayLog::record`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Capture is off; nothing was stored.
    Inactive,
    /// The frame was appended.
    Recorded,
    /// Capture is on but the log is at capacity; the tick was dropped.
    Full,
}

/// Frames reserved when a log is created. Larger logs grow as they record.
const INITIAL_RESERVE_FRAMES: usize = 1 << 16;

/// Captured driver inputs, bounded by a fixed frame capacity.
///
/// Frames beyond capacity are counted and discarded; capture never fails
/// and never stops stepping.
#[derive(Clone, Debug)]
pub struct ReplayLog {
    frames: Vec<ReplayFrame>,
    capacity: usize,
    capturing: bool,
    dropped: u64,
}

impl ReplayLog {
    /// Create an idle log that will hold at most `capacity` frames.
    ///
    /// Storage for the first frames is reserved now; the rest is only
    /// allocated if capture actually reaches it.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity.min(INITIAL_RESERVE_FRAMES)),
            capacity,
            capturing: false,
            dropped: 0,
        }
    }

    /// Clear previous frames and start capturing.
    pub fn start(&mut self) {
        self.clear();
        self.capturing = true;
    }

    /// Stop capturing. Frames already recorded are kept.
    pub fn stop(&mut self) {
        self.capturing = false;
    }

    /// Discard every frame and the dropped-tick count. Capture state is
    /// unchanged.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.dropped = 0;
    }

    /// Offer one tick's inputs. Stored as a frame of exactly `car_count`
    /// inputs when capturing and below capacity.
    pub fn record(&mut self, inputs: &[DriverInput], car_count: usize) -> RecordOutcome {
        if !self.capturing {
            return RecordOutcome::Inactive;
        }
        if self.frames.len() >= self.capacity {
            self.dropped += 1;
            return RecordOutcome::Full;
        }
        self.frames.push(ReplayFrame::padded(inputs, car_count));
        RecordOutcome::Recorded
    }

    /// Whether ticks are currently being captured.
    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Recorded frames, oldest first.
    pub fn frames(&self) -> &[ReplayFrame] {
        &self.frames
    }

    /// Move the recorded frames out, leaving the log empty. Pair with
    /// [`restore_frames`](Self::restore_frames) to replay without copying.
    pub fn take_frames(&mut self) -> Vec<ReplayFrame> {
        std::mem::take(&mut self.frames)
    }

    /// Replace the recorded frames, truncating to capacity.
    pub fn restore_frames(&mut self, mut frames: Vec<ReplayFrame>) {
        frames.truncate(self.capacity);
        self.frames = frames;
    }

    /// Number of recorded frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frames are recorded.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Whether the log has reached capacity.
    pub fn is_full(&self) -> bool {
        self.frames.len() >= self.capacity
    }

    /// Maximum number of frames retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Ticks offered while full since the last clear.
    pub fn dropped_ticks(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(t: f32) -> DriverInput {
        DriverInput::new(t, 0.0, 0.0)
    }

    #[test]
    fn idle_log_ignores_ticks() {
        let mut log = ReplayLog::with_capacity(4);
        assert_eq!(log.record(&[input(1.0)], 1), RecordOutcome::Inactive);
        assert!(log.is_empty());
    }

    #[test]
    fn frames_are_padded_to_car_count() {
        let mut log = ReplayLog::with_capacity(4);
        log.start();
        assert_eq!(log.record(&[input(0.5)], 3), RecordOutcome::Recorded);
        let frame = &log.frames()[0];
        assert_eq!(frame.inputs.len(), 3);
        assert_eq!(frame.inputs[0], input(0.5));
        assert_eq!(frame.inputs[1], DriverInput::NEUTRAL);
        assert_eq!(frame.inputs[2], DriverInput::NEUTRAL);
    }

    #[test]
    fn extra_inputs_are_truncated() {
        let frame = ReplayFrame::padded(&[input(0.1), input(0.2), input(0.3)], 2);
        assert_eq!(frame.inputs, vec![input(0.1), input(0.2)]);
    }

    #[test]
    fn capacity_bounds_capture() {
        let mut log = ReplayLog::with_capacity(2);
        log.start();
        assert_eq!(log.record(&[], 1), RecordOutcome::Recorded);
        assert_eq!(log.record(&[], 1), RecordOutcome::Recorded);
        assert!(log.is_full());
        assert_eq!(log.record(&[], 1), RecordOutcome::Full);
        assert_eq!(log.record(&[], 1), RecordOutcome::Full);
        assert_eq!(log.len(), 2);
        assert_eq!(log.dropped_ticks(), 2);
        assert!(log.is_capturing());
    }

    #[test]
    fn stop_keeps_frames_and_start_clears_them() {
        let mut log = ReplayLog::with_capacity(8);
        log.start();
        log.record(&[input(1.0)], 1);
        log.stop();
        assert!(!log.is_capturing());
        assert_eq!(log.record(&[input(1.0)], 1), RecordOutcome::Inactive);
        assert_eq!(log.len(), 1);
        log.start();
        assert!(log.is_empty());
        assert!(log.is_capturing());
    }

    #[test]
    fn huge_capacity_is_not_reserved_up_front() {
        let mut log = ReplayLog::with_capacity(usize::MAX);
        assert_eq!(log.capacity(), usize::MAX);
        assert!(log.frames.capacity() <= INITIAL_RESERVE_FRAMES);
        log.start();
        assert_eq!(log.record(&[input(1.0)], 1), RecordOutcome::Recorded);
        assert!(!log.is_full());
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let mut log = ReplayLog::with_capacity(0);
        log.start();
        assert_eq!(log.record(&[input(1.0)], 1), RecordOutcome::Full);
        assert!(log.is_empty());
    }

    #[test]
    fn take_then_restore_round_trips() {
        let mut log = ReplayLog::with_capacity(4);
        log.start();
        log.record(&[input(0.3)], 1);
        log.record(&[input(0.6)], 1);
        let frames = log.take_frames();
        assert!(log.is_empty());
        log.restore_frames(frames);
        assert_eq!(log.len(), 2);
        assert_eq!(log.frames()[1].inputs[0], input(0.6));
    }

    #[test]
    fn restore_truncates_to_capacity() {
        let mut log = ReplayLog::with_capacity(1);
        log.restore_frames(vec![ReplayFrame::default(), ReplayFrame::default()]);
        assert_eq!(log.len(), 1);
    }
}
