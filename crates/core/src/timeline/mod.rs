use serde::{Deserialize, Serialize};

/// Position within the current track.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackClock {
    pub elapsed_seconds: f32,
    /// Unknown until the track metadata has loaded.
    pub duration_seconds: Option<f32>,
}

impl PlaybackClock {
    pub fn new(duration_seconds: Option<f32>) -> Self {
        Self {
            elapsed_seconds: 0.0,
            duration_seconds,
        }
    }

    pub fn reset(&mut self) {
        self.elapsed_seconds = 0.0;
    }

    pub fn advance(&mut self, delta: f32) {
        let elapsed = (self.elapsed_seconds + delta).max(0.0);
        self.elapsed_seconds = match self.duration_seconds {
            Some(duration) => elapsed.min(duration),
            None => elapsed,
        };
    }

    pub fn is_finished(&self) -> bool {
        self.duration_seconds
            .map(|duration| self.elapsed_seconds >= duration)
            .unwrap_or(false)
    }

    /// Progress through the track in percent; zero while the duration is
    /// unknown.
    pub fn progress_percent(&self) -> f32 {
        match self.duration_seconds {
            Some(duration) if duration > 0.0 => {
                (self.elapsed_seconds / duration * 100.0).clamp(0.0, 100.0)
            }
            _ => 0.0,
        }
    }

    /// Jumps to `fraction` of the track, e.g. from a click on a progress
    /// bar. Ignored while the duration is unknown.
    pub fn seek_to_fraction(&mut self, fraction: f32) {
        if let Some(duration) = self.duration_seconds {
            let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
            self.elapsed_seconds = fraction * duration;
        }
    }

    /// `MM:SS / MM:SS` label for the status line.
    pub fn time_label(&self) -> String {
        format!(
            "{} / {}",
            format_time(self.elapsed_seconds),
            format_time(self.duration_seconds.unwrap_or(0.0))
        )
    }
}

/// Formats seconds as zero-padded `MM:SS`. Negative or non-finite input
/// reads as zero.
pub fn format_time(seconds: f32) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Identifies one scheduled animation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle {
    generation: u64,
    sequence: u64,
}

impl TickHandle {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Explicit stand-in for the host's animation-frame scheduler.
///
/// At most one tick is pending at a time. Cancelling bumps the generation,
/// so handles issued before the cancel can never fire again.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    generation: u64,
    sequence: u64,
    pending: Option<TickHandle>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules the next tick, superseding any tick still pending.
    pub fn request_frame(&mut self) -> TickHandle {
        self.sequence += 1;
        let handle = TickHandle {
            generation: self.generation,
            sequence: self.sequence,
        };
        self.pending = Some(handle);
        handle
    }

    pub fn pending(&self) -> Option<TickHandle> {
        self.pending
    }

    /// Drops the pending tick, returning it if there was one.
    pub fn cancel(&mut self) -> Option<TickHandle> {
        self.generation += 1;
        self.pending.take()
    }

    /// Consumes `handle` if it is the live pending tick. Returns `false` for
    /// cancelled, superseded or already fired handles.
    pub fn fire(&mut self, handle: TickHandle) -> bool {
        if handle.generation == self.generation && self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
