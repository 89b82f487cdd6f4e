//! Playback lifecycle, decoupled from rendering.
//!
//! The host translates media events (load started, ready to play, play
//! accepted, stop, end of track, error) into [`PlaybackEvent`]s. Every
//! accepted transition reports whether the render loop has to start or
//! stop.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{FreqVizError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Idle,
    Loading,
    Ready,
    Playing,
    Stopped,
    Failed,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Loading => "loading",
            PlaybackState::Ready => "ready",
            PlaybackState::Playing => "playing",
            PlaybackState::Stopped => "stopped",
            PlaybackState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// A track started loading. Replaces whatever was playing.
    Load,
    /// The track can play through without stalling.
    Ready,
    /// The host accepted the play request.
    Play,
    Stop,
    Ended,
    Error(String),
}

impl fmt::Display for PlaybackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackEvent::Load => f.write_str("load"),
            PlaybackEvent::Ready => f.write_str("ready"),
            PlaybackEvent::Play => f.write_str("play"),
            PlaybackEvent::Stop => f.write_str("stop"),
            PlaybackEvent::Ended => f.write_str("ended"),
            PlaybackEvent::Error(reason) => write!(f, "error ({reason})"),
        }
    }
}

/// What the render loop has to do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSignal {
    Start,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: PlaybackState,
    pub to: PlaybackState,
}

impl Transition {
    pub fn loop_signal(&self) -> Option<LoopSignal> {
        match (self.from.is_playing(), self.to.is_playing()) {
            (false, true) => Some(LoopSignal::Start),
            (true, false) => Some(LoopSignal::Stop),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct PlaybackMachine {
    state: PlaybackState,
    last_error: Option<String>,
}

impl PlaybackMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Reason for the most recent failure, cleared by the next load.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn apply(&mut self, event: PlaybackEvent) -> Result<Transition> {
        use PlaybackState::*;

        let from = self.state;
        let to = match (&event, from) {
            (PlaybackEvent::Load, _) => Loading,
            (PlaybackEvent::Ready, Loading) => Ready,
            (PlaybackEvent::Play, Ready) => Playing,
            (PlaybackEvent::Stop, Loading | Ready | Playing) => Stopped,
            (PlaybackEvent::Stop, Idle | Stopped | Failed) => from,
            (PlaybackEvent::Ended, Playing) => Stopped,
            (PlaybackEvent::Error(_), _) => Failed,
            _ => {
                return Err(FreqVizError::InvalidTransition {
                    from: from.to_string(),
                    event: event.to_string(),
                })
            }
        };

        match event {
            PlaybackEvent::Error(reason) => {
                tracing::warn!(%from, reason = %reason, "playback failed");
                self.last_error = Some(reason);
            }
            PlaybackEvent::Load => self.last_error = None,
            _ => {}
        }

        if from != to {
            tracing::debug!(%from, %to, "playback transition");
        }
        self.state = to;
        Ok(Transition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> PlaybackMachine {
        let mut machine = PlaybackMachine::new();
        machine.apply(PlaybackEvent::Load).unwrap();
        machine.apply(PlaybackEvent::Ready).unwrap();
        machine
    }

    #[test]
    fn happy_path_starts_and_stops_the_loop() {
        let mut machine = playing();
        let start = machine.apply(PlaybackEvent::Play).unwrap();
        assert_eq!(start.to, PlaybackState::Playing);
        assert_eq!(start.loop_signal(), Some(LoopSignal::Start));

        let stop = machine.apply(PlaybackEvent::Ended).unwrap();
        assert_eq!(stop.to, PlaybackState::Stopped);
        assert_eq!(stop.loop_signal(), Some(LoopSignal::Stop));
    }

    #[test]
    fn loading_a_new_track_stops_the_current_one() {
        let mut machine = playing();
        machine.apply(PlaybackEvent::Play).unwrap();

        let reload = machine.apply(PlaybackEvent::Load).unwrap();
        assert_eq!(reload.to, PlaybackState::Loading);
        assert_eq!(reload.loop_signal(), Some(LoopSignal::Stop));
    }

    #[test]
    fn errors_fail_from_any_state_and_clear_on_reload() {
        let mut machine = playing();
        machine.apply(PlaybackEvent::Play).unwrap();

        let failed = machine
            .apply(PlaybackEvent::Error("decode error".to_string()))
            .unwrap();
        assert_eq!(failed.to, PlaybackState::Failed);
        assert_eq!(failed.loop_signal(), Some(LoopSignal::Stop));
        assert_eq!(machine.last_error(), Some("decode error"));

        machine.apply(PlaybackEvent::Load).unwrap();
        assert_eq!(machine.last_error(), None);
    }

    #[test]
    fn stop_is_idempotent_when_nothing_plays() {
        let mut machine = PlaybackMachine::new();
        let transition = machine.apply(PlaybackEvent::Stop).unwrap();
        assert_eq!(transition.to, PlaybackState::Idle);
        assert_eq!(transition.loop_signal(), None);
    }

    #[test]
    fn rejects_out_of_order_events() {
        let mut machine = PlaybackMachine::new();
        let err = machine.apply(PlaybackEvent::Play).unwrap_err();
        assert!(matches!(err, FreqVizError::InvalidTransition { .. }));
        assert!(format!("{err}").contains("idle"));

        assert!(machine.apply(PlaybackEvent::Ended).is_err());
        assert!(machine.apply(PlaybackEvent::Ready).is_err());
        assert_eq!(machine.state(), PlaybackState::Idle);
    }
}
