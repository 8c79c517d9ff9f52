// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback clock for headless preview.

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Stopped at the start
    #[default]
    Stopped,
    /// Advancing
    Playing,
    /// Holding the current time
    Paused,
}

/// Drives the sampling time of a composition
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    /// Current playback time
    pub time: f64,
    /// Playback state
    pub state: PlaybackState,
    /// Playback speed multiplier
    pub speed: f64,
    /// Wrap around at the end instead of stopping
    pub looping: bool,
}

impl PlaybackClock {
    /// Create a stopped clock at time zero
    pub fn new() -> Self {
        Self {
            time: 0.0,
            state: PlaybackState::Stopped,
            speed: 1.0,
            looping: false,
        }
    }

    /// Advance by `delta_time` seconds inside a composition of length `duration`
    pub fn update(&mut self, delta_time: f64, duration: f64) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.time += delta_time * self.speed;

        if self.time >= duration {
            if self.looping && duration > 0.0 {
                self.time %= duration;
            } else {
                self.time = duration;
                self.state = PlaybackState::Stopped;
            }
        }
    }

    /// Play from current position
    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop and reset to the beginning
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.time = 0.0;
    }

    /// Toggle play/pause
    pub fn toggle_playback(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused | PlaybackState::Stopped => self.play(),
        }
    }

    /// Seek to a specific time
    pub fn seek(&mut self, time: f64) {
        self.time = time.max(0.0);
    }

    /// Is currently playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}
