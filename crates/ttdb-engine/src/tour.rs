use std::time::{Duration, Instant};

pub const TOUR_DELAY: Duration = Duration::from_millis(12_000);
pub const SLOW_DELAY_MULTIPLIER: f64 = 1.7;
pub const AUDIO_SPECIAL_KIND: &str = "tour_sound";
pub const AUDIO_PATH_KEY: &str = "audio_path";

pub const NOTE_OFF: &str = "Guided tour is off.";
pub const NOTE_PAUSED: &str = "Guided tour paused. Press Space to resume.";
pub const NOTE_NEED_MORE: &str = "Discover another record to expand the guided tour.";
pub const NOTE_SLOW: &str = "Slow tour pace is on: pauses are longer.";
pub const NOTE_DEFAULT: &str = "Default network tour will advance after a short pause.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourState {
    Off,
    Paused,
    Running,
}

// The audio cue computed by the scheduler; actual playback belongs to the
// front-end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TourAudio {
    pub path: Option<String>,
    pub should_play: bool,
}

// Timer-driven autoplay over the discovered order. Holds the cancellable
// delay deadline; the session decides what "advance" means.
#[derive(Debug, Clone)]
pub struct TourScheduler {
    pub enabled: bool,
    pub slow_pace: bool,
    paused: bool,
    search_focused: bool,
    deadline: Option<Instant>,
}

impl TourScheduler {
    pub fn new(enabled: bool, slow_pace: bool) -> Self {
        Self {
            enabled,
            slow_pace,
            paused: false,
            search_focused: false,
            deadline: None,
        }
    }

    pub fn state(&self) -> TourState {
        if !self.enabled {
            TourState::Off
        } else if self.paused {
            TourState::Paused
        } else {
            TourState::Running
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn search_focused(&self) -> bool {
        self.search_focused
    }

    pub fn set_search_focus(&mut self, focused: bool) {
        self.search_focused = focused;
    }

    pub fn delay(&self) -> Duration {
        if self.slow_pace {
            let ms = (TOUR_DELAY.as_millis() as f64 * SLOW_DELAY_MULTIPLIER).round() as u64;
            Duration::from_millis(ms)
        } else {
            TOUR_DELAY
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    // Rearm the delay timer and report the matching status note. Scheduling
    // is suspended while the search field holds focus; the persisted
    // enabled flag is untouched.
    pub fn schedule(&mut self, now: Instant, discovered: usize) -> &'static str {
        self.deadline = None;
        if !self.enabled {
            return NOTE_OFF;
        }
        if self.paused {
            return NOTE_PAUSED;
        }
        if discovered < 2 {
            return NOTE_NEED_MORE;
        }
        if !self.search_focused {
            self.deadline = Some(now + self.delay());
        }
        if self.slow_pace {
            NOTE_SLOW
        } else {
            NOTE_DEFAULT
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn audio_should_play(&self, discovered: usize) -> bool {
        self.enabled && !self.paused && !self.search_focused && discovered >= 2
    }
}
