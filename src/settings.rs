//! Tunables shared by every dialog opened on a canvas

use std::time::Duration;

/// Behavioural settings held by the [`Canvas`](crate::canvas::Canvas)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// How long the shell box waits on its output queue before checking keys
    pub poll_interval: Duration,
    /// How long the OK button stays dimmed after a stray key in a message box
    pub flash_duration: Duration,
    /// Key that toggles the highlighted entry of a selection list
    pub activate_key: char,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            flash_duration: Duration::from_millis(100),
            activate_key: ' ',
        }
    }
}

impl Settings {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_flash_duration(mut self, duration: Duration) -> Self {
        self.flash_duration = duration;
        self
    }

    pub fn with_activate_key(mut self, key: char) -> Self {
        self.activate_key = key;
        self
    }
}
