//! Deadline-based timers driven by the event loop tick.
//!
//! Neither timer owns a thread or task: the loop passes the current instant to
//! `tick`, which makes both easy to drive from tests.
//!
use std::time::{Duration, Instant};

/// How long a notification stays on screen.
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(2);
/// Interval between backdrop changes.
pub const BACKDROP_INTERVAL: Duration = Duration::from_secs(15);
/// Backdrop image references, served by whatever hosts the API.
pub const DEFAULT_BACKDROPS: [&str; 4] = [
    "/images/bg1.jpg",
    "/images/bg2.jpg",
    "/images/bg3.jpg",
    "/images/bg4.jpg",
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient popup message. Showing a new one restarts the hide deadline.
#[derive(Clone, Debug)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub visible: bool,
    hide_at: Option<Instant>,
    duration: Duration,
}

impl Notification {
    pub fn new(duration: Duration) -> Self {
        Self {
            message: String::new(),
            kind: NotificationKind::Success,
            visible: false,
            hide_at: None,
            duration,
        }
    }

    pub fn show(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.show_at(message, kind, Instant::now());
    }

    /// Replace the current message; any pending hide is superseded.
    pub fn show_at(&mut self, message: impl Into<String>, kind: NotificationKind, now: Instant) {
        self.message = message.into();
        self.kind = kind;
        self.visible = true;
        self.hide_at = Some(now + self.duration);
    }

    /// Instant at which the current message disappears, if one is showing.
    pub fn hide_at(&self) -> Option<Instant> {
        self.hide_at
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.hide_at
            && now >= deadline
        {
            self.visible = false;
            self.hide_at = None;
        }
    }
}

impl Default for Notification {
    fn default() -> Self {
        Self::new(NOTIFICATION_DURATION)
    }
}

/// Cosmetic rotation over a fixed list of image references.
#[derive(Clone, Debug)]
pub struct Backdrop {
    images: Vec<String>,
    index: usize,
    interval: Duration,
    next_at: Instant,
}

impl Backdrop {
    pub fn new(images: Vec<String>, interval: Duration) -> Self {
        Self::starting_at(images, interval, Instant::now())
    }

    pub fn starting_at(images: Vec<String>, interval: Duration, now: Instant) -> Self {
        Self {
            images,
            index: 0,
            interval,
            next_at: now + interval,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.images.get(self.index).map(String::as_str)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tick(&mut self, now: Instant) {
        if self.images.is_empty() || self.interval.is_zero() {
            return;
        }
        while now >= self.next_at {
            self.index = (self.index + 1) % self.images.len();
            self.next_at += self.interval;
        }
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new(
            DEFAULT_BACKDROPS.iter().map(|s| s.to_string()).collect(),
            BACKDROP_INTERVAL,
        )
    }
}
