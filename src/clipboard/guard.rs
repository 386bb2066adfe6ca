//! Timed exposure of secrets on the clipboard.
//!
//! Every copy starts an exposure tagged with a fresh generation. The
//! foreground scheduler calls [`ClipboardGuard::tick`] with the generation it
//! was scheduled for; ticks for anything but the active generation are stale
//! and do nothing, so a newer copy supersedes an older countdown instead of
//! racing it.

use super::sink::ClipboardSink;
use crate::domain::Result;
use secrecy::{ExposeSecret, SecretString};
use std::time::{Duration, Instant};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Longest countdown a secret may stay on the clipboard (one day). Longer
/// delays are clamped to it.
pub const MAX_CLEAR_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// What was copied. Only used for status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyKind {
    Password,
    Login,
    LoginAndPassword,
}

impl CopyKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Password => "Password",
            Self::Login => "Login",
            Self::LoginAndPassword => "Login and password",
        }
    }
}

/// The secret currently on the clipboard. The value itself is not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardExposure {
    pub generation: u64,
    pub deadline: Instant,
    pub kind: CopyKind,
}

/// Result of a scheduled tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belongs to a superseded or finished exposure.
    Stale,
    /// Still counting down. Tick again after `next`.
    Counting { remaining_secs: u64, next: Duration },
    /// The deadline passed and the clipboard was cleared.
    Cleared,
}

/// Owner of the clipboard while a secret is exposed.
pub struct ClipboardGuard {
    sink: Box<dyn ClipboardSink>,
    delay: Duration,
    generation: u64,
    active: Option<ClipboardExposure>,
}

impl ClipboardGuard {
    #[must_use]
    pub fn new(sink: Box<dyn ClipboardSink>, delay: Duration) -> Self {
        Self {
            sink,
            delay: clamp_delay(delay),
            generation: 0,
            active: None,
        }
    }

    /// Copies `secret` and starts a countdown of the configured delay.
    ///
    /// Returns the generation to schedule the first tick for. If the write
    /// fails, any earlier exposure stays active with its own timer.
    ///
    /// # Errors
    ///
    /// Returns the sink's error when the clipboard write fails.
    pub fn start(&mut self, secret: &SecretString, kind: CopyKind, now: Instant) -> Result<u64> {
        self.sink.set_text(secret.expose_secret())?;

        self.generation += 1;
        self.active = Some(ClipboardExposure {
            generation: self.generation,
            deadline: now + self.delay,
            kind,
        });
        tracing::info!(
            generation = self.generation,
            kind = kind.label(),
            delay_secs = self.delay.as_secs(),
            "secret exposed on clipboard"
        );
        Ok(self.generation)
    }

    /// Advances the countdown for `generation`.
    ///
    /// # Errors
    ///
    /// Returns the sink's error when clearing fails. The exposure stays active
    /// so a later tick can retry.
    pub fn tick(&mut self, generation: u64, now: Instant) -> Result<TickOutcome> {
        let Some(exposure) = self.active.filter(|e| e.generation == generation) else {
            return Ok(TickOutcome::Stale);
        };

        if now < exposure.deadline {
            let left = exposure.deadline - now;
            let remaining_secs = left.as_secs() + u64::from(left.subsec_nanos() > 0);
            return Ok(TickOutcome::Counting {
                remaining_secs,
                next: left.min(TICK_INTERVAL),
            });
        }

        self.sink.clear()?;
        self.active = None;
        tracing::info!(generation, "clipboard cleared after countdown");
        Ok(TickOutcome::Cleared)
    }

    /// Clears the clipboard now and invalidates any pending tick.
    ///
    /// Returns `true` if an exposure was active.
    ///
    /// # Errors
    ///
    /// Returns the sink's error when clearing fails; the exposure is kept.
    pub fn cancel(&mut self) -> Result<bool> {
        if self.active.is_none() {
            return Ok(false);
        }
        self.sink.clear()?;
        self.active = None;
        self.generation += 1;
        tracing::info!("clipboard exposure cancelled");
        Ok(true)
    }

    /// Clears the clipboard regardless of whether this guard put anything on it.
    ///
    /// # Errors
    ///
    /// Returns the sink's error when clearing fails.
    pub fn clear_now(&mut self) -> Result<()> {
        if self.cancel()? {
            return Ok(());
        }
        self.sink.clear()
    }

    /// Changes the countdown length.
    ///
    /// An active exposure restarts with the new delay under a new generation,
    /// which is returned so the caller can schedule its first tick. Delays
    /// above [`MAX_CLEAR_DELAY`] are clamped.
    pub fn set_delay(&mut self, delay: Duration, now: Instant) -> Option<u64> {
        self.delay = clamp_delay(delay);
        let exposure = self.active.as_mut()?;
        self.generation += 1;
        exposure.generation = self.generation;
        exposure.deadline = now + self.delay;
        tracing::debug!(generation = self.generation, "clipboard countdown restarted");
        Some(self.generation)
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub const fn active(&self) -> Option<&ClipboardExposure> {
        self.active.as_ref()
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

fn clamp_delay(delay: Duration) -> Duration {
    if delay > MAX_CLEAR_DELAY {
        tracing::warn!(requested_secs = delay.as_secs(), "clipboard clear delay clamped to one day");
        return MAX_CLEAR_DELAY;
    }
    delay
}

impl std::fmt::Debug for ClipboardGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardGuard")
            .field("delay", &self.delay)
            .field("generation", &self.generation)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
