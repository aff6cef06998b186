//! Client-side view of the server's rate-limit window.
//!
//! The gate closes when a response reports `x-ratelimit-remaining: 0` and reopens
//! only from a background reset task scheduled for the advertised reset instant.

use crate::error::{PfpError, Result};
use log::{debug, info, warn};
use reqwest::header::HeaderMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Window length assumed when the server omits `x-ratelimit-reset`.
pub const DEFAULT_RESET_MS: i64 = 5_000;

/// Wall clock in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Reset instant in epoch ms: the header's epoch seconds scaled to ms, or
/// `now + DEFAULT_RESET_MS` when the header is missing or not numeric.
/// A non-numeric value such as `"soon"` or `"12abc"` is treated as missing rather
/// than as an instant reset or a numeric prefix.
pub fn reset_deadline_ms(reset_header: Option<&str>, now_ms: i64) -> i64 {
    reset_header
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite())
        .map(|secs| (secs.trunc() as i64).saturating_mul(1000))
        .unwrap_or(now_ms + DEFAULT_RESET_MS)
}

#[derive(Debug, Default)]
struct GateState {
    limited: bool,
    reset_at_ms: i64,
    // Bumped on every new window; a reset task only reopens its own window.
    generation: u64,
    pending_reset: Option<JoinHandle<()>>,
}

impl Drop for GateState {
    fn drop(&mut self) {
        if let Some(handle) = self.pending_reset.take() {
            handle.abort();
        }
    }
}

fn lock(state: &Mutex<GateState>) -> MutexGuard<'_, GateState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Open/closed rate-limit state shared by all clones of one client.
#[derive(Debug, Clone)]
pub struct RateLimitGate {
    state: Arc<Mutex<GateState>>,
    clock: Arc<dyn Clock>,
}

impl Default for RateLimitGate {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitGate {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(GateState::default())),
            clock,
        }
    }

    pub fn is_limited(&self) -> bool {
        lock(&self.state).limited
    }

    /// Last observed reset instant (epoch ms); 0 until a window has been seen.
    pub fn reset_at_ms(&self) -> i64 {
        lock(&self.state).reset_at_ms
    }

    /// Fails fast while the gate is closed. Never reopens it.
    pub fn check(&self) -> Result<()> {
        let state = lock(&self.state);
        if state.limited {
            return Err(PfpError::RateLimited {
                reset_at_ms: state.reset_at_ms,
            });
        }
        Ok(())
    }

    /// Inspect response headers and close the gate if the quota is exhausted.
    /// Must run inside a Tokio runtime since it spawns the reset task.
    pub fn observe(&self, headers: &HeaderMap) {
        let remaining = headers.get(REMAINING_HEADER).and_then(|v| v.to_str().ok());
        if remaining != Some("0") {
            return;
        }
        let reset = headers.get(RESET_HEADER).and_then(|v| v.to_str().ok());
        let now_ms = self.clock.now_ms();
        let reset_at_ms = reset_deadline_ms(reset, now_ms);
        self.close_until(now_ms, reset_at_ms);
    }

    fn close_until(&self, now_ms: i64, reset_at_ms: i64) {
        let mut state = lock(&self.state);
        state.limited = true;
        state.reset_at_ms = reset_at_ms;
        state.generation = state.generation.wrapping_add(1);
        if let Some(previous) = state.pending_reset.take() {
            debug!("rate limit: cancelling previous reset task");
            previous.abort();
        }

        let delay = Duration::from_millis(reset_at_ms.saturating_sub(now_ms).max(0) as u64);
        warn!(
            "rate limit reached; requests blocked until {} ({:?} from now)",
            reset_at_ms, delay
        );
        let generation = state.generation;
        let weak = Arc::downgrade(&self.state);
        state.pending_reset = Some(tokio::spawn(reopen_after(weak, generation, delay)));
    }
}

async fn reopen_after(state: Weak<Mutex<GateState>>, generation: u64, delay: Duration) {
    tokio::time::sleep(delay).await;
    let Some(state) = state.upgrade() else {
        return;
    };
    let mut state = lock(&state);
    if state.generation == generation {
        state.limited = false;
        // Detaches our own handle; the task is finishing anyway.
        state.pending_reset = None;
        info!("rate limit window over; requests allowed again");
    }
}
