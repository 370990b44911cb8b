//! Soft-deadline countdown for the timed application steps.
//!
//! The countdown ticks once per second on a spawned task. Reaching zero
//! deactivates it and emits one advisory notice; it never moves the user or
//! blocks anything. Cancelling aborts the task, so a timer left behind by one
//! step can never touch the state of another.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::services::{Notice, Notifier};

const TICK: Duration = Duration::from_secs(1);

/// Snapshot of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerState {
    pub seconds_remaining: Option<u32>,
    pub active: bool,
}

impl TimerState {
    /// `mm:ss`, or `--:--` when no countdown is running.
    pub fn display(&self) -> String {
        match self.seconds_remaining {
            Some(s) => format!("{:02}:{:02}", s / 60, s % 60),
            None => "--:--".to_string(),
        }
    }
}

pub struct CountdownTimer {
    state: Arc<watch::Sender<TimerState>>,
    generation: Arc<AtomicU64>,
    task: Mutex<Option<JoinHandle<()>>>,
    notifier: Notifier,
}

impl CountdownTimer {
    pub fn new(notifier: Notifier) -> Self {
        let (tx, _rx) = watch::channel(TimerState::default());
        Self {
            state: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            task: Mutex::new(None),
            notifier,
        }
    }

    pub fn state(&self) -> TimerState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.state.subscribe()
    }

    /// Start (or restart) at the full `duration`. Must run inside a tokio runtime.
    pub fn start(&self, label: &'static str, duration: Duration) {
        self.abort_task();

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let total = u32::try_from(duration.as_secs()).unwrap_or(u32::MAX);
        self.state.send_replace(TimerState {
            seconds_remaining: Some(total),
            active: total > 0,
        });
        tracing::debug!(label, seconds = total, "Countdown started");

        let state = Arc::clone(&self.state);
        let current_generation = Arc::clone(&self.generation);
        let notifier = self.notifier.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + TICK, TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let mut expired = false;
                let mut stale = false;
                state.send_modify(|s| {
                    if current_generation.load(Ordering::Acquire) != generation {
                        stale = true;
                        return;
                    }
                    if let Some(remaining) = s.seconds_remaining.as_mut() {
                        *remaining = remaining.saturating_sub(1);
                        if *remaining == 0 {
                            s.active = false;
                            expired = true;
                        }
                    }
                });
                if stale {
                    break;
                }
                if expired {
                    tracing::info!(label, "Countdown expired");
                    notifier.notify(Notice::warning(format!(
                        "Time is up for the {label}. You can still continue."
                    )));
                    break;
                }
            }
        });

        match self.task.lock() {
            Ok(mut guard) => *guard = Some(handle),
            Err(poisoned) => *poisoned.into_inner() = Some(handle),
        }
    }

    /// Stop the countdown and clear its value.
    pub fn cancel(&self) {
        self.abort_task();
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.state.send_replace(TimerState::default());
    }

    fn abort_task(&self) {
        let handle = match self.task.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.abort_task();
    }
}
