//! ProfileWizard: owns the step pointer and saves each step before moving on.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use super::fields::WizardFields;
use super::step::{WizardStep, resume_step};
use crate::api::ProfileUpdate;
use crate::error::WizardError;
use crate::model::CompletionStatus;
use crate::services::{Notice, Notifier, ProfileService};

/// Result of a navigation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The pointer moved to this step.
    Moved(WizardStep),
    /// Nothing to move to; the pointer stays here.
    Stayed(WizardStep),
    /// The wizard was closed while the save was in flight. The response was dropped.
    Discarded,
}

#[derive(Debug)]
struct WizardState {
    current: WizardStep,
    completed: BTreeSet<WizardStep>,
    fields: WizardFields,
    /// Last JSON payload known to be persisted, per step.
    persisted: HashMap<WizardStep, serde_json::Value>,
}

/// Releases the step-submitting latch when dropped.
struct LatchGuard<'a>(&'a AtomicBool);

impl<'a> LatchGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LatchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

enum SaveResult {
    Saved,
    Unchanged,
    Discarded,
}

/// Resumable, server-synchronized profile completion wizard.
pub struct ProfileWizard {
    profiles: Arc<ProfileService>,
    notifier: Notifier,
    state: RwLock<WizardState>,
    submitting: AtomicBool,
    closed: Arc<AtomicBool>,
}

impl ProfileWizard {
    /// Open the wizard: fetch the profile, hydrate the fields, and resume at
    /// the first incomplete step.
    pub async fn open(
        profiles: Arc<ProfileService>,
        notifier: Notifier,
    ) -> Result<Arc<Self>, WizardError> {
        let profile = match profiles.refresh().await {
            Ok(p) => p,
            Err(e) => {
                notifier.notify(Notice::error(e.user_message()));
                return Err(WizardError::LoadFailed(e));
            }
        };

        let fields = WizardFields::from_profile(&profile);
        let current = resume_step(&fields);

        let completed: BTreeSet<WizardStep> = WizardStep::ALL
            .iter()
            .copied()
            .filter(|s| *s < current)
            .collect();

        // Everything hydrated from the server is the persisted baseline, gaps
        // included, so steps after the resume point are not re-saved.
        let persisted = WizardStep::ALL
            .iter()
            .copied()
            .filter(|s| s.validate(&fields).is_ok())
            .filter_map(|s| match s.payload(&fields) {
                Some(ProfileUpdate::Fields(body)) => Some((s, body)),
                _ => None,
            })
            .collect();

        tracing::info!(step = %current, "Profile wizard opened");

        Ok(Arc::new(Self {
            profiles,
            notifier,
            state: RwLock::new(WizardState {
                current,
                completed,
                fields,
                persisted,
            }),
            submitting: AtomicBool::new(false),
            closed: Arc::new(AtomicBool::new(false)),
        }))
    }

    pub async fn current_step(&self) -> WizardStep {
        self.state.read().await.current
    }

    pub async fn completed_steps(&self) -> BTreeSet<WizardStep> {
        self.state.read().await.completed.clone()
    }

    pub async fn fields(&self) -> WizardFields {
        self.state.read().await.fields.clone()
    }

    /// Mutate the field values.
    pub async fn edit<R>(&self, f: impl FnOnce(&mut WizardFields) -> R) -> R {
        let mut state = self.state.write().await;
        f(&mut state.fields)
    }

    /// Whether a step save is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Close without finishing. An in-flight save still completes on the
    /// backend but its response is ignored.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        tracing::debug!("Profile wizard closed");
    }

    /// Validate and save the current step, then move to the next one.
    pub async fn advance(&self) -> Result<AdvanceOutcome, WizardError> {
        let _latch = LatchGuard::acquire(&self.submitting).ok_or(WizardError::StepSubmitting)?;
        let from = self.state.read().await.current;

        match self.save_step(from).await? {
            SaveResult::Discarded => return Ok(AdvanceOutcome::Discarded),
            SaveResult::Saved | SaveResult::Unchanged => {}
        }

        let mut state = self.state.write().await;
        if state.current != from {
            return Ok(AdvanceOutcome::Stayed(state.current));
        }
        match from.next() {
            Some(next) => {
                state.current = next;
                tracing::info!(from = %from, to = %next, "Wizard advanced");
                Ok(AdvanceOutcome::Moved(next))
            }
            None => Ok(AdvanceOutcome::Stayed(from)),
        }
    }

    /// Step back without validating or saving. No-op on the first step and
    /// on review.
    pub async fn retreat(&self) -> WizardStep {
        let mut state = self.state.write().await;
        if state.current.is_terminal() {
            return state.current;
        }
        if let Some(prev) = state.current.prev() {
            state.current = prev;
        }
        state.current
    }

    /// Jump to any step. The step being left is validated and saved first.
    pub async fn jump_to(&self, target: WizardStep) -> Result<AdvanceOutcome, WizardError> {
        let _latch = LatchGuard::acquire(&self.submitting).ok_or(WizardError::StepSubmitting)?;
        let from = self.state.read().await.current;
        if from == target {
            return Ok(AdvanceOutcome::Stayed(from));
        }

        match self.save_step(from).await? {
            SaveResult::Discarded => return Ok(AdvanceOutcome::Discarded),
            SaveResult::Saved | SaveResult::Unchanged => {}
        }

        let mut state = self.state.write().await;
        state.current = target;
        tracing::info!(from = %from, to = %target, "Wizard jumped");
        Ok(AdvanceOutcome::Moved(target))
    }

    /// Close the wizard from the review step and refresh completion status
    /// so gates see the result. Nothing is saved here.
    pub async fn finish(&self) -> Result<CompletionStatus, WizardError> {
        let current = self.state.read().await.current;
        if !current.is_terminal() {
            return Err(WizardError::NotOnReview(current));
        }
        self.close();

        match self.profiles.refresh().await {
            Ok(profile) => {
                let status = profile.completion();
                if status.is_complete {
                    self.notifier.notify(Notice::success("Your profile is complete"));
                }
                tracing::info!(is_complete = status.is_complete, "Profile wizard finished");
                Ok(status)
            }
            Err(e) => {
                self.notifier.notify(Notice::error(e.user_message()));
                Err(WizardError::LoadFailed(e))
            }
        }
    }

    async fn save_step(&self, step: WizardStep) -> Result<SaveResult, WizardError> {
        if self.is_closed() {
            return Err(WizardError::Closed);
        }

        let payload = {
            let state = self.state.read().await;
            if let Err(e) = step.validate(&state.fields) {
                self.notifier.notify(Notice::warning(e.to_string()));
                return Err(WizardError::Invalid { step, source: e });
            }
            match step.payload(&state.fields) {
                Some(ProfileUpdate::Fields(body))
                    if state.persisted.get(&step) == Some(&body) =>
                {
                    None
                }
                other => other,
            }
        };

        let Some(payload) = payload else {
            tracing::debug!(step = %step, "Step unchanged, skipping save");
            self.state.write().await.completed.insert(step);
            return Ok(SaveResult::Unchanged);
        };

        let snapshot = match &payload {
            ProfileUpdate::Fields(body) => Some(body.clone()),
            ProfileUpdate::Photo(_) => None,
        };

        let closed = Arc::clone(&self.closed);
        let result = self.profiles.api().update_profile(payload).await;

        if closed.load(Ordering::Acquire) {
            tracing::warn!(step = %step, "Wizard closed during save, discarding response");
            return Ok(SaveResult::Discarded);
        }

        match result {
            Ok(profile) => {
                self.profiles.apply(profile);
                let mut state = self.state.write().await;
                if let Some(body) = snapshot {
                    state.persisted.insert(step, body);
                }
                state.completed.insert(step);
                tracing::info!(step = %step, "Step saved");
                Ok(SaveResult::Saved)
            }
            Err(e) => {
                self.notifier.notify(Notice::error(e.user_message()));
                Err(WizardError::SaveFailed { step, source: e })
            }
        }
    }
}
