//! ApplicationIntake: drives the seven application steps and submits the
//! packet in one shot.

use std::sync::Arc;

use super::form::IntakeForm;
use super::packet::IntakePacket;
use super::step::IntakeStep;
use super::timer::{CountdownTimer, TimerState};
use crate::api::BackendApi;
use crate::error::IntakeError;
use crate::model::ApplicationReceipt;
use crate::services::{Notice, Notifier, SessionService};

/// One application attempt. Owned by a single caller; `&mut self` on every
/// transition means at most one submission can be in flight.
pub struct ApplicationIntake {
    api: Arc<dyn BackendApi>,
    session: Arc<SessionService>,
    notifier: Notifier,
    current: IntakeStep,
    form: IntakeForm,
    timer: CountdownTimer,
    submitted: bool,
}

impl ApplicationIntake {
    pub fn new(api: Arc<dyn BackendApi>, session: Arc<SessionService>, notifier: Notifier) -> Self {
        Self {
            api,
            session,
            timer: CountdownTimer::new(notifier.clone()),
            notifier,
            current: IntakeStep::Contact,
            form: IntakeForm::default(),
            submitted: false,
        }
    }

    pub fn current_step(&self) -> IntakeStep {
        self.current
    }

    pub fn form(&self) -> &IntakeForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut IntakeForm {
        &mut self.form
    }

    pub fn timer(&self) -> TimerState {
        self.timer.state()
    }

    pub fn subscribe_timer(&self) -> tokio::sync::watch::Receiver<TimerState> {
        self.timer.subscribe()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Gate the current step and move forward. No-op on the final step.
    pub fn next(&mut self) -> Result<IntakeStep, IntakeError> {
        if self.submitted {
            return Err(IntakeError::AlreadySubmitted);
        }
        if let Err(e) = self.current.validate(&self.form) {
            self.notifier.notify(Notice::warning(e.to_string()));
            return Err(IntakeError::Invalid {
                step: self.current.number(),
                source: e,
            });
        }
        if let Some(next) = self.current.next() {
            self.move_to(next);
        }
        Ok(self.current)
    }

    /// Step back without validation. No-op on the first step.
    pub fn back(&mut self) -> IntakeStep {
        if !self.submitted {
            if let Some(prev) = self.current.prev() {
                self.move_to(prev);
            }
        }
        self.current
    }

    fn move_to(&mut self, step: IntakeStep) {
        if self.current.time_limit().is_some() {
            self.timer.cancel();
        }
        tracing::debug!(from = %self.current, to = %step, "Intake step changed");
        self.current = step;
        if let Some(limit) = step.time_limit() {
            self.timer.start(step.label(), limit);
        }
    }

    /// Validate everything and send the packet. On failure the form is kept
    /// intact so the user can retry.
    pub async fn submit(&mut self) -> Result<ApplicationReceipt, IntakeError> {
        if self.submitted {
            return Err(IntakeError::AlreadySubmitted);
        }
        if !self.current.is_final() {
            return Err(IntakeError::NotOnFinalStep(self.current.number()));
        }
        for step in IntakeStep::ALL {
            if let Err(e) = step.validate(&self.form) {
                self.notifier.notify(Notice::warning(e.to_string()));
                return Err(IntakeError::Invalid {
                    step: step.number(),
                    source: e,
                });
            }
        }

        let packet = IntakePacket::build(&self.form)?;
        match self.api.submit_application(packet).await {
            Ok(receipt) => {
                tracing::info!(application_id = ?receipt.id, "Application submitted");
                self.submitted = true;
                self.timer.cancel();
                self.form = IntakeForm::default();
                self.session.mark_application_pending().await;
                self.notifier.notify(Notice::success(
                    "Application submitted. We will review it shortly.",
                ));
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!("Application submission failed: {}", e);
                self.notifier.notify(Notice::error(e.user_message()));
                Err(IntakeError::SubmitFailed(e))
            }
        }
    }
}
