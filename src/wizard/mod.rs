//! Profile completion wizard.
//!
//! A resumable seven-step flow (photo → bio → specializations → education →
//! languages → subjects → review). Each step is validated and saved to the
//! backend on its own before the pointer moves, and reopening the wizard
//! resumes at the first step whose data is still missing.

pub mod fields;
pub mod manager;
pub mod step;

pub use fields::{Keyed, PhotoSource, WizardFields};
pub use manager::{AdvanceOutcome, ProfileWizard};
pub use step::{WizardStep, resume_step};
