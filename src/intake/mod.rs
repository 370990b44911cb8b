//! Writer application intake.
//!
//! Seven steps (contact, proficiency exam, writing prompt, essay, work
//! samples, CV, certificates) held in memory and sent as one multipart
//! packet on the final step. The prompt and essay steps carry soft
//! countdowns.

pub mod catalogue;
pub mod flow;
pub mod form;
pub mod packet;
pub mod step;
pub mod timer;

pub use flow::ApplicationIntake;
pub use form::{ContactInfo, IntakeForm, word_count};
pub use packet::{IntakePacket, PacketFile};
pub use step::IntakeStep;
pub use timer::{CountdownTimer, TimerState};
