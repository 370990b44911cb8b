//! Injected services, each owning exactly one slice of client state.

pub mod notify;
pub mod profile;
pub mod session;

pub use notify::{Notice, NoticeLevel, Notifier};
pub use profile::{ProfileService, ProfileState};
pub use session::{CachedSession, SessionService, TokenStore};
