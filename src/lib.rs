//! Writer onboarding client: profile completion wizard, application intake
//! and the profile completion guard, over the marketplace REST API.

pub mod api;
pub mod config;
pub mod error;
pub mod gate;
pub mod intake;
pub mod model;
pub mod services;
pub mod upload;
pub mod wizard;
