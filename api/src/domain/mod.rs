//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Domain models representing core business concepts
//! - `rules`: Subscription, finance, permission and upload rules
//! - `ports`: Trait definitions for external dependencies

pub mod entities;
pub mod ports;
pub mod rules;
