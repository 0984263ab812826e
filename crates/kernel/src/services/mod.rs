//! Shared kernel services.

pub mod locale;
