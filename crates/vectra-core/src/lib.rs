//! # Vectra Core
//!
//! Pure logic shared by the Vectra CLI and any embedding frontend:
//! connector schedule translation, pipeline-step trees, and the locale
//! tables used to label both.
//!
//! This crate performs no I/O and holds no global state. It contains no
//! tokio, filesystem, or configuration dependencies.

pub mod locale;
pub mod schedule;
pub mod steps;
