//! Wiring of the sync engine into the live page.

pub mod browser;
pub mod listeners;
