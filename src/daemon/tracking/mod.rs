//! The session accumulation core: domain normalization, website
//! classification, activity gating and the event loop tying them together.

pub mod activity;
pub mod classify;
pub mod domain;
pub mod state;
pub mod tracker;
