// src/core/mod.rs
//! The fingerspelling text core: the tile catalog, syllable decomposition,
//! composition and grouping, and the tap state of one session.

pub mod catalog;
pub mod composer;
pub mod decomposer;
pub mod session;
pub mod types;
