//! Domain layer: pure types and logic, no I/O.

pub mod chat;
pub mod foundation;
pub mod matching;
pub mod profile;
