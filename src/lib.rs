//! Spottr Engine - Compatibility & Pairing Engine
//!
//! This crate implements the matching core of the Spottr gym-partner app:
//! multi-factor compatibility scoring, the accept/reject decision ledger,
//! race-safe mutual-match pairing, and realtime fan-out for pairing events
//! and chat.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
