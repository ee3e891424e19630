#![doc = include_str!("../README.md")]

//! Game model for the coffee-can reachability checker.
//!
//! This crate defines bean kinds, configurations, the ordered move rules
//! and the witness trace type shared by the encoder and the engine.

pub mod game;
pub mod trace;
