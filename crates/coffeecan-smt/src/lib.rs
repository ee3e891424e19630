#![doc = include_str!("../README.md")]

//! SMT encoding and solver integration for the coffee-can game.
//!
//! This crate encodes a bounded run of the game as one propositional
//! formula over count propositions and checks it with a pluggable Z3 or
//! cvc5 backend.

pub mod backends;
pub mod bmc;
pub mod encoder;
pub mod solver;
pub mod sorts;
pub mod terms;
