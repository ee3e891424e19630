#![doc = include_str!("../README.md")]

//! Coffee-can decision engine.
//!
//! This crate orchestrates the pipeline: argument validation, encoding,
//! a single solver call, witness extraction and result reporting.

pub mod counterexample;
pub mod pipeline;
pub mod result;
