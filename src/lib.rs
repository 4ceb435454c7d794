//! Voiceline - Turn-Based Voice Agent
//!
//! This crate implements a stateless-turn dialogue engine that books
//! restaurant reservations and collects after-hours financial callback
//! details, one spoken utterance at a time.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
