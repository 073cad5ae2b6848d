//! # Payload Generator
//!
//! Turns a [`cyberrange_types::TechniqueDescriptor`] into a batch of
//! [`cyberrange_types::AttackPayload`]s: malicious payloads drawn from the
//! technique's hand-authored templates (falling back to a generic
//! tactic-driven phrase bank when a technique has none), interleaved with a
//! small ratio of benign controls so the scorer has true-negative material
//! to measure against.
//!
//! Sampling is driven by a single seeded RNG per generator instance, so a
//! fixed seed reproduces an identical payload sequence across runs.

mod benign;
mod generator;
mod phrasebank;

pub use generator::PayloadGenerator;
