//! Finite automata simulators and a pattern compiler built on them
//!
//! Automata come in two layers: immutable *designs* ([`nfa::NfaDesign`],
//! [`dfa::DfaDesign`]) that can be shared freely, including across threads,
//! and single-owner runtimes ([`nfa::Nfa`], [`dfa::Dfa`]) minted from them
//! that track the current state while input is read.
//!
//! [`pattern::Pattern`] compiles regular expressions to NFA designs by
//! Thompson construction.

#![deny(
    clippy::disallowed_methods,
    clippy::suspicious,
    clippy::style,
    clippy::clone_on_ref_ptr,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

mod closure_builder;
pub mod dfa;
pub mod dot;
pub mod nfa;
pub mod pattern;
pub mod rule;
pub mod state;
