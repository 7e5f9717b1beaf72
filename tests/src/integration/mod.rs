//! Cross-crate integration flows.
//!
//! Each test wires the in-memory POS backend, the shared bus and one or more
//! reconciliation services on a paused Tokio clock.

pub mod flows;
pub mod multi_screen;

#[cfg(test)]
pub(crate) mod harness;
