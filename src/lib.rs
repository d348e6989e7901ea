// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod art;
pub mod config;
pub mod dataset;
pub mod glossary;
pub mod naming;
pub mod runtime;
pub mod session;
pub mod shuffle;

/// Runtime tick interval driving timers and the deferred auto-advance.
pub const TICK_RATE_MS: u64 = 100;
