//! `feascheck-engine`: feasibility reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded tables, returns an annotated
//! result. No CLI or IO dependencies.
//!
//! Pipeline: header normalization → field cleaning → keyed join against a
//! de-duplicated master table under simple (existence) or advanced (status
//! lookup with tiered fallback) mode.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod summary;

pub use config::{CheckConfig, Mode};
pub use engine::{prepare_input, run};
pub use error::FeasError;
pub use model::{CheckResult, Table, Verdict};
