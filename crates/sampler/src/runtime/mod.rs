//! Runtime module — process lifecycle: boot, serve.

pub mod boot;
pub mod serve;
