//! Library half of the `charsync-worker` binary: configuration and the
//! wiring of one sync run.

pub mod config;
pub mod run;
