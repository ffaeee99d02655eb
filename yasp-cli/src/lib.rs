//! yasp CLI: nested word and phoneme timing JSON from a speech decode.

pub mod cli;
pub mod config;
pub mod logging;
pub mod run;
