//! Command line tooling for Insomniac Games' PC port assets.

pub mod commands;
