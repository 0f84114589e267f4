//! Core data types for pakt.
//!
//! This crate defines everything the resolver consumes or produces that is
//! not solving logic itself: the package catalog and its loaders, channel
//! priority ordering, the global configuration, environment files and
//! lockfiles.
//!
//! This crate does no network I/O.

pub mod catalog;
pub mod channel;
pub mod config;
pub mod environment;
pub mod lockfile;
