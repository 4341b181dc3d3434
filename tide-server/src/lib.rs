//! Tide station server.
//!
//! Answers "which tide station serves this place?" and remembers the
//! places people ask about, so the most recently used ones come back
//! first in autocomplete.

pub mod config;
pub mod domain;
pub mod locations;
pub mod outlook;
pub mod providers;
pub mod resolve;
pub mod stations;
pub mod web;
