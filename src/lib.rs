//! Mood-based trip planning: a guided five-question conversation that
//! yields a [`guide::TravelPlan`], decorated with generated prose, travel
//! videos, and translations.

pub mod banner;
pub mod commands;
pub mod config;
pub mod consts;
pub mod enrich;
pub mod guide;
pub mod keys;
pub mod language;
pub mod prompts;
pub mod repl;
pub mod server;
pub mod session;
pub mod spinner;
