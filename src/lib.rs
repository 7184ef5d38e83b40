//! notiview
//!
//! Row engine for a virtualized notification list: predicts row heights
//! before rendering, recycles row templates across items, and binds each
//! item's live state into a recycled row without leaking listeners or
//! visual state between items.
//!
//! The terminal front-end in [`view`] hosts the engine in a ratatui list.

pub mod config;
pub mod list;
pub mod logging;
pub mod model;
pub mod render;
pub mod row;
pub mod services;
pub mod source;
pub mod view;

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;
