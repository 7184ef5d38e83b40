//! Internal test modules - whitebox scenarios with crate access
//!
//! Each file walks one behaviour of the row engine end to end through the
//! test harness: bind, poke the template the way a user would, drive the
//! executor, then check what the row and the item ended up as.

mod acceptance_heights;
mod acceptance_progress;
mod acceptance_rebind;
