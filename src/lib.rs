//! theme-sync - keep one color palette synchronized across desktop
//! tools and editor configurations.
//!
//! A sync run derives a semantic token set from a source palette
//! (branded literal or wallpaper-extracted cache) and propagates it
//! into every installed target, isolating failures per target.

#![recursion_limit = "512"]

pub mod color;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod palette;
pub mod process;
pub mod targets;
pub mod tokens;
