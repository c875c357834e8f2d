//! # CLI Behavior
//!
//! This is **one possible UI client** for armory, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes and output formatting.
//!
//! ## Commands
//!
//! - `armory attach <carrier> <item>`: link an item; applies its effects if the carrier is equipped
//! - `armory detach <carrier> <item>`: unlink an item and remove its effects
//! - `armory equip <carrier>` / `armory unequip <carrier>`: toggle the equipped flag
//! - `armory list <carrier>`: show what is attached
//! - `armory effects <actor>`: show the actor's effects and where they came from
//! - `armory doctor <carrier>`: repair drift between attachments and effects
//!
//! ## Global Options
//!
//! - `--data <DIR>`: world directory (else `ARMORY_DATA`, else the OS data directory)
//! - `-v`: debug logging to stderr (`ARMORY_LOG` takes precedence when set)
//!
//! A duplicate attachment is printed as a warning and still exits with status 0; every
//! other error exits with status 1.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup, runtime, dispatch to the API
//! - `render`: Output formatting
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styling

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
