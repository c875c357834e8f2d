//! # Armory CLI Architecture
//!
//! Armory ships with a CLI client, but the binary is intentionally thin: the CLI lives in
//! `src/cli/`, while this file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/armoryapp/`: Core library with UI-agnostic synchronization logic
//! - `crates/armory/`: This CLI tool, depends on the `armoryapp` library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/armory/src/cli/)                         │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring, runtime, dispatch (commands.rs)          │
//! │  - Terminal rendering with console styles (render.rs)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/armoryapp/src/api.rs)                    │
//! │  - AttachmentSynchronizer facade                            │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (crates/armoryapp/src/commands/*)            │
//! │  - Synchronization logic over the host collaborators        │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The library is async over a single-threaded host, so the CLI drives it on a tokio
//! current-thread runtime.
//!
//! ## Testing Approach
//!
//! - **Commands layer**: heavy unit testing in `crates/armoryapp/src/commands/`.
//! - **CLI layer**: rendering is tested with canned values in `render.rs`; the binary is
//!   exercised end to end in `tests/cli_e2e.rs` over a temporary data directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
