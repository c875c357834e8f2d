//! # Armory Architecture
//!
//! Armory is a **UI-agnostic attachment synchronization library**. Items that can hold
//! other items (armor, weapons) pass the effects of whatever is attached to them on to the
//! actor that owns them, but only while equipped. Armory keeps that derived state in step
//! with the attachment relation.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client (the armory CLI, or any embedding host)             │
//! │  - Parses input, formats output, owns the terminal          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - AttachmentSynchronizer: thin facade over commands        │
//! │  - Holds the explicit TagConfig / ContextConfig             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - attach, detach, equip, context, doctor                   │
//! │  - The only code that mutates the attachment relation       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Host collaborator traits (resolve, effects, carriers)    │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust values, returns `Result<CmdResult>` and never
//! writes to stdout or stderr. Diagnostics go through `tracing`; installing a subscriber
//! is the client's business.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): Thorough async unit tests against
//!    [`store::memory::InMemoryStore`]. Most of the testing lives here.
//! 2. **API** (`api.rs`): Dispatch and wiring.
//! 3. **Invariant** (`tests/`): Property test over random operation sequences.
//! 4. **CLI**: End-to-end runs of the binary over a temporary data directory.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Synchronization logic for each operation
//! - [`store`]: Host collaborator traits and implementations
//! - [`model`]: Core data types (`Carrier`, `Attachments`, `Item`, effects)
//! - [`provenance`]: Provenance tags linking derived effects to their source
//! - [`config`]: Configuration management
//! - [`init`]: Data directory resolution and context setup
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod provenance;
pub mod store;
