//! tm - Task Manager Library
//!
//! Short text notes ("tasks") kept per directory ("workspace"), with a global
//! registry of workspaces under `~/.tm`.
//!
//! # Core Concepts
//!
//! - **Workspaces**: directories holding `.tm/tasks.json`, registered globally
//! - **Id allocation**: task ids skip archived tasks, workspace ids never do
//! - **Cascade**: archiving a workspace hides its tasks, reactivating restores them
//! - **Compaction**: dense renumbering with a separate band for archived records
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `manager`: Lifecycle and id policy over both stores
//! - `ids`: Id allocation and compaction
//! - `cascade`: Workspace/task status transitions
//! - `search`: Case-insensitive matching with context snippets
//! - `tasks`: Per-workspace task store
//! - `registry`: Global workspace store
//! - `storage`: Paths, JSON helpers and the load/mutate/save transaction
//! - `atomic`: Atomic file replacement
//! - `config`: Configuration loading from `config.toml`
//! - `model`: Persisted records
//! - `output`: Human and JSON output
//! - `error`: Error types and result aliases

pub mod atomic;
pub mod cascade;
pub mod cli;
pub mod config;
pub mod error;
pub mod ids;
pub mod manager;
pub mod model;
pub mod output;
pub mod registry;
pub mod search;
pub mod storage;
pub mod tasks;

pub use error::{Error, Result};
