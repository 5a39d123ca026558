//! # compcat
//!
//! Cat image panel for compositing applications: fetch a random cat from the
//! cat API, preview it, and import it into the project as a read node.
//!
//! ## Design Philosophy
//!
//! compcat is designed to be:
//! - **Host-agnostic** - The window, node graph, project store and dialogs are
//!   traits the embedding application implements
//! - **Non-blocking** - Every network call and disk write runs on a worker pool;
//!   the UI thread only handles completions
//! - **Sensible defaults** - Works out of the box with zero configuration
//! - **Event-driven** - Consumers can subscribe to session events
//!
//! ## Quick Start
//!
//! ```no_run
//! use compcat::host::memory::{
//!     MemoryProjectStore, RecordingNodeGraph, RecordingView, ScriptedFileDialog,
//! };
//! use compcat::{CatSession, Config, HostBindings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let host = HostBindings::new(
//!         RecordingView::default(),
//!         RecordingNodeGraph::default(),
//!         MemoryProjectStore::default(),
//!         ScriptedFileDialog::default(),
//!     );
//!     let mut session =
//!         CatSession::new(Config::default(), host, tokio::runtime::Handle::current())?;
//!
//!     // Show the loading placeholder and fetch the first cat
//!     session.open();
//!     session.wait_idle().await;
//!
//!     // Save it and create a read node
//!     session.import_current_cat("/tmp/cat.jpg");
//!     session.wait_idle().await;
//!
//!     Ok(())
//! }
//! ```
//!
//! Hosts with their own event loop call [`CatSession::pump`] from it instead of
//! awaiting [`CatSession::wait_idle`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Cat API client
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Host application boundary
pub mod host;
/// Background task runner
pub mod runner;
/// Window session (decomposed into focused submodules)
pub mod session;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use client::CatApiClient;
pub use config::{Config, ProjectSettings};
pub use error::{Classify, Error, FailureKind, Result};
pub use host::{Button, FieldValue, FileDialog, HostBindings, NodeGraph, ProjectStore, View};
pub use runner::{Completion, TaskId, TaskKind, TaskRunner, TaskSlot};
pub use session::{CatSession, ConfigPanel};
pub use types::{CatItem, CatMetadata, Event, FetchRequest, MediaKind, RequestState};
