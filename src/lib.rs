//! TemplateSync - Transloadit Template Synchronization
//!
//! A tool for managing named template resources on the Transloadit service,
//! mirroring them against a local directory tree of JSON files. The sync
//! engine reconciles the tree with the remote collection: files without an
//! embedded id are created remotely (and tagged with the assigned id),
//! files whose content drifted are updated, and files pointing at vanished
//! templates are reported. Remote templates without a local counterpart are
//! never touched.

pub mod client;
pub mod commands;
pub mod error;
pub mod index;
pub mod output;
pub mod reconciler;
pub mod template;
pub mod walker;

pub use client::{HttpTemplateClient, ModifyRequest, RemoteTemplate, TemplateClient, TemplatePage};
pub use error::TemplateError;
pub use index::RemoteIndex;
pub use output::{BufferedOutput, NullOutput, OutputEvent, OutputSink};
pub use reconciler::{Reconciler, SyncReport};
pub use template::{TEMPLATE_ID_KEY, TemplateFile};
