//! Client-side core of the A2UI agent-to-UI protocol.
//!
//! An agent streams A2UI messages that build up one or more *surfaces*: a
//! registry of components, a root component, and a hierarchical data model
//! that component properties bind into. This crate applies those messages
//! and resolves a surface into a tree of presentation-ready nodes:
//!
//! ```text
//! parse_stream(text) → [A2uiMessage] → MessageProcessor::process_message → Surface
//!                                                           render(surface) → RenderNode
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use a2ui::{MessageProcessor, NodeKind};
//!
//! let log = r#"[
//!   {"beginRendering": {"surfaceId": "s1", "root": "greeting"}},
//!   {"surfaceUpdate": {"surfaceId": "s1", "components": [
//!       {"id": "greeting", "component": {"Text": {"text": {"path": "user/name"}}}}
//!   ]}},
//!   {"dataModelUpdate": {"surfaceId": "s1", "contents": [
//!       {"key": "user.name", "valueString": "Ada"}
//!   ]}}
//! ]"#;
//!
//! let mut processor = MessageProcessor::new();
//! let outcome = processor.process_stream(log).expect("valid message log");
//! assert!(outcome.diagnostics.is_empty());
//!
//! let tree = processor.render("s1").expect("surface has a root");
//! match tree.kind {
//!     NodeKind::Text { text, .. } => assert_eq!(text, "Ada"),
//!     other => panic!("unexpected node {:?}", other),
//! }
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | yes     | The `a2ui-render` binary (`clap`, `anyhow`, `tracing-subscriber`). |

pub mod chart;
pub mod config;
pub mod data_model;
pub mod enums;
pub mod error;
pub mod map;
pub mod message;
pub mod path;
pub mod processor;
pub mod render;
pub mod serialize;
pub mod surface;
pub mod types;
pub mod value;

pub use error::*;
pub use types::*;

pub use config::Config;
pub use data_model::{DataModel, DataNode};
pub use message::{
    A2uiMessage, DecodedMessage, decode_message, extract_messages, is_a2ui_message, parse_message,
    parse_stream,
};
pub use processor::{MessageProcessor, ProcessOutcome};
pub use render::{NodeKind, RenderNode, render, render_with};
pub use surface::{Surface, SurfaceSnapshot};
pub use value::PropertyValue;

/// Result of the [`load`] convenience entry point.
pub struct LoadResult {
    /// Processor holding every surface the log built.
    pub processor: MessageProcessor,
    /// Non-fatal problems met while applying the log.
    pub diagnostics: Vec<Diagnostic>,
}

/// Convenience entry point: decodes a message log (JSON array or JSON
/// Lines) and applies it to a fresh processor built from `config`.
///
/// # Errors
///
/// Returns the parse error when the log is not JSON; nothing is applied in
/// that case. Malformed messages inside valid JSON are reported in
/// [`LoadResult::diagnostics`] and the rest of the log is applied.
///
/// # Example
///
/// ```rust
/// let log = r#"[
///   {"beginRendering": {"surfaceId": "main", "root": "d"}},
///   {"surfaceUpdate": {"surfaceId": "main", "components": [
///       {"id": "d", "component": {"Divider": {}}}
///   ]}}
/// ]"#;
///
/// let result = a2ui::load(log, a2ui::Config::default()).expect("valid log");
/// assert!(result.processor.get_surfaces().contains("main"));
/// ```
pub fn load(input: &str, config: Config) -> Result<LoadResult, ParseError> {
    let mut processor = MessageProcessor::with_config(config);
    let outcome = processor.process_stream(input)?;
    Ok(LoadResult {
        processor,
        diagnostics: outcome.diagnostics,
    })
}
