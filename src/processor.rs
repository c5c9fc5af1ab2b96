//! The surface registry and the message state machine that drives it.
//!
//! Surfaces are held behind `Arc` and written copy-on-write, so a
//! [`SurfaceSnapshot`] handed out by [`MessageProcessor::get_surfaces`] is
//! never torn by later messages. Every message that changes state bumps the
//! registry version.

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{Config, ProcessorConfig};
use crate::data_model::DataNode;
use crate::enums::EntryPolicy;
use crate::error::{Diagnostic, ParseError};
use crate::message::{
    A2uiMessage, BeginRendering, DataEntry, DataModelUpdate, SurfaceRef, SurfaceUpdate,
    data_parts, decode_message, parse_json, split_stream,
};
use crate::path;
use crate::render::{RenderNode, render_with};
use crate::surface::{Surface, SurfaceSnapshot};

/// What applying one or more messages did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessOutcome {
    /// Registry version after the last applied message.
    pub version: u64,
    /// Number of messages applied.
    pub applied: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl ProcessOutcome {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    fn absorb(&mut self, other: ProcessOutcome) {
        self.version = other.version;
        self.applied += other.applied;
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Owns the surfaces of one conversation and applies protocol messages to
/// them, one at a time.
#[derive(Debug, Default)]
pub struct MessageProcessor {
    config: Config,
    surfaces: BTreeMap<String, Arc<Surface>>,
    version: u64,
}

impl MessageProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current registry version. Starts at 0.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Applies every field present in `message`, in the order
    /// begin-rendering, surface-update, data-model-update, end-rendering,
    /// delete-surface.
    ///
    /// Never fails: unusable parts are dropped and reported as diagnostics.
    pub fn process_message(&mut self, message: &A2uiMessage) -> ProcessOutcome {
        let mut diagnostics = Vec::new();
        let mut changed = false;

        if message.is_empty() {
            tracing::warn!("message carries no recognized field");
            diagnostics.push(Diagnostic::warning(
                "M-003",
                "message carries no recognized field",
            ));
        }
        if let Some(part) = &message.begin_rendering {
            changed |= self.begin_rendering(part, &mut diagnostics);
        }
        if let Some(part) = &message.surface_update {
            changed |= self.surface_update(part, &mut diagnostics);
        }
        if let Some(part) = &message.data_model_update {
            changed |= self.data_model_update(part, &mut diagnostics);
        }
        if let Some(part) = &message.end_rendering {
            changed |= self.end_rendering(part, &mut diagnostics);
        }
        if let Some(part) = &message.delete_surface {
            changed |= self.delete_surface(part, &mut diagnostics);
        }

        if changed {
            self.version += 1;
        }
        ProcessOutcome {
            version: self.version,
            applied: 1,
            diagnostics,
        }
    }

    /// Decodes one message from a JSON value and applies it. Entries that do
    /// not decode are reported ahead of the diagnostics from applying the
    /// rest.
    pub fn process_value(&mut self, value: &Value) -> ProcessOutcome {
        let decoded = decode_message(value);
        let mut outcome = self.process_message(&decoded.message);
        let mut diagnostics = decoded.diagnostics;
        diagnostics.append(&mut outcome.diagnostics);
        outcome.diagnostics = diagnostics;
        outcome
    }

    /// Decodes one JSON message and applies it. Fails only when `input` is
    /// not JSON.
    pub fn process_json(&mut self, input: &str) -> Result<ProcessOutcome, ParseError> {
        let value = parse_json(input)?;
        Ok(self.process_value(&value))
    }

    /// Applies a JSON array or JSON Lines message log in order.
    ///
    /// Fails, applying nothing, only when the log is not JSON. A malformed
    /// message is a no-op with diagnostics; the messages around it are
    /// still applied.
    pub fn process_stream(&mut self, input: &str) -> Result<ProcessOutcome, ParseError> {
        let items = split_stream(input)?;
        Ok(self.process_values(&items))
    }

    /// Applies the A2UI messages found in A2A message parts.
    pub fn process_parts(&mut self, parts: &[Value]) -> ProcessOutcome {
        self.process_values(data_parts(parts))
    }

    fn process_values<'a, I>(&mut self, values: I) -> ProcessOutcome
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut outcome = ProcessOutcome {
            version: self.version,
            ..ProcessOutcome::default()
        };
        for value in values {
            outcome.absorb(self.process_value(value));
        }
        outcome
    }

    /// Applies messages in order until `cancel` is raised.
    ///
    /// The flag is checked before each message. Messages already applied
    /// stay applied.
    pub fn process_all<'a, I>(&mut self, messages: I, cancel: &AtomicBool) -> ProcessOutcome
    where
        I: IntoIterator<Item = &'a A2uiMessage>,
    {
        let mut outcome = ProcessOutcome {
            version: self.version,
            ..ProcessOutcome::default()
        };
        for message in messages {
            if cancel.load(Ordering::Acquire) {
                tracing::debug!(applied = outcome.applied, "message delivery cancelled");
                break;
            }
            outcome.absorb(self.process_message(message));
        }
        outcome
    }

    /// A consistent view of every surface at the current version.
    pub fn get_surfaces(&self) -> SurfaceSnapshot {
        SurfaceSnapshot::new(self.version, self.surfaces.clone())
    }

    pub fn get_surface(&self, surface_id: &str) -> Option<Arc<Surface>> {
        self.surfaces.get(surface_id).cloned()
    }

    /// Removes every surface.
    pub fn clear_surfaces(&mut self) {
        if !self.surfaces.is_empty() {
            tracing::debug!(count = self.surfaces.len(), "clearing surfaces");
            self.surfaces.clear();
            self.version += 1;
        }
    }

    /// Renders a surface with this processor's render settings. Unknown
    /// surfaces and surfaces without a root render nothing.
    pub fn render(&self, surface_id: &str) -> Option<RenderNode> {
        let surface = self.surfaces.get(surface_id)?;
        render_with(surface, &self.config.render)
    }

    // ─── Message parts ──────────────────────────────────────────────────────

    fn begin_rendering(&mut self, part: &BeginRendering, diags: &mut Vec<Diagnostic>) -> bool {
        let Some(id) = usable_surface_id(part.surface_id.as_deref(), "beginRendering", diags)
        else {
            return false;
        };
        if part.root.is_none() {
            tracing::warn!(surface_id = id, "beginRendering without root");
            diags.push(
                Diagnostic::warning("M-002", "beginRendering has no root; root cleared")
                    .on_surface(id),
            );
        }
        let surface = self.surface_mut(id);
        surface.root_component_id = part.root.clone();
        surface.styles = part.styles.clone().unwrap_or_default();
        surface.rendering_complete = false;
        true
    }

    fn surface_update(&mut self, part: &SurfaceUpdate, diags: &mut Vec<Diagnostic>) -> bool {
        let Some(id) = usable_surface_id(part.surface_id.as_deref(), "surfaceUpdate", diags) else {
            return false;
        };
        let surface = self.surface_mut(id);
        for entry in &part.components {
            surface.components.insert(entry.id.clone(), entry.clone());
        }
        tracing::debug!(
            surface_id = id,
            count = part.components.len(),
            "components updated"
        );
        true
    }

    fn data_model_update(&mut self, part: &DataModelUpdate, diags: &mut Vec<Diagnostic>) -> bool {
        let Some(id) = usable_surface_id(part.surface_id.as_deref(), "dataModelUpdate", diags)
        else {
            return false;
        };
        let ProcessorConfig {
            entry_policy,
            write,
        } = self.config.processor;
        let base = part
            .path
            .as_deref()
            .filter(|p| !path::parse_segments(p).is_empty());

        let surface = self.surface_mut(id);
        for entry in &part.contents {
            let Some(value) = entry_value(entry, entry_policy, id, diags) else {
                continue;
            };
            let target = match base {
                Some(base) => path::normalize(&entry.key, base),
                None => entry.key.clone(),
            };
            if let Err(e) = surface.data_model.set_with(&target, value, &write) {
                tracing::warn!(surface_id = id, path = %target, error = %e, "data write rejected");
                diags.push(
                    Diagnostic::error("D-003", e.to_string())
                        .on_surface(id)
                        .at_path(&target),
                );
            }
        }
        true
    }

    fn end_rendering(&mut self, part: &SurfaceRef, diags: &mut Vec<Diagnostic>) -> bool {
        let Some(id) = usable_surface_id(part.surface_id.as_deref(), "endRendering", diags) else {
            return false;
        };
        match self.surfaces.get_mut(id) {
            Some(surface) => {
                Arc::make_mut(surface).rendering_complete = true;
                true
            }
            None => {
                tracing::debug!(surface_id = id, "endRendering for unknown surface ignored");
                false
            }
        }
    }

    fn delete_surface(&mut self, part: &SurfaceRef, diags: &mut Vec<Diagnostic>) -> bool {
        let Some(id) = usable_surface_id(part.surface_id.as_deref(), "deleteSurface", diags) else {
            return false;
        };
        let removed = self.surfaces.remove(id).is_some();
        if removed {
            tracing::debug!(surface_id = id, "surface deleted");
        }
        removed
    }

    /// Create-or-fetch, detaching the surface from any outstanding snapshot.
    fn surface_mut(&mut self, surface_id: &str) -> &mut Surface {
        let slot = self
            .surfaces
            .entry(surface_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(surface_id, "surface created");
                Arc::new(Surface::new(surface_id))
            });
        Arc::make_mut(slot)
    }
}

fn usable_surface_id<'a>(
    surface_id: Option<&'a str>,
    part: &str,
    diags: &mut Vec<Diagnostic>,
) -> Option<&'a str> {
    match surface_id {
        Some(id) if !id.trim().is_empty() => Some(id),
        _ => {
            tracing::warn!(part, "dropping message part without usable surfaceId");
            diags.push(Diagnostic::error(
                "M-001",
                format!("{} has no usable surfaceId; dropped", part),
            ));
            None
        }
    }
}

/// Picks the value a data entry writes, reporting missing or ambiguous value
/// fields.
fn entry_value(
    entry: &DataEntry,
    policy: EntryPolicy,
    surface_id: &str,
    diags: &mut Vec<Diagnostic>,
) -> Option<DataNode> {
    match entry.value_count() {
        0 => {
            tracing::warn!(surface_id, key = %entry.key, "data entry has no value");
            diags.push(
                Diagnostic::warning("D-001", "data entry has no value field; skipped")
                    .on_surface(surface_id)
                    .at_path(&entry.key),
            );
            return None;
        }
        1 => {}
        n => {
            let skipped = policy == EntryPolicy::RejectAmbiguous;
            tracing::warn!(surface_id, key = %entry.key, fields = n, skipped, "ambiguous data entry");
            let message = if skipped {
                format!("data entry has {} value fields; skipped", n)
            } else {
                format!("data entry has {} value fields; first present wins", n)
            };
            diags.push(
                Diagnostic::warning("D-002", message)
                    .on_surface(surface_id)
                    .at_path(&entry.key),
            );
            if skipped {
                return None;
            }
        }
    }

    if let Some(s) = &entry.value_string {
        return Some(DataNode::from(s.as_str()));
    }
    if let Some(n) = entry.value_number {
        return Some(DataNode::from(n));
    }
    if let Some(items) = &entry.value_map {
        return Some(DataNode::Sequence(
            items.iter().map(DataNode::from_json).collect(),
        ));
    }
    entry.value_boolean.map(DataNode::from)
}
