//! Component tree resolution.
//!
//! [`render`] walks a surface from its root component and produces a tree of
//! [`RenderNode`]s whose properties are fully resolved against the surface's
//! data model. Rendering is pure: it reads the surface and nothing else, so
//! rendering the same surface twice yields equal trees.
//!
//! A reference to a component that is not (yet) defined renders nothing.
//! So does a component that contains itself under the same data context, and
//! anything nested deeper than [`RenderConfig::max_depth`].

use serde::Serialize;
use serde_json::Value;

use crate::chart::{ChartItem, resolve_chart_data};
use crate::config::RenderConfig;
use crate::data_model::DataNode;
use crate::enums::ChartType;
use crate::map::{LatLng, MapPin, resolve_map_center, resolve_map_pins};
use crate::path;
use crate::surface::Surface;
use crate::types::{Children, Component, ComponentEntry};
use crate::value::{resolve_number, resolve_text};

/// One resolved, presentation-ready node.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    /// Context path that relative bindings of this node resolved against.
    pub data_context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Value>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum NodeKind {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        usage_hint: Option<String>,
    },
    Image {
        #[serde(skip_serializing_if = "Option::is_none")]
        src: Option<String>,
        alt: String,
    },
    Divider,
    Column {
        children: Vec<RenderNode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        distribution: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        alignment: Option<String>,
    },
    Row {
        children: Vec<RenderNode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        distribution: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        alignment: Option<String>,
    },
    Card {
        #[serde(skip_serializing_if = "Option::is_none")]
        child: Option<Box<RenderNode>>,
    },
    Canvas {
        children: Vec<RenderNode>,
    },
    List {
        children: Vec<RenderNode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        direction: Option<String>,
    },
    Chart {
        chart_type: ChartType,
        title: String,
        chart_data: Vec<ChartItem>,
    },
    GoogleMap {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        zoom: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        center: Option<LatLng>,
        pins: Vec<MapPin>,
    },
    /// Placeholder for a type tag outside the catalog.
    Unknown {
        component_type: String,
    },
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Text { .. } => "Text",
            NodeKind::Image { .. } => "Image",
            NodeKind::Divider => "Divider",
            NodeKind::Column { .. } => "Column",
            NodeKind::Row { .. } => "Row",
            NodeKind::Card { .. } => "Card",
            NodeKind::Canvas { .. } => "Canvas",
            NodeKind::List { .. } => "List",
            NodeKind::Chart { .. } => "Chart",
            NodeKind::GoogleMap { .. } => "GoogleMap",
            NodeKind::Unknown { .. } => "Unknown",
        }
    }
}

impl RenderNode {
    /// Direct children, in order. A card's child counts as its only child.
    pub fn children(&self) -> &[RenderNode] {
        match &self.kind {
            NodeKind::Column { children, .. }
            | NodeKind::Row { children, .. }
            | NodeKind::Canvas { children }
            | NodeKind::List { children, .. } => children,
            NodeKind::Card { child: Some(child) } => std::slice::from_ref(child.as_ref()),
            _ => &[],
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(RenderNode::node_count).sum::<usize>()
    }
}

/// Renders a surface with default settings.
pub fn render(surface: &Surface) -> Option<RenderNode> {
    render_with(surface, &RenderConfig::default())
}

/// Renders a surface from its root component. Returns `None` when the
/// surface has no root or the root is not defined.
pub fn render_with(surface: &Surface, config: &RenderConfig) -> Option<RenderNode> {
    let root = surface.root_component_id.as_deref()?;
    Expander::new(surface, config).expand(root, path::ROOT)
}

/// Renders one component of a surface under an explicit data context.
pub fn render_component(
    surface: &Surface,
    component_id: &str,
    context_path: &str,
    config: &RenderConfig,
) -> Option<RenderNode> {
    Expander::new(surface, config).expand(component_id, context_path)
}

struct Expander<'a> {
    surface: &'a Surface,
    config: &'a RenderConfig,
    /// Components currently being expanded, with their contexts.
    ancestors: Vec<(&'a str, String)>,
}

impl<'a> Expander<'a> {
    fn new(surface: &'a Surface, config: &'a RenderConfig) -> Self {
        Self {
            surface,
            config,
            ancestors: Vec::new(),
        }
    }

    fn expand(&mut self, component_id: &str, context: &str) -> Option<RenderNode> {
        let surface = self.surface;
        let Some(entry) = surface.component(component_id) else {
            tracing::trace!(component_id, "component not defined yet");
            return None;
        };
        if self.ancestors.len() >= self.config.max_depth {
            tracing::trace!(component_id, depth = self.ancestors.len(), "nesting too deep");
            return None;
        }
        if self
            .ancestors
            .iter()
            .any(|(id, ctx)| *id == component_id && ctx == context)
        {
            tracing::trace!(component_id, context, "component contains itself");
            return None;
        }

        self.ancestors.push((entry.id.as_str(), context.to_string()));
        let kind = self.kind(entry, context);
        self.ancestors.pop();

        Some(RenderNode {
            id: entry.id.clone(),
            data_context: context.to_string(),
            weight: entry.weight.clone(),
            kind,
        })
    }

    fn kind(&mut self, entry: &'a ComponentEntry, context: &str) -> NodeKind {
        let surface = self.surface;
        let model = &surface.data_model;
        match &entry.component {
            Component::Text(props) => NodeKind::Text {
                text: resolve_text(props.text.as_ref(), model, context).unwrap_or_default(),
                usage_hint: resolve_text(props.usage_hint.as_ref(), model, context),
            },
            Component::Image(props) => NodeKind::Image {
                src: resolve_text(props.src.as_ref(), model, context),
                alt: resolve_text(props.alt.as_ref(), model, context).unwrap_or_default(),
            },
            Component::Divider => NodeKind::Divider,
            Component::Column(props) => NodeKind::Column {
                children: self.children(props.children.as_ref(), context),
                distribution: props.distribution.clone(),
                alignment: props.alignment.clone(),
            },
            Component::Row(props) => NodeKind::Row {
                children: self.children(props.children.as_ref(), context),
                distribution: props.distribution.clone(),
                alignment: props.alignment.clone(),
            },
            Component::Canvas(props) => NodeKind::Canvas {
                children: self.children(props.children.as_ref(), context),
            },
            Component::Card(props) => NodeKind::Card {
                child: props
                    .child
                    .as_deref()
                    .and_then(|child| self.expand(child, context))
                    .map(Box::new),
            },
            Component::List(props) => NodeKind::List {
                children: self.children(props.children.as_ref(), context),
                direction: props.direction.clone(),
            },
            Component::Chart(props) => NodeKind::Chart {
                chart_type: resolve_text(props.chart_type.as_ref(), model, context)
                    .and_then(|name| ChartType::from_name(&name))
                    .unwrap_or(self.config.default_chart_type),
                title: resolve_text(props.title.as_ref(), model, context).unwrap_or_default(),
                chart_data: resolve_chart_data(
                    props.chart_data.as_ref(),
                    model,
                    context,
                    self.config.max_items,
                ),
            },
            Component::GoogleMap(props) => NodeKind::GoogleMap {
                title: resolve_text(props.title.as_ref(), model, context),
                zoom: resolve_number(props.zoom.as_ref(), model, context)
                    .filter(|zoom| *zoom != 0.0 && !zoom.is_nan())
                    .unwrap_or(self.config.default_zoom),
                center: resolve_map_center(props.center.as_ref(), model, context),
                pins: resolve_map_pins(props.pins.as_ref(), model, context, self.config.max_items),
            },
            Component::Unknown { type_name, .. } => {
                tracing::trace!(component_type = %type_name, "rendering placeholder");
                NodeKind::Unknown {
                    component_type: type_name.clone(),
                }
            }
        }
    }

    fn children(&mut self, children: Option<&'a Children>, context: &str) -> Vec<RenderNode> {
        let mut out = Vec::new();
        match children {
            None => {}
            Some(Children::ExplicitList(ids)) => {
                for id in ids {
                    out.extend(self.expand(id, context));
                }
            }
            Some(Children::Template(template)) => {
                let base = path::normalize(&template.data_binding, context);
                let surface = self.surface;
                let Some(items) = surface.data_model.get(&base).and_then(DataNode::as_sequence)
                else {
                    tracing::trace!(binding = %base, "template binding is not a sequence");
                    return out;
                };
                for i in 0..items.len() {
                    out.extend(self.expand(&template.component_id, &path::join(&base, i)));
                }
            }
        }
        out
    }
}
