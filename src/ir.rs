use std::collections::{HashMap, HashSet};

use log::debug;
use serde::Serialize;

use crate::description::{Description, Entry, FieldIssue, Meta, RawBand, RawEdge, RawNode};
use crate::diagnostics::Diagnostics;
use crate::status::{self, StatusToken};

const DEFAULT_ACCENT: &str = "#94a3b8";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    StartEvent,
    EndEvent,
    IntermediateEvent,
    Task,
    SubProcess,
    ExclusiveGateway,
    ParallelGateway,
}

impl NodeKind {
    /// Match a kind name, ignoring case, `-` and `_`.
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "startevent" | "start" => Some(Self::StartEvent),
            "endevent" | "end" => Some(Self::EndEvent),
            "intermediateevent" => Some(Self::IntermediateEvent),
            "task" => Some(Self::Task),
            "subprocess" => Some(Self::SubProcess),
            "exclusivegateway" | "xorgateway" => Some(Self::ExclusiveGateway),
            "parallelgateway" | "andgateway" => Some(Self::ParallelGateway),
            _ => None,
        }
    }

    /// Fixed (width, height) of the node's bounding box.
    pub fn size(self) -> (f64, f64) {
        match self {
            Self::StartEvent | Self::IntermediateEvent => (64.0, 64.0),
            Self::EndEvent => (72.0, 72.0),
            Self::Task => (210.0, 92.0),
            Self::SubProcess => (230.0, 110.0),
            Self::ExclusiveGateway | Self::ParallelGateway => (90.0, 90.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeBehavior {
    Forward,
    LoopBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Sequence,
    Message,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub id: String,
    pub label: String,
    pub accent: String,
    /// Position in declaration order; the only input to vertical stacking.
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    /// Index into `ProcessIR::bands`
    pub band: usize,
    pub status: StatusToken,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    /// Index into `ProcessIR::nodes`
    pub source: usize,
    /// Index into `ProcessIR::nodes`
    pub target: usize,
    pub label: Option<String>,
    pub behavior: EdgeBehavior,
    pub kind: EdgeKind,
}

/// Normalized process model. Nodes and edges live in arenas indexed by
/// declaration order; edges refer to nodes by index.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessIR {
    pub meta: Meta,
    pub bands: Vec<Band>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub diagnostics: Diagnostics,
}

impl ProcessIR {
    pub fn from_description(desc: &Description) -> Self {
        let mut diagnostics = Diagnostics::new();
        report_field_issues("Description", &desc.field_issues, &mut diagnostics);

        let declared_bands = !desc.bands.is_empty();
        let bands = normalize_bands(&desc.bands, &mut diagnostics);
        let nodes = normalize_nodes(&desc.nodes, &bands, declared_bands, &mut diagnostics);
        let edges = normalize_edges(&desc.edges, &nodes, &mut diagnostics);

        debug!(
            bands = bands.len(),
            nodes = nodes.len(),
            edges = edges.len();
            "Normalized process description"
        );

        ProcessIR {
            meta: desc.meta.clone().unwrap_or_default(),
            bands,
            nodes,
            edges,
            diagnostics,
        }
    }
}

/// Lowercase, dash-separated ASCII slug; `None` when nothing survives.
fn slugify(value: &str) -> Option<String> {
    let mut slug = String::new();
    for word in value.split_whitespace() {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.extend(
            word.chars()
                .map(|c| c.to_ascii_lowercase())
                .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'),
        );
    }
    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn report_field_issues(owner: &str, issues: &[FieldIssue], diag: &mut Diagnostics) {
    for issue in issues {
        if issue.kept_as_text {
            diag.push(format!(
                "{owner}: field \"{}\" is not text, its value was read as text",
                issue.field
            ));
        } else {
            diag.push(format!(
                "{owner}: field \"{}\" has the wrong type and was ignored",
                issue.field
            ));
        }
    }
}

fn normalize_bands(raw: &[Entry<RawBand>], diag: &mut Diagnostics) -> Vec<Band> {
    let mut bands: Vec<Band> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (pos, entry) in raw.iter().enumerate() {
        let fallback = format!("lane-{}", pos + 1);
        let (id, label, accent) = match entry {
            Entry::Item(RawBand::Named(name)) => {
                let id = slugify(name).unwrap_or_else(|| fallback.clone());
                (id, name.trim().to_string(), None)
            }
            Entry::Item(RawBand::Full(spec)) => {
                report_field_issues(&format!("Band #{}", pos + 1), &spec.field_issues, diag);
                let id = non_blank(&spec.id)
                    .map(str::to_string)
                    .or_else(|| spec.label.as_deref().and_then(slugify))
                    .unwrap_or_else(|| fallback.clone());
                let label = non_blank(&spec.label).unwrap_or(id.as_str()).to_string();
                (id, label, non_blank(&spec.accent).map(str::to_string))
            }
            Entry::Malformed(value) => {
                diag.push(format!(
                    "Band #{} skipped: expected a label or an object, got {value}",
                    pos + 1
                ));
                continue;
            }
        };

        let id = if seen.contains(&id) {
            let mut n = 2;
            while seen.contains(&format!("{id}-{n}")) {
                n += 1;
            }
            let unique = format!("{id}-{n}");
            diag.push(format!(
                "Duplicate band id \"{id}\" renamed to \"{unique}\""
            ));
            unique
        } else {
            id
        };
        seen.insert(id.clone());

        bands.push(Band {
            id,
            label,
            accent: accent.unwrap_or_else(|| DEFAULT_ACCENT.to_string()),
            index: bands.len(),
        });
    }

    if bands.is_empty() {
        debug!("No bands declared, using a single default band");
        bands.push(Band {
            id: "lane-1".to_string(),
            label: "Lane".to_string(),
            accent: DEFAULT_ACCENT.to_string(),
            index: 0,
        });
    }

    bands
}

fn resolve_band(reference: &str, bands: &[Band]) -> Option<usize> {
    bands
        .iter()
        .position(|b| b.id == reference)
        .or_else(|| bands.iter().position(|b| b.label == reference))
}

fn normalize_nodes(
    raw: &[Entry<RawNode>],
    bands: &[Band],
    declared_bands: bool,
    diag: &mut Diagnostics,
) -> Vec<Node> {
    if raw.is_empty() {
        diag.push("Process description has no nodes");
        return Vec::new();
    }

    let mut nodes: Vec<Node> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (pos, entry) in raw.iter().enumerate() {
        let node = match entry {
            Entry::Item(node) => node,
            Entry::Malformed(_) => {
                diag.push(format!("Node #{} skipped: expected an object", pos + 1));
                continue;
            }
        };

        let owner = match non_blank(&node.id) {
            Some(id) => format!("Node {id}"),
            None => format!("Node #{}", pos + 1),
        };
        report_field_issues(&owner, &node.field_issues, diag);

        let Some(id) = non_blank(&node.id) else {
            let name = non_blank(&node.label)
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{}", pos + 1));
            diag.push(format!("Node \"{name}\" has no id and was skipped"));
            continue;
        };
        if !seen.insert(id.to_string()) {
            diag.push(format!("Duplicate node id \"{id}\" skipped"));
            continue;
        }

        let kind = match non_blank(&node.kind) {
            None => NodeKind::Task,
            Some(k) => NodeKind::parse(k).unwrap_or_else(|| {
                diag.push(format!(
                    "Node kind \"{k}\" is not supported, {id} is drawn as a task"
                ));
                NodeKind::Task
            }),
        };

        let band = match non_blank(&node.band) {
            Some(reference) => resolve_band(reference, bands).unwrap_or_else(|| {
                diag.push(format!(
                    "Band \"{reference}\" not found, {id} moved to the first band"
                ));
                0
            }),
            None => {
                if declared_bands {
                    diag.push(format!("Node {id} has no band, moved to the first band"));
                }
                0
            }
        };

        let status = match non_blank(&node.status) {
            None => status::NEUTRAL,
            Some(tag) => status::lookup(tag).unwrap_or_else(|| {
                diag.push(format!(
                    "Unknown status \"{tag}\" on {id}, using neutral"
                ));
                status::NEUTRAL
            }),
        };

        nodes.push(Node {
            id: id.to_string(),
            kind,
            label: node.label.clone().unwrap_or_default(),
            band,
            status,
        });
    }

    if nodes.is_empty() {
        diag.push("Process description has no usable nodes");
    }

    nodes
}

fn is_loop_marker(edge: &RawEdge) -> bool {
    let marks_loop = |field: &Option<String>| {
        non_blank(field).is_some_and(|b| {
            ["loop", "loop-back", "loopback", "return"]
                .iter()
                .any(|m| b.eq_ignore_ascii_case(m))
        })
    };
    // `type: "return"` is the older spelling of a loop-back
    marks_loop(&edge.behavior) || marks_loop(&edge.kind) || edge.loop_flag == Some(true)
}

fn normalize_edges(raw: &[Entry<RawEdge>], nodes: &[Node], diag: &mut Diagnostics) -> Vec<Edge> {
    let lookup: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut edges = Vec::new();
    for (pos, entry) in raw.iter().enumerate() {
        let edge = match entry {
            Entry::Item(edge) => edge,
            Entry::Malformed(_) => {
                diag.push(format!("Edge #{} skipped: expected an object", pos + 1));
                continue;
            }
        };

        let id = non_blank(&edge.id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("flow-{}", pos + 1));
        report_field_issues(&format!("Edge {id}"), &edge.field_issues, diag);
        let from = non_blank(&edge.from);
        let to = non_blank(&edge.to);
        let source = from.and_then(|f| lookup.get(f).copied());
        let target = to.and_then(|t| lookup.get(t).copied());
        let (Some(source), Some(target)) = (source, target) else {
            diag.push(format!(
                "Edge {id} skipped: nodes not found {} -> {}",
                from.unwrap_or("?"),
                to.unwrap_or("?")
            ));
            continue;
        };

        let behavior = if is_loop_marker(edge) {
            EdgeBehavior::LoopBack
        } else {
            EdgeBehavior::Forward
        };
        let kind = match non_blank(&edge.kind) {
            Some(k) if k.eq_ignore_ascii_case("message") => EdgeKind::Message,
            _ => EdgeKind::Sequence,
        };

        edges.push(Edge {
            id,
            source,
            target,
            label: non_blank(&edge.label).map(str::to_string),
            behavior,
            kind,
        });
    }

    edges
}
