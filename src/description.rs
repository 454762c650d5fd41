//! Raw process description as supplied by an editor or a file.
//!
//! Every field is optional and every list entry is allowed to be malformed:
//! the normalizer in [`crate::ir`] decides what to keep and reports the rest.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::error::SwimflowError;
use crate::layout::LayoutOverrides;

/// A list entry that either matched the expected shape or did not.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<T> {
    Item(T),
    Malformed(Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
}

/// A band may be declared by its label alone or as a full object.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBand {
    Named(String),
    Full(RawBandSpec),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawBandSpec {
    pub id: Option<String>,
    #[serde(alias = "name")]
    pub label: Option<String>,
    #[serde(alias = "color")]
    pub accent: Option<String>,
    /// Fields that had the wrong type
    #[serde(skip)]
    pub field_issues: Vec<FieldIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawNode {
    pub id: Option<String>,
    #[serde(alias = "type")]
    pub kind: Option<String>,
    pub label: Option<String>,
    #[serde(alias = "lane")]
    pub band: Option<String>,
    pub status: Option<String>,
    /// Fields that had the wrong type
    #[serde(skip)]
    pub field_issues: Vec<FieldIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawEdge {
    pub id: Option<String>,
    #[serde(alias = "source")]
    pub from: Option<String>,
    #[serde(alias = "target")]
    pub to: Option<String>,
    pub label: Option<String>,
    pub behavior: Option<String>,
    /// Shorthand for `behavior: "loop"`.
    #[serde(rename = "loop", alias = "return")]
    pub loop_flag: Option<bool>,
    #[serde(alias = "type")]
    pub kind: Option<String>,
    /// Fields that had the wrong type
    #[serde(skip)]
    pub field_issues: Vec<FieldIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Description {
    pub meta: Option<Meta>,
    pub layout: Option<LayoutOverrides>,
    #[serde(alias = "lanes", deserialize_with = "lenient_list")]
    pub bands: Vec<Entry<RawBand>>,
    #[serde(alias = "elements", deserialize_with = "lenient_list")]
    pub nodes: Vec<Entry<RawNode>>,
    #[serde(alias = "flows", deserialize_with = "lenient_list")]
    pub edges: Vec<Entry<RawEdge>>,
    /// Wrong-typed `meta`/`layout` fields, named by dotted path
    #[serde(skip)]
    pub field_issues: Vec<FieldIssue>,
}

/// A field whose value had the wrong type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    /// The number or boolean was kept as its text instead of being dropped.
    pub kept_as_text: bool,
}

impl FieldIssue {
    fn dropped(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kept_as_text: false,
        }
    }
}

/// A list element that can be recovered field by field.
trait LenientRecord: Sized {
    fn from_lenient(value: Value) -> Option<Self>;
}

impl LenientRecord for RawBand {
    fn from_lenient(value: Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(RawBand::Named(name)),
            Value::Object(map) => {
                let (kept, issues) = clean_fields::<RawBandSpec>(map);
                let mut spec: RawBandSpec = serde_json::from_value(Value::Object(kept)).ok()?;
                spec.field_issues = issues;
                Some(RawBand::Full(spec))
            }
            _ => None,
        }
    }
}

impl LenientRecord for RawNode {
    fn from_lenient(value: Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };
        let (kept, issues) = clean_fields::<RawNode>(map);
        let mut node: RawNode = serde_json::from_value(Value::Object(kept)).ok()?;
        node.field_issues = issues;
        Some(node)
    }
}

impl LenientRecord for RawEdge {
    fn from_lenient(value: Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };
        let (kept, issues) = clean_fields::<RawEdge>(map);
        let mut edge: RawEdge = serde_json::from_value(Value::Object(kept)).ok()?;
        edge.field_issues = issues;
        Some(edge)
    }
}

/// Split an object into the fields `T` accepts and the issues with the rest.
/// Numbers and booleans given where text is expected are kept as their JSON
/// text; any other mismatch drops the field.
fn clean_fields<T: DeserializeOwned>(map: Map<String, Value>) -> (Map<String, Value>, Vec<FieldIssue>) {
    let accepts = |key: &str, value: &Value| {
        let mut single = Map::new();
        single.insert(key.to_string(), value.clone());
        serde_json::from_value::<T>(Value::Object(single)).is_ok()
    };

    let mut kept = Map::new();
    let mut issues = Vec::new();
    for (key, value) in map {
        if accepts(&key, &value) {
            kept.insert(key, value);
            continue;
        }
        let as_text = match &value {
            Value::Number(n) => Some(Value::String(n.to_string())),
            Value::Bool(b) => Some(Value::String(b.to_string())),
            _ => None,
        };
        match as_text {
            Some(text) if accepts(&key, &text) => {
                issues.push(FieldIssue {
                    field: key.clone(),
                    kept_as_text: true,
                });
                kept.insert(key, text);
            }
            _ => issues.push(FieldIssue::dropped(key)),
        }
    }
    (kept, issues)
}

/// Replace `root[key]` by its accepted fields, naming issues as
/// `key.field`. A section that is not an object is dropped whole.
fn clean_section<T: DeserializeOwned>(root: &mut Map<String, Value>, key: &str, issues: &mut Vec<FieldIssue>) {
    match root.remove(key) {
        None | Some(Value::Null) => {}
        Some(Value::Object(map)) => {
            let (kept, found) = clean_fields::<T>(map);
            issues.extend(found.into_iter().map(|issue| FieldIssue {
                field: format!("{key}.{}", issue.field),
                ..issue
            }));
            let kept = Value::Object(kept);
            if serde_json::from_value::<T>(kept.clone()).is_ok() {
                root.insert(key.to_string(), kept);
            } else {
                issues.push(FieldIssue::dropped(key));
            }
        }
        Some(_) => issues.push(FieldIssue::dropped(key)),
    }
}

/// Accept a list, `null`, or any other value. A non-list value becomes one
/// malformed entry so the normalizer can report it.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<Entry<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: LenientRecord,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| match T::from_lenient(item.clone()) {
                Some(parsed) => Entry::Item(parsed),
                None => Entry::Malformed(item),
            })
            .collect()),
        other => Ok(vec![Entry::Malformed(other)]),
    }
}

impl Description {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON description. Only JSON syntax errors and a non-object
    /// root fail. Wrong-typed fields are recovered or dropped and listed in
    /// `field_issues`, here or on their entry; the normalizer reports them.
    pub fn from_json(source: &str) -> Result<Self, SwimflowError> {
        let value: Value = serde_json::from_str(source)?;
        let Value::Object(mut root) = value else {
            return Err(SwimflowError::Json(serde::de::Error::custom(
                "expected a JSON object at the root",
            )));
        };

        let mut issues = Vec::new();
        clean_section::<Meta>(&mut root, "meta", &mut issues);
        clean_section::<LayoutOverrides>(&mut root, "layout", &mut issues);

        let mut desc: Description = serde_json::from_value(Value::Object(root))?;
        desc.field_issues = issues;
        Ok(desc)
    }

    pub fn band(mut self, id: &str, label: &str) -> Self {
        self.bands.push(Entry::Item(RawBand::Full(RawBandSpec {
            id: Some(id.to_string()),
            label: Some(label.to_string()),
            ..RawBandSpec::default()
        })));
        self
    }

    pub fn node(mut self, id: &str, kind: &str, band: &str) -> Self {
        self.nodes.push(Entry::Item(RawNode {
            id: Some(id.to_string()),
            kind: Some(kind.to_string()),
            label: Some(id.to_string()),
            band: Some(band.to_string()),
            ..RawNode::default()
        }));
        self
    }

    pub fn edge(self, from: &str, to: &str) -> Self {
        self.push_edge(from, to, None)
    }

    pub fn loop_edge(self, from: &str, to: &str) -> Self {
        self.push_edge(from, to, Some("loop"))
    }

    fn push_edge(mut self, from: &str, to: &str, behavior: Option<&str>) -> Self {
        self.edges.push(Entry::Item(RawEdge {
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            behavior: behavior.map(str::to_string),
            ..RawEdge::default()
        }));
        self
    }
}
