//! Morphological form tree.
//!
//! Stores one surface string per combination of grammatical features in a
//! nested mapping. A combination can be addressed two ways that resolve to
//! the same slot:
//!
//! - **path mode**: `"indicative.present.1sg"`, walked key by key;
//! - **feature mode**: `{mood: indicative, tense: present, ...}`, encoded
//!   into a path with the word class's [`FeatureOrdering`].
//!
//! Feature encoding takes the primary feature's value, then each declared
//! secondary feature's value in order, then folds whatever is left into one
//! composite key (`gender:feminine.voice:active`) or, if nothing is left,
//! the sentinel key [`LEAF_KEY`]. A slot `P` and `P.form` are the same
//! location: reads on a mapping fall through to its `form` leaf.
//!
//! The tree never checks features against a schema; that is the
//! [`FeatureSchemaRegistry`](crate::schema::FeatureSchemaRegistry)'s job.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::ordering::FeatureOrdering;

/// Leaf key used when every feature of a combination was consumed by the
/// ordering.
pub const LEAF_KEY: &str = "form";

/// Separator between path segments.
pub const PATH_SEPARATOR: &str = ".";

/// Separator between a feature name and its value in a composite key.
pub const PAIR_SEPARATOR: &str = ":";

/// Feature name → value. Partial assignments are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureAssignment(BTreeMap<String, String>);

impl FeatureAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, feature: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(feature.into(), value.into())
    }

    pub fn get(&self, feature: &str) -> Option<&str> {
        self.0.get(feature).map(String::as_str)
    }

    /// Features in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse `name=value` pairs, e.g. from command-line flags.
    pub fn parse_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> anyhow::Result<Self> {
        let mut assignment = Self::new();
        for pair in pairs {
            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("expected name=value, got {pair:?}"))?;
            let (name, value) = (name.trim(), value.trim());
            anyhow::ensure!(
                !name.is_empty() && !value.is_empty(),
                "empty feature name or value in {pair:?}"
            );
            assignment.insert(name, value);
        }
        Ok(assignment)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FeatureAssignment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<BTreeMap<String, String>> for FeatureAssignment {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// A resolved location in a form tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FormPath {
    segments: Vec<String>,
}

impl FormPath {
    /// Parse a dot-separated path. A trailing run of `name:value` segments
    /// is one composite key, matching what [`FormPath::encode`] produces.
    pub fn parse(path: &str) -> Self {
        let parts: Vec<&str> = path
            .split(PATH_SEPARATOR)
            .filter(|p| !p.is_empty())
            .collect();

        let composite_start = parts
            .iter()
            .position(|p| p.contains(PAIR_SEPARATOR))
            .unwrap_or(parts.len());

        let mut segments: Vec<String> = parts[..composite_start]
            .iter()
            .map(|p| p.to_string())
            .collect();
        if composite_start < parts.len() {
            segments.push(parts[composite_start..].join(PATH_SEPARATOR));
        }
        Self { segments }
    }

    /// Encode a feature assignment with a word class's ordering.
    pub fn encode(ordering: &FeatureOrdering, assignment: &FeatureAssignment) -> Self {
        let mut remaining = assignment.0.clone();
        let mut segments = Vec::with_capacity(ordering.secondary.len() + 2);

        for feature in ordering.features() {
            if let Some(value) = remaining.remove(feature) {
                segments.push(value);
            }
        }

        if remaining.is_empty() {
            segments.push(LEAF_KEY.to_string());
        } else {
            let composite: Vec<String> = remaining
                .iter()
                .map(|(name, value)| format!("{name}{PAIR_SEPARATOR}{value}"))
                .collect();
            segments.push(composite.join(PATH_SEPARATOR));
        }

        Self { segments }
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FormPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(PATH_SEPARATOR))
    }
}

/// Either addressing mode, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAddress {
    Path(FormPath),
    Features(FeatureAssignment),
}

impl FormAddress {
    pub fn resolve(self, ordering: &FeatureOrdering) -> FormPath {
        match self {
            FormAddress::Path(path) => path,
            FormAddress::Features(features) => FormPath::encode(ordering, &features),
        }
    }
}

impl From<&str> for FormAddress {
    fn from(path: &str) -> Self {
        FormAddress::Path(FormPath::parse(path))
    }
}

impl From<String> for FormAddress {
    fn from(path: String) -> Self {
        FormAddress::Path(FormPath::parse(&path))
    }
}

impl From<FormPath> for FormAddress {
    fn from(path: FormPath) -> Self {
        FormAddress::Path(path)
    }
}

impl From<FeatureAssignment> for FormAddress {
    fn from(features: FeatureAssignment) -> Self {
        FormAddress::Features(features)
    }
}

impl From<&FeatureAssignment> for FormAddress {
    fn from(features: &FeatureAssignment) -> Self {
        FormAddress::Features(features.clone())
    }
}

/// A node of the tree: a surface string or a nested mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormNode {
    Leaf(String),
    Branch(BTreeMap<String, FormNode>),
}

impl FormNode {
    /// The surface text stored at this slot, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            FormNode::Leaf(text) => Some(text),
            FormNode::Branch(children) => match children.get(LEAF_KEY) {
                Some(FormNode::Leaf(text)) => Some(text),
                _ => None,
            },
        }
    }

    /// Turn a leaf into a mapping that keeps its text under [`LEAF_KEY`].
    fn make_branch(&mut self) -> &mut BTreeMap<String, FormNode> {
        if let FormNode::Leaf(text) = self {
            let text = std::mem::take(text);
            *self = FormNode::Branch(BTreeMap::from([(
                LEAF_KEY.to_string(),
                FormNode::Leaf(text),
            )]));
        }
        match self {
            FormNode::Branch(children) => children,
            FormNode::Leaf(_) => unreachable!("leaf converted to branch above"),
        }
    }

    fn collect_entries<'a>(&'a self, prefix: &mut Vec<&'a str>, out: &mut Vec<(String, &'a str)>) {
        match self {
            FormNode::Leaf(text) => out.push((prefix.join(PATH_SEPARATOR), text.as_str())),
            FormNode::Branch(children) => {
                for (key, child) in children {
                    prefix.push(key);
                    child.collect_entries(prefix, out);
                    prefix.pop();
                }
            }
        }
    }
}

/// All surface forms of one word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormTree {
    root: BTreeMap<String, FormNode>,
}

impl FormTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `text` at `path`, overwriting whatever was there.
    pub fn insert(&mut self, path: &FormPath, text: &str) -> Result<()> {
        let (last, parents) = path
            .segments()
            .split_last()
            .ok_or(CoreError::EmptyFormPath)?;

        let mut children = &mut self.root;
        for segment in parents {
            children = children
                .entry(segment.clone())
                .or_insert_with(|| FormNode::Branch(BTreeMap::new()))
                .make_branch();
        }

        if let Some(FormNode::Branch(slot)) = children.get_mut(last) {
            slot.insert(LEAF_KEY.to_string(), FormNode::Leaf(text.to_string()));
            return Ok(());
        }
        children.insert(last.clone(), FormNode::Leaf(text.to_string()));
        Ok(())
    }

    /// The surface text at `path`, if one is stored.
    pub fn get(&self, path: &FormPath) -> Option<&str> {
        self.subtree(path).and_then(FormNode::text)
    }

    /// The node at `path`; useful for partial assignments.
    pub fn subtree(&self, path: &FormPath) -> Option<&FormNode> {
        let (first, rest) = path.segments().split_first()?;
        let mut current = self.root.get(first)?;

        for (i, segment) in rest.iter().enumerate() {
            match current {
                FormNode::Branch(children) => current = children.get(segment)?,
                // A leaf also answers for its own sentinel slot.
                FormNode::Leaf(_) if segment == LEAF_KEY && i + 1 == rest.len() => {
                    return Some(current)
                }
                FormNode::Leaf(_) => return None,
            }
        }
        Some(current)
    }

    /// Every stored form as `(dot path, text)`, in key order.
    pub fn entries(&self) -> Vec<(String, &str)> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        for (key, node) in &self.root {
            prefix.push(key.as_str());
            node.collect_entries(&mut prefix, &mut out);
            prefix.pop();
        }
        out
    }

    /// Number of stored surface forms.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}
