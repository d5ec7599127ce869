//! Serialized rich-text document model.
//!
//! Documents are ProseMirror-style JSON trees:
//!
//! ```json
//! { "type": "doc", "content": [
//!     { "type": "paragraph", "content": [{ "type": "text", "text": "Castle build" }] },
//!     { "type": "image", "attrs": { "src": "blob:blockpress/1700000000000-a1b2c3d4e5f6" } }
//! ] }
//! ```
//!
//! Fields the model does not know about are carried through untouched.

use blockpress_error::JsonError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute holding a media node's reference.
pub const SRC_ATTR: &str = "src";

/// Attribute set to `true` once a node's reference has been made durable.
pub const PROCESSED_ATTR: &str = "data-processed";

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Node {
    /// Node type, e.g. `paragraph` or `image`
    #[serde(rename = "type")]
    pub kind: String,
    /// Node attributes
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attrs: Map<String, Value>,
    /// Child nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Node>,
    /// Text of a text node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Anything else (marks, ids, editor-specific fields)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// Create an empty node of the given type.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Create an `image` node referencing `src`.
    pub fn image(src: impl Into<String>) -> Self {
        let mut node = Self::new("image");
        node.attrs.insert(SRC_ATTR.to_string(), Value::String(src.into()));
        node
    }

    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new("text")
        }
    }

    /// Append a child and return self.
    pub fn with_child(mut self, child: Node) -> Self {
        self.content.push(child);
        self
    }

    /// The node's media reference, if it has a string `src`.
    pub fn media_ref(&self) -> Option<&str> {
        self.attrs.get(SRC_ATTR).and_then(Value::as_str)
    }

    /// Whether the node carries the processed marker.
    pub fn is_processed(&self) -> bool {
        self.attrs
            .get(PROCESSED_ATTR)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Point the node at a durable URL and mark it processed.
    pub fn mark_processed(&mut self, url: impl Into<String>) {
        self.attrs.insert(SRC_ATTR.to_string(), Value::String(url.into()));
        self.attrs.insert(PROCESSED_ATTR.to_string(), Value::Bool(true));
    }
}

/// Child indices leading from the root to a node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// Path from child indices.
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Child indices, outermost first.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "root");
        }
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// A media-bearing node found during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTarget {
    /// Where the node sits in the tree
    pub path: NodePath,
    /// Its `src`, if present
    pub media_ref: Option<String>,
    /// Whether it already carries the processed marker
    pub processed: bool,
}

/// A whole rich-text document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Node);

impl Document {
    /// Wrap a root node.
    pub fn new(root: Node) -> Self {
        Self(root)
    }

    /// A `doc` root holding `nodes`.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self(Node {
            content: nodes,
            ..Node::new("doc")
        })
    }

    /// Parse a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `JsonError` if the text is not a node tree.
    pub fn from_json(json: &str) -> Result<Self, JsonError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `JsonError` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, JsonError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The root node.
    pub fn root(&self) -> &Node {
        &self.0
    }

    /// Node at `path`, if it exists.
    pub fn node_at(&self, path: &NodePath) -> Option<&Node> {
        path.indices()
            .iter()
            .try_fold(&self.0, |node, &i| node.content.get(i))
    }

    /// Mutable node at `path`, if it exists.
    pub fn node_at_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        path.indices()
            .iter()
            .try_fold(&mut self.0, |node, &i| node.content.get_mut(i))
    }

    /// Every node whose type is in `media_kinds`, in document order.
    pub fn media_targets(&self, media_kinds: &[String]) -> Vec<MediaTarget> {
        let mut targets = Vec::new();
        let mut stack = vec![(NodePath::default(), &self.0)];

        while let Some((path, node)) = stack.pop() {
            if media_kinds.iter().any(|k| k == &node.kind) {
                targets.push(MediaTarget {
                    path: path.clone(),
                    media_ref: node.media_ref().map(str::to_string),
                    processed: node.is_processed(),
                });
            }
            // Reverse so children pop in document order
            for (i, child) in node.content.iter().enumerate().rev() {
                stack.push((path.child(i), child));
            }
        }
        targets
    }
}
