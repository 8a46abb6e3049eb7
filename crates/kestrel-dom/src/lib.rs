//! Document tree for the Kestrel HTML parser.
//!
//! A [`DomTree`] owns every node in one arena with a single
//! [`NodeType::Document`] root. Ownership flows from parent to child only:
//! relationships are [`NodeId`] indices, so a parent link is for navigation
//! and never keeps a node alive.

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

/// A `name="value"` pair on a start tag or element.
///
/// Attributes are kept as an ordered list. Duplicate names are preserved in
/// the order they were written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// The attribute name, as written in the markup.
    pub name: String,
    /// The attribute value (empty for valueless attributes).
    pub value: String,
}

impl Attribute {
    /// Pair a name with its value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// Index of a node in its [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The Document.
    pub const ROOT: Self = Self(0);
}

/// One slot in the arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// What kind of node this is.
    pub node_type: NodeType,

    /// Non-owning link to the parent; `None` for the document and for
    /// allocated nodes not yet attached.
    pub parent: Option<NodeId>,

    /// Children in document order.
    pub children: Vec<NodeId>,
}

/// The node kinds the tree builder produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodeType {
    /// The single root of every tree.
    Document,
    /// An element with a tag name and attributes.
    Element(ElementData),
    /// A run of character data.
    Text(String),
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementData {
    /// The tag name, exactly as it appeared in the start tag.
    pub tag_name: String,
    /// Attributes in source order, duplicates included.
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    /// Create element data from a tag name and its attributes.
    #[must_use]
    pub const fn new(tag_name: String, attrs: Vec<Attribute>) -> Self {
        Self { tag_name, attrs }
    }
}

/// The document tree built by one parse.
///
/// Nodes live in a flat arena indexed by [`NodeId`]; the Document is
/// always slot 0. Nodes are never removed.
///
/// Two trees compare equal when they have the same shape and content, which
/// makes repeated parses of the same input directly comparable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// A tree holding only the Document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The Document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, the Document included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree holds at least its Document.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a detached node to the arena.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// Ids that do not belong to this tree are ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() {
            return;
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Append `c` to the data of the text node `id`.
    ///
    /// Ids that are not text nodes are ignored.
    pub fn append_text(&mut self, id: NodeId, c: char) {
        if let Some(NodeType::Text(data)) = self.nodes.get_mut(id.0).map(|n| &mut n.node_type) {
            data.push(c);
        }
    }

    /// Parent of `id`, if attached.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of `id` in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// First child of `id`.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Element data, if `id` is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.get(id)?.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Character data, if `id` is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.node_type {
            NodeType::Text(data) => Some(data),
            _ => None,
        }
    }

    /// Concatenated text of `id` and all its descendants, in document order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.get(id).map(|n| &n.node_type) {
            Some(NodeType::Text(data)) => out.push_str(data),
            Some(_) => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
            None => {}
        }
    }

    /// First element named `tag` in depth-first order starting at `from`.
    #[must_use]
    pub fn find_element(&self, from: NodeId, tag: &str) -> Option<NodeId> {
        if self.as_element(from).is_some_and(|e| e.tag_name == tag) {
            return Some(from);
        }
        self.children(from)
            .iter()
            .find_map(|&child| self.find_element(child, tag))
    }

    /// A nested, serializable view of the subtree rooted at `id`.
    #[must_use]
    pub const fn view(&self, id: NodeId) -> NodeView<'_> {
        NodeView { tree: self, id }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// A borrowed subtree that serializes as nested objects rather than the
/// flat arena layout.
///
/// Documents become `{"type":"document","children":[...]}`, elements
/// `{"type":"element","tagName":..,"attributes":[..],"children":[..]}` and
/// text nodes `{"type":"text","content":..}`.
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl NodeView<'_> {
    fn children(&self) -> Vec<Self> {
        self.tree
            .children(self.id)
            .iter()
            .map(|&id| Self {
                tree: self.tree,
                id,
            })
            .collect()
    }
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.tree.get(self.id).map(|n| &n.node_type) {
            Some(NodeType::Document) | None => {
                let mut state = serializer.serialize_struct("Document", 2)?;
                state.serialize_field("type", "document")?;
                state.serialize_field("children", &self.children())?;
                state.end()
            }
            Some(NodeType::Element(data)) => {
                let mut state = serializer.serialize_struct("Element", 4)?;
                state.serialize_field("type", "element")?;
                state.serialize_field("tagName", &data.tag_name)?;
                state.serialize_field("attributes", &data.attrs)?;
                state.serialize_field("children", &self.children())?;
                state.end()
            }
            Some(NodeType::Text(content)) => {
                let mut state = serializer.serialize_struct("Text", 2)?;
                state.serialize_field("type", "text")?;
                state.serialize_field("content", content)?;
                state.end()
            }
        }
    }
}
