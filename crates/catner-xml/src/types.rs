//! Core types for the arena-backed XML tree.

/// Handle to a node stored in an [`XmlDocument`].
///
/// Handles are generational: once a node is removed its slot may be reused,
/// but a handle obtained before the removal keeps reporting the node as gone
/// instead of silently pointing at the new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// An attribute as written in the source, qualified name included
/// (`xmlns`, `xml:lang`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: String,
    pub value: String,
}

/// An element's tag and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// The local name of the element (without namespace prefix).
    pub name: String,

    /// Namespace prefix, if any (e.g., "bm" in `<bm:ARTICLE>`).
    pub prefix: Option<String>,

    pub attributes: Vec<XmlAttribute>,
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

/// A node together with its links into the tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// An XML document: an arena of nodes plus the root element handle.
///
/// Nodes are created detached and linked with [`XmlDocument::append_child`].
/// Removing a node frees its whole subtree.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: Option<NodeId>,
}

impl Default for XmlDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlDocument {
    /// Create an empty document without a root element.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
        }
    }

    /// The root element, if the document has one.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Install `node` as the document root, freeing any previous root.
    pub fn set_root(&mut self, node: NodeId) {
        if let Some(old) = self.root.take() {
            if old != node {
                self.free_subtree(old);
            }
        }
        if let Some(n) = self.node_mut(node) {
            n.parent = None;
        }
        self.root = Some(node);
    }

    /// Number of live nodes in the arena.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let node = Node {
            kind,
            parent: None,
            children: Vec::new(),
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Create a detached element named `name`.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        let (name, prefix) = split_qualified(name);
        self.alloc(NodeKind::Element(ElementData {
            name,
            prefix,
            attributes: Vec::new(),
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.to_string()))
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Does nothing if either handle is stale or `child` is already attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.is_alive(parent) || self.parent(child).is_some() || self.root == Some(child) {
            return;
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        } else {
            return;
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
    }

    /// Insert `child` into `parent` at position `index` among all children.
    ///
    /// An `index` past the end appends. Same no-op rules as
    /// [`XmlDocument::append_child`].
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        if !self.is_alive(parent) || self.parent(child).is_some() || self.root == Some(child) {
            return;
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        } else {
            return;
        }
        if let Some(p) = self.node_mut(parent) {
            let index = index.min(p.children.len());
            p.children.insert(index, child);
        }
    }

    /// Create an element named `name` and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        let child = self.create_element(name);
        self.append_child(parent, child);
        child
    }

    /// Create an element named `name` holding `text` and append it to `parent`.
    pub fn append_text_element(&mut self, parent: NodeId, name: &str, text: &str) -> NodeId {
        let child = self.append_element(parent, name);
        self.set_text_content(child, text);
        child
    }

    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    /// Element data for `id`, or `None` for text nodes and stale handles.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id)?.kind {
            NodeKind::Element(e) => Some(e),
            NodeKind::Text(_) => None,
        }
    }

    /// Local tag name of an element node.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// All children of `id` (elements and text), in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Element children of `id`, in document order.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&c| self.element(c).is_some())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set or replace an attribute on an element.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(Node {
            kind: NodeKind::Element(e),
            ..
        }) = self.node_mut(id)
        else {
            return;
        };
        match e.attributes.iter_mut().find(|a| a.name == name) {
            Some(a) => a.value = value.to_string(),
            None => e.attributes.push(XmlAttribute {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Concatenated text of `id` and all its descendants.
    ///
    /// Returns `None` for stale handles; an element without text yields an
    /// empty string.
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        let node = self.node(id)?;
        let mut out = String::new();
        match &node.kind {
            NodeKind::Text(t) => out.push_str(t),
            NodeKind::Element(_) => self.collect_text(id, &mut out),
        }
        Some(out)
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for &child in self.children(id) {
            match self.node(child).map(|n| &n.kind) {
                Some(NodeKind::Text(t)) => out.push_str(t),
                Some(NodeKind::Element(_)) => self.collect_text(child, out),
                None => {}
            }
        }
    }

    /// Replace all children of `id` with a single text node holding `text`.
    ///
    /// An empty `text` leaves the element without children.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if let NodeKind::Text(t) = &mut node.kind {
            *t = text.to_string();
            return;
        }
        let old = std::mem::take(&mut node.children);
        for child in old {
            self.free_subtree(child);
        }
        if !text.is_empty() {
            let t = self.create_text(text);
            self.append_child(id, t);
        }
    }

    /// Detach `id` from its parent and free it with its subtree.
    ///
    /// Returns `false` if the handle was already stale.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if let Some(parent) = self.parent(id) {
            if let Some(p) = self.node_mut(parent) {
                p.children.retain(|&c| c != id);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }
        self.free_subtree(id);
        true
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.index as usize)
                .filter(|s| s.generation == current.generation)
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                pending.extend(node.children);
            }
        }
    }
}

/// Split `prefix:local` into `(local, Some(prefix))`.
pub(crate) fn split_qualified(full_name: &str) -> (String, Option<String>) {
    if let Some(pos) = full_name.find(':') {
        (
            full_name[pos + 1..].to_string(),
            Some(full_name[..pos].to_string()),
        )
    } else {
        (full_name.to_string(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_navigate() {
        let mut doc = XmlDocument::new();
        let root = doc.create_element("root");
        doc.set_root(root);
        let a = doc.append_element(root, "a");
        let b = doc.append_text_element(root, "b", "hello");

        assert_eq!(doc.root(), Some(root));
        assert_eq!(doc.children(root), &[a, b]);
        assert_eq!(doc.parent(b), Some(root));
        assert_eq!(doc.name(b), Some("b"));
        assert_eq!(doc.text_content(b).as_deref(), Some("hello"));
        assert_eq!(doc.text_content(root).as_deref(), Some("hello"));
        assert_eq!(doc.text_content(a).as_deref(), Some(""));
    }

    #[test]
    fn test_element_children_skips_text() {
        let mut doc = XmlDocument::new();
        let root = doc.create_element("root");
        doc.set_root(root);
        let t = doc.create_text("loose");
        doc.append_child(root, t);
        let a = doc.append_element(root, "a");

        let elements: Vec<NodeId> = doc.element_children(root).collect();
        assert_eq!(elements, vec![a]);
        assert_eq!(doc.children(root).len(), 2);
    }

    #[test]
    fn test_set_text_content_replaces_children() {
        let mut doc = XmlDocument::new();
        let root = doc.create_element("root");
        let inner = doc.append_text_element(root, "inner", "x");
        doc.set_text_content(root, "flat");

        assert!(!doc.is_alive(inner));
        assert_eq!(doc.text_content(root).as_deref(), Some("flat"));

        doc.set_text_content(root, "");
        assert!(doc.children(root).is_empty());
    }

    #[test]
    fn test_remove_frees_subtree_and_invalidates_handles() {
        let mut doc = XmlDocument::new();
        let root = doc.create_element("root");
        doc.set_root(root);
        let a = doc.append_element(root, "a");
        let deep = doc.append_text_element(a, "deep", "v");

        assert!(doc.remove(a));
        assert!(!doc.is_alive(a));
        assert!(!doc.is_alive(deep));
        assert!(doc.children(root).is_empty());
        assert!(!doc.remove(a));

        // The freed slot is reused, the stale handle stays stale
        let fresh = doc.append_element(root, "fresh");
        assert!(doc.is_alive(fresh));
        assert!(!doc.is_alive(a));
        assert_eq!(doc.name(a), None);
    }

    #[test]
    fn test_attributes() {
        let mut doc = XmlDocument::new();
        let root = doc.create_element("root");
        doc.set_attribute(root, "version", "1");
        doc.set_attribute(root, "version", "2");
        doc.set_attribute(root, "xmlns", "urn:x");

        assert_eq!(doc.attribute(root, "version"), Some("2"));
        assert_eq!(doc.attribute(root, "xmlns"), Some("urn:x"));
        assert_eq!(doc.attribute(root, "missing"), None);
        assert_eq!(doc.element(root).unwrap().attributes.len(), 2);
    }

    #[test]
    fn test_prefixed_element_name() {
        let mut doc = XmlDocument::new();
        let el = doc.create_element("bm:ARTICLE");
        let data = doc.element(el).unwrap();
        assert_eq!(data.name, "ARTICLE");
        assert_eq!(data.prefix.as_deref(), Some("bm"));
    }

    #[test]
    fn test_insert_child_positions() {
        let mut doc = XmlDocument::new();
        let root = doc.create_element("root");
        let b = doc.append_element(root, "b");
        let a = doc.create_element("a");
        doc.insert_child(root, 0, a);
        let z = doc.create_element("z");
        doc.insert_child(root, 99, z);
        assert_eq!(doc.children(root), &[a, b, z]);
        assert_eq!(doc.parent(a), Some(root));
    }

    #[test]
    fn test_append_child_ignores_attached_node() {
        let mut doc = XmlDocument::new();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let c = doc.append_element(a, "c");
        doc.append_child(b, c);
        assert_eq!(doc.children(a), &[c]);
        assert!(doc.children(b).is_empty());
    }
}
