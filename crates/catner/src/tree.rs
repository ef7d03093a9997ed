//! Schema-agnostic helpers over [`XmlDocument`].
//!
//! Children are matched by local tag name and, optionally, by their exact
//! concatenated text content. All helpers look at direct children only.

use catner_xml::{NodeId, XmlDocument};

fn matches(doc: &XmlDocument, node: NodeId, name: &str, value: Option<&str>) -> bool {
    doc.name(node) == Some(name)
        && value.is_none_or(|v| doc.text_content(node).as_deref() == Some(v))
}

/// First child of `parent` named `name` (and holding exactly `value`, if given).
pub fn find_child(
    doc: &XmlDocument,
    parent: NodeId,
    name: &str,
    value: Option<&str>,
) -> Option<NodeId> {
    doc.element_children(parent)
        .find(|&child| matches(doc, child, name, value))
}

/// Like [`find_child`], but appends a new child when none matches.
pub fn find_or_create_child(
    doc: &mut XmlDocument,
    parent: NodeId,
    name: &str,
    value: Option<&str>,
) -> NodeId {
    if let Some(found) = find_child(doc, parent, name, value) {
        return found;
    }
    let child = doc.append_element(parent, name);
    if let Some(value) = value {
        doc.set_text_content(child, value);
    }
    child
}

/// First child named `name` that has a `field` child holding exactly `key`.
///
/// This is how keyed records are found: an article by its SUPPLIER_AID, a
/// feature by its FID, and so on.
pub fn find_keyed_child(
    doc: &XmlDocument,
    parent: NodeId,
    name: &str,
    field: &str,
    key: &str,
) -> Option<NodeId> {
    doc.element_children(parent).find(|&child| {
        doc.name(child) == Some(name) && find_child(doc, child, field, Some(key)).is_some()
    })
}

/// Number of children named `name` (and holding `value`, if given).
pub fn count_children(
    doc: &XmlDocument,
    parent: NodeId,
    name: &str,
    value: Option<&str>,
) -> usize {
    doc.element_children(parent)
        .filter(|&child| matches(doc, child, name, value))
        .count()
}

/// The `n`-th (zero-based) child named `name`.
pub fn nth_child(doc: &XmlDocument, parent: NodeId, name: &str, n: usize) -> Option<NodeId> {
    doc.element_children(parent)
        .filter(|&child| doc.name(child) == Some(name))
        .nth(n)
}

/// The next sibling after `node` that has the same tag name.
pub fn next_same_name_sibling(doc: &XmlDocument, node: NodeId) -> Option<NodeId> {
    let name = doc.name(node)?;
    let parent = doc.parent(node)?;
    let siblings = doc.children(parent);
    let position = siblings.iter().position(|&s| s == node)?;
    siblings[position + 1..]
        .iter()
        .copied()
        .find(|&s| doc.name(s) == Some(name))
}

/// Unlink and free `node` with its subtree. `false` when there is nothing to
/// delete.
pub fn delete_node(doc: &mut XmlDocument, node: Option<NodeId>) -> bool {
    node.is_some_and(|n| doc.remove(n))
}

/// Set the text of the first child named `name`, creating it when `create`
/// is set. Returns `false` if the child is missing and was not created.
pub fn set_child_text(
    doc: &mut XmlDocument,
    parent: NodeId,
    name: &str,
    value: &str,
    create: bool,
) -> bool {
    let child = match find_child(doc, parent, name, None) {
        Some(child) => child,
        None if create => doc.append_element(parent, name),
        None => return false,
    };
    doc.set_text_content(child, value);
    true
}

/// Text content of the first child named `name`.
pub fn child_text(doc: &XmlDocument, parent: NodeId, name: &str) -> Option<String> {
    find_child(doc, parent, name, None).and_then(|child| doc.text_content(child))
}

/// Copy `text` into `buf` as a NUL-terminated byte string.
///
/// At most `buf.len() - 1` bytes are copied and a terminating NUL is always
/// written when `buf` is non-empty. Returns the space needed for the whole
/// text, terminator included; a return value larger than `buf.len()` means
/// the copy was truncated.
pub fn copy_str(text: &str, buf: &mut [u8]) -> usize {
    let bytes = text.as_bytes();
    if let Some(room) = buf.len().checked_sub(1) {
        let n = bytes.len().min(room);
        buf[..n].copy_from_slice(&bytes[..n]);
        buf[n] = 0;
    }
    bytes.len() + 1
}

/// [`copy_str`] applied to the text content of `node`.
///
/// A missing node writes an empty string and returns 0; an empty element
/// returns 1.
pub fn copy_text_content(doc: &XmlDocument, node: Option<NodeId>, buf: &mut [u8]) -> usize {
    match node.and_then(|n| doc.text_content(n)) {
        Some(text) => copy_str(&text, buf),
        None => {
            if let Some(first) = buf.first_mut() {
                *first = 0;
            }
            0
        }
    }
}
