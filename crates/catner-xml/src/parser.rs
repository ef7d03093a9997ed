//! XML parser that builds [`XmlDocument`] arenas.

use crate::types::split_qualified;
use crate::{Error, NodeId, Result, XmlDocument};
use quick_xml::Reader;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use std::path::Path;

/// Parse XML from a string into a document.
///
/// Whitespace-only text between elements (indentation) is dropped; text
/// inside elements that hold no child elements is kept verbatim. An input
/// without any root element yields an empty document rather than an error,
/// so callers can decide whether to fill it in.
///
/// # Example
///
/// ```rust
/// use catner_xml::parse;
///
/// let doc = parse("<root><child>text</child></root>").unwrap();
/// let root = doc.root().unwrap();
/// assert_eq!(doc.name(root), Some("root"));
/// ```
///
/// # Errors
///
/// Returns an error if the XML is malformed.
pub fn parse(content: &str) -> Result<XmlDocument> {
    XmlParser::new(content).parse()
}

/// Read and parse the file at `path`.
pub fn parse_file(path: impl AsRef<Path>) -> Result<XmlDocument> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "parsing XML file");
    parse(&content)
}

/// Internal parser state.
struct XmlParser<'a> {
    /// The quick-xml reader.
    reader: Reader<&'a [u8]>,

    /// Document being built.
    doc: XmlDocument,

    /// Stack of open elements.
    stack: Vec<NodeId>,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            reader,
            doc: XmlDocument::new(),
            stack: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<XmlDocument> {
        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    let element = self.handle_start(&e)?;
                    self.stack.push(element);
                }
                Ok(Event::End(e)) => {
                    self.handle_end(e)?;
                }
                Ok(Event::Empty(e)) => {
                    self.handle_start(&e)?;
                }
                Ok(Event::Text(e)) => {
                    self.handle_text(e)?;
                }
                Ok(Event::CData(e)) => {
                    self.handle_cdata(e);
                }
                Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_)) => {
                    // Skip comments, processing instructions, and XML declarations
                }
                Ok(Event::DocType(_)) => {}
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlSyntax {
                        message: e.to_string(),
                        position: Some(self.reader.error_position()),
                    });
                }
            }
        }

        if let Some(&open) = self.stack.last() {
            let name = self.doc.name(open).unwrap_or_default().to_string();
            return Err(Error::UnexpectedEof {
                expected: format!("closing tag </{}>", name),
            });
        }

        Ok(self.doc)
    }

    /// Create the element for a start or empty tag and link it into the tree.
    fn handle_start(&mut self, e: &BytesStart<'_>) -> Result<NodeId> {
        let full_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let element = self.doc.create_element(&full_name);

        for attr_result in e.attributes() {
            let attr = attr_result?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.unescape_value().map_err(|err| Error::XmlSyntax {
                message: format!("Invalid attribute value: {}", err),
                position: Some(self.reader.buffer_position()),
            })?;
            self.doc.set_attribute(element, &key, &value);
        }

        match self.stack.last() {
            Some(&parent) => self.doc.append_child(parent, element),
            None => {
                if self.doc.root().is_some() {
                    return Err(Error::MultipleRoots);
                }
                self.doc.set_root(element);
            }
        }

        Ok(element)
    }

    fn handle_end(&mut self, e: BytesEnd<'_>) -> Result<()> {
        let end_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let (end_local_name, _) = split_qualified(&end_name);

        let node = self
            .stack
            .pop()
            .ok_or_else(|| Error::UnexpectedEndTag {
                name: end_name.clone(),
            })?;

        let open_name = self.doc.name(node).unwrap_or_default().to_string();
        if open_name != end_local_name {
            return Err(Error::MismatchedEndTag {
                expected: open_name,
                found: end_local_name,
            });
        }

        self.drop_indentation(node);
        Ok(())
    }

    /// Remove whitespace-only text from elements that also hold elements.
    fn drop_indentation(&mut self, node: NodeId) {
        if self.doc.element_children(node).next().is_none() {
            return;
        }
        let blanks: Vec<NodeId> = self
            .doc
            .children(node)
            .iter()
            .copied()
            .filter(|&c| {
                self.doc.element(c).is_none()
                    && self
                        .doc
                        .text_content(c)
                        .is_some_and(|t| t.trim().is_empty())
            })
            .collect();
        for blank in blanks {
            self.doc.remove(blank);
        }
    }

    fn handle_text(&mut self, e: BytesText<'_>) -> Result<()> {
        let text = e.unescape().map_err(|err| Error::XmlSyntax {
            message: format!("Invalid text content: {}", err),
            position: Some(self.reader.buffer_position()),
        })?;

        // Text outside the root element carries no content
        if let Some(&parent) = self.stack.last() {
            let node = self.doc.create_text(&text);
            self.doc.append_child(parent, node);
        }
        Ok(())
    }

    fn handle_cdata(&mut self, e: BytesCData<'_>) {
        let text = String::from_utf8_lossy(e.as_ref()).to_string();
        if let Some(&parent) = self.stack.last() {
            let node = self.doc.create_text(&text);
            self.doc.append_child(parent, node);
        }
    }
}
