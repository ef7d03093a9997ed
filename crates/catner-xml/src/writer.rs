//! Indented serialization of [`XmlDocument`]s.

use crate::{Error, NodeId, NodeKind, Result, XmlDocument};
use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;
use std::path::Path;

/// XML version written in the declaration.
pub const XML_VERSION: &str = "1.0";

/// Encoding written in the declaration. Output is always UTF-8.
pub const XML_ENCODING: &str = "utf-8";

/// Options controlling serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl XmlDocument {
    /// Serialize the document to `sink`.
    ///
    /// Elements holding only text are written on one line, elements without
    /// children are written as `<TAG/>`, and the output ends with a newline.
    pub fn write<W: Write>(&self, sink: W, options: WriteOptions) -> Result<()> {
        let mut writer = Writer::new_with_indent(sink, b' ', options.indent);
        writer.write_event(Event::Decl(BytesDecl::new(
            XML_VERSION,
            Some(XML_ENCODING),
            None,
        )))?;
        if let Some(root) = self.root() {
            self.write_node(&mut writer, root)?;
        }
        writer.get_mut().write_all(b"\n")?;
        writer.get_mut().flush()?;
        Ok(())
    }

    fn write_node<W: Write>(&self, writer: &mut Writer<W>, id: NodeId) -> Result<()> {
        let Some(node) = self.node(id) else {
            return Ok(());
        };
        match &node.kind {
            NodeKind::Text(text) => {
                let escaped = partial_escape(text.as_str());
                writer.write_event(Event::Text(BytesText::from_escaped(escaped)))?;
            }
            NodeKind::Element(data) => {
                let qualified = match &data.prefix {
                    Some(prefix) => format!("{}:{}", prefix, data.name),
                    None => data.name.clone(),
                };
                let mut start = BytesStart::new(qualified.as_str());
                for attr in &data.attributes {
                    start.push_attribute((attr.name.as_str(), attr.value.as_str()));
                }

                let children = self.children(id);
                if children.is_empty() {
                    writer.write_event(Event::Empty(start))?;
                } else {
                    writer.write_event(Event::Start(start))?;
                    for &child in children {
                        self.write_node(writer, child)?;
                    }
                    writer.write_event(Event::End(BytesEnd::new(qualified.as_str())))?;
                }
            }
        }
        Ok(())
    }

    /// Serialize the document into a string.
    pub fn to_string_pretty(&self, options: WriteOptions) -> Result<String> {
        let mut buffer = Vec::new();
        self.write(&mut buffer, options)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Serialize the document into the file at `path`, replacing it.
    pub fn write_file(&self, path: impl AsRef<Path>, options: WriteOptions) -> Result<()> {
        let path = path.as_ref();
        let io_err = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = std::fs::File::create(path).map_err(io_err)?;
        self.write(std::io::BufWriter::new(file), options)?;
        tracing::debug!(path = %path.display(), "wrote XML file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn sample() -> XmlDocument {
        let mut doc = XmlDocument::new();
        let root = doc.create_element("BMECAT");
        doc.set_attribute(root, "version", "2005");
        doc.set_root(root);
        let header = doc.append_element(root, "HEADER");
        doc.append_text_element(header, "GENERATOR_INFO", "catner");
        doc.append_element(root, "T_NEW_CATALOG");
        doc
    }

    #[test]
    fn test_write_indented() {
        let out = sample().to_string_pretty(WriteOptions::default()).unwrap();
        insta::assert_snapshot!(out, @r#"
        <?xml version="1.0" encoding="utf-8"?>
        <BMECAT version="2005">
          <HEADER>
            <GENERATOR_INFO>catner</GENERATOR_INFO>
          </HEADER>
          <T_NEW_CATALOG/>
        </BMECAT>
        "#);
    }

    #[test]
    fn test_write_escapes_markup_characters() {
        let mut doc = XmlDocument::new();
        let root = doc.create_element("root");
        doc.set_root(root);
        doc.append_text_element(root, "t", "a < b & c");
        let out = doc.to_string_pretty(WriteOptions::default()).unwrap();
        assert!(out.contains("<t>a &lt; b &amp; c</t>"), "{}", out);
    }

    #[test]
    fn test_write_then_parse_preserves_structure() {
        let doc = sample();
        let out = doc.to_string_pretty(WriteOptions::default()).unwrap();
        let reparsed = parse(&out).unwrap();
        let again = reparsed.to_string_pretty(WriteOptions::default()).unwrap();
        assert_eq!(out, again);
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xml");
        sample().write_file(&path, WriteOptions { indent: 4 }).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n"));
        assert!(content.contains("\n    <HEADER>"));
    }

    #[test]
    fn test_write_document_without_root() {
        let out = XmlDocument::new()
            .to_string_pretty(WriteOptions::default())
            .unwrap();
        assert_eq!(out, "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    }
}
