//! The [`Catalog`] handle: lifecycle, header singletons and shared plumbing
//! for the article, feature and cursor operations.

use crate::config::CatalogDefaults;
use crate::cursor::Selection;
use crate::error::{Error, ErrorKind, Result};
use crate::schema::{Anchors, tag};
use crate::tree::{
    child_text, copy_str, count_children, delete_node, find_child, find_or_create_child, set_child_text,
};
use catner_xml::{NodeId, WriteOptions, XmlDocument};
use std::cell::Cell;
use std::path::{Path, PathBuf};

/// Path understood by [`Catalog::write_to`] as standard output.
pub const STDOUT_PATH: &str = "-";

/// An in-memory BMEcat catalog.
///
/// Owns the XML document, its anchors, the selection cursor and the
/// last-error slot. All operations keep the catalog invariants (unique keys,
/// contiguous feature order, cursor slots pointing at live nodes) intact.
///
/// # Example
///
/// ```rust
/// use catner::Catalog;
///
/// let mut catalog = Catalog::new();
/// catalog.set_generator("catner").unwrap();
/// catalog.add_article("SRTS62", Some("Roststufe"), None).unwrap();
/// assert_eq!(catalog.num_articles(), 1);
/// assert!(catalog.to_xml_string().unwrap().contains("<SUPPLIER_AID>SRTS62</SUPPLIER_AID>"));
/// ```
#[derive(Debug)]
pub struct Catalog {
    pub(crate) doc: XmlDocument,
    pub(crate) anchors: Anchors,
    pub(crate) cursor: Selection,
    pub(crate) defaults: CatalogDefaults,
    origin: Option<PathBuf>,
    last_error: Cell<Option<ErrorKind>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

/// How an operation names its article: by AID or through the cursor.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ArticleKey<'a> {
    Aid(&'a str),
    Selected,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum FeatureKey<'a> {
    Fid(&'a str),
    Selected,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum VariantKey<'a> {
    Vid(&'a str),
    Selected,
}

impl Catalog {
    /// Create an empty catalog with the mandatory skeleton.
    pub fn new() -> Self {
        Self::with_defaults(CatalogDefaults::default())
    }

    pub fn with_defaults(defaults: CatalogDefaults) -> Self {
        let mut doc = XmlDocument::new();
        let anchors = Anchors::create(&mut doc);
        Self::assemble(doc, anchors, defaults, None)
    }

    /// Load a catalog from `path`.
    ///
    /// With `amend` set, missing mandatory elements are created; otherwise a
    /// document lacking one fails with
    /// [`ErrorKind::StructuralLoadFailure`]. The path is kept for
    /// [`Catalog::save`].
    pub fn load(path: impl AsRef<Path>, amend: bool) -> Result<Self> {
        let path = path.as_ref();
        let mut doc = catner_xml::parse_file(path)?;
        let anchors = Anchors::bind(&mut doc, amend)?;
        tracing::info!(path = %path.display(), amend, "loaded catalog");
        Ok(Self::assemble(
            doc,
            anchors,
            CatalogDefaults::default(),
            Some(path.to_path_buf()),
        ))
    }

    /// Build a catalog from XML text. The result has no origin path.
    pub fn from_xml_str(content: &str, amend: bool) -> Result<Self> {
        let mut doc = catner_xml::parse(content)?;
        let anchors = Anchors::bind(&mut doc, amend)?;
        Ok(Self::assemble(doc, anchors, CatalogDefaults::default(), None))
    }

    fn assemble(
        doc: XmlDocument,
        anchors: Anchors,
        defaults: CatalogDefaults,
        origin: Option<PathBuf>,
    ) -> Self {
        Self {
            doc,
            anchors,
            cursor: Selection::default(),
            defaults,
            origin,
            last_error: Cell::new(None),
        }
    }

    pub fn defaults(&self) -> &CatalogDefaults {
        &self.defaults
    }

    /// Replace the defaults used by subsequent operations.
    pub fn set_defaults(&mut self, defaults: CatalogDefaults) {
        self.defaults = defaults;
    }

    /// The underlying XML document.
    pub fn document(&self) -> &XmlDocument {
        &self.doc
    }

    pub fn anchors(&self) -> Anchors {
        self.anchors
    }

    /// The file this catalog was loaded from, if any.
    pub fn origin_path(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Kind of the most recent failure, clearing the slot.
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error.take()
    }

    pub(crate) fn fail(&self, kind: ErrorKind, message: impl Into<String>) -> Error {
        self.last_error.set(Some(kind));
        Error::new(kind, message)
    }

    fn record(&self, err: impl Into<Error>) -> Error {
        let err = err.into();
        self.last_error.set(Some(err.kind()));
        err
    }

    fn write_options(&self) -> WriteOptions {
        WriteOptions {
            indent: self.defaults.indent,
        }
    }

    // -- output --------------------------------------------------------------

    /// Serialize the catalog to `path`; [`STDOUT_PATH`] writes to stdout.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path == Path::new(STDOUT_PATH) {
            return self.print();
        }
        self.doc
            .write_file(path, self.write_options())
            .map_err(|e| self.record(e))?;
        tracing::info!(path = %path.display(), "wrote catalog");
        Ok(())
    }

    /// Serialize the catalog to standard output.
    pub fn print(&self) -> Result<()> {
        let stdout = std::io::stdout();
        self.doc
            .write(stdout.lock(), self.write_options())
            .map_err(|e| self.record(e))
    }

    pub fn to_xml_string(&self) -> Result<String> {
        self.doc
            .to_string_pretty(self.write_options())
            .map_err(|e| self.record(e))
    }

    /// Write the catalog back to the file it was loaded from.
    pub fn save(&self) -> Result<()> {
        let Some(origin) = self.origin.as_deref() else {
            return Err(self.fail(
                ErrorKind::NoOriginPath,
                "catalog was not loaded from a file",
            ));
        };
        self.write_to(origin)
    }

    // -- key resolution ------------------------------------------------------

    pub(crate) fn selected_article(&self) -> Result<NodeId> {
        self.cursor
            .article
            .filter(|&a| self.doc.is_alive(a))
            .ok_or_else(|| self.fail(ErrorKind::NoSelectionArticle, "no article is selected"))
    }

    pub(crate) fn selected_feature(&self) -> Result<NodeId> {
        self.cursor
            .feature
            .filter(|&f| self.doc.is_alive(f))
            .ok_or_else(|| self.fail(ErrorKind::NoSelectionFeature, "no feature is selected"))
    }

    pub(crate) fn selected_variant(&self) -> Result<NodeId> {
        self.cursor
            .variant
            .filter(|&v| self.doc.is_alive(v))
            .ok_or_else(|| self.fail(ErrorKind::NoSelectionVariant, "no variant is selected"))
    }

    pub(crate) fn resolve_article(&self, key: ArticleKey<'_>) -> Result<NodeId> {
        match key {
            ArticleKey::Aid(aid) => self
                .find_article(aid)
                .ok_or_else(|| self.fail(ErrorKind::NoSuchArticle, format!("no article `{aid}`"))),
            ArticleKey::Selected => self.selected_article(),
        }
    }

    pub(crate) fn resolve_feature(&self, article: NodeId, key: FeatureKey<'_>) -> Result<NodeId> {
        match key {
            FeatureKey::Fid(fid) => self
                .find_feature(article, fid)
                .ok_or_else(|| self.fail(ErrorKind::NoSuchFeature, format!("no feature `{fid}`"))),
            FeatureKey::Selected => self.selected_feature(),
        }
    }

    pub(crate) fn resolve_variant(&self, feature: NodeId, key: VariantKey<'_>) -> Result<NodeId> {
        match key {
            VariantKey::Vid(vid) => self
                .find_variant(feature, vid)
                .ok_or_else(|| self.fail(ErrorKind::NoSuchVariant, format!("no variant `{vid}`"))),
            VariantKey::Selected => self.selected_variant(),
        }
    }

    /// Remove `node` and drop any cursor slot left pointing into it.
    pub(crate) fn remove_node(&mut self, node: NodeId) {
        delete_node(&mut self.doc, Some(node));
        self.cursor.retain_live(&self.doc);
    }

    // -- header --------------------------------------------------------------

    /// Set the catalog language, a two-character code such as `EN`.
    pub fn set_locale(&mut self, value: &str) -> Result<()> {
        self.check_two_chars("locale", value)?;
        set_child_text(&mut self.doc, self.anchors.catalog, tag::LOCALE, value, true);
        tracing::debug!(locale = value, "set locale");
        Ok(())
    }

    pub fn locale(&self) -> Option<String> {
        child_text(&self.doc, self.anchors.catalog, tag::LOCALE)
    }

    /// Add a two-character territory code. Adding a present code is a no-op.
    pub fn add_territory(&mut self, value: &str) -> Result<()> {
        self.check_two_chars("territory", value)?;
        find_or_create_child(&mut self.doc, self.anchors.catalog, tag::TERRITORY, Some(value));
        tracing::debug!(territory = value, "added territory");
        Ok(())
    }

    pub fn delete_territory(&mut self, value: &str) -> Result<()> {
        let Some(node) = find_child(&self.doc, self.anchors.catalog, tag::TERRITORY, Some(value))
        else {
            return Err(self.fail(ErrorKind::NoSuchNode, format!("no territory `{value}`")));
        };
        self.remove_node(node);
        tracing::debug!(territory = value, "deleted territory");
        Ok(())
    }

    pub fn territories(&self) -> Vec<String> {
        self.doc
            .element_children(self.anchors.catalog)
            .filter(|&c| self.doc.name(c) == Some(tag::TERRITORY))
            .filter_map(|c| self.doc.text_content(c))
            .collect()
    }

    /// Copy the territory codes, comma separated, into `buf` as a
    /// NUL-terminated string. Returns the size a full copy needs.
    pub fn copy_territories(&self, buf: &mut [u8]) -> usize {
        copy_str(&self.territories().join(","), buf)
    }

    pub fn num_territories(&self) -> usize {
        count_children(&self.doc, self.anchors.catalog, tag::TERRITORY, None)
    }

    fn generator_node(&self) -> Option<NodeId> {
        find_child(&self.doc, self.anchors.header, tag::GENERATOR, None)
    }

    /// Set the generator info, creating the element if needed.
    pub fn set_generator(&mut self, value: &str) -> Result<()> {
        match self.generator_node() {
            Some(node) => self.doc.set_text_content(node, value),
            None => self.insert_generator(value),
        }
        Ok(())
    }

    /// Create the generator info; fails if one is already present.
    pub fn add_generator(&mut self, value: &str) -> Result<()> {
        if self.generator_node().is_some() {
            return Err(self.fail(ErrorKind::AlreadyExists, "generator info is already set"));
        }
        self.insert_generator(value);
        Ok(())
    }

    // GENERATOR_INFO precedes CATALOG inside HEADER.
    fn insert_generator(&mut self, value: &str) {
        let node = self.doc.create_element(tag::GENERATOR);
        self.doc.insert_child(self.anchors.header, 0, node);
        self.doc.set_text_content(node, value);
        tracing::debug!(generator = value, "added generator info");
    }

    pub fn generator(&self) -> Option<String> {
        self.generator_node().and_then(|n| self.doc.text_content(n))
    }

    pub fn delete_generator(&mut self) -> Result<()> {
        let Some(node) = self.generator_node() else {
            return Err(self.fail(ErrorKind::NoSuchNode, "no generator info"));
        };
        self.remove_node(node);
        Ok(())
    }

    fn check_two_chars(&self, what: &str, value: &str) -> Result<()> {
        if value.chars().count() == 2 {
            Ok(())
        } else {
            Err(self.fail(
                ErrorKind::InvalidValue,
                format!("{what} must be two characters, got `{value}`"),
            ))
        }
    }
}
