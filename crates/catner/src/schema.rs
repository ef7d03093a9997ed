//! BMEcat tag names and the mandatory document anchors.

use crate::error::{Error, ErrorKind, Result};
use crate::tree::find_child;
use catner_xml::{NodeId, XmlDocument};

/// Value of the root `version` attribute.
pub const BMECAT_VERSION: &str = "2005";

/// Default namespace declared on the root element.
pub const BMECAT_NAMESPACE: &str = "http://www.bmecat.org/bmecat/2005.1";

/// Element names, spelled as they appear in BMEcat documents.
pub mod tag {
    pub const ROOT: &str = "BMECAT";
    pub const HEADER: &str = "HEADER";
    pub const CATALOG: &str = "CATALOG";
    pub const LOCALE: &str = "LOCALE";
    pub const TERRITORY: &str = "TERRITORY";
    pub const GENERATOR: &str = "GENERATOR_INFO";
    pub const ARTICLES: &str = "T_NEW_CATALOG";

    pub const ARTICLE: &str = "ARTICLE";
    pub const AID: &str = "SUPPLIER_AID";
    pub const DETAILS: &str = "ARTICLE_DETAILS";
    pub const TITLE: &str = "DESCRIPTION_SHORT";
    pub const DESCR: &str = "DESCRIPTION_LONG";

    pub const UNITS: &str = "ARTICLE_ORDER_DETAILS";
    pub const MAIN_UNIT: &str = "ORDER_UNIT";
    pub const ALT_UNIT: &str = "ALTERNATIVE_UNIT";
    pub const ALT_UNIT_CODE: &str = "ALTERNATIVE_UNIT_CODE";
    pub const ALT_UNIT_FACTOR: &str = "ALTERNATIVE_UNIT_FACTOR";

    pub const CATEGORY: &str = "ARTICLE_REFERENCE";
    pub const CATEGORY_ID: &str = "CATALOG_ID";

    pub const IMAGES: &str = "MIME_INFO";
    pub const IMAGE: &str = "MIME";
    pub const IMAGE_MIME: &str = "MIME_TYPE";
    pub const IMAGE_PATH: &str = "MIME_SOURCE";

    pub const FEATURES: &str = "ARTICLE_FEATURES";
    pub const FEATURE: &str = "FEATURE";
    pub const FID: &str = "FID";
    pub const FNAME: &str = "FNAME";
    pub const FDESCR: &str = "FDESCR";
    pub const FUNIT: &str = "FUNIT";
    pub const FORDER: &str = "FORDER";
    pub const FVALUE: &str = "FVALUE";

    pub const VARIANTS: &str = "VARIANTS";
    pub const VARIANT: &str = "VARIANT";
    pub const VID: &str = "SUPPLIER_AID_SUPPLEMENT";
}

/// The four elements every catalog document must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchors {
    pub root: NodeId,
    pub header: NodeId,
    /// `HEADER/CATALOG`: locale and territories.
    pub catalog: NodeId,
    /// `T_NEW_CATALOG`: parent of all articles.
    pub articles: NodeId,
}

impl Anchors {
    /// Build the skeleton in an empty document, replacing any existing root.
    pub fn create(doc: &mut XmlDocument) -> Self {
        let root = new_root(doc);
        let header = doc.append_element(root, tag::HEADER);
        let articles = doc.append_element(root, tag::ARTICLES);
        let catalog = doc.append_element(header, tag::CATALOG);
        Self {
            root,
            header,
            catalog,
            articles,
        }
    }

    /// Locate the anchors in a loaded document.
    ///
    /// With `amend` set, missing anchors are created instead of failing. A
    /// root element other than `BMECAT` is always rejected.
    pub fn bind(doc: &mut XmlDocument, amend: bool) -> Result<Self> {
        let root = match doc.root() {
            Some(root) if doc.name(root) == Some(tag::ROOT) => root,
            Some(root) => {
                let found = doc.name(root).unwrap_or_default();
                return Err(Error::new(
                    ErrorKind::StructuralLoadFailure,
                    format!("root element is <{found}>, expected <{}>", tag::ROOT),
                ));
            }
            None if amend => {
                tracing::warn!(anchor = tag::ROOT, "document is empty, creating skeleton");
                new_root(doc)
            }
            None => return Err(missing(tag::ROOT)),
        };

        let header = match find_child(doc, root, tag::HEADER, None) {
            Some(header) => header,
            None if amend => {
                tracing::warn!(anchor = tag::HEADER, "creating missing anchor");
                let header = doc.create_element(tag::HEADER);
                doc.insert_child(root, 0, header);
                header
            }
            None => return Err(missing(tag::HEADER)),
        };
        let articles = bind_child(doc, root, tag::ARTICLES, amend)?;
        let catalog = bind_child(doc, header, tag::CATALOG, amend)?;

        Ok(Self {
            root,
            header,
            catalog,
            articles,
        })
    }
}

fn new_root(doc: &mut XmlDocument) -> NodeId {
    let root = doc.create_element(tag::ROOT);
    doc.set_attribute(root, "version", BMECAT_VERSION);
    doc.set_attribute(root, "xmlns", BMECAT_NAMESPACE);
    doc.set_root(root);
    root
}

fn bind_child(doc: &mut XmlDocument, parent: NodeId, name: &str, amend: bool) -> Result<NodeId> {
    if let Some(found) = find_child(doc, parent, name, None) {
        return Ok(found);
    }
    if !amend {
        return Err(missing(name));
    }
    tracing::warn!(anchor = name, "creating missing anchor");
    Ok(doc.append_element(parent, name))
}

fn missing(name: &str) -> Error {
    Error::new(
        ErrorKind::StructuralLoadFailure,
        format!("mandatory element <{name}> is missing"),
    )
}
