//! Order units (`ARTICLE_ORDER_DETAILS`).
//!
//! Each article has at most one main unit (`ORDER_UNIT`) and any number of
//! alternative units, each a code with a conversion factor. The first unit
//! added to an article also becomes its main unit.

use crate::catalog::{ArticleKey, Catalog};
use crate::error::Result;
use crate::schema::tag;
use crate::tree::{child_text, count_children, find_child, find_keyed_child, find_or_create_child, set_child_text};
use catner_xml::NodeId;
use serde::Serialize;

/// An alternative unit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    pub code: String,
    pub factor: String,
}

impl Catalog {
    fn unit_container(&self, article: NodeId) -> Option<NodeId> {
        find_child(&self.doc, article, tag::UNITS, None)
    }

    pub(crate) fn add_unit_at(
        &mut self,
        key: ArticleKey<'_>,
        code: Option<&str>,
        factor: Option<&str>,
        is_main: bool,
    ) -> Result<()> {
        let article = self.resolve_article(key)?;
        let code = code.map_or_else(|| self.defaults.unit_code.clone(), str::to_string);
        let factor = factor.map_or_else(|| self.defaults.unit_factor.clone(), str::to_string);

        let units = find_or_create_child(&mut self.doc, article, tag::UNITS, None);
        let alternative = find_keyed_child(&self.doc, units, tag::ALT_UNIT, tag::ALT_UNIT_CODE, &code);

        match find_child(&self.doc, units, tag::MAIN_UNIT, None) {
            None => {
                self.doc.append_text_element(units, tag::MAIN_UNIT, &code);
            }
            Some(main) if is_main => self.doc.set_text_content(main, &code),
            Some(_) => {}
        }

        match alternative {
            Some(existing) => {
                set_child_text(&mut self.doc, existing, tag::ALT_UNIT_FACTOR, &factor, true);
                tracing::debug!(%code, %factor, "updated unit factor");
            }
            None => {
                let unit = self.doc.append_element(units, tag::ALT_UNIT);
                self.doc.append_text_element(unit, tag::ALT_UNIT_CODE, &code);
                self.doc.append_text_element(unit, tag::ALT_UNIT_FACTOR, &factor);
                tracing::debug!(%code, %factor, "added unit");
            }
        }
        Ok(())
    }

    /// Add or update an order unit.
    ///
    /// `code` and `factor` fall back to the configured defaults. The unit
    /// becomes the main unit when the article has none yet, or when
    /// `is_main` is set. Re-adding a known code overwrites its factor.
    pub fn add_unit(&mut self, aid: &str, code: Option<&str>, factor: Option<&str>, is_main: bool) -> Result<()> {
        self.add_unit_at(ArticleKey::Aid(aid), code, factor, is_main)
    }

    pub(crate) fn main_unit_at(&self, key: ArticleKey<'_>) -> Result<Option<String>> {
        let article = self.resolve_article(key)?;
        Ok(self
            .unit_container(article)
            .and_then(|units| child_text(&self.doc, units, tag::MAIN_UNIT)))
    }

    pub fn main_unit(&self, aid: &str) -> Result<Option<String>> {
        self.main_unit_at(ArticleKey::Aid(aid))
    }

    pub(crate) fn units_at(&self, key: ArticleKey<'_>) -> Result<Vec<Unit>> {
        let article = self.resolve_article(key)?;
        let Some(units) = self.unit_container(article) else {
            return Ok(Vec::new());
        };
        Ok(self
            .doc
            .element_children(units)
            .filter(|&u| self.doc.name(u) == Some(tag::ALT_UNIT))
            .map(|u| self.unit_record(u))
            .collect())
    }

    pub(crate) fn unit_record(&self, unit: NodeId) -> Unit {
        Unit {
            code: child_text(&self.doc, unit, tag::ALT_UNIT_CODE).unwrap_or_default(),
            factor: child_text(&self.doc, unit, tag::ALT_UNIT_FACTOR).unwrap_or_default(),
        }
    }

    /// Alternative units of an article, in document order.
    pub fn units(&self, aid: &str) -> Result<Vec<Unit>> {
        self.units_at(ArticleKey::Aid(aid))
    }

    pub(crate) fn num_units_at(&self, key: ArticleKey<'_>) -> Result<usize> {
        let article = self.resolve_article(key)?;
        Ok(self
            .unit_container(article)
            .map_or(0, |units| count_children(&self.doc, units, tag::ALT_UNIT, None)))
    }

    pub fn num_units(&self, aid: &str) -> Result<usize> {
        self.num_units_at(ArticleKey::Aid(aid))
    }
}
