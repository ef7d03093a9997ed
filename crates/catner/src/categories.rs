//! Category references (`ARTICLE_REFERENCE/CATALOG_ID`).

use crate::catalog::{ArticleKey, Catalog};
use crate::error::{ErrorKind, Result};
use crate::schema::tag;
use crate::tree::{child_text, count_children, find_keyed_child};

impl Catalog {
    pub(crate) fn add_category_at(&mut self, key: ArticleKey<'_>, id: &str) -> Result<()> {
        let article = self.resolve_article(key)?;
        if find_keyed_child(&self.doc, article, tag::CATEGORY, tag::CATEGORY_ID, id).is_some() {
            return Err(self.fail(ErrorKind::AlreadyExists, format!("category `{id}` already exists")));
        }
        let reference = self.doc.append_element(article, tag::CATEGORY);
        self.doc.append_text_element(reference, tag::CATEGORY_ID, id);
        tracing::debug!(category = id, "added category");
        Ok(())
    }

    /// Associate an article with a category id.
    pub fn add_category(&mut self, aid: &str, id: &str) -> Result<()> {
        self.add_category_at(ArticleKey::Aid(aid), id)
    }

    pub(crate) fn delete_category_at(&mut self, key: ArticleKey<'_>, id: &str) -> Result<()> {
        let article = self.resolve_article(key)?;
        let Some(reference) = find_keyed_child(&self.doc, article, tag::CATEGORY, tag::CATEGORY_ID, id)
        else {
            return Err(self.fail(ErrorKind::NoSuchNode, format!("no category `{id}`")));
        };
        self.remove_node(reference);
        tracing::debug!(category = id, "deleted category");
        Ok(())
    }

    pub fn delete_category(&mut self, aid: &str, id: &str) -> Result<()> {
        self.delete_category_at(ArticleKey::Aid(aid), id)
    }

    pub(crate) fn categories_at(&self, key: ArticleKey<'_>) -> Result<Vec<String>> {
        let article = self.resolve_article(key)?;
        Ok(self
            .doc
            .element_children(article)
            .filter(|&c| self.doc.name(c) == Some(tag::CATEGORY))
            .filter_map(|c| child_text(&self.doc, c, tag::CATEGORY_ID))
            .collect())
    }

    pub fn categories(&self, aid: &str) -> Result<Vec<String>> {
        self.categories_at(ArticleKey::Aid(aid))
    }

    pub(crate) fn num_categories_at(&self, key: ArticleKey<'_>) -> Result<usize> {
        let article = self.resolve_article(key)?;
        Ok(count_children(&self.doc, article, tag::CATEGORY, None))
    }

    pub fn num_categories(&self, aid: &str) -> Result<usize> {
        self.num_categories_at(ArticleKey::Aid(aid))
    }
}
