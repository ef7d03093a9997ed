//! Article CRUD keyed by supplier article id (AID).

use crate::catalog::{ArticleKey, Catalog};
use crate::error::{ErrorKind, Result};
use crate::schema::tag;
use crate::tree::{
    child_text, copy_text_content, count_children, find_child, find_keyed_child, find_or_create_child,
    set_child_text,
};
use catner_xml::NodeId;

impl Catalog {
    /// The article whose `SUPPLIER_AID` equals `aid`.
    pub fn find_article(&self, aid: &str) -> Option<NodeId> {
        find_keyed_child(&self.doc, self.anchors.articles, tag::ARTICLE, tag::AID, aid)
    }

    /// Add an article. Fails with [`ErrorKind::AlreadyExists`] if `aid` is
    /// taken, leaving the existing article untouched.
    pub fn add_article(&mut self, aid: &str, title: Option<&str>, descr: Option<&str>) -> Result<()> {
        if aid.is_empty() {
            return Err(self.fail(ErrorKind::InvalidValue, "article id must not be empty"));
        }
        if self.find_article(aid).is_some() {
            return Err(self.fail(ErrorKind::AlreadyExists, format!("article `{aid}` already exists")));
        }

        let article = self.doc.append_element(self.anchors.articles, tag::ARTICLE);
        self.doc.append_text_element(article, tag::AID, aid);
        let details = self.doc.append_element(article, tag::DETAILS);
        if let Some(title) = title {
            self.doc.append_text_element(details, tag::TITLE, title);
        }
        if let Some(descr) = descr {
            self.doc.append_text_element(details, tag::DESCR, descr);
        }
        tracing::debug!(aid, "added article");
        Ok(())
    }

    pub(crate) fn set_article_id_at(&mut self, key: ArticleKey<'_>, new_aid: &str) -> Result<()> {
        let article = self.resolve_article(key)?;
        if new_aid.is_empty() {
            return Err(self.fail(ErrorKind::InvalidValue, "article id must not be empty"));
        }
        if self.find_article(new_aid).is_some_and(|other| other != article) {
            return Err(self.fail(ErrorKind::AlreadyExists, format!("article `{new_aid}` already exists")));
        }
        set_child_text(&mut self.doc, article, tag::AID, new_aid, true);
        tracing::debug!(aid = new_aid, "renamed article");
        Ok(())
    }

    /// Change an article's AID.
    pub fn set_article_id(&mut self, aid: &str, new_aid: &str) -> Result<()> {
        self.set_article_id_at(ArticleKey::Aid(aid), new_aid)
    }

    pub(crate) fn set_article_detail_at(&mut self, key: ArticleKey<'_>, field: &str, value: &str) -> Result<()> {
        let article = self.resolve_article(key)?;
        let details = find_or_create_child(&mut self.doc, article, tag::DETAILS, None);
        set_child_text(&mut self.doc, details, field, value, true);
        Ok(())
    }

    /// Set the short description (title) of an article.
    pub fn set_article_title(&mut self, aid: &str, title: &str) -> Result<()> {
        self.set_article_detail_at(ArticleKey::Aid(aid), tag::TITLE, title)
    }

    /// Set the long description of an article.
    pub fn set_article_descr(&mut self, aid: &str, descr: &str) -> Result<()> {
        self.set_article_detail_at(ArticleKey::Aid(aid), tag::DESCR, descr)
    }

    pub(crate) fn article_detail_at(&self, key: ArticleKey<'_>, field: &str) -> Result<Option<String>> {
        let article = self.resolve_article(key)?;
        Ok(find_child(&self.doc, article, tag::DETAILS, None)
            .and_then(|details| child_text(&self.doc, details, field)))
    }

    pub fn article_title(&self, aid: &str) -> Result<Option<String>> {
        self.article_detail_at(ArticleKey::Aid(aid), tag::TITLE)
    }

    pub fn article_descr(&self, aid: &str) -> Result<Option<String>> {
        self.article_detail_at(ArticleKey::Aid(aid), tag::DESCR)
    }

    /// Copy the title into `buf`, NUL-terminated. Returns the size a full
    /// copy needs, or 0 when the article has no title.
    pub fn copy_article_title(&self, aid: &str, buf: &mut [u8]) -> Result<usize> {
        let article = self.resolve_article(ArticleKey::Aid(aid))?;
        let title = find_child(&self.doc, article, tag::DETAILS, None)
            .and_then(|details| find_child(&self.doc, details, tag::TITLE, None));
        Ok(copy_text_content(&self.doc, title, buf))
    }

    pub(crate) fn delete_article_at(&mut self, key: ArticleKey<'_>) -> Result<()> {
        let article = self.resolve_article(key)?;
        self.remove_node(article);
        tracing::debug!(?key, "deleted article");
        Ok(())
    }

    /// Delete an article with everything below it.
    pub fn delete_article(&mut self, aid: &str) -> Result<()> {
        self.delete_article_at(ArticleKey::Aid(aid))
    }

    pub fn num_articles(&self) -> usize {
        count_children(&self.doc, self.anchors.articles, tag::ARTICLE, None)
    }

    /// AIDs of all articles in document order.
    pub fn article_ids(&self) -> Vec<String> {
        self.doc
            .element_children(self.anchors.articles)
            .filter(|&a| self.doc.name(a) == Some(tag::ARTICLE))
            .filter_map(|a| child_text(&self.doc, a, tag::AID))
            .collect()
    }
}
