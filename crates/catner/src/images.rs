//! Article images (`MIME_INFO/MIME`), keyed by source path.

use crate::catalog::{ArticleKey, Catalog};
use crate::error::{ErrorKind, Result};
use crate::schema::tag;
use crate::tree::{child_text, count_children, find_child, find_keyed_child, find_or_create_child};
use catner_xml::NodeId;

impl Catalog {
    fn image_container(&self, article: NodeId) -> Option<NodeId> {
        find_child(&self.doc, article, tag::IMAGES, None)
    }

    fn find_image(&self, article: NodeId, path: &str) -> Option<NodeId> {
        let images = self.image_container(article)?;
        find_keyed_child(&self.doc, images, tag::IMAGE, tag::IMAGE_PATH, path)
    }

    pub(crate) fn add_image_at(&mut self, key: ArticleKey<'_>, mime: Option<&str>, path: &str) -> Result<()> {
        let article = self.resolve_article(key)?;
        if self.find_image(article, path).is_some() {
            return Err(self.fail(ErrorKind::AlreadyExists, format!("image `{path}` already exists")));
        }
        let mime = mime.map_or_else(|| self.defaults.image_mime.clone(), str::to_string);

        let images = find_or_create_child(&mut self.doc, article, tag::IMAGES, None);
        let image = self.doc.append_element(images, tag::IMAGE);
        self.doc.append_text_element(image, tag::IMAGE_MIME, &mime);
        self.doc.append_text_element(image, tag::IMAGE_PATH, path);
        tracing::debug!(path, %mime, "added image");
        Ok(())
    }

    /// Attach an image to an article. `mime` defaults to the configured
    /// image MIME type. Paths are unique per article; the MIME type of an
    /// existing image is not changed.
    pub fn add_image(&mut self, aid: &str, mime: Option<&str>, path: &str) -> Result<()> {
        self.add_image_at(ArticleKey::Aid(aid), mime, path)
    }

    pub(crate) fn delete_image_at(&mut self, key: ArticleKey<'_>, path: &str) -> Result<()> {
        let article = self.resolve_article(key)?;
        let Some(image) = self.find_image(article, path) else {
            return Err(self.fail(ErrorKind::NoSuchNode, format!("no image `{path}`")));
        };
        self.remove_node(image);
        tracing::debug!(path, "deleted image");
        Ok(())
    }

    pub fn delete_image(&mut self, aid: &str, path: &str) -> Result<()> {
        self.delete_image_at(ArticleKey::Aid(aid), path)
    }

    pub(crate) fn image_paths_at(&self, key: ArticleKey<'_>) -> Result<Vec<String>> {
        let article = self.resolve_article(key)?;
        let Some(images) = self.image_container(article) else {
            return Ok(Vec::new());
        };
        Ok(self
            .doc
            .element_children(images)
            .filter(|&i| self.doc.name(i) == Some(tag::IMAGE))
            .filter_map(|i| child_text(&self.doc, i, tag::IMAGE_PATH))
            .collect())
    }

    /// Source paths of an article's images, in document order.
    pub fn image_paths(&self, aid: &str) -> Result<Vec<String>> {
        self.image_paths_at(ArticleKey::Aid(aid))
    }

    /// MIME type recorded for the image at `path`.
    pub fn image_mime(&self, aid: &str, path: &str) -> Result<Option<String>> {
        let article = self.resolve_article(ArticleKey::Aid(aid))?;
        Ok(self
            .find_image(article, path)
            .and_then(|image| child_text(&self.doc, image, tag::IMAGE_MIME)))
    }

    pub(crate) fn num_images_at(&self, key: ArticleKey<'_>) -> Result<usize> {
        let article = self.resolve_article(key)?;
        Ok(self
            .image_container(article)
            .map_or(0, |images| count_children(&self.doc, images, tag::IMAGE, None)))
    }

    pub fn num_images(&self, aid: &str) -> Result<usize> {
        self.num_images_at(ArticleKey::Aid(aid))
    }
}
