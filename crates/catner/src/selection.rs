//! Cursor traversal and cursor-relative operations.
//!
//! Traversal walks same-named siblings in document order. Running off the
//! end clears the slot and reports [`ErrorKind::NoSuchNode`], which is how
//! loops over articles, features, variants, images and units terminate:
//!
//! ```rust
//! use catner::Catalog;
//!
//! let mut catalog = Catalog::new();
//! catalog.add_article("A", None, None).unwrap();
//! catalog.add_article("B", None, None).unwrap();
//!
//! let mut seen = Vec::new();
//! let mut step = catalog.select_first_article();
//! while step.is_ok() {
//!     seen.extend(catalog.selected_article_id());
//!     step = catalog.select_next_article();
//! }
//! assert_eq!(seen, ["A", "B"]);
//! ```

use crate::catalog::{ArticleKey, Catalog, FeatureKey, VariantKey};
use crate::error::{ErrorKind, Result};
use crate::features::FeatureSpec;
use crate::schema::tag;
use crate::tree::{child_text, find_child, next_same_name_sibling, nth_child};
use crate::units::Unit;
use catner_xml::NodeId;

impl Catalog {
    fn end_of(&self, what: &str) -> crate::Error {
        self.fail(ErrorKind::NoSuchNode, format!("no more {what}"))
    }

    // -- articles ------------------------------------------------------------

    /// Select the article `aid`. On a miss the selection is left unchanged.
    pub fn select_article(&mut self, aid: &str) -> Result<()> {
        let article = self.resolve_article(ArticleKey::Aid(aid))?;
        self.cursor.set_article(Some(article));
        tracing::trace!(aid, "selected article");
        Ok(())
    }

    pub fn select_first_article(&mut self) -> Result<()> {
        let first = nth_child(&self.doc, self.anchors.articles, tag::ARTICLE, 0);
        self.cursor.set_article(first);
        tracing::trace!(found = first.is_some(), "selected first article");
        first.map(|_| ()).ok_or_else(|| self.end_of("articles"))
    }

    pub fn select_next_article(&mut self) -> Result<()> {
        let current = self.selected_article()?;
        let next = next_same_name_sibling(&self.doc, current);
        self.cursor.set_article(next);
        tracing::trace!(found = next.is_some(), "selected next article");
        next.map(|_| ()).ok_or_else(|| self.end_of("articles"))
    }

    // -- features ------------------------------------------------------------

    /// Select feature `fid` of the selected article.
    pub fn select_feature(&mut self, fid: &str) -> Result<()> {
        let article = self.selected_article()?;
        let feature = self.resolve_feature(article, FeatureKey::Fid(fid))?;
        self.cursor.set_feature(Some(feature));
        tracing::trace!(fid, "selected feature");
        Ok(())
    }

    pub fn select_first_feature(&mut self) -> Result<()> {
        let article = self.selected_article()?;
        let first = self
            .feature_container(article)
            .and_then(|features| nth_child(&self.doc, features, tag::FEATURE, 0));
        self.cursor.set_feature(first);
        tracing::trace!(found = first.is_some(), "selected first feature");
        first.map(|_| ()).ok_or_else(|| self.end_of("features"))
    }

    pub fn select_next_feature(&mut self) -> Result<()> {
        self.selected_article()?;
        let current = self.selected_feature()?;
        let next = next_same_name_sibling(&self.doc, current);
        self.cursor.set_feature(next);
        tracing::trace!(found = next.is_some(), "selected next feature");
        next.map(|_| ()).ok_or_else(|| self.end_of("features"))
    }

    // -- variants ------------------------------------------------------------

    pub fn select_first_variant(&mut self) -> Result<()> {
        let feature = self.selected_feature()?;
        let first = self
            .variant_container(feature)
            .and_then(|variants| nth_child(&self.doc, variants, tag::VARIANT, 0));
        self.cursor.set_variant(first);
        tracing::trace!(found = first.is_some(), "selected first variant");
        first.map(|_| ()).ok_or_else(|| self.end_of("variants"))
    }

    pub fn select_next_variant(&mut self) -> Result<()> {
        let current = self.selected_variant()?;
        let next = next_same_name_sibling(&self.doc, current);
        self.cursor.set_variant(next);
        next.map(|_| ()).ok_or_else(|| self.end_of("variants"))
    }

    // -- images and units ----------------------------------------------------

    fn first_leaf(&self, article: NodeId, container: &str, leaf: &str) -> Option<NodeId> {
        find_child(&self.doc, article, container, None)
            .and_then(|parent| nth_child(&self.doc, parent, leaf, 0))
    }

    pub fn select_first_image(&mut self) -> Result<()> {
        let article = self.selected_article()?;
        let first = self.first_leaf(article, tag::IMAGES, tag::IMAGE);
        self.cursor.set_image(first);
        first.map(|_| ()).ok_or_else(|| self.end_of("images"))
    }

    pub fn select_next_image(&mut self) -> Result<()> {
        self.selected_article()?;
        let Some(current) = self.cursor.image.filter(|&i| self.doc.is_alive(i)) else {
            return Err(self.fail(ErrorKind::NoSelectionImage, "no image is selected"));
        };
        let next = next_same_name_sibling(&self.doc, current);
        self.cursor.set_image(next);
        next.map(|_| ()).ok_or_else(|| self.end_of("images"))
    }

    /// Select the first alternative unit of the selected article.
    pub fn select_first_unit(&mut self) -> Result<()> {
        let article = self.selected_article()?;
        let first = self.first_leaf(article, tag::UNITS, tag::ALT_UNIT);
        self.cursor.set_unit(first);
        first.map(|_| ()).ok_or_else(|| self.end_of("units"))
    }

    pub fn select_next_unit(&mut self) -> Result<()> {
        self.selected_article()?;
        let Some(current) = self.cursor.unit.filter(|&u| self.doc.is_alive(u)) else {
            return Err(self.fail(ErrorKind::NoSelectionUnit, "no unit is selected"));
        };
        let next = next_same_name_sibling(&self.doc, current);
        self.cursor.set_unit(next);
        next.map(|_| ()).ok_or_else(|| self.end_of("units"))
    }

    // -- selected getters ----------------------------------------------------

    fn slot_field(&self, slot: Option<NodeId>, field: &str) -> Option<String> {
        slot.filter(|&n| self.doc.is_alive(n))
            .and_then(|n| child_text(&self.doc, n, field))
    }

    pub fn selected_article_id(&self) -> Option<String> {
        self.slot_field(self.cursor.article, tag::AID)
    }

    pub fn selected_feature_id(&self) -> Option<String> {
        self.slot_field(self.cursor.feature, tag::FID)
    }

    pub fn selected_variant_id(&self) -> Option<String> {
        self.slot_field(self.cursor.variant, tag::VID)
    }

    pub fn selected_image_path(&self) -> Option<String> {
        self.slot_field(self.cursor.image, tag::IMAGE_PATH)
    }

    pub fn selected_image_mime(&self) -> Option<String> {
        self.slot_field(self.cursor.image, tag::IMAGE_MIME)
    }

    pub fn selected_unit_code(&self) -> Option<String> {
        self.slot_field(self.cursor.unit, tag::ALT_UNIT_CODE)
    }

    pub fn selected_unit_factor(&self) -> Option<String> {
        self.slot_field(self.cursor.unit, tag::ALT_UNIT_FACTOR)
    }

    /// The selected unit as a record.
    pub fn selected_unit(&self) -> Option<Unit> {
        self.cursor
            .unit
            .filter(|&u| self.doc.is_alive(u))
            .map(|u| self.unit_record(u))
    }

    /// Operations on whatever the cursor currently points at.
    pub fn selected(&mut self) -> SelectedScope<'_> {
        SelectedScope { catalog: self }
    }
}

/// Cursor-relative view of a [`Catalog`].
///
/// Every method acts on the selected article (and, where relevant, the
/// selected feature or variant), failing with the matching
/// `NoSelection*` error when a needed slot is empty.
#[derive(Debug)]
pub struct SelectedScope<'c> {
    catalog: &'c mut Catalog,
}

const ARTICLE: ArticleKey<'static> = ArticleKey::Selected;
const FEATURE: FeatureKey<'static> = FeatureKey::Selected;
const VARIANT: VariantKey<'static> = VariantKey::Selected;

impl SelectedScope<'_> {
    // article

    pub fn set_id(&mut self, new_aid: &str) -> Result<()> {
        self.catalog.set_article_id_at(ARTICLE, new_aid)
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.catalog.set_article_detail_at(ARTICLE, tag::TITLE, title)
    }

    pub fn set_descr(&mut self, descr: &str) -> Result<()> {
        self.catalog.set_article_detail_at(ARTICLE, tag::DESCR, descr)
    }

    pub fn title(&self) -> Result<Option<String>> {
        self.catalog.article_detail_at(ARTICLE, tag::TITLE)
    }

    pub fn descr(&self) -> Result<Option<String>> {
        self.catalog.article_detail_at(ARTICLE, tag::DESCR)
    }

    /// Delete the selected article; the whole selection is cleared.
    pub fn delete_article(&mut self) -> Result<()> {
        self.catalog.delete_article_at(ARTICLE)
    }

    // images

    pub fn add_image(&mut self, mime: Option<&str>, path: &str) -> Result<()> {
        self.catalog.add_image_at(ARTICLE, mime, path)
    }

    pub fn delete_image(&mut self, path: &str) -> Result<()> {
        self.catalog.delete_image_at(ARTICLE, path)
    }

    pub fn image_paths(&self) -> Result<Vec<String>> {
        self.catalog.image_paths_at(ARTICLE)
    }

    pub fn num_images(&self) -> Result<usize> {
        self.catalog.num_images_at(ARTICLE)
    }

    // categories

    pub fn add_category(&mut self, id: &str) -> Result<()> {
        self.catalog.add_category_at(ARTICLE, id)
    }

    pub fn delete_category(&mut self, id: &str) -> Result<()> {
        self.catalog.delete_category_at(ARTICLE, id)
    }

    pub fn categories(&self) -> Result<Vec<String>> {
        self.catalog.categories_at(ARTICLE)
    }

    pub fn num_categories(&self) -> Result<usize> {
        self.catalog.num_categories_at(ARTICLE)
    }

    // units

    pub fn add_unit(&mut self, code: Option<&str>, factor: Option<&str>, is_main: bool) -> Result<()> {
        self.catalog.add_unit_at(ARTICLE, code, factor, is_main)
    }

    pub fn main_unit(&self) -> Result<Option<String>> {
        self.catalog.main_unit_at(ARTICLE)
    }

    pub fn units(&self) -> Result<Vec<Unit>> {
        self.catalog.units_at(ARTICLE)
    }

    pub fn num_units(&self) -> Result<usize> {
        self.catalog.num_units_at(ARTICLE)
    }

    // features

    pub fn add_feature(&mut self, spec: &FeatureSpec) -> Result<()> {
        self.catalog.add_feature_at(ARTICLE, spec)
    }

    pub fn feature_ids(&self) -> Result<Vec<String>> {
        self.catalog.feature_ids_at(ARTICLE)
    }

    pub fn num_features(&self) -> Result<usize> {
        self.catalog.num_features_at(ARTICLE)
    }

    pub fn set_feature_id(&mut self, new_fid: &str) -> Result<()> {
        self.catalog.set_feature_id_at(ARTICLE, FEATURE, new_fid)
    }

    pub fn set_feature_name(&mut self, name: &str) -> Result<()> {
        self.catalog.set_feature_name_at(ARTICLE, FEATURE, name)
    }

    pub fn set_feature_descr(&mut self, descr: &str) -> Result<()> {
        self.catalog.set_feature_descr_at(ARTICLE, FEATURE, descr)
    }

    pub fn set_feature_unit(&mut self, unit: &str) -> Result<()> {
        self.catalog.set_feature_unit_at(ARTICLE, FEATURE, unit)
    }

    pub fn set_feature_value(&mut self, value: &str) -> Result<()> {
        self.catalog.set_feature_value_at(ARTICLE, FEATURE, value)
    }

    pub fn feature_name(&self) -> Result<Option<String>> {
        self.catalog.feature_field_at(ARTICLE, FEATURE, tag::FNAME)
    }

    pub fn feature_unit(&self) -> Result<Option<String>> {
        self.catalog.feature_field_at(ARTICLE, FEATURE, tag::FUNIT)
    }

    pub fn feature_value(&self) -> Result<Option<String>> {
        self.catalog.feature_field_at(ARTICLE, FEATURE, tag::FVALUE)
    }

    /// Delete the selected feature and renumber the remaining ones.
    pub fn delete_feature(&mut self) -> Result<()> {
        self.catalog.delete_feature_at(ARTICLE, FEATURE)
    }

    // variants

    pub fn add_variant(&mut self, vid: &str, value: &str) -> Result<()> {
        self.catalog.add_variant_at(ARTICLE, FEATURE, vid, value)
    }

    pub fn variant_ids(&self) -> Result<Vec<String>> {
        self.catalog.variant_ids_at(ARTICLE, FEATURE)
    }

    pub fn num_variants(&self) -> Result<usize> {
        self.catalog.num_variants_at(ARTICLE, FEATURE)
    }

    pub fn set_variant_value(&mut self, value: &str) -> Result<()> {
        self.catalog.set_variant_value_at(ARTICLE, FEATURE, VARIANT, value)
    }

    pub fn variant_value(&self) -> Result<Option<String>> {
        self.catalog.variant_value_at(ARTICLE, FEATURE, VARIANT)
    }

    pub fn delete_variant(&mut self) -> Result<()> {
        self.catalog.delete_variant_at(ARTICLE, FEATURE, VARIANT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_article("A", Some("Alpha"), None).unwrap();
        catalog.add_article("B", Some("Beta"), None).unwrap();
        catalog.add_feature("A", &FeatureSpec::new("f1")).unwrap();
        catalog.add_feature("A", &FeatureSpec::new("f2")).unwrap();
        catalog.add_variant("A", "f2", "v1", "x").unwrap();
        catalog.add_variant("A", "f2", "v2", "y").unwrap();
        catalog.add_image("A", None, "a.jpg").unwrap();
        catalog.add_unit("A", Some("PCE"), Some("1"), false).unwrap();
        catalog.add_unit("A", Some("MTR"), Some("6"), false).unwrap();
        catalog
    }

    #[test]
    fn test_walk_articles() {
        let mut catalog = sample();
        assert_eq!(
            catalog.select_next_article().unwrap_err().kind(),
            ErrorKind::NoSelectionArticle
        );
        catalog.select_first_article().unwrap();
        assert_eq!(catalog.selected_article_id().as_deref(), Some("A"));
        catalog.select_next_article().unwrap();
        assert_eq!(catalog.selected_article_id().as_deref(), Some("B"));
        assert_eq!(catalog.select_next_article().unwrap_err().kind(), ErrorKind::NoSuchNode);
        assert_eq!(catalog.selected_article_id(), None);
    }

    #[test]
    fn test_select_missing_article_keeps_selection() {
        let mut catalog = sample();
        catalog.select_article("B").unwrap();
        assert_eq!(catalog.select_article("Z").unwrap_err().kind(), ErrorKind::NoSuchArticle);
        assert_eq!(catalog.selected_article_id().as_deref(), Some("B"));
    }

    #[test]
    fn test_walk_features_and_variants() {
        let mut catalog = sample();
        assert_eq!(
            catalog.select_first_feature().unwrap_err().kind(),
            ErrorKind::NoSelectionArticle
        );
        catalog.select_article("A").unwrap();
        assert_eq!(
            catalog.select_next_feature().unwrap_err().kind(),
            ErrorKind::NoSelectionFeature
        );
        catalog.select_first_feature().unwrap();
        assert_eq!(catalog.selected_feature_id().as_deref(), Some("f1"));
        assert_eq!(catalog.select_first_variant().unwrap_err().kind(), ErrorKind::NoSuchNode);

        catalog.select_next_feature().unwrap();
        assert_eq!(catalog.selected_feature_id().as_deref(), Some("f2"));
        catalog.select_first_variant().unwrap();
        assert_eq!(catalog.selected_variant_id().as_deref(), Some("v1"));
        catalog.select_next_variant().unwrap();
        assert_eq!(catalog.selected_variant_id().as_deref(), Some("v2"));
        assert_eq!(catalog.select_next_variant().unwrap_err().kind(), ErrorKind::NoSuchNode);
        assert_eq!(
            catalog.select_next_variant().unwrap_err().kind(),
            ErrorKind::NoSelectionVariant
        );

        // Changing the feature drops the variant
        catalog.select_first_variant().unwrap();
        catalog.select_feature("f1").unwrap();
        assert_eq!(catalog.selected_variant_id(), None);
        assert_eq!(catalog.select_feature("zz").unwrap_err().kind(), ErrorKind::NoSuchFeature);
        assert_eq!(catalog.selected_feature_id().as_deref(), Some("f1"));
    }

    #[test]
    fn test_article_change_resets_leaves() {
        let mut catalog = sample();
        catalog.select_article("A").unwrap();
        catalog.select_first_feature().unwrap();
        catalog.select_first_image().unwrap();
        catalog.select_first_unit().unwrap();

        catalog.select_article("B").unwrap();
        assert_eq!(catalog.selected_feature_id(), None);
        assert_eq!(catalog.selected_image_path(), None);
        assert_eq!(catalog.selected_unit_code(), None);
    }

    #[test]
    fn test_walk_images_and_units() {
        let mut catalog = sample();
        catalog.select_article("A").unwrap();
        assert_eq!(catalog.select_next_image().unwrap_err().kind(), ErrorKind::NoSelectionImage);
        assert_eq!(catalog.select_next_unit().unwrap_err().kind(), ErrorKind::NoSelectionUnit);

        catalog.select_first_image().unwrap();
        assert_eq!(catalog.selected_image_path().as_deref(), Some("a.jpg"));
        assert_eq!(catalog.selected_image_mime().as_deref(), Some("image/jpg"));
        assert_eq!(catalog.select_next_image().unwrap_err().kind(), ErrorKind::NoSuchNode);

        catalog.select_first_unit().unwrap();
        assert_eq!(catalog.selected_unit_code().as_deref(), Some("PCE"));
        catalog.select_next_unit().unwrap();
        assert_eq!(catalog.selected_unit_code().as_deref(), Some("MTR"));
        assert_eq!(catalog.selected_unit_factor().as_deref(), Some("6"));
        assert_eq!(catalog.select_next_unit().unwrap_err().kind(), ErrorKind::NoSuchNode);

        catalog.select_article("B").unwrap();
        assert_eq!(catalog.select_first_image().unwrap_err().kind(), ErrorKind::NoSuchNode);
    }

    #[test]
    fn test_scope_requires_selection() {
        let mut catalog = sample();
        let err = catalog.selected().add_category("1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSelectionArticle);
        assert_eq!(catalog.last_error(), Some(ErrorKind::NoSelectionArticle));

        catalog.select_article("A").unwrap();
        let err = catalog.selected().set_feature_value("v").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSelectionFeature);
    }

    #[test]
    fn test_scope_edits_selected_nodes() {
        let mut catalog = sample();
        catalog.select_article("B").unwrap();
        let mut scope = catalog.selected();
        scope.set_title("Beta 2").unwrap();
        scope.add_category("10010000").unwrap();
        scope.add_feature(&FeatureSpec::new("g1").value("1")).unwrap();
        assert_eq!(scope.title().unwrap().as_deref(), Some("Beta 2"));
        assert_eq!(scope.feature_ids().unwrap(), vec!["g1"]);

        catalog.select_feature("g1").unwrap();
        let mut scope = catalog.selected();
        scope.set_feature_value("2").unwrap();
        scope.add_variant("s", "3").unwrap();
        assert_eq!(scope.feature_value().unwrap(), None);
        assert_eq!(scope.num_variants().unwrap(), 1);

        assert_eq!(catalog.categories("B").unwrap(), vec!["10010000"]);
    }

    #[test]
    fn test_deleting_selected_nodes_clears_slots() {
        let mut catalog = sample();
        catalog.select_article("A").unwrap();
        catalog.select_feature("f2").unwrap();
        catalog.select_first_variant().unwrap();

        catalog.selected().delete_variant().unwrap();
        assert_eq!(catalog.selected_variant_id(), None);
        assert_eq!(catalog.selected_feature_id().as_deref(), Some("f2"));

        catalog.selected().delete_feature().unwrap();
        assert_eq!(catalog.selected_feature_id(), None);
        assert_eq!(catalog.feature_order("A", "f1").unwrap(), Some(1));

        catalog.select_first_feature().unwrap();
        catalog.delete_article("A").unwrap();
        assert_eq!(catalog.selected_article_id(), None);
        assert_eq!(catalog.selected_feature_id(), None);
        assert_eq!(
            catalog.selected().add_image(None, "x.jpg").unwrap_err().kind(),
            ErrorKind::NoSelectionArticle
        );
    }
}
