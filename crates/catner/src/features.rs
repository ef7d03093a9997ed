//! Article features (`ARTICLE_FEATURES/FEATURE`) and their variants.
//!
//! Features carry an explicit 1-based order index (`FORDER`) that always
//! matches their position among sibling features. A feature either holds a
//! scalar value (`FVALUE`) or a list of variants, never both.

use crate::catalog::{ArticleKey, Catalog, FeatureKey, VariantKey};
use crate::error::{ErrorKind, Result};
use crate::schema::tag;
use crate::tree::{child_text, count_children, find_child, find_keyed_child, find_or_create_child, set_child_text};
use catner_xml::NodeId;

/// Fields of a feature to add. Only the FID is required.
///
/// ```rust
/// use catner::FeatureSpec;
///
/// let spec = FeatureSpec::new("f_color").name("Color").value("red");
/// assert_eq!(spec.descr, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSpec {
    pub fid: String,
    pub name: Option<String>,
    /// Defaults to the name.
    pub descr: Option<String>,
    /// Defaults to the configured feature unit.
    pub unit: Option<String>,
    pub value: Option<String>,
}

impl FeatureSpec {
    pub fn new(fid: impl Into<String>) -> Self {
        Self {
            fid: fid.into(),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn descr(mut self, descr: impl Into<String>) -> Self {
        self.descr = Some(descr.into());
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl Catalog {
    pub(crate) fn feature_container(&self, article: NodeId) -> Option<NodeId> {
        find_child(&self.doc, article, tag::FEATURES, None)
    }

    pub(crate) fn variant_container(&self, feature: NodeId) -> Option<NodeId> {
        find_child(&self.doc, feature, tag::VARIANTS, None)
    }

    pub(crate) fn find_feature(&self, article: NodeId, fid: &str) -> Option<NodeId> {
        let features = self.feature_container(article)?;
        find_keyed_child(&self.doc, features, tag::FEATURE, tag::FID, fid)
    }

    pub(crate) fn find_variant(&self, feature: NodeId, vid: &str) -> Option<NodeId> {
        let variants = self.variant_container(feature)?;
        find_keyed_child(&self.doc, variants, tag::VARIANT, tag::VID, vid)
    }

    fn feature_nodes(&self, article: NodeId) -> Vec<NodeId> {
        let Some(features) = self.feature_container(article) else {
            return Vec::new();
        };
        self.doc
            .element_children(features)
            .filter(|&f| self.doc.name(f) == Some(tag::FEATURE))
            .collect()
    }

    fn has_variants(&self, feature: NodeId) -> bool {
        self.variant_container(feature)
            .is_some_and(|variants| count_children(&self.doc, variants, tag::VARIANT, None) > 0)
    }

    /// Renumber `FORDER` of all features of `article` to 1..N.
    fn reflow_feature_order(&mut self, article: NodeId) {
        let features = self.feature_nodes(article);
        for (index, feature) in features.iter().enumerate() {
            set_child_text(&mut self.doc, *feature, tag::FORDER, &(index + 1).to_string(), true);
        }
        tracing::debug!(count = features.len(), "reflowed feature order");
    }

    // -- features ------------------------------------------------------------

    pub(crate) fn add_feature_at(&mut self, key: ArticleKey<'_>, spec: &FeatureSpec) -> Result<()> {
        let article = self.resolve_article(key)?;
        if spec.fid.is_empty() {
            return Err(self.fail(ErrorKind::InvalidValue, "feature id must not be empty"));
        }
        if self.find_feature(article, &spec.fid).is_some() {
            return Err(self.fail(
                ErrorKind::AlreadyExists,
                format!("feature `{}` already exists", spec.fid),
            ));
        }

        let order = self.feature_nodes(article).len() + 1;
        let descr = spec.descr.as_ref().or(spec.name.as_ref());
        let unit = spec.unit.as_ref().unwrap_or(&self.defaults.feature_unit).clone();

        let features = find_or_create_child(&mut self.doc, article, tag::FEATURES, None);
        let feature = self.doc.append_element(features, tag::FEATURE);
        self.doc.append_text_element(feature, tag::FID, &spec.fid);
        if let Some(name) = &spec.name {
            self.doc.append_text_element(feature, tag::FNAME, name);
        }
        if let Some(descr) = descr {
            self.doc.append_text_element(feature, tag::FDESCR, descr);
        }
        self.doc.append_text_element(feature, tag::FUNIT, &unit);
        self.doc.append_text_element(feature, tag::FORDER, &order.to_string());
        if let Some(value) = &spec.value {
            self.doc.append_text_element(feature, tag::FVALUE, value);
        }
        tracing::debug!(fid = %spec.fid, order, "added feature");
        Ok(())
    }

    /// Add a feature to an article. Its order index is the number of
    /// features the article had before plus one.
    pub fn add_feature(&mut self, aid: &str, spec: &FeatureSpec) -> Result<()> {
        self.add_feature_at(ArticleKey::Aid(aid), spec)
    }

    fn set_feature_field_at(
        &mut self,
        article: ArticleKey<'_>,
        feature: FeatureKey<'_>,
        field: &str,
        value: &str,
    ) -> Result<()> {
        let article = self.resolve_article(article)?;
        let feature = self.resolve_feature(article, feature)?;
        set_child_text(&mut self.doc, feature, field, value, true);
        Ok(())
    }

    pub(crate) fn set_feature_id_at(
        &mut self,
        article: ArticleKey<'_>,
        feature: FeatureKey<'_>,
        new_fid: &str,
    ) -> Result<()> {
        let article_node = self.resolve_article(article)?;
        let feature_node = self.resolve_feature(article_node, feature)?;
        if new_fid.is_empty() {
            return Err(self.fail(ErrorKind::InvalidValue, "feature id must not be empty"));
        }
        if self
            .find_feature(article_node, new_fid)
            .is_some_and(|other| other != feature_node)
        {
            return Err(self.fail(
                ErrorKind::AlreadyExists,
                format!("feature `{new_fid}` already exists"),
            ));
        }
        set_child_text(&mut self.doc, feature_node, tag::FID, new_fid, true);
        Ok(())
    }

    pub fn set_feature_id(&mut self, aid: &str, fid: &str, new_fid: &str) -> Result<()> {
        self.set_feature_id_at(ArticleKey::Aid(aid), FeatureKey::Fid(fid), new_fid)
    }

    pub(crate) fn set_feature_name_at(&mut self, a: ArticleKey<'_>, f: FeatureKey<'_>, name: &str) -> Result<()> {
        self.set_feature_field_at(a, f, tag::FNAME, name)
    }

    pub fn set_feature_name(&mut self, aid: &str, fid: &str, name: &str) -> Result<()> {
        self.set_feature_name_at(ArticleKey::Aid(aid), FeatureKey::Fid(fid), name)
    }

    pub(crate) fn set_feature_descr_at(&mut self, a: ArticleKey<'_>, f: FeatureKey<'_>, descr: &str) -> Result<()> {
        self.set_feature_field_at(a, f, tag::FDESCR, descr)
    }

    pub fn set_feature_descr(&mut self, aid: &str, fid: &str, descr: &str) -> Result<()> {
        self.set_feature_descr_at(ArticleKey::Aid(aid), FeatureKey::Fid(fid), descr)
    }

    pub(crate) fn set_feature_unit_at(&mut self, a: ArticleKey<'_>, f: FeatureKey<'_>, unit: &str) -> Result<()> {
        let unit = if unit.is_empty() {
            self.defaults.feature_unit.clone()
        } else {
            unit.to_string()
        };
        self.set_feature_field_at(a, f, tag::FUNIT, &unit)
    }

    /// Set a feature's unit; an empty unit resets it to the configured default.
    pub fn set_feature_unit(&mut self, aid: &str, fid: &str, unit: &str) -> Result<()> {
        self.set_feature_unit_at(ArticleKey::Aid(aid), FeatureKey::Fid(fid), unit)
    }

    pub(crate) fn set_feature_value_at(&mut self, a: ArticleKey<'_>, f: FeatureKey<'_>, value: &str) -> Result<()> {
        let article = self.resolve_article(a)?;
        let feature = self.resolve_feature(article, f)?;
        if self.has_variants(feature) {
            return Err(self.fail(
                ErrorKind::InvalidValue,
                "feature has variants and cannot hold a value",
            ));
        }
        set_child_text(&mut self.doc, feature, tag::FVALUE, value, true);
        Ok(())
    }

    /// Set the scalar value of a feature. Fails with
    /// [`ErrorKind::InvalidValue`] when the feature has variants.
    pub fn set_feature_value(&mut self, aid: &str, fid: &str, value: &str) -> Result<()> {
        self.set_feature_value_at(ArticleKey::Aid(aid), FeatureKey::Fid(fid), value)
    }

    pub(crate) fn feature_field_at(&self, a: ArticleKey<'_>, f: FeatureKey<'_>, field: &str) -> Result<Option<String>> {
        let article = self.resolve_article(a)?;
        let feature = self.resolve_feature(article, f)?;
        Ok(child_text(&self.doc, feature, field))
    }

    pub fn feature_name(&self, aid: &str, fid: &str) -> Result<Option<String>> {
        self.feature_field_at(ArticleKey::Aid(aid), FeatureKey::Fid(fid), tag::FNAME)
    }

    pub fn feature_descr(&self, aid: &str, fid: &str) -> Result<Option<String>> {
        self.feature_field_at(ArticleKey::Aid(aid), FeatureKey::Fid(fid), tag::FDESCR)
    }

    pub fn feature_unit(&self, aid: &str, fid: &str) -> Result<Option<String>> {
        self.feature_field_at(ArticleKey::Aid(aid), FeatureKey::Fid(fid), tag::FUNIT)
    }

    pub fn feature_value(&self, aid: &str, fid: &str) -> Result<Option<String>> {
        self.feature_field_at(ArticleKey::Aid(aid), FeatureKey::Fid(fid), tag::FVALUE)
    }

    /// The 1-based order index of a feature.
    pub fn feature_order(&self, aid: &str, fid: &str) -> Result<Option<usize>> {
        let order = self.feature_field_at(ArticleKey::Aid(aid), FeatureKey::Fid(fid), tag::FORDER)?;
        Ok(order.and_then(|o| o.trim().parse().ok()))
    }

    pub(crate) fn feature_ids_at(&self, key: ArticleKey<'_>) -> Result<Vec<String>> {
        let article = self.resolve_article(key)?;
        Ok(self
            .feature_nodes(article)
            .into_iter()
            .filter_map(|f| child_text(&self.doc, f, tag::FID))
            .collect())
    }

    /// FIDs of an article's features, in document order.
    pub fn feature_ids(&self, aid: &str) -> Result<Vec<String>> {
        self.feature_ids_at(ArticleKey::Aid(aid))
    }

    pub(crate) fn num_features_at(&self, key: ArticleKey<'_>) -> Result<usize> {
        let article = self.resolve_article(key)?;
        Ok(self.feature_nodes(article).len())
    }

    pub fn num_features(&self, aid: &str) -> Result<usize> {
        self.num_features_at(ArticleKey::Aid(aid))
    }

    pub(crate) fn delete_feature_at(&mut self, a: ArticleKey<'_>, f: FeatureKey<'_>) -> Result<()> {
        let article = self.resolve_article(a)?;
        let feature = self.resolve_feature(article, f)?;
        self.remove_node(feature);
        tracing::debug!(?f, "deleted feature");
        self.reflow_feature_order(article);
        Ok(())
    }

    /// Delete a feature and renumber the remaining ones.
    pub fn delete_feature(&mut self, aid: &str, fid: &str) -> Result<()> {
        self.delete_feature_at(ArticleKey::Aid(aid), FeatureKey::Fid(fid))
    }

    // -- variants ------------------------------------------------------------

    pub(crate) fn add_variant_at(
        &mut self,
        a: ArticleKey<'_>,
        f: FeatureKey<'_>,
        vid: &str,
        value: &str,
    ) -> Result<()> {
        let article = self.resolve_article(a)?;
        let feature = self.resolve_feature(article, f)?;
        if vid.is_empty() {
            return Err(self.fail(ErrorKind::InvalidValue, "variant id must not be empty"));
        }
        if self.find_variant(feature, vid).is_some() {
            return Err(self.fail(
                ErrorKind::AlreadyExists,
                format!("variant `{vid}` already exists"),
            ));
        }

        if let Some(scalar) = find_child(&self.doc, feature, tag::FVALUE, None) {
            self.doc.remove(scalar);
        }
        let variants = find_or_create_child(&mut self.doc, feature, tag::VARIANTS, None);
        let variant = self.doc.append_element(variants, tag::VARIANT);
        self.doc.append_text_element(variant, tag::VID, vid);
        self.doc.append_text_element(variant, tag::FVALUE, value);
        tracing::debug!(vid, "added variant");
        Ok(())
    }

    /// Add a variant to a feature. Any scalar value of the feature is removed.
    pub fn add_variant(&mut self, aid: &str, fid: &str, vid: &str, value: &str) -> Result<()> {
        self.add_variant_at(ArticleKey::Aid(aid), FeatureKey::Fid(fid), vid, value)
    }

    pub(crate) fn set_variant_value_at(
        &mut self,
        a: ArticleKey<'_>,
        f: FeatureKey<'_>,
        v: VariantKey<'_>,
        value: &str,
    ) -> Result<()> {
        let article = self.resolve_article(a)?;
        let feature = self.resolve_feature(article, f)?;
        let variant = self.resolve_variant(feature, v)?;
        set_child_text(&mut self.doc, variant, tag::FVALUE, value, true);
        Ok(())
    }

    pub fn set_variant_value(&mut self, aid: &str, fid: &str, vid: &str, value: &str) -> Result<()> {
        self.set_variant_value_at(
            ArticleKey::Aid(aid),
            FeatureKey::Fid(fid),
            VariantKey::Vid(vid),
            value,
        )
    }

    pub(crate) fn variant_value_at(
        &self,
        a: ArticleKey<'_>,
        f: FeatureKey<'_>,
        v: VariantKey<'_>,
    ) -> Result<Option<String>> {
        let article = self.resolve_article(a)?;
        let feature = self.resolve_feature(article, f)?;
        let variant = self.resolve_variant(feature, v)?;
        Ok(child_text(&self.doc, variant, tag::FVALUE))
    }

    pub fn variant_value(&self, aid: &str, fid: &str, vid: &str) -> Result<Option<String>> {
        self.variant_value_at(ArticleKey::Aid(aid), FeatureKey::Fid(fid), VariantKey::Vid(vid))
    }

    pub(crate) fn variant_ids_at(&self, a: ArticleKey<'_>, f: FeatureKey<'_>) -> Result<Vec<String>> {
        let article = self.resolve_article(a)?;
        let feature = self.resolve_feature(article, f)?;
        let Some(variants) = self.variant_container(feature) else {
            return Ok(Vec::new());
        };
        Ok(self
            .doc
            .element_children(variants)
            .filter(|&v| self.doc.name(v) == Some(tag::VARIANT))
            .filter_map(|v| child_text(&self.doc, v, tag::VID))
            .collect())
    }

    pub fn variant_ids(&self, aid: &str, fid: &str) -> Result<Vec<String>> {
        self.variant_ids_at(ArticleKey::Aid(aid), FeatureKey::Fid(fid))
    }

    pub(crate) fn num_variants_at(&self, a: ArticleKey<'_>, f: FeatureKey<'_>) -> Result<usize> {
        let article = self.resolve_article(a)?;
        let feature = self.resolve_feature(article, f)?;
        Ok(self
            .variant_container(feature)
            .map_or(0, |variants| count_children(&self.doc, variants, tag::VARIANT, None)))
    }

    pub fn num_variants(&self, aid: &str, fid: &str) -> Result<usize> {
        self.num_variants_at(ArticleKey::Aid(aid), FeatureKey::Fid(fid))
    }

    pub(crate) fn delete_variant_at(
        &mut self,
        a: ArticleKey<'_>,
        f: FeatureKey<'_>,
        v: VariantKey<'_>,
    ) -> Result<()> {
        let article = self.resolve_article(a)?;
        let feature = self.resolve_feature(article, f)?;
        let variant = self.resolve_variant(feature, v)?;
        self.remove_node(variant);
        tracing::debug!(?v, "deleted variant");
        Ok(())
    }

    pub fn delete_variant(&mut self, aid: &str, fid: &str, vid: &str) -> Result<()> {
        self.delete_variant_at(ArticleKey::Aid(aid), FeatureKey::Fid(fid), VariantKey::Vid(vid))
    }

    // -- weight feature ------------------------------------------------------

    /// Add the well-known weight feature, named after its FID.
    pub fn add_weight_feature(&mut self, aid: &str, value: Option<&str>) -> Result<()> {
        let fid = self.defaults.weight_feature.clone();
        let mut spec = FeatureSpec::new(fid.as_str()).name(fid.as_str());
        spec.value = value.map(str::to_string);
        self.add_feature(aid, &spec)
    }

    pub fn add_weight_variant(&mut self, aid: &str, vid: &str, value: &str) -> Result<()> {
        let fid = self.defaults.weight_feature.clone();
        self.add_variant(aid, &fid, vid, value)
    }

    pub fn set_weight_variant(&mut self, aid: &str, vid: &str, value: &str) -> Result<()> {
        let fid = self.defaults.weight_feature.clone();
        self.set_variant_value(aid, &fid, vid, value)
    }

    pub fn delete_weight_feature(&mut self, aid: &str) -> Result<()> {
        let fid = self.defaults.weight_feature.clone();
        self.delete_feature(aid, &fid)
    }

    pub fn delete_weight_variant(&mut self, aid: &str, vid: &str) -> Result<()> {
        let fid = self.defaults.weight_feature.clone();
        self.delete_variant(aid, &fid, vid)
    }
}
