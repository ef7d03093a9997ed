//! The five "current" slots of the selection cursor.
//!
//! Article is the top level, Feature sits below it and Variant below the
//! Feature. Image and Unit are independent leaves of the Article. Changing a
//! slot clears everything subordinate to it.

use catner_xml::{NodeId, XmlDocument};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub article: Option<NodeId>,
    pub feature: Option<NodeId>,
    pub variant: Option<NodeId>,
    pub image: Option<NodeId>,
    pub unit: Option<NodeId>,
}

impl Selection {
    /// Point the article slot at `article`. A change clears all other slots.
    pub fn set_article(&mut self, article: Option<NodeId>) {
        if self.article != article {
            *self = Selection {
                article,
                ..Selection::default()
            };
        }
    }

    /// Point the feature slot at `feature`. A change clears the variant slot.
    pub fn set_feature(&mut self, feature: Option<NodeId>) {
        if self.feature != feature {
            self.feature = feature;
            self.variant = None;
        }
    }

    pub fn set_variant(&mut self, variant: Option<NodeId>) {
        self.variant = variant;
    }

    pub fn set_image(&mut self, image: Option<NodeId>) {
        self.image = image;
    }

    pub fn set_unit(&mut self, unit: Option<NodeId>) {
        self.unit = unit;
    }

    /// Clear every slot whose node no longer exists, together with the slots
    /// below it. Called after each deletion.
    pub fn retain_live(&mut self, doc: &XmlDocument) {
        let dead = |slot: Option<NodeId>| slot.is_some_and(|id| !doc.is_alive(id));
        if dead(self.article) {
            self.set_article(None);
        }
        if dead(self.feature) {
            self.set_feature(None);
        }
        if dead(self.variant) {
            self.variant = None;
        }
        if dead(self.image) {
            self.image = None;
        }
        if dead(self.unit) {
            self.unit = None;
        }
    }
}
