//! Single-operation edits: load a catalog, apply one change, write it out.

use std::path::PathBuf;

use anyhow::{Context, Result};
use catner::{Catalog, CatalogDefaults, FeatureSpec};
use tracing::debug;

/// Catalog file to edit and where the result goes.
#[derive(Debug)]
pub struct EditTarget {
    pub file: PathBuf,
    /// Write here instead of back to `file`.
    pub output: Option<PathBuf>,
}

/// One catalog change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    SetLocale {
        locale: String,
    },
    AddTerritory {
        territory: String,
    },
    AddArticle {
        aid: String,
        title: Option<String>,
        descr: Option<String>,
    },
    AddImage {
        aid: String,
        path: String,
        mime: Option<String>,
    },
    AddCategory {
        aid: String,
        category: String,
    },
    AddUnit {
        aid: String,
        code: Option<String>,
        factor: Option<String>,
        main: bool,
    },
    AddFeature {
        aid: String,
        spec: FeatureSpec,
    },
    AddVariant {
        aid: String,
        fid: String,
        vid: String,
        value: String,
    },
    DeleteArticle {
        aid: String,
    },
    DeleteFeature {
        aid: String,
        fid: String,
    },
}

impl Edit {
    /// Apply this change to `catalog`.
    pub fn apply(&self, catalog: &mut Catalog) -> catner::Result<()> {
        match self {
            Edit::SetLocale { locale } => catalog.set_locale(locale),
            Edit::AddTerritory { territory } => catalog.add_territory(territory),
            Edit::AddArticle { aid, title, descr } => {
                catalog.add_article(aid, title.as_deref(), descr.as_deref())
            }
            Edit::AddImage { aid, path, mime } => catalog.add_image(aid, mime.as_deref(), path),
            Edit::AddCategory { aid, category } => catalog.add_category(aid, category),
            Edit::AddUnit {
                aid,
                code,
                factor,
                main,
            } => catalog.add_unit(aid, code.as_deref(), factor.as_deref(), *main),
            Edit::AddFeature { aid, spec } => catalog.add_feature(aid, spec),
            Edit::AddVariant {
                aid,
                fid,
                vid,
                value,
            } => catalog.add_variant(aid, fid, vid, value),
            Edit::DeleteArticle { aid } => catalog.delete_article(aid),
            Edit::DeleteFeature { aid, fid } => catalog.delete_feature(aid, fid),
        }
    }
}

pub fn execute(target: EditTarget, edit: &Edit, defaults: CatalogDefaults) -> Result<()> {
    let mut catalog = Catalog::load(&target.file, false)
        .with_context(|| format!("failed to load {}", target.file.display()))?;
    catalog.set_defaults(defaults);

    debug!(?edit, "applying edit");
    edit.apply(&mut catalog)
        .with_context(|| format!("failed to edit {}", target.file.display()))?;

    match &target.output {
        Some(output) => catalog.write_to(output)?,
        None => catalog.save()?,
    }
    Ok(())
}
