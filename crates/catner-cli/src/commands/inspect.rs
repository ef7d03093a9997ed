//! `catner inspect`: summarize a catalog by walking it with the selection
//! cursor.

use std::path::Path;

use anyhow::{Context, Result};
use catner::{Catalog, Unit};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CatalogSummary {
    pub generator: Option<String>,
    pub locale: Option<String>,
    pub territories: Vec<String>,
    pub articles: Vec<ArticleSummary>,
}

#[derive(Debug, Serialize)]
pub struct ArticleSummary {
    pub aid: String,
    pub title: Option<String>,
    pub main_unit: Option<String>,
    pub units: Vec<Unit>,
    pub images: Vec<String>,
    pub categories: Vec<String>,
    pub features: Vec<FeatureSummary>,
}

#[derive(Debug, Serialize)]
pub struct FeatureSummary {
    pub fid: String,
    pub name: Option<String>,
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<VariantSummary>,
}

#[derive(Debug, Serialize)]
pub struct VariantSummary {
    pub vid: String,
    pub value: Option<String>,
}

pub fn execute(file: &Path, json: bool) -> Result<()> {
    let mut catalog = Catalog::load(file, false)
        .with_context(|| format!("failed to load {}", file.display()))?;
    let summary = summarize(&mut catalog)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_text(&summary));
    }
    Ok(())
}

/// Collect a summary of every article. Moves the catalog's cursor.
pub fn summarize(catalog: &mut Catalog) -> catner::Result<CatalogSummary> {
    let mut articles = Vec::new();
    let mut more = catalog.select_first_article().is_ok();
    while more {
        articles.push(summarize_article(catalog)?);
        more = catalog.select_next_article().is_ok();
    }

    Ok(CatalogSummary {
        generator: catalog.generator(),
        locale: catalog.locale(),
        territories: catalog.territories(),
        articles,
    })
}

fn summarize_article(catalog: &mut Catalog) -> catner::Result<ArticleSummary> {
    let aid = catalog.selected_article_id().unwrap_or_default();

    let mut images = Vec::new();
    let mut more = catalog.select_first_image().is_ok();
    while more {
        images.extend(catalog.selected_image_path());
        more = catalog.select_next_image().is_ok();
    }

    let mut units = Vec::new();
    let mut more = catalog.select_first_unit().is_ok();
    while more {
        units.extend(catalog.selected_unit());
        more = catalog.select_next_unit().is_ok();
    }

    let mut features = Vec::new();
    let mut more = catalog.select_first_feature().is_ok();
    while more {
        features.push(summarize_feature(catalog)?);
        more = catalog.select_next_feature().is_ok();
    }

    let scope = catalog.selected();
    Ok(ArticleSummary {
        aid,
        title: scope.title()?,
        main_unit: scope.main_unit()?,
        units,
        images,
        categories: scope.categories()?,
        features,
    })
}

fn summarize_feature(catalog: &mut Catalog) -> catner::Result<FeatureSummary> {
    let fid = catalog.selected_feature_id().unwrap_or_default();

    let mut variants = Vec::new();
    let mut more = catalog.select_first_variant().is_ok();
    while more {
        variants.push(VariantSummary {
            vid: catalog.selected_variant_id().unwrap_or_default(),
            value: catalog.selected().variant_value()?,
        });
        more = catalog.select_next_variant().is_ok();
    }

    let scope = catalog.selected();
    Ok(FeatureSummary {
        fid,
        name: scope.feature_name()?,
        unit: scope.feature_unit()?,
        value: scope.feature_value()?,
        variants,
    })
}

pub fn render_text(summary: &CatalogSummary) -> String {
    let mut out = String::new();
    let none = "-";
    out.push_str(&format!(
        "generator: {}\nlocale: {}\nterritories: {}\n",
        summary.generator.as_deref().unwrap_or(none),
        summary.locale.as_deref().unwrap_or(none),
        summary.territories.join(", "),
    ));
    for article in &summary.articles {
        out.push_str(&format!(
            "\n{} {}\n",
            article.aid,
            article.title.as_deref().unwrap_or(none)
        ));
        if let Some(main) = &article.main_unit {
            let units: Vec<String> = article
                .units
                .iter()
                .map(|u| format!("{} x{}", u.code, u.factor))
                .collect();
            out.push_str(&format!("  unit: {main} ({})\n", units.join(", ")));
        }
        for image in &article.images {
            out.push_str(&format!("  image: {image}\n"));
        }
        if !article.categories.is_empty() {
            out.push_str(&format!("  categories: {}\n", article.categories.join(", ")));
        }
        for feature in &article.features {
            out.push_str(&format!(
                "  feature {}: {}",
                feature.fid,
                feature.name.as_deref().unwrap_or(none)
            ));
            if let Some(value) = &feature.value {
                out.push_str(&format!(" = {value}"));
            }
            if let Some(unit) = &feature.unit {
                out.push_str(&format!(" [{unit}]"));
            }
            out.push('\n');
            for variant in &feature.variants {
                out.push_str(&format!(
                    "    {} = {}\n",
                    variant.vid,
                    variant.value.as_deref().unwrap_or(none)
                ));
            }
        }
    }
    out
}
