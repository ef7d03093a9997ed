//! `catner demo`: build the sample catalog.
//!
//! Some additions are repeated. The duplicates are rejected (or ignored, for
//! territories) and leave the document untouched.

use std::path::Path;

use anyhow::Result;
use catner::{Catalog, CatalogDefaults, FeatureSpec, STDOUT_PATH};
use tracing::warn;

const SRTS62: &str = "SRTS62";
const SRTS63: &str = "SRTS63";

pub fn execute(output: Option<&Path>, defaults: CatalogDefaults) -> Result<()> {
    let catalog = build(defaults)?;
    catalog.write_to(output.unwrap_or(Path::new(STDOUT_PATH)))?;
    Ok(())
}

/// Log a rejected addition and carry on.
fn expect_rejected(result: catner::Result<()>) {
    if let Err(err) = result {
        warn!(code = err.kind().code(), "{err}");
    }
}

/// Build the sample catalog.
pub fn build(defaults: CatalogDefaults) -> catner::Result<Catalog> {
    let mut catalog = Catalog::with_defaults(defaults);

    catalog.add_generator("not great")?;
    catalog.set_generator("catner")?;
    catalog.set_locale("DE")?;
    catalog.set_locale("EN")?;
    for territory in ["DE", "AT", "DE"] {
        catalog.add_territory(territory)?;
    }

    catalog.add_article(
        SRTS62,
        Some("Sicherheitsroststufe ECO X12"),
        Some("Total preiswerte Stufe, mach die mal jetzt rein da, komm, mach."),
    )?;
    catalog.add_article(
        SRTS63,
        Some("Sicherheitsroststufe Schlingenhorst"),
        Some("Super geile Stufe, die sogar mit Schlappen zu besteigen ist!"),
    )?;
    expect_rejected(catalog.add_article(
        SRTS63,
        Some("This should not exist."),
        Some("Because SRTS63 has been added before!"),
    ));

    catalog.add_image(SRTS63, Some("image/jpg"), "images/srts63-1.jpg")?;
    catalog.add_image(SRTS63, Some("image/jpg"), "images/srts63-2.jpg")?;
    expect_rejected(catalog.add_image(SRTS63, Some("image/jpg"), "images/srts63-2.jpg"));

    catalog.add_category(SRTS63, "10010000")?;
    catalog.add_category(SRTS63, "10020000")?;
    expect_rejected(catalog.add_category(SRTS63, "10020000"));

    catalog.add_unit(SRTS63, Some("PCE"), None, true)?;
    catalog.add_unit(SRTS63, Some("PCE"), Some("1"), true)?;
    catalog.add_unit(SRTS63, Some("MTR"), Some("6"), true)?;

    let test1 = FeatureSpec::new("f_test1")
        .name("Test1")
        .descr("Test feature 1");
    catalog.add_feature(SRTS63, &test1.clone().value("Success"))?;
    expect_rejected(catalog.add_feature(SRTS63, &test1.value("Failure")));
    catalog.add_feature(
        SRTS63,
        &FeatureSpec::new("f_test2")
            .name("Test2")
            .descr("Test feature 2")
            .value("Success"),
    )?;

    Ok(catalog)
}
