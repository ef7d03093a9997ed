//! `catner amend`: repair a catalog that lacks mandatory elements.

use anyhow::{Context, Result};
use catner::{Catalog, CatalogDefaults};
use tracing::info;

use super::edit::EditTarget;

pub fn execute(target: EditTarget, defaults: CatalogDefaults) -> Result<()> {
    let mut catalog = Catalog::load(&target.file, true)
        .with_context(|| format!("failed to load {}", target.file.display()))?;
    catalog.set_defaults(defaults);

    match &target.output {
        Some(output) => catalog.write_to(output)?,
        None => catalog.save()?,
    }
    info!(articles = catalog.num_articles(), "amended catalog");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_amend_adds_missing_anchors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bare.xml");
        fs::write(&path, "<BMECAT/>").unwrap();
        assert!(Catalog::load(&path, false).is_err());

        let target = EditTarget {
            file: path.clone(),
            output: None,
        };
        execute(target, CatalogDefaults::default()).unwrap();

        let catalog = Catalog::load(&path, false).unwrap();
        assert_eq!(catalog.num_articles(), 0);
        insta::assert_snapshot!(catalog.to_xml_string().unwrap(), @r#"
        <?xml version="1.0" encoding="utf-8"?>
        <BMECAT>
          <HEADER>
            <CATALOG/>
          </HEADER>
          <T_NEW_CATALOG/>
        </BMECAT>
        "#);
    }
}
