//! End-to-end tests for building and editing a catalog in memory.

use catner::{Catalog, ErrorKind, FeatureSpec, Unit};
use pretty_assertions::assert_eq;

/// The sample catalog: every duplicate add fails and leaves no trace.
fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.set_generator("not great").unwrap();
    catalog.set_generator("catner").unwrap();
    catalog.set_locale("DE").unwrap();
    catalog.set_locale("EN").unwrap();
    catalog.add_territory("DE").unwrap();
    catalog.add_territory("AT").unwrap();
    catalog.add_territory("DE").unwrap();

    catalog
        .add_article(
            "SRTS62",
            Some("Sicherheitsroststufe ECO X12"),
            Some("Total preiswerte Stufe, mach die mal jetzt rein da, komm, mach."),
        )
        .unwrap();
    catalog
        .add_article(
            "SRTS63",
            Some("Sicherheitsroststufe Schlingenhorst"),
            Some("Super geile Stufe, die sogar mit Schlappen zu besteigen ist!"),
        )
        .unwrap();
    let dup = catalog.add_article("SRTS63", Some("This should not exist."), None);
    assert_eq!(dup.unwrap_err().kind(), ErrorKind::AlreadyExists);

    catalog
        .add_image("SRTS63", Some("image/jpg"), "images/srts63-1.jpg")
        .unwrap();
    catalog
        .add_image("SRTS63", Some("image/jpg"), "images/srts63-2.jpg")
        .unwrap();
    assert!(catalog.add_image("SRTS63", None, "images/srts63-2.jpg").is_err());

    catalog.add_category("SRTS63", "10010000").unwrap();
    catalog.add_category("SRTS63", "10020000").unwrap();
    assert!(catalog.add_category("SRTS63", "10020000").is_err());

    catalog.add_unit("SRTS63", Some("PCE"), None, true).unwrap();
    catalog.add_unit("SRTS63", Some("PCE"), Some("1"), true).unwrap();
    catalog.add_unit("SRTS63", Some("MTR"), Some("6"), true).unwrap();

    let f1 = FeatureSpec::new("f_test1")
        .name("Test1")
        .descr("Test feature 1");
    catalog.add_feature("SRTS63", &f1.clone().value("Success")).unwrap();
    assert!(catalog.add_feature("SRTS63", &f1.value("Failure")).is_err());
    catalog
        .add_feature(
            "SRTS63",
            &FeatureSpec::new("f_test2")
                .name("Test2")
                .descr("Test feature 2")
                .value("Success"),
        )
        .unwrap();
    catalog
}

#[test]
fn test_sample_catalog_serialization() {
    let catalog = sample_catalog();
    insta::assert_snapshot!(catalog.to_xml_string().unwrap(), @r#"
    <?xml version="1.0" encoding="utf-8"?>
    <BMECAT version="2005" xmlns="http://www.bmecat.org/bmecat/2005.1">
      <HEADER>
        <GENERATOR_INFO>catner</GENERATOR_INFO>
        <CATALOG>
          <LOCALE>EN</LOCALE>
          <TERRITORY>DE</TERRITORY>
          <TERRITORY>AT</TERRITORY>
        </CATALOG>
      </HEADER>
      <T_NEW_CATALOG>
        <ARTICLE>
          <SUPPLIER_AID>SRTS62</SUPPLIER_AID>
          <ARTICLE_DETAILS>
            <DESCRIPTION_SHORT>Sicherheitsroststufe ECO X12</DESCRIPTION_SHORT>
            <DESCRIPTION_LONG>Total preiswerte Stufe, mach die mal jetzt rein da, komm, mach.</DESCRIPTION_LONG>
          </ARTICLE_DETAILS>
        </ARTICLE>
        <ARTICLE>
          <SUPPLIER_AID>SRTS63</SUPPLIER_AID>
          <ARTICLE_DETAILS>
            <DESCRIPTION_SHORT>Sicherheitsroststufe Schlingenhorst</DESCRIPTION_SHORT>
            <DESCRIPTION_LONG>Super geile Stufe, die sogar mit Schlappen zu besteigen ist!</DESCRIPTION_LONG>
          </ARTICLE_DETAILS>
          <MIME_INFO>
            <MIME>
              <MIME_TYPE>image/jpg</MIME_TYPE>
              <MIME_SOURCE>images/srts63-1.jpg</MIME_SOURCE>
            </MIME>
            <MIME>
              <MIME_TYPE>image/jpg</MIME_TYPE>
              <MIME_SOURCE>images/srts63-2.jpg</MIME_SOURCE>
            </MIME>
          </MIME_INFO>
          <ARTICLE_REFERENCE>
            <CATALOG_ID>10010000</CATALOG_ID>
          </ARTICLE_REFERENCE>
          <ARTICLE_REFERENCE>
            <CATALOG_ID>10020000</CATALOG_ID>
          </ARTICLE_REFERENCE>
          <ARTICLE_ORDER_DETAILS>
            <ORDER_UNIT>MTR</ORDER_UNIT>
            <ALTERNATIVE_UNIT>
              <ALTERNATIVE_UNIT_CODE>PCE</ALTERNATIVE_UNIT_CODE>
              <ALTERNATIVE_UNIT_FACTOR>1</ALTERNATIVE_UNIT_FACTOR>
            </ALTERNATIVE_UNIT>
            <ALTERNATIVE_UNIT>
              <ALTERNATIVE_UNIT_CODE>MTR</ALTERNATIVE_UNIT_CODE>
              <ALTERNATIVE_UNIT_FACTOR>6</ALTERNATIVE_UNIT_FACTOR>
            </ALTERNATIVE_UNIT>
          </ARTICLE_ORDER_DETAILS>
          <ARTICLE_FEATURES>
            <FEATURE>
              <FID>f_test1</FID>
              <FNAME>Test1</FNAME>
              <FDESCR>Test feature 1</FDESCR>
              <FUNIT>00</FUNIT>
              <FORDER>1</FORDER>
              <FVALUE>Success</FVALUE>
            </FEATURE>
            <FEATURE>
              <FID>f_test2</FID>
              <FNAME>Test2</FNAME>
              <FDESCR>Test feature 2</FDESCR>
              <FUNIT>00</FUNIT>
              <FORDER>2</FORDER>
              <FVALUE>Success</FVALUE>
            </FEATURE>
          </ARTICLE_FEATURES>
        </ARTICLE>
      </T_NEW_CATALOG>
    </BMECAT>
    "#);
}

#[test]
fn test_sample_catalog_queries() {
    let catalog = sample_catalog();
    assert_eq!(catalog.generator().as_deref(), Some("catner"));
    assert_eq!(catalog.locale().as_deref(), Some("EN"));
    assert_eq!(catalog.territories(), vec!["DE", "AT"]);
    assert_eq!(catalog.article_ids(), vec!["SRTS62", "SRTS63"]);
    assert_eq!(
        catalog.article_title("SRTS63").unwrap().as_deref(),
        Some("Sicherheitsroststufe Schlingenhorst")
    );
    assert_eq!(catalog.num_images("SRTS63").unwrap(), 2);
    assert_eq!(catalog.num_categories("SRTS63").unwrap(), 2);
    assert_eq!(catalog.main_unit("SRTS63").unwrap().as_deref(), Some("MTR"));
    assert_eq!(
        catalog.units("SRTS63").unwrap(),
        vec![
            Unit {
                code: "PCE".into(),
                factor: "1".into()
            },
            Unit {
                code: "MTR".into(),
                factor: "6".into()
            },
        ]
    );
    assert_eq!(
        catalog.feature_value("SRTS63", "f_test1").unwrap().as_deref(),
        Some("Success")
    );
    assert_eq!(catalog.num_features("SRTS62").unwrap(), 0);
}

#[test]
fn test_feature_order_stays_contiguous() {
    let mut catalog = Catalog::new();
    catalog.add_article("A", None, None).unwrap();
    let mut live: Vec<String> = Vec::new();

    // Interleave adds and deletes from the front, middle and back
    let script: &[(&str, &str)] = &[
        ("add", "a"),
        ("add", "b"),
        ("add", "c"),
        ("del", "b"),
        ("add", "d"),
        ("del", "a"),
        ("add", "e"),
        ("del", "e"),
        ("add", "f"),
    ];
    for (op, fid) in script {
        match *op {
            "add" => {
                catalog.add_feature("A", &FeatureSpec::new(*fid)).unwrap();
                live.push(fid.to_string());
            }
            _ => {
                catalog.delete_feature("A", fid).unwrap();
                live.retain(|f| f != fid);
            }
        }
        let orders: Vec<usize> = catalog
            .feature_ids("A")
            .unwrap()
            .iter()
            .map(|fid| catalog.feature_order("A", fid).unwrap().unwrap())
            .collect();
        let expected: Vec<usize> = (1..=live.len()).collect();
        assert_eq!(orders, expected, "after {op} {fid}");
    }
    assert_eq!(catalog.feature_ids("A").unwrap(), live);
}

#[test]
fn test_deleting_selected_article_empties_cursor() {
    let mut catalog = sample_catalog();
    catalog.select_article("SRTS63").unwrap();
    catalog.select_feature("f_test2").unwrap();
    catalog.select_first_image().unwrap();

    catalog.delete_article("SRTS63").unwrap();
    assert_eq!(catalog.selected_article_id(), None);
    assert_eq!(catalog.selected_feature_id(), None);
    assert_eq!(catalog.selected_image_path(), None);

    let err = catalog.selected().add_category("1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSelectionArticle);
    assert_eq!(catalog.last_error(), Some(ErrorKind::NoSelectionArticle));
    assert_eq!(catalog.last_error(), None);
}

#[test]
fn test_walk_whole_catalog_with_cursor() {
    let mut catalog = sample_catalog();
    let mut summary = Vec::new();

    let mut article = catalog.select_first_article();
    while article.is_ok() {
        let aid = catalog.selected_article_id().unwrap();
        let mut features = Vec::new();
        let mut feature = catalog.select_first_feature();
        while feature.is_ok() {
            features.extend(catalog.selected_feature_id());
            feature = catalog.select_next_feature();
        }
        summary.push(format!("{aid}: {}", features.join(",")));
        article = catalog.select_next_article();
    }

    assert_eq!(summary, vec!["SRTS62: ", "SRTS63: f_test1,f_test2"]);
    assert_eq!(catalog.last_error(), Some(ErrorKind::NoSuchNode));
}

#[test]
fn test_variants_through_cursor() {
    let mut catalog = sample_catalog();
    catalog.select_article("SRTS63").unwrap();
    catalog.select_feature("f_test1").unwrap();
    {
        let mut scope = catalog.selected();
        scope.add_variant("S", "small").unwrap();
        scope.add_variant("L", "large").unwrap();
    }
    assert_eq!(catalog.feature_value("SRTS63", "f_test1").unwrap(), None);

    catalog.select_first_variant().unwrap();
    catalog.select_next_variant().unwrap();
    catalog.selected().set_variant_value("huge").unwrap();
    assert_eq!(
        catalog.variant_value("SRTS63", "f_test1", "L").unwrap().as_deref(),
        Some("huge")
    );

    let err = catalog.set_feature_value("SRTS63", "f_test1", "x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
}
