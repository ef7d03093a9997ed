//! BMEcat product catalogs.
//!
//! A [`Catalog`] owns a BMEcat document and offers keyed CRUD for articles
//! and everything below them (images, category references, order units,
//! features and their variants), header metadata (generator, locale,
//! territories), and a selection cursor for walking the catalog.
//!
//! # Example
//!
//! ```rust
//! use catner::{Catalog, FeatureSpec};
//!
//! let mut catalog = Catalog::new();
//! catalog.set_locale("DE").unwrap();
//! catalog.add_article("SRTS62", Some("Sicherheitsroststufe"), None).unwrap();
//! catalog.add_unit("SRTS62", Some("PCE"), None, true).unwrap();
//! catalog
//!     .add_feature("SRTS62", &FeatureSpec::new("f_width").name("Width").unit("mm").value("800"))
//!     .unwrap();
//!
//! catalog.select_article("SRTS62").unwrap();
//! catalog.selected().add_category("10010000").unwrap();
//! assert_eq!(catalog.categories("SRTS62").unwrap(), ["10010000"]);
//! ```

pub mod articles;
pub mod catalog;
pub mod categories;
pub mod config;
pub mod cursor;
pub mod error;
pub mod features;
pub mod images;
pub mod schema;
pub mod selection;
pub mod tree;
pub mod units;

pub use catalog::{Catalog, STDOUT_PATH};
pub use config::{CatalogDefaults, ConfigError};
pub use error::{Error, ErrorKind, Result};
pub use features::FeatureSpec;
pub use selection::SelectedScope;
pub use units::Unit;
