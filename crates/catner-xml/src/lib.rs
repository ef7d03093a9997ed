//! Arena-backed XML documents for the catner catalog engine.
//!
//! This crate provides the generic tree the catalog layer is built on. It
//! wraps [`quick-xml`] for reading and writing, and stores every element and
//! text node in an arena addressed by generational [`NodeId`] handles, so
//! callers can hold on to node references across edits and detect when the
//! node behind a handle has been removed.
//!
//! # Overview
//!
//! The main types are:
//! - [`XmlDocument`]: the arena plus the root element handle
//! - [`NodeId`]: a stable, generational node handle
//! - [`NodeKind`]: element (with [`ElementData`]) or text
//!
//! # Example
//!
//! ```rust
//! use catner_xml::{parse, WriteOptions};
//!
//! let mut doc = parse("<HEADER><LOCALE>EN</LOCALE></HEADER>").unwrap();
//! let header = doc.root().unwrap();
//! let locale = doc.element_children(header).next().unwrap();
//! doc.set_text_content(locale, "DE");
//!
//! let out = doc.to_string_pretty(WriteOptions::default()).unwrap();
//! assert!(out.contains("<LOCALE>DE</LOCALE>"));
//! ```

pub mod error;
pub mod parser;
pub mod types;
pub mod writer;

// Re-export main types
pub use error::{Error, Result};
pub use parser::{parse, parse_file};
pub use types::{ElementData, Node, NodeId, NodeKind, XmlAttribute, XmlDocument};
pub use writer::{WriteOptions, XML_ENCODING, XML_VERSION};
