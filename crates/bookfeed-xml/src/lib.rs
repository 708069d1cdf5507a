//! XML element tree for bookfeed.
//!
//! Product advertising API responses are small documents queried by slash
//! separated paths such as `Items/Item/ItemAttributes/Title`. This crate parses
//! a response into an owned [`XmlElement`] tree and answers those path queries.
//!
//! # Namespaces
//!
//! Responses declare a versioned default namespace. Elements are stored under
//! their local name only, and namespace declarations are dropped along with
//! every other attribute, so path lookups never have to spell out a namespace.

pub mod element;
pub mod error;
pub mod parse;

pub use element::XmlElement;
pub use error::XmlError;
pub use parse::parse_document;
