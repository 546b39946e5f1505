//! Markup fragments as an owned tree.
//!
//! Templates are parsed into a detached [`Node`] list, rewritten by the
//! template compiler and serialized back with [`serialize`].

pub mod node;
pub mod parser;
pub mod serializer;

pub use node::{Attribute, Element, Node};
pub use parser::{is_void_element, parse_fragment};
pub use serializer::serialize;
