pub mod document;

pub use document::{AttrMatch, ElementSnapshot, XmlDocument};
