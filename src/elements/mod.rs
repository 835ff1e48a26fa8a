//! Structural elements module

mod element;
mod material;
mod node;
mod section;

pub use element::{Element, ElementKind, ElementProperties};
pub use material::Material;
pub use node::Node;
pub use section::Section;
