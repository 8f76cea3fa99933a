pub mod element;
pub mod error;
pub mod mutate;
pub mod parse;
pub mod render;
pub mod types;

pub use element::{
    contains, find_element, find_element_mut, find_first, find_first_in, find_parent, Content,
    Element,
};
pub use error::TreeError;
pub use parse::{parse_document, parse_fragment};
pub use render::{render, render_children};
pub use types::*;
