mod array;
mod element;
pub(crate) mod reduce;

pub use array::Array;
pub use element::Element;
