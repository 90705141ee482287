pub mod dimension;
pub mod display;
pub mod element;
pub mod parsers;
pub mod text;

pub use dimension::{AutoMargins, Dimension, Margins};
pub use display::{Clear, Display, Float, Position};
pub use element::{ElementStyle, Insets};
pub use parsers::StyleParseError;
pub use text::TextAlign;
