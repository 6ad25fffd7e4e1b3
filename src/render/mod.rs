pub mod badge;
pub mod card;
pub mod layout;
pub mod text;

pub use card::{CardRenderer, header_colour};
pub use layout::{CardGeometry, CardLayout, Region, canvas_size};
pub use text::{FontPainter, HAlign, TextPainter, VAlign, draw_fitted, fit_text_size};
