pub mod color;
pub mod id;
pub mod model;
pub mod props;

pub use color::Color;
pub use id::{ElementId, LayoutId};
pub use model::*;
pub use props::{ElementProps, PropValue, PropertyError, Stretch};
