mod color;
mod format;
mod normalize;

pub use color::*;
pub use format::*;
pub use normalize::*;
