pub mod quote;
pub mod rescale;
pub mod source;

pub use quote::PriceQuote;
pub use rescale::rescale_to_live;
pub use source::{PriceSource, RandomWalkSource, StaticSource};
