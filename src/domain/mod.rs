pub mod bar;
pub mod osm_bar;

pub use bar::{BarRecord, PriceLevel, UNNAMED_BAR};
pub use osm_bar::OsmBar;
