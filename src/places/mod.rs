pub mod enrich;
pub mod normalize;
pub mod search;

#[cfg(test)]
pub(crate) mod fake;

pub use enrich::{enrich_bar, enrich_bars, merge_details};
pub use normalize::{NormalizeError, SchemaShape, normalize_place, normalize_places};
pub use search::search_places;
