//! Long lived state behind the views: a ticker refreshing progress bars and a store holding the
//! latest series fetched from the data source.

pub mod store;
pub mod ticker;
