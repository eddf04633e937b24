pub mod catalog;
pub mod layout;
pub mod loaders;
pub mod order;

pub use catalog::{Catalog, ModelRow};
pub use layout::OutputLayout;
pub use loaders::{load_orders_from_file, parse_orders};
pub use order::OrderRecord;
