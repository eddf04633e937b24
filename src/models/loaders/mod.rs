pub mod csv_loader;

pub use csv_loader::{load_orders_from_file, parse_orders};
