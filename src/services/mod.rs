pub mod archiver;
pub mod catalog_resolver;
pub mod failure_log;
pub mod form_driver;
pub mod order_source;
pub mod receipt_composer;
pub mod receipt_exporter;

pub use archiver::{ArchiveReport, Archiver};
pub use catalog_resolver::resolve_catalog;
pub use failure_log::FailureLog;
pub use form_driver::FormDriver;
pub use order_source::OrderSource;
pub use receipt_composer::embed_screenshot_to_receipt;
pub use receipt_exporter::{ExportedReceipt, ReceiptExporter};
