pub mod dates;
pub mod error;
pub mod structs;
pub mod view;

// Re-export the core types to provide a clean public API.
pub use dates::parse_order_date;
pub use error::CoreError;
pub use structs::{OrderRecord, YearMonth};
pub use view::FilteredView;
