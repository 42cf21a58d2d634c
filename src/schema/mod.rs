pub mod definition;
pub mod names;
pub mod policy;
pub mod table;
pub mod types;

pub use definition::{read_definitions, ColumnDef};
pub use names::{column_name_from_heading, is_valid_column_name};
pub use policy::HeadingPolicy;
pub use table::ColumnSchema;
pub use types::Column;
