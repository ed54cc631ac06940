mod table;
pub use table::{Row, TableError, read_rows, read_rows_from_path, write_plans};
