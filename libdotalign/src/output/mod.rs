pub mod output_standard;
pub use output_standard::write_standard_output;

pub mod output_tabular;
pub use output_tabular::{Field, TableFormat, DEFAULT_COLUMNS};
