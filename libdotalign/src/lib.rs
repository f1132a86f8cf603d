pub mod align;
pub mod output;
pub mod structs;

mod util;
