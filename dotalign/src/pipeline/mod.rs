mod align;
pub use align::align;

mod matrix;
pub use matrix::matrix;
