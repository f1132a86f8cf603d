mod alignment;
pub use alignment::{Alignment, AlignmentBuilder};

mod trace;
pub use trace::{AlignedPair, Cursor, Step, TraceStep, UTF8_DASH};

mod transformed_matrix;
pub use transformed_matrix::TransformedMatrix;
