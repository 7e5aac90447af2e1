pub mod classifier;

pub use classifier::{Classification, LineClassifier, ParseError};
