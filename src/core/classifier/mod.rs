//! Feed-forward whistler classifier and its weight-file format

mod network;
mod weights;

pub use network::{sigmoid, Classifier, ForwardPass, NO_WHISTLER};
pub use weights::{format_weights, Layer, WeightSet};
