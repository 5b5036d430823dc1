pub mod feed_forward;
pub mod functions;
pub mod layers;

pub use feed_forward::{FeedForwardNetwork, NodeEval};
pub use functions::{ActivationFn, AggregationFn, FunctionRegistry};
pub use layers::{feed_forward_layers, required_for_output};
