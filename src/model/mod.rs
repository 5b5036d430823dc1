pub use neatling_core::{GenomeLogic, MutationKind};
pub mod config {
    pub use neatling_core::config::*;
}
pub mod error {
    pub use neatling_core::error::*;
}
pub mod genome {
    pub use neatling_core::genome::*;
    pub use neatling_data::{Activation, Aggregation};
}
pub mod innovation {
    pub use neatling_core::innovation::*;
}
pub mod network {
    pub use neatling_core::network::*;
}
pub mod species {
    pub use neatling_core::species::*;
}

pub mod task;
