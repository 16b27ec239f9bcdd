/// copy-through handling of the pixels without a full window.
pub mod border;

/// neighborhood window sampling.
pub mod neighborhood;

mod median;
pub use median::*;

pub use border::fill_border;
pub use neighborhood::{sample, sample_window, Window};
