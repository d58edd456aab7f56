pub mod format;

pub use format::{NO_RESULTS, render_hits};
