pub mod buffer;
pub mod classifier;
pub mod frame;
pub mod palette;
pub mod pixel;
pub mod utils;
