pub mod frame;
pub mod history;
pub mod keypoint;

pub use frame::*;
pub use history::*;
pub use keypoint::*;
