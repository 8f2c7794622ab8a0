pub mod decode;
pub mod encode;
pub mod history;

pub use decode::*;
pub use encode::*;
pub use history::*;
