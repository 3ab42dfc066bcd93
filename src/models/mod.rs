mod process;
mod wire;

pub use process::*;
pub use wire::*;
