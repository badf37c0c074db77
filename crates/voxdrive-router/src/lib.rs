pub mod command_loop;

pub use command_loop::{CommandLoop, LoopHandle, LoopReport};
