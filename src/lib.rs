pub mod error;
pub mod instruction;
pub mod machine;
pub mod memory;
pub mod processor;
pub mod stack;

pub use error::{Error, LoadFailure, Result, Space};
pub use machine::Machine;
pub use processor::{Halt, Options, Processor, Step};
