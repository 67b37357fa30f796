use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::memory::Word;

/// The address space an out of range index was used against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Space {
    Register,
    Memory,
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Space::Register => f.write_str("register"),
            Space::Memory => f.write_str("memory"),
        }
    }
}

/// Why a program image could not be placed into memory
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    #[error("cannot open `{}`: {message}", .path.display())]
    Unreadable { path: PathBuf, message: String },
    #[error("read {read} of {expected} bytes from `{}`", .path.display())]
    Truncated {
        path: PathBuf,
        expected: usize,
        read: usize,
    },
    #[error("image is {size} bytes but only {capacity} fit above the load address")]
    TooLarge { size: usize, capacity: usize },
}

/// Every fault the interpreter can run into. All of them stop execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{space} index 0x{index:X} is out of range")]
    OutOfRange { space: Space, index: usize },
    #[error("stack overflow: no free return slot")]
    StackOverflow,
    #[error("stack underflow: no return address to pop")]
    StackUnderflow,
    #[error("instruction 0x{0:04X} is not implemented")]
    UnimplementedOpcode(Word),
    #[error("unknown instruction 0x{0:04X}")]
    UnknownOpcode(Word),
    #[error("failed to load image: {0}")]
    ImageLoadFailure(#[from] LoadFailure),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_fault() {
        let err = Error::OutOfRange {
            space: Space::Register,
            index: 16,
        };
        assert_eq!(err.to_string(), "register index 0x10 is out of range");

        let err = Error::UnimplementedOpcode(0xD125);
        assert_eq!(err.to_string(), "instruction 0xD125 is not implemented");

        let err: Error = LoadFailure::TooLarge {
            size: 4000,
            capacity: 3584,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "failed to load image: image is 4000 bytes but only 3584 fit above the load address"
        );
    }
}
