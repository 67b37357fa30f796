use crate::error::{Error, Result};
use crate::memory::Word;

/// Number of return addresses the call stack can hold
pub const STACK_SIZE: usize = 16;

/// Bounded LIFO of subroutine return addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Stack {
    slots: [Word; STACK_SIZE],
    pointer: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next free slot, in `0..=STACK_SIZE`
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn is_empty(&self) -> bool {
        self.pointer == 0
    }

    pub fn push(&mut self, address: Word) -> Result<()> {
        let slot = self
            .slots
            .get_mut(self.pointer)
            .ok_or(Error::StackOverflow)?;
        *slot = address;
        self.pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Word> {
        let top = self.pointer.checked_sub(1).ok_or(Error::StackUnderflow)?;
        self.pointer = top;
        Ok(self.slots[top])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn test_push_pop_is_lifo() -> Result<()> {
        let mut stack = Stack::new();
        stack.push(0x0202)?;
        stack.push(0x0ABC)?;

        assert_eq!(stack.pop()?, 0x0ABC);
        assert_eq!(stack.pop()?, 0x0202);
        assert!(stack.is_empty());

        Ok(())
    }

    #[test]
    fn test_overflow() -> Result<()> {
        let mut stack = Stack::new();
        for n in 0..STACK_SIZE {
            stack.push(n as Word)?;
        }
        let full = stack;

        assert_eq!(stack.push(0xFFFF), Err(Error::StackOverflow));
        assert_eq!(stack, full);
        assert_eq!(stack.pointer(), STACK_SIZE);

        Ok(())
    }

    #[test]
    fn test_underflow() {
        let mut stack = Stack::new();
        assert_eq!(stack.pop(), Err(Error::StackUnderflow));
        assert_eq!(stack.pointer(), 0);
    }
}
