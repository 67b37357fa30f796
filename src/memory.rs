use std::fmt::Write;

use crate::error::{Error, Result, Space};

pub type Byte = u8; // 1 byte
pub type Word = u16; // 2 bytes

/// Size of the CHIP-8 address space in bytes
pub const MEMORY_SIZE: usize = 4096;

/// Cells shown per row of a memory dump
const DUMP_ROW: usize = 8;

/// Default memory
pub type StdMem = Memory<MEMORY_SIZE>;

/// Emulates memory for use with the CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Memory<const S: usize> {
    /// The actual data of the memory
    data: [Byte; S],
}

impl<const S: usize> Default for Memory<S> {
    /// Initializes the memory
    fn default() -> Self {
        Memory { data: [0; S] }
    }
}

impl<const S: usize> Memory<S> {
    /// Reads a byte from the memory
    pub fn read_byte(&self, position: Word) -> Result<Byte> {
        self.data
            .get(position as usize)
            .copied()
            .ok_or_else(|| out_of_range(position as usize))
    }

    /// Writes a byte to the memory
    pub fn write_byte(&mut self, position: Word, value: Byte) -> Result<()> {
        let cell = self
            .data
            .get_mut(position as usize)
            .ok_or_else(|| out_of_range(position as usize))?;
        *cell = value;
        Ok(())
    }

    /// Reads a word from the memory (big endian)
    pub fn read_word(&self, position: Word) -> Result<Word> {
        let high = self.read_byte(position)?;
        let low = self.read_byte(position.wrapping_add(1))?;
        Ok(Word::from_be_bytes([high, low]))
    }

    /// Writes a word to the memory (big endian)
    pub fn write_word(&mut self, position: Word, value: Word) -> Result<()> {
        self.write_array(position, &value.to_be_bytes())
    }

    /// Writes an array of bytes to the memory. Nothing is written unless every byte fits.
    pub fn write_array(&mut self, position: Word, data: &[Byte]) -> Result<()> {
        let start = position as usize;
        let cells = self
            .data
            .get_mut(start..start + data.len())
            .ok_or_else(|| out_of_range(start.max(S)))?;
        cells.copy_from_slice(data);
        Ok(())
    }

    /// Renders every cell as hex, eight per row, each row tagged with the address it ends at
    pub fn dump(&self) -> String {
        let mut out = String::with_capacity(S * 3);
        for (row, cells) in self.data.chunks(DUMP_ROW).enumerate() {
            for cell in cells {
                let _ = write!(out, "{:02x}", cell);
            }
            let _ = writeln!(out, " 0x{:x}", row * DUMP_ROW + cells.len());
        }
        out
    }
}

fn out_of_range(index: usize) -> Error {
    Error::OutOfRange {
        space: Space::Memory,
        index,
    }
}

/// Writes a block of opcodes directly into the memory, high byte first
#[macro_export]
macro_rules! write_instructions {
    ( $mem:expr ; $pos:expr => $( $opcode:expr ),+ $(,)? ) => {
        $mem.write_array($pos, &[
            $(
                (($opcode as $crate::memory::Word) >> 8) as $crate::memory::Byte,
                (($opcode as $crate::memory::Word) & 0xFF) as $crate::memory::Byte,
            )+
        ])
    };
}

#[cfg(test)]
mod tests {
    use crate::instruction::{Instruction, Register};

    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn test_read_byte() -> Result<()> {
        let mut mem = StdMem::default();
        mem.data[0x2] = 0x12;
        assert_eq!(mem.read_byte(0x2)?, 0x12);

        Ok(())
    }

    #[test]
    fn test_write_byte() -> Result<()> {
        let mut mem = StdMem::default();
        mem.write_byte(0x44, 12)?;
        assert_eq!(mem.data[0x44], 12);

        Ok(())
    }

    #[test]
    fn test_out_of_range_access() -> Result<()> {
        let mut mem = StdMem::default();
        let expected = Error::OutOfRange {
            space: Space::Memory,
            index: MEMORY_SIZE,
        };

        assert_eq!(mem.read_byte(0x1000), Err(expected.clone()));
        assert_eq!(mem.write_byte(0x1000, 1), Err(expected));
        assert_eq!(mem.read_byte(0x0FFF)?, 0);
        assert_eq!(mem, StdMem::default());

        Ok(())
    }

    #[test]
    fn test_read_word() -> Result<()> {
        let mut mem = StdMem::default();
        mem.data[0] = 0x12;
        mem.data[1] = 0x34;
        assert_eq!(mem.read_word(0)?, 0x1234); // big endian

        Ok(())
    }

    #[test]
    fn test_read_word_across_the_end() {
        let mem = StdMem::default();
        assert_eq!(
            mem.read_word(0x0FFF),
            Err(Error::OutOfRange {
                space: Space::Memory,
                index: 0x1000,
            })
        );
    }

    #[test]
    fn test_write_word() -> Result<()> {
        let mut mem = StdMem::default();
        mem.write_word(0x44, 0x1234)?;
        assert_eq!(mem.data[0x44], 0x12); // big endian
        assert_eq!(mem.data[0x45], 0x34);

        Ok(())
    }

    #[test]
    fn test_write_array() -> Result<()> {
        let mut mem = StdMem::default();
        mem.write_array(0x44, &[0x12, 0x34, 0x56, 0x78])?;
        assert_eq!(mem.data[0x44], 0x12);
        assert_eq!(mem.data[0x45], 0x34);
        assert_eq!(mem.data[0x46], 0x56);
        assert_eq!(mem.data[0x47], 0x78);

        Ok(())
    }

    #[test]
    fn test_write_array_past_the_end_writes_nothing() {
        let mut mem = StdMem::default();
        assert!(mem.write_array(0x0FFE, &[1, 2, 3]).is_err());
        assert_eq!(mem, StdMem::default());
    }

    #[test]
    fn test_write_instructions() -> Result<()> {
        let mut mem = StdMem::default();

        mem.write_array(0x200, &[0x60, 0x2A, 0x61, 0x3A, 0x80, 0x14, 0x00, 0xEE])?;

        let mut mem2 = StdMem::default();
        write_instructions!(mem2; 0x200 =>
            Instruction::LoadImm(Register::V0, 42).encode(),
            Instruction::LoadImm(Register::V1, 58).encode(),
            Instruction::Add(Register::V0, Register::V1).encode(),
            0x00EE
        )?;

        assert_eq!(mem, mem2);

        Ok(())
    }

    #[test]
    fn test_dump() -> Result<()> {
        let mut mem = Memory::<16>::default();
        mem.write_array(0, &[0xde, 0xad, 0xbe, 0xef])?;
        mem.write_byte(15, 0x01)?;

        assert_eq!(
            mem.dump(),
            "deadbeef00000000 0x8\n0000000000000001 0x10\n"
        );

        Ok(())
    }
}
