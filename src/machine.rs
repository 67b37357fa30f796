use std::fmt::Write;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use log::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, LoadFailure, Result, Space};
use crate::memory::{Byte, StdMem, Word, MEMORY_SIZE};
use crate::stack::Stack;

/// Number of general purpose registers
pub const REGISTER_COUNT: usize = 16;

/// Where program images are placed and execution starts
pub const PROGRAM_START: Word = 0x200;

/// Complete state of a CHIP-8 machine
#[derive(Debug, Clone)]
pub struct Machine {
    pub memory: StdMem,
    registers: [Byte; REGISTER_COUNT],
    pub stack: Stack,
    /// Program counter
    pub pc: Word,
    /// Index register
    pub i: Word,
    /// Carry of the last arithmetic or shift instruction
    pub carry: bool,
    rng: StdRng,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    /// Creates a zeroed machine whose random generator is seeded from the clock
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(seed)
    }

    /// Creates a zeroed machine with a fixed random seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            memory: StdMem::default(),
            registers: [0; REGISTER_COUNT],
            stack: Stack::new(),
            pc: 0,
            i: 0,
            carry: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn read_register(&self, index: usize) -> Result<Byte> {
        self.registers
            .get(index)
            .copied()
            .ok_or(Error::OutOfRange {
                space: Space::Register,
                index,
            })
    }

    pub fn write_register(&mut self, index: usize, value: Byte) -> Result<()> {
        let register = self.registers.get_mut(index).ok_or(Error::OutOfRange {
            space: Space::Register,
            index,
        })?;
        *register = value;
        Ok(())
    }

    pub fn read_memory(&self, address: Word) -> Result<Byte> {
        self.memory.read_byte(address)
    }

    pub fn write_memory(&mut self, address: Word, value: Byte) -> Result<()> {
        self.memory.write_byte(address, value)
    }

    pub fn push(&mut self, address: Word) -> Result<()> {
        self.stack.push(address)
    }

    pub fn pop(&mut self) -> Result<Word> {
        self.stack.pop()
    }

    pub fn random_byte(&mut self) -> Byte {
        self.rng.gen()
    }

    /// Copies a program into memory at [`PROGRAM_START`] and points the program counter at it
    pub fn load_program(&mut self, program: &[Byte]) -> Result<()> {
        let capacity = MEMORY_SIZE - PROGRAM_START as usize;
        if program.len() > capacity {
            return Err(LoadFailure::TooLarge {
                size: program.len(),
                capacity,
            }
            .into());
        }

        self.memory.write_array(PROGRAM_START, program)?;
        self.pc = PROGRAM_START;
        debug!("loaded {} bytes at 0x{:03X}", program.len(), PROGRAM_START);

        Ok(())
    }

    /// Reads a raw program image from disk and loads it, see [`Machine::load_program`]
    pub fn load_image<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let unreadable = |err: std::io::Error| LoadFailure::Unreadable {
            path: path.to_path_buf(),
            message: err.to_string(),
        };

        let capacity = MEMORY_SIZE - PROGRAM_START as usize;
        let file = File::open(path).map_err(unreadable)?;
        let metadata = file.metadata().map_err(unreadable)?;
        let expected = metadata.len() as usize;
        if expected > capacity {
            return Err(LoadFailure::TooLarge {
                size: expected,
                capacity,
            }
            .into());
        }

        // devices and pipes report no length, so never read more than fits plus one byte
        let mut image = Vec::with_capacity(expected);
        let read = file
            .take(capacity as u64 + 1)
            .read_to_end(&mut image)
            .map_err(unreadable)?;
        if read > capacity {
            return Err(LoadFailure::TooLarge {
                size: read,
                capacity,
            }
            .into());
        }
        if metadata.is_file() && read != expected {
            return Err(LoadFailure::Truncated {
                path: path.to_path_buf(),
                expected,
                read,
            }
            .into());
        }

        self.load_program(&image)?;
        info!("loaded image `{}` ({} bytes)", path.display(), read);

        Ok(read)
    }

    /// One line per register, decimal index and value as 4 digit hex
    pub fn dump_registers(&self) -> String {
        let mut out = String::new();
        for (index, value) in self.registers.iter().enumerate() {
            let _ = writeln!(out, "V{} = {:04x}", index, value);
        }
        out
    }

    pub fn dump_memory(&self) -> String {
        self.memory.dump()
    }
}
