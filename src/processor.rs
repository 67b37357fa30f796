use log::*;

use crate::error::{Error, Result};
use crate::instruction::{Instruction, Register};
use crate::machine::Machine;
use crate::memory::{Byte, Word, MEMORY_SIZE};

/// Register that receives the carry when [`Options::mirror_carry`] is set
const FLAG_REGISTER: Register = Register::VF;

/// Behavioral switches of the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Options {
    /// Also write the carry of arithmetic and shift instructions into VF
    pub mirror_carry: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { mirror_carry: true }
    }
}

/// Why a run ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Halt {
    /// The program counter moved past the last memory cell
    EndOfMemory,
    /// A jump targeted its own address
    SelfJump(Word),
}

/// Outcome of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Continue,
    Halted(Halt),
}

/// Emulates the CHIP-8 CPU on top of a [`Machine`]
#[derive(Debug, Clone)]
pub struct Processor {
    pub machine: Machine,
    pub options: Options,
}

impl Processor {
    pub fn new(machine: Machine) -> Self {
        Self::with_options(machine, Options::default())
    }

    pub fn with_options(machine: Machine, options: Options) -> Self {
        Self { machine, options }
    }

    /// Reads the opcode at the program counter and moves past it
    pub fn fetch(&mut self) -> Result<Word> {
        let high = self.machine.read_memory(self.machine.pc)?;
        let low = self.machine.read_memory(self.machine.pc.wrapping_add(1))?;
        self.machine.pc = self.machine.pc.wrapping_add(2);

        Ok(Word::from_be_bytes([high, low]))
    }

    /// Executes a single, already fetched instruction
    pub fn execute_instruction(&mut self, instruction: Instruction) -> Result<Step> {
        use Instruction::*;

        match instruction {
            Sys(address) => {
                trace!("SYS 0x{:03X} ignored", address);
            }
            ClearDisplay | Draw(..) | SkipKeyPressed(_) | SkipKeyNotPressed(_) | Misc(..) => {
                return Err(Error::UnimplementedOpcode(instruction.encode()));
            }
            Return => {
                let address = self.machine.pop()?;
                self.machine.pc = address;
            }
            DumpRegisters => {
                info!("registers:\n{}", self.machine.dump_registers());
            }
            Jump(address) => {
                // pc already points past the jump
                if address == self.machine.pc.wrapping_sub(2) {
                    self.machine.pc = MEMORY_SIZE as Word;
                    info!("jump to self at 0x{:03X}, halting", address);
                    return Ok(Step::Halted(Halt::SelfJump(address)));
                }
                self.machine.pc = address;
            }
            Call(address) => {
                self.machine.push(self.machine.pc)?;
                self.machine.pc = address;
            }
            SkipEqImm(x, kk) => {
                let vx = self.read(x)?;
                self.skip_if(vx == kk);
            }
            SkipNeImm(x, kk) => {
                let vx = self.read(x)?;
                self.skip_if(vx != kk);
            }
            SkipEqReg(x, y) => {
                let (vx, vy) = (self.read(x)?, self.read(y)?);
                self.skip_if(vx == vy);
            }
            SkipNeReg(x, y) => {
                let (vx, vy) = (self.read(x)?, self.read(y)?);
                self.skip_if(vx != vy);
            }
            LoadImm(x, kk) => self.write(x, kk)?,
            AddImm(x, kk) => {
                let vx = self.read(x)?;
                self.write(x, vx.wrapping_add(kk))?;
            }
            Load(x, y) => {
                let vy = self.read(y)?;
                self.write(x, vy)?;
            }
            Or(x, y) => {
                let (vx, vy) = (self.read(x)?, self.read(y)?);
                self.write(x, vx | vy)?;
            }
            And(x, y) => {
                let (vx, vy) = (self.read(x)?, self.read(y)?);
                self.write(x, vx & vy)?;
            }
            Xor(x, y) => {
                let (vx, vy) = (self.read(x)?, self.read(y)?);
                self.write(x, vx ^ vy)?;
            }
            Add(x, y) => {
                let (vx, vy) = (self.read(x)?, self.read(y)?);
                let (sum, carry) = vx.overflowing_add(vy);
                self.write(x, sum)?;
                self.set_carry(carry)?;
            }
            Sub(x, y) => {
                let (vx, vy) = (self.read(x)?, self.read(y)?);
                self.write(x, vx.wrapping_sub(vy))?;
                self.set_carry(vx > vy)?;
            }
            ShiftRight(x, _) => {
                let vx = self.read(x)?;
                self.write(x, vx >> 1)?;
                self.set_carry(vx & 0x01 == 0x01)?;
            }
            SubReverse(x, y) => {
                let (vx, vy) = (self.read(x)?, self.read(y)?);
                self.write(x, vy.wrapping_sub(vx))?;
                self.set_carry(vy > vx)?;
            }
            ShiftLeft(x, _) => {
                let vx = self.read(x)?;
                self.write(x, vx << 1)?;
                self.set_carry(vx & 0x80 == 0x80)?;
            }
            LoadIndex(address) => {
                self.machine.i = address;
            }
            JumpOffset(address) => {
                let v0 = self.read(Register::V0)?;
                self.machine.pc = address + v0 as Word;
            }
            Random(x, kk) => {
                let value = self.machine.random_byte() & kk;
                self.write(x, value)?;
            }
        }

        Ok(Step::Continue)
    }

    /// Runs one fetch, decode and execute cycle
    pub fn execute(&mut self) -> Result<Step> {
        let address = self.machine.pc;
        let opcode = self.fetch()?;
        let instruction = Instruction::decode(opcode)?;
        debug!("0x{:03X}: {:04X} {}", address, opcode, instruction);

        self.execute_instruction(instruction)
    }

    /// Run program until it leaves memory, jumps onto itself or faults
    pub fn execute_until_halt(&mut self) -> Result<Halt> {
        while (self.machine.pc as usize) < MEMORY_SIZE {
            if let Step::Halted(halt) = self.execute()? {
                return Ok(halt);
            }
        }

        info!("program counter left memory at 0x{:04X}", self.machine.pc);
        Ok(Halt::EndOfMemory)
    }

    fn read(&self, register: Register) -> Result<Byte> {
        self.machine.read_register(register.index())
    }

    fn write(&mut self, register: Register, value: Byte) -> Result<()> {
        self.machine.write_register(register.index(), value)
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.machine.pc = self.machine.pc.wrapping_add(2);
        }
    }

    fn set_carry(&mut self, carry: bool) -> Result<()> {
        self.machine.carry = carry;
        if self.options.mirror_carry {
            self.write(FLAG_REGISTER, carry as Byte)?;
        }
        Ok(())
    }
}
