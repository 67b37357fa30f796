//! Opcode field extraction and decoding into [`Instruction`].
//!
//! Every CHIP-8 opcode is one big endian word laid out as four nibbles:
//!
//! ```text
//!  op   x    y    n
//! [15..12][11..8][7..4][3..0]
//!           kk = [7..0]
//!      nnn = [11..0]
//! ```

use std::convert::TryFrom;
use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::{Error, Result};
use crate::memory::{Byte, Word};

/// A raw opcode with accessors for its operand fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opcode(pub Word);

impl Opcode {
    /// Instruction group, bits 12-15
    pub fn op(self) -> u8 {
        ((self.0 & 0xF000) >> 12) as u8
    }

    /// First register operand, bits 8-11
    pub fn x(self) -> u8 {
        ((self.0 & 0x0F00) >> 8) as u8
    }

    /// Second register operand, bits 4-7
    pub fn y(self) -> u8 {
        ((self.0 & 0x00F0) >> 4) as u8
    }

    /// Literal nibble, bits 0-3
    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// Immediate byte, bits 0-7
    pub fn kk(self) -> Byte {
        (self.0 & 0x00FF) as Byte
    }

    /// Address, bits 0-11
    pub fn nnn(self) -> Word {
        self.0 & 0x0FFF
    }
}

macro_rules! registers {
    ( $( $( #[doc = $doc:expr] )* $name:ident = $repr:literal , )+ ) => {
        /// The general purpose registers
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(TryFromPrimitive, IntoPrimitive)]
        pub enum Register {
            $(
                $( #[doc = $doc] )*
                $name = $repr,
            )+
        }

        impl Register {
            pub const ALL: &'static [Self] = &[
                $( Self::$name , )+
            ];

            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$name => stringify!($name) , )+
                }
            }
        }

        impl ::std::fmt::Display for Register {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }
    }
}

registers! {
    V0 = 0x0,
    V1 = 0x1,
    V2 = 0x2,
    V3 = 0x3,
    V4 = 0x4,
    V5 = 0x5,
    V6 = 0x6,
    V7 = 0x7,
    V8 = 0x8,
    V9 = 0x9,
    VA = 0xA,
    VB = 0xB,
    VC = 0xC,
    VD = 0xD,
    VE = 0xE,
    /// Carry, borrow and shifted-out bit of the arithmetic instructions
    VF = 0xF,
}

impl Register {
    /// Position in the register file
    pub fn index(self) -> usize {
        u8::from(self) as usize
    }
}

/// A decoded CHIP-8 instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `0nnn` machine code routine, ignored
    Sys(Word),
    /// `00E0`
    ClearDisplay,
    /// `00EE`
    Return,
    /// `0FFF` prints every register (non-standard)
    DumpRegisters,
    /// `1nnn`
    Jump(Word),
    /// `2nnn`
    Call(Word),
    /// `3xkk` skip if `Vx == kk`
    SkipEqImm(Register, Byte),
    /// `4xkk` skip if `Vx != kk`
    SkipNeImm(Register, Byte),
    /// `5xy0` skip if `Vx == Vy`
    SkipEqReg(Register, Register),
    /// `6xkk`
    LoadImm(Register, Byte),
    /// `7xkk`, no carry
    AddImm(Register, Byte),
    /// `8xy0`
    Load(Register, Register),
    /// `8xy1`
    Or(Register, Register),
    /// `8xy2`
    And(Register, Register),
    /// `8xy3`
    Xor(Register, Register),
    /// `8xy4`
    Add(Register, Register),
    /// `8xy5` `Vx - Vy`
    Sub(Register, Register),
    /// `8xy6`
    ShiftRight(Register, Register),
    /// `8xy7` `Vy - Vx`
    SubReverse(Register, Register),
    /// `8xyE`
    ShiftLeft(Register, Register),
    /// `9xy0` skip if `Vx != Vy`
    SkipNeReg(Register, Register),
    /// `Annn`
    LoadIndex(Word),
    /// `Bnnn` jump to `nnn + V0`
    JumpOffset(Word),
    /// `Cxkk`
    Random(Register, Byte),
    /// `Dxyn`
    Draw(Register, Register, u8),
    /// `Ex9E`
    SkipKeyPressed(Register),
    /// `ExA1`
    SkipKeyNotPressed(Register),
    /// `Fxkk` timers, sound, BCD and font lookups
    Misc(Register, Byte),
}

impl Instruction {
    /// Decodes a raw opcode
    pub fn decode(opcode: Word) -> Result<Self> {
        use Instruction::*;

        let fields = Opcode(opcode);
        let unknown = Error::UnknownOpcode(opcode);
        let register =
            |nibble: u8| Register::try_from(nibble).map_err(|_| Error::UnknownOpcode(opcode));
        let (x, y) = (register(fields.x())?, register(fields.y())?);
        let (kk, nnn) = (fields.kk(), fields.nnn());

        let instruction = match fields.op() {
            0x0 => match opcode {
                0x00E0 => ClearDisplay,
                0x00EE => Return,
                0x0FFF => DumpRegisters,
                _ => Sys(nnn),
            },
            0x1 => Jump(nnn),
            0x2 => Call(nnn),
            0x3 => SkipEqImm(x, kk),
            0x4 => SkipNeImm(x, kk),
            0x5 if fields.n() == 0 => SkipEqReg(x, y),
            0x6 => LoadImm(x, kk),
            0x7 => AddImm(x, kk),
            0x8 => match fields.n() {
                0x0 => Load(x, y),
                0x1 => Or(x, y),
                0x2 => And(x, y),
                0x3 => Xor(x, y),
                0x4 => Add(x, y),
                0x5 => Sub(x, y),
                0x6 => ShiftRight(x, y),
                0x7 => SubReverse(x, y),
                0xE => ShiftLeft(x, y),
                _ => return Err(unknown),
            },
            0x9 if fields.n() == 0 => SkipNeReg(x, y),
            0xA => LoadIndex(nnn),
            0xB => JumpOffset(nnn),
            0xC => Random(x, kk),
            0xD => Draw(x, y, fields.n()),
            0xE => match kk {
                0x9E => SkipKeyPressed(x),
                0xA1 => SkipKeyNotPressed(x),
                _ => return Err(unknown),
            },
            0xF => Misc(x, kk),
            _ => return Err(unknown),
        };

        Ok(instruction)
    }

    /// Assembles the instruction back into its opcode
    pub fn encode(&self) -> Word {
        use Instruction::*;

        fn xkk(op: Word, x: Register, kk: Byte) -> Word {
            op << 12 | (x.index() as Word) << 8 | kk as Word
        }
        fn xyn(op: Word, x: Register, y: Register, n: u8) -> Word {
            op << 12 | (x.index() as Word) << 8 | (y.index() as Word) << 4 | (n & 0xF) as Word
        }

        match *self {
            Sys(nnn) => nnn & 0x0FFF,
            ClearDisplay => 0x00E0,
            Return => 0x00EE,
            DumpRegisters => 0x0FFF,
            Jump(nnn) => 0x1000 | nnn & 0x0FFF,
            Call(nnn) => 0x2000 | nnn & 0x0FFF,
            SkipEqImm(x, kk) => xkk(0x3, x, kk),
            SkipNeImm(x, kk) => xkk(0x4, x, kk),
            SkipEqReg(x, y) => xyn(0x5, x, y, 0x0),
            LoadImm(x, kk) => xkk(0x6, x, kk),
            AddImm(x, kk) => xkk(0x7, x, kk),
            Load(x, y) => xyn(0x8, x, y, 0x0),
            Or(x, y) => xyn(0x8, x, y, 0x1),
            And(x, y) => xyn(0x8, x, y, 0x2),
            Xor(x, y) => xyn(0x8, x, y, 0x3),
            Add(x, y) => xyn(0x8, x, y, 0x4),
            Sub(x, y) => xyn(0x8, x, y, 0x5),
            ShiftRight(x, y) => xyn(0x8, x, y, 0x6),
            SubReverse(x, y) => xyn(0x8, x, y, 0x7),
            ShiftLeft(x, y) => xyn(0x8, x, y, 0xE),
            SkipNeReg(x, y) => xyn(0x9, x, y, 0x0),
            LoadIndex(nnn) => 0xA000 | nnn & 0x0FFF,
            JumpOffset(nnn) => 0xB000 | nnn & 0x0FFF,
            Random(x, kk) => xkk(0xC, x, kk),
            Draw(x, y, n) => xyn(0xD, x, y, n),
            SkipKeyPressed(x) => xkk(0xE, x, 0x9E),
            SkipKeyNotPressed(x) => xkk(0xE, x, 0xA1),
            Misc(x, kk) => xkk(0xF, x, kk),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match self {
            Sys(nnn) => write!(f, "SYS 0x{:03X}", nnn),
            ClearDisplay => f.write_str("CLS"),
            Return => f.write_str("RET"),
            DumpRegisters => f.write_str("DUMP"),
            Jump(nnn) => write!(f, "JP 0x{:03X}", nnn),
            Call(nnn) => write!(f, "CALL 0x{:03X}", nnn),
            SkipEqImm(x, kk) => write!(f, "SE {}, 0x{:02X}", x, kk),
            SkipNeImm(x, kk) => write!(f, "SNE {}, 0x{:02X}", x, kk),
            SkipEqReg(x, y) => write!(f, "SE {}, {}", x, y),
            LoadImm(x, kk) => write!(f, "LD {}, 0x{:02X}", x, kk),
            AddImm(x, kk) => write!(f, "ADD {}, 0x{:02X}", x, kk),
            Load(x, y) => write!(f, "LD {}, {}", x, y),
            Or(x, y) => write!(f, "OR {}, {}", x, y),
            And(x, y) => write!(f, "AND {}, {}", x, y),
            Xor(x, y) => write!(f, "XOR {}, {}", x, y),
            Add(x, y) => write!(f, "ADD {}, {}", x, y),
            Sub(x, y) => write!(f, "SUB {}, {}", x, y),
            ShiftRight(x, y) => write!(f, "SHR {}, {}", x, y),
            SubReverse(x, y) => write!(f, "SUBN {}, {}", x, y),
            ShiftLeft(x, y) => write!(f, "SHL {}, {}", x, y),
            SkipNeReg(x, y) => write!(f, "SNE {}, {}", x, y),
            LoadIndex(nnn) => write!(f, "LD I, 0x{:03X}", nnn),
            JumpOffset(nnn) => write!(f, "JP V0, 0x{:03X}", nnn),
            Random(x, kk) => write!(f, "RND {}, 0x{:02X}", x, kk),
            Draw(x, y, n) => write!(f, "DRW {}, {}, {}", x, y, n),
            SkipKeyPressed(x) => write!(f, "SKP {}", x),
            SkipKeyNotPressed(x) => write!(f, "SKNP {}", x),
            Misc(x, kk) => write!(f, "F{:X}{:02X}", x.index(), kk),
        }
    }
}
