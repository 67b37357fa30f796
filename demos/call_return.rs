use color_eyre::eyre::Result;

use chip8::instruction::{Instruction::*, Register::*};
use chip8::machine::{Machine, PROGRAM_START};
use chip8::processor::Processor;
use chip8::write_instructions;
use log::LevelFilter;
use simple_logger::SimpleLogger;

/// Start of the subroutine
const DOUBLE: u16 = 0x300;

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    SimpleLogger::new()
        .with_level(LevelFilter::Debug)
        .init()?; // logging

    let mut machine = Machine::new();
    machine.pc = PROGRAM_START;

    write_instructions!(machine.memory; PROGRAM_START =>
        LoadImm(V0, 21).encode(),
        Call(DOUBLE).encode(),
        DumpRegisters.encode(),
        Jump(PROGRAM_START + 6).encode()
    )?;
    write_instructions!(machine.memory; DOUBLE =>
        Add(V0, V0).encode(),
        Return.encode()
    )?;

    let mut cpu = Processor::new(machine);
    cpu.execute_until_halt()?;

    Ok(())
}
