use color_eyre::eyre::Result;

use chip8::machine::{Machine, PROGRAM_START};
use chip8::processor::Processor;
use chip8::write_instructions;
use log::LevelFilter;
use simple_logger::SimpleLogger;

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    SimpleLogger::new()
        .with_level(LevelFilter::Debug)
        .init()?; // logging

    let mut machine = Machine::new();
    machine.pc = PROGRAM_START;

    write_instructions!(machine.memory; PROGRAM_START =>
        0x600A, // V0 = 10
        0x70FF, // V0 -= 1
        0x3000, // skip if V0 == 0
        0x1202, // loop
        0x0FFF, // dump registers
        0x120A  // halt
    )?;

    let mut cpu = Processor::new(machine);
    cpu.execute_until_halt()?;

    Ok(())
}
