use std::path::PathBuf;

use chip8::machine::Machine;
use chip8::processor::{Halt, Options, Processor};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use log::*;
use simple_logger::SimpleLogger;

/// Runs a raw CHIP-8 program image
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Program image, loaded at 0x200
    rom: PathBuf,
    /// Most verbose level that gets logged
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
    /// Record the carry only internally and leave VF untouched
    #[arg(long)]
    no_vf_carry: bool,
    /// Print all registers once execution stops
    #[arg(long)]
    dump_registers: bool,
    /// Print all of memory once execution stops
    #[arg(long)]
    dump_memory: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    let args = Args::parse();
    SimpleLogger::new().with_level(args.log_level).init()?; // logging

    let mut machine = Machine::new();
    machine
        .load_image(&args.rom)
        .wrap_err("could not load program")?;

    let options = Options {
        mirror_carry: !args.no_vf_carry,
    };
    let mut cpu = Processor::with_options(machine, options);
    let outcome = cpu.execute_until_halt();

    if args.dump_registers {
        info!("registers:\n{}", cpu.machine.dump_registers());
    }
    if args.dump_memory {
        info!("memory:\n{}", cpu.machine.dump_memory());
    }

    match outcome {
        Ok(Halt::EndOfMemory) => info!("Program terminated at the end of memory"),
        Ok(Halt::SelfJump(address)) => info!("Program terminated at 0x{:03X}", address),
        Err(err) => {
            let pc = cpu.machine.pc;
            return Err(err).wrap_err_with(|| format!("execution stopped near 0x{:03X}", pc));
        }
    }

    Ok(())
}
