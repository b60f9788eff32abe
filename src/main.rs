//! jdxi-sysex command line tool
//!
//! Lists MIDI ports, creates and inspects patch files, and moves patches
//! between files and a connected JD-Xi.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use jdxi_sysex::config::LinkConfig;
use jdxi_sysex::engine::{list_ports, Link, TransferSequencer};
use jdxi_sysex::params::PartKind;
use jdxi_sysex::patch::{ParamRef, Patch};
use jdxi_sysex::persistence::{load_patch, save_patch};

#[derive(ValueEnum, Debug, Copy, Clone, Eq, PartialEq)]
enum LogLevel {
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[derive(Parser)]
#[command(name = "jdxi-sysex", version, about = "Patch transfer for the Roland JD-Xi")]
struct Arguments {
    /// Link configuration file (JSON).
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Log level; warnings and errors only when omitted.
    #[arg(long, short, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available MIDI ports.
    Ports,
    /// Write an init patch for a part.
    Init { part: PartKind, file: PathBuf },
    /// Request a part from the device and save it.
    Fetch { part: PartKind, file: PathBuf },
    /// Send a patch file to the device.
    Send { file: PathBuf },
    /// Print every parameter of a patch file.
    Show { file: PathBuf },
    /// Follow live edits made on the device, starting from an init patch.
    Monitor { part: PartKind },
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    let args = Arguments::parse();

    let level = args.log_level.map(tracing::Level::from).unwrap_or(tracing::Level::WARN);
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Arguments) -> CliResult {
    let config = match &args.config {
        Some(path) => LinkConfig::load_from_file(path)?,
        None => LinkConfig::default(),
    };

    match args.command {
        Command::Ports => print_ports(),
        Command::Init { part, file } => {
            let mut patch = Patch::init(part);
            save_patch(&mut patch, &file)?;
            println!("{} init patch written to {}", part.display_name(), file.display());
            Ok(())
        }
        Command::Fetch { part, file } => {
            let sequencer = connect(&config)?;
            let mut patch = sequencer.receive_patch(part)?;
            save_patch(&mut patch, &file)?;
            println!(
                "{} ({}) saved to {}",
                part.display_name(),
                patch.name().unwrap_or("unnamed"),
                file.display()
            );
            Ok(())
        }
        Command::Send { file } => {
            let mut patch = load_patch(&file)?;
            let sequencer = connect(&config)?;
            let report = sequencer.send_patch(&mut patch)?;
            println!(
                "sent {} blocks, {} bytes in {:?}",
                report.blocks.len(),
                report.total_bytes(),
                report.elapsed
            );
            Ok(())
        }
        Command::Show { file } => show(&file),
        Command::Monitor { part } => monitor(&config, part),
    }
}

fn connect(config: &LinkConfig) -> Result<TransferSequencer, Box<dyn std::error::Error>> {
    let link = Link::open(
        config.device_id,
        config.input_port.as_deref(),
        config.output_port.as_deref(),
    )?;
    info!(device_id = %config.device_id, "link open");
    Ok(TransferSequencer::with_link(link, config.timing()))
}

fn print_ports() -> CliResult {
    let ports = list_ports()?;
    println!("Inputs:");
    for name in &ports.inputs {
        println!("  {}", name);
    }
    println!("Outputs:");
    for name in &ports.outputs {
        println!("  {}", name);
    }
    Ok(())
}

fn show(path: &Path) -> CliResult {
    let patch = load_patch(path)?;
    println!("{}", patch.part().display_name());
    for (index, (block, values)) in patch.iter().enumerate() {
        match values.name() {
            Some(name) => println!("[{}] {} \"{}\"", block.address, block.label, name),
            None => println!("[{}] {}", block.address, block.label),
        }
        for param in block.layout.parameters() {
            let reference = ParamRef::new(index, param.offset);
            let value = patch.get(reference)?;
            match patch.label(reference) {
                Some(label) => println!("  {:<32} {:>6}  {}", param.name, value, label),
                None => println!("  {:<32} {:>6}", param.name, value),
            }
        }
    }
    Ok(())
}

fn monitor(config: &LinkConfig, part: PartKind) -> CliResult {
    let sequencer = connect(config)?;
    let mut patch = Patch::init(part);
    println!("following {} edits, interrupt to stop", part.display_name());
    loop {
        let applied = sequencer.apply_incoming(&mut patch)?;
        if applied > 0 {
            println!("{} change(s) applied", applied);
        }
        thread::sleep(config.timing().poll_interval);
    }
}
