//! # Recibo CLI
//!
//! Command-line interface for compiling and previewing receipt markup.
//!
//! ## Usage
//!
//! ```bash
//! # Compile markup with JSON bindings to a byte file
//! recibo compile receipt.xml --data order.json --output receipt.bin
//!
//! # Render compiled bytes as text
//! recibo decode receipt.bin --width 42
//!
//! # Compile and render in one step
//! recibo preview receipt.xml --data order.json
//!
//! # Compile and send to a printer device
//! recibo print receipt.xml --data order.json --device /dev/usb/lp0
//! ```
//!
//! Set `RUST_LOG=recibo=debug` to trace compilation.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use recibo::{
    CompileOptions, FileTransport, Printer, ReciboError, TemplateContext, compile_file,
    preview::{self, PreviewConfig},
};

/// Recibo - receipt markup compiler for ESC/POS printers
#[derive(Parser, Debug)]
#[command(name = "recibo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile markup to an ESC/POS byte file
    Compile {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file (defaults to the markup path with a .bin extension)
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render an ESC/POS byte file as text
    Decode {
        /// Compiled byte file
        input: PathBuf,

        /// Characters per line
        #[arg(long)]
        width: Option<usize>,
    },

    /// Compile markup and render it as text
    Preview {
        #[command(flatten)]
        source: SourceArgs,

        /// Characters per line
        #[arg(long)]
        width: Option<usize>,
    },

    /// Compile markup and send it to a printer device
    Print {
        #[command(flatten)]
        source: SourceArgs,

        /// Printer device or output path
        #[arg(long, default_value = "/dev/usb/lp0")]
        device: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Receipt markup file
    markup: PathBuf,

    /// JSON file whose fields become template variables
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// JSON file with compile options
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Default text encoding (ascii, utf-8, cp437, latin1)
    #[arg(long)]
    encoding: Option<String>,

    /// Skip schema validation
    #[arg(long)]
    no_validate: bool,

    /// Fail when a loop would expand more than this many items
    #[arg(long)]
    max_loop_items: Option<usize>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ReciboError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile { source, output } => {
            let bytes = compile_source(&source)?;
            let output = output.unwrap_or_else(|| source.markup.with_extension("bin"));
            std::fs::write(&output, &bytes)?;
            println!("Compiled {} bytes to {}", bytes.len(), output.display());
        }
        Commands::Decode { input, width } => {
            let bytes = std::fs::read(&input)?;
            print!("{}", preview::decode(&bytes, line_width(width))?);
        }
        Commands::Preview { source, width } => {
            let bytes = compile_source(&source)?;
            print!("{}", preview::decode(&bytes, line_width(width))?);
        }
        Commands::Print { source, device } => {
            let bytes = compile_source(&source)?;
            println!("Sending {} bytes to {}...", bytes.len(), device.display());
            let mut printer = FileTransport::new(&device);
            printer.connect()?;
            printer.send(&bytes)?;
            println!("Printed successfully!");
        }
    }

    Ok(())
}

fn line_width(width: Option<usize>) -> usize {
    width.unwrap_or_else(|| PreviewConfig::default().line_width)
}

/// Compile the markup named by `source`, applying bindings and option overrides.
fn compile_source(source: &SourceArgs) -> Result<Vec<u8>, ReciboError> {
    let mut options = match &source.options {
        Some(path) => read_json::<CompileOptions>(path)?,
        None => CompileOptions::default(),
    };
    if let Some(encoding) = &source.encoding {
        options.encoding = encoding.clone();
    }
    if source.no_validate {
        options.validate = false;
    }
    if source.max_loop_items.is_some() {
        options.max_loop_items = source.max_loop_items;
    }

    match &source.data {
        Some(path) => {
            let mut ctx = TemplateContext::from_json(read_json(path)?);
            compile_file(&source.markup, Some(&mut ctx), &options)
        }
        None => compile_file(&source.markup, None, &options),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ReciboError> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| {
        ReciboError::InvalidCommand(format!("Failed to parse {}: {}", path.display(), e))
    })
}
