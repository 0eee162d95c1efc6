use clap::error::ErrorKind;
use clap::Parser;
use std::fs::File;
use std::io::{self, Write};
use std::process;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use xftmpl::{
    encode, EncodeOptions, Encoded, Error, InterruptHook, OverflowPolicy, PendingOutput,
};

const STDIO: &str = "-";

/// Binary encode X templates from text format.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output to a C header file instead of a binary file
    #[arg(short = 'H')]
    header: bool,

    /// Output to a C header file, data in variable NAME
    #[arg(short = 'i', value_name = "NAME")]
    var_name: Option<String>,

    /// In a C header file, define NAME to be the data size
    #[arg(short = 's', value_name = "NAME")]
    size_name: Option<String>,

    /// Write output to FILE (`-` for standard output)
    #[arg(short = 'o', value_name = "FILE", default_value = STDIO)]
    output: String,

    /// Silently truncate names, strings and numbers longer than 511 bytes
    #[arg(long)]
    truncate: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Input file (`-` for standard input)
    #[arg(value_name = "INFILE")]
    input: String,
}

impl Cli {
    fn header_mode(&self) -> bool {
        self.header || self.var_name.is_some()
    }

    fn options(&self) -> EncodeOptions {
        let overflow = if self.truncate {
            OverflowPolicy::Truncate
        } else {
            OverflowPolicy::Reject
        };
        EncodeOptions {
            overflow,
            var_name: self.var_name.clone(),
            size_name: self.size_name.clone(),
        }
    }

    fn input_name(&self) -> &str {
        if self.input == STDIO {
            "stdin"
        } else {
            &self.input
        }
    }

    fn output_name(&self) -> &str {
        if self.output == STDIO {
            "stdout"
        } else {
            &self.output
        }
    }
}

fn read_input(cli: &Cli) -> Result<Encoded, Error> {
    let options = cli.options();
    if cli.input == STDIO {
        encode(io::stdin().lock(), &options)
    } else {
        let file = File::open(&cli.input)
            .map_err(|e| Error::io(&format!("{}: {}", cli.input, e)))?;
        encode(file, &options)
    }
}

fn write_output<W: Write>(cli: &Cli, encoded: &Encoded, writer: W) -> Result<(), Error> {
    if cli.header_mode() {
        encoded.write_c_header(writer, cli.input_name(), cli.output_name())
    } else {
        encoded.write_raw(writer)
    }
}

fn run(cli: &Cli, hook: &InterruptHook) -> Result<(), Error> {
    let encoded = read_input(cli)?;
    info!(
        input = cli.input_name(),
        bytes = encoded.len(),
        "encoded templates"
    );

    if cli.output == STDIO {
        return write_output(cli, &encoded, io::stdout().lock());
    }

    let mut output = PendingOutput::create(&cli.output, hook)?;
    write_output(cli, &encoded, &mut output)?;
    output.commit()?;
    debug!(path = %cli.output, "output committed");
    Ok(())
}

fn report(cli: &Cli, err: &Error) {
    let program = env!("CARGO_BIN_NAME");
    match err {
        Error::Lex { line, kind } => {
            eprintln!("{}:{}: error: {}", cli.input_name(), line, kind);
        }
        Error::Config {
            line: Some(line),
            msg,
        } => eprintln!("{}:{}: error: {}", cli.input_name(), line, msg),
        _ => eprintln!("{}: {}", program, err),
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // Usage errors exit with 1 like every other failure, not clap's 2.
            eprint!("{}", Error::usage(e));
            process::exit(1);
        }
    };

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let hook = InterruptHook::new();
    let handler_hook = hook.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        handler_hook.cleanup();
        process::exit(1);
    }) {
        warn!(error = %e, "failed to install termination handler");
    }

    // `run` owns every pending output, so partial files are gone before exiting.
    let status = match run(&cli, &hook) {
        Ok(()) => 0,
        Err(e) => {
            report(&cli, &e);
            1
        }
    };
    process::exit(status);
}
