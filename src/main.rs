use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox::ast_printer::AstPrinter;
use rox::lox::{decode_source, Lox, RunError};
use rox::scanner::Scanner;
use rox::token::Token;

/// Exit code for a malformed command line.
const EXIT_USAGE: i32 = 64;

/// Exit code for an input file that cannot be read.
const EXIT_IO: i32 = 74;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    /// Without a subcommand an interactive prompt is started
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the token stream as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a single expression and prints its AST
    Parse { filename: PathBuf },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a Lox program
    Run { filename: PathBuf },
}

/// Reads the contents of a file into a String
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    decode_source(buf).context(format!("File {:?} is not valid UTF-8", filename))
}

/// Like [`read_file`], but an unreadable file ends the process with 74.
fn read_source(filename: &Path) -> String {
    match read_file(filename) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(EXIT_IO);
        }
    }
}

fn init_logger() -> Result<()> {
    // Create or open the log file
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // Configure env_logger to write to file with module and source line
    Builder::new()
        .format(|buf, record| {
            // Strip 'rox::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// Print every diagnostic and exit with the phase's code.
fn fail(error: RunError) -> ! {
    debug!("Run failed: {:?}", error);

    for diagnostic in error.diagnostics() {
        eprintln!("{}", diagnostic);
    }

    std::process::exit(error.exit_code());
}

fn tokenize(filename: &Path, json: bool) -> Result<()> {
    info!("Running Tokenize subcommand");

    let source = read_source(filename);
    let mut tokens: Vec<Token> = Vec::new();
    let mut tokenized = true;

    for token in Scanner::new(&source) {
        match token {
            Ok(token) => {
                debug!("Scanned token: {}", token);

                if !json {
                    println!("{}", token);
                }

                tokens.push(token);
            }

            Err(e) => {
                tokenized = false;

                debug!("Tokenization debug: {}", e);

                eprintln!("{}", e);
            }
        }
    }

    if json {
        let rendered =
            serde_json::to_string_pretty(&tokens).context("Failed to serialize tokens")?;
        println!("{}", rendered);
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code 65");

        std::process::exit(65);
    }

    info!("Tokenization completed successfully");

    Ok(())
}

/// Interactive prompt: one line is one run; errors are reported and the
/// session continues with its state intact.
fn run_prompt() -> Result<()> {
    info!("Starting interactive prompt");

    let mut lox = Lox::new();
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        line.clear();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;

        if read == 0 {
            println!();
            break;
        }

        if let Err(e) = lox.run(&line) {
            debug!("Prompt line failed: {:?}", e);

            eprintln!("{}", e);
        }
    }

    info!("Prompt closed");

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version land here too, on stdout
            let code: i32 = if e.use_stderr() { EXIT_USAGE } else { 0 };
            e.print().context("Failed to print usage")?;
            std::process::exit(code);
        }
    };

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.command {
        None => run_prompt()?,

        Some(Commands::Tokenize { filename, json }) => tokenize(&filename, json)?,

        Some(Commands::Parse { filename }) => {
            info!("Running Parse subcommand");

            let source = read_source(&filename);

            match Lox::new().parse_expression(&source) {
                Ok(expr) => {
                    let ast_str = AstPrinter::print(&expr);

                    debug!("AST: {}", ast_str);
                    println!("{}", ast_str);
                }

                Err(e) => fail(e),
            }

            info!("Parse subcommand completed");
        }

        Some(Commands::Evaluate { filename }) => {
            info!("Running Evaluate subcommand");

            let source = read_source(&filename);

            match Lox::new().evaluate(&source) {
                Ok(value) => {
                    debug!("Evaluated to: {}", value);
                    println!("{}", value);
                }

                Err(e) => fail(e),
            }

            info!("Evaluate subcommand completed");
        }

        Some(Commands::Run { filename }) => {
            info!("Running Run subcommand");

            let source = read_source(&filename);
            info!("Provided input:\n {}", source);

            match Lox::new().run(&source) {
                Ok(()) => info!("Program executed successfully"),
                Err(e) => fail(e),
            }
        }
    }

    Ok(())
}
