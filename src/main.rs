use clap::{Args, Parser, Subcommand};
use pascalfe::backend::{create_backend, BackendKind};
use pascalfe::frontend::TokenValue;
use pascalfe::message::{Message, MessageHandler, MessageListener};
use pascalfe::utils::config::listing::LINE_PREFIX_WIDTH;
use pascalfe::utils::cross_referencer::CrossReferencer;
use pascalfe::utils::errors::{PascalError, PascalResult};
use pascalfe::utils::parse_tree_printer::{ParseTreeDotPrinter, ParseTreePrinter};
use pascalfe::{read, translate, Options, Translation};
use std::cell::RefCell;
use std::rc::Rc;
use std::{fs, path::PathBuf, time::Instant};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Pascal front end with compile and interpret back ends",
    long_about = "Pascal front end with compile and interpret back ends.\n\
                 It scans and parses a Pascal program, builds its symbol tables and\n\
                 intermediate code, and hands an error-free program to a back end.\n\
                 \n\
                 Example usage:\n\
                 pascalfe compile -f hello.pas              # Parse and run the compiler back end\n\
                 pascalfe interpret -f hello.pas -x         # Also print the cross-reference listing\n\
                 pascalfe compile -f hello.pas -i           # Print the intermediate code\n\
                 pascalfe compile -f hello.pas --dot t.dot  # Write the parse tree as a Graphviz file\n\
                 pascalfe compile -f hello.pas -v           # Trace every token scanned\n\
                 pascalfe compile -f hello.pas -t           # Show phase timing"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse the program and run the code generator
    Compile(RunArgs),
    /// Parse the program and run the interpreter
    Interpret(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    // Pascal source file (.pas)
    #[arg(short, long)]
    filename: PathBuf,

    // Print the intermediate code of every routine
    #[arg(short = 'i', long)]
    intermediate: bool,

    // Print the cross-reference listing
    #[arg(short = 'x', long)]
    xref: bool,

    // Write the parse tree in Graphviz DOT form
    #[arg(long)]
    dot: Option<PathBuf>,

    // Trace every token scanned
    #[arg(short, long)]
    verbose: bool,

    // Show phase timing
    #[arg(short, long)]
    timing: bool,
}

// Statistics gathered from the summary messages
#[derive(Debug, Default)]
struct TranslationStats {
    line_count: usize,
    error_count: usize,
    token_count: usize,
    parse_time: f64,
    backend_time: f64,
    report_time: f64,
    total_time: f64,
    icode_nodes: usize,
}

/// Prints every message in listing form and keeps the numbers needed for
/// the statistics table.
struct ListingPrinter {
    stats: TranslationStats,
}

impl ListingPrinter {
    fn new() -> Self {
        Self {
            stats: TranslationStats::default(),
        }
    }
}

fn token_value_text(value: &TokenValue) -> Option<String> {
    match value {
        TokenValue::None | TokenValue::Error(_) => None,
        TokenValue::Integer(value) => Some(value.to_string()),
        TokenValue::Real(value) => Some(value.to_string()),
        TokenValue::Str(text) => Some(format!("\"{}\"", text)),
    }
}

impl MessageListener for ListingPrinter {
    fn message_received(&mut self, message: &Message) {
        match message {
            Message::SourceLine { line_number, text } => println!("{:03} {}", line_number, text),
            Message::Token {
                line_number,
                position,
                kind,
                text,
                value,
            } => {
                self.stats.token_count += 1;
                println!(">>> {:<15} line={:03}, pos={:2}, text=\"{}\"", kind.to_string(), line_number, position, text);
                if let Some(value) = token_value_text(value) {
                    println!(">>>                 value={}", value);
                }
            }
            Message::SyntaxError { position, text, message, .. } => {
                println!("{}^", " ".repeat(LINE_PREFIX_WIDTH + position));
                println!("*** {} [at \"{}\"]", message, text);
            }
            Message::ParserSummary {
                line_count,
                error_count,
                elapsed_time,
            } => {
                self.stats.line_count = *line_count;
                self.stats.error_count = *error_count;
                self.stats.parse_time = *elapsed_time;
                println!();
                println!("{:10} source lines.", line_count);
                println!("{:10} syntax errors.", error_count);
                println!("{:10.2} seconds total parsing time.", elapsed_time);
            }
            Message::CompilerSummary {
                instruction_count,
                elapsed_time,
            } => {
                self.stats.backend_time = *elapsed_time;
                println!();
                println!("{:10} instructions generated.", instruction_count);
                println!("{:10.2} seconds total code generation time.", elapsed_time);
            }
            Message::InterpreterSummary {
                execution_count,
                runtime_errors,
                elapsed_time,
            } => {
                self.stats.backend_time = *elapsed_time;
                println!();
                println!("{:10} statements executed.", execution_count);
                println!("{:10} runtime errors.", runtime_errors);
                println!("{:10.2} seconds total execution time.", elapsed_time);
            }
            Message::Fatal { message, .. } => eprintln!("{}", message),
        }
    }
}

// Print error message and exit with error code
fn fatal(msg: &str, status: i32) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(status);
}

// Listings requested on the command line, printed after translation
fn print_reports(translation: &Translation, args: &RunArgs) -> PascalResult<usize> {
    let stack = &translation.outcome.symtab_stack;

    if args.xref {
        println!("\n{}", CrossReferencer::new(stack).print()?);
    }
    if args.intermediate {
        print!("{}", ParseTreePrinter::new(stack).print()?);
    }
    if let Some(path) = &args.dot {
        let dot = ParseTreeDotPrinter::new(stack).print()?;
        fs::write(path, dot)?;
        println!("Parse tree written to: {}", path.display());
    }

    Ok(translation.program_icode().and_then(|icode| icode.root()).map_or(0, |root| root.count()))
}

fn run(kind: BackendKind, args: &RunArgs, printer: &Rc<RefCell<ListingPrinter>>) -> PascalResult<()> {
    let start_time = Instant::now();
    let source = read(&args.filename)?;

    let mut messages = MessageHandler::new();
    messages.add_listener(printer.clone());
    let mut backend = create_backend(kind, messages.clone());
    let options = Options {
        trace_tokens: args.verbose,
    };

    let translation = translate(&source, backend.as_mut(), options, messages)?;

    let report_start = Instant::now();
    let icode_nodes = print_reports(&translation, args)?;

    let mut printer = printer.borrow_mut();
    printer.stats.report_time = report_start.elapsed().as_secs_f64();
    printer.stats.icode_nodes = icode_nodes;
    printer.stats.total_time = start_time.elapsed().as_secs_f64();
    Ok(())
}

// Print detailed translation statistics
fn print_stats(stats: &TranslationStats) {
    println!("\n Translation Statistics:");
    println!("┌─────────────────────┬───────────┐");
    println!("│ Phase               │ Time (s)  │");
    println!("├─────────────────────┼───────────┤");
    println!("│ Parsing             │ {:>8.3} │", stats.parse_time);
    println!("│ Back end            │ {:>8.3} │", stats.backend_time);
    println!("│ Listings            │ {:>8.3} │", stats.report_time);
    println!("├─────────────────────┼───────────┤");
    println!("│ Total Time          │ {:>8.3} │", stats.total_time);
    println!("└─────────────────────┴───────────┘");

    println!("\n Program Metrics:");
    println!("  • Source lines:       {}", stats.line_count);
    println!("  • Syntax errors:      {}", stats.error_count);
    println!("  • Tokens traced:      {}", stats.token_count);
    println!("  • ICode nodes:        {}", stats.icode_nodes);
}

fn main() {
    let cli = Cli::parse();
    let (kind, args) = match &cli.command {
        Command::Compile(args) => (BackendKind::Compile, args),
        Command::Interpret(args) => (BackendKind::Interpret, args),
    };

    let printer = Rc::new(RefCell::new(ListingPrinter::new()));
    match run(kind, args, &printer) {
        Ok(()) => {
            if args.timing {
                print_stats(&printer.borrow().stats);
            }
        }
        // Already reported through the message channel
        Err(err @ PascalError::TooManyErrors { .. }) => std::process::exit(err.exit_status()),
        Err(err) => fatal(&format!("Translation failed: {}", err), err.exit_status()),
    }
}
