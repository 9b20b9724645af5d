//! Command shell for the roomlog sensor log store.
//!
//! Runs a single command given on the command line, or reads commands line
//! by line from stdin (interactively or from a piped script). The log book
//! lives only for the duration of the process.

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use roomlog::{ErrorCode, LogBook, ReadingValue, RoomLogError, StoreConfig};
use tracing_subscriber::EnvFilter;

/// roomlog: in-memory sensor log store, grouped by room.
#[derive(Parser)]
#[command(name = "roomlog", version, about)]
struct Cli {
    /// JSON file with store configuration (`capacity`, `max_name_len`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum rooms, entries, and entries per room (overrides the config file).
    #[arg(long)]
    capacity: Option<usize>,

    /// Load the built-in sample data before running commands.
    #[arg(long)]
    sample: bool,

    /// Output format for listings.
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Run one command and exit instead of reading commands from stdin.
    #[command(subcommand)]
    command: Option<Command>,
}

/// One line of shell input.
#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Load the built-in sample rooms and readings.
    LoadSample,

    /// Print all entries in sorted order.
    Entries,

    /// Print every room with its entries.
    Rooms,

    /// Register a new room.
    AddRoom {
        /// Room name (quote names containing spaces).
        name: String,
    },

    /// Add a reading to an existing room.
    AddEntry {
        /// Room name (quote names containing spaces).
        room: String,

        /// Integer timestamp.
        #[arg(allow_negative_numbers = true)]
        timestamp: i64,

        /// Reading kind: 1=TEMP, 2=DB, 3=MOTION.
        kind: i32,

        /// Reading value: a temperature, a decibel level, or three 0/1 motion flags.
        #[arg(num_args = 1..=3, required = true, allow_negative_numbers = true)]
        values: Vec<String>,
    },

    /// Check that entries are in sorted order.
    TestOrder,

    /// Check that room indexes reference exactly their own entries.
    TestRooms,

    /// Leave the shell.
    #[command(alias = "quit")]
    Exit,
}

/// Output format for listings.
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Fixed-width tables.
    Text,
    /// Pretty-printed JSON.
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::from_json_file(path)?,
        None => StoreConfig::default(),
    };
    if let Some(capacity) = cli.capacity {
        config = config.with_capacity(capacity);
    }

    let mut shell = Shell {
        book: LogBook::new(config)?,
        format: cli.format,
    };
    tracing::debug!(capacity = config.capacity, "log book ready");

    if cli.sample {
        shell.dispatch(Command::LoadSample)?;
    }

    match cli.command {
        Some(command) => {
            shell.dispatch(command)?;
        }
        None => shell.repl()?,
    }

    Ok(())
}

/// Whether the shell should keep reading commands.
#[derive(PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

struct Shell {
    book: LogBook,
    format: OutputFormat,
}

impl Shell {
    /// Reads and runs commands from stdin until `exit` or end of input.
    fn repl(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let stdin = std::io::stdin();
        let interactive = stdin.is_terminal();

        if interactive {
            println!("roomlog shell. Type 'help' for commands, 'exit' to quit.");
        }

        let mut lines = stdin.lock().lines();
        loop {
            if interactive {
                print!("> ");
                std::io::stdout().flush()?;
            }

            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;

            let words = match split_words(&line) {
                Ok(words) if words.is_empty() => continue,
                Ok(words) => words,
                Err(reason) => {
                    println!("Error: {reason}");
                    continue;
                }
            };

            let command = match ShellLine::try_parse_from(words) {
                Ok(parsed) => parsed.command,
                Err(e) => {
                    // Covers `help` as well as real parse errors.
                    if let Err(io_err) = e.print() {
                        eprintln!("Error: {io_err}");
                    }
                    continue;
                }
            };

            if self.dispatch(command)? == Flow::Exit {
                break;
            }
        }

        Ok(())
    }

    fn dispatch(&mut self, command: Command) -> Result<Flow, Box<dyn std::error::Error>> {
        match command {
            Command::LoadSample => self.cmd_load_sample(),
            Command::Entries => self.cmd_entries()?,
            Command::Rooms => self.cmd_rooms()?,
            Command::AddRoom { name } => self.cmd_add_room(&name),
            Command::AddEntry {
                room,
                timestamp,
                kind,
                values,
            } => self.cmd_add_entry(&room, timestamp, kind, &values),
            Command::TestOrder => self.cmd_test_order(),
            Command::TestRooms => self.cmd_test_rooms(),
            Command::Exit => {
                println!("Exiting program.");
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Implements `load-sample`.
    fn cmd_load_sample(&mut self) {
        let summary = roomlog::sample::load_sample(&mut self.book);
        if summary.is_ok() {
            println!(
                "Sample data loaded successfully ({} rooms, {} entries).",
                summary.rooms_added, summary.entries_added
            );
        } else {
            println!(
                "Error loading sample data: {} of the operations were rejected.",
                summary.rejected.len()
            );
            for (operation, error) in &summary.rejected {
                println!("  {operation}: {error}");
            }
        }
    }

    /// Implements `entries`.
    fn cmd_entries(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self.format {
            OutputFormat::Text => {
                println!("All Entries (sorted):");
                print!("{}", roomlog::report::format_all_entries(&self.book)?);
            }
            OutputFormat::Json => {
                let records = roomlog::report::entry_records(&self.book);
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
        }
        Ok(())
    }

    /// Implements `rooms`.
    fn cmd_rooms(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self.format {
            OutputFormat::Text => {
                println!("All Rooms:");
                print!("{}", roomlog::report::format_all_rooms(&self.book)?);
            }
            OutputFormat::Json => {
                let records = roomlog::report::room_records(&self.book);
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
        }
        Ok(())
    }

    /// Implements `add-room <name>`.
    fn cmd_add_room(&mut self, name: &str) {
        match self.book.register_room(name) {
            Ok(_) => println!("Room '{name}' added successfully."),
            Err(e) => println!("Error: {}", describe(&e, &self.book)),
        }
    }

    /// Implements `add-entry <room> <timestamp> <kind> <values...>`.
    fn cmd_add_entry(&mut self, room_name: &str, timestamp: i64, kind: i32, values: &[String]) {
        let Some(room) = self.book.find_room(room_name) else {
            println!("Error: Room '{room_name}' not found.");
            return;
        };

        let Some(value) = parse_value(kind, values) else {
            println!("Error: Invalid entry data.");
            return;
        };

        match self.book.create_entry(room, kind, value, timestamp) {
            Ok(_) => println!("Entry added successfully."),
            Err(e) => println!("Error: {}", describe(&e, &self.book)),
        }
    }

    /// Implements `test-order`.
    fn cmd_test_order(&self) {
        match roomlog::verify::check_order(&self.book) {
            Ok(()) => println!("Order test PASSED."),
            Err(e) => println!("Order test FAILED: {e}"),
        }
    }

    /// Implements `test-rooms`.
    fn cmd_test_rooms(&self) {
        match roomlog::verify::check_room_links(&self.book) {
            Ok(()) => println!("Room entries test PASSED."),
            Err(e) => println!("Room entries test FAILED: {e}"),
        }
    }
}

/// Maps an error to the message shown to the user.
fn describe(error: &RoomLogError, book: &LogBook) -> String {
    match error.code() {
        ErrorCode::Full => match error {
            RoomLogError::Room(_) => format!(
                "Cannot add more rooms (maximum {} reached).",
                book.rooms().capacity()
            ),
            _ => "Cannot add more entries (maximum reached).".to_string(),
        },
        ErrorCode::InvalidKind => "Invalid entry data.".to_string(),
        _ => error.to_string(),
    }
}

/// Parses the raw value words for a kind selector.
///
/// Returns `None` if the words do not fit the kind. An unknown selector
/// still yields a payload so the log book reports the invalid kind itself.
fn parse_value(kind: i32, values: &[String]) -> Option<ReadingValue> {
    match (kind, values) {
        (1, [celsius]) => celsius.parse().ok().map(ReadingValue::Temperature),
        (3, [a, b, c]) => Some(ReadingValue::Motion([
            a.parse().ok()?,
            b.parse().ok()?,
            c.parse().ok()?,
        ])),
        (1 | 3, _) => None,
        (_, [db]) => db.parse().ok().map(ReadingValue::Decibels),
        _ => None,
    }
}

/// Splits a shell line into words, honoring double quotes.
fn split_words(line: &str) -> Result<Vec<String>, &'static str> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        return Err("unterminated quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
