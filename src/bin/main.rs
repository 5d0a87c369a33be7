use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use sign_core::{
    Alphabet, CellOutcome, ConversionSession, FsAssetProvider, SessionConfig, WordResult,
};
use std::io::{self, stdin, stdout, Write};
use std::path::PathBuf;

enum Status {
    Info(String),
    Error(String),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Optional first argument: path to a JSON config file.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = SessionConfig::load_or_default(config_path.as_deref())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut session = ConversionSession::from_config(config);
    let mut status: Option<Status> = None;

    loop {
        print_ui(&session, status.take())?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim_end_matches(['\r', '\n']);

        match line.trim() {
            "exit" => break,
            "" => {}
            ":en" => session.set_alphabet(Alphabet::Latin),
            ":ar" => session.set_alphabet(Alphabet::Arabic),
            ":clear" => session.clear(),
            ":copy" => {
                let text = session.copy_all();
                status = Some(Status::Info(format!("All letters copied: {text}")));
            }
            s if s.starts_with(":copy ") => {
                status = Some(copy_one(&session, &s[":copy ".len()..]));
            }
            _ => {
                session.set_input(line);
                if let Err(e) = runtime.block_on(session.convert_input()) {
                    status = Some(Status::Error(e.to_string()));
                }
            }
        }
    }

    println!();
    Ok(())
}

/// `:copy W L` with 1-based word and letter numbers, as labelled on screen.
fn copy_one(session: &ConversionSession<FsAssetProvider>, args: &str) -> Status {
    let numbers: Vec<usize> = args
        .split_whitespace()
        .filter_map(|n| n.parse().ok())
        .collect();
    match numbers.as_slice() {
        [word, letter] if *word > 0 && *letter > 0 => {
            match session.copy_cell(word - 1, letter - 1) {
                Some(text) => Status::Info(format!("Copied: {text}")),
                None => Status::Error(format!("No letter {letter} in word {word}")),
            }
        }
        _ => Status::Error("Usage: :copy <word> <letter>".to_string()),
    }
}

fn print_ui(
    session: &ConversionSession<FsAssetProvider>,
    status: Option<Status>,
) -> io::Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    let settings = session.alphabet().settings();
    println!("{}", "Letter Sign Converter".bold());
    println!("---------------------------------------------------------------");
    println!("Type text and press [Enter] to convert. ':en' / ':ar' switch alphabet.");
    println!("':clear' clears, ':copy' copies all letters, ':copy W L' copies one.");
    println!("'exit' quits.\n");

    let counters = session.counters();
    println!(
        "Alphabet: {} ({:?})   Words: {}   Letters: {}",
        settings.label.cyan(),
        settings.direction,
        counters.words,
        counters.letters
    );

    let words = session.words();
    if words.is_empty() {
        println!("\n{}", settings.placeholder.dark_grey());
    }
    for word in &words {
        print_word(word);
    }

    match status {
        Some(Status::Info(msg)) => println!("\n{}", msg.green()),
        Some(Status::Error(msg)) => println!("\n{}", msg.red()),
        None => {}
    }

    print!("\n> ");
    out.flush()
}

fn print_word(word: &WordResult) {
    println!(
        "\n{}  [{}]  [{}]",
        word.text.as_str().bold(),
        word.alphabet_label(),
        word.label()
    );
    let strip: Vec<String> = word
        .cells
        .iter()
        .map(|cell| match cell.outcome() {
            CellOutcome::ResolvedAsset => {
                format!("{} {}", cell.display().green(), "PNG".dark_green())
            }
            _ => {
                format!("{} {}", cell.display().yellow(), "TEXT".dark_yellow())
            }
        })
        .collect();
    println!("  {}", strip.join(" | "));
}
