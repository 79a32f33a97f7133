// pcc: parse and evaluate a small C subset, optionally inspecting the result

use std::io;
use std::process::ExitCode;

use crossterm::{
    execute,
    style::{Color, Stylize},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use pcc::config::{Config, Preprocessor};
use pcc::errors::Error;
use pcc::interpreter::engine::Interpreter;
use pcc::memory::environment::ScopeMode;
use pcc::parser::ast;
use pcc::parser::parse::Parser;
use pcc::ui::{App, Inspection};

struct Options {
    path: String,
    trace: bool,
    snapshot_scopes: bool,
    strip_comments: bool,
    inspect: bool,
}

fn usage(program_name: &str) {
    eprintln!(
        "Usage: {} <file.c> [--trace] [--snapshot-scopes] [--strip-comments] [--inspect]",
        program_name
    );
    eprintln!();
    eprintln!("  --trace            print the syntax tree and every production/handler entry and exit");
    eprintln!("  --snapshot-scopes  assignments inside a block do not reach enclosing scopes");
    eprintln!("  --strip-comments   blank out comments and # lines before scanning");
    eprintln!("  --inspect          browse the tree, scopes, and trace in a terminal UI");
}

fn parse_args(args: &[String]) -> Option<Options> {
    let mut options = Options {
        path: String::new(),
        trace: false,
        snapshot_scopes: false,
        strip_comments: false,
        inspect: false,
    };
    let mut path = None;

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--trace" => options.trace = true,
            "--snapshot-scopes" => options.snapshot_scopes = true,
            "--strip-comments" => options.strip_comments = true,
            "--inspect" => options.inspect = true,
            flag if flag.starts_with("--") => {
                eprintln!("Error: Unknown option '{}'", flag);
                return None;
            }
            file => {
                if path.replace(file.to_string()).is_some() {
                    eprintln!("Error: Expected exactly one input file");
                    return None;
                }
            }
        }
    }

    match path {
        Some(path) => {
            options.path = path;
            Some(options)
        }
        None => {
            eprintln!("Error: No input file provided");
            None
        }
    }
}

/// Print `err` with its category coloured, followed by the lexer context block
fn report(err: &Error) {
    let category = format!("{} error:", err.category()).with(Color::Red).bold();
    eprintln!("{} {} {}", category, err.message(), err.context());
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("pcc");

    let Some(options) = parse_args(&args) else {
        usage(program_name);
        return ExitCode::FAILURE;
    };

    let mut config = Config::default();
    if options.trace {
        // The inspector shows the trace itself; echoing would scribble over the screen
        config = config.with_trace(!options.inspect);
    }
    if options.snapshot_scopes {
        config = config.with_scope_mode(ScopeMode::Snapshot);
    }
    if options.strip_comments {
        config = config.with_preprocessor(Preprocessor::StripComments);
    }

    let mut parser = match Parser::from_file(&options.path, &config) {
        Ok(parser) => parser,
        Err(e) => {
            report(&e);
            return ExitCode::FAILURE;
        }
    };

    let module = match parser.parse_module() {
        Ok(module) => module,
        Err(e) => {
            report(&e);
            return ExitCode::FAILURE;
        }
    };

    if options.trace && !options.inspect {
        println!("{}", ast::dump(&module));
    }

    let mut interpreter = Interpreter::new(parser.source(), &config);
    let outcome = interpreter.run(&module);

    if options.inspect {
        let source: String = parser.source().iter().collect();
        let mut trace = parser.take_trace();
        trace.extend(interpreter.take_trace());
        let inspection = Inspection::new(&module, &interpreter, &outcome, source, trace);
        if let Err(e) = inspect(inspection) {
            eprintln!("Error: {:?}", e);
            return ExitCode::FAILURE;
        }
        return if outcome.is_ok() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    match outcome {
        Ok(result) => {
            for (name, binding) in interpreter.globals().iter() {
                println!("{} {} = {}", binding.type_tag, name, binding.value);
            }
            if let Some(value) = result {
                println!("{} {}", "result:".with(Color::Green).bold(), value);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn inspect(inspection: Inspection) -> io::Result<()> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(inspection);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
