//! Interactive REPL for the tremor bot.
//!
//! Launch with `tremor-bot repl` to enter interactive mode.
//! Type `/help` for available commands, Tab for completion.

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};

use tokio::runtime::Handle;

use crate::commands::CommandRegistry;
use crate::protocol::ChatHandler;
use crate::types::{ChatMessage, ChatReply};

/// Commands handled by the REPL itself rather than the chat handler.
const LOCAL_COMMANDS: &[(&str, &str)] = &[
    ("/clear", "Clear the screen"),
    ("/exit", "Quit the REPL"),
];

/// Every command name with its description, for completion and hints.
fn command_table() -> Vec<(String, String)> {
    CommandRegistry::list_commands()
        .into_iter()
        .map(|c| (format!("/{}", c.name), c.description))
        .chain(
            LOCAL_COMMANDS
                .iter()
                .map(|(cmd, desc)| (cmd.to_string(), desc.to_string())),
        )
        .collect()
}

/// REPL helper for tab completion.
struct TremorHelper {
    commands: Vec<(String, String)>,
}

impl Completer for TremorHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = self
                .commands
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        // document completion for /depth
        let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
        if cmd == "/depth" {
            let mut files = Vec::new();
            if let Ok(entries) = std::fs::read_dir(".") {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().is_some_and(|e| e == "md" || e == "html") {
                        if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                            files.push(name.to_string());
                        }
                    }
                }
            }
            files.sort();
            let prefix_start = input.len() - args.len();
            let matches: Vec<Pair> = files
                .iter()
                .filter(|f| f.starts_with(args.trim()))
                .map(|f| Pair {
                    display: f.clone(),
                    replacement: format!("{f} "),
                })
                .collect();
            return Ok((prefix_start, matches));
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for TremorHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in &self.commands {
                if cmd.starts_with(line) && cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for TremorHelper {}
impl Validator for TremorHelper {}
impl Helper for TremorHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}


/// Run the interactive REPL.
///
/// Blocks the calling thread; commands are driven on `runtime`. Call from inside
/// `tokio::task::block_in_place` when already on a runtime worker.
pub fn run(handler: &ChatHandler, runtime: Handle) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[35m\u{25c9}\x1b[0m \x1b[1mtremor-bot v{}\x1b[0m \x1b[90m\u{2014} Pattern tremors and spiral depth\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<TremorHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(TremorHelper {
        commands: command_table(),
    }));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let hist_path = history_path();
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let prompt = " \x1b[35mtremor>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match line {
                    "/exit" | "/quit" => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                        break;
                    }
                    "/clear" | "/cls" => {
                        eprint!("\x1b[2J\x1b[H");
                        continue;
                    }
                    _ => {}
                }

                // Bare text is analyzed, as if typed after /analyze.
                let content = match line {
                    "/" => "/help".to_string(),
                    _ if line.starts_with('/') => line.to_string(),
                    _ => format!("/analyze {line}"),
                };

                match runtime.block_on(handler.handle_message(ChatMessage::new(content))) {
                    Some(reply) => print_reply(&reply),
                    None => eprintln!("  Type /help for commands."),
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = std::fs::create_dir_all(hist_path.parent().unwrap_or(std::path::Path::new(".")));
    let _ = rl.save_history(&hist_path);

    Ok(())
}

fn history_path() -> std::path::PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    std::path::PathBuf::from(home).join(".tremor_bot_history")
}

fn print_reply(reply: &ChatReply) {
    eprintln!();
    if reply.is_error {
        eprintln!("  \x1b[31m{}\x1b[0m", reply.body);
        eprintln!();
        return;
    }
    for line in reply.to_text().lines() {
        eprintln!("  {line}");
    }
    eprintln!();
}
