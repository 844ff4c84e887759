use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::history::DefaultHistory;
use rustyline::{Context, Editor};
use rustyline::{Completer, Helper, Highlighter, Hinter, Validator};
use tinylisp::config::{EditMode, InterpreterConfig, ReplConfig};
use tinylisp::shell::{self, LineAction};
use tinylisp::{Environment, Evaluator, TokenKind, tokenize};

struct LispCompleter {
    env: Rc<RefCell<Environment>>,
}

impl LispCompleter {
    fn new(env: Rc<RefCell<Environment>>) -> Self {
        LispCompleter { env }
    }
}

impl rustyline::completion::Completer for LispCompleter {
    type Candidate = String;
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let before_cursor = &line[..pos];
        if before_cursor.ends_with(char::is_whitespace) {
            return Ok((pos, vec![]));
        }
        let candidates = match tokenize(before_cursor).pop().map(|t| t.kind) {
            Some(TokenKind::Atom(prefix)) => {
                let mut matches: Vec<String> = self
                    .env
                    .borrow()
                    .get_identifiers()
                    .union(&tinylisp::evaluator::special_form_identifiers())
                    .filter(|id| id.starts_with(&prefix) && id.len() > prefix.len())
                    .map(|id| id[prefix.len()..].to_string())
                    .collect();
                matches.sort();
                matches
            }
            _ => vec![],
        };
        Ok((pos, candidates))
    }
}

#[derive(Completer, Helper, Highlighter, Hinter, Validator)]
struct ReplHelper {
    #[rustyline(Highlighter)]
    highlighter: ParenHighlighter,
    #[rustyline(Completer)]
    completer: LispCompleter,
}

struct ParenHighlighter;

impl Highlighter for ParenHighlighter {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        let mut open: Vec<usize> = Vec::new();
        let mut unmatched: Vec<usize> = Vec::new();
        let mut cursor_pair: Option<(usize, usize)> = None;
        let touches_cursor = |i: usize| i == pos || i + 1 == pos;

        for (i, c) in line.char_indices() {
            match c {
                '(' => open.push(i),
                ')' => match open.pop() {
                    Some(start) => {
                        if touches_cursor(i) || touches_cursor(start) {
                            cursor_pair = Some((start, i));
                        }
                    }
                    None => unmatched.push(i),
                },
                _ => {}
            }
        }
        unmatched.extend(open);

        if cursor_pair.is_none() && unmatched.is_empty() {
            return Cow::Borrowed(line);
        }

        let mut highlighted = String::with_capacity(line.len() + 16);
        for (i, c) in line.char_indices() {
            if unmatched.contains(&i) {
                highlighted.push_str(&format!("\x1b[1;31m{}\x1b[0m", c)); // Red for unmatched
            } else if cursor_pair.is_some_and(|(start, end)| i == start || i == end) {
                highlighted.push_str(&format!("\x1b[1;34m{}\x1b[0m", c)); // Blue for the matching pair
            } else {
                highlighted.push(c);
            }
        }
        Cow::Owned(highlighted)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let interpreter_config = InterpreterConfig::from_env()?;
    let repl_config = ReplConfig::from_env()?;
    log::debug!("{:?} {:?}", interpreter_config, repl_config);

    println!("{}", shell::BANNER);
    println!("Type '{}' or press Ctrl-D to quit.", shell::QUIT_COMMAND);

    let mut evaluator = Evaluator::new(interpreter_config);
    let helper = ReplHelper {
        highlighter: ParenHighlighter,
        completer: LispCompleter::new(evaluator.global()),
    };
    let edit_mode = match repl_config.edit_mode {
        EditMode::Vi => rustyline::EditMode::Vi,
        EditMode::Emacs => rustyline::EditMode::Emacs,
    };
    let config = rustyline::config::Config::builder()
        .edit_mode(edit_mode)
        .build();
    let mut rl: Editor<ReplHelper, DefaultHistory> = Editor::with_config(config)?;
    rl.set_helper(Some(helper));
    if let Some(path) = &repl_config.history_file {
        if rl.load_history(path).is_err() {
            println!("No previous history.");
        }
    }

    loop {
        match rl.readline(&format!("{} ", shell::PROMPT)) {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                match shell::classify_line(&line) {
                    LineAction::Quit => break,
                    LineAction::Skip => continue,
                    LineAction::Evaluate => shell::run_line_reporting(&mut evaluator, &line),
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C
                println!("Interrupted. Type '{}' or Ctrl-D to quit.", shell::QUIT_COMMAND);
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D
                println!("\nExiting.");
                break;
            }
            Err(err) => {
                log::error!("readline error: {:?}", err);
                break;
            }
        }
    }
    if let Some(path) = &repl_config.history_file {
        rl.save_history(path)?;
    }
    Ok(())
}
