// Plain stdin front end: reads one line per turn until `quit` or end of input.
use std::io::{self, BufRead, Write};

use tinylisp::InterpreterConfig;
use tinylisp::evaluator::Evaluator;
use tinylisp::shell::{self, LineAction};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = InterpreterConfig::from_env()?;
    log::debug!("interpreter config: {:?}", config);
    let mut evaluator = Evaluator::new(config);

    println!("{}", shell::BANNER);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", shell::PROMPT);
        io::stdout().flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => break, // End of input
        };
        match shell::classify_line(&line) {
            LineAction::Quit => break,
            LineAction::Skip => continue,
            LineAction::Evaluate => shell::run_line_reporting(&mut evaluator, &line),
        }
    }
    Ok(())
}
