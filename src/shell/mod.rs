use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rustyline::{error::ReadlineError, history::DefaultHistory, Editor};

mod interpreter;
pub mod pipeline;

pub use interpreter::Interpreter;
pub use pipeline::Pipeline;

use crate::{
    core::{commands::Flow, config::ShellConfig},
    error::ShellError,
    highlight::SyntaxHighlighter,
    input::ShellCompleter,
    process::{self, signal},
};

/// The interactive loop: reap, prompt, read, evaluate.
pub struct Shell {
    pub(crate) editor: Editor<ShellCompleter, DefaultHistory>,
    pub(crate) interpreter: Interpreter,
    pub(crate) config: ShellConfig,
    pub(crate) highlighter: SyntaxHighlighter,
    pub(crate) interrupted: Arc<AtomicBool>,
}

impl Shell {
    pub fn new(config: ShellConfig) -> Result<Self, ShellError> {
        let highlighter = SyntaxHighlighter::new(config.color);

        // Lines are never added to the editor's own recall list.
        let mut editor = Editor::<ShellCompleter, DefaultHistory>::new()?;
        editor.set_helper(Some(ShellCompleter::new(highlighter)));

        let interrupted = signal::setup_signal_handlers()?;
        let interpreter = Interpreter::new(&config);

        Ok(Shell {
            editor,
            interpreter,
            config,
            highlighter,
            interrupted,
        })
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            self.reap_children();

            match self.editor.readline(&self.config.prompt) {
                Ok(line) => {
                    if self.evaluate(&line) == Flow::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(e) => {
                    // A broken input stream is treated as end-of-input.
                    self.report(&ShellError::from(e));
                    break;
                }
            }
        }
        Ok(())
    }

    fn evaluate(&mut self, line: &str) -> Flow {
        let result = {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let result = self.interpreter.eval(line, &mut out);
            if let Err(e) = out.flush() {
                tracing::debug!("could not flush stdout: {}", e);
            }
            result
        };

        // Ctrl-C while a foreground child ran: start the prompt on a new line.
        if self.interrupted.swap(false, Ordering::Relaxed) {
            println!();
        }

        result.unwrap_or_else(|e| {
            self.report(&e);
            Flow::Continue
        })
    }

    fn reap_children(&self) {
        for (pid, status) in process::reap_finished() {
            tracing::debug!(pid, %status, "reaped child");
        }
    }

    fn report(&self, error: &ShellError) {
        if !self.config.quiet {
            eprintln!("{}", self.highlighter.highlight_error(&error.to_string()));
        }
    }
}
