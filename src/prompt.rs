//! Interactive questions asked on the terminal.
//!
//! Every question resolves to `Some(answer)` or `None` when the user cancels
//! (end of input, or an empty answer to a selection). Validators attached to a
//! question return `Ok(())` or the message shown before asking again, so
//! invalid input never reaches the caller.

use std::io::{self, BufRead, Write};

/// Outcome of a validator: `Ok(())` or the rejection message.
pub type Validation = Result<(), &'static str>;

pub trait Prompter {
    fn text(&mut self, question: &str, validate: &dyn Fn(&str) -> Validation) -> Option<String>;

    fn number(&mut self, question: &str, validate: &dyn Fn(u32) -> Validation) -> Option<u32>;

    /// Returns the index of the chosen entry in `choices`.
    fn select(&mut self, question: &str, choices: &[String]) -> Option<usize>;

    fn confirm(&mut self, question: &str) -> Option<bool>;
}

/// Line based prompter reading answers from `input` and writing questions to
/// `output`.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stderr> {
    /// Prompter on standard input, asking on standard error so that standard
    /// output stays clean for tables and JSON.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, question: &str) -> Option<String> {
        write!(self.output, "? {} ", question).ok()?;
        self.output.flush().ok()?;

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => {
                let _ = writeln!(self.output);
                None
            }
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn reject(&mut self, message: &str) {
        let _ = writeln!(self.output, "  {}", message);
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn text(&mut self, question: &str, validate: &dyn Fn(&str) -> Validation) -> Option<String> {
        loop {
            let answer = self.ask(question)?;
            match validate(&answer) {
                Ok(()) => return Some(answer),
                Err(message) => self.reject(message),
            }
        }
    }

    fn number(&mut self, question: &str, validate: &dyn Fn(u32) -> Validation) -> Option<u32> {
        loop {
            let answer = self.ask(question)?;
            let Ok(number) = answer.parse::<u32>() else {
                self.reject("Please input a number");
                continue;
            };
            match validate(number) {
                Ok(()) => return Some(number),
                Err(message) => self.reject(message),
            }
        }
    }

    fn select(&mut self, question: &str, choices: &[String]) -> Option<usize> {
        if choices.is_empty() {
            return None;
        }

        for (i, choice) in choices.iter().enumerate() {
            let _ = writeln!(self.output, "  {:>2}) {}", i + 1, choice);
        }

        let question = format!("{} [1-{}]", question, choices.len());
        loop {
            let answer = self.ask(&question)?;
            if answer.is_empty() {
                return None;
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Some(n - 1),
                _ => self.reject("Please pick one of the listed numbers"),
            }
        }
    }

    fn confirm(&mut self, question: &str) -> Option<bool> {
        let question = format!("{} (y/N)", question);
        loop {
            let answer = self.ask(&question)?.to_ascii_lowercase();
            match answer.as_str() {
                "y" | "yes" => return Some(true),
                "" | "n" | "no" => return Some(false),
                _ => self.reject("Please answer y or n"),
            }
        }
    }
}
