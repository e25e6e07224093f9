use std::io::{self, BufRead, Write};

use crate::exchange::ExchangePoint;

/// Source of operator input. Interactive loops take this instead of reading
/// stdin directly so they can be driven by a script.
pub trait Prompter {
    /// Show `prompt` and read one line (without the line terminator)
    fn ask(&mut self, prompt: &str) -> io::Result<String>;

    /// Like `ask`, but input is not echoed
    fn ask_secret(&mut self, prompt: &str) -> io::Result<String>;

    /// Feedback line for the operator
    fn say(&mut self, message: &str);
}

/// Prompter bound to the controlling terminal
#[derive(Debug, Default)]
pub struct StdioPrompter;

impl Prompter for StdioPrompter {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()?;
        drop(stdout);

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed while waiting for input",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn ask_secret(&mut self, prompt: &str) -> io::Result<String> {
        rpassword::prompt_password(prompt)
    }

    fn say(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Ask for an exchange until the operator names one we peer at
pub fn select_exchange(prompter: &mut dyn Prompter) -> io::Result<ExchangePoint> {
    let prompt = format!("Select the IX [{}]:", ExchangePoint::options());
    loop {
        let answer = prompter.ask(&prompt)?;
        match answer.parse::<ExchangePoint>() {
            Ok(ix) => return Ok(ix),
            Err(_) => prompter.say("Error! Invalid IX Name"),
        }
    }
}

/// Ask for the peer's ASN until a positive integer is given
pub fn read_peer_asn(prompter: &mut dyn Prompter) -> io::Result<u32> {
    loop {
        let answer = prompter.ask("Enter Peer ASN: ")?;
        match parse_asn(&answer) {
            Some(asn) => return Ok(asn),
            None => prompter.say("Invalid input. Please enter a valid integer."),
        }
    }
}

fn parse_asn(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().filter(|asn| *asn > 0)
}

/// Only an explicit "yes" (any case, surrounding whitespace ignored) commits
pub fn is_commit_confirmed(answer: &str) -> bool {
    answer.trim().to_lowercase() == "yes"
}

pub fn confirm_commit(prompter: &mut dyn Prompter) -> io::Result<bool> {
    let answer = prompter.ask("\nDo you want to commit these changes? (yes/no): ")?;
    Ok(is_commit_confirmed(&answer))
}

/// Scripted input for tests; records prompts and feedback
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedPrompter {
    pub answers: std::collections::VecDeque<String>,
    pub prompts: Vec<String>,
    pub said: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    fn ask_secret(&mut self, prompt: &str) -> io::Result<String> {
        self.ask(prompt)
    }

    fn say(&mut self, message: &str) {
        self.said.push(message.to_string());
    }
}
