use std::io::{self, BufRead, Write};

use crate::domain::entities::{Alert, AlertIcon, Confirmation};
use crate::domain::ports::Prompt;

// Terminal dialogs: alerts go to stderr, confirmations read one stdin line.
pub struct ConsolePrompt;

impl Prompt for ConsolePrompt {
    fn alert(&self, alert: &Alert) {
        let marker = match alert.icon {
            AlertIcon::Error => "x",
            AlertIcon::Success => "ok",
            AlertIcon::Question => "?",
        };
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "[{marker}] {}: {}", alert.title, alert.text);
    }

    fn confirm(&self, confirmation: &Confirmation) -> bool {
        {
            let mut stderr = io::stderr().lock();
            let _ = write!(
                stderr,
                "{}: {} [{}/{}] ",
                confirmation.title,
                confirmation.text,
                confirmation.confirm_text,
                confirmation.cancel_text
            );
            let _ = stderr.flush();
        }

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_affirmative(&answer, &confirmation.confirm_text)
    }
}

fn is_affirmative(answer: &str, confirm_text: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case(confirm_text)
        || answer.eq_ignore_ascii_case("y")
        || answer.eq_ignore_ascii_case("yes")
}
