use std::io::{self, Write};

use dradis_search_config::Prompt;

/// Asks on the controlling terminal. Labels go to stderr so stdout only
/// ever carries results.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&mut self, label: &str, secret: bool) -> io::Result<String> {
        if secret {
            return rpassword::prompt_password(label).map(|s| s.trim().to_owned());
        }

        eprint!("{label}");
        io::stderr().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "standard input closed",
            ));
        }

        Ok(line.trim().to_owned())
    }
}
