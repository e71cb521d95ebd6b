//! Line-oriented interactive session.
//!
//! # Invariants
//! - Every successfully parsed command goes through `SocketService::run_command`.
//! - The numbered list printed after a command is the filtered view, so the
//!   numbers are the indexes later commands accept.

use crate::parser::{self, Input};
use socket_core::{PersonRepository, SocketService};
use std::io::{BufRead, Write};

const PROMPT: &str = "> ";

pub const HELP_TEXT: &str = "\
Commands:
  add n/NAME g/PROFILE [p/PHONE] [e/EMAIL] [a/ADDRESS] [l/LANGUAGE]... [t/TAG]...
  edit INDEX [n/NAME] [g/PROFILE] [p/PHONE] [e/EMAIL] [a/ADDRESS] [l/LANGUAGE]... [t/TAG]...
  remove INDEX [p/[PHONE]] [e/[EMAIL]] [a/[ADDRESS]] [l/[LANGUAGE]]... [t/[TAG]]...
  delete INDEX
  find [n/KEYWORDS] [g/KEYWORDS] [p/KEYWORDS] [e/KEYWORDS] [a/KEYWORDS] [l/KEYWORDS] [t/KEYWORDS]
  list | undo | redo | clear | help | exit";

/// Reads commands from `input` until `exit` or end of input.
pub fn run<R, I, O>(service: &mut SocketService<R>, input: I, mut output: O) -> std::io::Result<()>
where
    R: PersonRepository,
    I: BufRead,
    O: Write,
{
    print_persons(service, &mut output)?;
    let mut lines = input.lines();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next().transpose()? else {
            writeln!(output)?;
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        match parser::parse_line(&line) {
            Ok(Input::Help) => writeln!(output, "{HELP_TEXT}")?,
            Ok(Input::Run(command)) => match service.run_command(command) {
                Ok(result) => {
                    writeln!(output, "{}", result.feedback)?;
                    if result.exit {
                        return Ok(());
                    }
                    print_persons(service, &mut output)?;
                }
                Err(err) => writeln!(output, "{err}")?,
            },
            Err(err) => writeln!(output, "{err}")?,
        }
    }
}

fn print_persons<R: PersonRepository>(
    service: &SocketService<R>,
    output: &mut impl Write,
) -> std::io::Result<()> {
    for (position, person) in service.model().filtered_persons().iter().enumerate() {
        writeln!(output, "{}. {}", position + 1, person)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run;
    use socket_core::{InMemoryPersonRepository, SocketService};
    use std::io::Cursor;

    fn session(script: &str) -> (String, SocketService<InMemoryPersonRepository>) {
        let mut service = SocketService::open(
            InMemoryPersonRepository::new(),
            socket_core::default_identity_policy(),
        )
        .unwrap();
        let mut output = Vec::new();
        run(&mut service, Cursor::new(script.to_string()), &mut output).unwrap();
        (String::from_utf8(output).unwrap(), service)
    }

    #[test]
    fn add_then_undo_round_trip() {
        let (output, service) = session(
            "add n/Amy Bee g/amy-bee p/11111111\nedit 1 p/99999999\nundo\nexit\nlist\n",
        );

        assert!(output.contains("New person added: Amy Bee; Profile: amy-bee; Phone: 11111111"));
        assert!(output.contains("1. Amy Bee; Profile: amy-bee; Phone: 99999999"));
        assert!(output.contains("Undo success!"));
        assert!(output.contains("Exiting SoCket as requested ..."));
        assert!(!output.contains("Listed all persons"));
        assert_eq!(
            service.model().store().persons()[0]
                .phone()
                .map(|phone| phone.as_str()),
            Some("11111111")
        );
    }

    #[test]
    fn errors_are_reported_and_session_continues() {
        let (output, service) = session("delete 3\nadd n/Amy\nhelp\nadd n/Amy g/amy\n");

        assert!(output.contains("The person index provided is invalid: 3 (showing 0)"));
        assert!(output.contains("Invalid command format!"));
        assert!(output.contains("Commands:"));
        assert_eq!(service.model().store().len(), 1);
    }
}
