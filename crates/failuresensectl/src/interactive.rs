//! Interactive mode - form-style editing with repeatable submissions
//!
//! Field values persist across submissions, so the operator can correct a
//! rejected reading or tweak a value and resubmit.

use anyhow::Result;
use failuresense_shared::{FormField, TelemetryForm};
use std::io::{BufRead, Write};

use crate::assessor::Assessor;
use crate::commands::{checked_request, exit_code_for_state, submit_with_progress};
use crate::errors::EXIT_SUCCESS;
use crate::output::Renderer;
use crate::service::PredictionService;

const HELP: &str = "\
Commands:
  set <field> <value>   Set a field (airTemp, processTemp, rotSpeed, torque, toolWear, machineType)
  show                  Show the current reading
  submit                Send the reading for assessment
  status                Show the last assessment
  clear                 Empty every field
  help                  Show this help
  quit                  Leave
";

#[derive(Debug, PartialEq)]
enum Command<'a> {
    Set(FormField, &'a str),
    Show,
    Submit,
    Status,
    Clear,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command<'_>>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    let command = match verb.to_lowercase().as_str() {
        "set" => {
            let rest = rest.trim_start();
            let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if name.is_empty() {
                return Err("Usage: set <field> <value>".to_string());
            }
            Command::Set(name.parse()?, value.trim())
        }
        "show" => Command::Show,
        "submit" | "analyze" => Command::Submit,
        "status" => Command::Status,
        "clear" => Command::Clear,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command: '{}'. Type 'help'.", other)),
    };
    Ok(Some(command))
}

/// Run the loop until `quit` or end of input. Returns the exit code of the
/// last submission, or success when nothing was submitted.
pub async fn run<S, R, W>(
    assessor: &Assessor<S>,
    renderer: Renderer,
    input: R,
    output: &mut W,
) -> Result<i32>
where
    S: PredictionService,
    R: BufRead,
    W: Write,
{
    let mut form = TelemetryForm::new();
    let mut exit_code = EXIT_SUCCESS;

    writeln!(output, "FailureSense interactive mode. Type 'help' for commands.")?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(output, "[ERROR] {}", message)?;
                continue;
            }
        };

        match command {
            Command::Set(field, value) => form.set_field(field, value),
            Command::Show => write!(output, "{}", renderer.render_form(&form))?,
            Command::Submit => {
                let mut errors = Vec::new();
                let Some(request) = checked_request(&form, renderer, &mut errors) else {
                    output.write_all(&errors)?;
                    continue;
                };
                let state = submit_with_progress(assessor, request, renderer).await;
                exit_code = exit_code_for_state(&state);
                writeln!(output, "{}", renderer.render_state(&state).trim_end())?;
            }
            Command::Status => {
                let state = assessor.state().await;
                writeln!(output, "{}", renderer.render_state(&state).trim_end())?;
            }
            Command::Clear => form.clear(),
            Command::Help => write!(output, "{}", HELP)?,
            Command::Quit => break,
        }
    }

    Ok(exit_code)
}
