//! Command implementations

use anyhow::Result;
use failuresense_shared::{PredictionRequest, SessionState, TelemetryForm};
use std::io::Write;
use tracing::{debug, warn};

use crate::assessor::{Assessor, SubmitOutcome};
use crate::cli::ReadingArgs;
use crate::config::{ClientConfig, OutputFormat};
use crate::errors::{exit_code_for, EXIT_GENERAL_ERROR, EXIT_INVALID_INPUT, EXIT_SUCCESS};
use crate::output::Renderer;
use crate::service::{HttpPredictionService, PredictionService};
use crate::spinner::Spinner;

/// One-shot assessment of a reading given on the command line
pub async fn assess(
    config: &ClientConfig,
    renderer: Renderer,
    args: &ReadingArgs,
) -> Result<i32> {
    let form = args.to_form();
    // JSON consumers read stdout; text diagnostics go to stderr
    let checked = match renderer.format() {
        OutputFormat::Json => checked_request(&form, renderer, &mut std::io::stdout()),
        OutputFormat::Text => checked_request(&form, renderer, &mut std::io::stderr()),
    };
    let Some(request) = checked else {
        return Ok(EXIT_INVALID_INPUT);
    };

    let service = HttpPredictionService::new(&config.service)?;
    let assessor = Assessor::new(service);
    let state = submit_with_progress(&assessor, request, renderer).await;
    print!("{}", with_newline(renderer.render_state(&state)));
    Ok(exit_code_for_state(&state))
}

/// Validate the form, writing every field error to `errors_out`.
/// Returns the request when valid.
pub fn checked_request(
    form: &TelemetryForm,
    renderer: Renderer,
    errors_out: &mut dyn Write,
) -> Option<PredictionRequest> {
    let errors = form.validate();
    if !errors.is_empty() {
        debug!("Reading rejected: {} invalid field(s)", errors.len());
        let rendered = with_newline(renderer.render_validation(&errors));
        let _ = errors_out.write_all(rendered.as_bytes());
        return None;
    }
    form.build_request().ok()
}

/// Submit and wait, showing a spinner for text output
pub async fn submit_with_progress<S: PredictionService>(
    assessor: &Assessor<S>,
    request: PredictionRequest,
    renderer: Renderer,
) -> SessionState {
    let spinner = (renderer.format() == OutputFormat::Text)
        .then(|| Spinner::new("Analyzing telemetry..."));

    let outcome = assessor.submit(request).await;

    if let Some(spinner) = spinner {
        let elapsed = spinner.stop();
        debug!("Assessment took {:.1}s", elapsed.as_secs_f64());
    }

    match outcome {
        SubmitOutcome::Settled(state) => state,
        SubmitOutcome::Rejected => {
            warn!("Submission already in flight");
            assessor.state().await
        }
        SubmitOutcome::Discarded => assessor.state().await,
    }
}

pub fn exit_code_for_state(state: &SessionState) -> i32 {
    match state {
        SessionState::Success(_) => EXIT_SUCCESS,
        SessionState::Failure(err) => exit_code_for(err.kind()),
        SessionState::Idle | SessionState::Submitting { .. } => EXIT_GENERAL_ERROR,
    }
}

/// Show or update configuration
pub fn config(config: &ClientConfig, set: Option<&str>) -> Result<i32> {
    match set {
        Some(assignment) => {
            // Start from the file contents, not the env/flag overrides
            let mut stored = ClientConfig::load_file_only()?;
            stored.set_assignment(assignment)?;
            let path = stored.save()?;
            println!("[OK] Saved {}", path.display());
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(EXIT_SUCCESS)
}

fn with_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
