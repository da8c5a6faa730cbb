// UI layer: collects one position and its option legs through a
// `Prompter`, sends it to the gateway and prints the report. Everything
// runs in sequence on the calling thread.

use crate::api::{build_request, ApiClient, OptionKind, OptionLeg, Position};
use crate::config::{Config, PromptDefaults};
use crate::error::RiskResult;
use crate::prompt::{as_number, as_text, LineSource, Prompter};
use crate::report;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

pub const BANNER: &str = "--- RiskGo Portfolio Analyzer ---";

/// What the operator entered: the position plus the global volatility.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedInput {
    pub position: Position,
    pub volatility: f64,
}

/// Prompt for one option leg. Option kinds outside CALL/PUT are accepted
/// but the operator is warned.
pub fn collect_leg<S: LineSource>(
    p: &mut Prompter<S>,
    defaults: &PromptDefaults,
) -> RiskResult<OptionLeg> {
    let kind_default = Some(defaults.option_kind.clone());
    let raw_kind = p.prompt_scalar("  Type (CALL/PUT)", kind_default, as_text)?;
    let kind = OptionKind::from_input(&raw_kind);
    if !kind.is_known() {
        log::warn!("unrecognised option type {:?}", kind.as_str());
        p.notice(&format!(
            "Warning: option type {} is neither CALL nor PUT; sending it as entered.",
            kind
        ))?;
    }
    let strike = p.prompt_scalar("  Strike Price", Some(defaults.strike), as_number)?;
    let expiry_default = Some(defaults.expiry.clone());
    let expiry = p.prompt_scalar("  Expiry (YYYY-MM-DD)", expiry_default, as_text)?;
    Ok(OptionLeg { kind, strike, expiry })
}

/// Prompt for the position fields, then for legs until the operator stops
/// asking for another. At least one leg is always collected.
pub fn collect_position<S: LineSource>(
    p: &mut Prompter<S>,
    defaults: &PromptDefaults,
) -> RiskResult<CollectedInput> {
    let ticker_default = Some(defaults.ticker.clone());
    let ticker = p.prompt_scalar("Ticker (e.g. AAPL, TSLA)", ticker_default, as_text)?;
    let quantity = p.prompt_scalar("Quantity", Some(defaults.quantity), as_number)?;
    let beta = p.prompt_scalar("Beta (relative to SPY)", Some(defaults.beta), as_number)?;
    let volatility =
        p.prompt_scalar("Volatility (e.g. 0.3 for 30%)", Some(defaults.volatility), as_number)?;

    let mut legs = Vec::new();
    loop {
        p.notice("\nAdd an Option Leg:")?;
        legs.push(collect_leg(p, defaults)?);
        let again = p.prompt_scalar("Add another leg? (y/n)", Some("n".to_string()), as_text)?;
        if again.to_lowercase() != "y" {
            break;
        }
    }

    Ok(CollectedInput {
        position: Position { ticker, quantity, beta, legs },
        volatility,
    })
}

fn spinner(msg: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// One full session: collect, submit, render. Gateway and render failures
/// are reported on `out` as a single line and are not errors of the
/// session; prompt-stream failures are.
pub fn run_session<S: LineSource, W: Write>(
    config: &Config,
    api: &ApiClient,
    p: &mut Prompter<S>,
    out: &mut W,
) -> RiskResult<()> {
    writeln!(out, "{}", BANNER)?;
    let input = collect_position(p, &config.defaults)?;
    let ticker = input.position.ticker.clone();
    let req = build_request(config, input.position, input.volatility);

    let pb = spinner("Sending request to RiskGo Gateway...");
    let submitted = api.submit(&req);
    pb.finish_and_clear();

    let resp = match submitted {
        Ok(resp) => resp,
        Err(e) => {
            writeln!(out, "Error connecting to service: {}", e)?;
            return Ok(());
        }
    };

    match report::render(&ticker, &resp) {
        Ok(table) => write!(out, "{}", table)?,
        Err(e) if e.is_render() => writeln!(out, "Error rendering report: {}", e)?,
        Err(e) => return Err(e),
    }
    out.flush()?;
    Ok(())
}
