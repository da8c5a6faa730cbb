// Prompt layer: typed, defaultable single-line prompts on top of a
// swappable line source. The terminal source uses `dialoguer`; the
// scripted source reads any `BufRead` so piped stdin and tests share the
// exact prompt protocol.

use crate::error::{RiskError, RiskResult};
use dialoguer::Input;
use std::io::{self, BufRead, Write};

pub const INVALID_INPUT_NOTICE: &str = "Invalid input, try again.";

/// Attempt cap applied when input does not come from a human.
pub const SCRIPTED_MAX_ATTEMPTS: usize = 25;

/// Prompt text shown for one field: `"<label> [<default>]: "` or `"<label>: "`.
pub fn prompt_text(label: &str, default: Option<&str>) -> String {
    match default {
        Some(d) => format!("{} [{}]: ", label, d),
        None => format!("{}: ", label),
    }
}

/// A value that can be offered as a prompt default.
pub trait PromptValue {
    fn default_text(&self) -> String;
}

impl PromptValue for String {
    fn default_text(&self) -> String {
        self.clone()
    }
}

impl PromptValue for f64 {
    /// Whole numbers keep one decimal place, so `1.0` reads `[1.0]`.
    fn default_text(&self) -> String {
        if self.is_finite() && self.fract() == 0.0 && self.abs() < 1e16 {
            format!("{:.1}", self)
        } else {
            self.to_string()
        }
    }
}

/// Somewhere lines can be read from after showing a prompt.
pub trait LineSource {
    /// Show the prompt and read one line without its terminator.
    /// `Ok(None)` means the input is exhausted.
    fn read_line(&mut self, label: &str, default: Option<&str>) -> io::Result<Option<String>>;

    /// Show a one-line message to the operator.
    fn notice(&mut self, msg: &str) -> io::Result<()>;
}

/// Interactive terminal input through `dialoguer`.
#[derive(Default)]
pub struct TerminalSource;

impl LineSource for TerminalSource {
    fn read_line(&mut self, label: &str, default: Option<&str>) -> io::Result<Option<String>> {
        // dialoguer's simple theme appends ": " itself.
        let prompt = match default {
            Some(d) => format!("{} [{}]", label, d),
            None => label.to_string(),
        };
        let line: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(Some(line))
    }

    fn notice(&mut self, msg: &str) -> io::Result<()> {
        println!("{}", msg);
        Ok(())
    }
}

/// Line-oriented input from any reader, echoing prompts to a writer.
pub struct ScriptedSource<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ScriptedSource<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ScriptedSource { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}

impl<R: BufRead, W: Write> LineSource for ScriptedSource<R, W> {
    fn read_line(&mut self, label: &str, default: Option<&str>) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt_text(label, default))?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn notice(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self.output, "{}", msg)
    }
}

/// Typed prompting with defaults and retry on conversion failure.
pub struct Prompter<S> {
    source: S,
    max_attempts: Option<usize>,
}

impl<S: LineSource> Prompter<S> {
    /// Retry forever; for a human at a terminal.
    pub fn interactive(source: S) -> Self {
        Prompter { source, max_attempts: None }
    }

    /// Give up on a field after `max_attempts` unusable answers.
    pub fn bounded(source: S, max_attempts: usize) -> Self {
        Prompter {
            source,
            max_attempts: Some(max_attempts.max(1)),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    pub fn notice(&mut self, msg: &str) -> RiskResult<()> {
        self.source.notice(msg)?;
        Ok(())
    }

    /// Ask for one value. An empty answer returns `default` as is, without
    /// passing it through `convert`; an answer `convert` rejects re-issues
    /// the same prompt.
    pub fn prompt_scalar<T, E, F>(
        &mut self,
        label: &str,
        default: Option<T>,
        convert: F,
    ) -> RiskResult<T>
    where
        T: PromptValue,
        F: Fn(&str) -> Result<T, E>,
    {
        let default_text = default.as_ref().map(T::default_text);
        let mut attempts = 0;
        let mut default = default;
        loop {
            attempts += 1;
            let line = self
                .source
                .read_line(label, default_text.as_deref())?
                .ok_or_else(|| RiskError::EndOfInput { label: label.to_string() })?;

            if line.is_empty() {
                if let Some(value) = default.take() {
                    return Ok(value);
                }
            }
            if let Ok(value) = convert(&line) {
                return Ok(value);
            }

            log::warn!("rejected input {:?} for {:?}", line, label);
            self.source.notice(INVALID_INPUT_NOTICE)?;
            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    return Err(RiskError::TooManyAttempts {
                        label: label.to_string(),
                        attempts,
                    });
                }
            }
        }
    }
}

/// Text fields accept anything.
pub fn as_text(raw: &str) -> Result<String, std::convert::Infallible> {
    Ok(raw.to_string())
}

/// Numeric fields accept anything `f64` parses, ignoring surrounding blanks.
pub fn as_number(raw: &str) -> Result<f64, std::num::ParseFloatError> {
    raw.trim().parse()
}
