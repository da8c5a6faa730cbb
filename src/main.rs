// Entrypoint for the CLI application.
// - Resolves configuration, builds the API client and runs one session.
// - Prompts come from the terminal when stdin is one, otherwise stdin is
//   read line by line with a cap on retries.

use riskgo_cli::{
    api::ApiClient,
    config::Config,
    prompt::{Prompter, ScriptedSource, TerminalSource, SCRIPTED_MAX_ATTEMPTS},
    ui::run_session,
};
use std::io::{self, IsTerminal};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::load()?;
    let api = ApiClient::new(&config)?;
    let mut out = io::stdout();

    if io::stdin().is_terminal() {
        let mut prompter = Prompter::interactive(TerminalSource);
        run_session(&config, &api, &mut prompter, &mut out)?;
    } else {
        let source = ScriptedSource::new(io::stdin().lock(), io::stdout());
        let mut prompter = Prompter::bounded(source, SCRIPTED_MAX_ATTEMPTS);
        run_session(&config, &api, &mut prompter, &mut out)?;
    }
    Ok(())
}
