use clap::Parser;
use std::io::Write;
use tracing::debug;

use crate::auth::{CredentialsChain, EnvVars, Signer};
use crate::cli::{deadline, process_args, Cli, Command, Shell};
use crate::client::Dispatcher;
use crate::config::{save_defaults, show_defaults, ConfigStore, DefaultsRecord, FileConfigStore};
use crate::context::Environment;
use crate::errors::{LasticError, Result};
use crate::logging;
use crate::output::{Renderer, Style};
use crate::pipeline::{execute, with_deadline};
use crate::status::ExitStatus;

/// Main entry point for the CLI.
///
/// Parses arguments, sets up logging and the runtime, and runs the
/// requested command. Every failure ends in [`handle_error`].
pub fn run(args: Vec<String>, env: Environment) -> ExitStatus {
    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => {
            e.print().ok();
            return if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                ExitStatus::Success
            } else {
                ExitStatus::Error
            };
        }
    };

    if let Some(shell) = &cli.generate_completions {
        generate_completions(shell);
        return ExitStatus::Success;
    }

    logging::init(cli.verbose, cli.log_format, env.stderr_isatty);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => return handle_error(LasticError::Io(e), &env),
    };

    match runtime.block_on(program(cli, &env)) {
        Ok(status) => status,
        Err(e) => handle_error(e, &env),
    }
}

pub async fn program(cli: Cli, env: &Environment) -> Result<ExitStatus> {
    let store = FileConfigStore::from_env()?;
    let style = Style::new(env.colors);

    match cli.command {
        Some(Command::SaveDefaults) => {
            let saved = save_defaults(&store, &process_args(&cli))?;
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", style.success(&format!("Defaults saved to {}", store.location())))?;
            print_defaults(&saved, style, &mut out)?;
            Ok(ExitStatus::Success)
        }
        Some(Command::ShowDefaults) => {
            let defaults = show_defaults(&store)?;
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", style.muted(&store.location()))?;
            print_defaults(&defaults, style, &mut out)?;
            Ok(ExitStatus::Success)
        }
        Some(Command::Get) | Some(Command::Post) | None => run_request(&cli, &store, style).await,
    }
}

async fn run_request(cli: &Cli, store: &dyn ConfigStore, style: Style) -> Result<ExitStatus> {
    let overrides = process_args(cli);
    let limit = deadline(cli);

    let chain = CredentialsChain::new(EnvVars::from_process(), cli.request.profile.clone())?;
    let signer = Signer::new(chain, cli.request.region.clone(), cli.request.service.clone());
    let dispatcher = Dispatcher::new(limit)?;

    let envelope = with_deadline(limit, execute(store, &overrides, &signer, &dispatcher)).await?;

    let mut out = std::io::stdout().lock();
    Renderer::new(style).render(&envelope, &mut out)?;
    out.flush()?;

    Ok(ExitStatus::Success)
}

/// The request line the defaults produce, then the record itself
fn print_defaults<W: Write>(defaults: &DefaultsRecord, style: Style, out: &mut W) -> Result<()> {
    let line = format!(
        "{} {}://{}{}",
        defaults.method, defaults.scheme, defaults.host, defaults.path
    );
    writeln!(out, "{}", style.request(&line))?;
    serde_json::to_writer_pretty(&mut *out, defaults)?;
    writeln!(out)?;
    Ok(())
}

fn generate_completions(shell: &Shell) {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as ClapShell};

    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => ClapShell::Bash,
        Shell::Zsh => ClapShell::Zsh,
        Shell::Fish => ClapShell::Fish,
        Shell::PowerShell => ClapShell::PowerShell,
        Shell::Elvish => ClapShell::Elvish,
    };

    generate(shell, &mut cmd, "lastic", &mut std::io::stdout());
}

/// Print the error block on stdout and map to exit status 1
pub fn handle_error(error: LasticError, env: &Environment) -> ExitStatus {
    debug!(error = ?error, "Invocation failed");

    let style = Style::new(env.colors);
    let mut out = std::io::stdout().lock();
    write_error_block(&error, style, &mut out).ok();

    ExitStatus::Error
}

fn write_error_block<W: Write>(error: &LasticError, style: Style, out: &mut W) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style.error_loud("** ERROR **"))?;
    writeln!(out, "{}", style.error(&error.to_string()))?;
    writeln!(out)?;
    out.flush()
}
