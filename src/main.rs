/*!
 * faircmd - Interactive Demo
 *
 * Waits for `hello` then `world`, merging a preloaded script with tokens
 * typed on stdin, then prints the replay code for the session.
 *
 * Environment:
 * - FAIRCMD_MODE: strict | presence | hybrid (default: hybrid)
 * - FAIRCMD_FAIL_BUDGET / FAIRCMD_IDLE_MS: wait tuning
 * - FAIRCMD_SCRIPT: path of a script file to preload
 */

use faircmd::core::sync::{ENV_FAIL_BUDGET, ENV_IDLE_MS};
use faircmd::{
    init_tracing, load_script_file, tokenize_line, Channel, CommandChannel, ConsistencyModel,
    ReplayMode, WaitConfig,
};
use miette::{IntoDiagnostic, WrapErr};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::info;

const ENV_SCRIPT: &str = "FAIRCMD_SCRIPT";

fn main() -> miette::Result<()> {
    init_tracing();

    let channel = Arc::new(Channel::from_env(ConsistencyModel::Hybrid));
    // Humans type slowly; keep the interactive preset unless tuned explicitly.
    if std::env::var_os(ENV_FAIL_BUDGET).is_none() && std::env::var_os(ENV_IDLE_MS).is_none() {
        channel.configure(WaitConfig::interactive());
    }

    if let Some(path) = std::env::var_os(ENV_SCRIPT) {
        let script = load_script_file(&path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to load script {:?}", path))?;
        info!(tokens = script.len(), "preloading script");
        channel.feed(script);
    }

    let mut stdout = std::io::stdout().lock();
    writeln!(
        stdout,
        "[{}] type tokens then enter; waiting for 'hello' then 'world'...",
        channel.model()
    )
    .into_diagnostic()?;
    stdout.flush().into_diagnostic()?;

    match channel.as_hybrid() {
        Some(hybrid) => {
            hybrid.start_live_feeder().into_diagnostic()?;
        }
        None => spawn_stdin_pump(channel.clone()).into_diagnostic()?,
    }

    let result = run(&channel, &mut stdout);

    if let Some(hybrid) = channel.as_hybrid() {
        hybrid.stop_live_feeder();
        eprint!("{}", hybrid.emit_replay_code(ReplayMode::Preload, ""));
    }

    if result.is_err() {
        channel.dump_pending_to_stderr();
    }
    result
}

/// Push stdin tokens from a detached thread; process exit ends it
fn spawn_stdin_pump(channel: Arc<Channel>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("stdin-pump".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                channel.feed(tokenize_line(&line));
            }
        })?;
    Ok(())
}

fn run(channel: &Channel, stdout: &mut impl Write) -> miette::Result<()> {
    channel.wait_for("demo", "hello")?;
    writeln!(stdout, "hello!").into_diagnostic()?;
    channel.wait_for("demo", "world")?;
    writeln!(stdout, "world!").into_diagnostic()?;
    Ok(())
}
