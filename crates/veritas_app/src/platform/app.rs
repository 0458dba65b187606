use std::io::{self, BufRead};
use std::process::ExitCode;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use veritas_core::{update, AppState, InputMode, Msg, Phase};
use veritas_logging::{veritas_debug, veritas_info};

use super::commands::{parse_command, Command, HELP};
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::history::load_history;
use super::ui::render::{format_recent, prompt};
use super::ui::TerminalSink;

const INPUT_POLL: Duration = Duration::from_millis(25);

/// Exit code for input that never reached the service.
const EXIT_REJECTED: u8 = 2;

pub enum RunMode {
    /// Analyze one claim, print the verdict and exit.
    OneShot { claim: String },
    /// Read claims and commands from stdin until `:quit` or end of input.
    Interactive,
}

pub fn run_app(config: AppConfig, mode: InputMode, run_mode: RunMode) -> anyhow::Result<ExitCode> {
    veritas_info!(
        "starting against {} (min {} chars, job timeout {}s)",
        config.base_url,
        config.min_text_len,
        config.job_timeout_secs
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(&config, msg_tx).context("starting the analysis engine")?;
    let mut controller = Controller {
        state: AppState::with_settings(config.core_settings()),
        runner,
        sink: TerminalSink::new(io::stdout()),
    };
    controller.dispatch(Msg::RestoreHistory(load_history(&config.data_dir)))?;
    controller.dispatch(Msg::ModeSelected(mode))?;

    match run_mode {
        RunMode::OneShot { claim } => run_one_shot(&mut controller, &msg_rx, claim),
        RunMode::Interactive => run_interactive(&mut controller, &msg_rx),
    }
}

struct Controller {
    state: AppState,
    runner: EffectRunner,
    sink: TerminalSink<io::Stdout>,
}

impl Controller {
    fn dispatch(&mut self, msg: Msg) -> anyhow::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        veritas_logging::set_job_context(state.current_key());
        self.runner.enqueue(effects);

        for notification in state.take_notifications() {
            self.sink.notify(&notification)?;
        }
        if state.consume_dirty() {
            self.sink.render(&state.view())?;
        }
        self.state = state;
        Ok(())
    }

    fn phase(&self) -> Phase {
        self.state.view().phase
    }
}

fn run_one_shot(
    controller: &mut Controller,
    msg_rx: &mpsc::Receiver<Msg>,
    claim: String,
) -> anyhow::Result<ExitCode> {
    controller.dispatch(Msg::InputChanged(claim))?;
    controller.dispatch(Msg::SubmitClicked)?;
    if controller.phase() == Phase::Idle {
        return Ok(ExitCode::from(EXIT_REJECTED));
    }

    while controller.phase().is_in_flight() {
        let msg = msg_rx
            .recv()
            .context("analysis engine stopped before the job settled")?;
        controller.dispatch(msg)?;
    }

    let view = controller.state.view();
    veritas_info!("one-shot run settled in {:?}", view.phase);
    Ok(match view.phase {
        Phase::Completed => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

fn run_interactive(
    controller: &mut Controller,
    msg_rx: &mpsc::Receiver<Msg>,
) -> anyhow::Result<ExitCode> {
    let commands = spawn_stdin_reader()?;
    controller.sink.line(HELP)?;
    controller.sink.write_prompt(prompt(&controller.state.view()))?;

    loop {
        let was_in_flight = controller.phase().is_in_flight();
        match msg_rx.recv_timeout(INPUT_POLL) {
            Ok(msg) => controller.dispatch(msg)?,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => bail!("analysis engine stopped"),
        }
        if was_in_flight && !controller.phase().is_in_flight() {
            controller.sink.write_prompt(prompt(&controller.state.view()))?;
        }

        while let Ok(command) = commands.try_recv() {
            veritas_debug!("command {:?}", command);
            match command {
                Command::Quit => {
                    if controller.phase().is_in_flight() {
                        controller.dispatch(Msg::ResetClicked)?;
                    }
                    return Ok(ExitCode::SUCCESS);
                }
                Command::History => {
                    let recent = controller.state.history_snapshot();
                    controller.sink.line(&format_recent(&recent))?;
                }
                Command::Help => controller.sink.line(HELP)?,
                Command::Unknown(name) => {
                    controller
                        .sink
                        .line(&format!("Unknown command :{name} (try :help)"))?;
                }
                other => {
                    for msg in other.into_msgs() {
                        controller.dispatch(msg)?;
                    }
                }
            }
            controller.sink.write_prompt(prompt(&controller.state.view()))?;
        }
    }
}

fn spawn_stdin_reader() -> io::Result<mpsc::Receiver<Command>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("veritas-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(parse_command(&line)).is_err() {
                    return;
                }
            }
            let _ = tx.send(Command::Quit);
        })?;
    Ok(rx)
}
