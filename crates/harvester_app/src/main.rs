mod config;
mod effects;
mod logging;
mod overlay;

use std::io::BufRead;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use anyhow::Result;
use engine_logging::engine_info;
use harvester_core::{update, AppState, Msg, SessionState};

use crate::effects::EffectRunner;

/// Everything the main loop can react to.
enum AppInput {
    Core(Msg),
    Quit,
}

fn main() -> Result<()> {
    logging::initialize(logging::LogDestination::Both);

    let config = config::load(Path::new(config::CONFIG_FILENAME));
    engine_info!("driving webdriver at {}", config.webdriver_url);

    let (input_tx, input_rx) = mpsc::channel::<AppInput>();
    let runner = EffectRunner::new(input_tx.clone(), &config);
    spawn_control_channel(input_tx);

    println!("Commands: start | stop | quit");
    let mut state = AppState::new();
    overlay::render(&state.view());

    let mut quit_requested = false;
    while let Ok(input) = input_rx.recv() {
        let msg = match input {
            AppInput::Core(msg) => msg,
            AppInput::Quit => {
                let active = matches!(
                    state.session(),
                    SessionState::Running | SessionState::Stopping
                );
                if !active {
                    break;
                }
                // Stop first; leave once the run has wound down.
                quit_requested = true;
                Msg::StopRequested
            }
        };
        dispatch(&mut state, msg, &runner);
        if quit_requested && state.session() == SessionState::Done {
            break;
        }
    }

    Ok(())
}

fn dispatch(state: &mut AppState, msg: Msg, runner: &EffectRunner) {
    let (next, effects) = update(std::mem::take(state), msg);
    *state = next;
    runner.execute(effects);
    if state.consume_dirty() {
        overlay::render(&state.view());
    }
}

/// stdin is the control channel: one command per line, `Quit` on EOF.
fn spawn_control_channel(tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let input = match line.trim() {
                "" => continue,
                "start" => AppInput::Core(Msg::StartRequested),
                "stop" => AppInput::Core(Msg::StopRequested),
                "quit" | "exit" => AppInput::Quit,
                other => {
                    println!("unknown command: {other}");
                    continue;
                }
            };
            if tx.send(input).is_err() {
                return;
            }
        }
        let _ = tx.send(AppInput::Quit);
    });
}
