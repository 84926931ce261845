//! Controller threads
//!
//! Whatever drives the HUD from outside the render loop: either the
//! scripted demo or line commands on stdin. Both only touch the shared
//! mode channel.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use arclight_core::{Mode, ModeStateChannel};
use arclight_protocol::{parse_command, ControllerCommand, StatusLine};
use log::{debug, info, warn};

/// Time between demo steps
pub const DEMO_STEP: Duration = Duration::from_secs(2);

/// Demo steps after the initial idle state, repeated until stopped
pub const DEMO_SCRIPT: [(Mode, &str); 3] = [
    (Mode::Listening, ""),
    (Mode::Speaking, "Processing Data"),
    (Mode::Idle, "Awaiting Input"),
];

/// Granularity of the demo's stop check
const POLL: Duration = Duration::from_millis(20);

pub fn spawn_demo(channel: Arc<ModeStateChannel>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("arclight-demo".into())
        .spawn(move || run_demo(&channel, DEMO_STEP))
}

/// Cycle through the demo script until the channel stops
pub fn run_demo(channel: &ModeStateChannel, step: Duration) {
    info!("Demo script started");
    for (mode, text) in DEMO_SCRIPT.iter().cycle() {
        if !sleep_while_running(channel, step) {
            break;
        }
        info!("Demo -> {}", mode.name());
        channel.set_mode(*mode, text);
    }
    debug!("Demo script finished");
}

/// Sleep for `duration`, returning early with `false` once stopped
fn sleep_while_running(channel: &ModeStateChannel, duration: Duration) -> bool {
    let deadline = Instant::now() + duration;
    while channel.is_running() {
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(POLL.min(deadline - now));
    }
    false
}

pub fn spawn_stdin(channel: Arc<ModeStateChannel>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("arclight-stdin".into())
        .spawn(move || {
            let stdin = io::stdin();
            if let Err(e) = handle_lines(stdin.lock(), io::stdout(), &channel) {
                warn!("Controller input failed: {}", e);
            }
        })
}

/// Apply protocol lines from `input` to the channel
///
/// `STATUS` replies and parse errors go to `output`. End of input leaves
/// the HUD running in its last mode.
pub fn handle_lines<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    channel: &ModeStateChannel,
) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        if !channel.is_running() {
            break;
        }

        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(ControllerCommand::SetMode { mode, text })) => {
                debug!("Controller: mode {} '{}'", mode, text);
                channel.set_mode_raw(mode, &text);
            }
            Ok(Some(ControllerCommand::Stop)) => {
                info!("Stop requested by controller");
                channel.request_stop();
                break;
            }
            Ok(Some(ControllerCommand::Query)) => {
                let snapshot = channel.snapshot();
                let reply = StatusLine {
                    mode: snapshot.mode.name(),
                    text: snapshot.status_text(),
                };
                writeln!(output, "{}", reply)?;
                output.flush()?;
            }
            Err(e) => {
                warn!("Ignoring '{}': {}", line.trim(), e);
                writeln!(output, "ERR {}", e)?;
            }
        }
    }

    info!("Controller input closed");
    Ok(())
}
