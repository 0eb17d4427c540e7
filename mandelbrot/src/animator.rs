use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use shared::RenderParameters;
use tracing::{debug, error};

use crate::state::SharedParameters;

/// Fixed-rate update thread. It only mutates `RenderParameters`; nothing on
/// this thread may touch the GPU.
pub struct Animator {
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl Animator {
    pub fn spawn(params: SharedParameters, period: Duration) -> io::Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel();
        let thread = thread::Builder::new()
            .name("animator".to_owned())
            .spawn(move || run(params, period, stop_rx))?;

        debug!(?period, "animator started");

        Ok(Self {
            stop: Some(stop_tx),
            thread: Some(thread),
        })
    }

    /// Signals the thread and waits for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("animator thread panicked");
            }
        }
    }
}

impl Drop for Animator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(params: SharedParameters, period: Duration, stop: Receiver<()>) {
    let mut ticks: u64 = 0;
    let mut next = Instant::now();

    loop {
        params.update(RenderParameters::tick);
        ticks += 1;

        // Absolute deadlines; a late wakeup shortens the next wait.
        next += period;
        match stop.recv_timeout(next.saturating_duration_since(Instant::now())) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!(ticks, "animator stopped");
}
