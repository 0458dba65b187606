use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use veritas_core::{JobKey, Msg};
use veritas_logging::veritas_debug;

/// Cosmetic loader repaint. At most one ticker runs, scoped to one streaming job.
pub struct Ticker {
    interval: Duration,
    msg_tx: mpsc::Sender<Msg>,
    active: Option<(JobKey, Arc<AtomicBool>)>,
}

impl Ticker {
    pub fn new(interval: Duration, msg_tx: mpsc::Sender<Msg>) -> Self {
        Self {
            interval,
            msg_tx,
            active: None,
        }
    }

    pub fn start(&mut self, key: JobKey) {
        self.stop_active();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();
        let msg_tx = self.msg_tx.clone();
        let interval = self.interval;
        thread::spawn(move || loop {
            thread::sleep(interval);
            if flag.load(Ordering::Relaxed) || msg_tx.send(Msg::Tick { key }).is_err() {
                break;
            }
        });
        self.active = Some((key, stop));
    }

    pub fn stop(&mut self, key: JobKey) {
        if matches!(&self.active, Some((active, _)) if *active == key) {
            self.stop_active();
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    fn stop_active(&mut self) {
        if let Some((key, stop)) = self.active.take() {
            veritas_debug!("stopping ticker for attempt {}", key);
            stop.store(true, Ordering::Relaxed);
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop_active();
    }
}
