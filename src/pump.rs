use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use num_traits::{FromPrimitive, ToPrimitive};
use timer_core::Ticker;

use crate::{AppOp, Scalar};

const DEFAULT_INTERVAL_MS: u64 = 100;

#[derive(Debug, PartialEq, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub enum PumpOp {
    /// arg1 = interval in ms, arg2 = generation
    Start = 0,
    Stop,
    Quit,
}

impl PumpOp {
    fn scalar(self, arg1: usize, arg2: usize) -> Scalar {
        Scalar::new(self.to_usize().unwrap_or(usize::MAX), arg1, arg2)
    }
}

/// Handle to the pump thread. Implements the stopwatch's ticker.
///
/// Each arm or cancel moves to a new generation. Pump messages carry the
/// generation they were armed with, and the main loop only accepts the
/// current one while armed, so a tick already in flight when `cancel`
/// returns is discarded.
pub struct Pump {
    conn: Sender<Scalar>,
    generation: usize,
    armed: bool,
    thread: Option<JoinHandle<()>>,
}

impl Pump {
    pub fn spawn(main_conn: Sender<Scalar>) -> io::Result<Self> {
        let (conn, ctl) = mpsc::channel();
        let thread = thread::Builder::new()
            .name("pump".into())
            .spawn(move || pump_thread(ctl, main_conn))?;
        let mut pump = Self::with_conn(conn);
        pump.thread = Some(thread);
        Ok(pump)
    }

    /// A handle whose control messages go to `conn` instead of a thread.
    pub fn with_conn(conn: Sender<Scalar>) -> Self {
        Self {
            conn,
            generation: 0,
            armed: false,
            thread: None,
        }
    }

    pub fn accepts(&self, generation: usize) -> bool {
        self.armed && generation == self.generation
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn shutdown(&mut self) {
        self.cancel();
        self.conn.send(PumpOp::Quit.scalar(0, 0)).ok();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("pump thread panicked");
            }
        }
    }
}

impl Ticker for Pump {
    fn arm(&mut self, period_ms: u64) {
        self.generation = self.generation.wrapping_add(1);
        self.armed = true;
        log::debug!("pump armed: {} ms, generation {}", period_ms, self.generation);
        if self
            .conn
            .send(PumpOp::Start.scalar(period_ms as usize, self.generation))
            .is_err()
        {
            log::error!("pump thread is gone");
        }
    }

    fn cancel(&mut self) {
        if !self.armed {
            return;
        }
        self.generation = self.generation.wrapping_add(1);
        self.armed = false;
        log::debug!("pump cancelled");
        self.conn.send(PumpOp::Stop.scalar(0, 0)).ok();
    }
}

/// Sends `AppOp::Pump` to the main loop every interval while started.
pub fn pump_thread(ctl: Receiver<Scalar>, main_conn: Sender<Scalar>) {
    let mut interval_ms = DEFAULT_INTERVAL_MS;
    let mut generation = 0usize;
    let mut running = false;

    loop {
        // Time out into a pump when running, block-wait when stopped
        let envelope = if running {
            match ctl.recv_timeout(Duration::from_millis(interval_ms)) {
                Ok(msg) => Some(msg),
                Err(RecvTimeoutError::Timeout) => {
                    let pump = Scalar::new(AppOp::Pump.to_usize().unwrap_or(usize::MAX), generation, 0);
                    if main_conn.send(pump).is_err() {
                        break;
                    }
                    None
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        } else {
            match ctl.recv() {
                Ok(msg) => Some(msg),
                Err(_) => break,
            }
        };

        if let Some(msg) = envelope {
            match FromPrimitive::from_usize(msg.id) {
                Some(PumpOp::Start) => {
                    interval_ms = msg.arg1 as u64;
                    if interval_ms == 0 {
                        interval_ms = DEFAULT_INTERVAL_MS;
                    }
                    generation = msg.arg2;
                    running = true;
                }
                Some(PumpOp::Stop) => running = false,
                Some(PumpOp::Quit) => break,
                None => log::error!("unknown pump opcode: {}", msg.id),
            }
        }
    }
    log::debug!("pump thread exiting");
}
