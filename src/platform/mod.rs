//! Simulation thread and its channels
//!
//! The simulation owns the `GameState` outright on its own thread. The
//! presentation side talks to it through two bounded channels:
//! - inputs in (`InputEvent`, edge-triggered)
//! - snapshots out (`Arc<Snapshot>`, read-only copies of the world)
//!
//! The simulation never blocks on the presentation side. When the snapshot
//! channel is full that frame's snapshot is skipped and its notifications
//! ride along with the next one.

pub mod pilot;

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{
    self, Receiver, RecvTimeoutError, SyncSender, TryRecvError, TrySendError,
};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::input::{InputEvent, InputKind};
use crate::sim::{GameState, Snapshot, tick};
use crate::tuning::Tuning;

pub use pilot::Pilot;

/// Longest frame the simulation will integrate in one step (seconds)
pub const MAX_FRAME_DT: f32 = 0.1;

/// Presentation-side end of a running simulation
pub struct SimulationHandle {
    input: SyncSender<InputEvent>,
    snapshots: Receiver<Arc<Snapshot>>,
    join: JoinHandle<GameState>,
}

/// Move `state` onto a new simulation thread
pub fn spawn(state: GameState, tuning: &Tuning) -> io::Result<SimulationHandle> {
    let (input_tx, input_rx) = mpsc::sync_channel(tuning.input_capacity);
    let (snapshot_tx, snapshot_rx) = mpsc::sync_channel(tuning.snapshot_capacity);
    let budget = tuning.frame_budget();

    log::info!(
        "Starting simulation: seed={}, frame budget {:?}, channels in={} out={}",
        state.seed,
        budget,
        tuning.input_capacity,
        tuning.snapshot_capacity
    );
    let join = thread::Builder::new()
        .name("simulation".to_string())
        .spawn(move || run(state, input_rx, snapshot_tx, budget))?;

    Ok(SimulationHandle {
        input: input_tx,
        snapshots: snapshot_rx,
        join,
    })
}

impl SimulationHandle {
    /// Queue an input without waiting; a full channel hands the event back
    pub fn send(&self, input: InputEvent) -> Result<(), TrySendError<InputEvent>> {
        self.input.try_send(input)
    }

    pub fn snapshots(&self) -> &Receiver<Arc<Snapshot>> {
        &self.snapshots
    }

    /// Newest snapshot currently queued, discarding older ones
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.snapshots.try_iter().last()
    }

    /// Stop the simulation and take back its final state
    pub fn quit(self) -> thread::Result<GameState> {
        let Self {
            input,
            snapshots,
            join,
        } = self;
        // Unblock the simulation's publish path before asking it to stop
        drop(snapshots);
        if input.send(InputEvent::press(InputKind::Quit)).is_err() {
            log::debug!("Simulation already stopped");
        }
        join.join()
    }
}

/// Simulation loop: drain inputs, tick, publish, then wait out the frame
fn run(
    mut state: GameState,
    inputs: Receiver<InputEvent>,
    snapshots: SyncSender<Arc<Snapshot>>,
    budget: Duration,
) -> GameState {
    let mut pending: Vec<InputEvent> = Vec::new();
    let mut last = Instant::now();
    let mut skipped: u64 = 0;

    loop {
        let frame_start = Instant::now();

        loop {
            match inputs.try_recv() {
                Ok(input) if input.is_quit() => {
                    log::info!("Quit received after {} ticks", state.time_ticks);
                    return state;
                }
                Ok(input) => pending.push(input),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::info!("Input channel closed, stopping simulation");
                    return state;
                }
            }
        }

        let dt = frame_start.duration_since(last).as_secs_f32().min(MAX_FRAME_DT);
        last = frame_start;
        tick(&mut state, &pending, dt);
        pending.clear();

        match snapshots.try_send(state.snapshot()) {
            Ok(()) => {}
            Err(TrySendError::Full(snapshot)) => {
                skipped += 1;
                log::trace!("Snapshot channel full, skipped {} so far", skipped);
                let events = match Arc::try_unwrap(snapshot) {
                    Ok(snapshot) => snapshot.events,
                    Err(snapshot) => snapshot.events.clone(),
                };
                state.requeue_events(events);
            }
            Err(TrySendError::Disconnected(_)) => {
                log::info!("Presentation went away, stopping simulation");
                return state;
            }
        }

        // Sleep out the frame budget, waking early to collect input
        let deadline = frame_start + budget;
        while let Some(wait) = deadline.checked_duration_since(Instant::now()) {
            match inputs.recv_timeout(wait) {
                Ok(input) if input.is_quit() => {
                    log::info!("Quit received after {} ticks", state.time_ticks);
                    return state;
                }
                Ok(input) => pending.push(input),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    log::info!("Input channel closed, stopping simulation");
                    return state;
                }
            }
        }
    }
}
