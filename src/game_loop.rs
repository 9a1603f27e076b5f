//! Threaded fixed-rate game loop
//!
//! A `GameLoop` owns the game state and everything a tick touches. `start`
//! moves it onto its own thread and returns a `LoopHandle`; `pause` stops
//! the thread after the current tick and hands the loop back intact, ready
//! to be started again.
//!
//! Each tick, in order:
//! 1. Drain queued input (the latest steering intent wins)
//! 2. Fold in finished persistence results
//! 3. Run the simulation tick
//! 4. Request a best-score save on game over
//! 5. Present a snapshot to the renderer
//! 6. Sleep off the rest of the tick; overruns are dropped, not caught up

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::persistence::{PersistResult, ScoreKeeper};
use crate::platform::{Clock, Command, PointerEvent, map_pointer};
use crate::renderer::{Renderer, Snapshot};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, MoveIntent, TickInput, tick};

/// Input accepted by the loop from any thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopInput {
    /// Raw pointer sample, mapped against the current phase
    Pointer(PointerEvent),
    /// Already-decided command
    Command(Command),
}

/// Single-threaded core of the runner
pub struct GameLoop {
    state: GameState,
    renderer: Box<dyn Renderer>,
    clock: Box<dyn Clock>,
    keeper: Option<ScoreKeeper>,
    input_tx: Sender<LoopInput>,
    input_rx: Receiver<LoopInput>,
    /// Held steering direction, kept across ticks until changed
    intent: MoveIntent,
    tick_duration: Duration,
    autopilot: bool,
}

impl GameLoop {
    pub fn new(
        settings: &Settings,
        seed: u64,
        renderer: Box<dyn Renderer>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let (input_tx, input_rx) = unbounded();
        Self {
            state: GameState::new(settings, seed),
            renderer,
            clock,
            keeper: None,
            input_tx,
            input_rx,
            intent: MoveIntent::None,
            tick_duration: settings.tick_duration(),
            autopilot: settings.autopilot,
        }
    }

    /// Attach best-score persistence and request the stored best
    pub fn with_persistence(mut self, keeper: ScoreKeeper) -> Self {
        keeper.request_load();
        self.keeper = Some(keeper);
        self
    }

    /// Sender for input; stays valid across pause and resume
    pub fn input(&self) -> Sender<LoopInput> {
        self.input_tx.clone()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Run exactly one tick now
    pub fn step(&mut self) -> Vec<GameEvent> {
        let now_ms = self.clock.now_ms();

        let input = self.drain_input();
        self.poll_persistence();

        let events = tick(&mut self.state, &input, now_ms);

        for event in &events {
            if let GameEvent::GameOver { score, .. } = event {
                if let Some(keeper) = &self.keeper {
                    keeper.save_if_higher(*score);
                }
            }
        }

        let snapshot = Snapshot::capture(&self.state, now_ms);
        self.renderer.present(&snapshot);
        events
    }

    /// Move the loop onto its own thread
    pub fn start(self) -> anyhow::Result<LoopHandle> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let input = self.input();

        let thread = thread::Builder::new()
            .name("game-loop".into())
            .spawn(move || self.run(&flag))?;

        log::info!("Game loop started");
        Ok(LoopHandle {
            input,
            running,
            thread,
        })
    }

    /// Stop persistence (waiting for queued saves) and return the final state
    pub fn finish(mut self) -> GameState {
        if let Some(keeper) = self.keeper.take() {
            for result in keeper.shutdown() {
                self.apply_persist_result(result);
            }
        }
        self.state
    }

    fn run(mut self, running: &AtomicBool) -> Self {
        while running.load(Ordering::Acquire) {
            let tick_start = Instant::now();
            self.step();

            let elapsed = tick_start.elapsed();
            if elapsed < self.tick_duration {
                thread::sleep(self.tick_duration - elapsed);
            } else {
                log::debug!(
                    "Tick {} overran: {:.2}ms (target {:.2}ms)",
                    self.state.time_ticks,
                    elapsed.as_secs_f64() * 1000.0,
                    self.tick_duration.as_secs_f64() * 1000.0
                );
            }
        }
        log::info!("Game loop paused at tick {}", self.state.time_ticks);
        self
    }

    fn drain_input(&mut self) -> TickInput {
        let mut input = TickInput {
            idle_mode: self.autopilot,
            ..Default::default()
        };

        for message in self.input_rx.try_iter() {
            let command = match message {
                LoopInput::Command(command) => Some(command),
                LoopInput::Pointer(event) => {
                    map_pointer(event, self.state.phase, self.state.player.center().x)
                }
            };
            match command {
                Some(Command::Steer(intent)) => self.intent = intent,
                Some(Command::Start) => input.start = true,
                Some(Command::Restart) => input.restart = true,
                None => {}
            }
        }

        input.intent = self.intent;
        input
    }

    fn poll_persistence(&mut self) {
        let results = match &self.keeper {
            Some(keeper) => keeper.poll(),
            None => return,
        };
        for result in results {
            self.apply_persist_result(result);
        }
    }

    fn apply_persist_result(&mut self, result: PersistResult) {
        match result {
            PersistResult::BestLoaded(best) => self.state.score.merge_best(best),
            PersistResult::Saved(outcome) => {
                log::debug!("Best score save: {:?}", outcome);
                self.state.score.merge_best(outcome.best());
            }
            // Already logged by the worker; gameplay carries on
            PersistResult::Failed { .. } => {}
        }
    }
}

/// Handle to a running loop thread
pub struct LoopHandle {
    input: Sender<LoopInput>,
    running: Arc<AtomicBool>,
    thread: thread::JoinHandle<GameLoop>,
}

impl LoopHandle {
    pub fn send(&self, input: LoopInput) {
        // The receiver lives inside the loop, so this only fails after a panic
        if self.input.send(input).is_err() {
            log::warn!("Game loop gone, dropping {:?}", input);
        }
    }

    pub fn is_running(&self) -> bool {
        !self.thread.is_finished()
    }

    /// Stop after the current tick and take the loop back
    pub fn pause(self) -> anyhow::Result<GameLoop> {
        self.running.store(false, Ordering::Release);
        self.thread
            .join()
            .map_err(|_| anyhow!("game loop thread panicked"))
    }
}
