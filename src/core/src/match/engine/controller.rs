use crate::config::MatchConfig;
use crate::error::{ConfigurationError, MatchError, PersistenceError};
use crate::league::{SeasonRecorder, SeasonStore};
use crate::r#match::engine::clock::Clock;
use crate::r#match::engine::observer::{ObserverResult, ObserverSet, run_completion};
use crate::r#match::engine::render::{FrameView, RenderSurface};
use crate::r#match::engine::session::{MatchSession, MatchSnapshot, MinuteTick};
use crate::r#match::events::MatchEvent;
use crate::r#match::result::MatchResult;
use crate::r#match::{ClockMode, Score, Side, TeamRef};
use log::{debug, error, info};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// What `stop()` hands back: the result always, plus the outcome of recording it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedMatch {
    pub result: MatchResult,
    pub recording: Result<(), PersistenceError>,
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Shared {
    session: Mutex<MatchSession>,
    observers: Mutex<ObserverSet>,
    surface: Mutex<Option<Box<dyn RenderSurface>>>,
    store: Mutex<Option<Arc<RwLock<dyn SeasonStore>>>>,
    /// Set once, when the result has been recorded and completion callbacks ran.
    recording: Mutex<Option<Result<(), PersistenceError>>>,
    /// Bumped on every pause/stop; a driver from an older generation exits.
    generation: AtomicU64,
}

impl Shared {
    fn dispatch(&self, ticks: &[MinuteTick]) {
        let mut observers = lock(&self.observers);

        for tick in ticks {
            if let Some(event) = &tick.event {
                observers.notify(event, tick.score);
            }
        }
    }

    fn render(&self, sub_steps: u32, view: &FrameView) {
        if let Some(surface) = lock(&self.surface).as_mut() {
            for _ in 0..sub_steps {
                surface.update(view);
            }
            surface.draw(view);
        }
    }

    /// Records the result and fires completion callbacks, exactly once.
    fn complete(&self, result: &MatchResult) -> Result<(), PersistenceError> {
        let mut recording = lock(&self.recording);
        if let Some(outcome) = recording.as_ref() {
            return outcome.clone();
        }

        let store = lock(&self.store).clone();
        let outcome = match store {
            Some(store) => {
                let mut guard = store.write().unwrap_or_else(PoisonError::into_inner);
                SeasonRecorder::record(result, &mut *guard)
            }
            None => Ok(()),
        };

        *recording = Some(outcome.clone());
        drop(recording);

        lock(&self.observers).complete(result);

        outcome
    }
}

/// Public handle to one match. Owns the session behind a single lock; the
/// clock driver task and every lifecycle call mutate it only under that lock.
pub struct MatchController {
    shared: Arc<Shared>,
    driver: Mutex<Option<JoinHandle<()>>>,
    runtime: Mutex<Option<Handle>>,
}

impl MatchController {
    pub fn create(home: TeamRef, away: TeamRef, config: MatchConfig) -> Self {
        Self::from_session(MatchSession::new(Arc::new(home), Arc::new(away), config))
    }

    pub fn from_session(session: MatchSession) -> Self {
        MatchController {
            shared: Arc::new(Shared {
                session: Mutex::new(session),
                observers: Mutex::new(ObserverSet::new()),
                surface: Mutex::new(None),
                store: Mutex::new(None),
                recording: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
            driver: Mutex::new(None),
            runtime: Mutex::new(None),
        }
    }

    pub fn with_render_surface(self, surface: Box<dyn RenderSurface>) -> Self {
        *lock(&self.shared.surface) = Some(surface);
        self
    }

    pub fn with_store(self, store: Arc<RwLock<dyn SeasonStore>>) -> Self {
        *lock(&self.shared.store) = Some(store);
        self
    }

    /// Starts the clock on the current tokio runtime. Configuration problems are
    /// reported here and leave the session idle.
    pub fn start<F>(&self, mode: ClockMode, speed: u32, on_event: F) -> Result<(), MatchError>
    where
        F: FnMut(&MatchEvent, u8, Score) -> ObserverResult + Send + 'static,
    {
        if mode == ClockMode::Visual && lock(&self.shared.surface).is_none() {
            return Err(ConfigurationError::MissingRenderSurface.into());
        }

        let runtime = Handle::try_current().map_err(|_| ConfigurationError::NoRuntime)?;

        let started = lock(&self.shared.session).start(mode, speed)?;
        if !started {
            return Ok(());
        }

        lock(&self.shared.observers).add_event_observer(Box::new(on_event));
        *lock(&self.runtime) = Some(runtime);

        self.spawn_driver();

        Ok(())
    }

    pub fn pause(&self) {
        {
            let mut session = lock(&self.shared.session);
            if !session.pause() {
                return;
            }
            self.shared.generation.fetch_add(1, Ordering::SeqCst);
        }

        self.abort_driver();
    }

    pub fn resume(&self) {
        if !lock(&self.shared.session).resume() {
            return;
        }

        self.spawn_driver();
    }

    /// Forces completion from any state and returns the (cached) result.
    pub fn stop(&self) -> CompletedMatch {
        let result = {
            let mut session = lock(&self.shared.session);
            self.shared.generation.fetch_add(1, Ordering::SeqCst);
            session.stop()
        };

        self.abort_driver();

        let recording = self.shared.complete(&result);

        CompletedMatch { result, recording }
    }

    pub fn get_state(&self) -> MatchSnapshot {
        lock(&self.shared.session).snapshot()
    }

    /// Runs `callback` with the result once the match completes, or right away
    /// when it already has.
    pub fn on_complete<F>(&self, callback: F)
    where
        F: FnOnce(&MatchResult) + Send + 'static,
    {
        let mut observers = lock(&self.shared.observers);

        let finished = lock(&self.shared.recording).is_some();
        let result = if finished {
            lock(&self.shared.session).result().cloned()
        } else {
            None
        };

        match result {
            Some(result) => {
                drop(observers);
                run_completion(Box::new(callback), &result);
            }
            None => observers.add_completion_callback(Box::new(callback)),
        }
    }

    fn spawn_driver(&self) {
        let Some(runtime) = lock(&self.runtime).clone() else {
            return;
        };

        let (mode, config, speed, generation) = {
            let session = lock(&self.shared.session);
            let Some(mode) = session.status().mode() else {
                return;
            };
            (
                mode,
                session.config().clone(),
                session.speed(),
                self.shared.generation.load(Ordering::SeqCst),
            )
        };

        let shared = Arc::clone(&self.shared);
        let handle = runtime.spawn(async move {
            let clock = Clock::for_mode(mode, &config, speed);
            drive(shared, generation, clock).await
        });

        if let Some(previous) = lock(&self.driver).replace(handle) {
            previous.abort();
        }
    }

    fn abort_driver(&self) {
        if let Some(handle) = lock(&self.driver).take() {
            handle.abort();
        }
    }
}

impl Drop for MatchController {
    fn drop(&mut self) {
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        self.abort_driver();
    }
}

async fn drive(shared: Arc<Shared>, generation: u64, mut clock: Clock) {
    debug!("clock driver {} started", generation);

    loop {
        let step = clock.next().await;

        let (ticks, view, result) = {
            let mut session = lock(&shared.session);

            let stale = shared.generation.load(Ordering::SeqCst) != generation;
            if stale || !session.status().is_running() {
                debug!("clock driver {} stopped", generation);
                return;
            }

            let ticks = session.advance(step.minutes);

            let view = FrameView {
                minute: session.minute(),
                score: session.score(),
                status: session.status(),
                new_events: ticks.iter().filter_map(|t| t.event.clone()).collect(),
            };

            (ticks, view, session.result().cloned())
        };

        if step.sub_steps > 0 {
            shared.render(step.sub_steps, &view);
        }

        shared.dispatch(&ticks);

        if let Some(result) = result {
            if let Err(e) = shared.complete(&result) {
                error!("match result was not recorded: {}", e);
            }
            info!("home side finished {}", result.summary_for(Side::Home));
            return;
        }
    }
}
