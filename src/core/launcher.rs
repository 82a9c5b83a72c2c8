use crate::config::AppConfig;
use crate::core::relocation::{self, CopyConsent, FsMover, Mover};
use crate::models::error::SError;
use crate::models::library::Catalog;
use crate::models::move_record::{MoveFailure, MoveRecord, RestoreReport};
use crate::utils::process::ProcessProbe;
use parking_lot::Mutex;
use std::future::Future;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Idle,
    Relocating,
    Launching,
    Running,
    Interrupted,
    Restoring,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The target process appeared and then went away.
    Exited,
    /// An interrupt arrived before the target exited.
    Interrupted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaunchReport {
    pub outcome: LaunchOutcome,
    pub relocation_failures: Vec<MoveFailure>,
    pub restore: RestoreReport,
    pub states: Vec<LaunchState>,
}

/// Holds the move record until somebody restores it. Whichever path gets
/// here first (normal exit or interrupt) does the work; later callers wait
/// for the lock and then find nothing left to do.
pub struct RestoreGuard {
    record: Mutex<Option<MoveRecord>>,
}

impl RestoreGuard {
    pub fn new(record: MoveRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }

    /// Restores on first call, returns `None` on every later call.
    pub fn restore_once(&self) -> Option<RestoreReport> {
        let mut slot = self.record.lock();
        let record = slot.take()?;
        if !record.is_empty() {
            info!("Restoring {} folders...", record.len());
        }
        // The lock stays held while restoring so a concurrent caller cannot
        // return before the folders are back.
        Some(relocation::restore(record))
    }
}

/// Drives one relocate → launch → wait → restore session.
pub struct Supervisor<P: ProcessProbe> {
    config: AppConfig,
    probe: P,
    poll_interval: Duration,
    states: Vec<LaunchState>,
    child: Option<Child>,
    mover: Box<dyn Mover>,
}

impl<P: ProcessProbe> Supervisor<P> {
    pub fn new(config: AppConfig, probe: P) -> Self {
        let poll_interval = config.poll_interval();
        Self {
            config,
            probe,
            poll_interval,
            states: vec![LaunchState::Idle],
            child: None,
            mover: Box::new(FsMover),
        }
    }

    /// Replaces the filesystem primitives used for the relocation pass.
    pub fn with_mover(mut self, mover: impl Mover + 'static) -> Self {
        self.mover = Box::new(mover);
        self
    }

    fn enter(&mut self, state: LaunchState) {
        debug!("launch state: {:?}", state);
        self.states.push(state);
    }

    /// Runs the session. `interrupt` resolves when the operator asks us to
    /// stop; pass [`shutdown_signal`] in production. It must already be
    /// listening when handed over, since it is first polled only after the
    /// relocation pass.
    pub async fn run<I>(
        mut self,
        catalog: &Catalog,
        consent: &mut dyn CopyConsent,
        interrupt: I,
    ) -> Result<LaunchReport, SError>
    where
        I: Future<Output = ()> + Send + 'static,
    {
        self.enter(LaunchState::Relocating);
        let relocated = match relocation::relocate_disabled_with(
            catalog,
            &self.config,
            consent,
            &mut *self.mover,
        ) {
            Ok(report) => report,
            Err(failure) => {
                error!("error disabling mods: {}", failure.error);
                self.enter(LaunchState::Restoring);
                let restore = relocation::restore_with(failure.record, &mut *self.mover);
                if !restore.is_clean() {
                    warn!("partial relocation was not fully restored: {:?}", restore);
                }
                self.enter(LaunchState::Done);
                return Err(failure.error);
            }
        };

        let guard = Arc::new(RestoreGuard::new(relocated.record));

        // The handler restores on its own so that an interrupt is honoured
        // even if this task is never polled again.
        let (interrupted_tx, interrupted_rx) = oneshot::channel();
        let handler = {
            let guard = Arc::clone(&guard);
            tokio::spawn(async move {
                interrupt.await;
                warn!("Interrupted, restoring...");
                let report = guard.restore_once();
                let _ = interrupted_tx.send(report);
            })
        };

        // Give the handler one turn: an interrupt that arrived while
        // relocating is acted on before anything is launched.
        let mut interrupted_rx = interrupted_rx;
        tokio::task::yield_now().await;
        if let Ok(report) = interrupted_rx.try_recv() {
            handler.abort();
            self.enter(LaunchState::Interrupted);
            self.enter(LaunchState::Restoring);
            let restore = report.or_else(|| guard.restore_once()).unwrap_or_default();
            self.enter(LaunchState::Done);
            warn!("Interrupted before launch, mods restored.");
            return Ok(LaunchReport {
                outcome: LaunchOutcome::Interrupted,
                relocation_failures: relocated.failures,
                restore,
                states: self.states,
            });
        }

        self.enter(LaunchState::Launching);
        if let Err(e) = self.spawn_game() {
            handler.abort();
            self.enter(LaunchState::Restoring);
            let restore = guard.restore_once().unwrap_or_default();
            self.enter(LaunchState::Done);
            error!("game launch error: {e}");
            warn!("restore after failed launch: {:?}", restore);
            return Err(e);
        }

        let target = self.config.target_process.clone();
        let poll_interval = self.poll_interval;
        let (outcome, handler_report) = {
            let states = &mut self.states;
            let probe = &mut self.probe;
            tokio::select! {
                _ = wait_for_exit(probe, &target, poll_interval, states) => (LaunchOutcome::Exited, None),
                Ok(report) = &mut interrupted_rx => (LaunchOutcome::Interrupted, report),
            }
        };
        handler.abort();

        if outcome == LaunchOutcome::Interrupted {
            self.enter(LaunchState::Interrupted);
        }
        self.enter(LaunchState::Restoring);

        // Exactly one of these holds the report: our own call, or the
        // handler's if it won the race.
        let restore = guard
            .restore_once()
            .or(handler_report)
            .or_else(|| interrupted_rx.try_recv().ok().flatten())
            .unwrap_or_default();
        self.reap_launcher();
        self.enter(LaunchState::Done);

        match outcome {
            LaunchOutcome::Exited => info!("Game exited, mods restored."),
            LaunchOutcome::Interrupted => warn!("Launch interrupted, mods restored."),
        }

        Ok(LaunchReport {
            outcome,
            relocation_failures: relocated.failures,
            restore,
            states: self.states,
        })
    }

    fn spawn_game(&mut self) -> Result<(), SError> {
        let exe = &self.config.game_exe;
        info!("Launching via Steam: {} {:?}", exe, self.config.args);

        let child = Command::new(exe)
            .args(&self.config.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| SError::LaunchFailed(format!("{exe}: {e}")))?;

        debug!("spawned launcher pid {}", child.id());
        self.child = Some(child);
        Ok(())
    }

    /// The launcher usually hands off to Steam and exits early; collect its
    /// status if it has, so it does not linger as a zombie.
    fn reap_launcher(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        match child.try_wait() {
            Ok(Some(status)) => info!("launcher exited with {status}"),
            Ok(None) => debug!("launcher pid {} still running", child.id()),
            Err(e) => warn!("cannot query launcher status: {e}"),
        }
    }
}

/// Polls until `target` shows up in the process table, then until it is gone.
async fn wait_for_exit<P: ProcessProbe>(
    probe: &mut P,
    target: &str,
    every: Duration,
    states: &mut Vec<LaunchState>,
) {
    let mut ticker = tokio::time::interval(every);

    loop {
        ticker.tick().await;
        if probe.is_running(target) {
            break;
        }
    }
    info!("Target process {target:?} is running");
    states.push(LaunchState::Running);

    loop {
        ticker.tick().await;
        if !probe.is_running(target) {
            break;
        }
    }
    info!("Target process exited.");
}

/// Listens for Ctrl-C and, on Unix, SIGTERM. The listeners are installed
/// when this is called, not when the returned future is first polled, so it
/// must be called inside a runtime. A listener that cannot be installed is
/// ignored rather than treated as an interrupt.
#[cfg(unix)]
pub fn shutdown_signal() -> impl Future<Output = ()> + Send + 'static {
    use tokio::signal::unix::{signal, Signal, SignalKind};

    fn install(kind: SignalKind, name: &str) -> Option<Signal> {
        signal(kind)
            .map_err(|e| warn!("cannot listen for {name}: {e}"))
            .ok()
    }

    async fn next(sig: Option<Signal>) {
        match sig {
            Some(mut sig) => {
                sig.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    let interrupt = install(SignalKind::interrupt(), "Ctrl-C");
    let terminate = install(SignalKind::terminate(), "SIGTERM");

    async move {
        tokio::select! {
            _ = next(interrupt) => {},
            _ = next(terminate) => {},
        }
    }
}

#[cfg(windows)]
pub fn shutdown_signal() -> impl Future<Output = ()> + Send + 'static {
    let ctrl_c = tokio::signal::windows::ctrl_c()
        .map_err(|e| warn!("cannot listen for Ctrl-C: {e}"))
        .ok();

    async move {
        match ctrl_c {
            Some(mut ctrl_c) => {
                ctrl_c.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
