//! Broadcast service implementation
//!
//! Owns the counter, runs the tick loop and applies control messages. All
//! mutable state lives in a [`Core`] created on start and dropped on stop, so
//! nothing outlives the service instance.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::registry::{ClientHandle, ClientId, ClientRegistry, Update};
use crate::stats::{ServiceStats, StatsSnapshot};

use super::config::{ServiceConfig, MAX_INITIAL_DELAY};
use super::message::ControlMessage;
use super::state::{ServiceState, ServiceStatus};

/// Sending half of a service's control channel
pub type ControlSender = mpsc::Sender<ControlMessage>;

/// State shared by the tick loop and the control handlers
struct Core {
    config: ServiceConfig,
    state: Mutex<ServiceState>,
    registry: ClientRegistry,
    stats: Arc<ServiceStats>,
}

impl Core {
    fn new(config: ServiceConfig, stats: Arc<ServiceStats>) -> Self {
        let state = ServiceState::new(config.initial_increment);
        Self {
            config,
            state: Mutex::new(state),
            registry: ClientRegistry::new(),
            stats,
        }
    }

    /// Apply one control message
    async fn dispatch(&self, msg: ControlMessage) {
        match msg {
            ControlMessage::Register(handle) => {
                self.registry.register(handle).await;
            }
            ControlMessage::Unregister(id) => {
                self.registry.unregister(id).await;
            }
            ControlMessage::SetIncrement(step) => {
                let mut state = self.state.lock().await;
                tracing::info!(old = state.increment, new = step, "Increment changed");
                state.increment = step;
            }
            ControlMessage::Unknown(what) => {
                tracing::debug!(what = what, "Ignoring unknown control message");
                self.stats.record_ignored();
                return;
            }
        }

        self.stats.record_message();
    }

    /// Advance the counter and push it to every registered client
    ///
    /// Returns the new counter value. A client that cannot take an update is
    /// logged and skipped; it stays registered until it unregisters.
    async fn tick(&self) -> i64 {
        let counter = self.state.lock().await.advance();
        self.stats.record_tick();

        let text = self.config.format_value(counter);
        let mut clients = 0usize;

        self.registry
            .for_each(|client| {
                clients += 1;

                let result = client
                    .send(Update::Int(counter))
                    .and_then(|()| {
                        self.stats.record_delivery();
                        client.send(Update::Str(text.clone()))
                    })
                    .map(|()| self.stats.record_delivery());

                if let Err(e) = result {
                    self.stats.record_delivery_failure();
                    tracing::warn!(
                        client = %client.id(),
                        counter = counter,
                        error = %e,
                        "Failed to deliver update"
                    );
                }
            })
            .await;

        tracing::debug!(counter = counter, clients = clients, "Tick");
        counter
    }
}

/// Background tasks and control channel of a running service
struct Running {
    core: Arc<Core>,
    control_tx: ControlSender,
    shutdown_tx: watch::Sender<bool>,
    tick_task: JoinHandle<()>,
    control_task: JoinHandle<()>,
}

impl Running {
    fn spawn(core: Arc<Core>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (control_tx, control_rx) = mpsc::channel(core.config.control_capacity.max(1));

        let tick_task = tokio::spawn(run_ticks(Arc::clone(&core), shutdown_rx.clone()));
        let control_task = tokio::spawn(run_control(Arc::clone(&core), control_rx, shutdown_rx));

        Self {
            core,
            control_tx,
            shutdown_tx,
            tick_task,
            control_task,
        }
    }

    /// Signal both tasks and wait for them, aborting any still alive once
    /// `grace` has elapsed
    async fn shutdown(self, grace: Duration) -> Arc<Core> {
        let _ = self.shutdown_tx.send(true);

        let deadline = deadline_after(grace);
        join_until("tick", self.tick_task, deadline, grace).await;
        join_until("control", self.control_task, deadline, grace).await;

        self.core
    }
}

/// `now + delay`, saturating at `MAX_INITIAL_DELAY` from now
fn deadline_after(delay: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(delay)
        .or_else(|| now.checked_add(MAX_INITIAL_DELAY))
        .unwrap_or(now)
}

async fn join_until(
    name: &'static str,
    mut task: JoinHandle<()>,
    deadline: Instant,
    grace: Duration,
) {
    match tokio::time::timeout_at(deadline, &mut task).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(task = name, error = %e, "Background task failed");
        }
        Err(_) => {
            tracing::warn!(
                task = name,
                grace_ms = grace.as_millis() as u64,
                "Background task did not stop in time, aborting"
            );
            task.abort();
            let _ = task.await;
        }
    }
}

/// Tick loop: one sequential task, fixed period, no catch-up bursts
async fn run_ticks(core: Arc<Core>, mut shutdown: watch::Receiver<bool>) {
    let start = deadline_after(core.config.initial_delay);
    let mut ticker = tokio::time::interval_at(start, core.config.effective_tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {
                core.tick().await;
            }
        }
    }

    tracing::debug!("Tick loop stopped");
}

/// Control loop: drains messages sent through `bind()` senders
async fn run_control(
    core: Arc<Core>,
    mut control_rx: mpsc::Receiver<ControlMessage>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            msg = control_rx.recv() => match msg {
                Some(msg) => core.dispatch(msg).await,
                None => break,
            },
        }
    }

    tracing::debug!("Control loop stopped");
}

enum Phase {
    /// Constructed, never started
    Idle,
    Running(Running),
    /// Stopped after running; terminal
    Stopped,
}

/// Periodic counter broadcast service
///
/// # Example
/// ```no_run
/// use tickcast::{BroadcastService, ClientId, ControlMessage, ServiceConfig};
///
/// # async fn example() {
/// let service = BroadcastService::new(ServiceConfig::default());
/// service.start().await;
///
/// let (handle, mut updates) = service.client_channel(ClientId::new(1));
/// service.handle_control_message(ControlMessage::Register(handle)).await;
/// service.handle_control_message(ControlMessage::SetIncrement(10)).await;
///
/// while let Some(update) = updates.recv().await {
///     println!("{:?}", update);
/// }
/// # }
/// ```
pub struct BroadcastService {
    config: ServiceConfig,
    phase: Mutex<Phase>,
    stats: Arc<ServiceStats>,
}

impl BroadcastService {
    /// Create a stopped service
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            phase: Mutex::new(Phase::Idle),
            stats: Arc::new(ServiceStats::new()),
        }
    }

    /// Get the service configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Start ticking
    ///
    /// Returns `false` if the service is already running or has been stopped;
    /// neither case changes anything.
    pub async fn start(&self) -> bool {
        let mut phase = self.phase.lock().await;

        match *phase {
            Phase::Idle => {}
            Phase::Running(_) => {
                tracing::debug!("Service already running");
                return false;
            }
            Phase::Stopped => {
                tracing::warn!("Service was stopped and cannot be restarted");
                return false;
            }
        }

        let core = Arc::new(Core::new(self.config.clone(), Arc::clone(&self.stats)));
        *phase = Phase::Running(Running::spawn(core));

        tracing::info!(
            tick_ms = self.config.effective_tick_interval().as_millis() as u64,
            increment = self.config.initial_increment,
            "Service started"
        );
        true
    }

    /// Stop ticking and drop every client
    ///
    /// Once this returns no tick runs anymore. Returns `false` if the service
    /// was not running.
    pub async fn stop(&self) -> bool {
        let mut phase = self.phase.lock().await;

        let running = match std::mem::replace(&mut *phase, Phase::Stopped) {
            Phase::Running(running) => running,
            other => {
                *phase = other;
                return false;
            }
        };

        let core = running.shutdown(self.config.stop_grace_period).await;
        let counter = {
            let mut state = core.state.lock().await;
            state.running = false;
            state.counter
        };
        let dropped = core.registry.clear().await;

        tracing::info!(counter = counter, clients = dropped, "Service stopped");
        true
    }

    /// Current lifecycle status
    pub async fn status(&self) -> ServiceStatus {
        match *self.phase.lock().await {
            Phase::Running(_) => ServiceStatus::Running,
            Phase::Idle | Phase::Stopped => ServiceStatus::Stopped,
        }
    }

    /// Check whether the service is running
    pub async fn is_running(&self) -> bool {
        self.status().await == ServiceStatus::Running
    }

    /// Apply a control message directly
    ///
    /// Messages arriving while the service is not running are ignored.
    pub async fn handle_control_message(&self, msg: ControlMessage) {
        let phase = self.phase.lock().await;

        match *phase {
            Phase::Running(ref running) => running.core.dispatch(msg).await,
            Phase::Idle | Phase::Stopped => {
                tracing::debug!(kind = msg.kind(), "Service not running, message ignored");
                self.stats.record_ignored();
            }
        }
    }

    /// Control channel of the running service
    ///
    /// Messages sent through it are applied in order by a background task.
    /// Returns `None` when the service is not running.
    pub async fn bind(&self) -> Option<ControlSender> {
        match *self.phase.lock().await {
            Phase::Running(ref running) => Some(running.control_tx.clone()),
            Phase::Idle | Phase::Stopped => None,
        }
    }

    /// Create a client handle sized by `client_capacity`
    pub fn client_channel(&self, id: ClientId) -> (ClientHandle, mpsc::Receiver<Update>) {
        ClientHandle::channel(id, self.config.client_capacity)
    }

    /// Current counter, if running
    pub async fn counter(&self) -> Option<i64> {
        let core = self.core().await?;
        let counter = core.state.lock().await.counter;
        Some(counter)
    }

    /// Current increment step, if running
    pub async fn increment(&self) -> Option<i64> {
        let core = self.core().await?;
        let increment = core.state.lock().await.increment;
        Some(increment)
    }

    /// Number of registered clients (zero when not running)
    pub async fn client_count(&self) -> usize {
        match self.core().await {
            Some(core) => core.registry.len().await,
            None => 0,
        }
    }

    /// Get service statistics
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    async fn core(&self) -> Option<Arc<Core>> {
        match *self.phase.lock().await {
            Phase::Running(ref running) => Some(Arc::clone(&running.core)),
            Phase::Idle | Phase::Stopped => None,
        }
    }
}

impl Default for BroadcastService {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}
