use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use brawler_core::commands::{AttackKind, CommandFlags};
use brawler_core::events::MatchEvent;
use brawler_core::roster::Archetype;
use brawler_core::view::{FrameSnapshot, Phase, Side};
use brawler_sim::RoundController;

use crate::autopilot;
use crate::config::HostConfig;
use crate::error::HostError;

/// Period of the round countdown.
pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Commands sent from an input source to the session loop.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Human fighter for the next round start.
    Select(&'static Archetype),
    /// Start a fresh match from any phase.
    Start,
    /// Raw key edge from a keyboard-like source.
    Key { key: String, pressed: bool },
    /// Replace the held movement flags.
    Input(CommandFlags),
    /// Attack key-down.
    Attack(AttackKind),
    /// Return to idle, dropping any pending countdown or restart.
    Abort,
    Stop,
}

/// Output of the session loop.
#[derive(Debug, Clone)]
pub enum SessionBroadcast {
    /// State after a simulated tick.
    Frame(Box<FrameSnapshot>),
    Event(MatchEvent),
    /// The loop has exited.
    Ended,
}

/// Deferred callbacks delivered back into the session loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerFired {
    SecondElapsed(u64),
    Restart(u64),
}

/// Cloneable sender half of a session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    pub fn send(&self, cmd: SessionCommand) -> Result<(), HostError> {
        self.tx.send(cmd).map_err(|_| HostError::SessionClosed)
    }

    /// Resolve `name` against the roster and select it.
    pub fn select(&self, name: &str) -> Result<(), HostError> {
        let archetype =
            Archetype::by_name(name).ok_or_else(|| HostError::UnknownArchetype(name.to_string()))?;
        self.send(SessionCommand::Select(archetype))
    }

    pub fn start(&self) -> Result<(), HostError> {
        self.send(SessionCommand::Start)
    }

    pub fn key(&self, key: &str, pressed: bool) -> Result<(), HostError> {
        self.send(SessionCommand::Key {
            key: key.to_string(),
            pressed,
        })
    }

    pub fn abort(&self) -> Result<(), HostError> {
        self.send(SessionCommand::Abort)
    }

    pub fn stop(&self) -> Result<(), HostError> {
        self.send(SessionCommand::Stop)
    }
}

/// Spawn a session loop as a tokio task.
/// Returns the command handle, the broadcast receiver and the task handle.
pub fn spawn_session(
    config: &HostConfig,
) -> Result<
    (
        SessionHandle,
        mpsc::UnboundedReceiver<SessionBroadcast>,
        JoinHandle<()>,
    ),
    HostError,
> {
    config.validate()?;

    let mut controller = RoundController::new();
    controller.select(config.archetype()?);
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let tick_interval = Duration::from_secs_f64(1.0 / f64::from(config.tick_rate_hz));

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();
    let (timer_tx, timer_rx) = mpsc::unbounded_channel();

    let session = Session {
        controller,
        rng,
        held: CommandFlags::default(),
        autopilot: config.autopilot,
        timers: RoundTimers::new(timer_tx),
        out: broadcast_tx,
    };

    tracing::info!(
        tick_rate_hz = config.tick_rate_hz,
        seed = ?config.seed,
        autopilot = config.autopilot,
        "Session spawned"
    );
    let handle = tokio::spawn(run_session(session, tick_interval, cmd_rx, timer_rx));

    Ok((SessionHandle { tx: cmd_tx }, broadcast_rx, handle))
}

/// Follow a session's broadcasts until it ends, stopping it at match over or
/// once `shutdown` resolves. Returns the match events seen.
///
/// `shutdown` is polled as a single future for the whole run, so a signal
/// that fires between broadcasts is not lost.
pub async fn follow_session<F>(
    session: &SessionHandle,
    rx: &mut mpsc::UnboundedReceiver<SessionBroadcast>,
    shutdown: F,
) -> Vec<MatchEvent>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut interrupted = false;
    let mut events = Vec::new();

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(SessionBroadcast::Event(event)) => {
                    tracing::info!("{event}");
                    let over = matches!(event, MatchEvent::MatchOver { .. });
                    events.push(event);
                    if over {
                        let _ = session.stop();
                    }
                },
                Some(SessionBroadcast::Frame(_)) => {},
                Some(SessionBroadcast::Ended) | None => break,
            },
            _ = &mut shutdown, if !interrupted => {
                interrupted = true;
                tracing::info!("Shutdown requested, stopping session");
                let _ = session.stop();
            },
        }
    }
    events
}

/// The session loop. Owns all match state; timers only send messages back.
async fn run_session(
    mut session: Session,
    tick_interval: Duration,
    mut cmd_rx: mpsc::UnboundedReceiver<SessionCommand>,
    mut timer_rx: mpsc::UnboundedReceiver<TimerFired>,
) {
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => session.tick(),
            Some(fired) = timer_rx.recv() => session.timer_fired(fired),
            cmd = cmd_rx.recv() => match cmd {
                Some(SessionCommand::Stop) | None => break,
                Some(cmd) => session.command(cmd),
            },
        }
    }

    session.timers.cancel();
    tracing::info!("Session stopped");
    let _ = session.out.send(SessionBroadcast::Ended);
}

struct Session {
    controller: RoundController,
    rng: StdRng,
    held: CommandFlags,
    autopilot: bool,
    timers: RoundTimers,
    out: mpsc::UnboundedSender<SessionBroadcast>,
}

impl Session {
    fn tick(&mut self) {
        if self.controller.phase() != Phase::RoundActive {
            return;
        }

        let flags = if self.autopilot {
            let input = autopilot::steer(
                self.controller.fighter(Side::Left),
                self.controller.fighter(Side::Right),
                &mut self.rng,
            );
            if let Some(kind) = input.press {
                self.controller.press_attack(kind);
            }
            input.flags
        } else {
            self.held
        };

        let events = self.controller.tick(&flags, &mut self.rng);
        let _ = self
            .out
            .send(SessionBroadcast::Frame(Box::new(self.controller.frame())));
        self.publish(events);
    }

    fn timer_fired(&mut self, fired: TimerFired) {
        let events = match fired {
            TimerFired::SecondElapsed(round_id) => self.controller.second_elapsed(round_id),
            TimerFired::Restart(round_id) => self.controller.advance_round(round_id, &mut self.rng),
        };
        self.publish(events);
    }

    fn command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::Select(archetype) => self.controller.select(archetype),
            SessionCommand::Start => {
                let events = self.controller.start_match(&mut self.rng);
                self.publish(events);
            },
            SessionCommand::Key { key, pressed } => {
                if let Some(kind) = self.held.set_key(&key, pressed) {
                    self.controller.press_attack(kind);
                }
            },
            SessionCommand::Input(flags) => self.held = flags,
            SessionCommand::Attack(kind) => {
                self.controller.press_attack(kind);
            },
            SessionCommand::Abort => {
                self.timers.cancel();
                self.controller.abort();
                self.held = CommandFlags::default();
            },
            SessionCommand::Stop => {},
        }
    }

    /// Broadcast events and keep the deferred timers in step with them.
    fn publish(&mut self, events: Vec<MatchEvent>) {
        for event in events {
            match &event {
                MatchEvent::RoundStarted { round_id, .. } => {
                    self.timers.start_countdown(*round_id);
                },
                MatchEvent::RoundEnded {
                    round_id,
                    restart_in_secs: Some(secs),
                    ..
                } => {
                    self.timers
                        .schedule_restart(*round_id, Duration::from_secs(*secs));
                },
                MatchEvent::RoundEnded { .. } | MatchEvent::MatchOver { .. } => {
                    self.timers.cancel();
                },
                MatchEvent::Hit { .. } => {},
            }
            tracing::debug!(%event, "Match event");
            let _ = self.out.send(SessionBroadcast::Event(event));
        }
    }
}

/// At most one live deferred task per session, bound to a cancellation token.
struct RoundTimers {
    tx: mpsc::UnboundedSender<TimerFired>,
    active: Option<CancellationToken>,
}

impl RoundTimers {
    fn new(tx: mpsc::UnboundedSender<TimerFired>) -> Self {
        Self { tx, active: None }
    }

    fn cancel(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
        }
    }

    fn arm(&mut self) -> CancellationToken {
        self.cancel();
        let token = CancellationToken::new();
        self.active = Some(token.clone());
        token
    }

    /// One `SecondElapsed` per second until cancelled.
    fn start_countdown(&mut self, round_id: u64) {
        let token = self.arm();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + COUNTDOWN_PERIOD;
            let mut ticker = tokio::time::interval_at(start, COUNTDOWN_PERIOD);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if tx.send(TimerFired::SecondElapsed(round_id)).is_err() {
                            break;
                        }
                    }
                }
            }
        });
    }

    /// A single `Restart` after `delay` unless cancelled first.
    fn schedule_restart(&mut self, round_id: u64, delay: Duration) {
        let token = self.arm();
        let tx = self.tx.clone();
        tracing::debug!(round_id, delay_secs = delay.as_secs(), "Restart scheduled");
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {},
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(TimerFired::Restart(round_id));
                }
            }
        });
    }
}

impl Drop for RoundTimers {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn countdown_sends_round_tagged_seconds() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = RoundTimers::new(tx);
        timers.start_countdown(4);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let mut fired = Vec::new();
        while let Ok(f) = rx.try_recv() {
            fired.push(f);
        }
        assert_eq!(fired, vec![TimerFired::SecondElapsed(4); 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_restart_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = RoundTimers::new(tx);
        timers.schedule_restart(2, Duration::from_secs(2));
        tokio::time::sleep(Duration::from_secs(1)).await;
        timers.cancel();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn arming_a_restart_stops_the_countdown() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = RoundTimers::new(tx);
        timers.start_countdown(1);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        timers.schedule_restart(1, Duration::from_secs(2));

        tokio::time::sleep(Duration::from_secs(3)).await;
        let mut fired = Vec::new();
        while let Ok(f) = rx.try_recv() {
            fired.push(f);
        }
        assert_eq!(
            fired,
            vec![TimerFired::SecondElapsed(1), TimerFired::Restart(1)]
        );
    }

    #[tokio::test]
    async fn select_rejects_unknown_fighter() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = SessionHandle { tx };
        assert_eq!(
            handle.select("Grover"),
            Err(HostError::UnknownArchetype("Grover".into()))
        );
        assert!(handle.select("oscar").is_ok());
    }

    #[tokio::test]
    async fn closed_session_rejects_commands() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let handle = SessionHandle { tx };
        assert_eq!(handle.start(), Err(HostError::SessionClosed));
    }

    #[tokio::test]
    async fn spawn_rejects_invalid_config() {
        let config = HostConfig {
            tick_rate_hz: 0,
            ..HostConfig::default()
        };
        assert!(matches!(
            spawn_session(&config),
            Err(HostError::InvalidConfig(_))
        ));
    }
}
