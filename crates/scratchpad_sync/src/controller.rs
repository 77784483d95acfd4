//! Async driver for the auto-save state machine.
//!
//! [`SyncController`] runs one editor session as a single task. It feeds
//! editor commands, timer expiries and finished requests into the
//! [`SessionMachine`] and carries out the effects it returns.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::state::{Effect, SessionMachine, SyncSnapshot, SyncStats};
use crate::transport::SyncTransport;
use std::future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time::{sleep, Sleep};
use tracing::{debug, error};

/// Input coming from the editor UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    /// The editor text changed to this value.
    Edit(String),
    /// Save now (button press or keyboard shortcut).
    SaveNow,
    /// The page is going away.
    Shutdown,
}

type SaveOutcome = (String, SyncResult<()>);

/// Drives one editor session.
///
/// Owns at most one pending save timer and one pending status reset.
/// Save requests run as separate tasks so the session keeps accepting
/// edits while they are outstanding; they are never aborted.
pub struct SyncController<T: SyncTransport> {
    machine: SessionMachine,
    transport: Arc<T>,
    save_timer: Option<Pin<Box<Sleep>>>,
    status_timer: Option<Pin<Box<Sleep>>>,
    in_flight: JoinSet<SaveOutcome>,
    snapshot: watch::Sender<SyncSnapshot>,
}

impl<T: SyncTransport> SyncController<T> {
    /// Creates a controller and the receiver its snapshots are published on.
    pub fn new(config: SyncConfig, transport: T) -> (Self, watch::Receiver<SyncSnapshot>) {
        let machine = SessionMachine::new(&config);
        let (snapshot, receiver) = watch::channel(machine.snapshot());

        let controller = Self {
            machine,
            transport: Arc::new(transport),
            save_timer: None,
            status_timer: None,
            in_flight: JoinSet::new(),
            snapshot,
        };
        (controller, receiver)
    }

    /// Spawns the controller on the current runtime.
    ///
    /// The session loads the document first, then processes commands sent
    /// through the returned handle.
    pub fn spawn(config: SyncConfig, transport: T) -> SyncHandle {
        let (controller, snapshot) = Self::new(config, transport);
        let (commands, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(controller.run(receiver));

        SyncHandle {
            commands,
            snapshot,
            task,
        }
    }

    /// Gets the state machine.
    pub fn machine(&self) -> &SessionMachine {
        &self.machine
    }

    /// Fetches the document and initializes the session buffer.
    pub async fn load(&mut self) {
        let result = self.transport.fetch().await;
        let effects = self.machine.loaded(result);
        self.apply(effects);
        self.publish();
    }

    /// Applies an editor command. Returns false on shutdown.
    pub fn handle_command(&mut self, command: EditorCommand) -> bool {
        let effects = match command {
            EditorCommand::Edit(text) => self.machine.edit(text),
            EditorCommand::SaveNow => self.machine.save_now(),
            EditorCommand::Shutdown => return false,
        };
        self.apply(effects);
        true
    }

    /// Runs the session until shutdown and returns its counters.
    ///
    /// On shutdown the pending timers are dropped, but outstanding save
    /// requests are awaited.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<EditorCommand>) -> SyncStats {
        self.load().await;

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let keep_running = command.is_some_and(|command| self.handle_command(command));
                    if !keep_running {
                        break;
                    }
                }
                () = expire(&mut self.save_timer) => {
                    self.save_timer = None;
                    let effects = self.machine.save_timer_fired();
                    self.apply(effects);
                }
                () = expire(&mut self.status_timer) => {
                    self.status_timer = None;
                    let effects = self.machine.status_reset_fired();
                    self.apply(effects);
                }
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    self.complete(joined);
                }
            }
            self.publish();
        }

        debug!(outstanding = self.in_flight.len(), "session closing");
        self.save_timer = None;
        self.status_timer = None;
        while let Some(joined) = self.in_flight.join_next().await {
            self.complete(joined);
            self.publish();
        }

        self.machine.stats().clone()
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ArmSaveTimer(delay) => self.save_timer = Some(Box::pin(sleep(delay))),
                Effect::CancelSaveTimer => self.save_timer = None,
                Effect::ArmStatusReset(delay) => self.status_timer = Some(Box::pin(sleep(delay))),
                Effect::SendReplace(content) => {
                    let transport = Arc::clone(&self.transport);
                    self.in_flight.spawn(async move {
                        let result = transport.replace(&content).await;
                        (content, result)
                    });
                }
            }
        }
    }

    fn complete(&mut self, joined: Result<SaveOutcome, JoinError>) {
        let effects = match joined {
            Ok((sent, result)) => self.machine.save_completed(sent, result),
            Err(err) => {
                error!(error = %err, "save task did not finish");
                self.machine
                    .save_failed(SyncError::transport(format!("save task failed: {err}")))
            }
        };
        self.apply(effects);
    }

    fn publish(&self) {
        self.snapshot.send_replace(self.machine.snapshot());
    }
}

/// Resolves when the timer fires; never resolves when no timer is armed.
async fn expire(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(delay) => delay.as_mut().await,
        None => future::pending().await,
    }
}

/// Handle to a spawned [`SyncController`].
pub struct SyncHandle {
    commands: mpsc::UnboundedSender<EditorCommand>,
    snapshot: watch::Receiver<SyncSnapshot>,
    task: JoinHandle<SyncStats>,
}

impl SyncHandle {
    /// Reports that the editor text is now `text`.
    pub fn edit(&self, text: impl Into<String>) -> SyncResult<()> {
        self.send(EditorCommand::Edit(text.into()))
    }

    /// Requests an immediate save.
    pub fn save_now(&self) -> SyncResult<()> {
        self.send(EditorCommand::SaveNow)
    }

    /// Returns the latest published snapshot.
    pub fn snapshot(&self) -> SyncSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Returns a new receiver for snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<SyncSnapshot> {
        self.snapshot.clone()
    }

    /// Waits until a published snapshot satisfies `predicate`.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&SyncSnapshot) -> bool,
    ) -> SyncResult<SyncSnapshot> {
        let snapshot = self
            .snapshot
            .wait_for(predicate)
            .await
            .map_err(|_| SyncError::Closed)?;
        Ok(snapshot.clone())
    }

    /// Stops the session after outstanding saves finish.
    pub async fn shutdown(self) -> SyncResult<SyncStats> {
        // The controller may already be gone; joining still reports its stats.
        let _ = self.commands.send(EditorCommand::Shutdown);
        self.task
            .await
            .map_err(|e| SyncError::transport(format!("sync task failed: {e}")))
    }

    fn send(&self, command: EditorCommand) -> SyncResult<()> {
        self.commands.send(command).map_err(|_| SyncError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{StatusMessage, SyncState};
    use crate::transport::MockTransport;
    use std::time::Duration;
    use tokio::time::{advance, sleep};

    fn spawn_session(transport: &MockTransport) -> SyncHandle {
        SyncController::spawn(SyncConfig::default(), transport.clone())
    }

    async fn loaded(handle: &mut SyncHandle) -> SyncSnapshot {
        handle
            .wait_for(|s| s.state != SyncState::Loading)
            .await
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn load_initializes_buffer() {
        let transport = MockTransport::with_document("hello");
        let mut handle = spawn_session(&transport);

        let snapshot = loaded(&mut handle).await;
        assert_eq!(snapshot.state, SyncState::Idle);
        assert_eq!(snapshot.local_content, "hello");
        assert_eq!(snapshot.last_saved_content, "hello");
        assert_eq!(transport.fetch_count(), 1);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn load_failure_is_not_fatal() {
        let transport = MockTransport::with_document("unreachable");
        transport.set_fail_fetch(true);
        let mut handle = spawn_session(&transport);

        let snapshot = loaded(&mut handle).await;
        assert_eq!(snapshot.status, StatusMessage::LoadFailed);
        assert_eq!(snapshot.local_content, "");

        handle.edit("fresh start").unwrap();
        handle
            .wait_for(|s| s.state == SyncState::SavedTransient)
            .await
            .unwrap();
        assert_eq!(transport.document(), "fresh start");

        let stats = handle.shutdown().await.unwrap();
        assert!(stats.load_failed);
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_save_after_quiet_period() {
        let transport = MockTransport::with_document("hello");
        let mut handle = spawn_session(&transport);
        loaded(&mut handle).await;

        handle.edit("hello world").unwrap();
        sleep(Duration::from_millis(1400)).await;
        assert!(transport.replace_calls().is_empty());

        let snapshot = handle
            .wait_for(|s| s.state == SyncState::SavedTransient)
            .await
            .unwrap();
        assert_eq!(transport.replace_calls(), vec!["hello world".to_string()]);
        assert_eq!(snapshot.last_saved_content, "hello world");
        assert_eq!(snapshot.status.to_string(), "Saved \u{2713}");

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_edits_coalesces_into_one_save() {
        let transport = MockTransport::new();
        let mut handle = spawn_session(&transport);
        loaded(&mut handle).await;

        for text in ["t", "ty", "typ", "typi", "typin", "typing"] {
            handle.edit(text).unwrap();
            sleep(Duration::from_millis(1000)).await;
        }
        assert!(transport.replace_calls().is_empty());

        sleep(Duration::from_millis(2000)).await;
        assert_eq!(transport.replace_calls(), vec!["typing".to_string()]);

        let stats = handle.shutdown().await.unwrap();
        assert_eq!(stats.edits, 6);
        assert_eq!(stats.saves_issued, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn revert_before_timer_sends_nothing() {
        let transport = MockTransport::with_document("same");
        let mut handle = spawn_session(&transport);
        loaded(&mut handle).await;

        handle.edit("same!").unwrap();
        sleep(Duration::from_millis(500)).await;
        handle.edit("same").unwrap();
        sleep(Duration::from_secs(5)).await;

        assert!(transport.replace_calls().is_empty());
        assert_eq!(handle.snapshot().state, SyncState::Idle);
        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn manual_save_skips_the_debounce() {
        let transport = MockTransport::new();
        let mut handle = spawn_session(&transport);
        loaded(&mut handle).await;

        handle.edit("urgent").unwrap();
        handle.save_now().unwrap();
        handle
            .wait_for(|s| s.state == SyncState::SavedTransient)
            .await
            .unwrap();

        // The cancelled timer must not produce a second request.
        sleep(Duration::from_secs(3)).await;
        assert_eq!(transport.replace_calls(), vec!["urgent".to_string()]);
        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn confirmation_clears_after_display_delay() {
        let transport = MockTransport::new();
        let mut handle = spawn_session(&transport);
        loaded(&mut handle).await;

        handle.edit("note").unwrap();
        handle.save_now().unwrap();
        handle
            .wait_for(|s| s.state == SyncState::SavedTransient)
            .await
            .unwrap();

        advance(Duration::from_millis(1900)).await;
        assert_eq!(handle.snapshot().state, SyncState::SavedTransient);

        let snapshot = handle
            .wait_for(|s| s.state == SyncState::Idle)
            .await
            .unwrap();
        assert_eq!(snapshot.status, StatusMessage::Neutral);
        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn failed_save_waits_for_next_trigger() {
        let transport = MockTransport::with_document("v1");
        transport.set_fail_replace(true);
        let mut handle = spawn_session(&transport);
        loaded(&mut handle).await;

        handle.edit("v2").unwrap();
        let snapshot = handle
            .wait_for(|s| s.state == SyncState::SaveFailed)
            .await
            .unwrap();
        assert_eq!(snapshot.status.to_string(), "Save failed!");
        assert_eq!(snapshot.last_saved_content, "v1");

        // No automatic retry.
        sleep(Duration::from_secs(10)).await;
        assert_eq!(transport.replace_calls().len(), 1);

        transport.set_fail_replace(false);
        handle.save_now().unwrap();
        handle
            .wait_for(|s| s.state == SyncState::SavedTransient)
            .await
            .unwrap();
        assert_eq!(transport.document(), "v2");

        let stats = handle.shutdown().await.unwrap();
        assert_eq!(stats.saves_failed, 1);
        assert_eq!(stats.saves_succeeded, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn edit_while_saving_triggers_follow_up_save() {
        let transport = MockTransport::with_document("a");
        transport.hold_replaces();
        let mut handle = spawn_session(&transport);
        loaded(&mut handle).await;

        handle.edit("ab").unwrap();
        handle.save_now().unwrap();
        handle.wait_for(|s| s.saves_in_flight == 1).await.unwrap();

        // The editor stays responsive while the request is outstanding.
        handle.edit("abc").unwrap();
        let snapshot = handle
            .wait_for(|s| s.local_content == "abc")
            .await
            .unwrap();
        assert_eq!(snapshot.state, SyncState::DirtyPending);

        transport.release_replaces(1);
        let snapshot = handle
            .wait_for(|s| s.saves_in_flight == 0 && s.state == SyncState::SavedTransient)
            .await
            .unwrap();
        assert_eq!(snapshot.last_saved_content, "ab");
        assert!(snapshot.save_timer_armed);

        transport.release_replaces(1);
        handle
            .wait_for(|s| s.last_saved_content == "abc")
            .await
            .unwrap();
        assert_eq!(
            transport.replace_calls(),
            vec!["ab".to_string(), "abc".to_string()]
        );
        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn revert_while_saving_converges_with_server() {
        let transport = MockTransport::with_document("a");
        transport.hold_replaces();
        let mut handle = spawn_session(&transport);
        loaded(&mut handle).await;

        handle.edit("ab").unwrap();
        handle.save_now().unwrap();
        handle.wait_for(|s| s.saves_in_flight == 1).await.unwrap();

        handle.edit("a").unwrap();
        let snapshot = handle.wait_for(|s| s.local_content == "a").await.unwrap();
        assert!(!snapshot.save_timer_armed);

        transport.release_replaces(1);
        let snapshot = handle
            .wait_for(|s| s.saves_in_flight == 0 && s.last_saved_content == "ab")
            .await
            .unwrap();
        assert!(snapshot.save_timer_armed);

        transport.release_replaces(1);
        sleep(Duration::from_secs(60)).await;

        let snapshot = handle.snapshot();
        assert_eq!(transport.document(), "a");
        assert_eq!(snapshot.last_saved_content, "a");
        assert_eq!(snapshot.state, SyncState::Idle);
        assert_eq!(
            transport.replace_calls(),
            vec!["ab".to_string(), "a".to_string()]
        );
        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_waits_for_in_flight_save() {
        let transport = MockTransport::new();
        transport.hold_replaces();
        let mut handle = spawn_session(&transport);
        loaded(&mut handle).await;

        handle.edit("last words").unwrap();
        handle.save_now().unwrap();
        handle.wait_for(|s| s.saves_in_flight == 1).await.unwrap();

        let shutdown = tokio::spawn(handle.shutdown());
        sleep(Duration::from_millis(10)).await;
        assert!(!shutdown.is_finished());

        transport.release_replaces(1);
        let stats = shutdown.await.unwrap().unwrap();
        assert_eq!(stats.saves_succeeded, 1);
        assert_eq!(transport.document(), "last words");
    }

    #[tokio::test(start_paused = true)]
    async fn commands_after_shutdown_are_rejected() {
        let transport = MockTransport::new();
        let mut handle = spawn_session(&transport);
        loaded(&mut handle).await;

        let commands = handle.commands.clone();
        handle.shutdown().await.unwrap();
        assert!(commands.send(EditorCommand::SaveNow).is_err());
    }
}
