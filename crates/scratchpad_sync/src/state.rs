//! Auto-save state machine.
//!
//! [`SessionMachine`] owns the session buffer and decides *what* should
//! happen on every input. It performs no I/O and keeps no clock: each input
//! returns the [`Effect`]s the driver must carry out (arm or cancel the
//! save timer, send a replace request, arm the status reset).

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// The current state of an editor session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Initial fetch has not completed yet.
    Loading,
    /// Buffer matches the last saved content.
    Idle,
    /// Buffer has diverged; a save timer is normally armed.
    DirtyPending,
    /// At least one save request is in flight.
    Saving,
    /// A save just succeeded and the confirmation is visible.
    SavedTransient,
    /// The last save failed; the buffer is still dirty.
    SaveFailed,
}

impl SyncState {
    /// Returns true while a confirmation or failure message is on screen.
    pub fn shows_outcome(&self) -> bool {
        matches!(self, SyncState::SavedTransient | SyncState::SaveFailed)
    }
}

/// The status line shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    /// Nothing has happened yet.
    Ready,
    /// The initial fetch failed; the editor started empty.
    LoadFailed,
    /// An edit is waiting for the debounce timer.
    WillAutoSave,
    /// A save request is in flight.
    Saving,
    /// The last save succeeded.
    Saved,
    /// The last save failed.
    SaveFailed,
    /// Empty status line.
    Neutral,
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StatusMessage::Ready => "Ready...",
            StatusMessage::LoadFailed => "Error loading content",
            StatusMessage::WillAutoSave => "Will auto-save soon...",
            StatusMessage::Saving => "Saving...",
            StatusMessage::Saved => "Saved \u{2713}",
            StatusMessage::SaveFailed => "Save failed!",
            StatusMessage::Neutral => "",
        };
        f.write_str(text)
    }
}

/// Local copy of the document held by one editor session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionBuffer {
    local_content: String,
    last_saved_content: String,
}

impl SessionBuffer {
    /// Returns the current editor text.
    pub fn local_content(&self) -> &str {
        &self.local_content
    }

    /// Returns the last text known to match the server.
    pub fn last_saved_content(&self) -> &str {
        &self.last_saved_content
    }

    /// Returns true if the editor text differs from the last saved text.
    pub fn is_dirty(&self) -> bool {
        self.local_content != self.last_saved_content
    }
}

/// Work the driver must perform after an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace any pending save timer with one firing after the delay.
    ArmSaveTimer(Duration),
    /// Drop the pending save timer.
    CancelSaveTimer,
    /// Issue `replace` with exactly this content.
    SendReplace(String),
    /// Replace any pending status reset with one firing after the delay.
    ArmStatusReset(Duration),
}

/// What asked for a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTrigger {
    /// The debounce timer fired.
    Timer,
    /// The user asked explicitly (button, Ctrl+S).
    Manual,
}

/// Counters kept over the life of a session.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Number of edits applied to the buffer.
    pub edits: u64,
    /// Number of replace requests issued.
    pub saves_issued: u64,
    /// Number of replace requests that succeeded.
    pub saves_succeeded: u64,
    /// Number of replace requests that failed.
    pub saves_failed: u64,
    /// Whether the initial fetch failed.
    pub load_failed: bool,
    /// Last error message.
    pub last_error: Option<String>,
}

/// Observable view of a session, published after every input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSnapshot {
    /// Current state.
    pub state: SyncState,
    /// Current status line.
    pub status: StatusMessage,
    /// Current editor text.
    pub local_content: String,
    /// Last text known to match the server.
    pub last_saved_content: String,
    /// Whether a debounce timer is pending.
    pub save_timer_armed: bool,
    /// Number of replace requests still outstanding.
    pub saves_in_flight: usize,
}

/// The debounced auto-save state machine for one editor session.
///
/// # Invariants
///
/// - At most one save timer is armed; every edit cancels the previous one
/// - A save is only issued when the buffer differs from the last saved text
/// - A successful save records the text that was *sent*, even if the
///   editor has moved on since
/// - In-flight requests are never cancelled and carry no sequence number
/// - Failed saves are not retried; the next edit or manual save tries again
/// - A success that leaves the buffer dirty re-arms the save timer
#[derive(Debug)]
pub struct SessionMachine {
    buffer: SessionBuffer,
    state: SyncState,
    status: StatusMessage,
    save_timer_armed: bool,
    saves_in_flight: usize,
    debounce_delay: Duration,
    status_display_delay: Duration,
    stats: SyncStats,
}

impl SessionMachine {
    /// Creates a machine waiting for its initial fetch.
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            buffer: SessionBuffer::default(),
            state: SyncState::Loading,
            status: StatusMessage::Ready,
            save_timer_armed: false,
            saves_in_flight: 0,
            debounce_delay: config.debounce_delay,
            status_display_delay: config.status_display_delay,
            stats: SyncStats::default(),
        }
    }

    /// Gets the current state.
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Gets the current status line.
    pub fn status(&self) -> StatusMessage {
        self.status
    }

    /// Gets the session buffer.
    pub fn buffer(&self) -> &SessionBuffer {
        &self.buffer
    }

    /// Gets the session counters.
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Returns true if a debounce timer is pending.
    pub fn save_timer_armed(&self) -> bool {
        self.save_timer_armed
    }

    /// Returns the number of outstanding replace requests.
    pub fn saves_in_flight(&self) -> usize {
        self.saves_in_flight
    }

    /// Captures the observable state.
    pub fn snapshot(&self) -> SyncSnapshot {
        SyncSnapshot {
            state: self.state,
            status: self.status,
            local_content: self.buffer.local_content.clone(),
            last_saved_content: self.buffer.last_saved_content.clone(),
            save_timer_armed: self.save_timer_armed,
            saves_in_flight: self.saves_in_flight,
        }
    }

    /// Applies the result of the initial fetch.
    ///
    /// On success the fetched text replaces the buffer and becomes the last
    /// saved marker. On failure the buffer stays as it is (empty unless the
    /// user already typed) and the error is only shown on the status line.
    pub fn loaded(&mut self, result: SyncResult<String>) -> Vec<Effect> {
        let mut effects = Vec::new();

        match result {
            Ok(content) => {
                debug!(bytes = content.len(), "initial content loaded");
                self.disarm_save_timer(&mut effects);
                self.buffer.local_content.clone_from(&content);
                self.buffer.last_saved_content = content;
                self.state = self.settled_state();
            }
            Err(err) => {
                warn!(error = %err, "initial load failed, starting empty");
                self.stats.load_failed = true;
                self.stats.last_error = Some(err.to_string());
                self.state = if self.save_timer_armed {
                    SyncState::DirtyPending
                } else {
                    self.settled_state()
                };
                self.status = StatusMessage::LoadFailed;
            }
        }

        effects
    }

    /// Applies an edit: the editor now holds `content`.
    pub fn edit(&mut self, content: impl Into<String>) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.stats.edits += 1;
        self.buffer.local_content = content.into();
        self.disarm_save_timer(&mut effects);

        if self.buffer.is_dirty() {
            effects.push(Effect::ArmSaveTimer(self.debounce_delay));
            self.save_timer_armed = true;
            self.state = SyncState::DirtyPending;
            self.status = StatusMessage::WillAutoSave;
        } else {
            // Reverted to the saved text: nothing to schedule.
            self.state = self.settled_state();
            self.status = if self.saves_in_flight > 0 {
                StatusMessage::Saving
            } else {
                StatusMessage::Neutral
            };
        }

        effects
    }

    /// The debounce timer fired.
    pub fn save_timer_fired(&mut self) -> Vec<Effect> {
        self.save_timer_armed = false;
        self.trigger_save(SaveTrigger::Timer)
    }

    /// The user asked for an immediate save.
    pub fn save_now(&mut self) -> Vec<Effect> {
        self.trigger_save(SaveTrigger::Manual)
    }

    /// Saves the buffer if it differs from the last saved text.
    pub fn trigger_save(&mut self, trigger: SaveTrigger) -> Vec<Effect> {
        let mut effects = Vec::new();

        if !self.buffer.is_dirty() {
            debug!(?trigger, "save skipped, buffer unchanged");
            // The timer that justified DirtyPending is gone.
            if self.state == SyncState::DirtyPending && !self.save_timer_armed {
                self.state = self.settled_state();
            }
            return effects;
        }

        self.disarm_save_timer(&mut effects);
        self.saves_in_flight += 1;
        self.stats.saves_issued += 1;
        self.state = SyncState::Saving;
        self.status = StatusMessage::Saving;

        let content = self.buffer.local_content.clone();
        debug!(?trigger, bytes = content.len(), "issuing save");
        effects.push(Effect::SendReplace(content));
        effects
    }

    /// A replace request finished.
    pub fn save_completed(&mut self, sent: String, result: SyncResult<()>) -> Vec<Effect> {
        match result {
            Ok(()) => self.save_succeeded(sent),
            Err(err) => self.save_failed(err),
        }
    }

    /// A replace request carrying `sent` succeeded.
    pub fn save_succeeded(&mut self, sent: String) -> Vec<Effect> {
        self.saves_in_flight = self.saves_in_flight.saturating_sub(1);
        self.stats.saves_succeeded += 1;
        debug!(bytes = sent.len(), "save succeeded");

        self.buffer.last_saved_content = sent;
        self.state = SyncState::SavedTransient;
        self.status = StatusMessage::Saved;

        let mut effects = vec![Effect::ArmStatusReset(self.status_display_delay)];
        // The editor moved away from what was sent and nothing will save it.
        if self.buffer.is_dirty() && !self.save_timer_armed {
            effects.push(Effect::ArmSaveTimer(self.debounce_delay));
            self.save_timer_armed = true;
        }
        effects
    }

    /// A replace request failed. Nothing is retried.
    pub fn save_failed(&mut self, err: SyncError) -> Vec<Effect> {
        self.saves_in_flight = self.saves_in_flight.saturating_sub(1);
        self.stats.saves_failed += 1;
        warn!(error = %err, "save failed");

        self.stats.last_error = Some(err.to_string());
        self.state = SyncState::SaveFailed;
        self.status = StatusMessage::SaveFailed;
        Vec::new()
    }

    /// The confirmation display delay elapsed.
    ///
    /// Only clears a confirmation that is still showing; a newer status
    /// (an edit, another save) is left alone.
    pub fn status_reset_fired(&mut self) -> Vec<Effect> {
        if self.state == SyncState::SavedTransient {
            self.state = self.settled_state();
            self.status = match self.state {
                SyncState::Saving => StatusMessage::Saving,
                SyncState::DirtyPending if self.save_timer_armed => StatusMessage::WillAutoSave,
                _ => StatusMessage::Neutral,
            };
        }
        Vec::new()
    }

    fn disarm_save_timer(&mut self, effects: &mut Vec<Effect>) {
        if self.save_timer_armed {
            effects.push(Effect::CancelSaveTimer);
            self.save_timer_armed = false;
        }
    }

    /// The state the session rests in once nothing is being displayed.
    fn settled_state(&self) -> SyncState {
        if self.saves_in_flight > 0 {
            SyncState::Saving
        } else if self.buffer.is_dirty() {
            SyncState::DirtyPending
        } else {
            SyncState::Idle
        }
    }
}
