// Copy-to-clipboard control with timed visual feedback
//
// Activation flips the control into its "copied" state, copies the bound
// payload, and schedules a revert back to idle after a fixed delay. Each
// revert is a tokio task whose JoinHandle the control keeps.
//
// With RevertPolicy::Accumulate every activation adds a timer and none is
// ever cancelled, so a second activation inside the delay can be cut short
// by the first activation's timer. RevertPolicy::Supersede aborts pending
// timers on reactivation so the feedback always lasts the full delay.

use crate::clipboard::Clipboard;
use serde::Deserialize;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Duration of the linear icon transition
pub const FEEDBACK_ANIMATION: Duration = Duration::from_millis(100);

/// Time the control stays in the copied state
pub const REVERT_DELAY: Duration = Duration::from_secs(1);

/// What happens to pending reverts when the control is activated again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevertPolicy {
    /// Schedule another revert, never cancel earlier ones
    #[default]
    Accumulate,
    /// Abort earlier reverts; only the latest activation's timer fires
    Supersede,
}

impl RevertPolicy {
    /// Parse policy string from config
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "supersede" => RevertPolicy::Supersede,
            _ => RevertPolicy::Accumulate,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RevertPolicy::Accumulate => "accumulate",
            RevertPolicy::Supersede => "supersede",
        }
    }
}

/// Timing of the copy feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyFeedback {
    pub revert_delay: Duration,
    pub policy: RevertPolicy,
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self {
            revert_delay: REVERT_DELAY,
            policy: RevertPolicy::default(),
        }
    }
}

/// Visual state of one copy control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClipboardActionState {
    pub copied: bool,
}

/// Icon shown by the control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyIcon {
    /// Idle: offer to copy
    Copy,
    /// Payload was just copied
    Copied,
}

impl CopyIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            CopyIcon::Copy => "⧉",
            CopyIcon::Copied => "✓",
        }
    }
}

/// Icon plus progress through the icon transition (0.0 just swapped, 1.0 settled)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    pub icon: CopyIcon,
    pub progress: f32,
}

impl Indicator {
    /// True while the icon swap is still animating
    pub fn is_animating(&self) -> bool {
        self.progress < 1.0
    }
}

struct Inner {
    state: ClipboardActionState,
    changed_at: Option<Instant>,
    /// Bumped on every activation; a superseding revert only applies to its own
    generation: u64,
    pending: Vec<JoinHandle<()>>,
}

/// A user-activatable control bound to one immutable payload
///
/// Clones are handles to the same control and share its state.
/// [`activate`](Self::activate) spawns a tokio task and must be called from
/// within a runtime.
#[derive(Clone)]
pub struct ClipboardAction {
    content: Arc<str>,
    clipboard: Arc<dyn Clipboard>,
    feedback: CopyFeedback,
    inner: Arc<Mutex<Inner>>,
}

impl ClipboardAction {
    pub fn new(
        content: impl Into<String>,
        clipboard: Arc<dyn Clipboard>,
        feedback: CopyFeedback,
    ) -> Self {
        Self {
            content: Arc::from(content.into()),
            clipboard,
            feedback,
            inner: Arc::new(Mutex::new(Inner {
                state: ClipboardActionState::default(),
                changed_at: None,
                generation: 0,
                pending: Vec::new(),
            })),
        }
    }

    /// The payload copied on activation
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn feedback(&self) -> CopyFeedback {
        self.feedback
    }

    pub fn state(&self) -> ClipboardActionState {
        lock(&self.inner).state
    }

    pub fn is_copied(&self) -> bool {
        self.state().copied
    }

    /// Number of revert timers that have not fired yet
    pub fn pending_reverts(&self) -> usize {
        lock(&self.inner)
            .pending
            .iter()
            .filter(|timer| !timer.is_finished())
            .count()
    }

    /// True when both handles refer to the same control
    pub fn same_control(&self, other: &ClipboardAction) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Current icon and transition progress
    pub fn indicator(&self) -> Indicator {
        let inner = lock(&self.inner);
        let icon = if inner.state.copied {
            CopyIcon::Copied
        } else {
            CopyIcon::Copy
        };
        let progress = inner.changed_at.map_or(1.0, |at| {
            (at.elapsed().as_secs_f32() / FEEDBACK_ANIMATION.as_secs_f32()).min(1.0)
        });
        Indicator { icon, progress }
    }

    /// Show copied feedback, copy the payload, and schedule the revert
    ///
    /// Under [`RevertPolicy::Supersede`] earlier timers are aborted before the
    /// new state is set, and a timer that already woke up checks the
    /// activation generation and leaves a newer activation alone.
    pub fn activate(&self) {
        let policy = self.feedback.policy;
        let delay = self.feedback.revert_delay;
        {
            let mut inner = lock(&self.inner);
            inner.pending.retain(|timer| !timer.is_finished());
            if policy == RevertPolicy::Supersede {
                for superseded in inner.pending.drain(..) {
                    superseded.abort();
                }
            }

            inner.generation = inner.generation.wrapping_add(1);
            let generation = inner.generation;
            set_copied(&mut inner, true);

            let shared = Arc::clone(&self.inner);
            let timer = tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                revert(&shared, generation, policy);
            });
            inner.pending.push(timer);

            tracing::debug!(
                bytes = self.content.len(),
                pending = inner.pending.len(),
                policy = policy.as_str(),
                "Copy control activated"
            );
        }

        self.clipboard.copy_to_clipboard(&self.content);
    }
}

impl fmt::Debug for ClipboardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClipboardAction")
            .field("content", &self.content)
            .field("state", &self.state())
            .field("feedback", &self.feedback)
            .finish()
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Timer body: go back to idle
///
/// Accumulated timers always revert. A superseding timer only reverts the
/// activation that scheduled it.
fn revert(inner: &Mutex<Inner>, generation: u64, policy: RevertPolicy) {
    let mut inner = lock(inner);
    if policy == RevertPolicy::Supersede && inner.generation != generation {
        return;
    }
    set_copied(&mut inner, false);
}

fn set_copied(inner: &mut Inner, copied: bool) {
    if inner.state.copied != copied {
        inner.state.copied = copied;
        inner.changed_at = Some(Instant::now());
    }
}
