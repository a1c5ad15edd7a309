//! Submission state machine.
//!
//! [`SubmissionController`] owns the input and output text plus the
//! processing and copy flags. A submission is split at its only suspension
//! point: [`SubmissionController::submit`] validates and hands back a
//! [`PendingRewrite`], the pending job runs against the service (normally on
//! a worker thread), and [`SubmissionController::complete`] applies the
//! result. The processing flag is held by a [`ProcessingLease`] that travels
//! with the job and clears the flag when dropped, so every exit path resets
//! it exactly once.

use crate::domain::{
    ClipboardError, ClipboardWriter, Clock, Notification, NotificationSink, QuotaStatus,
    RewriteService, ServiceError, SubmitError, SubmitResult, SystemClock,
    COPY_CONFIRMATION_WINDOW, WORD_LIMIT, count_words, is_blank,
};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Shared "request in flight" flag.
///
/// Only one [`ProcessingLease`] can exist per flag at a time.
#[derive(Debug, Clone, Default)]
pub struct ProcessingFlag(Arc<AtomicBool>);

impl ProcessingFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Sets the flag and returns the lease, or `None` if it is already set.
    pub fn try_acquire(&self) -> Option<ProcessingLease> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingLease {
                flag: Arc::clone(&self.0),
            })
    }

    fn owns(&self, lease: &ProcessingLease) -> bool {
        Arc::ptr_eq(&self.0, &lease.flag)
    }
}

/// Proof that a submission is in flight. Clears the flag on drop.
#[derive(Debug)]
pub struct ProcessingLease {
    flag: Arc<AtomicBool>,
}

impl Drop for ProcessingLease {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// A validated submission waiting for the service.
#[derive(Debug)]
pub struct PendingRewrite {
    text: String,
    lease: ProcessingLease,
}

impl PendingRewrite {
    /// The exact text that will be sent.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Calls the service. Blocks until it answers.
    ///
    /// A panicking service resolves the job as [`ServiceError::worker_unavailable`]
    /// so the caller still gets a completion to apply.
    pub fn run<S: RewriteService + ?Sized>(self, service: &S) -> CompletedRewrite {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| service.rewrite(&self.text)))
            .unwrap_or_else(|_| {
                warn!("rewrite service panicked");
                Err(ServiceError::worker_unavailable())
            });
        CompletedRewrite {
            outcome,
            lease: self.lease,
        }
    }

    /// Resolves the job without calling the service.
    pub fn abandon(self, error: ServiceError) -> CompletedRewrite {
        CompletedRewrite {
            outcome: Err(error),
            lease: self.lease,
        }
    }
}

/// The service's answer to a [`PendingRewrite`], still holding its lease.
#[derive(Debug)]
pub struct CompletedRewrite {
    outcome: Result<String, ServiceError>,
    lease: ProcessingLease,
}

impl CompletedRewrite {
    pub fn outcome(&self) -> &Result<String, ServiceError> {
        &self.outcome
    }
}

/// Two-state automaton behind the "copied" indicator.
///
/// A new confirmation replaces the previous deadline, so an older window can
/// never end a newer one early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyConfirmation {
    #[default]
    Idle,
    Confirmed { until: Instant },
}

impl CopyConfirmation {
    pub fn confirm(&mut self, at: Instant) {
        *self = CopyConfirmation::Confirmed {
            until: at + COPY_CONFIRMATION_WINDOW,
        };
    }

    pub fn is_confirmed_at(&self, now: Instant) -> bool {
        match self {
            CopyConfirmation::Idle => false,
            CopyConfirmation::Confirmed { until } => now < *until,
        }
    }

    /// Moves back to `Idle` once the window has elapsed. Returns whether it did.
    pub fn expire(&mut self, now: Instant) -> bool {
        match *self {
            CopyConfirmation::Confirmed { until } if now >= until => {
                *self = CopyConfirmation::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self {
            CopyConfirmation::Idle => None,
            CopyConfirmation::Confirmed { until } => Some(*until),
        }
    }
}

/// Owner of the submission workflow state.
///
/// # Examples
///
/// ```
/// use kating::application::SubmissionController;
/// use kating::domain::Notification;
///
/// let mut controller = SubmissionController::new();
/// let mut notifications: Vec<Notification> = Vec::new();
///
/// controller.update_input("   ");
/// assert!(controller.submit(&mut notifications).is_err());
/// assert_eq!(notifications[0].title, "Teks kosong");
/// assert!(!controller.is_processing());
/// ```
#[derive(Debug)]
pub struct SubmissionController<K: Clock = SystemClock> {
    input: String,
    output: String,
    processing: ProcessingFlag,
    copy: CopyConfirmation,
    word_limit: usize,
    clock: K,
}

impl Default for SubmissionController<SystemClock> {
    fn default() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl SubmissionController<SystemClock> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K: Clock> SubmissionController<K> {
    pub fn with_clock(clock: K) -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            processing: ProcessingFlag::default(),
            copy: CopyConfirmation::Idle,
            word_limit: WORD_LIMIT,
            clock,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// Recomputed from the current input on every call.
    pub fn word_count(&self) -> usize {
        count_words(&self.input)
    }

    pub fn word_limit(&self) -> usize {
        self.word_limit
    }

    pub fn quota_status(&self) -> QuotaStatus {
        QuotaStatus::classify(self.word_count(), self.word_limit)
    }

    pub fn is_processing(&self) -> bool {
        self.processing.is_set()
    }

    pub fn is_copied(&self) -> bool {
        self.copy.is_confirmed_at(self.clock.now())
    }

    pub fn copy_confirmation(&self) -> CopyConfirmation {
        self.copy
    }

    /// Replaces the input text. No validation happens here.
    pub fn update_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Validates the input and starts a submission.
    ///
    /// On success the processing flag is set, the previous output is cleared
    /// and the returned job must be run and passed to [`Self::complete`].
    ///
    /// # Errors
    ///
    /// * [`SubmitError::InFlight`] if another submission holds the flag; no
    ///   notification is emitted and nothing changes.
    /// * [`SubmitError::EmptyInput`] and [`SubmitError::LimitExceeded`] after
    ///   emitting a destructive notification; no request is made.
    pub fn submit<N>(&mut self, sink: &mut N) -> SubmitResult<PendingRewrite>
    where
        N: NotificationSink + ?Sized,
    {
        if self.processing.is_set() {
            debug!("submit rejected, a rewrite is already in flight");
            return Err(SubmitError::InFlight);
        }

        if is_blank(&self.input) {
            sink.notify(Notification::error(
                "Teks kosong",
                "Silakan masukkan teks yang ingin diubah.",
            ));
            return Err(SubmitError::EmptyInput);
        }

        let count = self.word_count();
        if count > self.word_limit {
            sink.notify(Notification::error(
                "Teks terlalu panjang",
                format!("Versi gratis maksimal {} kata.", self.word_limit),
            ));
            return Err(SubmitError::LimitExceeded {
                count,
                limit: self.word_limit,
            });
        }

        let Some(lease) = self.processing.try_acquire() else {
            return Err(SubmitError::InFlight);
        };
        self.output.clear();
        info!(words = count, "submitting text for rewriting");

        Ok(PendingRewrite {
            text: self.input.clone(),
            lease,
        })
    }

    /// Applies a finished rewrite and releases the processing flag.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Service`] after emitting a destructive
    /// notification carrying the service's message. The output stays empty.
    pub fn complete<N>(&mut self, done: CompletedRewrite, sink: &mut N) -> SubmitResult<()>
    where
        N: NotificationSink + ?Sized,
    {
        let CompletedRewrite { outcome, lease } = done;
        debug_assert!(self.processing.owns(&lease));

        let result = match outcome {
            Ok(text) => {
                info!(chars = text.chars().count(), "rewrite completed");
                self.output = text;
                sink.notify(Notification::info(
                    "Berhasil",
                    "Teks berhasil dirapikan ke bahasa akademik.",
                ));
                Ok(())
            }
            Err(err) => {
                warn!(kind = ?err.kind, message = %err.message, "rewrite failed");
                sink.notify(Notification::error("Terjadi kesalahan", err.message.clone()));
                Err(SubmitError::Service(err))
            }
        };

        drop(lease);
        result
    }

    /// Runs a whole submission inline: validate, call `service`, apply.
    pub fn submit_with<S, N>(&mut self, service: &S, sink: &mut N) -> SubmitResult<()>
    where
        S: RewriteService + ?Sized,
        N: NotificationSink + ?Sized,
    {
        let job = self.submit(sink)?;
        let done = job.run(service);
        self.complete(done, sink)
    }

    /// Copies the output to the clipboard and starts the confirmation window.
    ///
    /// Does nothing when there is no output. The window is measured from the
    /// moment the clipboard write returns.
    ///
    /// # Errors
    ///
    /// Returns the clipboard error after emitting a destructive notification.
    /// The copy flag is cleared in that case.
    pub fn copy_output<C, N>(&mut self, clipboard: &mut C, sink: &mut N) -> Result<(), ClipboardError>
    where
        C: ClipboardWriter + ?Sized,
        N: NotificationSink + ?Sized,
    {
        if self.output.is_empty() {
            return Ok(());
        }

        match clipboard.write_text(&self.output) {
            Ok(()) => {
                self.copy.confirm(self.clock.now());
                debug!("output copied to clipboard");
                sink.notify(Notification::info(
                    "Tersalin",
                    "Teks berhasil disalin ke clipboard.",
                ));
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "clipboard write failed");
                self.copy = CopyConfirmation::Idle;
                sink.notify(Notification::error(
                    "Gagal menyalin",
                    "Tidak dapat menyalin teks.",
                ));
                Err(err)
            }
        }
    }

    /// Applies timed transitions. Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        let expired = self.copy.expire(self.clock.now());
        if expired {
            debug!("copy confirmation expired");
        }
        expired
    }
}
