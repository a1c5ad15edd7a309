//! Application state for the terminal client.
//!
//! [`App`] wraps the [`SubmissionController`] with everything the terminal
//! front end needs on top of it: cursor position, help popup, toasts and
//! spinner animation. All text changes go through the controller.

use super::controller::{CompletedRewrite, PendingRewrite, SubmissionController};
use super::notifications::ToastQueue;
use crate::domain::{ClipboardWriter, Clock, SubmitError, SystemClock};
use tracing::debug;

/// Represents the current mode of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Typing into the input pane
    Editing,
    /// Help popup is displayed
    Help,
}

/// Work the event loop has to carry out on behalf of a key press.
///
/// These need resources the state does not own: the rewrite worker and the
/// system clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Submit,
    CopyOutput,
    Quit,
}

/// Main application state.
///
/// # Examples
///
/// ```
/// use kating::application::App;
///
/// let mut app = App::default();
/// app.insert_str("halo dunia");
/// assert_eq!(app.controller.word_count(), 2);
/// assert_eq!(app.cursor_position, 10);
/// ```
#[derive(Debug)]
pub struct App<K: Clock = SystemClock> {
    /// Submission workflow state
    pub controller: SubmissionController<K>,
    /// Notifications currently on screen
    pub toasts: ToastQueue<K>,
    /// Current application mode
    pub mode: AppMode,
    /// Cursor position within the input, in characters
    pub cursor_position: usize,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Frame counter for the processing spinner
    pub spinner_frame: usize,
    /// First visible row of the wrapped output
    pub output_scroll: usize,
    /// Largest useful `output_scroll` for the current output and pane size
    pub output_scroll_limit: usize,
}

impl Default for App<SystemClock> {
    fn default() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<K: Clock + Clone> App<K> {
    /// Builds an app whose copy window and toasts run on `clock`.
    pub fn with_clock(clock: K) -> Self {
        Self {
            controller: SubmissionController::with_clock(clock.clone()),
            toasts: ToastQueue::with_clock(clock),
            mode: AppMode::Editing,
            cursor_position: 0,
            help_scroll: 0,
            spinner_frame: 0,
            output_scroll: 0,
            output_scroll_limit: 0,
        }
    }
}

impl<K: Clock> App<K> {
    /// Input is read-only while a rewrite is in flight.
    pub fn input_locked(&self) -> bool {
        self.controller.is_processing()
    }

    pub fn insert_char(&mut self, c: char) {
        let mut buf = [0; 4];
        self.insert_str(c.encode_utf8(&mut buf));
    }

    /// Inserts text at the cursor. Pasted `\r\n` line endings become `\n`.
    pub fn insert_str(&mut self, text: &str) {
        if self.input_locked() || text.is_empty() {
            return;
        }
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let mut input = self.controller.input().to_string();
        let at = byte_index(&input, self.cursor_position);
        input.insert_str(at, &text);
        self.cursor_position += text.chars().count();
        self.controller.update_input(input);
    }

    pub fn delete_backward(&mut self) {
        if self.input_locked() || self.cursor_position == 0 {
            return;
        }
        let mut input = self.controller.input().to_string();
        let at = byte_index(&input, self.cursor_position - 1);
        input.remove(at);
        self.cursor_position -= 1;
        self.controller.update_input(input);
    }

    pub fn delete_forward(&mut self) {
        if self.input_locked() || self.cursor_position >= self.input_len() {
            return;
        }
        let mut input = self.controller.input().to_string();
        let at = byte_index(&input, self.cursor_position);
        input.remove(at);
        self.controller.update_input(input);
    }

    pub fn clear_input(&mut self) {
        if self.input_locked() {
            return;
        }
        self.controller.update_input(String::new());
        self.cursor_position = 0;
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input_len() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.input_len();
    }

    fn input_len(&self) -> usize {
        self.controller.input().chars().count()
    }

    /// Validates and starts a submission, reporting problems as toasts.
    ///
    /// Returns the job to hand to the worker, if validation passed.
    pub fn start_submission(&mut self) -> Option<PendingRewrite> {
        match self.controller.submit(&mut self.toasts) {
            Ok(job) => {
                self.spinner_frame = 0;
                self.reset_output_scroll();
                Some(job)
            }
            Err(err) => {
                debug!(error = %err, "submission not started");
                None
            }
        }
    }

    pub fn finish_submission(&mut self, done: CompletedRewrite) {
        if let Err(SubmitError::Service(err)) = self.controller.complete(done, &mut self.toasts) {
            debug!(error = %err, "submission finished with an error");
        }
        self.reset_output_scroll();
    }

    pub fn copy_output<C: ClipboardWriter + ?Sized>(&mut self, clipboard: &mut C) {
        if let Err(err) = self.controller.copy_output(clipboard, &mut self.toasts) {
            debug!(error = %err, "copy finished with an error");
        }
    }

    /// Advances timed state: copy confirmation, toasts and the spinner.
    pub fn tick(&mut self) {
        self.controller.tick();
        self.toasts.expire();
        if self.controller.is_processing() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    /// Records how far the output can scroll at the current pane size.
    pub fn set_output_scroll_limit(&mut self, limit: usize) {
        self.output_scroll_limit = limit;
        self.output_scroll = self.output_scroll.min(limit);
    }

    pub fn scroll_output_up(&mut self, rows: usize) {
        self.output_scroll = self.output_scroll.saturating_sub(rows);
    }

    pub fn scroll_output_down(&mut self, rows: usize) {
        self.output_scroll = (self.output_scroll + rows).min(self.output_scroll_limit);
    }

    fn reset_output_scroll(&mut self) {
        self.output_scroll = 0;
        self.output_scroll_limit = 0;
    }

    pub fn open_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = AppMode::Editing;
    }
}

/// Byte offset of the `char_index`-th character, clamped to the end.
fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
