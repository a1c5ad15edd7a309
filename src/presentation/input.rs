use crate::application::{App, AppCommand, AppMode};
use crate::domain::Clock;
use crossterm::event::{KeyCode, KeyModifiers};

const OUTPUT_SCROLL_STEP: usize = 5;

pub struct InputHandler;

impl InputHandler {
    /// Applies a key press to `app`.
    ///
    /// Returns the command the event loop must run when the key asks for
    /// something outside the state (submitting, copying, quitting).
    pub fn handle_key_event<K: Clock>(
        app: &mut App<K>,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> Option<AppCommand> {
        if modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            return Some(AppCommand::Quit);
        }

        match app.mode {
            AppMode::Editing => Self::handle_editing_mode(app, key, modifiers),
            AppMode::Help => {
                Self::handle_help_mode(app, key);
                None
            }
        }
    }

    /// Inserts pasted text when the input pane has focus.
    pub fn handle_paste<K: Clock>(app: &mut App<K>, text: &str) {
        if app.mode == AppMode::Editing {
            app.insert_str(text);
        }
    }

    fn handle_editing_mode<K: Clock>(
        app: &mut App<K>,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> Option<AppCommand> {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('s') => return Some(AppCommand::Submit),
                KeyCode::Char('y') => return Some(AppCommand::CopyOutput),
                KeyCode::Char('u') => app.clear_input(),
                _ => {}
            }
            return None;
        }

        match key {
            KeyCode::F(1) => app.open_help(),
            KeyCode::Esc => app.toasts.dismiss_all(),
            KeyCode::Enter => app.insert_char('\n'),
            KeyCode::Backspace => app.delete_backward(),
            KeyCode::Delete => app.delete_forward(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            KeyCode::Home => app.move_cursor_home(),
            KeyCode::End => app.move_cursor_end(),
            KeyCode::PageUp => app.scroll_output_up(OUTPUT_SCROLL_STEP),
            KeyCode::PageDown => app.scroll_output_down(OUTPUT_SCROLL_STEP),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::ALT) => app.insert_char(c),
            _ => {}
        }
        None
    }

    fn handle_help_mode<K: Clock>(app: &mut App<K>, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::App;
    use crate::domain::Notification;

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            InputHandler::handle_key_event(app, KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn test_typing_updates_input_and_word_count() {
        let mut app = App::default();
        type_text(&mut app, "halo");
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        type_text(&mut app, "Dunia");

        assert_eq!(app.controller.input(), "halo\nDunia");
        assert_eq!(app.controller.word_count(), 2);

        InputHandler::handle_key_event(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.controller.input(), "halo\nDuni");
    }

    #[test]
    fn test_shifted_characters_are_inserted() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(app.controller.input(), "A");
    }

    #[test]
    fn test_control_bindings_map_to_commands() {
        let mut app = App::default();
        assert_eq!(
            InputHandler::handle_key_event(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL),
            Some(AppCommand::Submit)
        );
        assert_eq!(
            InputHandler::handle_key_event(&mut app, KeyCode::Char('y'), KeyModifiers::CONTROL),
            Some(AppCommand::CopyOutput)
        );
        assert_eq!(
            InputHandler::handle_key_event(&mut app, KeyCode::Char('q'), KeyModifiers::CONTROL),
            Some(AppCommand::Quit)
        );
        assert_eq!(
            InputHandler::handle_key_event(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(AppCommand::Quit)
        );
        assert!(app.controller.input().is_empty());
    }

    #[test]
    fn test_ctrl_u_clears_input() {
        let mut app = App::default();
        type_text(&mut app, "hapus aku");
        InputHandler::handle_key_event(&mut app, KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert!(app.controller.input().is_empty());
        assert_eq!(app.cursor_position, 0);
    }

    #[test]
    fn test_paste_inserts_at_cursor() {
        let mut app = App::default();
        type_text(&mut app, "ab");
        InputHandler::handle_key_event(&mut app, KeyCode::Left, KeyModifiers::NONE);
        InputHandler::handle_paste(&mut app, "XY");
        assert_eq!(app.controller.input(), "aXYb");
    }

    #[test]
    fn test_escape_dismisses_toasts() {
        let mut app = App::default();
        app.toasts.push(Notification::error("Teks kosong", ""));
        assert_eq!(
            InputHandler::handle_key_event(&mut app, KeyCode::Esc, KeyModifiers::NONE),
            None
        );
        assert!(app.toasts.is_empty());
    }

    #[test]
    fn test_page_keys_scroll_output() {
        let mut app = App::default();
        app.set_output_scroll_limit(8);

        InputHandler::handle_key_event(&mut app, KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(app.output_scroll, 5);
        InputHandler::handle_key_event(&mut app, KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(app.output_scroll, 8);
        InputHandler::handle_key_event(&mut app, KeyCode::PageUp, KeyModifiers::NONE);
        assert_eq!(app.output_scroll, 3);
        assert!(app.controller.input().is_empty());
    }

    #[test]
    fn test_help_mode_navigation() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::F(1), KeyModifiers::NONE);
        assert_eq!(app.mode, AppMode::Help);

        InputHandler::handle_key_event(&mut app, KeyCode::PageDown, KeyModifiers::NONE);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('k'), KeyModifiers::NONE);
        assert_eq!(app.help_scroll, 4);

        // typing does not reach the input while help is open
        InputHandler::handle_paste(&mut app, "teks");
        assert!(app.controller.input().is_empty());

        InputHandler::handle_key_event(&mut app, KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.mode, AppMode::Editing);
    }
}
