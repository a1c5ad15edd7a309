use crate::domain::{ClipboardError, ClipboardWriter};
use arboard::Clipboard;
use tracing::debug;

/// System clipboard via `arboard`.
///
/// The handle is opened on first use and kept open, since on some
/// platforms the copied text only lives as long as the handle does. If
/// opening fails the next copy tries again.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut Clipboard, ClipboardError> {
        if self.handle.is_none() {
            let clipboard =
                Clipboard::new().map_err(|err| ClipboardError::Unavailable(err.to_string()))?;
            debug!("system clipboard opened");
            self.handle = Some(clipboard);
        }
        self.handle
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard handle missing".to_string()))
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.handle()?
            .set_text(text.to_owned())
            .map_err(|err| ClipboardError::Write(err.to_string()))
    }
}
