//! Clipboard access for copying session prompts.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(#[from] arboard::Error),
}

pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns [`ClipboardError`] when no clipboard can be reached.
    fn write_all(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard using arboard, opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new()?);
        }
        self.inner
            .as_mut()
            .ok_or(ClipboardError::Unavailable(arboard::Error::ClipboardNotSupported))
    }
}

impl Clipboard for SystemClipboard {
    fn write_all(&mut self, text: &str) -> Result<(), ClipboardError> {
        let clipboard = self.ensure()?;
        clipboard.set_text(text.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::{Clipboard, ClipboardError};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records writes; optionally fails every write.
    #[derive(Clone, Default)]
    pub struct MockClipboard {
        pub value: Rc<RefCell<Option<String>>>,
        pub fail: bool,
    }

    impl Clipboard for MockClipboard {
        fn write_all(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Unavailable(
                    arboard::Error::ClipboardNotSupported,
                ));
            }
            *self.value.borrow_mut() = Some(text.to_string());
            Ok(())
        }
    }
}
