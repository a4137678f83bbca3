//! Open/closed dialog state owned by the parent view

/// A dialog is either closed or open with the payload it shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState<T> {
    Closed,
    Open(T),
}

impl<T> Default for DialogState<T> {
    fn default() -> Self {
        DialogState::Closed
    }
}

impl<T> DialogState<T> {
    /// Open with `payload`, replacing any dialog already open
    pub fn open(&mut self, payload: T) {
        *self = DialogState::Open(payload);
    }

    /// Close and hand back what was shown, if anything
    pub fn request_close(&mut self) -> Option<T> {
        match std::mem::replace(self, DialogState::Closed) {
            DialogState::Open(payload) => Some(payload),
            DialogState::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, DialogState::Open(_))
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            DialogState::Open(payload) => Some(payload),
            DialogState::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_closed() {
        let dialog: DialogState<String> = DialogState::default();
        assert!(!dialog.is_open());
        assert!(dialog.payload().is_none());
    }

    #[test]
    fn test_open_then_close() {
        let mut dialog = DialogState::Closed;
        dialog.open("Apply to Senior Pentester");
        assert!(dialog.is_open());
        assert_eq!(dialog.payload(), Some(&"Apply to Senior Pentester"));
        assert_eq!(dialog.request_close(), Some("Apply to Senior Pentester"));
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_close_when_closed() {
        let mut dialog: DialogState<u32> = DialogState::Closed;
        assert_eq!(dialog.request_close(), None);
    }

    #[test]
    fn test_open_replaces_payload() {
        let mut dialog = DialogState::Closed;
        dialog.open(1);
        dialog.open(2);
        assert_eq!(dialog.payload(), Some(&2));
    }
}
