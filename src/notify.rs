/// User-visible notices. The embedding shell decides how to render them
/// (toast, snackbar, notification).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    AutoScanEnableFailed,
    PermissionsNotGranted,
}

pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Sink that drops every notice. Useful for headless contexts (the restart
/// hook has no UI to speak to).
pub struct NullNoticeSink;

impl NoticeSink for NullNoticeSink {
    fn notify(&self, _notice: Notice) {}
}
