//! Presentation side-effect hooks.
//!
//! The engine never renders anything itself; celebrations and indicator
//! updates go through this injected interface. The default implementation
//! does nothing, so an embedder without a UI wires up [`NoopHooks`].

/// Toast severity, mapped to presentation styling by the embedder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastSeverity {
    Info,
    Success,
    Error,
}

/// Callbacks invoked by the store and gamification engine.
pub trait PresentationHooks: Send + Sync {
    fn on_toast(&self, _message: &str, _severity: ToastSeverity) {}

    fn on_confetti(&self) {}

    /// Pending-revision indicator: `has_pending` is true while due or
    /// overdue revisions exist.
    fn on_notification_dot(&self, _has_pending: bool) {}
}

/// Hook implementation that ignores every callback.
pub struct NoopHooks;

impl PresentationHooks for NoopHooks {}
