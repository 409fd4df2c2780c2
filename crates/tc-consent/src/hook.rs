//! Consent resolution hook
//!
//! Extension point for third-party consent-mode signalling (analytics
//! `consent update`, pixel `grant`/`revoke`, ...). The store calls it after
//! every explicit decision and when an existing decision is re-applied on
//! load.

/// Receives "tracking allowed" whenever consent is established or re-applied
#[cfg_attr(test, mockall::automock)]
pub trait ConsentHook: Send + Sync {
    /// Called with `true` for accepted, `false` for rejected
    fn on_consent_resolved(&self, allowed: bool);
}

/// Default hook: records the signal in the trace log and nothing else
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingConsentHook;

impl ConsentHook for LoggingConsentHook {
    fn on_consent_resolved(&self, allowed: bool) {
        if allowed {
            tracing::info!(target: "tc_consent", "tracking scripts enabled");
        } else {
            tracing::info!(target: "tc_consent", "tracking scripts disabled");
        }
    }
}

/// Adapts a closure into a [`ConsentHook`]
pub struct FnHook<F>(pub F);

impl<F> ConsentHook for FnHook<F>
where
    F: Fn(bool) + Send + Sync,
{
    #[inline]
    fn on_consent_resolved(&self, allowed: bool) {
        (self.0)(allowed);
    }
}

impl<F> std::fmt::Debug for FnHook<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnHook")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn fn_hook_forwards_signal() {
        let enabled = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&enabled);
        let hook = FnHook(move |allowed: bool| {
            if allowed {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        hook.on_consent_resolved(true);
        hook.on_consent_resolved(false);
        hook.on_consent_resolved(true);
        assert_eq!(enabled.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn logging_hook_accepts_both_signals() {
        LoggingConsentHook.on_consent_resolved(true);
        LoggingConsentHook.on_consent_resolved(false);
    }
}
