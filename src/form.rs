//! Per-form submission lifecycle

/// Lifecycle of one form submission:
/// `Idle → Submitting → (Succeeded | Failed)`, back to `Submitting` on the
/// next attempt. A failure is terminal for its attempt; nothing retries
/// automatically.
///
/// `Succeeded` and `Failed` carry the inline message shown next to the
/// triggering form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded(String),
    Failed(String),
}

impl FormPhase {
    /// Enter `Submitting`, clearing any previous outcome.
    pub fn begin(&mut self) {
        *self = FormPhase::Submitting;
    }

    /// Resolve the attempt successfully.
    pub fn succeed(&mut self, message: impl Into<String>) {
        *self = FormPhase::Succeeded(message.into());
    }

    /// Resolve the attempt with a user-visible failure.
    pub fn fail(&mut self, message: impl Into<String>) {
        *self = FormPhase::Failed(message.into());
    }

    /// The inline message of a resolved attempt, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            FormPhase::Succeeded(msg) | FormPhase::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, FormPhase::Submitting)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FormPhase::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_and_allows_reattempt() {
        let mut phase = FormPhase::default();
        assert_eq!(phase, FormPhase::Idle);

        phase.begin();
        assert!(phase.is_submitting());

        phase.fail("Failed to add todo.");
        assert!(phase.is_failed());
        assert_eq!(phase.message(), Some("Failed to add todo."));

        // A failure is terminal for the attempt, not for the form.
        phase.begin();
        assert!(phase.is_submitting());
        phase.succeed("Todo added successfully!");
        assert_eq!(phase.message(), Some("Todo added successfully!"));
    }
}
