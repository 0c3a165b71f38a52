//! Input-drift state machine
//!
//! Tracks the fingerprint of the last successfully rendered result against
//! the fingerprint of the live wizard inputs, and decides when the
//! displayed result must be discarded and the user sent back to the
//! input-collection steps. Observations made while a dispatch is in flight
//! are deferred and applied when it finishes; the machine never interleaves
//! a transition with an outstanding call.

use riskwiz_common::types::WizardStep;
use tracing::debug;

/// Where invalidation sends the user: the first collection step whose
/// edits can strand a displayed result
const RESUBMIT_STEP: WizardStep = WizardStep::Hazards;

/// Decision returned by an observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriftDecision {
    /// Displayed result (if any) still matches the live inputs
    Unchanged,
    /// Inputs drifted out from under the displayed result; it was
    /// discarded. `return_to` is set when the user sits past the
    /// collection steps and must be navigated back.
    Invalidated { return_to: Option<WizardStep> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    /// Nothing rendered yet, nothing to invalidate
    NoResult,
    /// A result computed under this fingerprint is on display
    Fresh { fingerprint: String },
    /// Inputs changed after the result was produced; result discarded
    Stale,
}

/// Drift tracker held alongside the currently displayed result
#[derive(Debug)]
pub struct DriftTracker {
    state: State,
    in_flight: bool,
    /// Last observation deferred while a dispatch was outstanding
    deferred: Option<(String, WizardStep)>,
}

impl DriftTracker {
    pub fn new() -> Self {
        Self {
            state: State::NoResult,
            in_flight: false,
            deferred: None,
        }
    }

    /// Fingerprint recorded when the displayed result was produced
    pub fn last_computed_key(&self) -> Option<&str> {
        match &self.state {
            State::Fresh { fingerprint } => Some(fingerprint),
            _ => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.state == State::Stale
    }

    /// Mark the start of an orchestration call; observations are deferred
    /// until [`finish_dispatch`](Self::finish_dispatch)
    pub fn begin_dispatch(&mut self) {
        self.in_flight = true;
    }

    /// A call completed successfully and its result is now displayed
    pub fn record_success(&mut self, fingerprint: impl Into<String>) {
        self.state = State::Fresh {
            fingerprint: fingerprint.into(),
        };
    }

    /// Mark the end of an orchestration call and apply the observation
    /// deferred during it, if any
    pub fn finish_dispatch(&mut self) -> DriftDecision {
        self.in_flight = false;
        match self.deferred.take() {
            Some((fingerprint, step)) => self.observe(&fingerprint, step),
            None => DriftDecision::Unchanged,
        }
    }

    /// Compare the live inputs' fingerprint against the displayed result
    ///
    /// Call on every observed change to any wizard input field. Only a
    /// fresh result can go stale; with no result, or with one already
    /// stale, there is nothing to invalidate.
    pub fn observe(&mut self, current_fingerprint: &str, current_step: WizardStep) -> DriftDecision {
        if self.in_flight {
            self.deferred = Some((current_fingerprint.to_string(), current_step));
            return DriftDecision::Unchanged;
        }

        match &self.state {
            State::Fresh { fingerprint } if fingerprint != current_fingerprint => {
                debug!(
                    displayed = %fingerprint,
                    current = %current_fingerprint,
                    "Inputs drifted from displayed result; invalidating"
                );
                self.state = State::Stale;
                let return_to = (current_step > RESUBMIT_STEP).then_some(RESUBMIT_STEP);
                DriftDecision::Invalidated { return_to }
            }
            _ => DriftDecision::Unchanged,
        }
    }

    /// Drop the stale result; the machine returns to its initial state
    pub fn discard(&mut self) {
        self.state = State::NoResult;
    }
}

impl Default for DriftTracker {
    fn default() -> Self {
        Self::new()
    }
}
