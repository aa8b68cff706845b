//! Sync outcomes and batch summaries
//!
//! These values are produced per sync attempt, used to build user-facing
//! reports, and then discarded. Nothing here is persisted.

use serde::Serialize;

use super::errors::SyncError;
use super::newtypes::NoteId;

/// Result of one note's sync attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    /// The note that was synced
    pub note: NoteId,
    /// Failure detail; `None` means the sync succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SyncError>,
}

impl SyncOutcome {
    /// Successful outcome
    pub fn success(note: NoteId) -> Self {
        Self { note, error: None }
    }

    /// Failed outcome carrying the reason
    pub fn failure(note: NoteId, error: SyncError) -> Self {
        Self {
            note,
            error: Some(error),
        }
    }

    /// Returns true if the sync succeeded
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl Serialize for SyncError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("SyncError", 2)?;
        s.serialize_field("kind", self.kind())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

/// Aggregate result of a batch sync
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    /// Number of notes that synced successfully
    pub succeeded: u32,
    /// Number of notes that failed
    pub failed: u32,
    /// Per-note outcomes in the order they were attempted
    pub outcomes: Vec<SyncOutcome>,
    /// Wall-clock duration of the batch in milliseconds
    pub duration_ms: u64,
}

impl BatchSummary {
    /// Records one outcome and updates the counters
    pub fn record(&mut self, outcome: SyncOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }

    /// Total number of notes attempted
    pub fn total(&self) -> u32 {
        self.succeeded + self.failed
    }

    /// Outcomes that failed
    pub fn failures(&self) -> impl Iterator<Item = &SyncOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// One-line summary suitable for a notification body
    pub fn message(&self) -> String {
        match (self.succeeded, self.failed) {
            (0, 0) => "No notes have a sync target".to_string(),
            (ok, 0) => format!("Synced {ok} note{}", plural(ok)),
            (ok, failed) => format!(
                "Synced {ok} note{}, {failed} failed",
                plural(ok)
            ),
        }
    }
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
