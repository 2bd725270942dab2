//! Poll-loop bookkeeping: sequence numbers, the in-flight guard, and the
//! failure taxonomy for one live-stats request.

use thiserror::Error;

/// Failure modes for one poll tick. Every variant is transient by design:
/// the tick is dropped, the previous view model stays current, and the loop
/// continues at the next tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("backend returned HTTP {0}")]
    Status(u16),
    #[error("malformed live-stats body: {0}")]
    Decode(String),
}

/// Monotonic source of request sequence numbers.
///
/// Shared across poll sessions rather than owned by one, so the store's
/// staleness barrier keeps discarding in-flight responses after a job
/// switch. Sequence numbers start at 1; 0 is the store's initial guard.
#[derive(Debug, Default)]
pub struct SequenceCounter {
    issued: u64,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    fn advance(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Highest sequence number issued so far; use as the reset barrier.
    pub fn last_issued(&self) -> u64 {
        self.issued
    }
}

/// Poll state for one active job: which job is being watched and whether a
/// stats request is still outstanding. At most one stats request exists at
/// a time; a tick that would overlap is skipped.
#[derive(Debug)]
pub struct PollSession {
    job_id: String,
    in_flight: Option<u64>,
}

impl PollSession {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            in_flight: None,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Claims a sequence number for this tick, or `None` while the previous
    /// request has not completed yet.
    pub fn begin_tick(&mut self, sequences: &mut SequenceCounter) -> Option<u64> {
        if self.in_flight.is_some() {
            log::debug!("tick skipped, request {:?} in flight", self.in_flight);
            return None;
        }
        let seq = sequences.advance();
        self.in_flight = Some(seq);
        Some(seq)
    }

    /// Marks the request for `seq` complete, success or failure. Completions
    /// for other sequence numbers (an earlier session, usually) are ignored.
    pub fn complete(&mut self, seq: u64) {
        if self.in_flight == Some(seq) {
            self.in_flight = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_claim_increasing_sequence_numbers() {
        let mut sequences = SequenceCounter::new();
        let mut session = PollSession::new("job-a");
        let first = session.begin_tick(&mut sequences).unwrap();
        session.complete(first);
        let second = session.begin_tick(&mut sequences).unwrap();
        assert_eq!((first, second), (1, 2));
    }

    #[test]
    fn overlapping_tick_is_skipped() {
        let mut sequences = SequenceCounter::new();
        let mut session = PollSession::new("job-a");
        let seq = session.begin_tick(&mut sequences).unwrap();
        assert_eq!(session.begin_tick(&mut sequences), None);
        session.complete(seq);
        assert_eq!(session.begin_tick(&mut sequences), Some(2));
    }

    #[test]
    fn sequences_keep_increasing_across_sessions() {
        let mut sequences = SequenceCounter::new();
        let mut first = PollSession::new("job-a");
        let seq = first.begin_tick(&mut sequences).unwrap();
        assert_eq!(seq, 1);
        // job switch while the request is still in flight
        assert_eq!(sequences.last_issued(), 1);
        let mut second = PollSession::new("job-b");
        assert_eq!(second.begin_tick(&mut sequences), Some(2));
    }

    #[test]
    fn foreign_completion_is_ignored() {
        let mut sequences = SequenceCounter::new();
        let mut session = PollSession::new("job-b");
        let seq = session.begin_tick(&mut sequences).unwrap();
        session.complete(seq + 10);
        // still in flight, next tick skipped
        assert_eq!(session.begin_tick(&mut sequences), None);
    }

    #[test]
    fn poll_errors_describe_themselves() {
        assert_eq!(
            PollError::Status(502).to_string(),
            "backend returned HTTP 502"
        );
        assert!(PollError::Transport("timed out".into())
            .to_string()
            .contains("timed out"));
    }
}
