//! Protocol parameters.
//!
//! The numeric constants that govern every time-window and threshold check.
//! They are carried as one immutable value handed into each handler
//! invocation rather than read from process-wide globals, so tests and
//! alternative deployments can shrink the windows without touching handler
//! code.

/// Timing windows and the vote-pass threshold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtocolParams {
    /// Length of one claim period, in seconds.
    pub period: i64,
    /// A voting window spans the last `vote_window` seconds of an eligible
    /// period.
    pub vote_window: i64,
    /// Seconds after `start_funding` during which Fund transactions are
    /// accepted.
    pub fund_window: i64,
    /// Vote-pass threshold as a ratio: the refund tally passes when
    /// `tally * vote_pass_den > vote_pass_num`. Kept rational so the check
    /// stays in integer arithmetic.
    pub vote_pass_num: u32,
    pub vote_pass_den: u32,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        ProtocolParams {
            period: 60 * 60 * 24,
            vote_window: 60 * 60,
            fund_window: 60 * 60 * 24 * 7,
            // 0.5
            vote_pass_num: 1,
            vote_pass_den: 2,
        }
    }
}
