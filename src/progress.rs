// src/progress.rs
/// Progress reporting for batch scrapes. The CLI implements this to print
/// per-player status; library callers can pass `NullProgress`.
pub trait Progress {
    /// Called at the start with the number of players.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One player's log was fetched and parsed.
    fn item_done(&mut self, _id: &str) {}

    /// One player failed; the batch carries on.
    fn item_failed(&mut self, _id: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
