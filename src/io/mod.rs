// Readers for the flat snapshot files produced by the collection stage.
//
// All readers share the same tolerance policy: a malformed record is
// logged and skipped, a missing or unreadable file aborts the run.

pub mod followers;
pub mod scores;
pub mod tweets;
