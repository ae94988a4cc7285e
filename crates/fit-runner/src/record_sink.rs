//! Where finished [`RunRecord`]s go (spec.md §6: "the core emits a stream of
//! typed `RunRecord`s"; CSV/report writing is an external collaborator).
//! Grounded on `fit-campaign::logging::Emitter` — the same "trait seam plus
//! an in-memory test double" shape, one level up the pipeline.

use fit_types::RunRecord;

/// Consumes finished run records one at a time, in iteration order.
pub trait RecordSink {
    fn emit(&mut self, record: &RunRecord);
}

/// Accumulates every record handed to it, for tests and for callers that
/// want the whole run log in memory rather than streamed.
#[derive(Debug, Default)]
pub struct VecSink {
    pub records: Vec<RunRecord>,
}

impl RecordSink for VecSink {
    fn emit(&mut self, record: &RunRecord) {
        self.records.push(record.clone());
    }
}
