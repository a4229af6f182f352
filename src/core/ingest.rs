use crate::core::history::{HistoryAccumulator, UpsertOutcome};
use crate::core::metrics::{SprintMetrics, aggregate, sprint_metrics};
use crate::core::normalizer::{FieldNormalizer, NormalizeStats};
use crate::core::sprint::{SprintWindowResolver, WindowResolution};
use crate::db::log::ttlog_quiet;
use crate::db::queries::{replace_tickets, upsert_window};
use crate::errors::AppResult;
use crate::models::snapshot::HistorySnapshot;
use crate::models::sprint::SprintWindow;
use crate::models::ticket::{NormalizedRecord, RawTicketRow};
use chrono::NaiveDate;
use rusqlite::Connection;

/// One batch to ingest.
#[derive(Debug, Clone, Default)]
pub struct IngestRequest {
    pub rows: Vec<RawTicketRow>,
    /// Explicit window; buckets the whole batch when present.
    pub override_window: Option<SprintWindow>,
    /// Defaults to the ingestion day.
    pub snapshot_date: Option<NaiveDate>,
    pub excluded_assignee: String,
}

#[derive(Debug, Clone)]
pub struct IngestReport {
    pub stats: NormalizeStats,
    pub records: Vec<NormalizedRecord>,
    /// Distinct windows found in the rows' sprint labels.
    pub discovered: Vec<SprintWindow>,
    pub resolution: WindowResolution,
    pub metrics: SprintMetrics,
    /// Written snapshot, `None` when the batch could not be bucketed.
    pub snapshot: Option<HistorySnapshot>,
    pub outcome: Option<UpsertOutcome>,
    /// Start date the registered window had before this batch moved it.
    pub previous_start: Option<NaiveDate>,
}

impl IngestReport {
    pub fn window(&self) -> Option<&SprintWindow> {
        self.resolution.window()
    }
}

pub struct IngestLogic;

impl IngestLogic {
    /// Normalize, bucket and record one batch.
    ///
    /// When the batch resolves to a window, the window is registered, its
    /// ticket set replaced and the day's snapshot upserted. Unknown or
    /// ambiguous batches are returned for display only.
    pub fn apply(
        conn: &Connection,
        resolver: &SprintWindowResolver,
        req: IngestRequest,
        today: NaiveDate,
    ) -> AppResult<IngestReport> {
        let batch = FieldNormalizer::new(&req.excluded_assignee).normalize_batch(&req.rows);
        let discovered = resolver.discover(&batch.records);
        let resolution = resolver.resolve_batch(&batch.records, req.override_window);
        let metrics = sprint_metrics(&batch.records);

        let mut report = IngestReport {
            stats: batch.stats,
            records: batch.records,
            discovered,
            resolution,
            metrics,
            snapshot: None,
            outcome: None,
            previous_start: None,
        };

        let Some(window) = report.resolution.window().cloned() else {
            return Ok(report);
        };

        let key = window.key();
        let snapshot_date = req.snapshot_date.unwrap_or(today);
        let snapshot = aggregate(&report.records).into_snapshot(&key, snapshot_date);

        let previous_start = upsert_window(conn, &window)?;
        if let Some(old) = previous_start {
            ttlog_quiet(
                conn,
                "window_moved",
                &key,
                &format!("start moved from {} to {}", old, window.start_date),
            );
        }
        replace_tickets(conn, &key, &report.records)?;
        let outcome = HistoryAccumulator::new(conn).record(&snapshot)?;

        ttlog_quiet(
            conn,
            "ingest",
            &key,
            &format!(
                "{} rows ({} accepted, {} excluded, {} without key); snapshot {} {:?}",
                report.stats.rows_seen,
                report.stats.accepted,
                report.stats.excluded,
                report.stats.missing_key,
                snapshot_date,
                outcome
            ),
        );

        report.snapshot = Some(snapshot);
        report.outcome = Some(outcome);
        report.previous_start = previous_start;
        Ok(report)
    }
}
