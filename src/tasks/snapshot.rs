//! Periodic Snapshot Task
//!
//! Background task that dumps the cache to a binary snapshot file at a
//! configured interval.
//!
//! Each dump is written to a temporary name and renamed into place on
//! success, so a sink failure mid-stream never leaves a half-written
//! snapshot under the final name.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{CacheKey, CacheValue, DumpReport, ShardedCache};
use crate::error::SnapshotError;

/// Writes one snapshot file into `dir`, returning its path and dump report.
///
/// The file is named by UTC timestamp and atomically renamed from a `.tmp`
/// sibling once the stream completes; the temporary is removed on failure.
pub fn write_snapshot_file<K, V>(
    cache: &ShardedCache<K, V>,
    dir: &Path,
) -> Result<(PathBuf, DumpReport), SnapshotError>
where
    K: CacheKey,
    V: CacheValue,
{
    fs::create_dir_all(dir)?;

    let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3f");
    let final_path = dir.join(format!("catalog-{stamp}.snap"));
    let tmp_path = final_path.with_extension("snap.tmp");

    let result: Result<DumpReport, SnapshotError> = (|| {
        let file = fs::File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        let report = cache.dump(&mut writer)?;
        writer.flush()?;
        Ok(report)
    })();

    match result {
        Ok(report) => {
            fs::rename(&tmp_path, &final_path)?;
            Ok((final_path, report))
        }
        Err(err) => {
            // Discard the partial file; the caller only ever sees complete snapshots.
            let _ = fs::remove_file(&tmp_path);
            Err(err)
        }
    }
}

/// Spawns a background task that periodically snapshots the cache to disk.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between dumps. Each shard is locked only while its entries are copied,
/// so snapshots do not stall the request path.
///
/// # Arguments
/// * `cache` - Shared reference to the sharded cache
/// * `interval_secs` - Interval in seconds between snapshot dumps
/// * `dir` - Directory snapshot files are written to
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_snapshot_task<K, V>(
    cache: Arc<ShardedCache<K, V>>,
    interval_secs: u64,
    dir: PathBuf,
) -> JoinHandle<()>
where
    K: CacheKey,
    V: CacheValue,
{
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting snapshot task with interval of {} seconds",
            interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            match write_snapshot_file(&cache, &dir) {
                Ok((path, report)) => {
                    info!(
                        path = %path.display(),
                        written = report.entries_written,
                        skipped = report.entries_skipped,
                        "snapshot written"
                    );
                }
                Err(err) => {
                    warn!("snapshot dump failed: {err}");
                }
            }
        }
    })
}
