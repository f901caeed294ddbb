//! Sheet synchronization: diff the fetched history against the recorded
//! column and append only the dates that are not there yet.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::dates::normalize_date;
use crate::error::SyncResult;
use crate::fitx_client::FitxClient;

/// Read/append access to the spreadsheet column holding recorded dates.
///
/// The production implementation talks to Google Sheets; tests substitute an
/// in-memory store.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// All values currently present in the target column.
    async fn read_dates(&self) -> SyncResult<Vec<String>>;

    /// Append the given dates as new rows at the end of the column.
    async fn append_dates(&self, dates: &[String]) -> SyncResult<()>;
}

/// One full pass: authenticate, fetch the trailing-year history, and append
/// any dates the sheet does not have yet. Returns the number of appended
/// rows.
pub async fn run_once(fitx: &FitxClient, sheet: &dyn SheetStore) -> SyncResult<usize> {
    let session_cookie = fitx.login().await?;
    let history = fitx.fetch_checkin_history(&session_cookie).await?;

    for date in &history {
        tracing::info!("Check-in on {}", date);
    }

    sync_to_sheet(&history, sheet).await
}

/// Run one pass and swallow any failure after logging it. A failed scheduled
/// run must never take the process or the schedule down with it; the next
/// successful run catches up naturally since the fetch window covers the
/// trailing year.
pub async fn run_job(fitx: &FitxClient, sheet: &dyn SheetStore) {
    if let Err(e) = run_once(fitx, sheet).await {
        tracing::error!("Check-in sync run failed: {:?}", e);
    }
}

/// Append every history date missing from the sheet column, preserving
/// history order. Existing rows are never touched; duplicates within the
/// fetched batch collapse to their first occurrence.
pub async fn sync_to_sheet(history: &[String], sheet: &dyn SheetStore) -> SyncResult<usize> {
    let existing = sheet.read_dates().await?;
    let mut seen: HashSet<String> = existing.iter().map(|v| v.trim().to_string()).collect();

    let mut new_dates = Vec::new();
    for date in history {
        let normalized = normalize_date(date);
        if seen.insert(normalized.clone()) {
            new_dates.push(normalized);
        }
    }

    if new_dates.is_empty() {
        tracing::info!("No new dates to add.");
        return Ok(0);
    }

    sheet.append_dates(&new_dates).await?;
    tracing::info!("Added {} new date(s) to the sheet.", new_dates.len());
    Ok(new_dates.len())
}
