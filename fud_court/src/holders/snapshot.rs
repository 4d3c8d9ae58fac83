use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use chrono::NaiveDate;

use crate::models::DailySnapshot;
use crate::errors::{FudCourtError, Result};

#[derive(Clone)]
pub struct SnapshotHolder {
    snapshots: Arc<Mutex<BTreeMap<NaiveDate, DailySnapshot>>>,
    max_days: usize,
}

impl SnapshotHolder {
    pub fn new(max_days: usize) -> Self {
        SnapshotHolder {
            snapshots: Arc::new(Mutex::new(BTreeMap::new())),
            max_days: max_days.max(1),
        }
    }

    /// Записывает снимок за `snapshot.date` и удаляет самые старые дни сверх лимита.
    pub async fn record(&self, snapshot: DailySnapshot) -> Result<()> {
        let mut snapshots = self.snapshots.lock().await;
        snapshots.insert(snapshot.date, snapshot);
        while snapshots.len() > self.max_days {
            let oldest = match snapshots.keys().next() {
                Some(date) => *date,
                None => break,
            };
            snapshots.remove(&oldest);
        }
        Ok(())
    }

    /// Сначала самые старые.
    pub async fn get(&self) -> Result<Vec<DailySnapshot>> {
        let snapshots = self.snapshots.lock().await;
        Ok(snapshots.values().cloned().collect())
    }

    pub async fn get_day(&self, date: NaiveDate) -> Result<DailySnapshot> {
        let snapshots = self.snapshots.lock().await;
        snapshots
            .get(&date)
            .cloned()
            .ok_or(FudCourtError::SnapshotNotFound(date))
    }

    pub async fn latest(&self) -> Result<Option<DailySnapshot>> {
        let snapshots = self.snapshots.lock().await;
        Ok(snapshots.values().next_back().cloned())
    }

    pub async fn clear(&self) -> Result<()> {
        let mut snapshots = self.snapshots.lock().await;
        snapshots.clear();
        Ok(())
    }

    pub async fn len(&self) -> Result<usize> {
        let snapshots = self.snapshots.lock().await;
        Ok(snapshots.len())
    }
}
