use async_trait::async_trait;
use tagwatch_proto::Transmission;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Persistence for accepted transmissions. Returns the id the store gave it.
#[async_trait]
pub trait TxStore: Send + Sync {
    async fn write_tx(&self, tx: &Transmission) -> anyhow::Result<String>;
}

/// Keeps everything in memory. Used by `replay` and by tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    txs: Mutex<Vec<Transmission>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.txs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.txs.lock().await.is_empty()
    }

    pub async fn get(&self, id: &str) -> Option<Transmission> {
        self.txs.lock().await.iter().find(|tx| tx.id.as_deref() == Some(id)).cloned()
    }

    /// Most recent transmission stored for `serial`.
    pub async fn latest_for(&self, serial: i64) -> Option<Transmission> {
        self.txs.lock().await.iter().rev().find(|tx| tx.serial_number == serial).cloned()
    }
}

#[async_trait]
impl TxStore for MemoryStore {
    async fn write_tx(&self, tx: &Transmission) -> anyhow::Result<String> {
        let id = Uuid::new_v4().to_string();
        let mut stored = tx.clone();
        stored.id = Some(id.clone());
        let mut txs = self.txs.lock().await;
        txs.push(stored);
        debug!("store: kept {} ({} in memory)", id, txs.len());
        Ok(id)
    }
}
