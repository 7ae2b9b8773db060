use alloc::{string::String, vec::Vec};
use chrono::{DateTime, Utc};

pub enum TableOperation {
    Insert { key: String, value: String },
    Delete { key: String },
}

impl TableOperation {
    pub fn insert(key: String, value: String) -> Self {
        TableOperation::Insert { key, value }
    }
    pub fn delete(key: String) -> Self {
        TableOperation::Delete { key }
    }
}

/// Key-value persistence seam. Installed profiles are mirrored here so they
/// survive a reboot of the charge point.
pub trait Database {
    fn init(&mut self);
    fn transaction(&mut self, table: &str, ops: Vec<TableOperation>);
    fn get(&mut self, table: &str, key: &str) -> Option<String>;
    fn get_all(&mut self, table: &str) -> Vec<(String, String)>;
    fn delete_table(&mut self, table: &str);
}

#[derive(Clone, Debug)]
pub struct TransactionContext {
    pub transaction_id: i32,
    pub started_at: DateTime<Utc>,
}

/// Read-only snapshot of one connector, supplied by the connector state
/// machine on every call instead of a live reference.
#[derive(Clone, Debug)]
pub struct ConnectorContext {
    /// 1-based physical connector id; id 0 addresses the whole charge point.
    pub connector_id: usize,
    pub number_phases: u32,
    /// Static maximum current of the connector hardware, in amps.
    pub max_current: f32,
    /// True while the connector is actively delivering energy.
    pub charging: bool,
    pub transaction: Option<TransactionContext>,
}

#[derive(Clone, Debug)]
pub struct ChargePointContext {
    /// Static maximum current of the whole charge point, in amps.
    pub max_current: f32,
    pub connectors: Vec<ConnectorContext>,
}

impl ChargePointContext {
    pub fn connector(&self, connector_id: usize) -> Option<&ConnectorContext> {
        connector_id
            .checked_sub(1)
            .and_then(|idx| self.connectors.get(idx))
    }
    pub fn is_valid(&self, connector_id: usize) -> bool {
        connector_id <= self.connectors.len()
    }
}
