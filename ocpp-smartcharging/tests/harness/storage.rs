use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use evcp_smartcharging::v16::{Database, TableOperation};

/// In-memory key-value store. Clones share their tables so a test can hand
/// the same storage to a second manager and check what survives a restart.
#[derive(Clone, Default)]
pub struct MockDatabase {
    tables: Rc<RefCell<HashMap<String, HashMap<String, String>>>>,
}

impl MockDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .borrow()
            .get(table)
            .map(|tbl| tbl.len())
            .unwrap_or(0)
    }
}

impl Database for MockDatabase {
    fn init(&mut self) {}

    fn transaction(&mut self, table: &str, ops: Vec<TableOperation>) {
        let mut tables = self.tables.borrow_mut();
        let tbl = tables.entry(table.to_string()).or_default();
        for op in ops {
            match op {
                TableOperation::Insert { key, value } => {
                    tbl.insert(key, value);
                }
                TableOperation::Delete { key } => {
                    tbl.remove(&key);
                }
            }
        }
    }

    fn get(&mut self, table: &str, key: &str) -> Option<String> {
        self.tables
            .borrow()
            .get(table)
            .and_then(|tbl| tbl.get(key).cloned())
    }

    fn get_all(&mut self, table: &str) -> Vec<(String, String)> {
        self.tables
            .borrow()
            .get(table)
            .map(|tbl| tbl.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    fn delete_table(&mut self, table: &str) {
        self.tables.borrow_mut().remove(table);
    }
}
