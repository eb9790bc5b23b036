use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// In-process storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place raw bytes under `key`, bypassing any serialization.
    pub fn insert_raw(&self, key: &str, data: impl Into<Vec<u8>>) {
        self.entries.borrow_mut().insert(key.to_string(), data.into());
    }

    pub fn get_raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.borrow().get(key).cloned()
    }
}

impl Storage for MemoryStorage {
    fn read_entry(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get_raw(key))
    }

    fn write_entry(&self, key: &str, data: &[u8]) -> Result<()> {
        self.insert_raw(key, data);
        Ok(())
    }
}
