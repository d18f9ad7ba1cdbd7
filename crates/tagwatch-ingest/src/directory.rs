use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use tagwatch_alert::Subject;

/// Serial number to display name. Built from the `[subjects]` config table,
/// whose keys are the serials as strings.
#[derive(Debug, Clone, Default)]
pub struct SubjectDirectory {
    names: HashMap<i64, String>,
}

impl SubjectDirectory {
    pub fn from_cfg(table: &BTreeMap<String, String>) -> Result<Self> {
        let mut names = HashMap::with_capacity(table.len());
        for (serial, name) in table {
            let serial: i64 = serial
                .trim()
                .parse()
                .with_context(|| format!("subjects: {serial:?} is not a serial number"))?;
            anyhow::ensure!(!name.trim().is_empty(), "subjects: serial {serial} has an empty name");
            names.insert(serial, name.clone());
        }
        Ok(Self { names })
    }

    pub fn insert(&mut self, serial: i64, name: impl Into<String>) {
        self.names.insert(serial, name.into());
    }

    pub fn name(&self, serial: i64) -> Option<&str> {
        self.names.get(&serial).map(String::as_str)
    }

    /// Unknown serials get a placeholder so they still alert.
    pub fn subject(&self, serial: i64) -> Subject {
        match self.name(serial) {
            Some(name) => Subject::new(serial, name),
            None => Subject::new(serial, format!("UNKNOWN TAG {serial}")),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
