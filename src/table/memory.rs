use super::{RawRow, RemoteTable, Table, TableError};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

#[derive(Default)]
struct State {
    tables: HashMap<String, Table>,
    read_failures: VecDeque<TableError>,
    write_failures: VecDeque<TableError>,
    reads: usize,
    writes: usize,
}

/// In-process table. Clones share state, so a test can keep a handle while
/// the log store owns another one, or play a second writer via `put`.
#[derive(Clone, Default)]
pub struct MemoryTable {
    state: Rc<RefCell<State>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(source: &str, rows: Vec<RawRow>) -> Self {
        let t = Self::new();
        t.put(source, Table::from_rows(rows));
        t
    }

    /// Overwrite a table behind the store's back.
    pub fn put(&self, source: &str, table: Table) {
        self.state
            .borrow_mut()
            .tables
            .insert(source.to_string(), table);
    }

    pub fn snapshot(&self, source: &str) -> Table {
        self.state
            .borrow()
            .tables
            .get(source)
            .cloned()
            .unwrap_or_default()
    }

    pub fn fail_next_read(&self, err: TableError) {
        self.state.borrow_mut().read_failures.push_back(err);
    }

    pub fn fail_next_write(&self, err: TableError) {
        self.state.borrow_mut().write_failures.push_back(err);
    }

    pub fn reads(&self) -> usize {
        self.state.borrow().reads
    }

    pub fn writes(&self) -> usize {
        self.state.borrow().writes
    }
}

impl RemoteTable for MemoryTable {
    fn read(&self, source: &str, _max_staleness: Duration) -> Result<Table, TableError> {
        let mut st = self.state.borrow_mut();
        st.reads += 1;
        if let Some(err) = st.read_failures.pop_front() {
            return Err(err);
        }
        Ok(st.tables.get(source).cloned().unwrap_or_default())
    }

    fn write(&self, source: &str, table: &Table) -> Result<(), TableError> {
        let mut st = self.state.borrow_mut();
        if let Some(err) = st.write_failures.pop_front() {
            return Err(err);
        }
        st.writes += 1;
        st.tables.insert(source.to_string(), table.clone());
        Ok(())
    }
}
