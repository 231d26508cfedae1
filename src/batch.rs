use crate::kafka::key::{partition_key, PartitionKey};
use crate::kafka::record::Record;
use std::collections::HashMap;

/// 1回のpollで受信したレコードの集まり。
///
/// [PartitionKey]ごとにレコードをグルーピングして保持する。
/// partition同士の順序は最初にレコードが現れた順、partition内の順序はpushされた順が
/// そのまま維持される。
#[derive(Clone, Debug, Default)]
pub struct Batch {
    groups: Vec<PartitionGroup>,
    index: HashMap<PartitionKey, usize>,
}

/// 同一partitionに属するレコードの列。
#[derive(Clone, Debug)]
pub struct PartitionGroup {
    key: PartitionKey,
    records: Vec<Record>,
}

impl PartitionGroup {
    fn new(key: PartitionKey) -> Self {
        Self {
            key,
            records: vec![],
        }
    }

    pub fn key(&self) -> &PartitionKey {
        &self.key
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_parts(self) -> (PartitionKey, Vec<Record>) {
        (self.key, self.records)
    }
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut batch = Self::new();
        for record in records {
            batch.push(record);
        }
        batch
    }

    pub fn push(&mut self, record: Record) {
        let key = partition_key!(record);
        match self.index.get(&key) {
            Some(&pos) => self.groups[pos].records.push(record),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                let mut group = PartitionGroup::new(key);
                group.records.push(record);
                self.groups.push(group);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn partition_count(&self) -> usize {
        self.groups.len()
    }

    pub fn partitions(&self) -> impl Iterator<Item = &PartitionKey> {
        self.groups.iter().map(|g| &g.key)
    }

    pub fn records(&self, key: &PartitionKey) -> Option<&[Record]> {
        self.index.get(key).map(|&pos| self.groups[pos].records())
    }

    pub fn groups(&self) -> &[PartitionGroup] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<PartitionGroup> {
        self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.groups.iter().flat_map(|g| g.records.iter())
    }
}

impl IntoIterator for Batch {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups
            .into_iter()
            .flat_map(|g| g.records)
            .collect::<Vec<_>>()
            .into_iter()
    }
}
