//! Record sequence with an implicit tree
//!
//!     [Structure::parse] splits the source into physical lines, drops blank ones and classifies
//!     the rest. Read top to bottom the records form a tree through their indent levels: a
//!     record's parent is the nearest preceding record with a strictly smaller level.
//!
//!     Parent indices are computed once, with a stack of open records, so later lookups
//!     (child-combinator selectors, ancestor questions from the consumers) are O(1) instead of a
//!     backward scan per query.

use super::record::{LineRecord, ParseOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    records: Vec<LineRecord>,
    parents: Vec<Option<usize>>,
}

impl Structure {
    /// Parse Slim source into records.
    pub fn parse(source: &str, options: &ParseOptions) -> Self {
        let records = source
            .lines()
            .enumerate()
            .filter_map(|(index, line)| LineRecord::from_line(line, index + 1, options))
            .collect();
        Self::from_records(records)
    }

    /// Wrap an existing record sequence, computing parent indices.
    pub fn from_records(records: Vec<LineRecord>) -> Self {
        let mut parents = Vec::with_capacity(records.len());
        let mut open: Vec<usize> = Vec::new();

        for (index, record) in records.iter().enumerate() {
            while open
                .last()
                .is_some_and(|&top| records[top].indent_level >= record.indent_level)
            {
                open.pop();
            }
            parents.push(open.last().copied());
            open.push(index);
        }

        Self { records, parents }
    }

    pub fn records(&self) -> &[LineRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<LineRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LineRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineRecord> {
        self.records.iter()
    }

    /// Index of the nearest enclosing record.
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    pub fn parent_record(&self, index: usize) -> Option<&LineRecord> {
        self.parent(index).map(|parent| &self.records[parent])
    }

    /// Index one past the last descendant of `index`.
    pub fn subtree_end(&self, index: usize) -> usize {
        let Some(root) = self.records.get(index) else {
            return index;
        };
        self.records[index + 1..]
            .iter()
            .position(|record| record.indent_level <= root.indent_level)
            .map_or(self.records.len(), |offset| index + 1 + offset)
    }

    /// The smallest indent level present, if any.
    pub fn min_level(&self) -> Option<usize> {
        self.records.iter().map(|record| record.indent_level).min()
    }
}

impl<'a> IntoIterator for &'a Structure {
    type Item = &'a LineRecord;
    type IntoIter = std::slice::Iter<'a, LineRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
