use serde::{Deserialize, Serialize};

/// One row of the contributor roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorRecord {
    /// Writer's legal or professional name
    pub writer_name: String,

    /// Writer's IPI number
    pub writer_ipi: String,

    /// Publisher administering the writer's share
    pub publisher_name: String,

    /// Publisher's IPI number
    pub publisher_ipi: String,

    /// Performance-rights organization the writer belongs to (e.g. ASCAP, BMI, PRS)
    pub writer_pro: String,
}

impl ContributorRecord {
    pub fn new(writer_name: impl Into<String>) -> Self {
        Self {
            writer_name: writer_name.into(),
            writer_ipi: String::new(),
            publisher_name: String::new(),
            publisher_ipi: String::new(),
            writer_pro: String::new(),
        }
    }

    #[must_use]
    pub fn with_writer_ipi(mut self, ipi: impl Into<String>) -> Self {
        self.writer_ipi = ipi.into();
        self
    }

    #[must_use]
    pub fn with_publisher(mut self, name: impl Into<String>, ipi: impl Into<String>) -> Self {
        self.publisher_name = name.into();
        self.publisher_ipi = ipi.into();
        self
    }

    #[must_use]
    pub fn with_pro(mut self, pro: impl Into<String>) -> Self {
        self.writer_pro = pro.into();
        self
    }

    /// Whether this record names the same writer, ignoring case
    pub fn same_writer(&self, name: &str) -> bool {
        self.writer_name.to_lowercase() == name.trim().to_lowercase()
    }
}

/// Contributors accepted during a session, in acceptance order.
///
/// No two entries share a writer name under case-insensitive comparison;
/// [`AcceptedContributors::push`] refuses a second entry for the same writer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AcceptedContributors {
    entries: Vec<ContributorRecord>,
}

impl AcceptedContributors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a writer with this name has already been accepted
    pub fn contains_writer(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.same_writer(name))
    }

    /// Append a contributor. Returns `false` (and leaves the list untouched)
    /// when the writer is already present.
    pub fn push(&mut self, record: ContributorRecord) -> bool {
        if self.contains_writer(&record.writer_name) {
            return false;
        }
        self.entries.push(record);
        true
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContributorRecord> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[ContributorRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a AcceptedContributors {
    type Item = &'a ContributorRecord;
    type IntoIter = std::slice::Iter<'a, ContributorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
