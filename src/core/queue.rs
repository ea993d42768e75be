use super::Record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub index: usize,
    pub draft: Record,
}

/// Records waiting to be submitted, in insertion order, plus the optional
/// inline edit of one of them.
#[derive(Debug, Default, Clone)]
pub struct Queue {
    records: Vec<Record>,
    editing: Option<EditState>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn append(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn append_bulk(&mut self, records: impl IntoIterator<Item = Record>) -> usize {
        let before = self.records.len();
        self.records.extend(records);
        self.records.len() - before
    }

    /// Removes the record at `index`. Removing the row being edited cancels the
    /// edit; removing a row above it keeps the edit on the same record.
    pub fn remove_at(&mut self, index: usize) -> Option<Record> {
        if index >= self.records.len() {
            return None;
        }

        match &mut self.editing {
            Some(edit) if edit.index == index => self.editing = None,
            Some(edit) if edit.index > index => edit.index -= 1,
            _ => {}
        }

        Some(self.records.remove(index))
    }

    pub fn replace_at(&mut self, index: usize, record: Record) -> Option<Record> {
        self.records.get_mut(index).map(|slot| std::mem::replace(slot, record))
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.editing = None;
    }

    pub fn begin_edit(&mut self, index: usize) -> bool {
        match self.records.get(index) {
            Some(record) => {
                self.editing = Some(EditState { index, draft: record.clone() });
                true
            }
            None => false,
        }
    }

    pub fn editing_index(&self) -> Option<usize> {
        self.editing.as_ref().map(|edit| edit.index)
    }

    pub fn draft_mut(&mut self) -> Option<&mut Record> {
        self.editing.as_mut().map(|edit| &mut edit.draft)
    }

    /// Writes the trimmed draft back over the edited record.
    pub fn commit_edit(&mut self) -> bool {
        match self.editing.take() {
            Some(edit) => self.replace_at(edit.index, edit.draft.trimmed()).is_some(),
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Settles a bulk submission of the first `submitted` records. On success
    /// only that snapshot leaves the queue, so records added while the request
    /// was in flight stay queued. On failure nothing changes. Returns how many
    /// records were removed.
    pub fn apply_submission<T, E>(&mut self, submitted: usize, result: &Result<T, E>) -> usize {
        if result.is_err() {
            return 0;
        }

        let removed = submitted.min(self.records.len());
        self.records.drain(..removed);

        match &mut self.editing {
            Some(edit) if edit.index < removed => self.editing = None,
            Some(edit) => edit.index -= removed,
            None => {}
        }

        removed
    }

    /// Number of empty cells across the queue, shown as a warning before submitting.
    pub fn blank_cell_count(&self) -> usize {
        self.records.iter().map(|record| record.blank_fields().count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::FieldId;

    fn named(name: &str) -> Record {
        let mut record = Record::new();
        record.set(FieldId::NamaLengkap, name);
        record
    }

    fn names(queue: &Queue) -> Vec<&str> {
        queue.records().iter().map(|r| r.get(FieldId::NamaLengkap)).collect()
    }

    #[test]
    fn test_append_keeps_order_and_duplicates() {
        let mut queue = Queue::new();
        queue.append(named("A"));
        assert_eq!(queue.append_bulk(vec![named("B"), named("A")]), 2);
        assert_eq!(names(&queue), ["A", "B", "A"]);
    }

    #[test]
    fn test_remove_and_replace() {
        let mut queue = Queue::new();
        queue.append_bulk(vec![named("A"), named("B"), named("C")]);

        assert_eq!(queue.remove_at(1).map(|r| r.nama_lengkap), Some("B".to_string()));
        assert!(queue.remove_at(5).is_none());
        assert_eq!(queue.replace_at(1, named("Z")).map(|r| r.nama_lengkap), Some("C".to_string()));
        assert!(queue.replace_at(9, named("Q")).is_none());
        assert_eq!(names(&queue), ["A", "Z"]);
    }

    #[test]
    fn test_removing_edited_row_cancels_edit() {
        let mut queue = Queue::new();
        queue.append_bulk(vec![named("A"), named("B")]);

        assert!(queue.begin_edit(1));
        queue.draft_mut().unwrap().set(FieldId::NamaLengkap, "edited");
        queue.remove_at(1);

        assert_eq!(queue.editing_index(), None);
        assert!(!queue.commit_edit());
        assert_eq!(names(&queue), ["A"]);
    }

    #[test]
    fn test_removing_row_above_edit_keeps_target() {
        let mut queue = Queue::new();
        queue.append_bulk(vec![named("A"), named("B"), named("C")]);

        queue.begin_edit(2);
        queue.remove_at(0);
        assert_eq!(queue.editing_index(), Some(1));

        *queue.draft_mut().unwrap().field_mut(FieldId::NamaLengkap) = " C2 ".to_string();
        assert!(queue.commit_edit());
        assert_eq!(names(&queue), ["B", "C2"]);
        assert_eq!(queue.editing_index(), None);
    }

    #[test]
    fn test_cancel_edit_discards_draft() {
        let mut queue = Queue::new();
        queue.append(named("A"));
        queue.begin_edit(0);
        queue.draft_mut().unwrap().set(FieldId::NamaLengkap, "X");
        queue.cancel_edit();

        assert_eq!(names(&queue), ["A"]);
        assert!(!queue.begin_edit(3));
    }

    #[test]
    fn test_clear_drops_records_and_edit() {
        let mut queue = Queue::new();
        queue.append_bulk(vec![named("A"), named("B")]);
        queue.begin_edit(0);
        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.editing_index(), None);
    }

    #[test]
    fn test_blank_cell_count() {
        let mut queue = Queue::new();
        queue.append(named("A"));
        queue.append(Record::new());
        assert_eq!(queue.blank_cell_count(), 17 + 18);
    }

    #[test]
    fn test_successful_submission_removes_only_the_snapshot() {
        let mut queue = Queue::new();
        queue.append_bulk([named("A"), named("B")]);
        let submitted = queue.len();

        // Added while the request is in flight
        queue.append(named("C"));
        queue.begin_edit(2);

        let ok: Result<(), String> = Ok(());
        assert_eq!(queue.apply_submission(submitted, &ok), 2);
        assert_eq!(names(&queue), ["C"]);
        assert_eq!(queue.editing_index(), Some(0));
    }

    #[test]
    fn test_failed_submission_keeps_queue_and_edit() {
        let mut queue = Queue::new();
        queue.append_bulk([named("A"), named("B")]);
        queue.begin_edit(1);
        let before = queue.records().to_vec();

        let failed: Result<(), String> = Err("connection refused".to_string());
        assert_eq!(queue.apply_submission(2, &failed), 0);
        assert_eq!(queue.records(), before.as_slice());
        assert_eq!(queue.editing_index(), Some(1));
    }

    #[test]
    fn test_submission_cancels_edit_inside_snapshot() {
        let mut queue = Queue::new();
        queue.append_bulk([named("A"), named("B"), named("C")]);
        queue.begin_edit(1);

        let ok: Result<(), String> = Ok(());
        assert_eq!(queue.apply_submission(2, &ok), 2);
        assert_eq!(queue.editing_index(), None);
        assert_eq!(names(&queue), ["C"]);

        // A snapshot larger than the queue only drains what is there
        assert_eq!(queue.apply_submission(5, &ok), 1);
        assert!(queue.is_empty());
    }
}
