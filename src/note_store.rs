use crate::model::{
    decode_notes, encode_notes, generate_id, validate_content, Note, NoteError, NoteId,
};
use crate::storage::{KeyValueStore, StoreError};
use log::{debug, warn};

pub struct NoteStore<S> {
    store: S,
    key: String,
    notes: Vec<Note>,
    editing: Option<NoteId>,
    synced: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Listing<'a> {
    pub notes: &'a [Note],
    pub editing: Option<&'a str>,
}

#[must_use]
#[derive(Debug)]
pub struct Change<T> {
    pub value: T,
    pub persisted: Result<(), StoreError>,
}

impl<T> Change<T> {
    pub fn is_durable(&self) -> bool {
        self.persisted.is_ok()
    }

    pub fn warning(&self) -> Option<&StoreError> {
        self.persisted.as_ref().err()
    }

    pub fn into_result(self) -> Result<T, NoteError> {
        self.persisted?;
        Ok(self.value)
    }
}

impl<S: KeyValueStore> NoteStore<S> {
    // Unreadable or corrupt data loads as an empty collection.
    pub fn load(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let notes = match store.read(&key) {
            Ok(Some(blob)) => decode_notes(&blob).unwrap_or_else(|err| {
                warn!("ignoring unreadable notes under {:?}: {}", key, err);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("could not read notes under {:?}: {}", key, err);
                Vec::new()
            }
        };
        debug!("loaded {} notes from {:?}", notes.len(), key);
        NoteStore {
            store,
            key,
            notes,
            editing: None,
            synced: true,
        }
    }

    pub fn create(&mut self, content: &str) -> Result<Change<NoteId>, NoteError> {
        let content = validate_content(content)?;
        let id = generate_id(&self.notes);
        self.notes.insert(0, Note::new(id.clone(), content));
        debug!("created note {}", id);
        Ok(self.persist(id))
    }

    pub fn update(&mut self, id: &str, content: &str) -> Result<Change<()>, NoteError> {
        let idx = self
            .position(id)
            .ok_or_else(|| NoteError::NotFound(id.to_string()))?;
        let content = validate_content(content)?;
        self.notes[idx].content = content;
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
        debug!("updated note {}", id);
        Ok(self.persist(()))
    }

    pub fn delete(&mut self, id: &str) -> Change<bool> {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        let removed = self.notes.len() != before;
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
        if removed {
            debug!("deleted note {}", id);
        }
        self.persist(removed)
    }

    pub fn begin_edit(&mut self, id: &str) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        self.editing = Some(id.to_string());
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn list(&self) -> Listing<'_> {
        Listing {
            notes: &self.notes,
            editing: self.editing.as_deref(),
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn save(&mut self) -> Result<(), StoreError> {
        let result = encode_notes(&self.notes)
            .map_err(StoreError::from)
            .and_then(|blob| self.store.write(&self.key, &blob));
        self.synced = result.is_ok();
        if let Err(err) = &result {
            warn!("notes kept in memory only: {}", err);
        }
        result
    }

    fn persist<T>(&mut self, value: T) -> Change<T> {
        let persisted = self.save();
        Change { value, persisted }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const KEY: &str = "notes_app_data";

    fn empty() -> NoteStore<MemoryStore> {
        NoteStore::load(MemoryStore::new(), KEY)
    }

    fn contents<S: KeyValueStore>(notes: &NoteStore<S>) -> Vec<&str> {
        notes.notes().iter().map(|n| n.content.as_str()).collect()
    }

    fn stored_blob(notes: &NoteStore<MemoryStore>) -> Option<String> {
        notes.store().read(KEY).unwrap()
    }

    #[test]
    fn create_prepends_newest_first() {
        let mut notes = empty();
        let milk = notes.create("Buy milk").unwrap().into_result().unwrap();
        assert_eq!(contents(&notes), vec!["Buy milk"]);

        let dog = notes.create("Walk dog").unwrap().into_result().unwrap();
        assert_eq!(contents(&notes), vec!["Walk dog", "Buy milk"]);
        assert_eq!(notes.notes()[0].id, dog);
        assert_eq!(notes.notes()[1].id, milk);
        assert_ne!(milk, dog);
        assert!(notes.notes()[0].created_at.is_some());
    }

    #[test]
    fn create_trims_and_keeps_inner_newlines() {
        let mut notes = empty();
        notes.create("\n  line one\nline two  \n").unwrap().into_result().unwrap();
        assert_eq!(contents(&notes), vec!["line one\nline two"]);
    }

    #[test]
    fn create_persists_each_time() {
        let mut notes = empty();
        for n in 1..=5 {
            let change = notes.create(&format!("note {}", n)).unwrap();
            assert!(change.is_durable());
            assert_eq!(notes.len(), n);
            assert_eq!(notes.notes()[0].content, format!("note {}", n));
        }
        assert_eq!(notes.store().writes(), 5);
    }

    #[test]
    fn blank_create_is_rejected_without_writing() {
        let mut notes = empty();
        notes.create("keep").unwrap().into_result().unwrap();
        let before = stored_blob(&notes);
        for blank in ["", " ", "\n\t  \n"] {
            assert!(matches!(notes.create(blank), Err(NoteError::EmptyContent)));
        }
        assert_eq!(contents(&notes), vec!["keep"]);
        assert_eq!(stored_blob(&notes), before);
        assert_eq!(notes.store().writes(), 1);
    }

    #[test]
    fn blank_update_preserves_content() {
        let mut notes = empty();
        let id = notes.create("x").unwrap().into_result().unwrap();
        let before = stored_blob(&notes);

        assert!(matches!(
            notes.update(&id, "   "),
            Err(NoteError::EmptyContent)
        ));
        assert_eq!(contents(&notes), vec!["x"]);
        assert_eq!(stored_blob(&notes), before);
    }

    #[test]
    fn update_unknown_id_is_not_found_and_does_not_write() {
        let mut notes = empty();
        notes.create("x").unwrap().into_result().unwrap();
        let writes = notes.store().writes();

        match notes.update("missing", "y") {
            Err(NoteError::NotFound(id)) => assert_eq!(id, "missing"),
            other => panic!("expected NotFound, got {:?}", other.map(|c| c.value)),
        }
        assert_eq!(contents(&notes), vec!["x"]);
        assert_eq!(notes.store().writes(), writes);
    }

    #[test]
    fn update_changes_only_content() {
        let mut notes = empty();
        let a = notes.create("a").unwrap().into_result().unwrap();
        let b = notes.create("b").unwrap().into_result().unwrap();
        let c = notes.create("c").unwrap().into_result().unwrap();
        let created = notes.get(&b).unwrap().created_at;

        notes.update(&b, "  B edited ").unwrap().into_result().unwrap();

        let ids: Vec<&str> = notes.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec![c.as_str(), b.as_str(), a.as_str()]);
        assert_eq!(contents(&notes), vec!["c", "B edited", "a"]);
        assert_eq!(notes.get(&b).unwrap().created_at, created);
    }

    #[test]
    fn update_clears_cursor_only_for_edited_note() {
        let mut notes = empty();
        let a = notes.create("a").unwrap().into_result().unwrap();
        let b = notes.create("b").unwrap().into_result().unwrap();

        assert!(notes.begin_edit(&a));
        notes.update(&b, "b2").unwrap().into_result().unwrap();
        assert_eq!(notes.editing(), Some(a.as_str()));

        notes.update(&a, "a2").unwrap().into_result().unwrap();
        assert_eq!(notes.editing(), None);
    }

    #[test]
    fn failed_update_keeps_cursor() {
        let mut notes = empty();
        let a = notes.create("a").unwrap().into_result().unwrap();
        notes.begin_edit(&a);
        assert!(notes.update(&a, " ").is_err());
        assert_eq!(notes.editing(), Some(a.as_str()));
    }

    #[test]
    fn delete_is_idempotent() {
        let mut notes = empty();
        let id = notes.create("x").unwrap().into_result().unwrap();

        let first = notes.delete(&id);
        assert!(first.is_durable());
        assert!(first.value);
        let after_first = stored_blob(&notes);

        let second = notes.delete(&id);
        assert!(second.is_durable());
        assert!(!second.value);
        assert!(notes.is_empty());
        assert_eq!(stored_blob(&notes), after_first);
    }

    #[test]
    fn delete_unknown_id_leaves_collection() {
        let mut notes = empty();
        notes.create("a").unwrap().into_result().unwrap();
        notes.create("b").unwrap().into_result().unwrap();
        assert!(!notes.delete("nope").value);
        assert_eq!(contents(&notes), vec!["b", "a"]);
    }

    #[test]
    fn deleting_note_under_edit_clears_cursor() {
        let mut notes = empty();
        let keep = notes.create("keep").unwrap().into_result().unwrap();
        let x = notes.create("x").unwrap().into_result().unwrap();

        assert!(notes.begin_edit(&x));
        assert!(notes.delete(&x).value);
        assert_eq!(notes.editing(), None);
        assert!(notes.get(&x).is_none());
        assert_eq!(notes.list().notes.len(), 1);
        assert_eq!(notes.list().notes[0].id, keep);
    }

    #[test]
    fn deleting_other_note_keeps_cursor() {
        let mut notes = empty();
        let a = notes.create("a").unwrap().into_result().unwrap();
        let b = notes.create("b").unwrap().into_result().unwrap();
        notes.begin_edit(&a);
        assert!(notes.delete(&b).value);
        assert_eq!(notes.editing(), Some(a.as_str()));
    }

    #[test]
    fn begin_edit_requires_existing_note_and_is_not_persisted() {
        let mut notes = empty();
        let a = notes.create("a").unwrap().into_result().unwrap();
        let writes = notes.store().writes();

        assert!(!notes.begin_edit("ghost"));
        assert_eq!(notes.editing(), None);

        assert!(notes.begin_edit(&a));
        assert_eq!(notes.list().editing, Some(a.as_str()));
        notes.cancel_edit();
        assert_eq!(notes.editing(), None);
        notes.cancel_edit();
        assert_eq!(notes.editing(), None);

        assert_eq!(notes.store().writes(), writes);
        assert_eq!(contents(&notes), vec!["a"]);
    }

    #[test]
    fn begin_edit_moves_cursor_between_notes() {
        let mut notes = empty();
        let a = notes.create("a").unwrap().into_result().unwrap();
        let b = notes.create("b").unwrap().into_result().unwrap();
        notes.begin_edit(&a);
        notes.begin_edit(&b);
        assert_eq!(notes.editing(), Some(b.as_str()));
        assert!(!notes.begin_edit("ghost"));
        assert_eq!(notes.editing(), Some(b.as_str()));
    }

    #[test]
    fn reload_round_trips_collection_and_drops_cursor() {
        let mut notes = empty();
        let a = notes.create("first").unwrap().into_result().unwrap();
        notes.create("second\nwith newline").unwrap().into_result().unwrap();
        notes.update(&a, "first, edited").unwrap().into_result().unwrap();
        notes.begin_edit(&a);

        let before: Vec<Note> = notes.notes().to_vec();
        let reloaded = NoteStore::load(notes.store().clone(), KEY);
        assert_eq!(reloaded.notes(), before.as_slice());
        assert_eq!(reloaded.editing(), None);
    }

    #[test]
    fn load_tolerates_missing_and_corrupt_blobs() {
        let missing = NoteStore::load(MemoryStore::new(), KEY);
        assert!(missing.is_empty());

        let corrupt = NoteStore::load(MemoryStore::with_entry(KEY, "{{{ not yaml"), KEY);
        assert!(corrupt.is_empty());
        assert!(corrupt.is_synced());

        let wrong_shape = NoteStore::load(MemoryStore::with_entry(KEY, "count: 3"), KEY);
        assert!(wrong_shape.is_empty());
    }

    #[test]
    fn load_reads_json_written_by_older_versions() {
        let blob = r#"[{"id":"2","content":"Walk dog"},{"id":"1","content":"Buy milk"}]"#;
        let notes = NoteStore::load(MemoryStore::with_entry(KEY, blob), KEY);
        assert_eq!(contents(&notes), vec!["Walk dog", "Buy milk"]);
        assert_eq!(notes.get("1").unwrap().content, "Buy milk");
    }

    #[test]
    fn load_uses_only_its_own_key() {
        let store = MemoryStore::with_entry("other", "- id: a\n  content: elsewhere\n");
        let notes = NoteStore::load(store, KEY);
        assert!(notes.is_empty());
        assert_eq!(notes.key(), KEY);
    }

    #[test]
    fn write_failure_keeps_memory_state_and_reports_warning() {
        let mut notes = empty();
        let a = notes.create("a").unwrap().into_result().unwrap();
        notes.store_mut().set_writable(false);

        let change = notes.create("b").unwrap();
        assert!(!change.is_durable());
        assert!(matches!(change.warning(), Some(StoreError::ReadOnly(_))));
        assert!(matches!(
            change.into_result(),
            Err(NoteError::PersistenceFailure(_))
        ));
        assert_eq!(contents(&notes), vec!["b", "a"]);
        assert!(!notes.is_synced());

        let deleted = notes.delete(&a);
        assert!(deleted.value);
        assert!(!deleted.is_durable());
        assert_eq!(contents(&notes), vec!["b"]);

        notes.store_mut().set_writable(true);
        notes.save().unwrap();
        assert!(notes.is_synced());
        let reloaded = NoteStore::load(notes.store().clone(), KEY);
        assert_eq!(contents(&reloaded), vec!["b"]);
    }
}
