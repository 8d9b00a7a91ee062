use crate::storage::StoreError;
use chrono::{DateTime, TimeZone, Utc};
use log::warn;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

pub type NoteId = String;

const ID_LEN: usize = 10;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(thiserror::Error, Debug)]
pub enum NoteError {
    #[error("note cannot be empty")]
    EmptyContent,
    #[error("note not found: {0}")]
    NotFound(NoteId),
    #[error("change kept in memory only: {0}")]
    PersistenceFailure(#[from] StoreError),
}

impl Note {
    pub fn new(id: NoteId, content: String) -> Self {
        Note {
            id,
            content,
            created_at: Some(Utc::now()),
        }
    }
}

// Display-only, so an unreadable stamp is dropped rather than the note.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(err) => {
                warn!("ignoring unreadable createdAt {:?}: {}", raw, err);
                None
            }
        },
        Some(Value::Number(n)) => {
            let stamp = n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single());
            if stamp.is_none() {
                warn!("ignoring out-of-range createdAt {}", n);
            }
            stamp
        }
        Some(other) => {
            warn!("ignoring createdAt of unexpected shape: {:?}", other);
            None
        }
    };
    Ok(parsed)
}

pub fn validate_content(raw: &str) -> Result<String, NoteError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NoteError::EmptyContent);
    }
    Ok(trimmed.to_string())
}

pub fn generate_id(existing: &[Note]) -> NoteId {
    let mut rng = rand::thread_rng();
    loop {
        let id: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(ID_LEN)
            .map(char::from)
            .collect();
        if !existing.iter().any(|n| n.id == id) {
            return id;
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredNote {
    Full(Note),
    // Older blobs kept only the note text.
    Bare(String),
}

pub fn encode_notes(notes: &[Note]) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(notes)
}

// Only a non-sequence blob is an error; bad records are skipped one by one.
pub fn decode_notes(blob: &str) -> Result<Vec<Note>, serde_yaml::Error> {
    if blob.trim().is_empty() {
        return Ok(Vec::new());
    }
    let records: Vec<Value> = serde_yaml::from_str(blob)?;
    let mut notes: Vec<Note> = Vec::with_capacity(records.len());
    for (idx, record) in records.into_iter().enumerate() {
        let mut note = match serde_yaml::from_value::<StoredNote>(record) {
            Ok(StoredNote::Full(note)) => note,
            Ok(StoredNote::Bare(content)) => Note {
                id: String::new(),
                content,
                created_at: None,
            },
            Err(err) => {
                warn!("skipping malformed note record #{}: {}", idx, err);
                continue;
            }
        };
        if note.content.trim().is_empty() {
            warn!("skipping note record #{} with empty content", idx);
            continue;
        }
        if note.id.trim().is_empty() {
            note.id = generate_id(&notes);
        } else if notes.iter().any(|n| n.id == note.id) {
            warn!("skipping note record #{}: duplicate id {}", idx, note.id);
            continue;
        }
        notes.push(note);
    }
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, content: &str) -> Note {
        Note {
            id: id.into(),
            content: content.into(),
            created_at: None,
        }
    }

    #[test]
    fn validate_content_trims_and_rejects_blank() {
        assert_eq!(validate_content("  hi there \n").unwrap(), "hi there");
        assert_eq!(validate_content("a\nb").unwrap(), "a\nb");
        assert!(matches!(validate_content(""), Err(NoteError::EmptyContent)));
        assert!(matches!(
            validate_content(" \t\n "),
            Err(NoteError::EmptyContent)
        ));
    }

    #[test]
    fn generated_ids_avoid_existing() {
        let mut notes = Vec::new();
        for _ in 0..200 {
            let id = generate_id(&notes);
            assert_eq!(id.len(), ID_LEN);
            assert!(!notes.iter().any(|n: &Note| n.id == id));
            notes.push(note(&id, "x"));
        }
    }

    #[test]
    fn encoded_collection_decodes_to_same_notes() {
        let mut stamped = Note::new("abc".into(), "multi\nline".into());
        stamped.created_at = Some(Utc::now());
        let notes = vec![stamped, note("123", "plain")];
        let blob = encode_notes(&notes).unwrap();
        assert!(blob.contains("createdAt"));
        assert_eq!(decode_notes(&blob).unwrap(), notes);
    }

    #[test]
    fn decodes_json_array_blob() {
        let blob = r#"[{"id":"1700000000001","content":"Walk dog"},{"id":"1700000000000","content":"Buy milk"}]"#;
        let notes = decode_notes(blob).unwrap();
        assert_eq!(
            notes,
            vec![
                note("1700000000001", "Walk dog"),
                note("1700000000000", "Buy milk")
            ]
        );
    }

    #[test]
    fn keeps_note_whose_created_at_is_unreadable() {
        let blob = r#"[{"id":"1","content":"Buy milk","createdAt":"10/19/2026, 3:04:05 PM"},{"id":"2","content":"Walk dog"}]"#;
        let notes = decode_notes(blob).unwrap();
        assert_eq!(notes, vec![note("1", "Buy milk"), note("2", "Walk dog")]);
    }

    #[test]
    fn reads_created_at_as_rfc3339_or_epoch_millis() {
        let blob = "- id: a\n  content: x\n  createdAt: 2026-10-19T15:04:05Z\n- id: b\n  content: y\n  createdAt: 1700000000000\n- id: c\n  content: z\n  createdAt: [1, 2]\n- id: d\n  content: w\n  createdAt: null\n";
        let notes = decode_notes(blob).unwrap();
        assert_eq!(notes.len(), 4);
        assert_eq!(
            notes[0].created_at,
            Some(Utc.with_ymd_and_hms(2026, 10, 19, 15, 4, 5).unwrap())
        );
        assert_eq!(
            notes[1].created_at,
            Utc.timestamp_millis_opt(1_700_000_000_000).single()
        );
        assert_eq!(notes[2].created_at, None);
        assert_eq!(notes[3].created_at, None);
    }

    #[test]
    fn decodes_bare_string_records_with_fresh_ids() {
        let notes = decode_notes(r#"["first", "second"]"#).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].content, "first");
        assert_eq!(notes[1].content, "second");
        assert_ne!(notes[0].id, notes[1].id);
        assert!(notes.iter().all(|n| n.created_at.is_none()));
    }

    #[test]
    fn skips_bad_blank_and_duplicate_records() {
        let blob = "- id: a\n  content: keep\n- id: b\n  content: '   '\n- nope: 1\n- id: a\n  content: dup\n- id: c\n  content: also keep\n";
        let notes = decode_notes(blob).unwrap();
        assert_eq!(notes, vec![note("a", "keep"), note("c", "also keep")]);
    }

    #[test]
    fn empty_blob_is_empty_collection() {
        assert!(decode_notes("").unwrap().is_empty());
        assert!(decode_notes("  \n").unwrap().is_empty());
        assert!(decode_notes("[]").unwrap().is_empty());
    }

    #[test]
    fn non_sequence_blob_is_an_error() {
        assert!(decode_notes("{not valid").is_err());
        assert!(decode_notes("just: a map").is_err());
    }
}
