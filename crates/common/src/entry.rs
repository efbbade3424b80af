//! Typed secret entries and the wire envelope they travel in.
//!
//! The set of entry types is a closed family keyed by a string tag. An
//! [`EntryRecord`] is the JSON value that actually gets encrypted: the tag
//! plus the JSON encoding of the type-specific fields. The server never
//! observes either.

use std::path::Path;

use serde::{Deserialize, Serialize};

pub const TEXT_TAG: &str = "text";
pub const AUTH_TAG: &str = "auth";
pub const CARD_TAG: &str = "card";
pub const BINARY_TAG: &str = "binary";

/// Catalog shown by the CLI when asked for available types.
pub const TYPE_CATALOG: &str = "Available entry types:
- text: simple text data
- auth: login/password for a website or service
- card: credit card data
- binary: small binary file";

#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("unknown entry type: {0}")]
    UnknownType(String),
    #[error("entry json failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Wire envelope: `{type, data}` where `data` is the JSON bytes of the
/// typed field set, carried as base64 inside the outer JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRecord {
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextData {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthData {
    pub name: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    pub name: String,
    pub number: String,
    pub date: String,
    pub cvc: String,
    pub holder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryData {
    pub name: String,
    pub filename: String,
    #[serde(with = "base64_bytes")]
    pub content: Vec<u8>,
}

/// The closed family of secret formats Keepsake understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Text(TextData),
    Auth(AuthData),
    Card(CardData),
    Binary(BinaryData),
}

impl Entry {
    /// Tag used on the wire.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Entry::Text(_) => TEXT_TAG,
            Entry::Auth(_) => AUTH_TAG,
            Entry::Card(_) => CARD_TAG,
            Entry::Binary(_) => BINARY_TAG,
        }
    }

    /// Human-readable type label.
    pub fn type_label(&self) -> &'static str {
        match self {
            Entry::Text(_) => "TextData",
            Entry::Auth(_) => "AuthData",
            Entry::Card(_) => "CreditCard",
            Entry::Binary(_) => "BinaryFile",
        }
    }

    /// Entry title shown in listings.
    pub fn name(&self) -> String {
        match self {
            Entry::Text(d) => d.name.clone(),
            Entry::Auth(d) => d.name.clone(),
            Entry::Card(d) => d.name.clone(),
            Entry::Binary(d) => format!("{} ({})", d.name, d.filename),
        }
    }

    /// Render the entry body.
    ///
    /// A binary entry is "rendered" by restoring the file it carries: the
    /// content is written back under its original file name, but only if no
    /// file with that name exists yet.
    pub fn content(&self) -> String {
        match self {
            Entry::Text(d) => d.content.clone(),
            Entry::Auth(d) => format!("Username: {}\nPassword: {}\n", d.username, d.password),
            Entry::Card(d) => format!(
                "Number: {}\nDate: {}\nCVC: {}\nHolder: {}\n",
                d.number, d.date, d.cvc, d.holder
            ),
            Entry::Binary(d) => {
                if Path::new(&d.filename).exists() {
                    return format!("ERROR: file `{}` already exists", d.filename);
                }
                match std::fs::write(&d.filename, &d.content) {
                    Ok(()) => format!("File `{}` successfully saved", d.filename),
                    Err(_) => "ERROR: write file failed".to_string(),
                }
            }
        }
    }

    /// Full human-readable rendering used by the `get` op.
    pub fn summary(&self) -> String {
        format!(
            "Type: {}\nName: {}\n{}",
            self.type_label(),
            self.name(),
            self.content()
        )
    }

    /// Pack the entry into wire envelope JSON, ready for encryption.
    pub fn encode(&self) -> Result<Vec<u8>, EntryError> {
        let data = match self {
            Entry::Text(d) => serde_json::to_vec(d)?,
            Entry::Auth(d) => serde_json::to_vec(d)?,
            Entry::Card(d) => serde_json::to_vec(d)?,
            Entry::Binary(d) => serde_json::to_vec(d)?,
        };
        let record = EntryRecord {
            type_tag: self.type_tag().to_string(),
            data,
        };
        Ok(serde_json::to_vec(&record)?)
    }

    /// Decode decrypted wire envelope JSON back into a typed entry.
    ///
    /// Dispatch is a fixed registry over the known tags; anything else is
    /// [`EntryError::UnknownType`], never silently ignored.
    pub fn decode(plaintext: &[u8]) -> Result<Self, EntryError> {
        let record: EntryRecord = serde_json::from_slice(plaintext)?;
        match record.type_tag.as_str() {
            TEXT_TAG => Ok(Entry::Text(serde_json::from_slice(&record.data)?)),
            AUTH_TAG => Ok(Entry::Auth(serde_json::from_slice(&record.data)?)),
            CARD_TAG => Ok(Entry::Card(serde_json::from_slice(&record.data)?)),
            BINARY_TAG => Ok(Entry::Binary(serde_json::from_slice(&record.data)?)),
            other => Err(EntryError::UnknownType(other.to_string())),
        }
    }
}

/// Serde adapter carrying byte strings as base64 inside JSON.
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_entry_round_trip() {
        let entry = Entry::Text(TextData {
            name: "note".into(),
            content: "hello".into(),
        });

        let bytes = entry.encode().unwrap();
        let decoded = Entry::decode(&bytes).unwrap();
        assert_eq!(decoded, entry);
        assert_eq!(decoded.type_tag(), TEXT_TAG);
        assert_eq!(decoded.name(), "note");
    }

    #[test]
    fn auth_entry_renders_credentials() {
        let entry = Entry::Auth(AuthData {
            name: "example.com".into(),
            username: "user".into(),
            password: "hunter2".into(),
        });

        let summary = entry.summary();
        assert!(summary.starts_with("Type: AuthData\nName: example.com\n"));
        assert!(summary.contains("Username: user"));
        assert!(summary.contains("Password: hunter2"));
    }

    #[test]
    fn card_entry_round_trip() {
        let entry = Entry::Card(CardData {
            name: "visa".into(),
            number: "4111111111111111".into(),
            date: "12/30".into(),
            cvc: "123".into(),
            holder: "J DOE".into(),
        });

        let decoded = Entry::decode(&entry.encode().unwrap()).unwrap();
        assert_eq!(decoded, entry);
        assert_eq!(decoded.type_label(), "CreditCard");
    }

    #[test]
    fn binary_entry_name_includes_filename() {
        let entry = Entry::Binary(BinaryData {
            name: "backup".into(),
            filename: "id_ed25519".into(),
            content: vec![1, 2, 3],
        });
        assert_eq!(entry.name(), "backup (id_ed25519)");
    }

    #[test]
    fn binary_content_restores_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restored.bin");
        let entry = Entry::Binary(BinaryData {
            name: "backup".into(),
            filename: path.to_string_lossy().into_owned(),
            content: vec![7, 7, 7],
        });

        assert!(entry.content().contains("successfully saved"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![7, 7, 7]);

        // A second restore must not clobber the existing file.
        assert!(entry.content().contains("already exists"));
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let record = EntryRecord {
            type_tag: "totp".into(),
            data: b"{}".to_vec(),
        };
        let bytes = serde_json::to_vec(&record).unwrap();

        match Entry::decode(&bytes) {
            Err(EntryError::UnknownType(tag)) => assert_eq!(tag, "totp"),
            other => panic!("expected UnknownType, got {:?}", other),
        }
    }

    #[test]
    fn garbage_json_is_an_error() {
        assert!(matches!(
            Entry::decode(b"not json"),
            Err(EntryError::Json(_))
        ));
    }

    #[test]
    fn wire_envelope_data_is_base64() {
        let entry = Entry::Text(TextData {
            name: "n".into(),
            content: "c".into(),
        });
        let value: serde_json::Value = serde_json::from_slice(&entry.encode().unwrap()).unwrap();
        assert_eq!(value["type"], "text");
        assert!(value["data"].is_string());
    }
}
