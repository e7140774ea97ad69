//! Records produced by the remote tree and stored in the flat index.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::core::config;

/// Viewer URL used when the drive omits `webViewLink` for a file.
pub fn viewer_link(file_id: &str) -> String {
    format!("https://drive.google.com/file/d/{}/view", file_id)
}

/// One child of a remote folder, as returned by a listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveEntry {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: Option<u64>,
    pub link: Option<String>,
}

impl DriveEntry {
    pub fn is_folder(&self) -> bool {
        self.mime_type == config::drive::FOLDER_MIME
    }

    /// Converts a non-folder entry into a file record without type/level tags.
    pub fn into_file_record(self) -> FileRecord {
        let link = match self.link {
            Some(link) if !link.is_empty() => link,
            _ => viewer_link(&self.id),
        };
        FileRecord {
            id: self.id,
            name: self.name,
            link,
            size: self.size.unwrap_or(0),
            kind: None,
            level: None,
        }
    }
}

/// A single page of a paginated listing.
#[derive(Debug, Clone, Default)]
pub struct ChildPage {
    pub entries: Vec<DriveEntry>,
    pub next_page_token: Option<String>,
}

/// A folder seen during folder resolution. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRecord {
    pub id: String,
    pub name: String,
}

/// A file as seen by search callers.
///
/// Live-tree records carry no `type`/`level`; flat index records carry both.
/// `type` stays a free string so drifted tags such as `past_questions_2023`
/// still load and filter.
///
/// Hand-edited or older index files hold `null` ids/links and sizes written
/// as strings; those decode to the defaults instead of failing the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub link: String,
    #[serde(default, deserialize_with = "lenient_size")]
    pub size: u64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeField {
    Bytes(u64),
    Text(String),
    Float(f64),
}

/// Byte count from a number, a numeric string or `null`; anything else is 0.
fn lenient_size<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let size = match Option::<SizeField>::deserialize(deserializer)? {
        Some(SizeField::Bytes(n)) => n,
        Some(SizeField::Text(raw)) => raw.trim().parse().unwrap_or(0),
        Some(SizeField::Float(f)) if f.is_finite() && f >= 0.0 => f as u64,
        Some(SizeField::Float(_)) | None => 0,
    };
    Ok(size)
}

impl FileRecord {
    /// De-duplication key: the link, or the name when the link is empty.
    pub fn dedup_key(&self) -> &str {
        if self.link.is_empty() {
            &self.name
        } else {
            &self.link
        }
    }

    /// Size in megabytes rounded to one decimal, as shown on result buttons.
    pub fn size_mb(&self) -> f64 {
        (self.size as f64 / 1024.0 / 1024.0 * 10.0).round() / 10.0
    }
}

/// Category tag of an index root. Serialized as the tag written into the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum MaterialType {
    Slides,
    Pastq,
    Skill,
    Other,
}

/// Academic year marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
pub enum Level {
    L100,
    L200,
    L300,
    L400,
}

impl Level {
    const TABLE: [(&'static str, Level); 4] = [
        ("100", Level::L100),
        ("200", Level::L200),
        ("300", Level::L300),
        ("400", Level::L400),
    ];

    /// Normalizes free-form level input ("Level 200", "l200", "200") to a label.
    ///
    /// The first of 100..400 found anywhere in the string wins; `None` means
    /// "do not filter by level".
    pub fn normalize(raw: &str) -> Option<Level> {
        let lowered = raw.to_lowercase();
        Self::TABLE
            .iter()
            .find(|(digits, _)| lowered.contains(digits))
            .map(|(_, level)| *level)
    }

    /// Best-effort level tag for a file name, used by the index rebuild.
    pub fn guess_from_name(name: &str) -> Option<Level> {
        Self::normalize(name)
    }
}
