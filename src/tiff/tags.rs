//! EXIF/TIFF tag dictionary
//!
//! Tag names live in `exif_tags.toml` at the crate root. The file is embedded
//! at compile time and parsed once on first lookup.

use std::collections::HashMap;
use lazy_static::lazy_static;
use log::warn;
use crate::tiff::errors::{TiffError, TiffResult};

/// Name reported for tag ids missing from the dictionary
pub const UNKNOWN_TAG_NAME: &str = "(unknown)";

/// Tags whose value is the offset of another IFD
pub const POINTER_TAGS: [&str; 3] = ["ExifIFD", "GPSInfo", "SubIFDs"];

lazy_static! {
    static ref TAG_DEFINITIONS: TagDictionary = {
        let content = include_str!("../../exif_tags.toml");
        TagDictionary::from_str(content).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse EXIF tag definitions: {}", e);
            TagDictionary::default()
        })
    };
}

/// Maps numeric tag ids to symbolic names
#[derive(Debug, Default)]
pub struct TagDictionary {
    tag_names: HashMap<u16, String>,
}

impl TagDictionary {
    /// Parse tag definitions from a TOML string with a `[tag_ids]` table
    pub fn from_str(content: &str) -> TiffResult<Self> {
        let table: toml::Table = content
            .parse()
            .map_err(|e| TiffError::GenericError(format!("Failed to parse TOML: {}", e)))?;

        let mut dictionary = TagDictionary::default();

        if let Some(ids) = table.get("tag_ids").and_then(|v| v.as_table()) {
            for (k, v) in ids {
                match (k.parse::<u16>(), v.as_str()) {
                    (Ok(id), Some(name)) => {
                        dictionary.tag_names.insert(id, name.to_string());
                    }
                    _ => warn!("Skipping malformed tag definition {} = {}", k, v),
                }
            }
        }

        Ok(dictionary)
    }

    /// Get a tag name by id, or `(unknown)`
    pub fn name(&self, tag: u16) -> &str {
        self.tag_names
            .get(&tag)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_TAG_NAME)
    }

    pub fn len(&self) -> usize {
        self.tag_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tag_names.is_empty()
    }
}

/// Get the symbolic name of a tag from the built-in dictionary
pub fn tag_name(tag: u16) -> &'static str {
    TAG_DEFINITIONS.name(tag)
}

/// Number of tags in the built-in dictionary
pub fn known_tag_count() -> usize {
    TAG_DEFINITIONS.len()
}

/// Whether entries with this tag name point at another IFD
pub fn is_pointer_tag(name: &str) -> bool {
    POINTER_TAGS.contains(&name)
}
