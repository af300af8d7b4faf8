//! Editor folder classification

use std::fmt;

/// Export subtree a hash list row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EditorFolder {
    /// Character models (`CharacterEditor`)
    CharacterEditor,
    /// Everything else (`FieldEditor4`)
    FieldEditor4,
}

impl EditorFolder {
    /// Classify a `kidsobjdb` database key.
    ///
    /// `CharacterEditor` iff the key starts with that exact, case-sensitive
    /// string; every other key is `FieldEditor4`.
    pub fn classify(database_key: &str) -> Self {
        if database_key.starts_with(Self::CharacterEditor.as_str()) {
            Self::CharacterEditor
        } else {
            Self::FieldEditor4
        }
    }

    /// Directory name in the export tree
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CharacterEditor => "CharacterEditor",
            Self::FieldEditor4 => "FieldEditor4",
        }
    }

    /// Both folders, in export order
    pub fn all() -> [Self; 2] {
        [Self::CharacterEditor, Self::FieldEditor4]
    }
}

impl fmt::Display for EditorFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
