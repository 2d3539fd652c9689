//! Interaction modes of the browser screen

use super::text_input::TextInput;
use crate::format::format_path;
use crate::tree::PathKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    Renaming { target: PathKey, input: TextInput },
    EditingValue { target: PathKey, input: TextInput },
    InsertingBucket { parent: PathKey, input: TextInput },
    InsertingPairKey { parent: PathKey, input: TextInput },
    ConfirmingDelete { target: PathKey },
    ExportingValue { target: PathKey, input: TextInput },
    ExportingJson { target: PathKey, input: TextInput },
    Filtering { input: TextInput },
    Help,
}

fn last_name(path: &PathKey) -> &str {
    path.last().unwrap_or_default()
}

fn insert_title(prefix: &str, parent: &PathKey) -> String {
    if parent.is_empty() {
        return "Create Root Bucket".to_string();
    }
    format!("{}{} → ", prefix, format_path(parent))
}

impl Mode {
    /// Modes whose keys go into a text buffer.
    pub fn is_text_entry(&self) -> bool {
        self.input().is_some()
    }

    pub fn input(&self) -> Option<&TextInput> {
        match self {
            Mode::Renaming { input, .. }
            | Mode::EditingValue { input, .. }
            | Mode::InsertingBucket { input, .. }
            | Mode::InsertingPairKey { input, .. }
            | Mode::ExportingValue { input, .. }
            | Mode::ExportingJson { input, .. }
            | Mode::Filtering { input } => Some(input),
            Mode::Browsing | Mode::ConfirmingDelete { .. } | Mode::Help => None,
        }
    }

    pub fn input_mut(&mut self) -> Option<&mut TextInput> {
        match self {
            Mode::Renaming { input, .. }
            | Mode::EditingValue { input, .. }
            | Mode::InsertingBucket { input, .. }
            | Mode::InsertingPairKey { input, .. }
            | Mode::ExportingValue { input, .. }
            | Mode::ExportingJson { input, .. }
            | Mode::Filtering { input } => Some(input),
            Mode::Browsing | Mode::ConfirmingDelete { .. } | Mode::Help => None,
        }
    }

    /// Modal title, or `None` when no modal is shown.
    pub fn title(&self) -> Option<String> {
        let title = match self {
            Mode::Browsing | Mode::Help => return None,
            Mode::Renaming { target, .. } => format!("Rename '{}' to:", last_name(target)),
            Mode::EditingValue { target, .. } => {
                format!("Input new value for '{}'", last_name(target))
            }
            Mode::InsertingBucket { parent, .. } => insert_title("New Bucket: ", parent),
            Mode::InsertingPairKey { parent, .. } => insert_title("New Pair: ", parent),
            Mode::ConfirmingDelete { target } => format!("Delete '{}'?", last_name(target)),
            Mode::ExportingValue { target, .. } => {
                format!("Export value of '{}' to:", last_name(target))
            }
            Mode::ExportingJson { target, .. } => {
                format!("Export JSON of '{}' to:", last_name(target))
            }
            Mode::Filtering { .. } => "Filter".to_string(),
        };
        Some(title)
    }
}
