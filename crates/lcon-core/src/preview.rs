//! Preview — the listing produced by a successful extraction trial.

use serde::Serialize;

/// One extracted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewEntry {
    pub name: String,
    pub value: String,
}

/// Ordered name/value listing of the fields a trial extracted.
///
/// There is no empty `Preview`: a trial without matches yields `None` from
/// [`Preview::from_matches`], which hosts render as "no preview".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    entries: Vec<PreviewEntry>,
}

impl Preview {
    /// Build a preview from the matches returned by the extraction tester,
    /// keeping their iteration order. String values are taken verbatim, any
    /// other JSON value is rendered as JSON text.
    pub fn from_matches<I>(matches: I) -> Option<Self>
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        let entries: Vec<PreviewEntry> = matches
            .into_iter()
            .map(|(name, value)| PreviewEntry {
                name,
                value: match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                },
            })
            .collect();

        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    pub fn entries(&self) -> &[PreviewEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }

    /// Definition-list style text: the field name, then its value indented.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.name);
            out.push('\n');
            out.push_str("    ");
            out.push_str(&entry.value);
            out.push('\n');
        }
        out
    }
}
