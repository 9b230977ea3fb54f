//! Forest service
//!
//! Loads flat records from JSON, builds the forest and derives path labels
//! with the options from [`Settings`].

use std::fs;
use std::io::Read;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{search, Forest, InputRecord, LabeledNode, PathLabeler, TreeBuilder};

/// Service for turning record lists into labelled forests.
pub struct ForestService {
    settings: Settings,
}

impl ForestService {
    /// Create a new forest service.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn builder(&self) -> TreeBuilder {
        TreeBuilder::new()
            .with_cycle_policy(self.settings.cycle_policy)
            .with_sibling_order(self.settings.sibling_order)
    }

    pub fn labeler(&self) -> PathLabeler {
        PathLabeler::new(self.settings.separator.clone())
    }

    /// Read and decode records from a JSON file.
    #[instrument(level = "debug", skip(self))]
    pub fn load_path(&self, path: &Path) -> ApplicationResult<Vec<InputRecord>> {
        let content = fs::read_to_string(path).with_path_context("read input", path)?;
        let value: Value = serde_json::from_str(&content).map_err(|e| ApplicationError::Input {
            message: format!("parse {}: {}", path.display(), e),
        })?;
        self.decode(&value)
    }

    /// Read and decode records from any reader (stdin for the CLI).
    pub fn load_reader(&self, mut reader: impl Read) -> ApplicationResult<Vec<InputRecord>> {
        let mut content = String::new();
        reader.read_to_string(&mut content).with_context("read input")?;
        let value: Value = serde_json::from_str(&content).map_err(|e| ApplicationError::Input {
            message: format!("parse input: {}", e),
        })?;
        self.decode(&value)
    }

    /// Decode a JSON array of records, or an API envelope holding the
    /// array under `"objects"`.
    pub fn decode(&self, value: &Value) -> ApplicationResult<Vec<InputRecord>> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(map) => match map.get("objects") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(ApplicationError::Input {
                        message: "object input must hold an \"objects\" array".into(),
                    })
                }
            },
            _ => {
                return Err(ApplicationError::Input {
                    message: "expected a JSON array of records".into(),
                })
            }
        };

        let records = items
            .iter()
            .enumerate()
            .map(|(pos, item)| InputRecord::from_json(pos, item, &self.settings.fields))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("decoded {} records", records.len());
        Ok(records)
    }

    pub fn build(&self, records: Vec<InputRecord>) -> ApplicationResult<Forest<InputRecord>> {
        Ok(self.builder().build(records)?)
    }

    pub fn labels<'a>(&self, forest: &'a Forest<InputRecord>) -> Vec<LabeledNode<'a, InputRecord>> {
        self.labeler().label_paths(forest)
    }

    /// Labelled nodes whose title matches `pattern`, honouring the configured
    /// minimum pattern length.
    pub fn search<'l, 'a>(
        &self,
        labeled: &'l [LabeledNode<'a, InputRecord>],
        pattern: &str,
    ) -> Vec<&'l LabeledNode<'a, InputRecord>> {
        search::filter(labeled, pattern, self.settings.search_min_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordId;
    use serde_json::json;

    #[test]
    fn given_api_envelope_when_decoding_then_reads_objects() {
        let service = ForestService::new(Settings::default());
        let records = service
            .decode(&json!({"meta": {}, "objects": [{"id": 1, "title": "Africa"}]}))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, RecordId::Int(1));
    }

    #[test]
    fn given_scalar_input_when_decoding_then_errors() {
        let service = ForestService::new(Settings::default());
        let result = service.decode(&json!(42));
        assert!(matches!(result, Err(ApplicationError::Input { .. })));
    }
}
