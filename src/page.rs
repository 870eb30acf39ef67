//! Page-level data carried through a save: block records, theme, and the
//! payload handed to the host sink.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which a block stores its type tag.
pub const TYPE_KEY: &str = "_type";
/// Key under which a block stores its identifier.
pub const ID_KEY: &str = "_id";

/// A single typed content node of the authored page tree.
///
/// Blocks are owned by the host's block-tree collaborator; the pipeline only
/// reads them. The shape is an opaque JSON object with at least a `_type` tag
/// and an `_id`, plus translation-suffixed fields (`"{field}-{lang}"`) for
/// localizable properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockRecord(pub Map<String, Value>);

impl BlockRecord {
    /// Create a block with the given type tag and id.
    pub fn new(block_type: impl Into<String>, id: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(TYPE_KEY.to_string(), Value::String(block_type.into()));
        fields.insert(ID_KEY.to_string(), Value::String(id.into()));
        Self(fields)
    }

    /// Builder-style field setter, mostly useful for hosts and tests.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// The block's type tag, if present.
    pub fn block_type(&self) -> Option<&str> {
        self.0.get(TYPE_KEY).and_then(Value::as_str)
    }

    /// The block's identifier, if present.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_KEY).and_then(Value::as_str)
    }

    /// Look up an arbitrary field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

/// Point-in-time read of the block tree, as returned by
/// [`Host::page_data`](crate::Host::page_data). Not a transactional snapshot:
/// concurrent edits after the read are simply not reflected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageData {
    pub blocks: Vec<BlockRecord>,
}

/// Opaque descriptor of the active visual theme. The pipeline passes it
/// through to the exporter and the sink without interpreting it.
pub type ThemeDescriptor = Value;

/// The immutable bundle assembled once per save execution and handed to the
/// host sink exactly once. Serializes with camelCase keys; absent optional
/// parts are omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    /// Whether this save was triggered by an autosave path.
    pub auto_save: bool,
    /// Block records in original tree order.
    pub blocks: Vec<BlockRecord>,
    /// Active theme at the time of the save.
    pub theme: ThemeDescriptor,
    /// Whether any localizable field lacks a translation for the active
    /// language.
    pub need_translations: bool,
    /// Static HTML export of the block tree. Absent on autosave paths, which
    /// skip the export step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dom_elements: Option<String>,
    /// PNG data URI of the capture surface, when a screenshot could be taken.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

/// An image file handed to [`Host::upload_image`](crate::Host::upload_image).
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_accessors() {
        let block = BlockRecord::new("Heading", "h1").with_field("content", "Hello");
        assert_eq!(block.block_type(), Some("Heading"));
        assert_eq!(block.id(), Some("h1"));
        assert_eq!(block.field("content"), Some(&Value::String("Hello".into())));
        assert_eq!(block.field("missing"), None);
    }

    #[test]
    fn block_without_type_tag() {
        let block = BlockRecord::default();
        assert_eq!(block.block_type(), None);
        assert_eq!(block.id(), None);
    }

    #[test]
    fn block_round_trips_as_plain_json_object() {
        let block = BlockRecord::new("Image", "img-1").with_field("url", "https://a/b.png");
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["_type"], "Image");
        assert_eq!(json["url"], "https://a/b.png");
        let back: BlockRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn payload_serializes_camel_case_and_omits_absent_parts() {
        let payload = SavePayload {
            auto_save: true,
            blocks: vec![BlockRecord::new("Text", "t1")],
            theme: serde_json::json!({"primary": "#336699"}),
            need_translations: false,
            dom_elements: None,
            screenshot: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["autoSave"], true);
        assert_eq!(json["needTranslations"], false);
        assert_eq!(json["blocks"].as_array().unwrap().len(), 1);
        assert!(json.get("domElements").is_none());
        assert!(json.get("screenshot").is_none());
    }

    #[test]
    fn payload_includes_optional_parts_when_present() {
        let payload = SavePayload {
            auto_save: false,
            blocks: vec![],
            theme: Value::Null,
            need_translations: true,
            dom_elements: Some("<main></main>".into()),
            screenshot: Some("data:image/png;base64,AAAA".into()),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["domElements"], "<main></main>");
        assert_eq!(json["screenshot"], "data:image/png;base64,AAAA");
    }
}
