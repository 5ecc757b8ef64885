use std::collections::BTreeMap;

use serde::Serialize;

use crate::tree::GenericNode;

// Key holding an element's own text when it also has attributes or children
pub const VALUE_KEY: &str = "value";

pub const NAMESPACE_ATTRIBUTES: [&str; 3] = ["xmlns", "xmlns:xsi", "xsi:schemaLocation"];

/// The normalized form of a response.
///
/// Serializes to plain JSON: strings, arrays and objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CanonicalRecord {
    Text(String),
    List(Vec<CanonicalRecord>),
    Record(BTreeMap<String, CanonicalRecord>),
}

impl CanonicalRecord {
    // Field of a record; lists are looked through via their first element
    pub fn get(&self, key: &str) -> Option<&CanonicalRecord> {
        match self.first()? {
            CanonicalRecord::Record(fields) => fields.get(key),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CanonicalRecord::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[CanonicalRecord]> {
        match self {
            CanonicalRecord::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&BTreeMap<String, CanonicalRecord>> {
        match self.first()? {
            CanonicalRecord::Record(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn first(&self) -> Option<&CanonicalRecord> {
        match self {
            CanonicalRecord::List(items) => items.first(),
            other => Some(other),
        }
    }

    pub fn path(&self, keys: &[&str]) -> Option<&CanonicalRecord> {
        keys.iter()
            .try_fold(self, |record, key| record.get(key))?
            .first()
    }

    // Every element, whether the field was collapsed to one value or not
    pub fn items(&self) -> &[CanonicalRecord] {
        match self {
            CanonicalRecord::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        // untagged strings, sequences and string-keyed maps always convert
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

pub trait Normalizer {
    fn normalize(&self, node: &GenericNode) -> CanonicalRecord;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeNormalizer;

impl Normalizer for TreeNormalizer {
    fn normalize(&self, node: &GenericNode) -> CanonicalRecord {
        normalize(node)
    }
}

/// Reshape a parsed element into a record.
///
/// Attributes, child elements and the element's own text share one key
/// space. When names collide, a child element shadows an attribute of the
/// same name, and the text always owns [`VALUE_KEY`] over both.
pub fn normalize(node: &GenericNode) -> CanonicalRecord {
    match node {
        GenericNode::Leaf(text) => CanonicalRecord::Text(text.clone()),
        GenericNode::Element {
            attributes,
            children,
            text,
        } => {
            let mut fields: BTreeMap<String, CanonicalRecord> = attributes
                .iter()
                .map(|(key, value)| (key.clone(), CanonicalRecord::Text(value.clone())))
                .collect();
            // children shadow attributes
            for (tag, nodes) in children {
                fields.insert(tag.clone(), normalize_list(nodes));
            }
            // the text slot wins `value` last
            if let Some(text) = text {
                fields.insert(VALUE_KEY.to_string(), CanonicalRecord::Text(text.clone()));
            }
            CanonicalRecord::Record(fields)
        }
    }
}

pub fn normalize_list(nodes: &[GenericNode]) -> CanonicalRecord {
    collapse_singleton(nodes)
        .unwrap_or_else(|| CanonicalRecord::List(nodes.iter().map(normalize).collect()))
}

/// A one-element array whose element is bare stands for that element alone.
pub fn collapse_singleton(nodes: &[GenericNode]) -> Option<CanonicalRecord> {
    match nodes {
        [only] if only.is_bare() => Some(normalize(only)),
        _ => None,
    }
}

pub fn strip_namespace_attributes(record: CanonicalRecord) -> CanonicalRecord {
    match record {
        CanonicalRecord::Record(mut fields) => {
            for attribute in NAMESPACE_ATTRIBUTES {
                fields.remove(attribute);
            }
            CanonicalRecord::Record(fields)
        }
        other => other,
    }
}
