//! Action graph messages (`analysis_v2` schema)
//!
//! Hand-maintained prost messages. Tags must stay in sync with the schema the
//! downstream parsers use; they are never renumbered.
//!
//! Serde output is the canonical proto3 JSON form: lowerCamelCase names and
//! default values omitted.

use serde::Serialize;

use crate::Record;

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Result container whose repeated fields the emitted records populate
#[derive(Clone, PartialEq, prost::Message)]
pub struct ActionGraphContainer {
    #[prost(message, repeated, tag = "1")]
    pub artifacts: Vec<Artifact>,
    #[prost(message, repeated, tag = "2")]
    pub actions: Vec<Action>,
    #[prost(message, repeated, tag = "3")]
    pub targets: Vec<Target>,
    #[prost(message, repeated, tag = "4")]
    pub dep_set_of_files: Vec<DepSetOfFiles>,
    #[prost(message, repeated, tag = "5")]
    pub configuration: Vec<Configuration>,
    #[prost(message, repeated, tag = "6")]
    pub aspect_descriptors: Vec<AspectDescriptor>,
    #[prost(message, repeated, tag = "7")]
    pub rule_classes: Vec<RuleClass>,
    #[prost(message, repeated, tag = "8")]
    pub path_fragments: Vec<PathFragment>,
}

impl ActionGraphContainer {
    /// Append a record to the repeated field it belongs to
    pub fn push(&mut self, record: Record) {
        match record {
            Record::Artifact(m) => self.artifacts.push(m),
            Record::Action(m) => self.actions.push(m),
            Record::Target(m) => self.targets.push(m),
            Record::DepSetOfFiles(m) => self.dep_set_of_files.push(m),
            Record::Configuration(m) => self.configuration.push(m),
            Record::AspectDescriptor(m) => self.aspect_descriptors.push(m),
            Record::RuleClass(m) => self.rule_classes.push(m),
            Record::PathFragment(m) => self.path_fragments.push(m),
        }
    }
}

impl Extend<Record> for ActionGraphContainer {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        for record in iter {
            self.push(record);
        }
    }
}

/// Output or input file of an action
#[derive(Clone, PartialEq, Eq, Hash, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[prost(uint32, tag = "1")]
    #[serde(skip_serializing_if = "is_default")]
    pub id: u32,
    #[prost(uint32, tag = "2")]
    #[serde(skip_serializing_if = "is_default")]
    pub path_fragment_id: u32,
    #[prost(bool, tag = "3")]
    #[serde(skip_serializing_if = "is_default")]
    pub is_tree_artifact: bool,
}

/// A single action in the graph
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[prost(uint32, tag = "1")]
    #[serde(skip_serializing_if = "is_default")]
    pub target_id: u32,
    #[prost(uint32, repeated, tag = "2")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aspect_descriptor_ids: Vec<u32>,
    #[prost(string, tag = "3")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub action_key: String,
    #[prost(string, tag = "4")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mnemonic: String,
    #[prost(uint32, tag = "5")]
    #[serde(skip_serializing_if = "is_default")]
    pub configuration_id: u32,
    #[prost(string, repeated, tag = "6")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    #[prost(message, repeated, tag = "7")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub environment_variables: Vec<KeyValuePair>,
    #[prost(uint32, repeated, tag = "8")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub input_dep_set_ids: Vec<u32>,
    #[prost(uint32, repeated, tag = "9")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub output_ids: Vec<u32>,
    #[prost(bool, tag = "10")]
    #[serde(skip_serializing_if = "is_default")]
    pub discovers_inputs: bool,
    #[prost(message, repeated, tag = "11")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub execution_info: Vec<KeyValuePair>,
    #[prost(message, repeated, tag = "12")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub param_files: Vec<ParamFile>,
    #[prost(uint32, tag = "13")]
    #[serde(skip_serializing_if = "is_default")]
    pub primary_output_id: u32,
    #[prost(string, tag = "14")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub execution_platform: String,
    #[prost(string, tag = "15")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub template_content: String,
    #[prost(message, repeated, tag = "16")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub substitutions: Vec<KeyValuePair>,
    #[prost(string, tag = "17")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file_contents: String,
    #[prost(string, tag = "18")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub unresolved_symlink_target: String,
    #[prost(bool, tag = "19")]
    #[serde(skip_serializing_if = "is_default")]
    pub is_executable: bool,
}

/// Build target that owns actions
#[derive(Clone, PartialEq, Eq, Hash, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    #[prost(uint32, tag = "1")]
    #[serde(skip_serializing_if = "is_default")]
    pub id: u32,
    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[prost(uint32, tag = "3")]
    #[serde(skip_serializing_if = "is_default")]
    pub rule_class_id: u32,
}

/// Rule class of a target, e.g. `cc_library`
#[derive(Clone, PartialEq, Eq, Hash, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleClass {
    #[prost(uint32, tag = "1")]
    #[serde(skip_serializing_if = "is_default")]
    pub id: u32,
    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// Aspect applied on top of a target
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectDescriptor {
    #[prost(uint32, tag = "1")]
    #[serde(skip_serializing_if = "is_default")]
    pub id: u32,
    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[prost(message, repeated, tag = "3")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<KeyValuePair>,
}

/// Nested set of artifacts.
///
/// Transitive sets are referenced by id; the expansion is left to readers.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepSetOfFiles {
    #[prost(uint32, tag = "1")]
    #[serde(skip_serializing_if = "is_default")]
    pub id: u32,
    #[prost(uint32, repeated, tag = "2")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transitive_dep_set_ids: Vec<u32>,
    #[prost(uint32, repeated, tag = "3")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub direct_artifact_ids: Vec<u32>,
}

/// Build configuration an action runs under
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[prost(uint32, tag = "1")]
    #[serde(skip_serializing_if = "is_default")]
    pub id: u32,
    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mnemonic: String,
    #[prost(string, tag = "3")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub platform_name: String,
    #[prost(string, tag = "4")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub checksum: String,
    #[prost(bool, tag = "5")]
    #[serde(skip_serializing_if = "is_default")]
    pub is_tool: bool,
}

/// Path segment; full paths are rebuilt by following `parent_id`
#[derive(Clone, PartialEq, Eq, Hash, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathFragment {
    #[prost(uint32, tag = "1")]
    #[serde(skip_serializing_if = "is_default")]
    pub id: u32,
    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[prost(uint32, tag = "3")]
    #[serde(skip_serializing_if = "is_default")]
    pub parent_id: u32,
}

#[derive(Clone, PartialEq, Eq, Hash, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValuePair {
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Parameter file written for an action's command line
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamFile {
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub exec_path: String,
    #[prost(string, repeated, tag = "2")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_json_omits_defaults() {
        let artifact = Artifact {
            id: 3,
            path_fragment_id: 0,
            is_tree_artifact: false,
        };
        let json = serde_json::to_string(&artifact).unwrap();
        assert_eq!(json, r#"{"id":3}"#);
    }

    #[test]
    fn test_json_uses_camel_case() {
        let target = Target {
            id: 1,
            label: "//pkg:lib".to_string(),
            rule_class_id: 2,
        };
        let json = serde_json::to_string(&target).unwrap();
        assert_eq!(json, r#"{"id":1,"label":"//pkg:lib","ruleClassId":2}"#);
    }

    #[test]
    fn test_empty_message_json() {
        let json = serde_json::to_string(&RuleClass::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_container_push_routes_by_kind() {
        let mut container = ActionGraphContainer::default();
        container.extend([
            Record::from(Target {
                id: 1,
                ..Default::default()
            }),
            Record::from(Artifact {
                id: 2,
                ..Default::default()
            }),
            Record::from(Target {
                id: 3,
                ..Default::default()
            }),
        ]);

        assert_eq!(container.targets.len(), 2);
        assert_eq!(container.artifacts.len(), 1);
        assert_eq!(container.targets[1].id, 3);
    }

    #[test]
    fn test_container_field_tags() {
        let container = ActionGraphContainer {
            actions: vec![Action::default()],
            ..Default::default()
        };
        // field 2, wire type 2, zero-length body
        assert_eq!(container.encode_to_vec(), vec![0x12, 0x00]);
    }
}
