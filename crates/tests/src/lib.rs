//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约常量快照 (field number / label)
//! - 配置 -> channel -> 文件 的端到端输出
//! - 二进制输出与容器序列化的等价性

#[cfg(test)]
mod contract_tests {
    use contracts::{OutputFormat, RecordKind};

    #[test]
    fn test_field_numbers_are_frozen() {
        let table: Vec<(u32, &str)> = RecordKind::ALL
            .iter()
            .map(|kind| (kind.field_number(), kind.label()))
            .collect();
        assert_eq!(
            table,
            [
                (1, "artifacts"),
                (2, "actions"),
                (3, "targets"),
                (4, "dep_set_of_files"),
                (5, "configuration"),
                (6, "aspect_descriptors"),
                (7, "rule_classes"),
                (8, "path_fragments"),
            ]
        );
    }

    #[test]
    fn test_format_names_are_frozen() {
        let names: Vec<&str> = OutputFormat::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["proto", "textproto", "jsonproto"]);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::path::Path;

    use config_loader::{ConfigFormat, ConfigLoader, EmitterConfig};
    use contracts::{
        Action, ActionGraphContainer, Artifact, AspectDescriptor, Configuration, DepSetOfFiles,
        KeyValuePair, ParamFile, PathFragment, Record, RecordKind, RuleClass, Target, TextFormat,
    };
    use emitter::{OutputChannel, OutputFormat, SinkOwnership};
    use observability::StatsSummary;
    use prost::Message;
    use tempfile::tempdir;

    /// A small but complete action graph, in the order a producer would
    /// discover it (not container field order)
    fn sample_graph() -> Vec<Record> {
        vec![
            RuleClass {
                id: 1,
                name: "cc_library".to_string(),
            }
            .into(),
            Target {
                id: 1,
                label: "//lib:util".to_string(),
                rule_class_id: 1,
            }
            .into(),
            Configuration {
                id: 1,
                mnemonic: "k8-fastbuild".to_string(),
                platform_name: "k8".to_string(),
                checksum: "abc123".to_string(),
                is_tool: false,
            }
            .into(),
            PathFragment {
                id: 1,
                label: "lib".to_string(),
                parent_id: 0,
            }
            .into(),
            PathFragment {
                id: 2,
                label: "util.cc".to_string(),
                parent_id: 1,
            }
            .into(),
            Artifact {
                id: 1,
                path_fragment_id: 2,
                is_tree_artifact: false,
            }
            .into(),
            DepSetOfFiles {
                id: 1,
                transitive_dep_set_ids: vec![],
                direct_artifact_ids: vec![1],
            }
            .into(),
            AspectDescriptor {
                id: 1,
                name: "//tools:lint.bzl%lint".to_string(),
                parameters: vec![KeyValuePair::new("strict", "true")],
            }
            .into(),
            Action {
                target_id: 1,
                aspect_descriptor_ids: vec![1],
                action_key: "key-1".to_string(),
                mnemonic: "CppCompile".to_string(),
                configuration_id: 1,
                arguments: vec!["gcc".to_string(), "-c".to_string(), "util.cc".to_string()],
                environment_variables: vec![KeyValuePair::new("PATH", "/usr/bin")],
                input_dep_set_ids: vec![1],
                output_ids: vec![2],
                param_files: vec![ParamFile {
                    exec_path: "bazel-out/util.params".to_string(),
                    arguments: vec!["-O2".to_string()],
                }],
                primary_output_id: 2,
                execution_platform: "@local_config_platform//:host".to_string(),
                ..Default::default()
            }
            .into(),
        ]
    }

    fn config_for(format: &str, path: &Path) -> EmitterConfig {
        let content = format!(
            "[output]\nformat = \"{format}\"\npath = \"{}\"\n",
            path.display()
        );
        ConfigLoader::load_from_str(&content, ConfigFormat::Toml).unwrap()
    }

    /// Open the channel from config, emit the sample graph and close
    fn run(format: &str, path: &Path) {
        let config = config_for(format, path);
        let mut channel = config.open_channel().unwrap();
        channel.emit_all(sample_graph()).unwrap();
        assert_eq!(channel.metrics().write_count, sample_graph().len() as u64);
        channel.close().unwrap();
    }

    #[test]
    fn test_e2e_binary_merges_into_container() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aquery.pb");
        run("proto", &path);

        let bytes = fs::read(&path).unwrap();
        let decoded = ActionGraphContainer::decode(bytes.as_slice()).unwrap();

        let mut expected = ActionGraphContainer::default();
        expected.extend(sample_graph());
        assert_eq!(decoded, expected);
        assert_eq!(decoded.path_fragments[1].label, "util.cc");
    }

    #[test]
    fn test_e2e_binary_matches_container_bytes_in_field_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ordered.pb");

        let mut records = sample_graph();
        records.sort_by_key(|r| r.kind().field_number());

        let config = config_for("proto", &path);
        let mut channel = config.open_channel().unwrap();
        channel.emit_all(records.clone()).unwrap();
        // Binary keeps the sink open by default; drop it to release the file
        drop(channel.close().unwrap());

        let mut container = ActionGraphContainer::default();
        container.extend(records);
        assert_eq!(fs::read(&path).unwrap(), container.encode_to_vec());
    }

    #[test]
    fn test_e2e_text_blocks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aquery.txt");
        run("textproto", &path);

        let expected: String = sample_graph()
            .iter()
            .map(|record| format!("{} {{\n{}}}\n", record.label(), record.to_text()))
            .collect();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, expected);
        assert!(text.starts_with("rule_classes {\nid: 1\nname: \"cc_library\"\n}\n"));
        assert!(text.contains("param_files {\n  exec_path: \"bazel-out/util.params\"\n"));
    }

    #[test]
    fn test_e2e_json_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aquery.jsonl");
        run("jsonproto", &path);

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), sample_graph().len());
        assert!(text.ends_with('\n'));

        for (line, record) in lines.iter().zip(sample_graph()) {
            let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(parsed, serde_json::to_value(&record).unwrap());
        }

        let action: serde_json::Value = serde_json::from_str(lines[8]).unwrap();
        assert_eq!(action["mnemonic"], "CppCompile");
        assert_eq!(action["primaryOutputId"], 2);
        assert_eq!(action["paramFiles"][0]["execPath"], "bazel-out/util.params");
        assert!(action.get("discoversInputs").is_none());
    }

    #[test]
    fn test_e2e_append_extends_previous_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("append.jsonl");
        run("jsonproto", &path);

        let content = format!(
            "[output]\nformat = \"jsonproto\"\npath = \"{}\"\nappend = true\n",
            path.display()
        );
        let config = ConfigLoader::load_from_str(&content, ConfigFormat::Toml).unwrap();
        let mut channel = config.open_channel().unwrap();
        channel.emit(RuleClass {
            id: 2,
            name: "genrule".to_string(),
        })
        .unwrap();
        channel.close().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), sample_graph().len() + 1);
        assert!(text.ends_with("{\"id\":2,\"name\":\"genrule\"}\n"));
    }

    #[test]
    fn test_e2e_metrics_match_file_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sized.txt");

        let config = config_for("textproto", &path);
        let mut channel = config.open_channel().unwrap();
        channel.emit_all(sample_graph()).unwrap();

        let snapshot = channel.metrics();
        let sizes: StatsSummary = snapshot.record_size.clone();
        assert_eq!(sizes.count, sample_graph().len() as u64);
        assert_eq!(snapshot.count(RecordKind::PathFragment), 2);
        assert_eq!(snapshot.failure_count, 0);
        channel.close().unwrap();

        let len = fs::metadata(&path).unwrap().len();
        assert_eq!(snapshot.bytes_written, len);
    }

    #[test]
    fn test_e2e_file_run_matches_in_memory_channel() {
        let dir = tempdir().unwrap();
        for format in OutputFormat::ALL {
            let path = dir.path().join(format!("graph.{format}"));
            run(format.name(), &path);

            let mut channel =
                OutputChannel::with_ownership(format, SinkOwnership::Retain, Vec::new());
            channel.emit_all(sample_graph()).unwrap();
            let in_memory = channel.close().unwrap().unwrap();

            assert_eq!(fs::read(&path).unwrap(), in_memory, "format {format}");
        }
    }

    #[test]
    fn test_e2e_unopenable_sink() {
        let dir = tempdir().unwrap();
        // The directory itself is not a writable file
        let config = config_for("textproto", dir.path());
        assert!(config.open_channel().is_err());
    }
}
