//! End-to-end generation over a process definition fixture.

use std::path::PathBuf;

use regex::Regex;
use serde_json::json;
use taskmodel_codegen::{
    generate_process, parse_definition, CodegenConfig, CodegenContext, CodegenError, ParamType,
    ProcessDefinition, StandardTypeRegistry, TaskModelGenerator, TemplateCatalog, TemplateKind,
};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/orders.yaml")
}

fn definition() -> ProcessDefinition {
    parse_definition(&fixture_path()).expect("fixture parses")
}

#[test]
fn test_process_generation_produces_three_artifacts_per_node() {
    let definition = definition();
    let outcomes = generate_process(
        &definition,
        &StandardTypeRegistry::new(),
        &TemplateCatalog::builtin(),
        &CodegenConfig::default(),
    )
    .unwrap();

    let ids: Vec<_> = outcomes.iter().map(|o| o.node_id.as_str()).collect();
    assert_eq!(ids, vec!["3", "7", "9"]);

    for outcome in &outcomes {
        let artifacts = outcome.result.as_ref().expect("node generates");
        for artifact in artifacts.artifacts() {
            assert_eq!(
                artifact.qualified_name,
                format!("org.acme.orders.tasks.{}", artifact.simple_name)
            );
            assert!(artifact
                .simple_name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_'));
        }
    }

    let ad_hoc: Vec<_> = outcomes.iter().map(|o| o.ad_hoc).collect();
    assert_eq!(ad_hoc, vec![false, true, false]);
}

#[test]
fn test_reserved_names_never_become_fields() {
    let definition = definition();
    let outcomes = generate_process(
        &definition,
        &StandardTypeRegistry::new(),
        &TemplateCatalog::builtin(),
        &CodegenConfig::default(),
    )
    .unwrap();
    let review = outcomes[0].result.as_ref().unwrap();

    for reserved in ["ActorId", "Comment", "Priority", "TaskName"] {
        for artifact in review.artifacts() {
            assert!(
                !artifact.source.contains(&format!(" {reserved};")),
                "{reserved} leaked into {}",
                artifact.simple_name
            );
        }
    }
    assert!(review.input.source.contains("private java.lang.Integer priority;"));
    assert!(!review.input.source.contains("notes"));
    assert!(!review.output.source.contains("priority"));
    assert!(review
        .output
        .source
        .contains("private java.lang.Boolean approved;"));
}

#[test]
fn test_literal_and_reference_sources() {
    let definition = definition();
    let registry = StandardTypeRegistry::new();
    let templates = TemplateCatalog::builtin();
    let config = CodegenConfig::default();
    let process = definition.process_scope(&registry).unwrap();
    let node = definition.node("7").unwrap();
    let local = node.local_scope(&registry).unwrap();
    let spec = definition.task_spec(node);
    let generator = TaskModelGenerator::new(
        &spec,
        CodegenContext {
            local: &local,
            enclosing: &process,
            registry: &registry,
            templates: &templates,
            config: &config,
        },
    )
    .unwrap();

    let fields = generator.input_fields().unwrap();
    let defaults: Vec<_> = fields
        .iter()
        .map(|f| (f.name.as_str(), f.literal_default.clone()))
        .collect();
    assert_eq!(
        defaults,
        vec![
            ("retries", Some(json!(3))),
            ("reason", None),
            ("urgent", Some(json!(true))),
        ]
    );
    assert!(fields.iter().all(|f| f.param_type == ParamType::Input));
}

#[test]
fn test_literal_that_does_not_parse_aborts_node() {
    let mut definition = definition();
    definition.nodes[1]
        .io
        .input_mapping
        .insert("retries".to_string(), Some("three".to_string()));
    let outcomes = generate_process(
        &definition,
        &StandardTypeRegistry::new(),
        &TemplateCatalog::builtin(),
        &CodegenConfig::default(),
    )
    .unwrap();

    match &outcomes[1].result {
        Err(CodegenError::LiteralParse {
            node_id, field, raw, ..
        }) => {
            assert_eq!(node_id, "7");
            assert_eq!(field, "retries");
            assert_eq!(raw, "three");
        }
        other => panic!("expected literal parse error, got {other:?}"),
    }
    assert!(outcomes[0].result.is_ok());
    assert!(outcomes[2].result.is_ok());
}

#[test]
fn test_missing_output_template_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let builtin = TemplateCatalog::builtin();
    for kind in [TemplateKind::Input, TemplateKind::Model] {
        std::fs::write(dir.path().join(kind.file_name()), builtin.source(kind).unwrap()).unwrap();
    }

    let definition = definition();
    let outcomes = generate_process(
        &definition,
        &StandardTypeRegistry::new(),
        &TemplateCatalog::from_dir(dir.path()),
        &CodegenConfig::default(),
    )
    .unwrap();

    for outcome in outcomes {
        let err = outcome.result.expect_err("output template is missing");
        assert!(err.is_configuration_error());
        assert!(matches!(
            err,
            CodegenError::TemplateMissing {
                kind: TemplateKind::Output,
                ..
            }
        ));
    }
}

#[test]
fn test_generation_is_byte_identical_across_runs() {
    let definition = definition();
    let run = || {
        generate_process(
            &definition,
            &StandardTypeRegistry::new(),
            &TemplateCatalog::builtin(),
            &CodegenConfig::default(),
        )
        .unwrap()
        .into_iter()
        .map(|o| o.result.unwrap())
        .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_distinct_nodes_get_distinct_names() {
    let definition = definition();
    let outcomes = generate_process(
        &definition,
        &StandardTypeRegistry::new(),
        &TemplateCatalog::builtin(),
        &CodegenConfig::default(),
    )
    .unwrap();
    let mut names: Vec<_> = outcomes
        .iter()
        .map(|o| o.result.as_ref().unwrap().model.simple_name.clone())
        .collect();
    names.dedup();
    assert_eq!(
        names,
        vec!["Orders_3_TaskModel", "Orders_7_TaskModel", "Orders_9_TaskModel"]
    );

    let cases: Vec<_> = outcomes
        .iter()
        .map(|o| o.result.as_ref().unwrap().dispatch.render_case())
        .collect();
    assert_eq!(cases[1], "case \"7\": return Orders_7_TaskModel.from(workItem);");
}

#[test]
fn test_extra_reserved_names_from_config() {
    let definition = definition();
    let config = CodegenConfig {
        reserved_parameters: vec!["priority".to_string()],
        ..CodegenConfig::default()
    };
    let outcomes = generate_process(
        &definition,
        &StandardTypeRegistry::new(),
        &TemplateCatalog::builtin(),
        &config,
    )
    .unwrap();
    let review = outcomes[0].result.as_ref().unwrap();
    assert!(!review.input.source.contains("priority"));
}

#[test]
fn test_output_to_map_and_from_map_cover_the_same_fields() {
    let definition = definition();
    let outcomes = generate_process(
        &definition,
        &StandardTypeRegistry::new(),
        &TemplateCatalog::builtin(),
        &CodegenConfig::default(),
    )
    .unwrap();
    let source = &outcomes[0].result.as_ref().unwrap().output.source;

    let put = Regex::new(r#"params\.put\("([^"]+)", this\.(\w+)\);"#).unwrap();
    let get = Regex::new(r#"result\.(\w+) = \(([\w.]+)\) params\.get\("([^"]+)"\);"#).unwrap();
    let declared = Regex::new(r"private ([\w.]+) (\w+);").unwrap();

    let written: Vec<(String, String)> = put
        .captures_iter(source)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect();
    let read: Vec<(String, String, String)> = get
        .captures_iter(source)
        .map(|c| (c[3].to_string(), c[1].to_string(), c[2].to_string()))
        .collect();

    assert_eq!(
        written,
        vec![
            ("approved".to_string(), "approved".to_string()),
            ("status".to_string(), "status".to_string()),
        ]
    );
    assert_eq!(
        written,
        read.iter()
            .map(|(key, field, _)| (key.clone(), field.clone()))
            .collect::<Vec<_>>()
    );
    for (key, field, cast) in &read {
        let field_type = declared
            .captures_iter(source)
            .find(|c| &c[2] == field.as_str())
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| panic!("no declaration for field of key {key}"));
        assert_eq!(&field_type, cast, "cast for {key} differs from its field type");
    }
}
