//! Integration tests running the compiled `taskmodel-ctl` binary against
//! process definitions written to temp directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const DEFINITION: &str = r##"
id: org.acme.orders
package: org.acme.tasks
variables:
  - name: orderTotal
    type: Double
nodes:
  - id: "3"
    name: Review
    io:
      input_mapping:
        amount: orderTotal
      output_mapping:
        status: "#{taskStatus}"
      output_types:
        status: String
  - id: "5"
    name: Ship
    incoming: ["3"]
"##;

fn taskmodel_ctl_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_taskmodel-ctl"))
}

/// Run taskmodel-ctl from `work_dir` with HOME isolated to it.
fn run_taskmodel_ctl(work_dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(taskmodel_ctl_bin())
        .args(args)
        .current_dir(work_dir)
        .env("HOME", work_dir)
        .env_remove("TASKMODEL_TEMPLATES")
        .output()
        .expect("Failed to execute taskmodel-ctl")
}

fn workspace(definition: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("process.yaml"), definition).unwrap();
    dir
}

#[test]
fn test_generate_writes_sources_and_dispatch_entries() {
    let dir = workspace(DEFINITION);
    let result = run_taskmodel_ctl(
        dir.path(),
        &["generate", "--definition", "process.yaml", "--output", "out"],
    );
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let package_dir = dir.path().join("out/org/acme/tasks");
    for name in [
        "Orders_3_TaskInput",
        "Orders_3_TaskOutput",
        "Orders_3_TaskModel",
        "Orders_5_TaskInput",
        "Orders_5_TaskOutput",
        "Orders_5_TaskModel",
    ] {
        assert!(
            package_dir.join(format!("{name}.java")).is_file(),
            "missing {name}.java"
        );
    }

    let input = fs::read_to_string(package_dir.join("Orders_3_TaskInput.java")).unwrap();
    assert!(input.contains("item.amount = (java.lang.Double) params.get(\"amount\");"));

    let dispatch = fs::read_to_string(dir.path().join("out/dispatch-entries.txt")).unwrap();
    assert_eq!(
        dispatch,
        "case \"3\": return Orders_3_TaskModel.from(workItem);\n\
         case \"5\": return Orders_5_TaskModel.from(workItem);\n"
    );
}

#[test]
fn test_generate_single_node_to_stdout() {
    let dir = workspace(DEFINITION);
    let result = run_taskmodel_ctl(
        dir.path(),
        &["generate", "--definition", "process.yaml", "--node", "5"],
    );
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("public class Orders_5_TaskInput {"));
    assert!(!stdout.contains("Orders_3_"));
    assert!(stdout.contains("case \"5\": return Orders_5_TaskModel.from(workItem);"));
}

#[test]
fn test_generate_unknown_node_fails() {
    let dir = workspace(DEFINITION);
    let result = run_taskmodel_ctl(
        dir.path(),
        &["generate", "--definition", "process.yaml", "--node", "42"],
    );
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("node '42' not found"));
}

#[test]
fn test_check_reports_failures_with_nonzero_exit() {
    let broken = DEFINITION.replace("status: String", "status: com.example.Missing");
    assert_ne!(broken, DEFINITION);
    let dir = workspace(&broken);
    let result = run_taskmodel_ctl(dir.path(), &["check", "--definition", "process.yaml"]);
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("com.example.Missing"), "stderr: {stderr}");
    assert!(stderr.contains("1 of 2 task nodes failed"), "stderr: {stderr}");
}

#[test]
fn test_check_passes_for_valid_definition() {
    let dir = workspace(DEFINITION);
    let result = run_taskmodel_ctl(dir.path(), &["check", "--definition", "process.yaml"]);
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("org.acme.tasks.Orders_3_TaskModel [ad hoc]"));
    assert!(!stderr.contains("Orders_5_TaskModel [ad hoc]"));
}

#[test]
fn test_project_config_changes_dispatch_variable() {
    let dir = workspace(DEFINITION);
    fs::write(
        dir.path().join(".taskmodel.toml"),
        "[codegen]\nwork-item-variable = \"wi\"\n",
    )
    .unwrap();
    let result = run_taskmodel_ctl(
        dir.path(),
        &["generate", "--definition", "process.yaml", "--output", "out"],
    );
    assert!(result.status.success());
    let dispatch = fs::read_to_string(dir.path().join("out/dispatch-entries.txt")).unwrap();
    assert!(dispatch.starts_with("case \"3\": return Orders_3_TaskModel.from(wi);"));
}

#[test]
fn test_missing_template_directory_file_fails() {
    let dir = workspace(DEFINITION);
    fs::create_dir_all(dir.path().join("templates")).unwrap();
    let result = run_taskmodel_ctl(
        dir.path(),
        &[
            "check",
            "--definition",
            "process.yaml",
            "--templates",
            "templates",
        ],
    );
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("TaskInputTemplate.java"));
}
