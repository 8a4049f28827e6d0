//! Unit tests for the CLI runtime.

use std::ffi::OsString;
use std::fs;

use camino::Utf8PathBuf;
use plugin_registry::PluginCatalog;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;

const KENNEL_DOCUMENT: &str = r"
metadata:
  name: kennels
  version: 0.1.0
types:
  - name: Mapping
formats:
  - name: MappingFormat
    layout: file
    views: [dict]
  - name: MappingDirectoryFormat
    layout: single_file_directory
    path: mapping.tsv
    file_format: MappingFormat
    views: [dict]
bindings:
  - type: Mapping
    format: MappingDirectoryFormat
methods:
  - callable: no_input_method
    title: No input method
    outputs:
      - name: out
        type: Mapping
";

struct StaticConfigLoader {
    config: Config,
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

struct Outcome {
    exit_code: ExitCode,
    stdout: String,
    stderr: String,
}

impl Outcome {
    fn catalog(&self) -> PluginCatalog {
        serde_json::from_str(&self.stdout).expect("stdout holds a catalog")
    }
}

fn run_with_config(config: Config) -> Outcome {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let loader = StaticConfigLoader { config };
    let exit_code = run_with_loader(
        [OsString::from("plugin-registry")],
        &mut stdout,
        &mut stderr,
        &loader,
    );
    Outcome {
        exit_code,
        stdout: String::from_utf8(stdout).expect("stdout utf8"),
        stderr: String::from_utf8(stderr).expect("stderr utf8"),
    }
}

fn with_document(workspace: &TempDir, name: &str, contents: &str) -> Config {
    let path = workspace.path().join(name);
    fs::write(&path, contents).expect("write document");
    Config::default().with_manifest_path(Utf8PathBuf::from_path_buf(path).expect("utf8 path"))
}

#[fixture]
fn workspace() -> TempDir {
    TempDir::new().expect("temporary directory")
}

#[rstest]
fn prints_the_dummy_plugin_catalog_by_default() {
    let outcome = run_with_config(Config::default());
    assert_eq!(outcome.exit_code, ExitCode::SUCCESS, "{}", outcome.stderr);
    let expected = dummy_plugin::dummy_plugin()
        .expect("dummy plugin registers")
        .catalog();
    assert_eq!(outcome.catalog(), expected);
}

#[rstest]
fn loads_the_configured_plugin_document(workspace: TempDir) {
    let outcome = run_with_config(with_document(&workspace, "kennels.yaml", KENNEL_DOCUMENT));

    assert_eq!(outcome.exit_code, ExitCode::SUCCESS, "{}", outcome.stderr);
    let catalog = outcome.catalog();
    assert_eq!(catalog.metadata.name, "kennels");
    assert_eq!(catalog.bindings.len(), 1);
    assert_eq!(catalog.actions.len(), 1);
}

#[rstest]
fn reports_missing_documents(workspace: TempDir) {
    let path =
        Utf8PathBuf::from_path_buf(workspace.path().join("absent.json")).expect("utf8 path");

    let outcome = run_with_config(Config::default().with_manifest_path(path));

    assert_eq!(outcome.exit_code, ExitCode::FAILURE);
    assert!(outcome.stdout.is_empty());
    assert!(
        outcome.stderr.starts_with("failed to register plugin"),
        "{}",
        outcome.stderr
    );
}

#[rstest]
fn reports_documents_with_unknown_callables(workspace: TempDir) {
    let document = KENNEL_DOCUMENT.replace("no_input_method", "missing_method");
    let outcome = run_with_config(with_document(&workspace, "unknown.yaml", &document));

    assert_eq!(outcome.exit_code, ExitCode::FAILURE);
    assert!(outcome.stdout.is_empty());
    assert!(
        outcome
            .stderr
            .contains("no callable named 'missing_method' is available"),
        "{}",
        outcome.stderr
    );
}

#[rstest]
fn document_formats_need_views_to_be_importable(workspace: TempDir) {
    let document = KENNEL_DOCUMENT.replacen("    views: [dict]\n", "", 1);
    let outcome = run_with_config(with_document(&workspace, "viewless.yaml", &document));

    assert_eq!(outcome.exit_code, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("at least one view type"), "{}", outcome.stderr);
}

#[test]
fn telemetry_installs_once_per_process() {
    telemetry::initialise(&Config::default()).expect("first initialisation");
    telemetry::initialise(&Config::default()).expect("repeat initialisation is a no-op");
}

#[test]
fn rejects_unknown_log_formats() {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let args = ["plugin-registry", "--log-format", "pretty"].map(OsString::from);

    let exit_code = run(args, &mut stdout, &mut stderr);

    assert_eq!(exit_code, ExitCode::FAILURE);
    let message = String::from_utf8(stderr).expect("stderr utf8");
    assert!(message.starts_with("failed to load configuration"), "{message}");
}
