//! Upgrading workspace files on disk.

use std::fs;

use ivw_cli::inspect::summarize;
use ivw_cli::modules::{ABUFFER_GL_MODULE, builtin_registry};
use ivw_cli::upgrade::upgrade_workspace;
use ivw_serialization::{ConverterRegistry, Deserializer, SerializerOptions};
use tempfile::TempDir;

const LEGACY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<InviwoWorkspace version="2">
  <Processors>
    <Processor type="org.inviwo.ABufferGeometryGLProcessor" identifier="ABuffer">
      <InPorts>
        <InPort type="org.inviwo.MeshFlatMultiInport" identifier="geometry.inport"/>
      </InPorts>
      <OutPorts>
        <OutPort type="org.inviwo.ImageOutport" identifier="image.outport"/>
      </OutPorts>
      <Properties>
        <Property type="org.inviwo.FloatProperty" identifier="alpha">
          <value content="0.25"/>
        </Property>
      </Properties>
    </Processor>
  </Processors>
</InviwoWorkspace>
"#;

fn legacy_workspace() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scene.inv");
    fs::write(&path, LEGACY).unwrap();
    (dir, path)
}

#[test]
fn test_upgrade_in_place() {
    let (_dir, path) = legacy_workspace();
    let registry = builtin_registry();
    let report =
        upgrade_workspace(&path, None, false, &registry, SerializerOptions::default()).unwrap();

    assert!(report.changed());
    assert_eq!(report.written.as_deref(), Some(path.as_path()));
    assert_eq!(report.upgrades.len(), 1);
    assert_eq!(report.upgrades[0].module, ABUFFER_GL_MODULE);
    assert_eq!(
        (report.upgrades[0].from_version, report.upgrades[0].to_version),
        (0, 1)
    );

    let d = Deserializer::from_file(&path).unwrap();
    let document = d.document();
    assert_eq!(
        ConverterRegistry::persisted_version(document, ABUFFER_GL_MODULE),
        1
    );
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains(r#"identifier="geometry""#));
    assert!(text.contains(r#"identifier="image""#));
    assert!(!text.contains("image.outport"));
    assert!(!summarize(&d, &registry).needs_upgrade());

    let again =
        upgrade_workspace(&path, None, false, &registry, SerializerOptions::default()).unwrap();
    assert!(again.upgrades.is_empty());
    assert!(again.written.is_none());
    assert_eq!(again.outcome(), None);
}

#[test]
fn test_dry_run_leaves_file_alone() {
    let (_dir, path) = legacy_workspace();
    let report = upgrade_workspace(
        &path,
        None,
        true,
        &builtin_registry(),
        SerializerOptions::default(),
    )
    .unwrap();
    assert!(report.changed());
    assert!(report.written.is_none());
    assert_eq!(report.outcome().as_deref(), Some("Dry run, nothing written."));
    assert_eq!(fs::read_to_string(&path).unwrap(), LEGACY);
}

#[test]
fn test_current_file_is_still_written_to_output() {
    let (dir, path) = legacy_workspace();
    let registry = builtin_registry();
    upgrade_workspace(&path, None, false, &registry, SerializerOptions::default()).unwrap();

    let output = dir.path().join("copy.inv");
    let report = upgrade_workspace(
        &path,
        Some(&output),
        false,
        &registry,
        SerializerOptions::default(),
    )
    .unwrap();
    assert!(report.upgrades.is_empty());
    assert_eq!(report.written.as_deref(), Some(output.as_path()));
    assert_eq!(
        report.outcome(),
        Some(format!("Wrote: {}", output.display()))
    );
    assert!(output.exists());
}

#[test]
fn test_upgrade_to_separate_output() {
    let (dir, path) = legacy_workspace();
    let output = dir.path().join("out").join("scene.inv");
    let options = SerializerOptions::default().with_indent(0);
    upgrade_workspace(&path, Some(&output), false, &builtin_registry(), options).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), LEGACY);
    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written.trim_end().lines().count(), 1);
    assert!(written.contains(r#"<Module name="ABufferGL" version="1"/>"#));
}

#[test]
fn test_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.inv");
    let error = upgrade_workspace(
        &path,
        None,
        false,
        &builtin_registry(),
        SerializerOptions::default(),
    )
    .unwrap_err();
    assert!(error.to_string().contains("missing.inv"), "{error}");
}

#[test]
fn test_summary_json() {
    let d = Deserializer::parse(LEGACY).unwrap();
    let summary = summarize(&d, &builtin_registry());
    insta::assert_json_snapshot!(summary, @r#"
    {
      "root": "InviwoWorkspace",
      "workspace_version": 2,
      "node_count": 10,
      "modules": [
        {
          "name": "ABufferGL",
          "persisted_version": 0,
          "current_version": 1,
          "needs_upgrade": true
        }
      ],
      "properties": [
        {
          "owner": "ABuffer",
          "class_identifier": "org.inviwo.FloatProperty",
          "identifier": "alpha",
          "value": "0.25"
        }
      ]
    }
    "#);
}
