//! End-to-end tests of the `regen` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn regen() -> Command {
    Command::cargo_bin("regen").expect("binary")
}

#[test]
fn test_model_prints_json() {
    let dir = TempDir::new().expect("tempdir");
    let source = dir.path().join("widget.h");
    fs::write(
        &source,
        "namespace ui {\nenum WidgetProperty { Title, // GETSET(std::wstring, Title)\n};\n}\n",
    )
    .expect("write");

    regen()
        .arg("model")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"WidgetProperty\""))
        .stdout(predicate::str::contains("\"namespace\": \"ui\""))
        .stdout(predicate::str::contains("\"macro_type\": \"ScalarReadWrite\""));
}

#[test]
fn test_model_prints_yaml() {
    let dir = TempDir::new().expect("tempdir");
    let source = dir.path().join("form.h");
    fs::write(&source, "enum LoginFormProperty { UserName };\n").expect("write");

    regen()
        .args(["model", "--format", "yaml"])
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("name: LoginFormProperty"))
        .stdout(predicate::str::contains("kind: Form"));
}

#[test]
fn test_model_reports_broken_modules() {
    let dir = TempDir::new().expect("tempdir");
    let good = dir.path().join("good.h");
    let bad = dir.path().join("bad.h");
    fs::write(&good, "enum GoodProperty { A };\n").expect("write");
    fs::write(&bad, "enum BadProperty { A, // MAP(int)\n};\n").expect("write");

    regen()
        .arg("model")
        .arg(&good)
        .arg(&bad)
        .assert()
        .failure()
        .stdout(predicate::str::contains("GoodProperty"))
        .stderr(predicate::str::contains("1 of 2 modules failed to parse"));
}

#[test]
fn test_sync_without_existing_file_uses_fresh() {
    let dir = TempDir::new().expect("tempdir");
    let fresh = dir.path().join("fresh.cpp");
    let existing = dir.path().join("widget.cpp");
    fs::write(&fresh, "//<body sync=\"Reserve\">\n//</body>\n").expect("write");

    regen()
        .arg("sync")
        .arg(&fresh)
        .arg(&existing)
        .arg("--write")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&existing).expect("read"),
        "//<body sync=\"Reserve\">\n//</body>\n"
    );
}

#[test]
fn test_sync_keeps_reserved_region() {
    let dir = TempDir::new().expect("tempdir");
    let fresh = dir.path().join("fresh.cpp");
    let existing = dir.path().join("widget.cpp");
    fs::write(&fresh, "v2\n//<body sync=\"Reserve\">\n//</body>\n").expect("write");
    fs::write(&existing, "v1\n//<body sync=\"Reserve\">\nmine();\n//</body>\n").expect("write");

    regen()
        .arg("sync")
        .arg(&fresh)
        .arg(&existing)
        .args(["--mode", "full"])
        .assert()
        .success()
        .stdout("v2\n//<body sync=\"Reserve\">\nmine();\n//</body>\n");
}

#[test]
fn test_sync_rejects_unknown_mode() {
    let dir = TempDir::new().expect("tempdir");
    let fresh = dir.path().join("fresh.cpp");
    fs::write(&fresh, "x\n").expect("write");

    regen()
        .arg("sync")
        .arg(&fresh)
        .arg(&fresh)
        .args(["--mode", "Sometimes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown value `Sometimes`"));
}

#[test]
fn test_section_with_custom_delimiter() {
    let dir = TempDir::new().expect("tempdir");
    let file = dir.path().join("setup.py");
    let content = dir.path().join("section.txt");
    fs::write(&file, "# <file gen=\"Force\"/>\nimport os\n").expect("write");
    fs::write(&content, "WIDGETS = []\n").expect("write");

    regen()
        .arg("section")
        .arg(&file)
        .args(["--name", "widgets", "--delimiter", "#"])
        .arg("--content")
        .arg(&content)
        .arg("--write")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&file).expect("read"),
        "# <file gen=\"Force\"/>\nimport os\n#<widgets gen=\"Replace\">\nWIDGETS = []\n#</widgets>\n"
    );
}

#[test]
fn test_macros_lists_configured_keywords() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("regen.toml");
    fs::write(&config, "[extraction]\nmacros = [\"GETSET\", \"ACTION\"]\n").expect("write");

    regen()
        .arg("macros")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("GETSET"))
        .stdout(predicate::str::contains("ScalarReadWrite"))
        .stdout(predicate::str::contains("VECTOR").not());
}

#[test]
fn test_missing_input_fails() {
    regen()
        .args(["model", "does-not-exist.h"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.h"));
}
