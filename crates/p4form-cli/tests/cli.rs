use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

const BRANCH: &str = "# A Perforce Branch Specification.\n\
                      \n\
                      Branch:\trel1\n\
                      \n\
                      Owner:\talex\n\
                      \n\
                      Options:\tunlocked\n\
                      \n\
                      View:\n\
                      \t//depot/main/... //depot/rel1/...\n\
                      \t-//depot/main/tmp/... //depot/rel1/tmp/...\n\
                      \n";

fn p4form() -> Command {
    Command::cargo_bin("p4form").unwrap()
}

fn temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

// ── fmt ────────────────────────────────────────────────────────────────

#[test]
fn test_fmt_canonical_input_is_unchanged() {
    p4form()
        .args(["fmt", "--kind", "branch"])
        .write_stdin(BRANCH)
        .assert()
        .success()
        .stdout(BRANCH);
}

#[test]
fn test_fmt_check_passes_on_canonical_input() {
    let f = temp_file(BRANCH);
    p4form()
        .args(["fmt", "--check", "--kind", "branch", "-i"])
        .arg(f.path())
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_fmt_check_fails_with_diff() {
    p4form()
        .args(["fmt", "--check"])
        .write_stdin("Owner:  alex\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("+Owner:\talex"))
        .stderr(predicate::str::contains("canonical"));
}

#[test]
fn test_fmt_crlf() {
    p4form()
        .args(["fmt", "--crlf"])
        .write_stdin("Owner:\talex\n")
        .assert()
        .success()
        .stdout("Owner:\talex\r\n\r\n");
}

// ── json / view ────────────────────────────────────────────────────────

#[test]
fn test_json_dumps_typed_record() {
    p4form()
        .args(["json", "--kind", "branch"])
        .write_stdin(BRANCH)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""View":["//depot/main/... //depot/rel1/...","-//depot/main/tmp/... //depot/rel1/tmp/..."]"#,
        ));
}

#[test]
fn test_view_prints_entries() {
    p4form()
        .arg("view")
        .write_stdin(BRANCH)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"type":"exclude","left":"//depot/main/tmp/...","right":"//depot/rel1/tmp/..."}"#,
        ));
}

#[test]
fn test_view_missing_field_fails() {
    p4form()
        .args(["view", "--field", "Mapping"])
        .write_stdin(BRANCH)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mapping"));
}

// ── tagged ─────────────────────────────────────────────────────────────

#[test]
fn test_tagged_builds_form_text() {
    p4form()
        .args(["tagged", "--kind", "group"])
        .write_stdin(r#"{"Group":"devs","Users1":"bob","Users0":"alex"}"#)
        .assert()
        .success()
        .stdout("Group:\tdevs\n\nUsers:\n\talex\n\tbob\n\n");
}

#[test]
fn test_tagged_requires_kind() {
    p4form()
        .arg("tagged")
        .write_stdin("{}")
        .assert()
        .failure();
}

// ── validate ───────────────────────────────────────────────────────────

#[test]
fn test_validate_reports_kind_and_field_count() {
    p4form()
        .args(["validate", "--kind", "branch"])
        .write_stdin(BRANCH)
        .assert()
        .success()
        .stdout("Valid: branch (4 fields)\n");
}

#[test]
fn test_validate_rejects_bad_view() {
    p4form()
        .args(["validate", "--kind", "branch"])
        .write_stdin("Branch:\tb\n\nView:\n\t//only/one/side\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid View line"));
}

#[test]
fn test_validate_missing_file_fails() {
    p4form()
        .args(["validate", "-i", "/nonexistent/form.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}
