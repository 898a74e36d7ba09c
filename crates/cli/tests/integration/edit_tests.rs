#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use predicates::prelude::*;

use super::common::TestEnv;

/// Write an executable shell script to use as the editor.
fn editor_script(env: &TestEnv, body: &str) -> PathBuf {
  let path = env.write_file("editor.sh", &format!("#!/bin/sh\n{}\n", body));
  let mut perms = std::fs::metadata(&path).unwrap().permissions();
  perms.set_mode(0o755);
  std::fs::set_permissions(&path, perms).unwrap();
  path
}

#[test]
fn edit_applies_changes() {
  let env = TestEnv::empty();
  env.create("note", "before");
  let editor = editor_script(&env, "printf ' and after' >> \"$1\"");

  env
    .pim_cmd()
    .arg("--editor")
    .arg(&editor)
    .args(["edit", "--id", "note"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Edited note"));

  assert!(env.read_entry("note").ends_with("before and after"));
}

#[test]
fn edit_without_changes() {
  let env = TestEnv::empty();
  env.create("note", "same");

  env
    .pim_cmd()
    .args(["--editor", "true", "edit", "--id", "note"])
    .assert()
    .success()
    .stdout(predicate::str::contains("unchanged"));
}

#[test]
fn edit_uses_editor_env_var() {
  let env = TestEnv::empty();
  env.create("note", "x");
  let editor = editor_script(&env, "printf 'y' >> \"$1\"");

  env
    .pim_cmd()
    .env("EDITOR", &editor)
    .args(["edit", "--id", "note"])
    .assert()
    .success();

  assert!(env.read_entry("note").ends_with("xy"));
}

#[test]
fn broken_edit_is_rejected() {
  let env = TestEnv::empty();
  env.create("note", "keep me");
  let editor = editor_script(&env, "printf 'garbage' > \"$1\"");

  env
    .pim_cmd()
    .arg("--editor")
    .arg(&editor)
    .args(["edit", "--id", "note"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Edited entry is not valid"));

  assert!(env.read_entry("note").ends_with("keep me"));
}

#[test]
fn failing_editor_is_reported() {
  let env = TestEnv::empty();
  env.create("note", "x");

  env
    .pim_cmd()
    .args(["--editor", "false", "edit", "--id", "note"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Editor exited"));
}
