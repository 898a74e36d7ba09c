use predicates::prelude::*;

use super::common::TestEnv;

fn populated() -> TestEnv {
  let env = TestEnv::empty();
  env.create("notes/b", "");
  env.create("notes/a", "");
  env.create("bookmarks/site", "");
  env.create("todo", "");
  env
}

#[test]
fn list_is_sorted() {
  let env = populated();

  env
    .pim_cmd()
    .arg("list")
    .assert()
    .success()
    .stdout("bookmarks/site\nnotes/a\nnotes/b\ntodo\n");
}

#[test]
fn list_collection() {
  let env = populated();

  env
    .pim_cmd()
    .args(["list", "--collection", "notes"])
    .assert()
    .success()
    .stdout("notes/a\nnotes/b\n");
}

#[test]
fn list_hides_lock_file() {
  let env = populated();

  env
    .pim_cmd()
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::contains(".pim.lock").not());
  assert!(env.store_path().join(".pim.lock").exists());
}

#[test]
fn list_json() {
  let env = populated();

  let output = env.pim_cmd().args(["-o", "json", "list"]).output().unwrap();
  assert!(output.status.success());

  let ids: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(ids, vec!["bookmarks/site", "notes/a", "notes/b", "todo"]);
}
