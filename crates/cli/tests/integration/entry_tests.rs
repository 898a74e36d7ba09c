use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn create_writes_entry_file() {
  let env = TestEnv::empty();

  env
    .pim_cmd()
    .args(["create", "--id", "notes/groceries", "--content", "milk\neggs\n"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Created notes/groceries"));

  let text = env.read_entry("notes/groceries");
  assert!(text.starts_with("---\n[pim]\n"), "{text}");
  assert!(text.ends_with("---\nmilk\neggs\n"), "{text}");
}

#[test]
fn create_twice_fails() {
  let env = TestEnv::empty();
  env.create("dup", "first");

  env
    .pim_cmd()
    .args(["create", "--id", "dup", "--content", "second"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("already exists"));

  assert!(env.read_entry("dup").ends_with("first"));
}

#[test]
fn create_with_headers() {
  let env = TestEnv::empty();

  env
    .pim_cmd()
    .args([
      "create",
      "--id",
      "bookmark",
      "--header",
      "bookmark.url=https://example.org",
      "--header",
      "bookmark.visits=3",
    ])
    .assert()
    .success();

  env
    .pim_cmd()
    .args(["get", "--id", "bookmark", "--header"])
    .assert()
    .success()
    .stdout(predicate::str::contains("url = \"https://example.org\""))
    .stdout(predicate::str::contains("visits = 3"));
}

#[test]
fn bad_header_leaves_store_untouched() {
  let env = TestEnv::empty();

  env
    .pim_cmd()
    .args(["create", "--id", "x", "--header", "missing-equals"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid header"));

  assert!(!env.entry_path("x").exists());
}

#[test]
fn create_content_from_stdin() {
  let env = TestEnv::empty();

  env
    .pim_cmd()
    .args(["create", "--id", "piped", "--content-from", "-"])
    .write_stdin("from stdin")
    .assert()
    .success();

  env
    .pim_cmd()
    .args(["get", "--id", "piped", "--content"])
    .assert()
    .success()
    .stdout("from stdin");
}

#[test]
fn create_from_raw_entry() {
  let env = TestEnv::empty();
  let raw = env.write_file(
    "raw.txt",
    "---\n[pim]\nversion = \"0.1.0\"\nlinks = []\n\n[note]\ntitle = \"Raw\"\n---\nraw body",
  );

  env
    .pim_cmd()
    .args(["create", "--id", "imported", "--from-raw", raw.to_str().unwrap()])
    .assert()
    .success();

  env
    .pim_cmd()
    .args(["get", "--id", "imported", "--header-json", "--content"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"title\": \"Raw\""))
    .stdout(predicate::str::ends_with("raw body"));
}

#[test]
fn create_from_malformed_raw_fails() {
  let env = TestEnv::empty();
  let raw = env.write_file("raw.txt", "no fences here");

  env
    .pim_cmd()
    .args(["create", "--id", "broken", "--from-raw", raw.to_str().unwrap()])
    .assert()
    .failure();

  assert!(!env.entry_path("broken").exists());
}

#[test]
fn content_flags_conflict() {
  let env = TestEnv::empty();

  env
    .pim_cmd()
    .args(["create", "--id", "x", "--content", "a", "--content-from", "-"])
    .assert()
    .failure();
}

#[test]
fn get_json_output() {
  let env = TestEnv::empty();
  env.create("j", "json body");

  let output = env.pim_cmd().args(["-o", "json", "get", "--id", "j"]).output().unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["id"], "j");
  assert_eq!(json["content"], "json body");
  assert!(json["header"]["pim"]["version"].is_string());
}

#[test]
fn update_content_and_header() {
  let env = TestEnv::empty();
  env.create("u", "old");
  let content = env.write_file("new.txt", "new");

  env
    .pim_cmd()
    .args([
      "update",
      "--id",
      "u",
      "--content",
      content.to_str().unwrap(),
      "--header",
      "note.done=true",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Updated u"));

  let text = env.read_entry("u");
  assert!(text.contains("done = true"), "{text}");
  assert!(text.ends_with("---\nnew"), "{text}");
}

#[test]
fn update_rejects_invalid_store_header() {
  let env = TestEnv::empty();
  env.create("v", "keep");

  env
    .pim_cmd()
    .args(["update", "--id", "v", "--header", "pim.version=nope"])
    .assert()
    .failure();

  let text = env.read_entry("v");
  assert!(!text.contains("nope"), "{text}");
}

#[test]
fn delete_removes_entry() {
  let env = TestEnv::empty();
  env.create("gone", "bye");

  env
    .pim_cmd()
    .args(["delete", "--id", "gone"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Deleted gone"));

  assert!(!env.entry_path("gone").exists());
}

#[test]
fn move_renames_entry() {
  let env = TestEnv::empty();
  env.create("old/name", "body");

  env
    .pim_cmd()
    .args(["move", "--from", "old/name", "--to", "new/name"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Moved old/name"));

  assert!(!env.entry_path("old/name").exists());
  assert!(env.read_entry("new/name").ends_with("body"));
}

#[test]
fn move_onto_existing_fails() {
  let env = TestEnv::empty();
  env.create("a", "a");
  env.create("b", "b");

  env
    .pim_cmd()
    .args(["move", "--from", "a", "--to", "b"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("already exists"));
}

#[test]
fn verbose_logs_to_stderr() {
  let env = TestEnv::empty();

  env
    .pim_cmd()
    .args(["-v", "create", "--id", "logged"])
    .assert()
    .success()
    .stderr(predicate::str::contains("[pim][INFO ]: created entry"));
}

#[test]
fn debug_logs_carry_file_and_line() {
  let env = TestEnv::empty();

  env
    .pim_cmd()
    .args(["--debug", "list"])
    .assert()
    .success()
    .stderr(predicate::str::contains("[pim][DEBUG]["));
}

#[test]
fn dot_ids_are_rejected() {
  let env = TestEnv::empty();

  env
    .pim_cmd()
    .args(["create", "--id", "notes/.secret", "--content", "hidden"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("reserved for store files"));

  assert!(!env.store_path().join("notes").join(".secret").exists());
}

#[test]
fn header_assignment_starts_an_array() {
  let env = TestEnv::empty();

  env
    .pim_cmd()
    .args(["create", "--id", "tagged", "--header", "note.tags.[0]=rust", "--header", "note.stars = 5"])
    .assert()
    .success();

  env
    .pim_cmd()
    .args(["get", "--id", "tagged", "--header"])
    .assert()
    .success()
    .stdout(predicate::str::contains("tags = [\"rust\"]"))
    .stdout(predicate::str::contains("stars = 5"));
}
