use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn config_verbosity_enables_info_logs() {
  let env = TestEnv::with_config("verbosity = true\n");

  env
    .pim_cmd()
    .args(["create", "--id", "x"])
    .assert()
    .success()
    .stderr(predicate::str::contains("[pim][INFO ]"));
}

#[test]
fn implicit_create_off_requires_store_dir() {
  let env = TestEnv::with_config("[store]\nimplicit_create = false\n");

  env
    .pim_cmd()
    .arg("list")
    .assert()
    .failure()
    .stderr(predicate::str::contains("implicit_create"));

  std::fs::create_dir_all(env.store_path()).unwrap();
  env.pim_cmd().arg("list").assert().success();
}

#[test]
fn unknown_config_key_fails() {
  let env = TestEnv::with_config("colour = true\n");

  env
    .pim_cmd()
    .arg("list")
    .assert()
    .failure()
    .stderr(predicate::str::contains("config.toml"));
}

#[test]
fn explicit_config_and_store_paths() {
  let env = TestEnv::empty();
  let config = env.write_file("elsewhere/pim.toml", "verbosity = true\n");
  let store = env.temp.path().join("custom-store");

  env
    .pim_cmd()
    .arg("--config")
    .arg(&config)
    .arg("--store")
    .arg(&store)
    .args(["create", "--id", "here"])
    .assert()
    .success()
    .stderr(predicate::str::contains("[pim][INFO ]"));

  assert!(store.join("here").is_file());
  assert!(!env.store_path().join("here").exists());
}

#[test]
fn store_env_var_is_honored() {
  let env = TestEnv::empty();
  let store = env.temp.path().join("env-store");

  env
    .pim_cmd()
    .env("PIMSTORE_STORE", &store)
    .args(["create", "--id", "via-env"])
    .assert()
    .success();

  assert!(store.join("via-env").is_file());
}
