use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

fn run_help(home: &TempDir, args: &[&str]) {
    let mut cmd = cargo_bin_cmd!("workbridge");
    cmd.env("HOME", home.path())
        .args(args)
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn every_cli_command_has_help_path() {
    let home = TempDir::new().expect("temp home");

    // top-level
    run_help(&home, &[]);

    run_help(&home, &["intake"]);
    run_help(&home, &["intake", "validate"]);
    run_help(&home, &["intake", "preview"]);
    run_help(&home, &["intake", "save"]);
    run_help(&home, &["intake", "resume"]);
    run_help(&home, &["intake", "next"]);
    run_help(&home, &["intake", "back"]);
    run_help(&home, &["intake", "discard"]);
    run_help(&home, &["intake", "submit"]);

    run_help(&home, &["profile"]);
    run_help(&home, &["profile", "validate"]);
    run_help(&home, &["profile", "progress"]);
    run_help(&home, &["profile", "submit"]);
    run_help(&home, &["profile", "save"]);
    run_help(&home, &["profile", "resume"]);

    run_help(&home, &["builder"]);
    run_help(&home, &["builder", "propose"]);

    run_help(&home, &["roi"]);
    run_help(&home, &["roi", "calc"]);

    run_help(&home, &["jobs"]);
    run_help(&home, &["jobs", "search"]);
    run_help(&home, &["jobs", "matches"]);

    run_help(&home, &["cert"]);
    run_help(&home, &["cert", "list"]);
    run_help(&home, &["cert", "add"]);
    run_help(&home, &["cert", "update"]);
    run_help(&home, &["cert", "remove"]);

    run_help(&home, &["doc"]);
    run_help(&home, &["doc", "register"]);
    run_help(&home, &["doc", "remove"]);

    run_help(&home, &["onboarding"]);
    run_help(&home, &["onboarding", "status"]);
    run_help(&home, &["onboarding", "skip"]);
    run_help(&home, &["onboarding", "complete"]);
    run_help(&home, &["onboarding", "reset"]);

    run_help(&home, &["auth"]);
    run_help(&home, &["auth", "login"]);

    run_help(&home, &["train"]);
    run_help(&home, &["train", "chat"]);
    run_help(&home, &["train", "feedback"]);
    run_help(&home, &["train", "correct"]);
}
