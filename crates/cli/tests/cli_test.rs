use assert_cmd::Command;

#[test]
fn help_lists_subcommands() {
    let output = Command::cargo_bin("bookshelf-cli")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["serve", "migrate", "check"] {
        assert!(stdout.contains(command), "missing {command} in:\n{stdout}");
    }
}

#[test]
fn unknown_environment_fails_before_connecting() {
    let output = Command::cargo_bin("bookshelf-cli")
        .unwrap()
        .args(["--env", "moon", "check"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported environment"), "{stderr}");
}

#[test]
fn dotenv_in_working_directory_selects_environment() {
    let dir = std::env::temp_dir().join(format!("bookshelf-cli-dotenv-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(".env"), "BOOKSHELF_ENV=moon\n").unwrap();

    let output = Command::cargo_bin("bookshelf-cli")
        .unwrap()
        .current_dir(&dir)
        .env_remove("BOOKSHELF_ENV")
        .env_remove("BOOKSHELF_CONFIG_DIR")
        .arg("check")
        .output()
        .unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported environment"), "{stderr}");
}
