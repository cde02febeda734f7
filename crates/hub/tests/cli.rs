use assert_cmd::Command; // Bring Command into scope
use predicates::prelude::*; // Bring predicate traits into scope
use tempfile::tempdir;

#[test]
fn test_ping_command() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("hub")?;
    cmd.arg("--ping");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pong"));

    Ok(())
}

#[test]
fn test_no_args_prints_usage_hint() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("hub")?;

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Run with --help"))
        .stdout(predicate::str::contains("pong").not());

    Ok(())
}

#[test]
fn test_demo_boots_in_dependency_order() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("hub")?;
    cmd.args(["demo", "--name", "Jane Roe", "--email", "jane@roe.com"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Booting components..."))
        .stdout(predicate::str::is_match(r"(?s)Registered: Mailer.*Registered: User")?)
        .stdout(predicate::str::contains("\"email\":\"jane@roe.com\""))
        .stdout(predicate::str::contains("Hi Jane Roe"))
        .stdout(predicate::str::contains("Mails sent: 1"));

    Ok(())
}

#[test]
fn test_demo_with_custom_prefix() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("hub")?;
    cmd.args(["demo", "--api-prefix", "rpc"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Hi John Doe"));

    Ok(())
}

#[test]
fn test_demo_reads_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("hub.toml");
    std::fs::write(&path, "api_prefix = \"svc\"\nwait_strategy = \"poll\"\n")?;

    let mut cmd = Command::cargo_bin("hub")?;
    cmd.arg("demo").arg("--config").arg(&path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Mails sent: 1"));

    Ok(())
}

#[test]
fn test_demo_missing_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut cmd = Command::cargo_bin("hub")?;
    cmd.arg("demo").arg("--config").arg(dir.path().join("absent.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error: Configuration error"));

    Ok(())
}

#[test]
fn test_config_command_prints_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("hub")?;
    cmd.args(["config", "--format", "toml"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("api_prefix = \"api\""))
        .stdout(predicate::str::contains("wait_strategy = \"notify\""))
        .stdout(predicate::str::contains("poll_interval_ms = 10"));

    Ok(())
}
