use anyhow::Result;
use assert_cmd::Command;
use assert_fs::NamedTempFile;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn cli_command() -> Result<Command> {
    let mut command = Command::cargo_bin("oxdatetime")?;
    command.env_remove("RUST_LOG");
    Ok(command)
}

#[test]
fn cli_help() -> Result<()> {
    cli_command()?
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::starts_with("OxDateTime"));
    Ok(())
}

#[test]
fn cli_parse_guesses_layout() -> Result<()> {
    cli_command()?
        .arg("parse")
        .arg("06/30/2017 23:03")
        .assert()
        .success()
        .stdout("2017-06-30 23:03\n");
    Ok(())
}

#[test]
fn cli_parse_with_output_format() -> Result<()> {
    cli_command()?
        .arg("parse")
        .arg("2017-06-30T23:03:33-06:00")
        .arg("--output")
        .arg("DateSecondZone")
        .assert()
        .success()
        .stdout("2017-06-30 23:03:33 -06:00\n");
    Ok(())
}

#[test]
fn cli_parse_with_input_format() -> Result<()> {
    cli_command()?
        .arg("parse")
        .arg("0930")
        .arg("--format")
        .arg("HHmm")
        .assert()
        .success()
        .stdout("09:30\n");
    Ok(())
}

#[test]
fn cli_parse_json() -> Result<()> {
    cli_command()?
        .arg("parse")
        .arg("30Jun2017 PDT")
        .arg("--json")
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""layout":"DayMonthNameYear""#)
                .and(predicate::str::contains(r#""precision":"Day""#))
                .and(predicate::str::contains(r#""zone":"PDT""#))
                .and(predicate::str::contains(r#""utc_offset_minutes":-420"#))
                .and(predicate::str::contains(r#""weekday":"Friday""#)),
        );
    Ok(())
}

#[test]
fn cli_parse_invalid_date() -> Result<()> {
    cli_command()?
        .arg("parse")
        .arg("2023-02-29")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid day 29"));
    Ok(())
}

#[test]
fn cli_formats() -> Result<()> {
    cli_command()?
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("UsDate\tMM/DD/YYYY\tDay\n"));
    Ok(())
}

#[test]
fn cli_add() -> Result<()> {
    cli_command()?
        .arg("add")
        .arg("2020-01-31")
        .arg("Month")
        .assert()
        .success()
        .stdout("2020-02-29\n");
    cli_command()?
        .arg("add")
        .arg("2020-01-01 10:00")
        .arg("15Minute")
        .arg("-n")
        .arg("-2")
        .assert()
        .success()
        .stdout("2020-01-01 09:30\n");
    Ok(())
}

#[test]
fn cli_round() -> Result<()> {
    cli_command()?
        .arg("round")
        .arg("2020-01-01 05:30:00")
        .arg("Hour")
        .arg("--direction")
        .arg("forward")
        .assert()
        .success()
        .stdout("2020-01-01 06:00:00\n");
    cli_command()?
        .arg("round")
        .arg("2024-01-03 12:00")
        .arg("--weekday")
        .arg("Monday")
        .assert()
        .success()
        .stdout("2024-01-01 00:00\n");
    Ok(())
}

#[test]
fn cli_shift() -> Result<()> {
    cli_command()?
        .arg("shift")
        .arg("2020-03-01 02:00 UTC")
        .arg("MST")
        .assert()
        .success()
        .stdout("2020-02-29 19:00 MST\n");
    cli_command()?
        .arg("shift")
        .arg("2020-03-01 02:00")
        .arg("MST")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unresolvable time zone"));
    Ok(())
}

#[test]
fn cli_between() -> Result<()> {
    cli_command()?
        .arg("between")
        .arg("2020-01-01")
        .arg("2020-03-01")
        .assert()
        .success()
        .stdout("60\n");
    Ok(())
}

#[test]
fn cli_dst() -> Result<()> {
    cli_command()?
        .arg("dst")
        .arg("2000")
        .assert()
        .success()
        .stdout("2000-04-02\t2000-10-29\n");
    cli_command()?.arg("dst").arg("1900").assert().failure();
    Ok(())
}

#[test]
fn cli_zones() -> Result<()> {
    cli_command()?
        .arg("zones")
        .arg("--at")
        .arg("2020-07-01")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\nPT\t-07:00\t")
                .and(predicate::str::contains("\nPST\t-08:00\t")),
        );
    Ok(())
}

#[test]
fn cli_virtual_dates() -> Result<()> {
    let config = NamedTempFile::new("config.json")?;
    config.write_str(
        r#"{
            "virtual_dates": { "WeekStart": "CurrentToDay.roundToDayOfWeek(backward, Monday)" },
            "time_zones": [{ "abbreviation": "XST", "offset_minutes": -300, "dst": "local_auto" }]
        }"#,
    )?;
    cli_command()?
        .arg("--config")
        .arg(config.path())
        .arg("--now")
        .arg("2024-01-03 12:34:56")
        .arg("parse")
        .arg("WeekStart")
        .assert()
        .success()
        .stdout("2024-01-01\n");
    cli_command()?
        .arg("--config")
        .arg(config.path())
        .arg("shift")
        .arg("2020-01-01 00:00 UTC")
        .arg("XST")
        .assert()
        .success()
        .stdout("2019-12-31 19:00 XST\n");
    Ok(())
}

#[test]
fn cli_invalid_config() -> Result<()> {
    let config = NamedTempFile::new("config.json")?;
    config.write_str(r#"{ "pivot": 50 }"#)?;
    cli_command()?
        .arg("--config")
        .arg(config.path())
        .arg("formats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration file"));
    Ok(())
}

#[test]
fn cli_json_logs() -> Result<()> {
    cli_command()?
        .arg("-vv")
        .arg("--log-format")
        .arg("json")
        .arg("parse")
        .arg("2020-01-01")
        .assert()
        .success()
        .stdout("2020-01-01\n")
        .stderr(predicate::str::contains(r#""level":"DEBUG""#));
    Ok(())
}
