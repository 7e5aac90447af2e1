use assert_cmd::Command;
use predicates::prelude::*;
use qsafp_relay::app::{App, SourceKind};
use qsafp_relay::collector::CollectorError;
use qsafp_relay::domain::RelayError;
use qsafp_relay::report::{ReportingPolicy, WriterSink};

const RELAY_ENV: [&str; 9] = [
    "RELAY_JSON",
    "RELAY_MODE",
    "FIRMWARE_PATH",
    "RELAY_SIMULATE",
    "SIMULATE_PROFILE",
    "SIMULATED_TICKS",
    "OUTPUT_FORMAT",
    "LOG_LEVEL",
    "CONFIG_FILE",
];

fn relay_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_qsafp-relay"));
    for var in RELAY_ENV {
        cmd.env_remove(var);
    }
    cmd
}

#[tokio::test]
async fn test_json_flag_selects_verbose_end_to_end() {
    let app = App::from_args(["qsafp-relay", "--json", "--simulate", "--simulated-ticks", "1"])
        .unwrap();
    assert_eq!(app.config().effective_policy(), ReportingPolicy::Verbose);

    let mut sink = WriterSink::new(Vec::new());
    let summary = app.run_with_sink(&mut sink).await.unwrap();
    let output = String::from_utf8(sink.into_inner()).unwrap();

    assert_eq!(
        output,
        concat!(
            "[LOG passthrough] [BOOT] QSAFP Firmware Stub starting up...\n",
            "[LOG passthrough] [TICK] Runtime tick 0 (total ticks: 1)\n",
            "[Validator] Event: heartbeat | Tick: 1 | Status: ok\n",
            "[LOG passthrough] [SHUTDOWN] QSAFP Firmware Stub shutting down.\n",
            "[Validator] Event: shutdown | Tick: 1 | Status: completed\n",
        )
    );
    assert_eq!(summary.events, 2);
    assert_eq!(summary.exit_code, Some(0));
}

#[tokio::test]
async fn test_launch_failure_surfaces_from_app_run() {
    let app = App::from_args(["qsafp-relay", "--firmware", "/nonexistent/qsafp_firmware"])
        .unwrap();
    assert_eq!(
        app.config().source_kind(),
        SourceKind::Process("/nonexistent/qsafp_firmware".into())
    );

    let mut sink = WriterSink::new(Vec::new());
    let result = app.run_with_sink(&mut sink).await;

    assert!(
        matches!(
            result,
            Err(RelayError::Collector(CollectorError::Spawn { .. }))
        ),
        "{result:?}"
    );
    assert_eq!(sink.emitted(), 0);
}

#[test]
fn test_binary_exits_with_one_on_launch_failure() {
    relay_command()
        .args(["--json", "--firmware", "/nonexistent/qsafp_firmware"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_binary_relays_simulated_firmware() {
    relay_command()
        .args(["--json", "--simulate", "--simulated-ticks", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[Validator] Event: heartbeat | Tick: 1 | Status: ok",
        ));
}

#[test]
fn test_binary_rejects_conflicting_flags() {
    // clap reports usage errors with exit code 2
    relay_command()
        .args(["--json", "--mode", "validator"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}
