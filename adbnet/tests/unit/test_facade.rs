//! Execution facade tests

use std::net::Ipv4Addr;
use std::sync::Arc;

use adbnet::facade::{ExecutionFacade, Operation};
use adbnet::models::address::Address;
use adbnet::models::device::AttachedDevice;
use adbnet::scanner::device::{DeviceProbe, ProbeOptions};
use adbnet::scanner::interfaces::StaticInterfaces;
use adbnet::scanner::subnet::SubnetScanner;
use futures::StreamExt;

use crate::common::{FakePorts, FakeRunner};

const DIR_LISTING: [&str; 4] = [
    "total 16",
    "drwxrwx--x  4 root sdcard_rw 4096 2024-05-01 09:12 .",
    "drwx--x--x  4 root sdcard_rw 4096 2024-05-01 09:12 ..",
    "drwxrwx--x  2 root sdcard_rw 4096 2024-05-01 09:12 Download",
];

fn facade(runner: Arc<FakeRunner>, open_hosts: &[&str], local: Vec<Ipv4Addr>) -> ExecutionFacade {
    let ports = Arc::new(FakePorts::open(open_hosts));
    let probe = Arc::new(DeviceProbe::new(ports, runner.clone(), ProbeOptions::default()));
    let scanner = SubnetScanner::new(Arc::new(StaticInterfaces(local)), probe.clone(), 5555);
    ExecutionFacade::new(runner, probe, scanner)
}

async fn run(facade: &ExecutionFacade, operation: Operation) -> Vec<String> {
    facade.run_named_operation(operation).collect().await
}

#[tokio::test]
async fn test_input_text_is_escaped() {
    let runner = Arc::new(FakeRunner::new());
    let f = facade(runner.clone(), &[], vec![]);

    run(&f, Operation::InputText { text: "a b&c".into() }).await;
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("a%sb\\&c"));
    assert_eq!(calls[0], "adb shell input text \"a%sb\\&c\"");
}

#[tokio::test]
async fn test_list_missing_path() {
    let runner = Arc::new(FakeRunner::new().with(
        "adb shell ls -la \"/missing\"",
        &["ls: /missing: No such file or directory"],
    ));
    let f = facade(runner.clone(), &[], vec![]);

    let lines = run(&f, Operation::ListPath { path: "/missing".into() }).await;
    assert_eq!(lines, vec!["invalid path: /missing"]);
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn test_list_directory_lists_again() {
    let runner = Arc::new(FakeRunner::new().with("adb shell ls -la \"/sdcard\"", &DIR_LISTING));
    let f = facade(runner.clone(), &[], vec![]);

    let lines = run(&f, Operation::ListPath { path: "/sdcard".into() }).await;
    let mut expected: Vec<String> = DIR_LISTING.iter().map(|l| l.to_string()).collect();
    expected.push("directory: /sdcard".into());
    expected.extend(DIR_LISTING.iter().map(|l| l.to_string()));
    assert_eq!(lines, expected);
    assert_eq!(runner.calls().len(), 2);
}

#[tokio::test]
async fn test_list_file() {
    let entry = "-rw-rw----  1 root sdcard_rw 2048 2024-05-01 09:12 /sdcard/notes.txt";
    let runner = Arc::new(FakeRunner::new().with("adb shell ls -la \"/sdcard/notes.txt\"", &[entry]));
    let f = facade(runner.clone(), &[], vec![]);

    let lines = run(&f, Operation::ListPath { path: "/sdcard/notes.txt".into() }).await;
    assert_eq!(lines, vec![entry.to_string(), "file: /sdcard/notes.txt".to_string()]);
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn test_list_passes_runner_error_through() {
    let runner = Arc::new(FakeRunner::new().with("adb shell ls -la \"/sdcard\"", &["error: tool not found: adb"]));
    let f = facade(runner, &[], vec![]);

    let lines = run(&f, Operation::ListPath { path: "/sdcard".into() }).await;
    assert_eq!(lines, vec!["error: tool not found: adb"]);
}

#[tokio::test]
async fn test_named_operations_stream_runner_output() {
    let runner = Arc::new(
        FakeRunner::new()
            .with("adb version", &["Android Debug Bridge version 1.0.41"])
            .with("adb push \"/tmp/a.apk\" \"/sdcard/\"", &["/tmp/a.apk: 1 file pushed."]),
    );
    let f = facade(runner.clone(), &[], vec![]);

    assert_eq!(run(&f, Operation::Version).await, vec!["Android Debug Bridge version 1.0.41"]);
    let pushed = run(
        &f,
        Operation::Push {
            source: "/tmp/a.apk".into(),
            target: "/sdcard/".into(),
        },
    )
    .await;
    assert_eq!(pushed, vec!["/tmp/a.apk: 1 file pushed."]);
    run(&f, Operation::KeyEvent { code: 3 }).await;
    assert_eq!(runner.calls()[2], "adb shell input keyevent 3");
}

#[tokio::test]
async fn test_attached_devices() {
    let runner = Arc::new(FakeRunner::new().with(
        "adb devices",
        &[
            "* daemon started successfully",
            "List of devices attached",
            "192.168.1.100:5555\tdevice",
            "emulator-5554\toffline",
            "",
        ],
    ));
    let f = facade(runner, &[], vec![]);

    assert_eq!(
        f.attached_devices().await,
        vec![
            AttachedDevice {
                serial: "192.168.1.100:5555".into(),
                state: "device".into()
            },
            AttachedDevice {
                serial: "emulator-5554".into(),
                state: "offline".into()
            },
        ]
    );
    assert!(f.is_device_connected().await);
}

#[tokio::test]
async fn test_no_online_device() {
    let runner = Arc::new(FakeRunner::new().with(
        "adb devices",
        &["List of devices attached", "R58M123ABC\tunauthorized"],
    ));
    assert!(!facade(runner, &[], vec![]).is_device_connected().await);
}

#[tokio::test]
async fn test_connect_and_scan() {
    let runner = Arc::new(FakeRunner::new().with("adb connect 10.1.2.50:5555", &["connected to 10.1.2.50:5555"]));
    let f = facade(runner, &["10.1.2.50"], vec![Ipv4Addr::new(10, 1, 2, 3)]);

    assert!(f.connect(&Address::new("10.1.2.50", 5555)).await);
    assert!(!f.connect(&Address::new("10.1.2.51", 5555)).await);

    let last = f.scan_for_devices().collect::<Vec<_>>().await.pop().unwrap();
    assert!(last.done);
    assert_eq!(last.discovered, vec![Address::new("10.1.2.50", 5555)]);
}

#[tokio::test]
async fn test_listing_is_repeatable() {
    let entry = "-rw-rw----  1 root sdcard_rw 2048 2024-05-01 09:12 /sdcard/notes.txt";
    let runner = Arc::new(
        FakeRunner::new()
            .with("adb shell ls -la \"/sdcard\"", &DIR_LISTING)
            .with("adb shell ls -la \"/sdcard/notes.txt\"", &[entry]),
    );
    let f = facade(runner.clone(), &[], vec![]);

    for path in ["/sdcard", "/sdcard/notes.txt"] {
        let first = run(&f, Operation::ListPath { path: path.into() }).await;
        let second = run(&f, Operation::ListPath { path: path.into() }).await;
        assert!(!first.is_empty());
        assert_eq!(first, second, "listing {} changed between runs", path);
    }
    // Two passes per directory run, one per file run.
    assert_eq!(runner.calls().len(), 6);
}
