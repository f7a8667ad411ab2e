//! End-to-end runs of the `culprit` binary against small shell scripts.

use crate::common::Sandbox;

#[test]
fn finds_flip_between_good_and_bad() {
    let sandbox = Sandbox::new();
    let run = sandbox.run(&["--good", "0", "--bad", "100", r#"test "$PROBE" -lt 42"#]);

    assert!(run.success(), "{}", run.stderr);
    assert_eq!(
        run.stdout,
        "▷ Culprit found:\n  Before: 41 [GOOD]\n  After:  42 [BAD]\n"
    );
    assert!(run.stderr.contains("Using 0 as GOOD, using 100 as BAD"), "{}", run.stderr);
    assert!(run.stderr.contains("▷ Verifying that 100 is BAD..."), "{}", run.stderr);
    assert!(run.stderr.contains("7 probes; total time elapsed"), "{}", run.stderr);
}

#[test]
fn reversed_direction_reports_bad_before_good() {
    let sandbox = Sandbox::new();
    let run = sandbox.run(&["--good", "100", "--bad", "1", r#"test "$PROBE" -ge 42"#]);

    assert!(run.success(), "{}", run.stderr);
    assert!(run.stdout.contains("Before: 41 [BAD]"), "{}", run.stdout);
    assert!(run.stdout.contains("After:  42 [GOOD]"), "{}", run.stdout);
}

#[test]
fn script_words_are_joined() {
    let sandbox = Sandbox::new();
    let run = sandbox.run(&["--bad", "10", "--", "test", "$PROBE", "-lt", "3"]);

    assert!(run.success(), "{}", run.stderr);
    assert!(run.stdout.contains("Before: 2 [GOOD]"), "{}", run.stdout);
    assert!(run.stdout.contains("After:  3 [BAD]"), "{}", run.stdout);
}

#[test]
fn verification_mismatch_fails_before_searching() {
    let sandbox = Sandbox::new();
    let run = sandbox.run(&["--good", "10", "--bad", "100", "false"]);

    assert_eq!(run.code, Some(1));
    assert!(run.stdout.is_empty(), "{}", run.stdout);
    assert!(
        run.stderr
            .contains("value 10 reports as BAD, but is expected to be GOOD"),
        "{}",
        run.stderr
    );
    assert!(!run.stderr.contains("Current state"), "{}", run.stderr);
}

#[test]
fn verification_can_be_disabled() {
    let sandbox = Sandbox::new();
    // Every probe is BAD, so the flip collapses onto the GOOD endpoint.
    let run = sandbox.run(&["--good", "10", "--bad", "20", "--verify=false", "false"]);

    assert!(run.success(), "{}", run.stderr);
    assert!(run.stdout.contains("Before: 10 [GOOD]"), "{}", run.stdout);
    assert!(run.stdout.contains("After:  11 [BAD]"), "{}", run.stdout);
    assert!(!run.stderr.contains("Verifying"), "{}", run.stderr);
}

#[test]
fn bracketing_finds_unknown_bad_endpoint() {
    let sandbox = Sandbox::new();
    let run = sandbox.run(&[
        "--good",
        "1",
        "--bad",
        "0",
        "--bracket",
        r#"test "$PROBE" -lt 300"#,
    ]);

    assert!(run.success(), "{}", run.stderr);
    assert!(run.stdout.contains("Before: 299 [GOOD]"), "{}", run.stdout);
    assert!(run.stdout.contains("After:  300 [BAD]"), "{}", run.stdout);
    assert!(
        run.stderr
            .contains("Found bracketing value: hi=513 [BAD], adjusted lo to 257"),
        "{}",
        run.stderr
    );
}

#[test]
fn bracketing_respects_bmax() {
    let sandbox = Sandbox::new();
    let run = sandbox.run(&[
        "--good", "1", "--bad", "0", "--bracket", "--bmax", "100", "true",
    ]);

    assert_eq!(run.code, Some(1));
    assert!(
        run.stderr
            .contains("no bracketing value found between lo=1 [GOOD] and 100"),
        "{}",
        run.stderr
    );
}

#[test]
fn probe_list_maps_indices_to_values() {
    let sandbox = Sandbox::new();
    let list: String = (1..=10)
        .map(|i| {
            if i < 7 {
                format!("ok-{i}\n")
            } else {
                format!("broken-{i}\n")
            }
        })
        .collect();
    let list = sandbox.file("revs.txt", &list);

    let run = sandbox.run(&[
        "--probes",
        &list,
        r#"case "$PROBE" in ok-*) exit 0;; *) exit 1;; esac"#,
    ]);

    assert!(run.success(), "{}", run.stderr);
    assert!(run.stderr.contains("Using 1 as GOOD, using 10 as BAD"), "{}", run.stderr);
    assert!(run.stdout.contains("Before: 6 [GOOD] (ok-6)"), "{}", run.stdout);
    assert!(run.stdout.contains("After:  7 [BAD] (broken-7)"), "{}", run.stdout);
}

#[test]
fn probe_list_rejects_out_of_range_index() {
    let sandbox = Sandbox::new();
    let list = sandbox.file("revs.txt", "a\nb\nc\n");
    let run = sandbox.run(&["--probes", &list, "--good", "1", "--bad", "9", "true"]);

    assert_eq!(run.code, Some(1));
    assert!(run.stderr.contains("invalid probe index 9"), "{}", run.stderr);
}

#[test]
fn cd_template_runs_probe_in_matching_directory() {
    let sandbox = Sandbox::new();
    for i in 0..=20 {
        std::fs::create_dir_all(sandbox.path().join("trees").join(i.to_string())).unwrap();
    }
    for i in 0..12 {
        sandbox.file(&format!("trees/{i}/ok"), "");
    }
    let template = format!("{}/trees/$PROBE", sandbox.path().display());

    let run = sandbox.run(&["--bad", "20", "--cd", &template, "test -f ok"]);

    assert!(run.success(), "{}", run.stderr);
    assert!(run.stdout.contains("Before: 11 [GOOD]"), "{}", run.stdout);
    assert!(run.stdout.contains("After:  12 [BAD]"), "{}", run.stdout);
}

#[test]
fn env_flag_renames_probe_variable() {
    let sandbox = Sandbox::new();
    let run = sandbox.run(&["--bad", "64", "--env", "REV", r#"test "$REV" -lt 5"#]);

    assert!(run.success(), "{}", run.stderr);
    assert!(run.stdout.contains("After:  5 [BAD]"), "{}", run.stdout);
}

#[test]
fn config_file_supplies_defaults() {
    let sandbox = Sandbox::new();
    let config = sandbox.file(
        "culprit.toml",
        "[probe]\nenv = \"REV\"\n\n[search]\nverify = false\n",
    );
    let run = sandbox.run(&["--config", &config, "--bad", "64", r#"test "$REV" -lt 5"#]);

    assert!(run.success(), "{}", run.stderr);
    assert!(run.stdout.contains("After:  5 [BAD]"), "{}", run.stdout);
    assert!(!run.stderr.contains("Verifying"), "{}", run.stderr);
}

#[test]
fn default_config_is_read_from_home() {
    let sandbox = Sandbox::new();
    sandbox.file(".culprit/config.toml", "[probe]\nenv = \"REV\"\n");
    let run = sandbox.run(&["--bad", "64", r#"test "$REV" -lt 5"#]);

    assert!(run.success(), "{}", run.stderr);
    assert!(run.stdout.contains("After:  5 [BAD]"), "{}", run.stdout);
}

#[test]
fn broken_config_is_an_error() {
    let sandbox = Sandbox::new();
    let config = sandbox.file("culprit.toml", "[search\n");
    let run = sandbox.run(&["--config", &config, "--bad", "4", "true"]);

    assert_eq!(run.code, Some(1));
    assert!(run.stderr.contains("loading config"), "{}", run.stderr);
}

#[test]
fn timeout_aborts_the_search() {
    let sandbox = Sandbox::new();
    let started = std::time::Instant::now();
    let run = sandbox.run(&[
        "--good",
        "1",
        "--bad",
        "100",
        "--verify=false",
        "--timeout",
        "1",
        "sleep 30",
    ]);

    assert_eq!(run.code, Some(1));
    assert!(run.stderr.contains("timed out"), "{}", run.stderr);
    assert!(started.elapsed() < std::time::Duration::from_secs(20));
}

#[test]
fn quiet_leaves_only_the_verdict() {
    let sandbox = Sandbox::new();
    let run = sandbox.run(&["-q", "--bad", "100", r#"test "$PROBE" -lt 42"#]);

    assert!(run.success());
    assert!(run.stderr.is_empty(), "{}", run.stderr);
    assert!(run.stdout.contains("After:  42 [BAD]"), "{}", run.stdout);
}

#[test]
fn echo_forwards_probe_output_to_stderr() {
    let sandbox = Sandbox::new();
    let run = sandbox.run(&["--bad", "4", "--echo", r#"echo "probing $PROBE"; test "$PROBE" -lt 2"#]);

    assert!(run.success(), "{}", run.stderr);
    assert!(run.stderr.contains("probing 4"), "{}", run.stderr);
    assert!(!run.stdout.contains("probing"), "{}", run.stdout);
}

#[test]
fn log_prints_each_script_and_directory() {
    let sandbox = Sandbox::new();
    for i in 1..=2 {
        std::fs::create_dir_all(sandbox.path().join("trees").join(i.to_string())).unwrap();
    }
    let root = sandbox.path().join("trees");
    let template = format!("{}/$PROBE", root.display());

    let run = sandbox.run(&["--bad", "2", "--log", "--cd", &template, "test $PROBE -lt 1"]);

    assert!(run.success(), "{}", run.stderr);
    assert!(run.stderr.contains("SCRIPT :: test $PROBE -lt 1"), "{}", run.stderr);
    let chdir_2 = format!("CHDIR :: {}", root.join("2").display());
    let chdir_1 = format!("CHDIR :: {}", root.join("1").display());
    assert!(run.stderr.contains(&chdir_2), "{}", run.stderr);
    assert!(run.stderr.contains(&chdir_1), "{}", run.stderr);
}

#[test]
fn bracketing_stops_at_end_of_probe_list() {
    let sandbox = Sandbox::new();
    let list = sandbox.file("revs.txt", "a\nb\nc\n");
    let run = sandbox.run(&["--probes", &list, "--good", "1", "--bracket", "true"]);

    assert_eq!(run.code, Some(1));
    assert!(
        run.stderr
            .contains("no bracketing value found between lo=1 [GOOD] and 3"),
        "{}",
        run.stderr
    );
    assert!(!run.stderr.contains("invalid probe index"), "{}", run.stderr);
}

#[test]
fn single_entry_probe_list_is_explained() {
    let sandbox = Sandbox::new();
    let list = sandbox.file("revs.txt", "only\n");
    let run = sandbox.run(&["--probes", &list, "true"]);

    assert_eq!(run.code, Some(1));
    assert!(run.stderr.contains("probe list has 1 entry"), "{}", run.stderr);
}

#[test]
fn bracket_flag_overrides_config() {
    let sandbox = Sandbox::new();
    sandbox.file(".culprit/config.toml", "[search]\nbracket = true\nmax_bracket = 10\n");
    // With bracketing on, lo=0 would be rebased and the run would exhaust at 10.
    let run = sandbox.run(&["--bad", "64", "--bracket=false", r#"test "$PROBE" -lt 5"#]);

    assert!(run.success(), "{}", run.stderr);
    assert!(run.stdout.contains("After:  5 [BAD]"), "{}", run.stdout);
    assert!(!run.stderr.contains("Bracketing"), "{}", run.stderr);
}

#[test]
fn missing_script_is_a_usage_error() {
    let sandbox = Sandbox::new();
    let run = sandbox.run(&["--good", "1", "--bad", "2"]);

    assert_eq!(run.code, Some(2));
}

#[test]
fn equal_endpoints_are_rejected() {
    let sandbox = Sandbox::new();
    let run = sandbox.run(&["--good", "5", "--bad", "5", "true"]);

    assert_eq!(run.code, Some(1));
    assert!(run.stderr.contains("distinct"), "{}", run.stderr);
}
