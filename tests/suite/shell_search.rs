//! `run_search` driven by a real `ShellProbe`.

use culprit_core::{SearchEvent, SearchObserver, SearchOptions, SearchOutcome, run_search};
use culprit_tools::{ProbeMapping, ProbeSettings, ShellProbe, detect_shell};
use culprit_types::{Boundary, Culprit, Endpoints, Index, Status};

#[derive(Default)]
struct Probed(Vec<(Index, String, Status)>);

impl SearchObserver for Probed {
    fn on_event(&mut self, event: &SearchEvent<'_>) {
        if let SearchEvent::Probed(report) = event {
            self.0
                .push((report.index, report.value.clone(), report.status));
        }
    }
}

#[tokio::test]
async fn shell_probe_drives_full_search() {
    let mut probe = ShellProbe::new(
        detect_shell(None),
        r#"test "$PROBE" -lt 42"#,
        ProbeSettings::default(),
    );
    let mut seen = Probed::default();

    let report = run_search(
        Endpoints::new(0, 100).unwrap(),
        SearchOptions::default(),
        &mut probe,
        &mut seen,
    )
    .await
    .unwrap();

    assert_eq!(
        report.outcome,
        SearchOutcome::Culprit(Culprit {
            before: Boundary::new(41, Status::Good),
            after: Boundary::new(42, Status::Bad),
        })
    );
    assert_eq!(report.verify_probes, 1);
    assert_eq!(report.probes, 7);
    let indices: Vec<Index> = seen.0.iter().map(|(index, _, _)| *index).collect();
    assert_eq!(indices, vec![100, 50, 25, 37, 43, 40, 41, 42]);
}

#[tokio::test]
async fn mapped_values_reach_the_script() {
    let mapping = ProbeMapping::parse("v1\nv2\nv3\nv4\nv5\n").unwrap();
    let mut probe = ShellProbe::new(
        detect_shell(None),
        r#"case "$PROBE" in v1|v2) exit 0;; *) exit 3;; esac"#,
        ProbeSettings::default(),
    )
    .with_mapping(mapping);
    let mut seen = Probed::default();

    let report = run_search(
        Endpoints::new(1, 5).unwrap(),
        SearchOptions::default(),
        &mut probe,
        &mut seen,
    )
    .await
    .unwrap();

    assert_eq!(
        report.outcome,
        SearchOutcome::Culprit(Culprit {
            before: Boundary::new(2, Status::Good),
            after: Boundary::new(3, Status::Bad),
        })
    );
    assert!(seen.0.contains(&(3, "v3".to_string(), Status::Bad)));
}
