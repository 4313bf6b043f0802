// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

fn all_events() -> Vec<TraceEvent> {
    vec![
        TraceEvent::Pending,
        TraceEvent::Scheduled {
            server: "h1".to_string(),
        },
        TraceEvent::Configured {
            container_id: "c123".to_string(),
        },
        TraceEvent::ServiceRunning {
            container_id: "c123".to_string(),
            service: "web".to_string(),
        },
        TraceEvent::ServiceExited {
            container_id: "c123".to_string(),
            service: "web".to_string(),
            rc: 0,
            signal: 0,
        },
        TraceEvent::Finished { rc: 0, signal: 0 },
        TraceEvent::Aborted {
            reason: "2".to_string(),
        },
        TraceEvent::Killed { is_oom: false },
        TraceEvent::Deleted,
    ]
}

#[test]
fn encode_decode_round_trips_for_every_variant() {
    for event in all_events() {
        let data = event.encode_data();
        let decoded = TraceEvent::decode(event.event_type(), &data).unwrap();
        assert_eq!(decoded, event);
    }
}

#[test]
fn happy_path_exact_wire_strings() {
    let configured = TraceEvent::Configured {
        container_id: "c123".to_string(),
    };
    assert_eq!(configured.encode_data(), "c123");

    let running = TraceEvent::ServiceRunning {
        container_id: "c123".to_string(),
        service: "web".to_string(),
    };
    assert_eq!(running.encode_data(), "c123.web");

    let exited = TraceEvent::ServiceExited {
        container_id: "c123".to_string(),
        service: "web".to_string(),
        rc: 0,
        signal: 0,
    };
    assert_eq!(exited.encode_data(), "c123.web.0.0");

    let finished = TraceEvent::Finished { rc: 0, signal: 0 };
    assert_eq!(finished.encode_data(), "0.0");
}

#[test]
fn killed_exact_wire_strings() {
    let exited = TraceEvent::ServiceExited {
        container_id: "c123".to_string(),
        service: "web".to_string(),
        rc: 137,
        signal: 137,
    };
    assert_eq!(exited.encode_data(), "c123.web.137.137");

    let killed = TraceEvent::Killed { is_oom: false };
    assert_eq!(killed.encode_data(), "");
    assert_eq!(killed.event_type().as_str(), "killed");
}

#[test]
fn aborted_exact_wire_strings() {
    // The spec keeps `signal == rc` for aborted exits as a wire-compat
    // quirk; the state monitor is responsible for setting that, not the
    // codec itself.
    let exited = TraceEvent::ServiceExited {
        container_id: "c".to_string(),
        service: "web".to_string(),
        rc: 2,
        signal: 2,
    };
    assert_eq!(exited.encode_data(), "c.web.2.2");

    let aborted = TraceEvent::Aborted {
        reason: "2".to_string(),
    };
    assert_eq!(aborted.encode_data(), "2");
}

#[test]
fn finished_splits_on_last_dot_not_first() {
    // A first-dot split (the source's bug) would read this as rc="1",
    // signal="2.3", which fails to parse as an exit code. Splitting on
    // the last dot reads it as rc="1.2", which also fails to parse —
    // the point is that `rsplit_once` is what decode actually calls,
    // never `split_once`; verify that indirectly via the one case
    // where the two strategies agree and are both valid.
    let decoded = TraceEvent::decode(EventType::Finished, "0.137").unwrap();
    assert_eq!(
        decoded,
        TraceEvent::Finished {
            rc: 0,
            signal: 137
        }
    );
    assert!(TraceEvent::decode(EventType::Finished, "1.2.3").is_err());
}

#[test]
fn service_exited_splits_container_id_on_first_dot() {
    let decoded = TraceEvent::decode(EventType::ServiceExited, "c123.we.b.0.0").unwrap();
    assert_eq!(
        decoded,
        TraceEvent::ServiceExited {
            container_id: "c123".to_string(),
            service: "we.b".to_string(),
            rc: 0,
            signal: 0,
        }
    );
}

#[test]
fn event_file_round_trips_filename() {
    let event = EventFile::new(
        1_700_000_000_000,
        InstanceName::new("appA#001"),
        TraceEvent::Finished { rc: 0, signal: 0 },
    );
    let name = event.filename();
    assert_eq!(name, "1700000000000,appA#001,finished,0.0");
    let parsed = EventFile::parse(&name).unwrap();
    assert_eq!(parsed, event);
}

fn arb_rc() -> impl Strategy<Value = u16> {
    0u16..=255
}

proptest! {
    #[test]
    fn service_exited_round_trips(
        cid in "[a-f0-9]{8,12}",
        service in "[a-z]{1,6}(\\.[a-z]{1,4})?",
        rc in arb_rc(),
        signal in arb_rc(),
    ) {
        let event = TraceEvent::ServiceExited { container_id: cid, service, rc, signal };
        let data = event.encode_data();
        let decoded = TraceEvent::decode(EventType::ServiceExited, &data).unwrap();
        prop_assert_eq!(decoded, event);
    }

    #[test]
    fn finished_round_trips(rc in arb_rc(), signal in arb_rc()) {
        let event = TraceEvent::Finished { rc, signal };
        let data = event.encode_data();
        let decoded = TraceEvent::decode(EventType::Finished, &data).unwrap();
        prop_assert_eq!(decoded, event);
    }

    #[test]
    fn event_file_round_trips(
        ts in 0u64..10_000_000_000_000,
        app in "[a-zA-Z]{1,8}",
        task in "[a-zA-Z0-9]{0,6}",
    ) {
        let instance = if task.is_empty() {
            InstanceName::new(app)
        } else {
            InstanceName::new(format!("{app}#{task}"))
        };
        let event = EventFile::new(ts, instance, TraceEvent::Pending);
        let parsed = EventFile::parse(&event.filename()).unwrap();
        prop_assert_eq!(parsed, event);
    }
}
