//! # Integration Tests
//!
//! End-to-end scenarios across the workspace crates.
//!
//! Covers:
//! - Config -> destinations -> dispatcher -> file output
//! - Operator command flows against the in-memory doubles
//! - Pacing and lifecycle properties under a paused clock

#[cfg(test)]
mod contract_tests {
    use contracts::{ConflictPolicy, PasteConfig};

    #[test]
    fn test_default_config_round_trips_through_loader() {
        let config = PasteConfig::default();
        let json = config_loader::ConfigLoader::to_json(&config).unwrap();
        let parsed =
            config_loader::ConfigLoader::load_from_str(&json, config_loader::ConfigFormat::Json)
                .unwrap();
        assert_eq!(parsed.paste.default_delay_ms, 2500);
        assert_eq!(parsed.paste.on_conflict, ConflictPolicy::Reject);
    }

    #[test]
    fn test_demo_config_is_valid() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/linepacer.toml");
        let config = config_loader::ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(config.paste.min_delay_ms, 250);
        assert_eq!(config.destinations.len(), 3);
    }
}

#[cfg(test)]
mod harness {
    use std::sync::Arc;

    use contracts::{ContextId, Notice, PasteSettings};
    use scheduler::{CommandDispatcher, MemoryDestination, Paster, RecordingNotifier};
    use source_loader::MemorySourceLoader;

    pub struct Harness {
        pub dispatcher: CommandDispatcher<MemoryDestination, RecordingNotifier, MemorySourceLoader>,
        pub notifier: Arc<RecordingNotifier>,
    }

    impl Harness {
        pub fn new(settings: PasteSettings, sources: &[(&str, &str)]) -> Self {
            let loader = MemorySourceLoader::new();
            for (path, text) in sources {
                loader.insert(*path, text.as_bytes());
            }
            let notifier = Arc::new(RecordingNotifier::new());
            let paster = Arc::new(Paster::new(settings, Arc::clone(&notifier)));
            Self {
                dispatcher: CommandDispatcher::new(paster, loader),
                notifier,
            }
        }

        pub async fn run(&self, context: &str, destination: &MemoryDestination, input: &str) -> String {
            let notice: Notice = self
                .dispatcher
                .dispatch(&ContextId::new(context), destination, input)
                .await;
            notice.to_string()
        }

        pub fn paster(&self) -> &Arc<Paster<MemoryDestination, RecordingNotifier>> {
            self.dispatcher.paster()
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ContextId, Destination, JobState, PasteSettings, PauseReason};
    use scheduler::{create_destination, CommandDispatcher, HostDestination, LogNotifier, Paster};
    use source_loader::FileSourceLoader;
    use std::sync::Arc;

    /// Config file -> file destination -> file source, with real timers
    #[tokio::test]
    async fn test_e2e_file_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("channel.log");
        let source = dir.path().join("song.txt");
        std::fs::write(&source, "\u{feff}first\r\n\r\nthird\n").unwrap();

        let toml = format!(
            r##"
[paste]
default_delay_ms = 20

[[destinations]]
name = "#general"
network = "local"
kind = "file"
params = {{ path = "{}" }}
"##,
            out.display()
        );
        let config = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        let destination = create_destination(&config.destinations[0]).await.unwrap();
        assert!(matches!(destination, HostDestination::File(_)));

        let paster = Arc::new(Paster::new(config.paste.clone(), Arc::new(LogNotifier)));
        let dispatcher = CommandDispatcher::new(Arc::clone(&paster), FileSourceLoader::new());

        let notice = dispatcher
            .dispatch(
                &ContextId::new("console"),
                &destination,
                &format!("paste {}", source.display()),
            )
            .await;
        assert_eq!(
            notice.to_string(),
            "linepacer: pasting (3 lines) to: #general - local."
        );

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "first\n \nthird\n");
        assert!(paster.registry().is_empty());
    }

    #[tokio::test]
    async fn test_e2e_unreadable_source_registers_nothing() {
        let dest = create_destination(&contracts::DestinationConfig {
            name: "#log".to_string(),
            network: "local".to_string(),
            kind: contracts::DestinationKind::Log,
            params: HashMap::new(),
        })
        .await
        .unwrap();
        let paster = Arc::new(Paster::new(PasteSettings::default(), Arc::new(LogNotifier)));
        let dispatcher = CommandDispatcher::new(Arc::clone(&paster), FileSourceLoader::new());

        let notice = dispatcher
            .dispatch(&"console".into(), &dest, "paste /definitely/not/here.txt")
            .await;
        assert!(notice
            .to_string()
            .starts_with("linepacer: unable to read: /definitely/not/here.txt"));
        assert!(paster.status().is_empty());
        assert_eq!(dest.id().channel(), "#log");
    }

    #[test]
    fn test_job_state_display() {
        assert_eq!(JobState::Running.to_string(), "pasting");
        assert_eq!(
            JobState::Paused(PauseReason::Unreachable).to_string(),
            "stopped (unreachable)"
        );
    }
}

/// The testable properties of the scheduler, one test per property
#[cfg(test)]
mod property_tests {
    use std::time::Duration;

    use contracts::{ConflictPolicy, Destination, JobState, PasteSettings, PauseReason};
    use scheduler::MemoryDestination;
    use tokio::time::sleep;

    use crate::harness::Harness;

    const ABC: &str = "a\nb\nc\n";
    const FINISHED: &str = "linepacer: no more lines, finished pasting to: #d - memory.";

    fn fast() -> PasteSettings {
        PasteSettings {
            default_delay_ms: 100,
            ..PasteSettings::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn uniqueness_second_paste_leaves_first_untouched() {
        let h = Harness::new(fast(), &[("a.txt", ABC), ("b.txt", "x\ny\n")]);
        let d = MemoryDestination::new("#d");

        h.run("ctx", &d, "paste a.txt").await;
        sleep(Duration::from_millis(150)).await;
        let before = h.paster().find(d.id()).unwrap().delivered;

        assert_eq!(
            h.run("ctx", &d, "paste b.txt").await,
            "linepacer: already pasting to: #d - memory."
        );
        assert_eq!(h.paster().find(d.id()).unwrap().delivered, before);
        assert_eq!(h.paster().status().len(), 1);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(d.lines(), vec!["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn order_survives_pause_resume_interleavings() {
        let text: String = (0..12).map(|i| format!("line {i}\n")).collect();
        let h = Harness::new(fast(), &[("long.txt", text.as_str())]);
        let d = MemoryDestination::new("#d");

        h.run("ctx", &d, "paste long.txt").await;
        for pause_ms in [30u64, 120, 5, 260, 0, 75] {
            sleep(Duration::from_millis(pause_ms + 1)).await;
            h.run("ctx", &d, "stop").await;
            sleep(Duration::from_millis(pause_ms * 2)).await;
            h.run("ctx", &d, "resume").await;
        }
        sleep(Duration::from_secs(5)).await;

        let expected: Vec<String> = (0..12).map(|i| format!("line {i}")).collect();
        assert_eq!(d.lines(), expected);
        assert_eq!(h.notifier.count_containing("finished pasting"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent() {
        let h = Harness::new(fast(), &[("a.txt", ABC)]);
        let d = MemoryDestination::new("#d");

        h.run("ctx", &d, "paste a.txt").await;
        sleep(Duration::from_millis(50)).await;

        assert_eq!(
            h.run("ctx", &d, "stop").await,
            "linepacer: stopped pasting (2 pending lines) to: #d - memory."
        );
        let first = h.paster().find(d.id()).unwrap();
        assert_eq!(
            h.run("ctx", &d, "stop").await,
            "linepacer: not pasting to: #d - memory."
        );
        let second = h.paster().find(d.id()).unwrap();

        assert_eq!(first.delivered, second.delivered);
        assert_eq!(second.state, JobState::Paused(PauseReason::Operator));
    }

    #[tokio::test(start_paused = true)]
    async fn resume_delivers_exactly_the_rest() {
        for k in 0..=3usize {
            let h = Harness::new(fast(), &[("a.txt", ABC)]);
            let d = MemoryDestination::new("#d");

            h.run("ctx", &d, "paste a.txt").await;
            if k > 0 {
                sleep(Duration::from_millis(100 * (k as u64 - 1) + 1)).await;
            }
            let stopped = h.run("ctx", &d, "stop").await;
            assert_eq!(d.write_count(), k, "k = {k}");

            sleep(Duration::from_secs(2)).await;
            assert_eq!(d.write_count(), k, "k = {k}");

            if k == 3 {
                // Finished before the stop arrived.
                assert_eq!(stopped, "linepacer: not pasting to: #d - memory.");
                continue;
            }
            h.run("ctx", &d, "resume").await;
            sleep(Duration::from_secs(2)).await;
            assert_eq!(d.lines(), vec!["a", "b", "c"], "k = {k}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn completion_removes_job() {
        let h = Harness::new(fast(), &[("a.txt", ABC)]);
        let d = MemoryDestination::new("#d");

        h.run("ctx", &d, "paste a.txt").await;
        sleep(Duration::from_secs(1)).await;

        assert!(h.paster().find(d.id()).is_none());
        assert_eq!(
            h.run("ctx", &d, "stop").await,
            "linepacer: not pasting to: #d - memory."
        );
        assert_eq!(
            h.run("ctx", &d, "resume").await,
            "linepacer: no pending lines to: #d - memory."
        );
        assert_eq!(h.notifier.messages_for("ctx").iter().filter(|m| *m == FINISHED).count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_destination_is_never_written() {
        let h = Harness::new(fast(), &[("a.txt", ABC)]);
        let d = MemoryDestination::new("#d");
        d.vanish_after(1);

        h.run("ctx", &d, "paste a.txt").await;
        sleep(Duration::from_secs(3)).await;

        assert_eq!(d.write_count(), 1);
        assert_eq!(
            h.notifier.count_containing(
                "stopping, target unreachable (2 pending lines): #d - memory."
            ),
            1
        );
        assert_eq!(
            h.paster().find(d.id()).unwrap().state,
            JobState::Paused(PauseReason::Unreachable)
        );

        assert_eq!(
            h.run("ctx", &d, "resume").await,
            "linepacer: target unreachable: #d - memory."
        );

        d.set_reachable(true);
        assert_eq!(
            h.run("rejoined", &d, "resume").await,
            "linepacer: resumed pasting (2 pending lines) to: #d - memory."
        );
        sleep(Duration::from_secs(1)).await;
        assert_eq!(d.lines(), vec!["a", "b", "c"]);
        assert_eq!(h.notifier.messages_for("rejoined").last().unwrap(), FINISHED);
    }

    #[tokio::test(start_paused = true)]
    async fn destinations_progress_independently() {
        let h = Harness::new(fast(), &[("a.txt", ABC)]);
        let fast_dest = MemoryDestination::new("#fast");
        let slow_dest = MemoryDestination::new("#slow");

        h.run("ctx", &fast_dest, "paste a.txt 100").await;
        h.run("ctx", &slow_dest, "paste a.txt 5000").await;

        sleep(Duration::from_millis(250)).await;
        assert_eq!(fast_dest.write_count(), 3);
        assert_eq!(slow_dest.write_count(), 1);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(slow_dest.lines(), vec!["a", "b", "c"]);

        let finished: Vec<String> = h
            .notifier
            .messages()
            .into_iter()
            .filter(|m| m.contains("finished pasting"))
            .collect();
        assert_eq!(finished.len(), 2);
        assert!(finished[0].contains("#fast"));
        assert!(finished[1].contains("#slow"));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_source_completes_without_writes() {
        let h = Harness::new(fast(), &[("empty.txt", "")]);
        let d = MemoryDestination::new("#d");

        assert_eq!(
            h.run("ctx", &d, "paste empty.txt").await,
            "linepacer: pasting (0 lines) to: #d - memory."
        );
        sleep(Duration::from_millis(10)).await;

        assert_eq!(d.write_count(), 0);
        assert_eq!(h.notifier.count_containing("finished pasting"), 1);
        assert!(h.paster().registry().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_source_rejected_when_disallowed() {
        let settings = PasteSettings {
            allow_empty_source: false,
            ..fast()
        };
        let h = Harness::new(settings, &[("empty.txt", "")]);
        let d = MemoryDestination::new("#d");

        assert_eq!(
            h.run("ctx", &d, "paste empty.txt").await,
            "linepacer: nothing to paste in: empty.txt."
        );
        assert!(h.paster().registry().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_stop_before_first_tick() {
        let h = Harness::new(fast(), &[("a.txt", ABC)]);
        let d = MemoryDestination::new("#d");

        let lines = contracts::LineBuffer::from_text(ABC);
        h.paster()
            .start(&"ctx".into(), d.clone(), lines, Duration::ZERO)
            .unwrap();
        h.paster().stop(d.id()).unwrap();

        sleep(Duration::from_secs(1)).await;
        assert_eq!(d.write_count(), 0);

        h.paster().resume(&"ctx".into(), d.id()).unwrap();
        sleep(Duration::from_millis(10)).await;
        assert_eq!(d.lines(), vec!["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn replace_policy_restarts_destination() {
        let settings = PasteSettings {
            on_conflict: ConflictPolicy::Replace,
            ..fast()
        };
        let h = Harness::new(settings, &[("a.txt", ABC), ("b.txt", "x\ny\n")]);
        let d = MemoryDestination::new("#d");

        h.run("ctx", &d, "paste a.txt").await;
        sleep(Duration::from_millis(150)).await;
        h.run("ctx", &d, "paste b.txt").await;
        sleep(Duration::from_secs(1)).await;

        assert_eq!(d.lines(), vec!["a", "b", "x", "y"]);
        assert_eq!(
            h.notifier.messages_for("ctx"),
            vec![
                "linepacer: pasting (3 lines) to: #d - memory.".to_string(),
                "linepacer: replacing current message to: #d - memory.".to_string(),
                "linepacer: pasting (2 lines) to: #d - memory.".to_string(),
                FINISHED.to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_commands_are_rejected() {
        let settings = PasteSettings {
            min_delay_ms: 50,
            ..fast()
        };
        let h = Harness::new(settings, &[("a.txt", ABC)]);
        let d = MemoryDestination::new("#d");

        assert_eq!(h.run("ctx", &d, "").await, "linepacer: no parameters.");
        assert_eq!(h.run("ctx", &d, "paste").await, "linepacer: no filename.");
        assert_eq!(
            h.run("ctx", &d, "paste a.txt soon").await,
            "linepacer: invalid delay: soon."
        );
        assert_eq!(
            h.run("ctx", &d, "paste a.txt -1").await,
            "linepacer: delay must be positive."
        );
        assert_eq!(
            h.run("ctx", &d, "paste a.txt 10").await,
            "linepacer: delay must be at least 50ms."
        );
        assert_eq!(
            h.run("ctx", &d, "shout").await,
            "linepacer: unknown action: shout."
        );
        assert!(h.paster().registry().is_empty());
        assert_eq!(h.notifier.len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn status_and_cancel_through_dispatcher() {
        let h = Harness::new(fast(), &[("a.txt", ABC)]);
        let d = MemoryDestination::new("#d");

        assert_eq!(h.run("ctx", &d, "status").await, "linepacer: nothing being pasted.");
        h.run("ctx", &d, "paste a.txt").await;
        sleep(Duration::from_millis(50)).await;
        h.run("ctx", &d, "stop").await;

        let status = h.run("ctx", &d, "status").await;
        assert!(status.contains("#d - memory - stopped - 1/3 lines, 2 pending, every 100ms"));

        assert_eq!(
            h.run("ctx", &d, "cancel").await,
            "linepacer: cancelled pasting (2 pending lines) to: #d - memory."
        );
        assert_eq!(
            h.run("ctx", &d, "cancel").await,
            "linepacer: no pending lines to: #d - memory."
        );
        assert!(h.run("ctx", &d, "help").await.contains("paste <file> [delay_ms]"));
    }
}

#[cfg(test)]
mod session_tests {
    use std::time::Duration;

    use observability::SessionStats;
    use scheduler::MemoryDestination;
    use tokio::time::sleep;

    use crate::harness::Harness;

    #[tokio::test(start_paused = true)]
    async fn session_summary_counts_every_outcome() {
        let h = Harness::new(Default::default(), &[("a.txt", "a\nb\nc\n"), ("one.txt", "x\n")]);
        let done = MemoryDestination::new("#done");
        let dropped = MemoryDestination::new("#dropped");
        let broken = MemoryDestination::new("#broken");
        let gone = MemoryDestination::new("#gone");
        broken.fail_writes(true);
        gone.vanish_after(1);

        h.run("ctx", &done, "paste one.txt 1000").await;
        h.run("ctx", &dropped, "paste a.txt 1000").await;
        h.run("ctx", &dropped, "cancel").await;
        h.run("ctx", &broken, "paste a.txt 1000").await;
        h.run("ctx", &gone, "paste a.txt 1000").await;
        h.run("ctx", &done, "resume").await;
        sleep(Duration::from_secs(10)).await;

        let mut stats = SessionStats::new();
        for (_, notice) in h.notifier.notices() {
            stats.record(&notice);
        }
        let summary = stats.summary();

        assert_eq!(summary.jobs_started, 4);
        assert_eq!(summary.jobs_completed, 1);
        assert_eq!(summary.jobs_cancelled, 1);
        assert_eq!(summary.jobs_failed, 1);
        assert_eq!(summary.auto_pauses, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.paste_size.count, 4);
        assert_eq!(summary.paste_size.min, 1.0);
        assert_eq!(summary.paste_size.max, 3.0);
        assert!(summary
            .to_string()
            .starts_with("=== Paste Session Summary ===\nPastes started: 4\n"));
    }
}
