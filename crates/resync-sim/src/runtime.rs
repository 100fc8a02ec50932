//! Scenario replay.
//!
//! Drives a [`ResyncController`] over a [`SimulatedSession`] step by step:
//! set the clock, fire due indicator timers, apply the host action, then
//! handle every event the action published.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use live_resync::{
    EventOutcome, LiveJump, ManualClock, MediaSession, MediaSource, ResumeOutcome,
    ResyncConfig, ResyncController, ResyncError, ResyncStatus, SessionEvents, Subscription,
};
use serde::Serialize;

use crate::scenario::{Action, Scenario, Step, media_source, tick_positions};
use crate::sim_session::SimulatedSession;

type SimController = ResyncController<SimulatedSession, ManualClock, String>;

/// One line of scenario output.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Report {
    SourceLoaded { at_ms: u64, source: MediaSource },
    Paused { at_ms: u64, recorded: bool },
    Resumed { at_ms: u64, outcome: ResumeOutcome },
    Ticks { at_ms: u64, count: usize, evicted: usize, retained: usize },
    LiveJump { at_ms: u64, jump: LiveJump },
    IndicatorHidden { at_ms: u64 },
    Ended { at_ms: u64 },
    HostError { at_ms: u64 },
    CommandFailed { at_ms: u64, error: String },
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::SourceLoaded { at_ms, source } => {
                write!(f, "{at_ms:>10} ms  load     {} ({:?})", source.url, source.kind)
            }
            Report::Paused { at_ms, recorded } => {
                if *recorded {
                    write!(f, "{at_ms:>10} ms  pause    timer started")
                } else {
                    write!(f, "{at_ms:>10} ms  pause    seek-induced, ignored")
                }
            }
            Report::Resumed { at_ms, outcome } => {
                write!(f, "{at_ms:>10} ms  resume   ")?;
                match outcome {
                    ResumeOutcome::NoPauseRecorded => write!(f, "no pause recorded"),
                    ResumeOutcome::NotLive { paused_ms } => {
                        write!(f, "paused {paused_ms} ms, not live")
                    }
                    ResumeOutcome::WithinThreshold {
                        paused_ms,
                        threshold_ms,
                    } => write!(f, "paused {paused_ms} ms <= {threshold_ms} ms, stay"),
                    ResumeOutcome::LiveEdgeUnavailable { paused_ms } => {
                        write!(f, "paused {paused_ms} ms, live edge unknown")
                    }
                    ResumeOutcome::Resynced { paused_ms, jump } => write!(
                        f,
                        "paused {paused_ms} ms, resynced to {:.3}s (flushed {})",
                        jump.target_position, jump.flushed_segments
                    ),
                }
            }
            Report::Ticks {
                at_ms,
                count,
                evicted,
                retained,
            } => write!(
                f,
                "{at_ms:>10} ms  tick     x{count}, evicted {evicted}, retained {retained}"
            ),
            Report::LiveJump { at_ms, jump } => write!(
                f,
                "{at_ms:>10} ms  live     jumped to {:.3}s (flushed {}, indicator until {} ms)",
                jump.target_position, jump.flushed_segments, jump.indicator_hide_at_ms
            ),
            Report::IndicatorHidden { at_ms } => {
                write!(f, "{at_ms:>10} ms  live     indicator hidden")
            }
            Report::Ended { at_ms } => write!(f, "{at_ms:>10} ms  ended"),
            Report::HostError { at_ms } => write!(f, "{at_ms:>10} ms  error    host error logged"),
            Report::CommandFailed { at_ms, error } => {
                write!(f, "{at_ms:>10} ms  failed   {error}")
            }
        }
    }
}

/// Everything a scenario run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub reports: Vec<Report>,
    pub status: ResyncStatus,
    /// Seek targets accepted by the simulated host.
    pub seeks: Vec<f64>,
}

/// Load a scenario file, replay it, and print the reports.
pub fn run_file(config: ResyncConfig, path: &Path, json: bool) -> Result<()> {
    let scenario = Scenario::load(path)?;
    tracing::info!(
        path = %path.display(),
        steps = scenario.steps.len(),
        "replaying scenario"
    );
    let summary = run_scenario(config, &scenario)?;
    if json {
        for report in &summary.reports {
            println!("{}", serde_json::to_string(report)?);
        }
        println!(
            "{}",
            serde_json::to_string(&serde_json::json!({ "status": summary.status }))?
        );
    } else {
        for report in &summary.reports {
            println!("{report}");
        }
        println!("{}", serde_json::to_string_pretty(&summary.status)?);
    }
    Ok(())
}

/// Replay `scenario` from a clean session.
pub fn run_scenario(config: ResyncConfig, scenario: &Scenario) -> Result<RunSummary> {
    let clock = ManualClock::new(0);
    let events = SessionEvents::<String>::new();
    let subscription = events.subscribe();
    let session = SimulatedSession::new(
        events.clone(),
        scenario.source.duration,
        scenario.source.live_edge,
    );
    let mut controller = ResyncController::new(session, clock.clone(), config);
    let mut reports = Vec::new();

    let source = scenario.source.media_source();
    controller
        .load_source(source.clone())
        .context("load initial source")?;
    reports.push(Report::SourceLoaded { at_ms: 0, source });

    for step in &scenario.steps {
        clock.set(step.at_ms);
        if controller.poll_timers() {
            reports.push(Report::IndicatorHidden { at_ms: step.at_ms });
        }
        apply_step(&mut controller, step, &mut reports);
        handle_pending(&mut controller, &subscription, step.at_ms, &mut reports);
    }

    let status = controller.status();
    let session = controller.teardown();
    let seeks = session.seeks().to_vec();

    Ok(RunSummary {
        reports,
        status,
        seeks,
    })
}

fn apply_step(controller: &mut SimController, step: &Step, reports: &mut Vec<Report>) {
    let at_ms = step.at_ms;
    let result: Result<(), ResyncError> = match &step.action {
        Action::Pause => controller.session_mut().pause().map_err(Into::into),
        Action::SeekPause => {
            // The seek completes before the queued pause is handled.
            let session = controller.session_mut();
            session.seek_pause();
            session.finish_seek();
            Ok(())
        }
        Action::Play => controller.session_mut().play().map_err(Into::into),
        Action::Tick { position, segment } => {
            let segment = segment
                .clone()
                .unwrap_or_else(|| segment_name(*position));
            controller.session_mut().tick(*position, segment);
            Ok(())
        }
        Action::Ticks { from, to, step } => {
            for position in tick_positions(*from, *to, *step) {
                controller.session_mut().tick(position, segment_name(position));
            }
            Ok(())
        }
        Action::SetLiveEdge { position } => {
            controller.session_mut().set_live_edge(*position);
            Ok(())
        }
        Action::FailNextSeek => {
            controller.session_mut().fail_next_seek();
            Ok(())
        }
        Action::JumpLive => controller.jump_to_live().map(|jump| {
            reports.push(Report::LiveJump { at_ms, jump });
        }),
        Action::Load { url, kind } => {
            let source = media_source(url, *kind);
            controller.load_source(source.clone()).map(|()| {
                reports.push(Report::SourceLoaded { at_ms, source });
            })
        }
        Action::Ended => {
            controller.session_mut().end();
            Ok(())
        }
        Action::Error { message } => {
            controller.session_mut().error(message.clone());
            Ok(())
        }
    };
    if let Err(err) = result {
        reports.push(Report::CommandFailed {
            at_ms,
            error: err.to_string(),
        });
    }
}

fn handle_pending(
    controller: &mut SimController,
    subscription: &Subscription<String>,
    at_ms: u64,
    reports: &mut Vec<Report>,
) {
    let mut ticks = 0;
    let mut evicted_total = 0;
    while let Some(event) = subscription.try_next() {
        match controller.handle_event(event) {
            Ok(EventOutcome::Ticked { evicted }) => {
                ticks += 1;
                evicted_total += evicted;
            }
            Ok(EventOutcome::Paused { recorded }) => {
                reports.push(Report::Paused { at_ms, recorded })
            }
            Ok(EventOutcome::Resumed(outcome)) => reports.push(Report::Resumed { at_ms, outcome }),
            Ok(EventOutcome::Ended) => reports.push(Report::Ended { at_ms }),
            Ok(EventOutcome::Errored) => reports.push(Report::HostError { at_ms }),
            Err(err) => reports.push(Report::CommandFailed {
                at_ms,
                error: err.to_string(),
            }),
        }
    }
    if ticks > 0 {
        reports.push(Report::Ticks {
            at_ms,
            count: ticks,
            evicted: evicted_total,
            retained: controller.buffer().len(),
        });
    }
}

fn segment_name(position: f64) -> String {
    format!("segment@{position:.3}")
}
