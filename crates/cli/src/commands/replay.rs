//! Offline replay of a recorded event log through the pipeline

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::Result;
use leetaccel_atomic::CounterSnapshot;
use leetaccel_pipeline::{
    DeviceId, DiagnosticSummary, EchoMode, EmissionSink, InputEvent, MotionPipeline, OutputKind,
    OutputRecord, RecordingSink,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::commands::{Context, ReplayArgs};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct ReplayReport {
    device: DeviceId,
    echo_mode: EchoMode,
    records: Vec<OutputRecord>,
    counters: CounterSnapshot,
    diagnostics: DiagnosticSummary,
}

/// Feed every event in the log to one tracked device and print the output
/// stream.
///
/// Blank lines and lines starting with `#` are skipped. In loopback mode
/// each emitted event is fed back right after the input that produced it,
/// as a device echoing injected reports would. A window still open at end
/// of input is flushed.
///
/// # Errors
///
/// Unreadable input, a malformed line, or parameters the curve rejects.
pub fn execute(ctx: &Context, args: &ReplayArgs) -> Result<()> {
    let events = read_events(&args.file)?;
    let device = DeviceId::new(args.device.clone());
    let echo_mode = ctx.config.echo_mode;

    let mut pipeline =
        MotionPipeline::with_settings(RecordingSink::new(echo_mode), ctx.config.pipeline);
    pipeline
        .apply_parameters(ctx.params())
        .map_err(CliError::from)?;
    pipeline.track(device.clone());
    info!(device = %device, events = events.len(), mode = ?echo_mode, "Replaying event log");

    for event in events {
        pipeline.on_event(&device, event);
        loop_echoes(&mut pipeline);
    }
    let flushed = pipeline.force_flush(&device).map_err(CliError::from)?;
    if flushed > 0 {
        debug!(flushed, "Flushed trailing window");
        loop_echoes(&mut pipeline);
    }

    let dropped = pipeline.diagnostics().dropped();
    let diagnostics = DiagnosticSummary::from_events(&pipeline.drain_diagnostics(), dropped);
    let counters = pipeline.counters().snapshot();
    let report = ReplayReport {
        device,
        echo_mode,
        records: pipeline.into_sink().records().to_vec(),
        counters,
        diagnostics,
    };

    if ctx.json {
        return output::print_success_json(&report);
    }
    print_human(&report);
    Ok(())
}

fn loop_echoes(pipeline: &mut MotionPipeline<RecordingSink>) {
    if pipeline.sink().echo_mode() != EchoMode::Loopback {
        return;
    }
    // Echoes never produce new emissions, so one pass drains them.
    let echoes = pipeline.sink_mut().take_echoes();
    for (device, event) in echoes {
        pipeline.on_event(&device, event);
    }
}

fn read_events(path: &Path) -> Result<Vec<InputEvent>, CliError> {
    let reader: Box<dyn BufRead> = if path == Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(path)?))
    };

    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let event = trimmed.parse::<InputEvent>().map_err(|source| CliError::Replay {
            line: index + 1,
            source,
        })?;
        events.push(event);
    }
    Ok(events)
}

fn print_human(report: &ReplayReport) {
    output::heading(&format!("Output for {}", report.device));
    for record in &report.records {
        let kind = match record.kind {
            OutputKind::Emitted => "emit",
            OutputKind::PassedThrough => "pass",
        };
        println!("  {kind:<5} {}", record.event);
    }

    let c = &report.counters;
    output::heading("Counters");
    output::field("events seen", c.events_seen);
    output::field("consumed", c.events_consumed);
    output::field("passed through", c.events_passed_through);
    output::field("motion emitted", c.motion_emitted);
    output::field("echoes absorbed", c.echoes_absorbed);
    output::field("windows flushed", c.windows_flushed);
    output::field("curve faults", c.curve_faults);
    output::field("output clamps", c.output_clamps);
    output::field("unexpected echoes", c.unexpected_echoes);

    if !report.diagnostics.is_empty() {
        output::heading("Diagnostics");
        for (code, count) in &report.diagnostics.counts {
            output::field(code, count);
        }
        if report.diagnostics.dropped > 0 {
            output::field("dropped", report.diagnostics.dropped);
        }
    }
}
