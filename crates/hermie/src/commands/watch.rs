//! Watch command: poll the sensor on an interval and raise alerts.
//!
//! Each poll prints one line. When a reading violates the configured
//! thresholds an alert is sent to stderr (with a terminal bell), at most
//! once per cooldown window. A failed poll is reported and the loop
//! carries on.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use hermie_core::{Alert, Client, Device};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::config::Config;
use crate::error::CliError;
use crate::output;

use super::sensor;

// ── Alert cooldown ──────────────────────────────────────────────────

/// Rate limit for alert notifications.
#[derive(Debug)]
pub(crate) struct AlertGate {
    cooldown: Duration,
    last: Option<Instant>,
}

impl AlertGate {
    pub(crate) fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last: None,
        }
    }

    /// `true` if a notification may fire at `now`; records it if so.
    pub(crate) fn try_fire(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.cooldown => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Time left before the next notification may fire.
    pub(crate) fn remaining(&self, now: Instant) -> Duration {
        self.last.map_or(Duration::ZERO, |last| {
            self.cooldown
                .saturating_sub(now.saturating_duration_since(last))
        })
    }
}

// ── Poll output ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct PollRecord<'a> {
    poll: u64,
    at: String,
    reading: &'a Value,
    local_alert: Option<&'a str>,
}

fn poll_line(client: &Client, alert: Option<&Alert>, color: bool) -> String {
    let devices = Device::all()
        .map(|d| format!("{d}={}", output::paint_state(client.is_device_on(d), color)))
        .collect::<Vec<_>>()
        .join(" ");

    let mut line = format!(
        "{}  {}  {}  {devices}",
        chrono::Local::now().format("%H:%M:%S"),
        sensor::fmt_measure(client.sensor_number("temperature_f"), "F"),
        sensor::fmt_measure(client.sensor_number("humidity"), "%"),
    );
    if let Some(alert) = alert {
        line.push_str("  ");
        line.push_str(&output::paint_alert(alert.label(), color));
    }
    line
}

fn render_poll(
    format: &OutputFormat,
    poll: u64,
    client: &Client,
    alert: Option<&Alert>,
    color: bool,
) -> Result<String, CliError> {
    if matches!(format, OutputFormat::Table | OutputFormat::Plain) {
        return Ok(poll_line(client, alert, color));
    }

    let reading: Value = serde_json::from_str(&client.sensor_as_json()).unwrap_or(Value::Null);
    let record = PollRecord {
        poll,
        at: chrono::Local::now().to_rfc3339(),
        reading: &reading,
        local_alert: alert.map(|a| a.message.as_str()),
    };
    match format {
        // One document per poll so the stream stays parseable.
        OutputFormat::Yaml => {
            let doc = output::render_yaml(&record)?;
            Ok(format!("---\n{}", doc.trim_end()))
        }
        // One record per line.
        _ => output::render_json_compact(&record),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Client,
    args: WatchArgs,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let interval = Duration::from_secs(
        args.interval
            .unwrap_or(cfg.defaults.poll_interval)
            .max(1),
    );
    let cooldown = Duration::from_secs(args.cooldown.unwrap_or(cfg.defaults.buzz_cooldown));

    info!(
        base_url = %client.base_url(),
        interval = %humantime::format_duration(interval),
        cooldown = %humantime::format_duration(cooldown),
        "watching sensor"
    );

    let mut gate = AlertGate::new(cooldown);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut polls = 0u64;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => {
                debug!(polls, "interrupted");
                break;
            }
        }
        polls += 1;

        client.fetch_sensor().await;
        match sensor::current(client) {
            Ok(reading) => {
                let alert = cfg.thresholds.evaluate_reading(&reading);
                let line = render_poll(&global.output, polls, client, alert.as_ref(), color)?;
                output::print_output(&line, global.quiet);

                if let Some(alert) = alert {
                    notify(&mut gate, &alert, color);
                }
            }
            Err(err) => {
                warn!(poll = polls, error = %err, "sensor poll failed");
                eprintln!("poll {polls}: {err}");
            }
        }

        if args.count.is_some_and(|n| polls >= n) {
            break;
        }
    }
    Ok(())
}

fn notify(gate: &mut AlertGate, alert: &Alert, color: bool) {
    let now = Instant::now();
    if gate.try_fire(now) {
        info!(kind = %alert.kind, message = %alert.message, "alert raised");
        eprintln!("\u{7}ALERT: {}", output::paint_alert(&alert.message, color));
    } else {
        debug!(
            kind = %alert.kind,
            remaining = %humantime::format_duration(gate.remaining(now)),
            "alert on cooldown"
        );
    }
}
