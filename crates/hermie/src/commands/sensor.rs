//! Sensor command handler, plus the reading formatter shared with
//! `status` and `watch`.

use serde::Serialize;
use serde_json::Value;

use hermie_core::{Alert, Client, Device, SensorReading};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::CliError;
use crate::output;

/// Structured output: the raw snapshot plus the local threshold verdict.
#[derive(Debug, Serialize)]
pub struct SensorReport<'a> {
    pub reading: &'a Value,
    pub local_alert: Option<String>,
}

pub(crate) fn fmt_measure(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v:.1}{unit}"))
}

pub(crate) fn reading_detail(
    reading: &SensorReading,
    alert: Option<&Alert>,
    client: &Client,
    color: bool,
) -> String {
    let server_alert = reading
        .alert
        .as_ref()
        .filter(|a| a.is_raised())
        .map(|a| a.message().unwrap_or("raised").to_owned());

    let mut pairs = vec![
        ("Temperature", fmt_measure(reading.temperature_f, "F")),
        ("Celsius", fmt_measure(reading.temperature_c, "C")),
        ("Humidity", fmt_measure(reading.humidity, "%")),
        ("Read OK", reading.last_read_ok.to_string()),
        (
            "Timestamp",
            reading
                .timestamp()
                .map_or_else(|| "-".into(), |ts| ts.to_rfc3339()),
        ),
    ];
    for device in Device::all() {
        pairs.push((
            match device {
                Device::Heat => "Heat",
                Device::Pump => "Pump",
            },
            output::paint_state(client.is_device_on(device), color),
        ));
    }
    if let Some(error) = reading.error.as_deref().filter(|e| !e.is_empty()) {
        pairs.push(("Error", output::paint_alert(error, color)));
    }
    if let Some(msg) = server_alert {
        pairs.push(("Alert", output::paint_alert(&msg, color)));
    }
    if let Some(alert) = alert {
        pairs.push(("Local", output::paint_alert(&alert.message, color)));
    }
    output::detail_block(&pairs)
}

/// Fetch the snapshot; a failed fetch becomes an error.
pub(crate) async fn fetch(client: &Client) -> Result<SensorReading, CliError> {
    client.fetch_sensor().await;
    current(client)
}

/// The cached snapshot, or the cached failure as an error.
pub(crate) fn current(client: &Client) -> Result<SensorReading, CliError> {
    if let Some(failure) = client.sensor_failure() {
        return Err(CliError::from_failure("sensor", &client.base_url(), &failure));
    }
    client
        .sensor_reading()
        .ok_or_else(|| CliError::RequestFailed {
            target: "sensor".into(),
            message: format!("unexpected telemetry payload: {}", client.sensor_as_json()),
        })
}

pub async fn handle(client: &Client, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let reading = fetch(client).await?;
    let alert = cfg.thresholds.evaluate_reading(&reading);

    let snapshot: Value = serde_json::from_str(&client.sensor_as_json()).unwrap_or(Value::Null);
    let report = SensorReport {
        reading: &snapshot,
        local_alert: alert.as_ref().map(|a| a.message.clone()),
    };

    let out = output::render_single(
        &global.output,
        &report,
        |_| reading_detail(&reading, alert.as_ref(), client, color),
        |_| {
            [
                client.sensor_field("temperature_f"),
                client.sensor_field("humidity"),
            ]
            .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
