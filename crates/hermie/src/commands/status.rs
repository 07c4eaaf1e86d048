//! Status command: sensor and health fetched concurrently.

use serde::Serialize;
use serde_json::Value;

use hermie_core::Client;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::CliError;
use crate::output;

use super::{health, sensor};

#[derive(Debug, Serialize)]
struct StatusReport {
    sensor: Value,
    health: Value,
    local_alert: Option<String>,
}

pub async fn handle(client: &Client, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    tokio::join!(client.fetch_sensor(), client.check_health());

    let reading = sensor::current(client)?;
    let alert = cfg.thresholds.evaluate_reading(&reading);

    let report = StatusReport {
        sensor: serde_json::from_str(&client.sensor_as_json()).unwrap_or(Value::Null),
        health: serde_json::from_str(&client.health_as_json()).unwrap_or(Value::Null),
        local_alert: alert.as_ref().map(|a| a.message.clone()),
    };

    let out = output::render_single(
        &global.output,
        &report,
        |_| {
            format!(
                "{}\n\n{}",
                sensor::reading_detail(&reading, alert.as_ref(), client, color),
                health::health_detail(client, color)
            )
        },
        |_| {
            [
                client.sensor_field("temperature_f"),
                client.sensor_field("humidity"),
                client.health_status(),
            ]
            .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);

    health::verdict(client)
}
