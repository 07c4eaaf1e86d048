//! Health command handler.

use serde_json::Value;

use hermie_core::{Client, FailureKind};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub(crate) fn health_detail(client: &Client, color: bool) -> String {
    let status = client.health_status();
    let status = if client.is_healthy() {
        status
    } else {
        output::paint_alert(&status, color)
    };

    let mut pairs = vec![("Health", output::or_dash(status))];
    let report = client.health_report().unwrap_or_default();
    if let Some(ts) = report.timestamp {
        pairs.push(("Checked", ts));
    }
    let error = client.health_error();
    if !error.is_empty() {
        pairs.push(("Error", error));
    }
    output::detail_block(&pairs)
}

/// Map the cached health outcome to a result: unreachable controllers keep
/// their transport exit codes, anything else not `ok` is `Unhealthy`.
pub(crate) fn verdict(client: &Client) -> Result<(), CliError> {
    if let Some(failure) = client.health_failure() {
        if matches!(failure.kind, FailureKind::Timeout | FailureKind::Connection) {
            return Err(CliError::from_failure("health", &client.base_url(), &failure));
        }
    }
    if client.is_healthy() {
        return Ok(());
    }
    Err(CliError::Unhealthy {
        status: output::or_dash(client.health_status()),
        detail: output::or_dash(client.health_error()),
    })
}

pub async fn handle(client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    client.check_health().await;

    let snapshot: Value = serde_json::from_str(&client.health_as_json()).unwrap_or(Value::Null);
    let out = output::render_single(
        &global.output,
        &snapshot,
        |_| health_detail(client, color),
        |_| client.health_status(),
    )?;
    output::print_output(&out, global.quiet);

    verdict(client)
}
