//! Device command handlers.

use serde::Serialize;
use tabled::Tabled;

use hermie_core::{Client, Command as RelayCommand, Device, Payload};

use crate::cli::{DeviceArgs, DeviceCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct RelayState {
    device: Device,
    on: bool,
}

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "State")]
    state: String,
}

fn ack_detail(device: Device, payload: &Payload, on: bool, color: bool) -> String {
    output::detail_block(&[
        ("Device", device.to_string()),
        ("State", output::paint_state(on, color)),
        ("Status", output::or_dash(payload.text("status"))),
        ("Timestamp", output::or_dash(payload.text("timestamp"))),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Client,
    args: DeviceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        DeviceCommand::Set { device, state } => {
            let command = RelayCommand::parse(&device, &state)?;
            let device = command.device;

            client.set_device(device, command.state).await;

            if let Some(failure) = client.device_failure(device) {
                return Err(CliError::from_failure(
                    &format!("{device} command"),
                    &client.base_url(),
                    &failure,
                ));
            }

            let payload = client.device_response(device).unwrap_or_else(Payload::empty);
            let on = client.is_device_on(device);
            let out = output::render_single(
                &global.output,
                payload.as_value(),
                |_| ack_detail(device, &payload, on, color),
                |_| output::paint_state(on, false),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DeviceCommand::Status => {
            // Relay flags ride along with every sensor snapshot.
            super::sensor::fetch(client).await?;

            let states: Vec<RelayState> = Device::all()
                .map(|device| RelayState {
                    device,
                    on: client.is_device_on(device),
                })
                .collect();

            let out = output::render_list(
                &global.output,
                &states,
                |s| DeviceRow {
                    device: s.device.to_string(),
                    state: output::paint_state(s.on, color),
                },
                |s| format!("{}={}", s.device, output::paint_state(s.on, false)),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
