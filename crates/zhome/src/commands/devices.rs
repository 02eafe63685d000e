//! Device command handlers.

use tabled::Tabled;
use zhome_core::{Console, CoreError, Device, Feed, HomeClient};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Firmware")]
    firmware: String,
    #[tabled(rename = "Sensors")]
    sensors: usize,
}

fn row(d: &Device) -> DeviceRow {
    let info = d.device_info.as_ref();
    DeviceRow {
        id: d.id.clone(),
        name: d.display_name.clone(),
        platform: d.platform.clone().unwrap_or_default(),
        model: info.and_then(|i| i.model.clone()).unwrap_or_default(),
        firmware: info.and_then(|i| i.sw_version.clone()).unwrap_or_default(),
        sensors: d.config.sensors.len(),
    }
}

fn detail(d: &Device) -> String {
    let info = d.device_info.clone().unwrap_or_default();
    let mut lines = vec![
        format!("ID:           {}", d.id),
        format!("Name:         {}", d.display_name),
        format!("Platform:     {}", d.platform.as_deref().unwrap_or("-")),
        format!("Manufacturer: {}", info.manufacturer.as_deref().unwrap_or("-")),
        format!("Model:        {}", info.model.as_deref().unwrap_or("-")),
        format!("Firmware:     {}", info.sw_version.as_deref().unwrap_or("-")),
        format!("Config ID:    {}", d.config.id),
    ];
    if let Some(settings) = &d.config.device_settings {
        if let Some(led) = settings.led_on_after_connect {
            lines.push(format!("Status LED:   {}", if led { "on" } else { "off" }));
        }
        if let Some(ping) = settings.use_ping {
            lines.push(format!("Ping:         {}", if ping { "on" } else { "off" }));
        }
    }
    if d.config.sensors.is_empty() {
        lines.push("Sensors:      -".into());
    } else {
        lines.push("Sensors:".into());
        for s in &d.config.sensors {
            lines.push(format!("  {} ({})", s.name, s.sensor_type));
        }
    }
    lines.join("\n")
}

/// Fetch a device by hardware id, falling back to a display-name
/// match against the full list when the backend does not know the id.
async fn lookup(console: &Console<HomeClient>, identifier: &str) -> Result<Device, CliError> {
    match console.api().fetch_device(identifier).await {
        Ok(device) => Ok(device),
        Err(e) if e.is_not_found() => util::resolve_device(console, identifier).await,
        Err(e) => Err(CoreError::from(e).into()),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console<HomeClient>,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            console.refresh_once(Feed::Devices).await?;
            let snap = console.snapshot();
            let out = output::render_list(&global.output, &snap.devices, row, |d| d.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Show { device } => {
            let device = lookup(console, &device).await?;
            let out = output::render_single(&global.output, &device, detail, |d| d.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Watch => watch(console, global).await,
    }
}

/// Re-render the device list after every completed device poll until
/// interrupted.
async fn watch(console: &Console<HomeClient>, global: &GlobalOpts) -> Result<(), CliError> {
    let mut rx = console.store().subscribe();
    console.start().await;

    let mut last_refresh = None;
    loop {
        let state = rx.borrow_and_update().clone();
        let refreshed = state.refreshed_at(Feed::Devices);
        if refreshed.is_some() && refreshed != last_refresh {
            last_refresh = refreshed;
            let out = output::render_list(&global.output, &state.devices, row, |d| d.id.clone());
            output::print_output(&out, global.quiet);
        }

        tokio::select! {
            () = util::interrupted() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use zhome_core::RecordId;

    fn device() -> Device {
        serde_json::from_value(serde_json::json!({
            "id": "e6614103e7",
            "display_name": "Living Room",
            "platform": "esp32",
            "device_info": { "model": "ESP32-C3", "sw_version": "1.4.0" },
            "config": {
                "id": 3,
                "sensors": [
                    { "sensor_type": "button", "name": "Main Light" }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn row_counts_sensors() {
        let r = row(&device());
        assert_eq!(r.sensors, 1);
        assert_eq!(r.model, "ESP32-C3");
    }

    #[test]
    fn detail_lists_sensors() {
        let d = device();
        assert_eq!(d.config.id, RecordId::Numeric(3));
        let text = detail(&d);
        assert!(text.contains("Main Light (button)"));
        assert!(text.contains("Config ID:    3"));
    }
}
