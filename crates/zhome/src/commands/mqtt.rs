//! MQTT broker details.

use zhome_core::{Console, CoreError, HomeClient, MqttDetails};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn detail(m: &MqttDetails) -> String {
    [
        format!(
            "Port:     {}",
            m.port.map_or_else(|| "-".into(), |p| p.to_string())
        ),
        format!("Username: {}", m.username.as_deref().unwrap_or("-")),
        format!(
            "Password: {}",
            if m.password.is_some() { "********" } else { "-" }
        ),
    ]
    .join("\n")
}

pub async fn handle(console: &Console<HomeClient>, global: &GlobalOpts) -> Result<(), CliError> {
    let details = console
        .api()
        .fetch_mqtt_details()
        .await
        .map_err(CoreError::from)?;
    let out = output::render_single(&global.output, &details, detail, |m| {
        m.port.map(|p| p.to_string()).unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_masks_password() {
        let m = MqttDetails {
            port: Some(1883),
            username: Some("zhome".into()),
            password: Some("hunter2".into()),
        };
        let text = detail(&m);
        assert!(text.contains("1883"));
        assert!(!text.contains("hunter2"));
    }
}
