//! Sensor command handlers: listing and the add-sensor flow.

use std::time::Duration;

use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;
use zhome_core::{
    AddSensorResponse, AddSensorView, Console, Field, HomeClient, MenuEntry, SensorEntry,
    SensorFields, SensorForm, SubmitOutcome,
};

use crate::cli::{GlobalOpts, SensorAddArgs, SensorsArgs, SensorsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Listing ─────────────────────────────────────────────────────────

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    sensor_type: String,
    #[tabled(rename = "Pin")]
    pin: String,
    #[tabled(rename = "State Topic")]
    state_topic: String,
}

fn row(s: &SensorEntry) -> SensorRow {
    let config = s.sensor_config.as_ref();
    let topics = config.and_then(|c| c.get("topics"));
    let state_topic = topics
        .and_then(|t| t.get("state_topic").or_else(|| t.get("temperature_topic")))
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    SensorRow {
        name: s.name.clone(),
        sensor_type: s.sensor_type.clone(),
        pin: config
            .and_then(|c| c.get("pin"))
            .filter(|p| !p.is_null())
            .map(ToString::to_string)
            .unwrap_or_default(),
        state_topic: state_topic.to_owned(),
    }
}

// ── Add flow ────────────────────────────────────────────────────────

/// Flag values in the order their fields are prompted.
fn flag_values(args: &SensorAddArgs) -> [(Field, Option<&str>); 8] {
    [
        (Field::Name, args.name.as_deref()),
        (Field::Pin, args.pin.as_deref()),
        (Field::EnablePin, args.enable_pin.as_deref()),
        (Field::Freq, args.freq.as_deref()),
        (Field::RetriggerDelayMs, args.retrigger_delay.as_deref()),
        (Field::MeasurementIntervalMs, args.interval.as_deref()),
        (Field::NameTemp, args.name_temp.as_deref()),
        (Field::NameHumidity, args.name_humidity.as_deref()),
    ]
}

/// Kind menu entry from `--kind`, or from the selector menu.
fn menu_pick(args: &SensorAddArgs, interactive: bool) -> Result<MenuEntry, CliError> {
    if let Some(kind) = args.kind {
        return Ok(MenuEntry::Sensor(util::sensor_kind(kind)));
    }
    if !interactive {
        return Err(CliError::InputRequired {
            field: "kind".into(),
        });
    }
    let menu = AddSensorView::menu();
    let labels: Vec<String> = menu.iter().map(ToString::to_string).collect();
    let index = Select::new()
        .with_prompt("Sensor kind")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(util::prompt_err)?;
    Ok(menu.get(index).copied().unwrap_or(MenuEntry::Cancel))
}

/// Apply flag values, then prompt for every remaining input of the
/// form's kind. Without prompting, only the name is mandatory.
fn fill_form(
    form: &mut SensorForm,
    args: &SensorAddArgs,
    interactive: bool,
) -> Result<(), CliError> {
    let inputs = SensorFields::inputs(form.kind());
    let flags = flag_values(args);

    for (field, value) in flags {
        if let Some(value) = value {
            form.set(field, value)?;
        }
    }

    for field in inputs {
        let given = flags.iter().any(|(f, v)| f == field && v.is_some());
        if given {
            continue;
        }
        if interactive {
            let current = form.fields().value(*field).unwrap_or_default();
            let mut input = Input::<String>::new().with_prompt(field.label());
            if *field == Field::Name {
                input = input.validate_with(|v: &String| {
                    if v.trim().is_empty() {
                        Err("name cannot be empty")
                    } else {
                        Ok(())
                    }
                });
            } else {
                input = input.default(current).allow_empty(true);
            }
            let value = input.interact_text().map_err(util::prompt_err)?;
            form.set(*field, &value)?;
        } else if *field == Field::Name {
            return Err(CliError::InputRequired {
                field: "name".into(),
            });
        }
    }
    Ok(())
}

fn saved_detail(resp: &AddSensorResponse) -> String {
    resp.message
        .clone()
        .unwrap_or_else(|| "Sensor saved".into())
}

fn spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message("Saving sensor...");
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

async fn add(
    console: &Console<HomeClient>,
    args: SensorAddArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let interactive = util::interactive(global);
    let color = output::should_color(&global.color);

    let device = util::resolve_device(console, &args.device).await?;
    let mut view = console.open_add_sensor()?;

    let entry = menu_pick(&args, interactive)?;
    let Some(form) = view.pick(entry, console.store()) else {
        if !global.quiet {
            eprintln!("Cancelled.");
        }
        return Ok(());
    };
    fill_form(form, &args, interactive)?;

    let sensor = form.fields().name().to_owned();
    let kind = form.kind();

    if args.dry_run {
        let config = form.sensor_config();
        let out = output::render_single(
            &global.output,
            &config,
            |c| serde_json::to_string_pretty(c).unwrap_or_default(),
            |c| c.to_string(),
        );
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    if interactive
        && !util::confirm(
            &format!("Add {} '{sensor}' to {}?", kind.label(), device.display_name),
            global.yes,
        )?
    {
        view.cancel(console.store());
        return Ok(());
    }

    let bar = spinner(global.quiet);
    let outcome = view.submit(console.api(), console.store(), true).await;
    bar.finish_and_clear();

    match outcome {
        Some(SubmitOutcome::Saved(resp)) => {
            if !global.quiet {
                let msg = format!(
                    "{} '{sensor}' added to {}",
                    kind.label(),
                    device.display_name
                );
                eprintln!("{}", output::status(true, &msg, color));
            }
            let out = output::render_single(&global.output, &resp, saved_detail, |_| {
                sensor.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
        Some(SubmitOutcome::Rejected(resp)) => Err(CliError::NotSaved {
            sensor,
            detail: resp.message.map(|m| format!(": {m}")).unwrap_or_default(),
        }),
        Some(SubmitOutcome::Failed(e)) => Err(CliError::NotSaved {
            sensor,
            detail: format!(": {e}"),
        }),
        None => Ok(()),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console<HomeClient>,
    args: SensorsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SensorsCommand::List { device } => {
            let device = util::resolve_device(console, &device).await?;
            let out = output::render_list(&global.output, &device.config.sensors, row, |s| {
                s.name.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SensorsCommand::Add(args) => add(console, args, global).await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use zhome_core::{FormContext, RecordId, SensorKind, SlugMode};

    fn args() -> SensorAddArgs {
        SensorAddArgs {
            device: "Living Room".into(),
            kind: None,
            name: None,
            pin: None,
            enable_pin: None,
            freq: None,
            retrigger_delay: None,
            interval: None,
            name_temp: None,
            name_humidity: None,
            dry_run: false,
        }
    }

    fn form(kind: SensorKind) -> SensorForm {
        SensorForm::new(
            kind,
            FormContext {
                device_name: "Living Room".into(),
                device_config_id: RecordId::Numeric(3),
                slug_mode: SlugMode::FirstSpace,
            },
        )
    }

    #[test]
    fn flags_fill_the_form_without_prompting() {
        let mut a = args();
        a.name = Some("Main Light".into());
        a.pin = Some("4".into());
        let mut f = form(SensorKind::Button);

        fill_form(&mut f, &a, false).unwrap();

        assert_eq!(f.fields().name(), "Main Light");
        assert_eq!(f.fields().value(Field::Pin).as_deref(), Some("4"));
        assert_eq!(
            f.fields().value(Field::RetriggerDelayMs).as_deref(),
            Some("300")
        );
    }

    #[test]
    fn missing_name_is_required_without_prompting() {
        let mut f = form(SensorKind::Led);
        let err = fill_form(&mut f, &args(), false).unwrap_err();
        assert!(matches!(err, CliError::InputRequired { ref field } if field == "name"));
    }

    #[test]
    fn flag_for_another_kind_is_refused() {
        let mut a = args();
        a.name = Some("Strip".into());
        a.enable_pin = Some("5".into());
        let mut f = form(SensorKind::Led);
        assert!(matches!(
            fill_form(&mut f, &a, false),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn kind_flag_skips_the_menu() {
        let mut a = args();
        a.kind = Some(crate::cli::KindArg::Fan);
        assert_eq!(
            menu_pick(&a, false).unwrap(),
            MenuEntry::Sensor(SensorKind::Fan)
        );
        assert!(matches!(
            menu_pick(&args(), false),
            Err(CliError::InputRequired { .. })
        ));
    }

    #[test]
    fn sensor_row_reads_pin_and_state_topic() {
        let entry = SensorEntry {
            sensor_type: "button".into(),
            name: "Main Light".into(),
            sensor_config: Some(serde_json::json!({
                "pin": 4,
                "topics": { "state_topic": "homeassistant/button/living_room/main_light/state" }
            })),
        };
        let r = row(&entry);
        assert_eq!(r.pin, "4");
        assert_eq!(r.state_topic, "homeassistant/button/living_room/main_light/state");
    }
}
