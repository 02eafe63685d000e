//! Offline topic preview.

use tabled::{Table, Tabled, settings::Style};
use zhome_core::{SlugMode, TopicSet, build_topics_with};

use crate::cli::{GlobalOpts, TopicsArgs};
use crate::output;

use super::util;

#[derive(Tabled)]
struct TopicRow {
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Topic")]
    topic: String,
}

fn table(topics: &TopicSet) -> String {
    let rows: Vec<TopicRow> = topics
        .iter()
        .map(|(role, topic)| TopicRow {
            role: role.to_string(),
            topic: topic.to_owned(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

fn plain(topics: &TopicSet) -> String {
    topics
        .iter()
        .map(|(_, topic)| topic)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn handle(args: &TopicsArgs, global: &GlobalOpts) {
    let mode = if args.all_spaces {
        SlugMode::AllSpaces
    } else {
        SlugMode::FirstSpace
    };
    let kind = util::sensor_kind(args.kind);
    let topics = build_topics_with(&args.device_name, &args.sensor_name, kind, mode);

    let out = output::render_single(&global.output, &topics, table, plain);
    output::print_output(&out, global.quiet);
}

#[cfg(test)]
mod tests {
    use super::*;
    use zhome_core::{SensorKind, build_topics};

    #[test]
    fn plain_lists_topics_one_per_line() {
        let topics = build_topics("Living Room", "Main Light", SensorKind::Motion);
        assert_eq!(
            plain(&topics),
            "homeassistant/binary_sensor/living_room/main_light/state\n\
             homeassistant/binary_sensor/living_room/main_light/availability\n\
             homeassistant/binary_sensor/living_room/main_light/config"
        );
    }

    #[test]
    fn table_names_roles() {
        let topics = build_topics("Hall", "Door", SensorKind::Button);
        let out = table(&topics);
        assert!(out.contains("command_topic"));
        assert!(out.contains("homeassistant/button/hall/door/commands"));
    }
}
