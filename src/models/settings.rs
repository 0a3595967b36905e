use serde::Deserialize;

use crate::game::counter::Color;
use crate::game::zone::{
    ZoneType, DECK_ZONE, EXILE_ZONE, GRAVE_ZONE, HAND_ZONE, SIDEBOARD_ZONE, STACK_ZONE, TABLE_ZONE,
};
use crate::utils::errors::SettingsError;
use crate::utils::logger::LogLevel;

/// Prefix of environment overrides, e.g. `CARD_TABLE_INITIAL_HAND_SIZE=5`.
pub const ENV_PREFIX: &str = "CARD_TABLE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZoneSpec {
    pub name: String,
    pub zone_type: ZoneType,
    #[serde(default)]
    pub has_coords: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CounterSpec {
    pub name: String,
    pub color: Color,
    pub radius: u32,
    #[serde(default)]
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_level: LogLevel,
    pub initial_hand_size: usize,
    /// Zones every player gets when joining a match.
    pub zones: Vec<ZoneSpec>,
    /// Counters every player gets; ids follow list order starting at 0.
    pub counters: Vec<CounterSpec>,
    /// Pending containers above which a session is reported as lagging.
    pub session_backlog_warning: usize,
}

impl Default for Settings {
    fn default() -> Self {
        let zone = |name: &str, zone_type, has_coords| ZoneSpec {
            name: name.to_string(),
            zone_type,
            has_coords,
        };
        let counter = |name: &str, (r, g, b), radius, value| CounterSpec {
            name: name.to_string(),
            color: Color::new(r, g, b),
            radius,
            value,
        };

        Self {
            log_level: LogLevel::Info,
            initial_hand_size: 7,
            zones: vec![
                zone(DECK_ZONE, ZoneType::Hidden, false),
                zone(SIDEBOARD_ZONE, ZoneType::Hidden, false),
                zone(TABLE_ZONE, ZoneType::Public, true),
                zone(HAND_ZONE, ZoneType::Private, false),
                zone(STACK_ZONE, ZoneType::Public, false),
                zone(GRAVE_ZONE, ZoneType::Public, false),
                zone(EXILE_ZONE, ZoneType::Public, false),
            ],
            counters: vec![
                counter("life", (255, 255, 255), 25, 20),
                counter("w", (255, 255, 150), 20, 0),
                counter("u", (150, 150, 255), 20, 0),
                counter("b", (150, 150, 150), 20, 0),
                counter("r", (250, 150, 150), 20, 0),
                counter("g", (150, 255, 150), 20, 0),
                counter("x", (255, 255, 255), 20, 0),
                counter("storm", (255, 255, 255), 20, 0),
            ],
            session_backlog_warning: 256,
        }
    }
}

impl Settings {
    /// Reads `path` (any format the `config` crate understands, optional)
    /// and then `CARD_TABLE_*` environment variables on top of it. Nested
    /// keys in the environment use `__` as separator.
    pub fn load(path: &str) -> Result<Self, SettingsError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_layout() {
        let settings = Settings::default();
        assert_eq!(settings.zones.len(), 7);
        assert_eq!(settings.counters[0].value, 20);
        assert_eq!(settings.counters[0].radius, 25);
        assert_eq!(settings.initial_hand_size, 7);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = Settings::load("this/file/does/not/exist").unwrap();
        assert_eq!(settings.zones, Settings::default().zones);
    }

    #[test]
    fn test_load_from_toml() {
        let path = std::env::temp_dir().join(format!("card-table-{}.toml", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
log_level = "DEBUG"
initial_hand_size = 5

[[zones]]
name = "library"
zone_type = "Hidden"

[[zones]]
name = "battlefield"
zone_type = "Public"
has_coords = true
"#
        )
        .unwrap();

        let settings = Settings::load(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.initial_hand_size, 5);
        assert_eq!(settings.zones.len(), 2);
        assert!(settings.zones[1].has_coords);
        assert!(!settings.zones[0].has_coords);
        assert_eq!(settings.counters.len(), 8);
    }
}
