//! Scenario manifests describing the economy, waves and opening towers of a
//! headless session.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use path_defence_core::{EnemyKind, TileCoord, TowerKind, Wave, WaveEntry};
use path_defence_world::{default_waves, WorldConfig};

/// Parsed scenario manifest.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Scenario {
    economy: EconomySection,
    waves: WavesSection,
    towers: Vec<TowerSection>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct EconomySection {
    starting_money: u32,
    starting_lives: u32,
}

impl Default for EconomySection {
    fn default() -> Self {
        let defaults = WorldConfig::default();
        Self {
            starting_money: defaults.starting_money,
            starting_lives: defaults.starting_lives,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WavesSection {
    auto_start: bool,
    list: Option<Vec<WaveSection>>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct WaveSection {
    delay_after_secs: f64,
    spawns: Vec<SpawnSection>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct SpawnSection {
    enemy: EnemyKind,
    offset_secs: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TowerSection {
    kind: TowerKind,
    column: u32,
    row: u32,
}

/// Tower the runner places before the first wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TowerPlacement {
    pub(crate) kind: TowerKind,
    pub(crate) tile: TileCoord,
}

impl Scenario {
    /// Reads and parses the manifest stored at `path`.
    pub(crate) fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid scenario at {}", path.display()))
    }

    /// Parses manifest contents.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse scenario toml contents")
    }

    /// Opening towers in manifest order.
    pub(crate) fn towers(&self) -> Vec<TowerPlacement> {
        self.towers
            .iter()
            .map(|tower| TowerPlacement {
                kind: tower.kind,
                tile: TileCoord::new(tower.column, tower.row),
            })
            .collect()
    }

    /// Builds the world configuration, validating any custom wave roster.
    pub(crate) fn world_config(&self) -> Result<WorldConfig> {
        let waves = match &self.waves.list {
            None => default_waves(),
            Some(list) if list.is_empty() => bail!("scenario wave list is empty"),
            Some(list) => list
                .iter()
                .enumerate()
                .map(|(index, wave)| {
                    wave.build()
                        .with_context(|| format!("invalid wave {}", index + 1))
                })
                .collect::<Result<Vec<_>>>()?,
        };

        Ok(WorldConfig {
            waves,
            starting_money: self.economy.starting_money,
            starting_lives: self.economy.starting_lives,
            auto_start_waves: self.waves.auto_start,
            ..WorldConfig::default()
        })
    }
}

impl WaveSection {
    fn build(&self) -> Result<Wave> {
        let delay_after = seconds(self.delay_after_secs).context("invalid delay_after_secs")?;
        let entries = self
            .spawns
            .iter()
            .enumerate()
            .map(|(index, spawn)| {
                let offset = seconds(spawn.offset_secs)
                    .with_context(|| format!("invalid offset_secs for spawn {index}"))?;
                Ok(WaveEntry::new(spawn.enemy, offset))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Wave::new(entries, delay_after)?)
    }
}

fn seconds(value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .with_context(|| format!("{value} is not a non-negative number of seconds"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manifest_uses_defaults() {
        let scenario = Scenario::parse("").expect("empty manifest parses");
        let config = scenario.world_config().expect("defaults are valid");

        assert_eq!(config.starting_money, 150);
        assert_eq!(config.starting_lives, 20);
        assert!(!config.auto_start_waves);
        assert_eq!(config.waves, default_waves());
        assert!(scenario.towers().is_empty());
    }

    #[test]
    fn full_manifest_is_honoured() {
        let manifest = r#"
            [economy]
            starting_money = 400
            starting_lives = 3

            [waves]
            auto_start = true

            [[waves.list]]
            delay_after_secs = 2.5
            spawns = [
                { enemy = "basic", offset_secs = 0.0 },
                { enemy = "tank", offset_secs = 1.5 },
            ]

            [[towers]]
            kind = "sniper"
            column = 3
            row = 4
        "#;

        let scenario = Scenario::parse(manifest).expect("manifest parses");
        let config = scenario.world_config().expect("manifest is valid");

        assert_eq!(config.starting_money, 400);
        assert_eq!(config.starting_lives, 3);
        assert!(config.auto_start_waves);
        assert_eq!(config.waves.len(), 1);
        assert_eq!(config.waves[0].delay_after(), Duration::from_millis(2500));
        assert_eq!(
            config.waves[0].entries(),
            &[
                WaveEntry::new(EnemyKind::Basic, Duration::ZERO),
                WaveEntry::new(EnemyKind::Tank, Duration::from_millis(1500)),
            ]
        );
        assert_eq!(
            scenario.towers(),
            vec![TowerPlacement {
                kind: TowerKind::Sniper,
                tile: TileCoord::new(3, 4),
            }]
        );
    }

    #[test]
    fn unknown_enemy_kind_is_rejected() {
        let manifest = r#"
            [[waves.list]]
            delay_after_secs = 1.0
            spawns = [{ enemy = "dragon", offset_secs = 0.0 }]
        "#;

        assert!(Scenario::parse(manifest).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Scenario::parse("[economy]\nstarting_gold = 5\n").is_err());
    }

    #[test]
    fn decreasing_offsets_are_rejected() {
        let manifest = r#"
            [[waves.list]]
            delay_after_secs = 1.0
            spawns = [
                { enemy = "basic", offset_secs = 2.0 },
                { enemy = "fast", offset_secs = 1.0 },
            ]
        "#;

        let scenario = Scenario::parse(manifest).expect("manifest parses");
        let error = scenario.world_config().expect_err("offsets decrease");
        assert!(format!("{error:#}").contains("invalid wave 1"));
    }

    #[test]
    fn negative_offsets_are_rejected() {
        let manifest = r#"
            [[waves.list]]
            delay_after_secs = 1.0
            spawns = [{ enemy = "basic", offset_secs = -1.0 }]
        "#;

        let scenario = Scenario::parse(manifest).expect("manifest parses");
        assert!(scenario.world_config().is_err());
    }

    #[test]
    fn empty_wave_list_is_rejected() {
        let scenario = Scenario::parse("[waves]\nlist = []\n").expect("manifest parses");
        assert!(scenario.world_config().is_err());
    }
}
