use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillConfig {
    pub start_delay_ms: u64,
    pub resume_delay_ms: u64,
    pub blink_interval_ms: u64,
    pub blinks_per_cycle: u32,
    /// Inclusive, whole seconds
    pub arming_delay_secs: (u64, u64),
    pub score_cooldown_ms: u64,
    pub target_name: String,
    pub placement_offset: (f64, f64),
    pub light_tag: (String, String),
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 10_000,
            resume_delay_ms: 5_000,
            blink_interval_ms: 700,
            blinks_per_cycle: 3,
            arming_delay_secs: (2, 5),
            score_cooldown_ms: 5_000,
            target_name: "cfda_3b".to_string(),
            placement_offset: (10.0, 10.0),
            light_tag: ("subtarget".to_string(), "light".to_string()),
        }
    }
}

impl DrillConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = self.arming_delay_secs;
        if min > max {
            return Err(ConfigError::EmptyArmingRange { min, max });
        }
        if self.blinks_per_cycle == 0 {
            return Err(ConfigError::NoBlinks);
        }
        if self.blink_interval_ms == 0 {
            return Err(ConfigError::ZeroBlinkInterval);
        }
        Ok(())
    }

    /// Uniform over the whole seconds of `arming_delay_secs`, both ends included.
    pub fn draw_arming_delay<R: Rng>(&self, rng: &mut R) -> Duration {
        let (min, max) = self.arming_delay_secs;
        Duration::from_secs(rng.random_range(min..=max))
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }

    pub fn blink_interval(&self) -> Duration {
        Duration::from_millis(self.blink_interval_ms)
    }

    pub fn score_cooldown(&self) -> Duration {
        Duration::from_millis(self.score_cooldown_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(DrillConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_values() {
        let mut c = DrillConfig {
            arming_delay_secs: (5, 2),
            ..DrillConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::EmptyArmingRange { min: 5, max: 2 })
        );

        c.arming_delay_secs = (2, 2);
        c.blinks_per_cycle = 0;
        assert_eq!(c.validate(), Err(ConfigError::NoBlinks));

        c.blinks_per_cycle = 3;
        c.blink_interval_ms = 0;
        assert_eq!(c.validate(), Err(ConfigError::ZeroBlinkInterval));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = DrillConfig::from_json(r#"{ "blink_interval_ms": 350 }"#).unwrap();
        assert_eq!(c.blink_interval_ms, 350);
        assert_eq!(c.arming_delay_secs, (2, 5));
        assert_eq!(c.light_tag.1, "light");
    }

    #[test]
    fn json_is_validated() {
        let err = DrillConfig::from_json(r#"{ "arming_delay_secs": [9, 1] }"#).unwrap_err();
        assert_eq!(err, ConfigError::EmptyArmingRange { min: 9, max: 1 });
        assert!(matches!(
            DrillConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn arming_delay_stays_in_range() {
        let c = DrillConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let d = c.draw_arming_delay(&mut rng);
            assert!(d >= Duration::from_secs(2) && d <= Duration::from_secs(5));
        }
    }

    #[test]
    fn arming_delay_is_uniform() {
        let c = DrillConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0usize; 4];
        let trials = 8_000;
        for _ in 0..trials {
            let secs = c.draw_arming_delay(&mut rng).as_secs();
            counts[(secs - 2) as usize] += 1;
        }
        // 2000 expected per bucket; 10% slack is far beyond sampling noise.
        for count in counts {
            assert!((1_800..=2_200).contains(&count), "bucket count {count}");
        }
    }

    #[test]
    fn degenerate_range_is_fixed() {
        let c = DrillConfig {
            arming_delay_secs: (3, 3),
            ..DrillConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(c.draw_arming_delay(&mut rng), Duration::from_secs(3));
    }
}
