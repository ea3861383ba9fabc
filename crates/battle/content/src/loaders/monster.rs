//! Monster profile loader.

use std::path::Path;

use battle_core::MonsterProfile;

use crate::loaders::{LoadResult, read_file};

/// Loader for monster profiles from RON files.
pub struct MonsterLoader;

impl MonsterLoader {
    /// Load a profile and check it is usable in an encounter.
    ///
    /// More than three act choices is a parse error.
    pub fn load(path: &Path) -> LoadResult<MonsterProfile> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<MonsterProfile> {
        let profile: MonsterProfile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse monster profile RON: {}", e))?;
        profile
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid monster profile: {}", e))?;
        tracing::debug!(name = %profile.name, hp = profile.max_hp, "loaded monster profile");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIME: &str = r#"(
        name: "Slime",
        max_hp: 12,
        act_choices: [
            (label: "Check", text: "* SLIME - ATK 1 DEF 1"),
            (label: "Pet", text: "* It wobbles happily.", makes_spareable: true),
        ],
        intro_text: "* A slime oozes in.",
        idle_text: "* The slime jiggles.",
        spareable_text: "* The slime seems content.",
        spare_rejected_text: "* The slime doesn't get it.",
        item_text: "* You ate the {item}.",
        speech: "Blub.",
        spareable_speech: "Blub!",
    )"#;

    #[test]
    fn parses_profile_with_defaulted_flags() {
        let profile = MonsterLoader::parse(SLIME).unwrap();
        assert_eq!(profile.name, "Slime");
        assert_eq!(profile.act_choices.len(), 2);
        assert!(!profile.act_choices[0].makes_spareable);
        assert!(profile.act_choices[1].makes_spareable);
    }

    #[test]
    fn rejects_non_positive_hp() {
        let content = SLIME.replace("max_hp: 12", "max_hp: 0");
        assert!(MonsterLoader::parse(&content).is_err());
    }

    #[test]
    fn rejects_too_many_acts() {
        let content = SLIME.replace(
            "act_choices: [",
            r#"act_choices: [
            (label: "A", text: ""),
            (label: "B", text: ""),"#,
        );
        assert!(MonsterLoader::parse(&content).is_err());
    }
}
