//! Level-up choices: generating the offer and applying the pick

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use super::state::{
    GamePhase, GameState, PassiveKind, Player, UpgradeKind, UpgradeOption, Weapon, WeaponKind,
};
use crate::consts::*;
use crate::error::SimError;

/// New-weapon offers per level-up
const NEW_WEAPON_OFFERS: usize = 2;
/// Passive offers drawn before topping up
const PASSIVE_OFFERS: usize = 2;

/// Build the options for a level-up
///
/// Owned weapons below the level cap always get an upgrade offer and are kept
/// ahead of the random extras (new weapons, then passives) when trimming to
/// `UPGRADE_CHOICES`. The final list is shuffled for presentation.
pub fn generate_upgrade_options(player: &Player, rng: &mut impl Rng) -> Vec<UpgradeOption> {
    let mut upgrades: Vec<UpgradeOption> = player
        .weapons
        .iter()
        .filter(|w| w.level < MAX_WEAPON_LEVEL)
        .map(|w| UpgradeOption::weapon(w.kind, w.level + 1))
        .collect();

    let mut unowned: Vec<WeaponKind> = WeaponKind::ALL
        .into_iter()
        .filter(|kind| !player.owns(*kind))
        .collect();
    unowned.shuffle(rng);

    let mut extras: Vec<UpgradeOption> = unowned
        .into_iter()
        .take(NEW_WEAPON_OFFERS)
        .map(|kind| UpgradeOption::weapon(kind, 1))
        .collect();

    let mut passives: Vec<PassiveKind> = PassiveKind::ALL
        .choose_multiple(rng, PASSIVE_OFFERS)
        .copied()
        .collect();

    // Top up with distinct passives until there are enough candidates
    while upgrades.len() + extras.len() + passives.len() < UPGRADE_CHOICES {
        let remaining: Vec<PassiveKind> = PassiveKind::ALL
            .into_iter()
            .filter(|kind| !passives.contains(kind))
            .collect();
        match remaining.choose(rng) {
            Some(kind) => passives.push(*kind),
            None => break,
        }
    }
    extras.extend(passives.into_iter().map(UpgradeOption::passive));

    upgrades.shuffle(rng);
    upgrades.truncate(UPGRADE_CHOICES);

    extras.shuffle(rng);
    let room = UPGRADE_CHOICES - upgrades.len();
    upgrades.extend(extras.into_iter().take(room));

    upgrades.shuffle(rng);
    upgrades
}

/// Apply an option's effect to the player
pub fn apply_upgrade(state: &mut GameState, option: &UpgradeOption) {
    match option.kind {
        UpgradeKind::Weapon(kind) => {
            if let Some(weapon) = state.player.weapon_mut(kind) {
                weapon.level_up();
                log::debug!("{} upgraded to level {}", kind.display_name(), weapon.level);
            } else {
                let id = state.next_entity_id();
                state.player.weapons.push(Weapon::new(id, kind));
                log::debug!("New weapon: {}", kind.display_name());
            }
        }
        UpgradeKind::Passive(kind) => {
            let player = &mut state.player;
            match kind {
                PassiveKind::MaxHealth => {
                    player.max_health += MAX_HEALTH_PASSIVE;
                    player.heal(MAX_HEALTH_PASSIVE);
                }
                PassiveKind::Speed => player.speed += SPEED_PASSIVE,
                PassiveKind::Might => player.passives.might += 1,
                PassiveKind::Area => player.passives.area += 1,
                PassiveKind::Cooldown => player.passives.cooldown += 1,
                PassiveKind::Duration => player.passives.duration += 1,
                PassiveKind::Amount => player.passives.amount += 1,
            }
            log::debug!("Passive taken: {}", kind.display_name());
        }
    }
}

/// Take one of the offered options and leave the upgrade menu
///
/// The option is matched by id and the offered copy is applied, so a caller
/// cannot smuggle in a different effect under an offered id.
pub fn select_upgrade(state: &mut GameState, option: &UpgradeOption) -> Result<(), SimError> {
    if state.phase != GamePhase::UpgradeMenu {
        return Err(SimError::NoPendingUpgrade);
    }
    let Some(index) = state.upgrade_options.iter().position(|o| o.id == option.id) else {
        return Err(SimError::UpgradeNotOffered {
            id: option.id.clone(),
        });
    };

    let offered = state.upgrade_options.swap_remove(index);
    apply_upgrade(state, &offered);

    state.upgrade_options.clear();
    state.phase = GamePhase::Running;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::progression::gain_experience;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    #[test]
    fn test_level_three_weapon_always_offered_next_level() {
        let mut state = GameState::new(1);
        state.player.weapons[0].level = 3;
        let kind = state.player.weapons[0].kind;

        for seed in 0..200 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let options = generate_upgrade_options(&state.player, &mut rng);
            assert_eq!(options.len(), 3);
            assert!(
                options
                    .iter()
                    .any(|o| o.kind == UpgradeKind::Weapon(kind) && o.level == 4),
                "seed {seed}: {options:?}"
            );
        }
    }

    #[test]
    fn test_options_are_distinct() {
        let player = Player::new(glam::Vec2::ZERO);
        for seed in 0..100 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let options = generate_upgrade_options(&player, &mut rng);
            assert_eq!(options.len(), 3);
            let ids: HashSet<_> = options.iter().map(|o| o.id.as_str()).collect();
            assert_eq!(ids.len(), 3);
        }
    }

    #[test]
    fn test_maxed_weapon_not_offered() {
        let mut state = GameState::new(1);
        state.player.weapons[0].level = MAX_WEAPON_LEVEL;
        let kind = state.player.weapons[0].kind;
        let mut rng = Pcg32::seed_from_u64(4);
        for _ in 0..50 {
            let options = generate_upgrade_options(&state.player, &mut rng);
            assert!(options.iter().all(|o| o.kind != UpgradeKind::Weapon(kind)));
        }
    }

    #[test]
    fn test_generation_is_reproducible() {
        let player = Player::new(glam::Vec2::ZERO);
        let a = generate_upgrade_options(&player, &mut Pcg32::seed_from_u64(42));
        let b = generate_upgrade_options(&player, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_select_requires_open_menu() {
        let mut state = GameState::new(1);
        let option = UpgradeOption::passive(PassiveKind::Speed);
        assert!(matches!(
            select_upgrade(&mut state, &option),
            Err(SimError::NoPendingUpgrade)
        ));
    }

    #[test]
    fn test_select_rejects_unoffered_option() {
        let mut state = GameState::new(1);
        gain_experience(&mut state, 10);
        let bogus = UpgradeOption {
            id: "passive-bogus".into(),
            ..UpgradeOption::passive(PassiveKind::Speed)
        };
        assert!(matches!(
            select_upgrade(&mut state, &bogus),
            Err(SimError::UpgradeNotOffered { .. })
        ));
        assert_eq!(state.phase, GamePhase::UpgradeMenu);
    }

    #[test]
    fn test_select_resumes_running() {
        let mut state = GameState::new(1);
        gain_experience(&mut state, 10);
        let option = state.upgrade_options[0].clone();
        select_upgrade(&mut state, &option).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.upgrade_options.is_empty());
    }

    #[test]
    fn test_double_level_up_needs_single_select() {
        let mut state = GameState::new(1);
        gain_experience(&mut state, 10);
        gain_experience(&mut state, 14);
        assert_eq!(state.player.level, 3);

        let option = state.upgrade_options[0].clone();
        select_upgrade(&mut state, &option).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.upgrade_options.is_empty());
        assert!(matches!(
            select_upgrade(&mut state, &option),
            Err(SimError::NoPendingUpgrade)
        ));
    }

    #[test]
    fn test_select_applies_offered_copy() {
        let mut state = GameState::new(1);
        gain_experience(&mut state, 10);
        state.upgrade_options = vec![
            UpgradeOption::passive(PassiveKind::Speed),
            UpgradeOption::passive(PassiveKind::Might),
            UpgradeOption::passive(PassiveKind::Area),
        ];
        // Offered id, but a different effect attached
        let tampered = UpgradeOption {
            kind: UpgradeKind::Passive(PassiveKind::MaxHealth),
            ..UpgradeOption::passive(PassiveKind::Speed)
        };
        select_upgrade(&mut state, &tampered).unwrap();
        assert_eq!(state.player.speed, 220.0);
        assert_eq!(state.player.max_health, 100.0);
    }

    #[test]
    fn test_weapon_upgrade_paths() {
        let mut state = GameState::new(1);
        apply_upgrade(&mut state, &UpgradeOption::weapon(WeaponKind::Knife, 2));
        assert_eq!(state.player.weapons.len(), 1);
        assert_eq!(state.player.weapons[0].level, 2);
        assert!((state.player.weapons[0].damage - 12.0).abs() < 1e-4);

        apply_upgrade(&mut state, &UpgradeOption::weapon(WeaponKind::Garlic, 1));
        assert_eq!(state.player.weapons.len(), 2);
        let garlic = &state.player.weapons[1];
        assert_eq!(garlic.kind, WeaponKind::Garlic);
        assert_eq!(garlic.damage, 10.0);
        assert_eq!(garlic.cooldown_ms, 1000.0);
        assert_ne!(garlic.id, state.player.weapons[0].id);
    }

    #[test]
    fn test_passive_effects() {
        let mut state = GameState::new(1);
        state.player.health = 50.0;
        apply_upgrade(&mut state, &UpgradeOption::passive(PassiveKind::MaxHealth));
        assert_eq!(state.player.max_health, 120.0);
        assert_eq!(state.player.health, 70.0);

        state.player.health = 115.0;
        apply_upgrade(&mut state, &UpgradeOption::passive(PassiveKind::MaxHealth));
        assert_eq!(state.player.health, 135.0);

        apply_upgrade(&mut state, &UpgradeOption::passive(PassiveKind::Speed));
        assert_eq!(state.player.speed, 220.0);

        apply_upgrade(&mut state, &UpgradeOption::passive(PassiveKind::Cooldown));
        assert_eq!(state.player.passives.cooldown, 1);
    }
}
