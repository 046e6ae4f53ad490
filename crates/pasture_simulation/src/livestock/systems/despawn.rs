//! Уборка мёртвых грейзеров.

use bevy::prelude::*;

use crate::livestock::components::{DespawnAfter, Grazer};

/// Система: убирает тушу, когда истёк DespawnAfter
///
/// DespawnAfter ставит Spawner::schedule_removal в момент смерти
/// (fixed время + DESPAWN_DELAY_SECS). Death drop живёт своей жизнью.
pub fn despawn_after_timeout(
    mut commands: Commands,
    carcasses: Query<(Entity, &DespawnAfter, Option<&Grazer>)>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for (entity, removal, grazer) in &carcasses {
        if now < removal.despawn_time {
            continue;
        }

        let health = grazer.map(|grazer| grazer.health().current);
        crate::logger::log(&format!(
            "⚰️ Removing {:?} at t={:.2}s (health {:?})",
            entity, now, health
        ));
        commands.entity(entity).despawn();
    }
}
