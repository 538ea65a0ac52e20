use crate::api::controls::{ControlSchema, Params};
use crate::api::module::{Exhibit, Simulation};
use crate::api::types::{ModuleId, SurfaceKind};
use crate::core::session::{ExhibitRun, Live, SimRun};
use crate::experiments::{
    circuit::Circuit, friction::Friction, gravity::Gravity, magnetic::Magnetic,
    molecules::Molecules, optics::Optics, pendulum::Pendulum, periodic::Periodic, ph::Ph,
    projectile::Projectile, reaction::Reaction, refraction::Refraction, sound::Sound,
    states::States, wave::Wave,
};

/// Presentational inputs handed to a new module instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub seed: u64,
    /// Exhibit clock advance per frame, in seconds.
    pub clock_step: f32,
}

type Factory = fn(&Params, Spawn) -> Box<dyn Live>;

/// Everything the host needs to know about a module before opening it.
pub struct ModuleEntry {
    pub id: ModuleId,
    pub surface: SurfaceKind,
    pub schema: ControlSchema,
    factory: Factory,
}

impl ModuleEntry {
    /// A fresh instance initialized from `params`.
    pub fn instantiate(&self, params: &Params, spawn: Spawn) -> Box<dyn Live> {
        (self.factory)(params, spawn)
    }
}

fn simulation<M: Simulation + Default + 'static>(params: &Params, _spawn: Spawn) -> Box<dyn Live> {
    Box::new(SimRun::new(M::default(), params))
}

fn exhibit<E: Exhibit + Default + 'static>(_params: &Params, spawn: Spawn) -> Box<dyn Live> {
    Box::new(ExhibitRun::new(E::default(), spawn.seed, spawn.clock_step))
}

/// Module table, built once at startup and read-only thereafter.
/// Schemas are instantiated at registration.
pub struct ModuleRegistry {
    entries: Vec<ModuleEntry>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// All fifteen experiments, in launcher order.
    pub fn standard() -> Self {
        let mut reg = Self::new();
        reg.register_simulation::<Gravity>();
        reg.register_simulation::<Pendulum>();
        reg.register_simulation::<Wave>();
        reg.register_simulation::<Circuit>();
        reg.register_exhibit::<Reaction>();
        reg.register_exhibit::<Molecules>();
        reg.register_exhibit::<States>();
        reg.register_exhibit::<Ph>();
        reg.register_simulation::<Refraction>();
        reg.register_simulation::<Magnetic>();
        reg.register_simulation::<Sound>();
        reg.register_simulation::<Projectile>();
        reg.register_simulation::<Friction>();
        reg.register_exhibit::<Periodic>();
        reg.register_simulation::<Optics>();
        reg
    }

    pub fn register_simulation<M: Simulation + Default + 'static>(&mut self) {
        let model = M::default();
        self.insert(ModuleEntry {
            id: model.id(),
            surface: model.surface(),
            schema: model.controls(),
            factory: simulation::<M>,
        });
    }

    pub fn register_exhibit<E: Exhibit + Default + 'static>(&mut self) {
        let model = E::default();
        self.insert(ModuleEntry {
            id: model.id(),
            surface: model.surface(),
            schema: model.controls(),
            factory: exhibit::<E>,
        });
    }

    /// Later registrations replace earlier ones with the same id.
    fn insert(&mut self, entry: ModuleEntry) {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, id: ModuleId) -> Option<&ModuleEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn ids(&self) -> Vec<ModuleId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPAWN: Spawn = Spawn {
        seed: 42,
        clock_step: 1.0 / 60.0,
    };

    #[test]
    fn standard_registry_covers_every_key_in_order() {
        let reg = ModuleRegistry::standard();
        assert_eq!(reg.ids(), ModuleId::ALL.to_vec());
    }

    #[test]
    fn surfaces_match_experiment_kind() {
        let reg = ModuleRegistry::standard();
        let dom = [
            ModuleId::Gravity,
            ModuleId::Pendulum,
            ModuleId::Circuit,
            ModuleId::Reaction,
            ModuleId::States,
            ModuleId::Ph,
            ModuleId::Friction,
            ModuleId::Periodic,
        ];
        for id in ModuleId::ALL {
            let expected = if dom.contains(&id) {
                SurfaceKind::Dom
            } else {
                SurfaceKind::Canvas
            };
            assert_eq!(reg.get(id).map(|e| e.surface), Some(expected), "{id}");
        }
    }

    #[test]
    fn every_schema_is_non_empty() {
        let reg = ModuleRegistry::standard();
        for id in ModuleId::ALL {
            let entry = reg.get(id).unwrap();
            assert!(!entry.schema.is_empty(), "{id}");
        }
    }

    #[test]
    fn instances_are_independent() {
        let reg = ModuleRegistry::standard();
        let entry = reg.get(ModuleId::Pendulum).unwrap();
        let params = entry.schema.defaults();
        let mut a = entry.instantiate(&params, SPAWN);
        let b = entry.instantiate(&params, SPAWN);
        a.tick(&params);
        let size = glam::Vec2::new(800.0, 400.0);
        let (mut fa, mut fb) = (
            crate::renderer::draw::DrawList::new(size),
            crate::renderer::draw::DrawList::new(size),
        );
        a.render(&params, &mut fa);
        b.render(&params, &mut fb);
        assert_ne!(fa, fb);
    }

    #[test]
    fn reregistration_replaces() {
        let mut reg = ModuleRegistry::new();
        reg.register_simulation::<Wave>();
        reg.register_simulation::<Wave>();
        assert_eq!(reg.len(), 1);
    }
}
