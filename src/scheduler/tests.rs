#[cfg(test)]
mod units {
    use crate::boundary::BoundaryCondition;
    use crate::cell_list::CellList;
    use crate::dynamics::Liouvillean;
    use crate::global_local::{Global, Local};
    use crate::interaction::{HardSphere, Interaction, InteractionRegistry};
    use crate::particle::Particle;
    use crate::scheduler::logic::full_update;
    use crate::scheduler::{Scheduler, SchedulerContext};
    use crate::species::{Species, SpeciesRegistry};
    use crate::vector::Vec3;

    fn two_sphere_world() -> (Vec<Particle>, InteractionRegistry, SpeciesRegistry, CellList) {
        let particles = vec![
            Particle::new(0, Vec3::new(-2.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
            Particle::new(1, Vec3::new(2.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)),
        ];
        let mut interactions = InteractionRegistry::new();
        interactions.push(Box::new(HardSphere::new(0, 0, 1.0)));
        let mut species = SpeciesRegistry::new();
        species.add(Species::new("A", 1.0, vec![0, 1])).unwrap();
        let cell_list = CellList::new(Vec3::new(20.0, 20.0, 20.0), 1.0, 2);
        (particles, interactions, species, cell_list)
    }

    #[test]
    fn two_hard_spheres_collide_and_separate() {
        let (mut particles, mut interactions, species, mut cell_list) = two_sphere_world();
        for (id, p) in particles.iter().enumerate() {
            cell_list.insert(id, p.position);
        }
        let boundary = BoundaryCondition::None;
        let liouvillean = Liouvillean::newtonian();
        let globals: Vec<Box<dyn Global>> = Vec::new();
        let locals: Vec<Box<dyn Local>> = Vec::new();

        let mut scheduler = Scheduler::new(2);
        full_update(
            0,
            &mut scheduler.sorter,
            &particles,
            &cell_list,
            &boundary,
            &liouvillean,
            &interactions,
            &species,
            &globals,
            &locals,
            0.0,
        );
        full_update(
            1,
            &mut scheduler.sorter,
            &particles,
            &cell_list,
            &boundary,
            &liouvillean,
            &interactions,
            &species,
            &globals,
            &locals,
            0.0,
        );

        let mut ctx = SchedulerContext {
            particles: &mut particles,
            cell_list: &mut cell_list,
            boundary: &boundary,
            liouvillean: &liouvillean,
            interactions: &mut interactions,
            species: &species,
            globals: &globals,
            locals: &locals,
        };

        let advanced = scheduler.run_next_event(&mut ctx).unwrap();
        assert!(advanced);
        assert!((scheduler.sim_time - 1.5).abs() < 1e-9);
        assert!((particles[0].velocity.x - (-1.0)).abs() < 1e-9);
        assert!((particles[1].velocity.x - 1.0).abs() < 1e-9);
        assert_eq!(particles[0].collision_counter, 1);
        assert_eq!(particles[1].collision_counter, 1);
    }

    #[test]
    fn shutdown_request_stops_the_loop() {
        let (mut particles, mut interactions, species, mut cell_list) = two_sphere_world();
        for (id, p) in particles.iter().enumerate() {
            cell_list.insert(id, p.position);
        }
        let boundary = BoundaryCondition::None;
        let liouvillean = Liouvillean::newtonian();
        let globals: Vec<Box<dyn Global>> = Vec::new();
        let locals: Vec<Box<dyn Local>> = Vec::new();

        let mut scheduler = Scheduler::new(2);
        scheduler.request_shutdown();

        let mut ctx = SchedulerContext {
            particles: &mut particles,
            cell_list: &mut cell_list,
            boundary: &boundary,
            liouvillean: &liouvillean,
            interactions: &mut interactions,
            species: &species,
            globals: &globals,
            locals: &locals,
        };
        assert!(!scheduler.run_next_event(&mut ctx).unwrap());
    }
}
