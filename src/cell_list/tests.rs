#[cfg(test)]
mod units {
    use crate::cell_list::CellList;
    use crate::particle::Particle;
    use crate::vector::Vec3;

    #[test]
    fn insert_and_neighbourhood_finds_self() {
        let mut cl = CellList::new(Vec3::new(10.0, 10.0, 10.0), 1.0, 2);
        cl.insert(0, Vec3::new(0.0, 0.0, 0.0));
        let mut found = Vec::new();
        cl.neighbourhood(Vec3::new(0.0, 0.0, 0.0), |id| found.push(id));
        assert_eq!(found, vec![0]);
    }

    #[test]
    fn neighbourhood_crosses_cell_boundary() {
        let mut cl = CellList::new(Vec3::new(10.0, 10.0, 10.0), 1.0, 2);
        cl.insert(0, Vec3::new(-4.9, 0.0, 0.0));
        cl.insert(1, Vec3::new(-5.05, 0.0, 0.0));
        let mut found = Vec::new();
        cl.neighbourhood(Vec3::new(-4.9, 0.0, 0.0), |id| found.push(id));
        found.sort();
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    fn update_moves_between_cells_without_orphaning_list() {
        let mut cl = CellList::new(Vec3::new(10.0, 10.0, 10.0), 1.0, 3);
        cl.insert(0, Vec3::new(0.0, 0.0, 0.0));
        cl.insert(1, Vec3::new(0.1, 0.0, 0.0));
        cl.insert(2, Vec3::new(0.2, 0.0, 0.0));

        let moved = cl.update(1, Vec3::new(4.9, 0.0, 0.0));
        assert!(moved);

        let mut near_origin = Vec::new();
        cl.neighbourhood(Vec3::new(0.0, 0.0, 0.0), |id| near_origin.push(id));
        near_origin.sort();
        assert_eq!(near_origin, vec![0, 2]);
    }

    #[test]
    fn remove_detaches_without_breaking_siblings() {
        let mut cl = CellList::new(Vec3::new(10.0, 10.0, 10.0), 1.0, 3);
        cl.insert(0, Vec3::zero());
        cl.insert(1, Vec3::zero());
        cl.insert(2, Vec3::zero());
        cl.remove(1);
        let mut found = Vec::new();
        cl.neighbourhood(Vec3::zero(), |id| found.push(id));
        found.sort();
        assert_eq!(found, vec![0, 2]);
    }

    #[test]
    fn next_face_time_is_positive_and_finite_for_moving_particle() {
        let cl = CellList::new(Vec3::new(10.0, 10.0, 10.0), 1.0, 1);
        let t = cl.next_face_time(Vec3::new(0.4, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(t > 0.0 && t.is_finite());
    }

    #[test]
    fn next_face_time_is_infinite_for_stationary_particle() {
        let cl = CellList::new(Vec3::new(10.0, 10.0, 10.0), 1.0, 1);
        let t = cl.next_face_time(Vec3::new(0.4, 0.0, 0.0), Vec3::zero());
        assert!(t.is_infinite());
    }

    #[test]
    fn rebuild_honours_overlap_and_reinserts_all_particles() {
        let mut cl = CellList::new(Vec3::new(10.0, 10.0, 10.0), 1.0, 2);
        assert_eq!(cl.dims(), [10, 10, 10]);

        cl.set_cell_overlap(1.0);
        let particles = vec![
            Particle::new(0, Vec3::new(0.0, 0.0, 0.0), Vec3::zero()),
            Particle::new(1, Vec3::new(-4.9, 0.0, 0.0), Vec3::zero()),
        ];
        cl.rebuild(Vec3::new(10.0, 10.0, 10.0), 1.0, &particles);

        // min edge is now min_cell_edge + overlap = 2.0, so each axis
        // holds half as many cells as before the rebuild.
        assert_eq!(cl.dims(), [5, 5, 5]);
        let mut found = Vec::new();
        cl.neighbourhood(Vec3::new(0.0, 0.0, 0.0), |id| found.push(id));
        assert_eq!(found, vec![0]);
    }

    #[test]
    fn periodic_wrap_at_box_edge_still_finds_neighbour() {
        let mut cl = CellList::new(Vec3::new(10.0, 10.0, 10.0), 1.0, 2);
        cl.insert(0, Vec3::new(4.95, 0.0, 0.0));
        cl.insert(1, Vec3::new(-4.95, 0.0, 0.0));
        let mut found = Vec::new();
        cl.neighbourhood(Vec3::new(4.95, 0.0, 0.0), |id| found.push(id));
        found.sort();
        assert_eq!(found, vec![0, 1]);
    }
}
