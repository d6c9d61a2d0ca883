//! Unit tests for scoot-core primitives.

#[cfg(test)]
mod ids {
    use crate::{NodeId, ParkingId, RideId, VehicleId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(VehicleId::default(), VehicleId::INVALID);
        assert!(!ParkingId::default().is_valid());
        assert!(ParkingId(3).is_valid());
    }

    #[test]
    fn ride_ids_are_one_based() {
        assert_eq!(RideId::nth(0), RideId(1));
        assert_eq!(RideId::nth(9), RideId(10));
    }

    #[test]
    fn display() {
        assert_eq!(ParkingId(7).to_string(), "ParkingId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(55.751, 37.618);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        let a = GeoPoint::new(55.0, 37.0);
        let b = GeoPoint::new(56.0, 37.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick, DEFAULT_PROBE_INTERVAL_SECS};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(15).since(Tick(5)), 10);
    }

    #[test]
    fn checked_add_stops_at_the_end_of_the_axis() {
        assert_eq!(Tick(10).checked_add(5), Some(Tick(15)));
        assert_eq!(Tick(0).checked_add(u64::MAX), Some(Tick(u64::MAX)));
        assert_eq!(Tick(5).checked_add(u64::MAX), None);
    }

    #[test]
    fn clock_unix_mapping() {
        let mut clock = SimClock::new(1_700_000_000);
        clock.advance_to(Tick(90));
        assert_eq!(clock.current_unix_secs(), 1_700_000_090);
        assert_eq!(clock.unix_secs_at(Tick(0)), 1_700_000_000);
    }

    #[test]
    fn clock_dhm() {
        let mut clock = SimClock::new(0);
        clock.advance_to(Tick(86_400 + 3_600 + 120));
        assert_eq!(clock.elapsed_dhm(), (1, 1, 2));
    }

    #[test]
    #[should_panic(expected = "must not go backwards")]
    fn clock_refuses_to_rewind() {
        let mut clock = SimClock::new(0);
        clock.advance_to(Tick(10));
        clock.advance_to(Tick(9));
    }

    #[test]
    fn window_config() {
        let cfg = SimConfig::for_window(1_000, 1_000 + 86_400);
        assert_eq!(cfg.end_tick(), Tick(86_400));
        assert_eq!(cfg.probe_interval_secs, DEFAULT_PROBE_INTERVAL_SECS);
        assert!(cfg.ride_limit.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn tick_at_clamps_before_start() {
        let cfg = SimConfig::for_window(1_000, 2_000);
        assert_eq!(cfg.tick_at(500), Tick(0));
        assert_eq!(cfg.tick_at(1_250), Tick(250));
    }

    #[test]
    fn invalid_configs_rejected() {
        let empty = SimConfig::for_window(1_000, 1_000);
        assert!(empty.validate().is_err());

        let mut no_probe = SimConfig::for_window(0, 10);
        no_probe.probe_interval_secs = 0;
        assert!(no_probe.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: u32 = r1.gen_range(0..1_000_000);
            let b: u32 = r2.gen_range(0..1_000_000);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn children_diverge() {
        let mut root = SimRng::new(7);
        let mut c0 = root.child(0);
        let mut c1 = root.child(1);
        let a: u64 = c0.gen_range(0..u64::MAX);
        let b: u64 = c1.gen_range(0..u64::MAX);
        assert_ne!(a, b);
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(0);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[5]), Some(&5));
    }
}
