// Frame-rate sampling and adaptive quality.

use orb_core::*;

struct FixedProbe(f64);

impl MemoryProbe for FixedProbe {
    fn used_heap_mb(&self) -> Option<f64> {
        Some(self.0)
    }
}

fn setup(probe: Box<dyn MemoryProbe>) -> (OrbStateManager, Store) {
    let config = RuntimeConfig {
        particle_seed: Some(3),
        ..RuntimeConfig::default()
    };
    let store = Store::builder().debug_history_capacity(500).build();
    let manager = OrbStateManager::new(&config, store.orb().animation_state, probe);
    (manager, store)
}

#[test]
fn twenty_fps_drops_to_low() {
    let (mut m, mut store) = setup(Box::new(NoMemoryProbe));
    for _ in 0..70 {
        m.tick(&mut store, 50.0);
    }
    let fps = store.orb().performance_metrics.fps;
    assert!((15.0..=25.0).contains(&fps), "fps {fps}");
    assert_eq!(m.frame_rate().len(), 60);
    assert_eq!(store.orb().quality_level, QualityLevel::Low);
}

#[test]
fn ten_slow_frames_swap_particle_preset() {
    let (mut m, mut store) = setup(Box::new(NoMemoryProbe));
    assert_eq!(store.orb().quality_level, QualityLevel::High);
    let mut frame = m.tick(&mut store, 50.0);
    for _ in 0..9 {
        frame = m.tick(&mut store, 50.0);
    }
    assert_eq!(store.orb().quality_level, QualityLevel::Low);
    assert_eq!(store.orb().particle_system.max_particles, 1500);
    assert_eq!(frame.particle_count, 1500);
    assert_eq!(frame.quality, QualityLevel::Low);
}

#[test]
fn steady_sixty_never_touches_quality() {
    let (mut m, mut store) = setup(Box::new(NoMemoryProbe));
    for _ in 0..300 {
        m.tick(&mut store, 1000.0 / 60.0);
    }
    assert_eq!(store.orb().quality_level, QualityLevel::High);
    let history = store.debug_history().unwrap();
    assert!(history.actions().all(|a| a != "set_quality_level"));
}

#[test]
fn middle_band_keeps_current_level() {
    assert_eq!(QualityLevel::for_fps(QualityLevel::Low, 50.0), QualityLevel::Low);
    assert_eq!(QualityLevel::for_fps(QualityLevel::High, 50.0), QualityLevel::High);
    assert_eq!(QualityLevel::for_fps(QualityLevel::High, 44.9), QualityLevel::Medium);
    assert_eq!(QualityLevel::for_fps(QualityLevel::Low, 55.0), QualityLevel::High);
    assert_eq!(QualityLevel::for_fps(QualityLevel::Medium, 29.0), QualityLevel::Low);
}

#[test]
fn recovery_climbs_back_to_high() {
    let (mut m, mut store) = setup(Box::new(NoMemoryProbe));
    for _ in 0..60 {
        m.tick(&mut store, 50.0);
    }
    assert_eq!(store.orb().quality_level, QualityLevel::Low);
    for _ in 0..60 {
        m.tick(&mut store, 10.0);
    }
    assert_eq!(store.orb().quality_level, QualityLevel::High);
    assert_eq!(store.orb().particle_system.max_particles, 5000);
}

#[test]
fn monitor_caps_spikes_and_skips_bad_deltas() {
    let mut monitor = FrameRateMonitor::new(4);
    assert_eq!(monitor.record(0.0), None);
    assert_eq!(monitor.record(f64::INFINITY), None);
    assert_eq!(monitor.record(1.0), Some(120.0));
    monitor.record(10.0);
    assert_eq!(monitor.average(), Some(110.0));
    for _ in 0..10 {
        monitor.record(25.0);
    }
    assert_eq!(monitor.len(), 4);
    assert_eq!(monitor.average(), Some(40.0));
    monitor.reset();
    assert!(monitor.is_empty());
}

#[test]
fn metrics_report_memory_and_frame_time() {
    let (mut m, mut store) = setup(Box::new(FixedProbe(42.5)));
    m.tick(&mut store, 25.0);
    let metrics = store.orb().performance_metrics;
    assert_eq!(metrics.memory_mb, 42.5);
    assert_eq!(metrics.render_time_ms, 25.0);
    assert_eq!(metrics.fps, 40.0);

    let (mut m, mut store) = setup(Box::new(NoMemoryProbe));
    m.tick(&mut store, 25.0);
    assert_eq!(store.orb().performance_metrics.memory_mb, 0.0);
}
