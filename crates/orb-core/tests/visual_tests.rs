// Visual tables, interpolation and the GPU-facing frame data.

use orb_core::color::{format_hex, parse_hex};
use orb_core::easing::Easing;
use orb_core::*;

#[test]
fn static_config_ignores_progress_without_previous() {
    for state in OrbAnimationState::ALL {
        let expected = OrbVisualConfig::for_state(state);
        for progress in [0.0, 0.3, 0.99, 1.0, 7.0] {
            assert_eq!(config_for(state, None, progress), expected, "{state}");
        }
    }
}

#[test]
fn interpolation_hits_both_endpoints() {
    for state in OrbAnimationState::ALL {
        for previous in OrbAnimationState::ALL {
            assert_eq!(
                config_for(state, Some(previous), 0.0),
                OrbVisualConfig::for_state(previous),
                "{previous} -> {state} at 0"
            );
            assert_eq!(
                config_for(state, Some(previous), 1.0),
                OrbVisualConfig::for_state(state),
                "{previous} -> {state} at 1"
            );
        }
    }
}

#[test]
fn presets_match_design_colors() {
    let hex = |s| OrbVisualConfig::for_state(s).base_hex();
    assert_eq!(hex(OrbAnimationState::Idle), "#4338ca");
    assert_eq!(hex(OrbAnimationState::Processing), "#4a90e2");
    assert_eq!(hex(OrbAnimationState::Success), "#22c55e");
    assert_eq!(hex(OrbAnimationState::Error), "#ef4444");
    assert_eq!(hex(OrbAnimationState::Active), "#818cf8");
    assert_eq!(hex(OrbAnimationState::Inactive), "#475569");

    let processing = OrbVisualConfig::for_state(OrbAnimationState::Processing);
    assert_eq!(processing.speed, 1.2);
    assert_eq!(processing.radius, 1.1);
    assert_eq!(processing.alpha, 0.95);
}

#[test]
fn durations_and_easings_per_state() {
    let durations: Vec<f64> = OrbAnimationState::ALL
        .iter()
        .map(|s| s.duration_ms())
        .collect();
    assert_eq!(durations, vec![800.0, 600.0, 400.0, 500.0, 600.0, 800.0]);
    assert_eq!(OrbAnimationState::Idle.easing(), Easing::EaseInOut);
    assert_eq!(OrbAnimationState::Processing.easing(), Easing::EaseOut);
    assert_eq!(OrbAnimationState::Error.easing(), Easing::EaseInOut);
}

#[test]
fn state_names_parse_leniently() {
    assert_eq!(OrbAnimationState::parse_lossy("Loading"), OrbAnimationState::Processing);
    assert_eq!(OrbAnimationState::parse_lossy(" error "), OrbAnimationState::Error);
    assert_eq!(OrbAnimationState::parse_lossy("sparkly"), OrbAnimationState::Idle);
    let parsed: OrbAnimationState = serde_json::from_str("\"loading\"").unwrap();
    assert_eq!(parsed, OrbAnimationState::Processing);
}

#[test]
fn easing_curves_are_monotonic_and_pinned() {
    for easing in [Easing::Linear, Easing::EaseOut, Easing::EaseInOut] {
        assert_eq!(easing.apply(0.0), 0.0);
        assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        let mut last = 0.0;
        for i in 0..=100 {
            let v = easing.apply(i as f32 / 100.0);
            assert!(v >= last, "{easing:?} dipped at {i}");
            last = v;
        }
    }
}

#[test]
fn hex_parsing_round_trips_and_rejects_garbage() {
    let white = parse_hex("#ffffff").unwrap();
    assert_eq!(white, parse_hex("ffffff").unwrap());
    assert_eq!(format_hex(white), "#ffffff");
    assert_eq!(format_hex(parse_hex("#4a90e2").unwrap()), "#4a90e2");
    assert!(parse_hex("#fff").is_none());
    assert!(parse_hex("zzzzzz").is_none());
}

#[test]
fn seeded_particle_fields_are_reproducible() {
    let color = OrbVisualConfig::for_state(OrbAnimationState::Idle).base_color;
    let a = ParticleField::generate(200, color, Some(42));
    let b = ParticleField::generate(200, color, Some(42));
    assert_eq!(a.particles, b.particles);
    assert_eq!(a.len(), 200);
    assert_eq!(a.as_bytes().len(), 200 * std::mem::size_of::<ParticleVertex>());

    for p in &a.particles {
        let r = glam::Vec3::from(p.position).length();
        assert!((1.14..=1.61).contains(&r), "radius {r} outside the shell");
    }
}

#[test]
fn particle_cache_regenerates_only_on_key_change() {
    let mut cache = ParticleFieldCache::new(Some(1));
    let idle = OrbVisualConfig::for_state(OrbAnimationState::Idle).base_color;
    let error = OrbVisualConfig::for_state(OrbAnimationState::Error).base_color;
    let high = ParticleSystemConfig::preset(QualityLevel::High);
    let low = ParticleSystemConfig::preset(QualityLevel::Low);

    let first = cache.get(&high, idle);
    let again = cache.get(&high, idle);
    assert!(std::rc::Rc::ptr_eq(&first, &again));
    assert_eq!(cache.generations(), 1);

    assert_eq!(cache.get(&low, idle).len(), 1500);
    assert_eq!(cache.get(&low, error).len(), 1500);
    assert_eq!(cache.generations(), 3);

    let disabled = ParticleSystemConfig {
        enabled: false,
        ..low
    };
    assert!(cache.get(&disabled, error).is_empty());
}

#[test]
fn engine_breathes_and_wraps_rotation() {
    let config = OrbVisualConfig::for_state(OrbAnimationState::Processing);
    let mut engine = OrbAnimationEngine::new();
    let mut min_r = f32::MAX;
    let mut max_r = f32::MIN;
    for _ in 0..2000 {
        let u = engine.advance(16.0, 1.0, &config, 1.0);
        assert!((0.0..std::f32::consts::TAU).contains(&u.rotation));
        min_r = min_r.min(u.radius);
        max_r = max_r.max(u.radius);
    }
    assert!(min_r >= config.radius * 0.96 - 1e-4);
    assert!(max_r <= config.radius * 1.04 + 1e-4);
    assert!(max_r > min_r);
}

#[test]
fn engine_clamps_speed() {
    let config = OrbVisualConfig::for_state(OrbAnimationState::Idle);
    let mut fast = OrbAnimationEngine::new();
    fast.advance(1000.0, 10.0, &config, 1.0);
    assert!((fast.time() - 2.0).abs() < 1e-6);

    let mut broken = OrbAnimationEngine::new();
    broken.advance(1000.0, f32::NAN, &config, 1.0);
    assert!((broken.time() - 1.0).abs() < 1e-6);

    let uniforms = OrbAnimationEngine::new().advance(16.0, 1.0, &config, 0.5);
    assert_eq!(uniforms.as_bytes().len(), 64);
}
