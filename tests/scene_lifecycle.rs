//! Host-side scene behaviour through the public API.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sphere_streams::controls::ControlAction;
use sphere_streams::prelude::*;

fn seeded_scene(json: &str, seed: u64) -> Scene {
    let config = SceneConfig::from_json(json).expect("valid config");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = Scene::new(config).expect("valid scene");
    scene.restart(&mut rng);
    scene
}

#[test]
fn test_json_config_drives_scene() {
    let scene = seeded_scene(r##"{ "n_instances": 600, "use_cube": true, "top_colors": ["#ffffff", "#000000"] }"##, 3);

    assert!(scene.config().use_cube);
    assert_eq!(scene.container().len(), 1200);
    assert!((scene.top().colors()[0].0 - Vec3::ONE).abs().max_element() < 1e-5);
    assert_eq!(scene.top().colors()[1].to_array(), [0.0, 0.0, 0.0]);
    assert_eq!(scene.top().direction(), Direction::Forward);
    assert_eq!(scene.bottom().direction(), Direction::Backward);
}

#[test]
fn test_invalid_configs_are_rejected() {
    assert!(matches!(
        SceneConfig::from_json(r#"{ "n_instances": 0 }"#),
        Err(ConfigError::ZeroInstances)
    ));
    assert!(matches!(
        SceneConfig::from_json(r#"{ "background": "blue" }"#),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(SceneConfig::load("/nonexistent/scene.json"), Err(ConfigError::Io(_))));
}

#[test]
fn test_same_seed_same_scene() {
    let mut a = seeded_scene("{}", 42);
    let mut b = seeded_scene("{}", 42);
    a.update(12.5).expect("finite");
    b.update(12.5).expect("finite");

    for (sa, sb) in a.streams().iter().zip(b.streams().iter()) {
        for (pa, pb) in sa.particles().iter().zip(sb.particles()) {
            assert_eq!(pa.params, pb.params);
            assert_eq!(pa.transform, pb.transform);
        }
    }
}

#[test]
fn test_positions_stay_on_the_curve() {
    let mut scene = seeded_scene(r#"{ "n_instances": 2000 }"#, 9);

    for t in [0.0, 1.0, 30.0, 500.0] {
        scene.update(t).expect("finite");
        for stream in scene.streams() {
            let (min, max) = stream.bounds().expect("populated");
            assert!(min.x >= -40.0 && max.x <= 40.0);
            assert!(min.y >= -70.0 && max.y <= 70.0);
            assert!(min.z >= -105.0 && max.z <= 105.0);
            for p in stream.particles() {
                assert!((0.0..=1.0).contains(&p.transform.scale));
            }
        }
    }
    assert!(scene.visible_count() <= scene.container().len());
}

#[test]
fn test_controls_reconfigure_scene() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut scene = Scene::new(SceneConfig::default()).expect("valid");
    scene.restart(&mut rng);

    let mut next = scene.config().clone();
    for _ in 0..4 {
        next = ControlAction::AdjustInstances(-500).apply(&next);
    }
    next = ControlAction::ToggleCube.apply(&next);
    scene.reconfigure(next, &mut rng).expect("valid");

    assert_eq!(scene.config().n_instances, 500);
    assert!(scene.config().use_cube);
    assert_eq!(scene.container().len(), 1000);
    for stream in scene.streams() {
        for p in stream.particles() {
            assert!(scene.container().contains(p.handle()));
        }
    }
}
