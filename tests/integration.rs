use comet_scene::SceneEngine;
use comet_scene::model::resolver::{ResolveError, resolve_for_usage};
use comet_scene::model::value_set::{SwitchKind, ValueSetError};
use comet_scene::model::{Iid, Iteration};
use comet_scene::parse::comet_json;
use comet_scene::scene::{
    AngleUnit, Primitive, SceneObject, SceneSettings, collect_scene_objects,
};
use uuid::Uuid;

const SATELLITE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/satellite.json"
));

const BASELINE: u128 = 0x2;
const LIGHTWEIGHT: u128 = 0x3;
const LAUNCH: u128 = 0x101;
const ORBIT: u128 = 0x102;

fn iid(n: u128) -> Iid {
    Uuid::from_u128(n)
}

fn satellite() -> Iteration {
    comet_json::parse_str(SATELLITE).expect("parse satellite fixture")
}

fn first_value(
    iteration: &Iteration,
    usage: u128,
    short_name: &str,
    option: Option<u128>,
    states: &[u128],
) -> Result<Option<String>, ResolveError> {
    let usage = iteration.element_usage(iid(usage)).expect("usage exists");
    let states: Vec<Iid> = states.iter().copied().map(iid).collect();
    let value_set = resolve_for_usage(iteration, usage, short_name, option.map(iid), &states)?;
    Ok(value_set.and_then(|value_set| value_set.actual_value().value(0).map(str::to_owned)))
}

fn object<'a>(objects: &'a [SceneObject], short_name: &str) -> &'a SceneObject {
    objects
        .iter()
        .find(|object| object.short_name == short_name)
        .unwrap_or_else(|| panic!("scene object `{short_name}` present"))
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-6, "{actual:?} != {expected:?}");
    }
}

#[test]
fn fixture_builds_iteration() {
    let iteration = satellite();

    let options: Vec<&str> = iteration
        .options()
        .iter()
        .map(|option| option.short_name.as_str())
        .collect();
    assert_eq!(options, ["base", "light"]);

    let usages: Vec<&str> = iteration
        .usages()
        .iter()
        .map(|usage| usage.short_name.as_str())
        .collect();
    assert_eq!(usages, ["bus1", "tank1", "tank2", "ant1"]);

    let location = iteration.parameter_type_by_short_name("loc").unwrap();
    assert_eq!(location.number_of_values, 3);
    assert_eq!(
        iteration.state_list(iid(0x100)).unwrap().default_state().unwrap().name,
        "Launch"
    );
}

#[test]
fn option_dependent_values_follow_the_option() {
    let iteration = satellite();
    assert_eq!(
        first_value(&iteration, 0x51, "dia", Some(BASELINE), &[]).unwrap().as_deref(),
        Some("1")
    );
    assert_eq!(
        first_value(&iteration, 0x51, "dia", Some(LIGHTWEIGHT), &[]).unwrap().as_deref(),
        Some("0.8")
    );
    assert!(matches!(
        first_value(&iteration, 0x51, "dia", None, &[]),
        Err(ResolveError::MissingOption { .. })
    ));
}

#[test]
fn state_dependent_values_fall_back_to_first_mandatory_state() {
    let iteration = satellite();
    assert_eq!(
        first_value(&iteration, 0x53, "h", None, &[]).unwrap().as_deref(),
        Some("0.2")
    );
    assert_eq!(
        first_value(&iteration, 0x53, "h", None, &[ORBIT]).unwrap().as_deref(),
        Some("1.2")
    );
    assert_eq!(
        first_value(&iteration, 0x53, "h", None, &[LAUNCH]).unwrap().as_deref(),
        Some("0.2")
    );
}

#[test]
fn override_takes_precedence_on_its_usage_only() {
    let iteration = satellite();
    assert_eq!(
        first_value(&iteration, 0x51, "color", None, &[]).unwrap().as_deref(),
        Some("orange")
    );
    assert_eq!(
        first_value(&iteration, 0x52, "color", None, &[]).unwrap().as_deref(),
        Some("silver")
    );
    assert_eq!(first_value(&iteration, 0x50, "orientation", None, &[]).unwrap(), None);
}

#[test]
fn scene_objects_are_posed_in_world_space() {
    let iteration = satellite();
    let settings = SceneSettings::default();
    let objects = collect_scene_objects(&iteration, Some(iid(BASELINE)), &[iid(ORBIT)], &settings);
    assert_eq!(objects.len(), 4);

    let bus = object(&objects, "bus1");
    assert_eq!(
        bus.primitive,
        Some(Primitive::Cube {
            width: 2.0,
            height: 2.0,
            length: 2.0
        })
    );
    assert_eq!(bus.color, [204.0, 205.0, 221.0]);
    assert_eq!(bus.position, [0.0; 3]);

    let tank = object(&objects, "tank1");
    assert_eq!(
        tank.primitive,
        Some(Primitive::Cylinder {
            diameter: 1.0,
            height: 1.5
        })
    );
    assert_eq!(tank.position, [1.0, 0.0, 0.0]);
    assert_eq!(tank.color, [255.0, 165.0, 0.0]);
    assert_eq!(object(&objects, "tank2").color, [192.0, 192.0, 192.0]);

    let antenna = object(&objects, "ant1");
    assert_eq!(antenna.orientation.angles(), [0.0, 90.0, 0.0]);
    assert_eq!(antenna.orientation.unit(), AngleUnit::Degrees);
    assert_eq!(antenna.color, [255.0, 155.0, 25.0]);

    // De top van de kegel ligt op de Y-as, die bij Ry(90°) niet verandert.
    let mesh = antenna.world_mesh(12).expect("antenna is renderable");
    assert_close(&mesh.vertices[12], &[0.0, 2.1, 0.0]);
}

#[test]
fn excluded_and_hidden_usages_are_skipped() {
    let iteration = satellite();
    let settings = SceneSettings {
        hidden_masks: vec!["ant*".to_owned()],
        ..SceneSettings::default()
    };
    let names: Vec<String> = collect_scene_objects(&iteration, Some(iid(LIGHTWEIGHT)), &[], &settings)
        .into_iter()
        .map(|object| object.short_name)
        .collect();
    assert_eq!(names, ["bus1", "tank1"]);
}

#[test]
fn unresolvable_parameters_leave_defaults() {
    let iteration = satellite();
    // Zonder optie is de diameter van de tanks niet te bepalen.
    let objects = collect_scene_objects(&iteration, None, &[], &SceneSettings::default());
    assert_eq!(object(&objects, "tank1").primitive, None);
    assert_eq!(object(&objects, "tank1").position, [1.0, 0.0, 0.0]);
}

#[test]
fn engine_applies_edits_and_guards_computed_values() {
    let mut engine = SceneEngine::new();
    engine.load_iteration_json(SATELLITE).expect("load fixture");

    // Baseline-diameter van de tank.
    engine.update_value(iid(0x261), 0, "1.25").unwrap();
    let objects = engine.scene(Some(iid(BASELINE)), &[]).unwrap();
    assert_eq!(
        object(&objects, "tank2").primitive,
        Some(Primitive::Cylinder {
            diameter: 1.25,
            height: 1.5
        })
    );

    engine.update_switch(iid(0x261), SwitchKind::Computed).unwrap();
    let err = engine.update_value(iid(0x261), 0, "2").unwrap_err();
    assert!(matches!(
        err,
        comet_scene::EngineError::ValueSet(ValueSetError::ComputedIsReadOnly)
    ));
}
