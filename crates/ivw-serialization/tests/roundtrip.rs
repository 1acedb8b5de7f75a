//! Round-trip tests through XML text and files.

use glam::{DMat3, DQuat, DVec3, IVec4, Mat4, U64Vec2, Vec3, Vec4};
use ivw_serialization::{
    Deserializer, Result, Serializable, Serializer, SerializerOptions,
};
use proptest::prelude::*;

#[derive(Debug, Clone, Default, PartialEq)]
struct Light {
    name: String,
    intensity: f64,
    position: Vec3,
    color: Vec4,
    enabled: bool,
}

impl Light {
    fn new(index: usize) -> Self {
        Self {
            name: format!("light-{index}"),
            intensity: 0.25 * index as f64,
            position: Vec3::new(index as f32, -1.5, 2.0),
            color: Vec4::new(255.0, 10.0 * index as f32, 0.0, 255.0),
            enabled: index % 2 == 0,
        }
    }
}

impl Serializable for Light {
    fn serialize(&self, s: &mut Serializer) {
        s.serialize_attribute("identifier", &self.name);
        s.serialize("intensity", &self.intensity);
        s.serialize("position", &self.position);
        s.serialize_color("color", &self.color);
        s.serialize("enabled", &self.enabled);
    }

    fn deserialize(&mut self, d: &mut Deserializer) -> Result<bool> {
        let mut changed = d.deserialize_attribute("identifier", &mut self.name)?;
        changed |= d.deserialize("intensity", &mut self.intensity)?;
        changed |= d.deserialize("position", &mut self.position)?;
        changed |= d.deserialize_color("color", &mut self.color)?;
        changed |= d.deserialize("enabled", &mut self.enabled)?;
        Ok(changed)
    }
}

#[derive(Debug, Default, PartialEq)]
struct Scene {
    title: String,
    lights: Vec<Light>,
    transform: Mat4,
    weights: Vec<f32>,
}

impl Serializable for Scene {
    fn serialize(&self, s: &mut Serializer) {
        s.serialize("title", self.title.as_str());
        s.serialize_seq("lights", &self.lights, "Light");
        s.serialize("transform", &self.transform);
        s.serialize_seq("weights", &self.weights, "weight");
    }

    fn deserialize(&mut self, d: &mut Deserializer) -> Result<bool> {
        let mut changed = d.deserialize("title", &mut self.title)?;
        changed |= d.deserialize_seq("lights", &mut self.lights, "Light")?;
        changed |= d.deserialize("transform", &mut self.transform)?;
        changed |= d.deserialize_seq("weights", &mut self.weights, "weight")?;
        Ok(changed)
    }
}

fn sample_scene() -> Scene {
    Scene {
        title: "Head <CT> & MRI".to_string(),
        lights: (0..5).map(Light::new).collect(),
        transform: Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
        weights: vec![0.5, 0.25, 0.125],
    }
}

fn write_scene(scene: &Scene) -> String {
    let mut s = Serializer::new();
    s.serialize("Scene", scene);
    s.to_xml_string().unwrap()
}

#[test]
fn test_sequence_of_five_objects_round_trip() {
    let scene = sample_scene();
    let xml = write_scene(&scene);

    let mut d = Deserializer::parse(&xml).unwrap();
    let mut loaded = Scene::default();
    assert!(d.deserialize("Scene", &mut loaded).unwrap());

    assert_eq!(loaded.lights.len(), 5);
    let names: Vec<_> = loaded.lights.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["light-0", "light-1", "light-2", "light-3", "light-4"]);
    assert_eq!(loaded, scene);
}

#[test]
fn test_second_pass_reports_unchanged() {
    let scene = sample_scene();
    let xml = write_scene(&scene);

    let mut loaded = Scene::default();
    let mut d = Deserializer::parse(&xml).unwrap();
    assert!(d.deserialize("Scene", &mut loaded).unwrap());

    let mut again = Deserializer::parse(&write_scene(&loaded)).unwrap();
    assert!(!again.deserialize("Scene", &mut loaded).unwrap());
}

#[test]
fn test_missing_fields_keep_values() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<InviwoWorkspace version="1">
  <Scene>
    <title content="partial"/>
    <lights>
      <Light identifier="key">
        <position y="7"/>
      </Light>
    </lights>
  </Scene>
</InviwoWorkspace>"#;

    let mut scene = sample_scene();
    let mut d = Deserializer::parse(xml).unwrap();
    assert!(d.deserialize("Scene", &mut scene).unwrap());

    assert_eq!(scene.title, "partial");
    assert_eq!(scene.lights.len(), 1);
    let light = &scene.lights[0];
    assert_eq!(light.name, "key");
    assert_eq!(light.position, Vec3::new(0.0, 7.0, 2.0));
    assert_eq!(light.intensity, 0.0);
    assert_eq!(scene.weights, [0.5, 0.25, 0.125]);
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.inv");
    let scene = sample_scene();

    let mut s = Serializer::for_file(&path, SerializerOptions::default().with_indent(4));
    s.serialize("Scene", &scene);
    s.write_file().unwrap();

    let mut d = Deserializer::from_file(&path).unwrap();
    assert_eq!(d.path(), Some(path.as_path()));
    let mut loaded = Scene::default();
    d.deserialize("Scene", &mut loaded).unwrap();
    assert_eq!(loaded, scene);
}

#[test]
fn test_unindented_output_is_one_line() {
    let mut s = Serializer::with_options(SerializerOptions::default().with_indent(0));
    s.serialize("Light", &Light::new(1));
    let xml = s.to_xml_string().unwrap();
    assert_eq!(xml.lines().count(), 1);
}

fn round_trip<T>(value: &T, mut target: T) -> T
where
    T: ivw_serialization::SerializeValue + ivw_serialization::DeserializeValue,
{
    let mut s = Serializer::new();
    s.serialize("value", value);
    let mut d = Deserializer::parse(&s.to_xml_string().unwrap()).unwrap();
    d.deserialize("value", &mut target).unwrap();
    target
}

proptest! {
    #[test]
    fn prop_float_round_trip(v in -1.0e9f32..1.0e9f32) {
        prop_assert_eq!(round_trip(&v, 0.0), v);
    }

    #[test]
    fn prop_double_round_trip(v in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
        prop_assert_eq!(round_trip(&v, 0.0), v);
    }

    #[test]
    fn prop_integer_round_trip(v in any::<i64>(), u in any::<u64>()) {
        prop_assert_eq!(round_trip(&v, 0), v);
        prop_assert_eq!(round_trip(&u, 0), u);
    }

    #[test]
    fn prop_string_round_trip(v in "[a-zA-Z0-9 <>&'\"._-]{0,32}") {
        prop_assert_eq!(round_trip(&v, String::new()), v);
    }

    #[test]
    fn prop_vector_round_trip(
        x in -1.0e6f64..1.0e6,
        y in -1.0e6f64..1.0e6,
        z in -1.0e6f64..1.0e6,
        i in any::<[i32; 4]>(),
        u in any::<[u64; 2]>(),
    ) {
        let d = DVec3::new(x, y, z);
        prop_assert_eq!(round_trip(&d, DVec3::ZERO), d);
        let iv = IVec4::from_array(i);
        prop_assert_eq!(round_trip(&iv, IVec4::ZERO), iv);
        let uv = U64Vec2::from_array(u);
        prop_assert_eq!(round_trip(&uv, U64Vec2::ZERO), uv);
        let q = DQuat::from_xyzw(x, y, z, 1.0);
        prop_assert_eq!(round_trip(&q, DQuat::IDENTITY), q);
    }

    #[test]
    fn prop_matrix_round_trip(cols in proptest::array::uniform9(-1.0e6f64..1.0e6)) {
        let m = DMat3::from_cols_array(&cols);
        prop_assert_eq!(round_trip(&m, DMat3::IDENTITY), m);
    }
}
