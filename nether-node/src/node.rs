//! Scene-graph node entity

use glam::{Mat4, Vec3};
use serde_json::{Map, Value};

use crate::error::NodeError;
use crate::index::{Camera, Index, Mesh, Skin};
use crate::transform::{self, LocalTransform, Transform, Trs};

/// Common glTF property name for a node's display name
pub const NAME: &str = "name";
/// Common glTF property holding extension objects
pub const EXTENSIONS: &str = "extensions";
/// Common glTF property holding application-specific data
pub const EXTRAS: &str = "extras";

/// A glTF node: references, hierarchy, transform and morph weights
///
/// Properties the codec does not interpret (`name`, `extensions`, `extras`,
/// vendor keys) are kept raw in [`Node::properties`] and written back after
/// the node's own fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub camera: Option<Index<Camera>>,
    pub children: Vec<Index<Node>>,
    pub skin: Option<Index<Skin>>,
    pub mesh: Option<Index<Mesh>>,
    pub transform: Transform,
    pub weights: Vec<f64>,
    pub properties: Map<String, Value>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera(mut self, camera: u32) -> Self {
        self.camera = Some(Index::new(camera));
        self
    }

    pub fn with_mesh(mut self, mesh: u32) -> Self {
        self.mesh = Some(Index::new(mesh));
        self
    }

    pub fn with_skin(mut self, skin: u32) -> Self {
        self.skin = Some(Index::new(skin));
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = u32>) -> Self {
        self.children = children.into_iter().map(Index::new).collect();
        self
    }

    pub fn with_weights(mut self, weights: impl Into<Vec<f64>>) -> Self {
        self.weights = weights.into();
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    /// True when the node is encoded with translation/rotation/scale
    pub fn uses_trs(&self) -> bool {
        self.transform.is_decomposed()
    }

    /// Authoritative local matrix in document convention
    pub fn matrix(&self) -> Mat4 {
        self.transform.matrix()
    }

    /// Local TRS in document convention
    pub fn trs(&self) -> Trs {
        self.transform.trs()
    }

    pub fn set_matrix(&mut self, matrix: Mat4) {
        self.transform = Transform::Matrix(matrix);
    }

    pub fn set_trs(&mut self, trs: Trs) {
        self.transform = Transform::Decomposed(trs);
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        let trs = self.trs();
        self.set_trs(Trs { translation, ..trs });
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get(NAME).and_then(Value::as_str)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.properties
            .insert(NAME.to_string(), Value::String(name.into()));
    }

    pub fn extensions(&self) -> Option<&Map<String, Value>> {
        self.properties.get(EXTENSIONS).and_then(Value::as_object)
    }

    pub fn extras(&self) -> Option<&Value> {
        self.properties.get(EXTRAS)
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Every property the codec kept without interpreting, in document order
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Check the morph weights against the target count of the node's mesh
    pub fn validate_weights(&self, target_count: usize) -> Result<(), NodeError> {
        if self.weights.is_empty() || self.weights.len() == target_count {
            Ok(())
        } else {
            Err(NodeError::WeightCount {
                expected: target_count,
                found: self.weights.len(),
            })
        }
    }

    /// Local TRS in host convention, ready to drive a live transform
    pub fn import_to_host_transform(&self) -> Trs {
        transform::import_to_host(&self.transform)
    }

    /// Store a host-local transform as document TRS properties
    ///
    /// Always leaves the node in TRS form.
    pub fn export_host_transform(&mut self, host: &Trs) {
        self.set_trs(transform::export_from_host(host));
    }

    /// Store a host-local transform in the node's current encoding
    pub fn store_host_transform(&mut self, host: &Trs) {
        match self.transform {
            Transform::Matrix(_) => {
                self.set_matrix(transform::flip_handedness(transform::compose(host)))
            }
            Transform::Decomposed(_) => self.export_host_transform(host),
        }
    }

    pub fn apply_to_host(&self, host: &mut impl LocalTransform) {
        host.set_local_transform(self.import_to_host_transform());
    }

    pub fn capture_from_host(&mut self, host: &impl LocalTransform) {
        self.store_host_transform(&host.local_transform());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    const EPSILON: f32 = 1e-5;

    #[derive(Default)]
    struct FakeHost {
        local: Trs,
    }

    impl LocalTransform for FakeHost {
        fn local_transform(&self) -> Trs {
            self.local
        }

        fn set_local_transform(&mut self, trs: Trs) {
            self.local = trs;
        }
    }

    #[test]
    fn test_default_node_is_empty() {
        let node = Node::new();
        assert_eq!(node.camera, None);
        assert_eq!(node.mesh, None);
        assert_eq!(node.skin, None);
        assert!(node.children.is_empty());
        assert!(node.weights.is_empty());
        assert!(!node.uses_trs());
        assert_eq!(node.matrix(), Mat4::IDENTITY);
        assert!(node.properties.is_empty());
    }

    #[test]
    fn test_absent_reference_differs_from_zero() {
        let node = Node::new().with_camera(0);
        assert_eq!(node.camera, Some(Index::new(0)));
        assert_ne!(node, Node::new());
    }

    #[test]
    fn test_set_translation_switches_to_trs() {
        let mut node = Node::new();
        node.set_translation(Vec3::new(0.0, 0.0, 1.0));
        assert!(node.uses_trs());
        assert_eq!(node.trs().translation, Vec3::Z);
        assert_eq!(node.trs().scale, Vec3::ONE);
    }

    #[test]
    fn test_common_properties() {
        let node = Node::new().with_name("Root");
        assert_eq!(node.name(), Some("Root"));
        assert!(node.extras().is_none());
        assert!(node.extensions().is_none());
    }

    #[test]
    fn test_validate_weights() {
        let node = Node::new().with_weights(vec![0.25, 0.75]);
        assert!(node.validate_weights(2).is_ok());
        assert!(matches!(
            node.validate_weights(3),
            Err(NodeError::WeightCount {
                expected: 3,
                found: 2
            })
        ));
        assert!(Node::new().validate_weights(4).is_ok());
    }

    #[test]
    fn test_host_roundtrip_keeps_trs_form() {
        let host = Trs::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(0.5),
            Vec3::splat(2.0),
        );
        let mut node = Node::new();
        node.export_host_transform(&host);

        assert!(node.uses_trs());
        // z flips between conventions
        assert!(
            node.trs()
                .translation
                .abs_diff_eq(Vec3::new(1.0, 2.0, -3.0), EPSILON)
        );

        let back = node.import_to_host_transform();
        assert!(back.translation.abs_diff_eq(host.translation, EPSILON));
        assert!(back.rotation.abs_diff_eq(host.rotation, EPSILON));
        assert!(back.scale.abs_diff_eq(host.scale, EPSILON));
    }

    #[test]
    fn test_store_host_transform_keeps_matrix_form() {
        let mut node = Node::new().with_transform(Transform::Matrix(Mat4::IDENTITY));
        let host = Trs::from_translation(Vec3::new(0.0, 0.0, 4.0));
        node.store_host_transform(&host);

        assert!(!node.uses_trs());
        assert_eq!(
            node.matrix(),
            Mat4::from_translation(Vec3::new(0.0, 0.0, -4.0))
        );
    }

    #[test]
    fn test_apply_and_capture_host() {
        let node = Node::new().with_transform(Transform::Decomposed(Trs::from_translation(
            Vec3::new(0.0, 1.0, 2.0),
        )));
        let mut host = FakeHost::default();
        node.apply_to_host(&mut host);
        assert!(
            host.local
                .translation
                .abs_diff_eq(Vec3::new(0.0, 1.0, -2.0), EPSILON)
        );

        host.local.translation.x = 5.0;
        let mut edited = node.clone();
        edited.capture_from_host(&host);
        assert!(edited.uses_trs());
        assert!(
            edited
                .trs()
                .translation
                .abs_diff_eq(Vec3::new(5.0, 1.0, 2.0), EPSILON)
        );
    }
}
