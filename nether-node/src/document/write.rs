//! Node emitter
//!
//! Writes node fields in canonical order and leaves out every value equal to
//! its default.

use glam::{Mat4, Quat, Vec3};
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::fields;
use crate::node::Node;
use crate::transform::Transform;

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;

        if let Some(camera) = self.camera {
            map.serialize_entry(fields::CAMERA, &camera)?;
        }
        if !self.children.is_empty() {
            map.serialize_entry(fields::CHILDREN, &self.children)?;
        }
        if let Some(skin) = self.skin {
            map.serialize_entry(fields::SKIN, &skin)?;
        }
        if let Transform::Matrix(matrix) = &self.transform {
            if *matrix != Mat4::IDENTITY {
                map.serialize_entry(fields::MATRIX, &matrix.to_cols_array())?;
            }
        }
        if let Some(mesh) = self.mesh {
            map.serialize_entry(fields::MESH, &mesh)?;
        }
        if let Transform::Decomposed(trs) = &self.transform {
            if trs.rotation != Quat::IDENTITY {
                map.serialize_entry(fields::ROTATION, &trs.rotation.to_array())?;
            }
            if trs.scale != Vec3::ONE {
                map.serialize_entry(fields::SCALE, &trs.scale.to_array())?;
            }
            if trs.translation != Vec3::ZERO {
                map.serialize_entry(fields::TRANSLATION, &trs.translation.to_array())?;
            }
        }
        if !self.weights.is_empty() {
            map.serialize_entry(fields::WEIGHTS, &self.weights)?;
        }

        for (key, value) in &self.properties {
            if fields::ALL.contains(&key.as_str()) {
                tracing::warn!(property = %key, "skipping property that shadows a node field");
                continue;
            }
            map.serialize_entry(key, value)?;
        }

        map.end()
    }
}
