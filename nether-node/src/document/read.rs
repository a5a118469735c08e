//! Streaming node parser
//!
//! Pulls one property at a time from any serde `MapAccess`, so the same code
//! runs over a JSON string, a reader, or an already parsed `serde_json::Value`.

use std::fmt;

use glam::{Mat4, Quat, Vec3};
use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, Visitor};
use serde_json::Value;

use super::fields;
use crate::index::{Camera, DocumentContext, Index, IndexKind, Mesh, Skin};
use crate::node::Node;
use crate::transform::{Transform, Trs};

/// Parses one node, resolving references against an optional context
///
/// Without a context indices are taken as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeSeed<'a> {
    context: Option<&'a DocumentContext>,
}

impl<'a> NodeSeed<'a> {
    pub fn new(context: &'a DocumentContext) -> Self {
        Self {
            context: Some(context),
        }
    }

    pub fn unresolved() -> Self {
        Self { context: None }
    }

    pub(crate) fn with_context(context: Option<&'a DocumentContext>) -> Self {
        Self { context }
    }

    fn resolve<T: IndexKind, E: de::Error>(&self, raw: u32) -> Result<Index<T>, E> {
        match self.context {
            Some(context) => context.resolve::<T>(raw).map_err(E::custom),
            None => Ok(Index::new(raw)),
        }
    }
}

impl<'de> DeserializeSeed<'de> for NodeSeed<'_> {
    type Value = Node;

    fn deserialize<D>(self, deserializer: D) -> Result<Node, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(NodeVisitor { seed: self })
    }
}

impl<'de> serde::Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        NodeSeed::unresolved().deserialize(deserializer)
    }
}

struct NodeVisitor<'a> {
    seed: NodeSeed<'a>,
}

/// Expected length message for fixed-size number arrays
struct ArrayLen {
    property: &'static str,
    len: usize,
}

impl de::Expected for ArrayLen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} numbers for `{}`", self.len, self.property)
    }
}

/// Expected value message for components that overflow `f32`
struct FiniteNumber {
    property: &'static str,
}

impl de::Expected for FiniteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a finite single-precision number in `{}`", self.property)
    }
}

fn fixed<const N: usize, E: de::Error>(
    property: &'static str,
    values: Vec<f32>,
) -> Result<[f32; N], E> {
    if let Some(value) = values.iter().find(|v| !v.is_finite()) {
        return Err(E::invalid_value(
            de::Unexpected::Float(f64::from(*value)),
            &FiniteNumber { property },
        ));
    }

    let len = values.len();
    values
        .try_into()
        .map_err(|_| E::invalid_length(len, &ArrayLen { property, len: N }))
}

fn set_once<T, E: de::Error>(
    slot: &mut Option<T>,
    value: T,
    property: &'static str,
) -> Result<(), E> {
    if slot.is_some() {
        return Err(E::duplicate_field(property));
    }
    *slot = Some(value);
    Ok(())
}

impl<'de> Visitor<'de> for NodeVisitor<'_> {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a glTF node object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut node = Node::new();

        let mut camera: Option<Index<Camera>> = None;
        let mut children: Option<Vec<Index<Node>>> = None;
        let mut skin: Option<Index<Skin>> = None;
        let mut mesh: Option<Index<Mesh>> = None;
        let mut matrix: Option<Mat4> = None;
        let mut rotation: Option<Quat> = None;
        let mut scale: Option<Vec3> = None;
        let mut translation: Option<Vec3> = None;
        let mut weights: Option<Vec<f64>> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                fields::CAMERA => {
                    let index = self.seed.resolve::<Camera, A::Error>(map.next_value()?)?;
                    set_once::<_, A::Error>(&mut camera, index, fields::CAMERA)?;
                }
                fields::CHILDREN => {
                    let raw: Vec<u32> = map.next_value()?;
                    let resolved = raw
                        .into_iter()
                        .map(|i| self.seed.resolve::<Node, A::Error>(i))
                        .collect::<Result<Vec<_>, _>>()?;
                    set_once::<_, A::Error>(&mut children, resolved, fields::CHILDREN)?;
                }
                fields::SKIN => {
                    let index = self.seed.resolve::<Skin, A::Error>(map.next_value()?)?;
                    set_once::<_, A::Error>(&mut skin, index, fields::SKIN)?;
                }
                fields::MATRIX => {
                    let values = fixed::<16, A::Error>(fields::MATRIX, map.next_value()?)?;
                    let value = Mat4::from_cols_array(&values);
                    set_once::<_, A::Error>(&mut matrix, value, fields::MATRIX)?;
                }
                fields::MESH => {
                    let index = self.seed.resolve::<Mesh, A::Error>(map.next_value()?)?;
                    set_once::<_, A::Error>(&mut mesh, index, fields::MESH)?;
                }
                fields::ROTATION => {
                    let values = fixed::<4, A::Error>(fields::ROTATION, map.next_value()?)?;
                    let value = Quat::from_array(values);
                    set_once::<_, A::Error>(&mut rotation, value, fields::ROTATION)?;
                }
                fields::SCALE => {
                    let values = fixed::<3, A::Error>(fields::SCALE, map.next_value()?)?;
                    let value = Vec3::from_array(values);
                    set_once::<_, A::Error>(&mut scale, value, fields::SCALE)?;
                }
                fields::TRANSLATION => {
                    let values = fixed::<3, A::Error>(fields::TRANSLATION, map.next_value()?)?;
                    let value = Vec3::from_array(values);
                    set_once::<_, A::Error>(&mut translation, value, fields::TRANSLATION)?;
                }
                fields::WEIGHTS => {
                    set_once::<_, A::Error>(&mut weights, map.next_value()?, fields::WEIGHTS)?;
                }
                _ => {
                    let value: Value = map.next_value()?;
                    tracing::debug!(property = %key, "keeping unrecognized node property");
                    if node.properties.insert(key, value).is_some() {
                        tracing::debug!("repeated unrecognized property, keeping the last value");
                    }
                }
            }
        }

        node.camera = camera;
        node.children = children.unwrap_or_default();
        node.skin = skin;
        node.mesh = mesh;
        node.weights = weights.unwrap_or_default();

        node.transform = if translation.is_some() || rotation.is_some() || scale.is_some() {
            if matrix.is_some() {
                tracing::warn!("node has both `matrix` and TRS properties, keeping TRS");
            }
            Transform::Decomposed(Trs {
                translation: translation.unwrap_or(Vec3::ZERO),
                rotation: rotation.unwrap_or(Quat::IDENTITY),
                scale: scale.unwrap_or(Vec3::ONE),
            })
        } else {
            Transform::Matrix(matrix.unwrap_or(Mat4::IDENTITY))
        };

        Ok(node)
    }
}
