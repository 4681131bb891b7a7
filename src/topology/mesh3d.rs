//! 3D unstructured mesh topology: volumes bounded by jagged face lists.

use itertools::Itertools;

use crate::attrs::FILL_VALUE;
use crate::error::UgridError;
use crate::topology::TopologyCounts;

/// A 3D unstructured mesh.
///
/// Both jagged tables are flattened row-major with [`FILL_VALUE`] padding:
/// `face_node` is `num_faces * max_face_nodes`, `volume_face` is
/// `num_volumes * max_volume_faces`. Unlike the 2D case there are no face
/// center coordinates to derive the row count from, so the two widths are
/// explicit fields.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Mesh3d {
    /// Topology name; prefixes every derived variable and dimension name.
    pub name: String,
    /// Node x coordinates.
    pub node_x: Vec<f64>,
    /// Node y coordinates.
    pub node_y: Vec<f64>,
    /// Node z coordinates.
    pub node_z: Vec<f64>,
    /// Edge endpoints as flat ordered pairs, `2 * num_edges` long.
    pub edge_node: Vec<i64>,
    /// Fill-padded face-node table, `num_faces * max_face_nodes` long.
    pub face_node: Vec<i64>,
    /// Width of the face-node table.
    pub max_face_nodes: usize,
    /// Fill-padded volume-face table, `num_volumes * max_volume_faces` long.
    pub volume_face: Vec<i64>,
    /// Width of the volume-face table.
    pub max_volume_faces: usize,
    /// Whether coordinates are spherical (lon/lat) rather than projected.
    pub is_spherical: bool,
    /// Base of the connectivity indices, 0 or 1.
    pub start_index: i64,
}

impl Mesh3d {
    /// Dimension sizes derived from the entity's arrays.
    pub fn counts(&self) -> TopologyCounts {
        TopologyCounts {
            num_nodes: self.node_x.len(),
            num_edges: self.edge_node.len() / 2,
            num_faces: if self.max_face_nodes > 0 {
                self.face_node.len() / self.max_face_nodes
            } else {
                0
            },
            num_volumes: if self.max_volume_faces > 0 {
                self.volume_face.len() / self.max_volume_faces
            } else {
                0
            },
            max_face_nodes: self.max_face_nodes,
            max_volume_faces: self.max_volume_faces,
            ..TopologyCounts::default()
        }
    }

    /// Checks the entity's internal shape invariants.
    pub fn validate(&self) -> Result<(), UgridError> {
        let n = self.node_x.len();
        for (what, len) in [("node_y", self.node_y.len()), ("node_z", self.node_z.len())] {
            if len != n {
                return Err(UgridError::InconsistentDimensions(format!(
                    "{what} has {len} entries, expected num_nodes {n}"
                )));
            }
        }
        if self.edge_node.len() % 2 != 0 {
            return Err(UgridError::InconsistentDimensions(format!(
                "edge_node holds {} entries, expected flat pairs",
                self.edge_node.len()
            )));
        }
        for (what, len, width) in [
            ("face_node", self.face_node.len(), self.max_face_nodes),
            ("volume_face", self.volume_face.len(), self.max_volume_faces),
        ] {
            if width == 0 {
                if len != 0 {
                    return Err(UgridError::InconsistentDimensions(format!(
                        "{what} holds {len} entries but its table width is zero"
                    )));
                }
            } else if len % width != 0 {
                return Err(UgridError::InconsistentDimensions(format!(
                    "{what} length {len} is not a multiple of its table width {width}"
                )));
            }
        }
        for (a, b) in self.edge_node.iter().tuples() {
            for v in [*a, *b] {
                let idx = v - self.start_index;
                if idx < 0 || idx >= n as i64 {
                    return Err(UgridError::InconsistentDimensions(format!(
                        "edge_node index {v} out of range for {n} nodes (start index {})",
                        self.start_index
                    )));
                }
            }
        }
        for &v in self.face_node.iter().filter(|&&v| v != FILL_VALUE) {
            let idx = v - self.start_index;
            if idx < 0 || idx >= n as i64 {
                return Err(UgridError::InconsistentDimensions(format!(
                    "face_node index {v} out of range for {n} nodes (start index {})",
                    self.start_index
                )));
            }
        }
        let faces = self.counts().num_faces as i64;
        for &v in self.volume_face.iter().filter(|&&v| v != FILL_VALUE) {
            let idx = v - self.start_index;
            if idx < 0 || idx >= faces {
                return Err(UgridError::InconsistentDimensions(format!(
                    "volume_face index {v} out of range for {faces} faces (start index {})",
                    self.start_index
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> Mesh3d {
        Mesh3d {
            name: "mesh3d".into(),
            node_x: vec![0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0],
            node_y: vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0],
            node_z: vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0],
            edge_node: vec![
                0, 1, 1, 2, 2, 3, 3, 0, 4, 5, 5, 6, 6, 7, 7, 4, 0, 4, 1, 5, 2, 6, 3, 7,
            ],
            face_node: vec![
                0, 1, 2, 3, 4, 5, 6, 7, 0, 1, 5, 4, 1, 2, 6, 5, 2, 3, 7, 6, 3, 0, 4, 7,
            ],
            max_face_nodes: 4,
            volume_face: vec![0, 1, 2, 3, 4, 5],
            max_volume_faces: 6,
            is_spherical: false,
            start_index: 0,
        }
    }

    #[test]
    fn counts_follow_arrays() {
        let c = unit_cube().counts();
        assert_eq!(c.num_nodes, 8);
        assert_eq!(c.num_edges, 12);
        assert_eq!(c.num_faces, 6);
        assert_eq!(c.num_volumes, 1);
        assert_eq!(c.max_volume_faces, 6);
    }

    #[test]
    fn validate_accepts_cube() {
        assert!(unit_cube().validate().is_ok());
    }

    #[test]
    fn validate_rejects_ragged_table() {
        let mut m = unit_cube();
        m.face_node.pop();
        assert!(matches!(
            m.validate(),
            Err(UgridError::InconsistentDimensions(_))
        ));
    }

    #[test]
    fn validate_rejects_volume_face_out_of_range() {
        let mut m = unit_cube();
        m.volume_face[5] = 6;
        assert!(matches!(
            m.validate(),
            Err(UgridError::InconsistentDimensions(_))
        ));
    }
}
