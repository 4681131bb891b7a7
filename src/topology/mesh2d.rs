//! 2D unstructured mesh topology: nodes, edges, and fill-padded jagged
//! face-node connectivity.

use itertools::Itertools;

use crate::attrs::FILL_VALUE;
use crate::error::UgridError;
use crate::topology::TopologyCounts;

/// A 2D unstructured mesh.
///
/// `face_node` is the jagged connectivity table flattened row-major to
/// `num_faces * max_face_nodes`, with unused trailing slots holding
/// [`FILL_VALUE`]. The codec preserves the padding verbatim in both
/// directions. `edge_x`/`edge_y` are optional: either empty or one entry
/// per edge.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Mesh2d {
    /// Topology name; prefixes every derived variable and dimension name.
    pub name: String,
    /// Node x coordinates.
    pub node_x: Vec<f64>,
    /// Node y coordinates.
    pub node_y: Vec<f64>,
    /// Edge endpoints as flat ordered pairs, `2 * num_edges` long.
    pub edge_node: Vec<i64>,
    /// Optional edge midpoint x coordinates.
    pub edge_x: Vec<f64>,
    /// Optional edge midpoint y coordinates.
    pub edge_y: Vec<f64>,
    /// Face center x coordinates.
    pub face_x: Vec<f64>,
    /// Face center y coordinates.
    pub face_y: Vec<f64>,
    /// Fill-padded face-node table, `num_faces * max_face_nodes` long.
    pub face_node: Vec<i64>,
    /// Whether coordinates are spherical (lon/lat) rather than projected.
    pub is_spherical: bool,
    /// Base of the connectivity indices, 0 or 1.
    pub start_index: i64,
}

impl Mesh2d {
    /// Dimension sizes derived from the entity's arrays.
    pub fn counts(&self) -> TopologyCounts {
        let num_faces = self.face_x.len();
        TopologyCounts {
            num_nodes: self.node_x.len(),
            num_edges: self.edge_node.len() / 2,
            num_faces,
            max_face_nodes: if num_faces > 0 {
                self.face_node.len() / num_faces
            } else {
                0
            },
            ..TopologyCounts::default()
        }
    }

    /// Checks the entity's internal shape invariants.
    pub fn validate(&self) -> Result<(), UgridError> {
        let n = self.node_x.len();
        if self.node_y.len() != n {
            return Err(UgridError::InconsistentDimensions(format!(
                "node_x has {n} entries, node_y has {}",
                self.node_y.len()
            )));
        }
        if self.edge_node.len() % 2 != 0 {
            return Err(UgridError::InconsistentDimensions(format!(
                "edge_node holds {} entries, expected flat pairs",
                self.edge_node.len()
            )));
        }
        let edges = self.edge_node.len() / 2;
        if self.edge_y.len() != self.edge_x.len() {
            return Err(UgridError::InconsistentDimensions(format!(
                "edge_x has {} entries, edge_y has {}",
                self.edge_x.len(),
                self.edge_y.len()
            )));
        }
        if !self.edge_x.is_empty() && self.edge_x.len() != edges {
            return Err(UgridError::InconsistentDimensions(format!(
                "edge_x has {} entries, expected 0 or num_edges {edges}",
                self.edge_x.len()
            )));
        }
        if self.face_y.len() != self.face_x.len() {
            return Err(UgridError::InconsistentDimensions(format!(
                "face_x has {} entries, face_y has {}",
                self.face_x.len(),
                self.face_y.len()
            )));
        }
        let faces = self.face_x.len();
        if faces == 0 {
            if !self.face_node.is_empty() {
                return Err(UgridError::InconsistentDimensions(format!(
                    "face_node holds {} entries but the mesh has no faces",
                    self.face_node.len()
                )));
            }
        } else if self.face_node.len() % faces != 0 {
            return Err(UgridError::InconsistentDimensions(format!(
                "face_node length {} is not a multiple of num_faces {faces}",
                self.face_node.len()
            )));
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
        Ok(())
    }
}
