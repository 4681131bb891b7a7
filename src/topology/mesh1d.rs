//! 1D mesh topology: computational points placed along the branches of a
//! [`Network1d`](crate::topology::Network1d).

use itertools::Itertools;

use crate::error::UgridError;
use crate::topology::TopologyCounts;

/// A 1D mesh discretizing a named network.
///
/// `network_name` must reference a Network1d topology in the same file.
/// That cross-reference is a caller responsibility; neither the codec nor
/// the definition path resolves it.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Mesh1d {
    /// Topology name; prefixes every derived variable and dimension name.
    pub name: String,
    /// Name of the owning Network1d topology.
    pub network_name: String,
    /// Node x coordinates.
    pub node_x: Vec<f64>,
    /// Node y coordinates.
    pub node_y: Vec<f64>,
    /// Owning branch index per node.
    pub branch_id: Vec<i64>,
    /// Chainage along the owning branch per node.
    pub branch_offset: Vec<f64>,
    /// Short node ids, one per node.
    pub node_name_id: Vec<String>,
    /// Long descriptive node names, one per node.
    pub node_name_long: Vec<String>,
    /// Edge endpoints as flat ordered pairs, `2 * num_edges` long.
    pub edge_node: Vec<i64>,
    /// Whether coordinates are spherical (lon/lat) rather than projected.
    pub is_spherical: bool,
    /// Base of the connectivity indices, 0 or 1.
    pub start_index: i64,
}

impl Mesh1d {
    /// Dimension sizes derived from the entity's arrays.
    pub fn counts(&self) -> TopologyCounts {
        TopologyCounts {
            num_nodes: self.node_x.len(),
            num_edges: self.edge_node.len() / 2,
            ..TopologyCounts::default()
        }
    }

    /// Checks the entity's internal shape invariants.
    pub fn validate(&self) -> Result<(), UgridError> {
        let n = self.node_x.len();
        for (what, len) in [
            ("node_y", self.node_y.len()),
            ("branch_id", self.branch_id.len()),
            ("branch_offset", self.branch_offset.len()),
            ("node_name_id", self.node_name_id.len()),
            ("node_name_long", self.node_name_long.len()),
        ] {
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
        Ok(())
    }
}
