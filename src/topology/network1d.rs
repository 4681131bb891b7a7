//! 1D network topology: nodes joined by named branches, each branch
//! carrying a geometry polyline.

use itertools::Itertools;

use crate::error::UgridError;
use crate::topology::TopologyCounts;

/// A 1D network: named nodes, named branches, and per-branch geometry.
///
/// Connectivity indices are stored verbatim under the entity's
/// `start_index` convention; no rebasing happens anywhere in the crate.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Network1d {
    /// Topology name; prefixes every derived variable and dimension name.
    pub name: String,
    /// Node x coordinates.
    pub node_x: Vec<f64>,
    /// Node y coordinates.
    pub node_y: Vec<f64>,
    /// Short node ids, one per node.
    pub node_name_id: Vec<String>,
    /// Long descriptive node names, one per node.
    pub node_name_long: Vec<String>,
    /// Branch endpoints as flat ordered pairs, `2 * num_branches` long.
    pub branch_node: Vec<i64>,
    /// Branch lengths, one per branch.
    pub branch_length: Vec<f64>,
    /// Branch ordering hints, one per branch.
    pub branch_order: Vec<i64>,
    /// Short branch ids, one per branch.
    pub branch_name_id: Vec<String>,
    /// Long descriptive branch names, one per branch.
    pub branch_name_long: Vec<String>,
    /// Geometry polyline x coordinates for all branches, concatenated.
    pub geometry_node_x: Vec<f64>,
    /// Geometry polyline y coordinates for all branches, concatenated.
    pub geometry_node_y: Vec<f64>,
    /// Geometry node count per branch; sums to the geometry node total.
    pub geometry_node_count: Vec<i64>,
    /// Whether coordinates are spherical (lon/lat) rather than projected.
    pub is_spherical: bool,
    /// Base of the connectivity indices, 0 or 1.
    pub start_index: i64,
}

impl Network1d {
    /// Dimension sizes derived from the entity's arrays.
    pub fn counts(&self) -> TopologyCounts {
        TopologyCounts {
            num_nodes: self.node_x.len(),
            num_edges: self.branch_node.len() / 2,
            num_geometry_nodes: self.geometry_node_x.len(),
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
        if self.node_name_id.len() != n || self.node_name_long.len() != n {
            return Err(UgridError::InconsistentDimensions(format!(
                "node names must match num_nodes {n}: id {}, long {}",
                self.node_name_id.len(),
                self.node_name_long.len()
            )));
        }
        if self.branch_node.len() % 2 != 0 {
            return Err(UgridError::InconsistentDimensions(format!(
                "branch_node holds {} entries, expected flat pairs",
                self.branch_node.len()
            )));
        }
        let branches = self.branch_node.len() / 2;
        for (what, len) in [
            ("branch_length", self.branch_length.len()),
            ("branch_order", self.branch_order.len()),
            ("branch_name_id", self.branch_name_id.len()),
            ("branch_name_long", self.branch_name_long.len()),
            ("geometry_node_count", self.geometry_node_count.len()),
        ] {
            if len != branches {
                return Err(UgridError::InconsistentDimensions(format!(
                    "{what} has {len} entries, expected num_branches {branches}"
                )));
            }
        }
        if self.geometry_node_y.len() != self.geometry_node_x.len() {
            return Err(UgridError::InconsistentDimensions(format!(
                "geometry_node_x has {} entries, geometry_node_y has {}",
                self.geometry_node_x.len(),
                self.geometry_node_y.len()
            )));
        }
        let geometry_total: i64 = self.geometry_node_count.iter().sum();
        if geometry_total != self.geometry_node_x.len() as i64 {
            return Err(UgridError::InconsistentDimensions(format!(
                "geometry_node_count sums to {geometry_total}, but {} geometry nodes are present",
                self.geometry_node_x.len()
            )));
        }
        for (a, b) in self.branch_node.iter().tuples() {
            for v in [*a, *b] {
                let idx = v - self.start_index;
                if idx < 0 || idx >= n as i64 {
                    return Err(UgridError::InconsistentDimensions(format!(
                        "branch_node index {v} out of range for {n} nodes (start index {})",
                        self.start_index
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_network() -> Network1d {
        Network1d {
            name: "network1d".into(),
            node_x: vec![293.78, 538.89],
            node_y: vec![27.48, 956.75],
            node_name_id: vec!["nodesids".into(), "nodesids".into()],
            node_name_long: vec!["nodeslongNames".into(), "nodeslongNames".into()],
            branch_node: vec![0, 1],
            branch_length: vec![1165.29],
            branch_order: vec![0],
            branch_name_id: vec!["branchids".into()],
            branch_name_long: vec!["branchlongNames".into()],
            geometry_node_x: vec![293.78, 538.89],
            geometry_node_y: vec![27.48, 956.75],
            geometry_node_count: vec![2],
            is_spherical: false,
            start_index: 0,
        }
    }

    #[test]
    fn counts_follow_arrays() {
        let n = two_node_network();
        let c = n.counts();
        assert_eq!(c.num_nodes, 2);
        assert_eq!(c.num_edges, 1);
        assert_eq!(c.num_geometry_nodes, 2);
        assert_eq!(c.num_faces, 0);
    }

    #[test]
    fn validate_accepts_consistent_network() {
        assert!(two_node_network().validate().is_ok());
    }

    #[test]
    fn validate_rejects_name_count_drift() {
        let mut n = two_node_network();
        n.node_name_id.pop();
        assert!(matches!(
            n.validate(),
            Err(UgridError::InconsistentDimensions(_))
        ));
    }

    #[test]
    fn validate_rejects_geometry_count_drift() {
        let mut n = two_node_network();
        n.geometry_node_count = vec![3];
        assert!(matches!(
            n.validate(),
            Err(UgridError::InconsistentDimensions(_))
        ));
    }

    #[test]
    fn validate_honors_start_index() {
        let mut n = two_node_network();
        n.branch_node = vec![1, 2];
        assert!(n.validate().is_err());
        n.start_index = 1;
        assert!(n.validate().is_ok());
    }
}
