//! Topology kinds, handles, and the in-memory mesh entities.
//!
//! Every topology stored in a UGRID file is one of five kinds. Within a
//! file a topology is addressed by its kind plus a 0-based [`TopologyId`],
//! assigned in definition order and stable for the file's lifetime. The
//! entity structs here are plain transient data records: they are
//! materialized by `*_get`, and persisted by `*_define` followed by
//! `*_put`. Nothing is mutated in place on disk.

pub mod contacts;
pub mod mesh1d;
pub mod mesh2d;
pub mod mesh3d;
pub mod network1d;

pub use contacts::Contacts;
pub use mesh1d::Mesh1d;
pub use mesh2d::Mesh2d;
pub use mesh3d::Mesh3d;
pub use network1d::Network1d;

use std::fmt;

/// The five topology kinds of the UGRID convention.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum TopologyKind {
    /// 1D network of branches between nodes.
    Network1d,
    /// 1D mesh discretizing the branches of a network.
    Mesh1d,
    /// 2D unstructured mesh of nodes, edges, and faces.
    Mesh2d,
    /// 3D unstructured mesh of nodes, edges, faces, and volumes.
    Mesh3d,
    /// Contact links between two other topologies.
    Contacts,
}

impl TopologyKind {
    /// All kinds, in catalog declaration order.
    pub const ALL: [TopologyKind; 5] = [
        TopologyKind::Network1d,
        TopologyKind::Mesh1d,
        TopologyKind::Mesh2d,
        TopologyKind::Mesh3d,
        TopologyKind::Contacts,
    ];
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TopologyKind::Network1d => "network1d",
            TopologyKind::Mesh1d => "mesh1d",
            TopologyKind::Mesh2d => "mesh2d",
            TopologyKind::Mesh3d => "mesh3d",
            TopologyKind::Contacts => "contacts",
        };
        f.write_str(s)
    }
}

/// 0-based index of a topology within a file, scoped per kind.
///
/// Ids are assigned monotonically in definition order and never reused
/// within a file. `repr(transparent)` keeps the handle ABI-identical to a
/// bare `u32`.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct TopologyId(u32);

impl TopologyId {
    /// Wraps a raw 0-based index.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        TopologyId(raw)
    }

    /// Returns the raw index.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the index widened for slice addressing.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TopologyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TopologyId").field(&self.0).finish()
    }
}

impl fmt::Display for TopologyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mesh location a contact endpoint attaches to.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Location {
    /// Attached to a node.
    #[default]
    Node,
    /// Attached to an edge.
    Edge,
    /// Attached to a face.
    Face,
}

impl Location {
    /// Parses the lowercase location token used in contact attributes.
    pub fn parse(s: &str) -> Option<Location> {
        match s {
            "node" => Some(Location::Node),
            "edge" => Some(Location::Edge),
            "face" => Some(Location::Face),
            _ => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Location::Node => "node",
            Location::Edge => "edge",
            Location::Face => "face",
        };
        f.write_str(s)
    }
}

/// Dimension sizes of one topology, as reported by inquiry.
///
/// Fields a kind does not use stay zero. These counts are all a caller
/// needs to size buffers before a bulk read, and all `define` freezes for
/// later `put` validation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TopologyCounts {
    /// Number of nodes.
    pub num_nodes: usize,
    /// Number of edges (network branches count as edges).
    pub num_edges: usize,
    /// Number of faces.
    pub num_faces: usize,
    /// Number of volumes (3D meshes only).
    pub num_volumes: usize,
    /// Number of geometry nodes (1D networks only).
    pub num_geometry_nodes: usize,
    /// Number of contact links (contact topologies only).
    pub num_contacts: usize,
    /// Width of the jagged face-node table.
    pub max_face_nodes: usize,
    /// Width of the jagged volume-face table (3D meshes only).
    pub max_volume_faces: usize,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_is_lowercase() {
        assert_eq!(TopologyKind::Network1d.to_string(), "network1d");
        assert_eq!(TopologyKind::Contacts.to_string(), "contacts");
    }

    #[test]
    fn id_debug_and_display() {
        let id = TopologyId::new(2);
        assert_eq!(format!("{id:?}"), "TopologyId(2)");
        assert_eq!(id.to_string(), "2");
        assert_eq!(id.index(), 2);
    }

    #[test]
    fn location_parse_round_trip() {
        for loc in [Location::Node, Location::Edge, Location::Face] {
            assert_eq!(Location::parse(&loc.to_string()), Some(loc));
        }
        assert_eq!(Location::parse("volume"), None);
    }
}
