//! Attribute Catalog: the static registry of UGRID metadata per topology
//! kind.
//!
//! For each kind the catalog declares the attribute names carried by the
//! topology variable, in a fixed declaration order, and derives the
//! matching values from a topology's configured name. Values are never
//! stored separately: recomputing them from a definition is bit-identical
//! to what a round trip reads back, which is what makes the schema surface
//! deterministic. The inverse direction, [`classify`], maps a file
//! variable's attributes back onto a [`TopologyKind`].

use crate::error::UgridError;
use crate::store::{AttrValue, MeshStore};
use crate::topology::{Location, TopologyKind};

/// Fixed width of short id strings.
pub const NAME_LENGTH: usize = 40;
/// Fixed width of long descriptive name strings.
pub const NAME_LONG_LENGTH: usize = 80;
/// Sentinel marking unused slots in fill-padded jagged connectivity.
pub const FILL_VALUE: i64 = -999;
/// Fill value reported for defined-but-unwritten floating point data.
pub const DOUBLE_FILL: f64 = -999.0;

/// File-global dimension name for the short-string width.
pub const ID_LENGTH_DIM: &str = "idstrlength";
/// File-global dimension name for the long-string width.
pub const LONG_LENGTH_DIM: &str = "longstrlength";
/// File-global dimension name for connectivity pair columns.
pub const TWO_DIM: &str = "Two";

/// `cf_role` value of mesh and network topology variables.
pub const CF_ROLE_MESH: &str = "mesh_topology";
/// `cf_role` value of contact topology variables.
pub const CF_ROLE_CONTACT: &str = "mesh_topology_contact";

const NETWORK1D_ATTRS: [&str; 9] = [
    "cf_role",
    "edge_dimension",
    "edge_geometry",
    "edge_length",
    "edge_node_connectivity",
    "long_name",
    "node_coordinates",
    "node_dimension",
    "topology_dimension",
];

const MESH1D_ATTRS: [&str; 8] = [
    "cf_role",
    "coordinate_space",
    "edge_dimension",
    "edge_node_connectivity",
    "long_name",
    "node_coordinates",
    "node_dimension",
    "topology_dimension",
];

const MESH2D_ATTRS: [&str; 12] = [
    "cf_role",
    "edge_coordinates",
    "edge_dimension",
    "edge_node_connectivity",
    "face_coordinates",
    "face_dimension",
    "face_node_connectivity",
    "long_name",
    "max_face_nodes_dimension",
    "node_coordinates",
    "node_dimension",
    "topology_dimension",
];

const MESH3D_ATTRS: [&str; 13] = [
    "cf_role",
    "edge_dimension",
    "edge_node_connectivity",
    "face_dimension",
    "face_node_connectivity",
    "long_name",
    "max_face_nodes_dimension",
    "max_volume_faces_dimension",
    "node_coordinates",
    "node_dimension",
    "topology_dimension",
    "volume_dimension",
    "volume_face_connectivity",
];

const CONTACTS_ATTRS: [&str; 7] = [
    "cf_role",
    "contact",
    "contact_dimension",
    "contact_id",
    "contact_long_name",
    "contact_type",
    "long_name",
];

/// Attribute names for a topology kind, in declaration order.
///
/// Retrieval order of attribute values follows this order exactly; callers
/// relying on positions must use the same catalog.
pub fn attribute_names(kind: TopologyKind) -> &'static [&'static str] {
    match kind {
        TopologyKind::Network1d => &NETWORK1D_ATTRS,
        TopologyKind::Mesh1d => &MESH1D_ATTRS,
        TopologyKind::Mesh2d => &MESH2D_ATTRS,
        TopologyKind::Mesh3d => &MESH3D_ATTRS,
        TopologyKind::Contacts => &CONTACTS_ATTRS,
    }
}

/// Attribute values for a Network1d named `name`, index-aligned with
/// [`attribute_names`].
pub fn network1d_values(name: &str) -> Vec<String> {
    vec![
        CF_ROLE_MESH.to_string(),
        format!("{name}_nEdges"),
        format!("{name}_geometry"),
        format!("{name}_edge_length"),
        format!("{name}_edge_nodes"),
        "Topology data of 1D network".to_string(),
        format!("{name}_node_x {name}_node_y"),
        format!("{name}_nNodes"),
        "1".to_string(),
    ]
}

/// Attribute values for a Mesh1d named `name` on network `network_name`.
pub fn mesh1d_values(name: &str, network_name: &str) -> Vec<String> {
    vec![
        CF_ROLE_MESH.to_string(),
        network_name.to_string(),
        format!("{name}_nEdges"),
        format!("{name}_edge_nodes"),
        "Topology data of 1D mesh".to_string(),
        format!("{name}_node_x {name}_node_y"),
        format!("{name}_nNodes"),
        "1".to_string(),
    ]
}

/// Attribute values for a Mesh2d named `name`.
pub fn mesh2d_values(name: &str) -> Vec<String> {
    vec![
        CF_ROLE_MESH.to_string(),
        format!("{name}_edge_x {name}_edge_y"),
        format!("{name}_nEdges"),
        format!("{name}_edge_nodes"),
        format!("{name}_face_x {name}_face_y"),
        format!("{name}_nFaces"),
        format!("{name}_face_nodes"),
        "Topology data of 2D mesh".to_string(),
        format!("{name}_nMax_face_nodes"),
        format!("{name}_node_x {name}_node_y"),
        format!("{name}_nNodes"),
        "2".to_string(),
    ]
}

/// Attribute values for a Mesh3d named `name`.
pub fn mesh3d_values(name: &str) -> Vec<String> {
    vec![
        CF_ROLE_MESH.to_string(),
        format!("{name}_nEdges"),
        format!("{name}_edge_nodes"),
        format!("{name}_nFaces"),
        format!("{name}_face_nodes"),
        "Topology data of 3D mesh".to_string(),
        format!("{name}_nMax_face_nodes"),
        format!("{name}_nMax_volume_faces"),
        format!("{name}_node_x {name}_node_y {name}_node_z"),
        format!("{name}_nNodes"),
        "3".to_string(),
        format!("{name}_nVolumes"),
        format!("{name}_volume_faces"),
    ]
}

/// Attribute values for a contact topology named `name` linking
/// `mesh_from` at `from_location` to `mesh_to` at `to_location`.
pub fn contacts_values(
    name: &str,
    mesh_from: &str,
    from_location: Location,
    mesh_to: &str,
    to_location: Location,
) -> Vec<String> {
    vec![
        CF_ROLE_CONTACT.to_string(),
        format!("{mesh_from}: {from_location} {mesh_to}: {to_location}"),
        format!("{name}_nContacts"),
        format!("{name}_id"),
        format!("{name}_long_name"),
        format!("{name}_contact_type"),
        "Topology data of contacts".to_string(),
    ]
}

/// Attributes of the geometry container variable of a Network1d.
///
/// The container follows the CF geometry convention: it names the
/// polyline coordinate variables and the per-branch node counts.
pub fn network1d_geometry_attrs(name: &str) -> Vec<(&'static str, String)> {
    vec![
        ("geometry_type", "line".to_string()),
        ("node_count", format!("{name}_geom_node_count")),
        ("node_coordinates", format!("{name}_geom_x {name}_geom_y")),
    ]
}

/// Classifies a file variable by its UGRID role attributes.
///
/// Returns `Ok(None)` for ordinary data variables (no `cf_role`), and
/// fails with [`UgridError::UnknownTopologyKind`] when a `cf_role` is
/// present but does not describe any registered kind.
pub fn classify<S: MeshStore>(store: &S, var: &str) -> Result<Option<TopologyKind>, UgridError> {
    let Some(role) = store.get_attr(var, "cf_role")? else {
        return Ok(None);
    };
    let role = match role {
        AttrValue::Text(s) => s,
        AttrValue::Int(v) => {
            return Err(UgridError::UnknownTopologyKind {
                var: var.to_string(),
                reason: format!("cf_role is numeric ({v})"),
            });
        }
    };
    if role == CF_ROLE_CONTACT {
        return Ok(Some(TopologyKind::Contacts));
    }
    if role != CF_ROLE_MESH {
        return Err(UgridError::UnknownTopologyKind {
            var: var.to_string(),
            reason: format!("unrecognized cf_role `{role}`"),
        });
    }
    let dim = store
        .get_attr(var, "topology_dimension")?
        .ok_or_else(|| UgridError::UnknownTopologyKind {
            var: var.to_string(),
            reason: "missing topology_dimension".into(),
        })?;
    let dim = match dim {
        AttrValue::Text(s) => s.parse::<i64>().map_err(|_| UgridError::UnknownTopologyKind {
            var: var.to_string(),
            reason: format!("unparseable topology_dimension `{s}`"),
        })?,
        AttrValue::Int(v) => v,
    };
    match dim {
        1 => {
            // Networks carry a geometry container; plain 1D meshes do not.
            if store.get_attr(var, "edge_geometry")?.is_some() {
                Ok(Some(TopologyKind::Network1d))
            } else {
                Ok(Some(TopologyKind::Mesh1d))
            }
        }
        2 => Ok(Some(TopologyKind::Mesh2d)),
        3 => Ok(Some(TopologyKind::Mesh3d)),
        other => Err(UgridError::UnknownTopologyKind {
            var: var.to_string(),
            reason: format!("unsupported topology_dimension {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, VarType};

    #[test]
    fn mesh2d_catalog_is_bit_exact() {
        assert_eq!(
            attribute_names(TopologyKind::Mesh2d),
            &[
                "cf_role",
                "edge_coordinates",
                "edge_dimension",
                "edge_node_connectivity",
                "face_coordinates",
                "face_dimension",
                "face_node_connectivity",
                "long_name",
                "max_face_nodes_dimension",
                "node_coordinates",
                "node_dimension",
                "topology_dimension",
            ]
        );
        assert_eq!(
            mesh2d_values("mesh2d"),
            vec![
                "mesh_topology",
                "mesh2d_edge_x mesh2d_edge_y",
                "mesh2d_nEdges",
                "mesh2d_edge_nodes",
                "mesh2d_face_x mesh2d_face_y",
                "mesh2d_nFaces",
                "mesh2d_face_nodes",
                "Topology data of 2D mesh",
                "mesh2d_nMax_face_nodes",
                "mesh2d_node_x mesh2d_node_y",
                "mesh2d_nNodes",
                "2",
            ]
        );
    }

    #[test]
    fn names_and_values_stay_index_aligned() {
        assert_eq!(
            attribute_names(TopologyKind::Network1d).len(),
            network1d_values("n").len()
        );
        assert_eq!(
            attribute_names(TopologyKind::Mesh1d).len(),
            mesh1d_values("m", "n").len()
        );
        assert_eq!(
            attribute_names(TopologyKind::Mesh2d).len(),
            mesh2d_values("m").len()
        );
        assert_eq!(
            attribute_names(TopologyKind::Mesh3d).len(),
            mesh3d_values("m").len()
        );
        assert_eq!(
            attribute_names(TopologyKind::Contacts).len(),
            contacts_values("c", "a", Location::Node, "b", Location::Face).len()
        );
    }

    #[test]
    fn values_are_deterministic() {
        assert_eq!(mesh2d_values("mesh2d"), mesh2d_values("mesh2d"));
        assert_eq!(
            contacts_values("c", "mesh1d", Location::Node, "mesh2d", Location::Face)[1],
            "mesh1d: node mesh2d: face"
        );
    }

    #[test]
    fn classify_reads_role_attributes() {
        let mut store = InMemoryStore::new();
        store.def_var("mesh2d", VarType::Int, &[]).unwrap();
        store
            .put_attr("mesh2d", "cf_role", AttrValue::Text(CF_ROLE_MESH.into()))
            .unwrap();
        store
            .put_attr("mesh2d", "topology_dimension", AttrValue::Int(2))
            .unwrap();
        assert_eq!(
            classify(&store, "mesh2d").unwrap(),
            Some(TopologyKind::Mesh2d)
        );

        store.def_var("plain", VarType::Double, &[]).unwrap();
        assert_eq!(classify(&store, "plain").unwrap(), None);
    }

    #[test]
    fn classify_splits_network_from_mesh1d() {
        let mut store = InMemoryStore::new();
        for (var, geometry) in [("network1d", true), ("mesh1d", false)] {
            store.def_var(var, VarType::Int, &[]).unwrap();
            store
                .put_attr(var, "cf_role", AttrValue::Text(CF_ROLE_MESH.into()))
                .unwrap();
            store
                .put_attr(var, "topology_dimension", AttrValue::Int(1))
                .unwrap();
            if geometry {
                store
                    .put_attr(
                        var,
                        "edge_geometry",
                        AttrValue::Text("network1d_geometry".into()),
                    )
                    .unwrap();
            }
        }
        assert_eq!(
            classify(&store, "network1d").unwrap(),
            Some(TopologyKind::Network1d)
        );
        assert_eq!(
            classify(&store, "mesh1d").unwrap(),
            Some(TopologyKind::Mesh1d)
        );
    }

    #[test]
    fn classify_rejects_unknown_roles() {
        let mut store = InMemoryStore::new();
        store.def_var("odd", VarType::Int, &[]).unwrap();
        store
            .put_attr("odd", "cf_role", AttrValue::Text("timeseries_id".into()))
            .unwrap();
        assert!(matches!(
            classify(&store, "odd"),
            Err(UgridError::UnknownTopologyKind { .. })
        ));
    }
}
