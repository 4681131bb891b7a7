//! Topology entity codec: between structured entities and the flat,
//! per-variable buffers the storage boundary moves.
//!
//! Decoding sizes every buffer from the inquiry counts, issues the bulk
//! reads, and rebuilds the entity: fixed-width name tables go through the
//! name codec, coordinates and connectivity are copied verbatim (index
//! base and fill sentinels untouched), the spherical flag comes from the
//! x-coordinate units. Encoding is the inverse: it validates the entity
//! first and fails with `InconsistentDimensions` rather than write a
//! half-consistent topology. Optional sub-arrays with zero instances stay
//! empty sequences in both directions.

use crate::attrs::{NAME_LENGTH, NAME_LONG_LENGTH};
use crate::codec::names::{decode_fixed_strings, encode_fixed_strings};
use crate::codec::schema::{
    ContactsSchema, Mesh1dSchema, Mesh2dSchema, Mesh3dSchema, Network1dSchema,
};
use crate::error::UgridError;
use crate::store::{MeshStore, VarData};
use crate::topology::{Contacts, Mesh1d, Mesh2d, Mesh3d, Network1d, TopologyCounts};

/// One encoded variable, ready for a bulk write.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedVar {
    /// Target variable name.
    pub var: String,
    /// Typed flat payload.
    pub data: VarData,
}

impl EncodedVar {
    fn doubles(var: impl Into<String>, data: &[f64]) -> Self {
        EncodedVar {
            var: var.into(),
            data: VarData::Doubles(data.to_vec()),
        }
    }

    fn ints(var: impl Into<String>, data: &[i64]) -> Self {
        EncodedVar {
            var: var.into(),
            data: VarData::Ints(data.to_vec()),
        }
    }

    fn chars(var: impl Into<String>, data: Vec<u8>) -> Self {
        EncodedVar {
            var: var.into(),
            data: VarData::Chars(data),
        }
    }
}

fn checked_doubles<S: MeshStore>(
    store: &S,
    topo: &str,
    var: &str,
    expected: usize,
) -> Result<Vec<f64>, UgridError> {
    let data = store.read_doubles(var)?;
    if data.len() != expected {
        return Err(UgridError::MalformedSchema {
            var: topo.to_string(),
            reason: format!("variable `{var}` holds {} values, dimensions say {expected}", data.len()),
        });
    }
    Ok(data)
}

fn checked_ints<S: MeshStore>(
    store: &S,
    topo: &str,
    var: &str,
    expected: usize,
) -> Result<Vec<i64>, UgridError> {
    let data = store.read_ints(var)?;
    if data.len() != expected {
        return Err(UgridError::MalformedSchema {
            var: topo.to_string(),
            reason: format!("variable `{var}` holds {} values, dimensions say {expected}", data.len()),
        });
    }
    Ok(data)
}

fn read_names<S: MeshStore>(
    store: &S,
    var: &str,
    count: usize,
    stride: usize,
) -> Result<Vec<String>, UgridError> {
    let raw = store.read_chars(var)?;
    decode_fixed_strings(&raw, count, stride)
}

fn decode_spherical<S: MeshStore>(store: &S, x_var: &str) -> Result<bool, UgridError> {
    let units = store.get_attr(x_var, "units")?;
    Ok(units.and_then(|u| u.as_text().map(|s| s == "degrees_east")) == Some(true))
}

fn decode_start_index<S: MeshStore>(store: &S, conn_var: &str) -> Result<i64, UgridError> {
    Ok(store
        .get_attr(conn_var, "start_index")?
        .and_then(|v| v.as_int())
        .unwrap_or(0))
}

/// Reads a Network1d entity through its schema.
pub fn decode_network1d<S: MeshStore>(
    store: &S,
    schema: &Network1dSchema,
    counts: &TopologyCounts,
) -> Result<Network1d, UgridError> {
    let topo = &schema.name;
    Ok(Network1d {
        name: schema.name.clone(),
        node_x: checked_doubles(store, topo, &schema.node_x, counts.num_nodes)?,
        node_y: checked_doubles(store, topo, &schema.node_y, counts.num_nodes)?,
        node_name_id: read_names(store, &schema.node_id, counts.num_nodes, NAME_LENGTH)?,
        node_name_long: read_names(
            store,
            &schema.node_long_name,
            counts.num_nodes,
            NAME_LONG_LENGTH,
        )?,
        branch_node: checked_ints(store, topo, &schema.edge_nodes, 2 * counts.num_edges)?,
        branch_length: checked_doubles(store, topo, &schema.edge_length, counts.num_edges)?,
        branch_order: checked_ints(store, topo, &schema.branch_order, counts.num_edges)?,
        branch_name_id: read_names(store, &schema.branch_id, counts.num_edges, NAME_LENGTH)?,
        branch_name_long: read_names(
            store,
            &schema.branch_long_name,
            counts.num_edges,
            NAME_LONG_LENGTH,
        )?,
        geometry_node_x: checked_doubles(store, topo, &schema.geom_x, counts.num_geometry_nodes)?,
        geometry_node_y: checked_doubles(store, topo, &schema.geom_y, counts.num_geometry_nodes)?,
        geometry_node_count: checked_ints(store, topo, &schema.geom_node_count, counts.num_edges)?,
        is_spherical: decode_spherical(store, &schema.node_x)?,
        start_index: decode_start_index(store, &schema.edge_nodes)?,
    })
}

/// Encodes a Network1d into per-variable buffers.
pub fn encode_network1d(network: &Network1d) -> Result<Vec<EncodedVar>, UgridError> {
    network.validate()?;
    let schema = Network1dSchema::for_name(&network.name);
    Ok(vec![
        EncodedVar::doubles(schema.node_x, &network.node_x),
        EncodedVar::doubles(schema.node_y, &network.node_y),
        EncodedVar::chars(
            schema.node_id,
            encode_fixed_strings(&network.node_name_id, NAME_LENGTH)?,
        ),
        EncodedVar::chars(
            schema.node_long_name,
            encode_fixed_strings(&network.node_name_long, NAME_LONG_LENGTH)?,
        ),
        EncodedVar::ints(schema.edge_nodes, &network.branch_node),
        EncodedVar::doubles(schema.edge_length, &network.branch_length),
        EncodedVar::ints(schema.branch_order, &network.branch_order),
        EncodedVar::chars(
            schema.branch_id,
            encode_fixed_strings(&network.branch_name_id, NAME_LENGTH)?,
        ),
        EncodedVar::chars(
            schema.branch_long_name,
            encode_fixed_strings(&network.branch_name_long, NAME_LONG_LENGTH)?,
        ),
        EncodedVar::doubles(schema.geom_x, &network.geometry_node_x),
        EncodedVar::doubles(schema.geom_y, &network.geometry_node_y),
        EncodedVar::ints(schema.geom_node_count, &network.geometry_node_count),
    ])
}

/// Reads a Mesh1d entity through its schema.
pub fn decode_mesh1d<S: MeshStore>(
    store: &S,
    schema: &Mesh1dSchema,
    counts: &TopologyCounts,
) -> Result<Mesh1d, UgridError> {
    let topo = &schema.name;
    Ok(Mesh1d {
        name: schema.name.clone(),
        network_name: schema.network_name.clone(),
        node_x: checked_doubles(store, topo, &schema.node_x, counts.num_nodes)?,
        node_y: checked_doubles(store, topo, &schema.node_y, counts.num_nodes)?,
        branch_id: checked_ints(store, topo, &schema.node_branch, counts.num_nodes)?,
        branch_offset: checked_doubles(store, topo, &schema.node_offset, counts.num_nodes)?,
        node_name_id: read_names(store, &schema.node_id, counts.num_nodes, NAME_LENGTH)?,
        node_name_long: read_names(
            store,
            &schema.node_long_name,
            counts.num_nodes,
            NAME_LONG_LENGTH,
        )?,
        edge_node: checked_ints(store, topo, &schema.edge_nodes, 2 * counts.num_edges)?,
        is_spherical: decode_spherical(store, &schema.node_x)?,
        start_index: decode_start_index(store, &schema.edge_nodes)?,
    })
}

/// Encodes a Mesh1d into per-variable buffers.
pub fn encode_mesh1d(mesh: &Mesh1d) -> Result<Vec<EncodedVar>, UgridError> {
    mesh.validate()?;
    let schema = Mesh1dSchema::for_name(&mesh.name, &mesh.network_name);
    Ok(vec![
        EncodedVar::doubles(schema.node_x, &mesh.node_x),
        EncodedVar::doubles(schema.node_y, &mesh.node_y),
        EncodedVar::ints(schema.node_branch, &mesh.branch_id),
        EncodedVar::doubles(schema.node_offset, &mesh.branch_offset),
        EncodedVar::chars(
            schema.node_id,
            encode_fixed_strings(&mesh.node_name_id, NAME_LENGTH)?,
        ),
        EncodedVar::chars(
            schema.node_long_name,
            encode_fixed_strings(&mesh.node_name_long, NAME_LONG_LENGTH)?,
        ),
        EncodedVar::ints(schema.edge_nodes, &mesh.edge_node),
    ])
}

/// Reads a Mesh2d entity through its schema.
pub fn decode_mesh2d<S: MeshStore>(
    store: &S,
    schema: &Mesh2dSchema,
    counts: &TopologyCounts,
) -> Result<Mesh2d, UgridError> {
    let topo = &schema.name;
    Ok(Mesh2d {
        name: schema.name.clone(),
        node_x: checked_doubles(store, topo, &schema.node_x, counts.num_nodes)?,
        node_y: checked_doubles(store, topo, &schema.node_y, counts.num_nodes)?,
        edge_node: checked_ints(store, topo, &schema.edge_nodes, 2 * counts.num_edges)?,
        edge_x: checked_doubles(store, topo, &schema.edge_x, counts.num_edges)?,
        edge_y: checked_doubles(store, topo, &schema.edge_y, counts.num_edges)?,
        face_x: checked_doubles(store, topo, &schema.face_x, counts.num_faces)?,
        face_y: checked_doubles(store, topo, &schema.face_y, counts.num_faces)?,
        face_node: checked_ints(
            store,
            topo,
            &schema.face_nodes,
            counts.num_faces * counts.max_face_nodes,
        )?,
        is_spherical: decode_spherical(store, &schema.node_x)?,
        start_index: decode_start_index(store, &schema.edge_nodes)?,
    })
}

/// Encodes a Mesh2d into per-variable buffers.
///
/// Empty optional edge coordinates are skipped, leaving the variables in
/// their fill state.
pub fn encode_mesh2d(mesh: &Mesh2d) -> Result<Vec<EncodedVar>, UgridError> {
    mesh.validate()?;
    let schema = Mesh2dSchema::for_name(&mesh.name);
    let mut out = vec![
        EncodedVar::doubles(schema.node_x, &mesh.node_x),
        EncodedVar::doubles(schema.node_y, &mesh.node_y),
        EncodedVar::ints(schema.edge_nodes, &mesh.edge_node),
        EncodedVar::doubles(schema.face_x, &mesh.face_x),
        EncodedVar::doubles(schema.face_y, &mesh.face_y),
        EncodedVar::ints(schema.face_nodes, &mesh.face_node),
    ];
    if !mesh.edge_x.is_empty() {
        out.push(EncodedVar::doubles(schema.edge_x, &mesh.edge_x));
        out.push(EncodedVar::doubles(schema.edge_y, &mesh.edge_y));
    }
    Ok(out)
}

/// Reads a Mesh3d entity through its schema.
pub fn decode_mesh3d<S: MeshStore>(
    store: &S,
    schema: &Mesh3dSchema,
    counts: &TopologyCounts,
) -> Result<Mesh3d, UgridError> {
    let topo = &schema.name;
    Ok(Mesh3d {
        name: schema.name.clone(),
        node_x: checked_doubles(store, topo, &schema.node_x, counts.num_nodes)?,
        node_y: checked_doubles(store, topo, &schema.node_y, counts.num_nodes)?,
        node_z: checked_doubles(store, topo, &schema.node_z, counts.num_nodes)?,
        edge_node: checked_ints(store, topo, &schema.edge_nodes, 2 * counts.num_edges)?,
        face_node: checked_ints(
            store,
            topo,
            &schema.face_nodes,
            counts.num_faces * counts.max_face_nodes,
        )?,
        max_face_nodes: counts.max_face_nodes,
        volume_face: checked_ints(
            store,
            topo,
            &schema.volume_faces,
            counts.num_volumes * counts.max_volume_faces,
        )?,
        max_volume_faces: counts.max_volume_faces,
        is_spherical: decode_spherical(store, &schema.node_x)?,
        start_index: decode_start_index(store, &schema.edge_nodes)?,
    })
}

/// Encodes a Mesh3d into per-variable buffers.
pub fn encode_mesh3d(mesh: &Mesh3d) -> Result<Vec<EncodedVar>, UgridError> {
    mesh.validate()?;
    let schema = Mesh3dSchema::for_name(&mesh.name);
    Ok(vec![
        EncodedVar::doubles(schema.node_x, &mesh.node_x),
        EncodedVar::doubles(schema.node_y, &mesh.node_y),
        EncodedVar::doubles(schema.node_z, &mesh.node_z),
        EncodedVar::ints(schema.edge_nodes, &mesh.edge_node),
        EncodedVar::ints(schema.face_nodes, &mesh.face_node),
        EncodedVar::ints(schema.volume_faces, &mesh.volume_face),
    ])
}

/// Reads a contact topology through its schema.
///
/// The connectivity pairs live in the topology variable itself.
pub fn decode_contacts<S: MeshStore>(
    store: &S,
    schema: &ContactsSchema,
    counts: &TopologyCounts,
) -> Result<Contacts, UgridError> {
    let topo = &schema.name;
    Ok(Contacts {
        name: schema.name.clone(),
        mesh_from_name: schema.mesh_from.clone(),
        mesh_to_name: schema.mesh_to.clone(),
        mesh_from_location: schema.from_location,
        mesh_to_location: schema.to_location,
        edges: checked_ints(store, topo, &schema.name, 2 * counts.num_contacts)?,
        contact_type: checked_ints(store, topo, &schema.type_var, counts.num_contacts)?,
        contact_name_id: read_names(store, &schema.id_var, counts.num_contacts, NAME_LENGTH)?,
        contact_name_long: read_names(
            store,
            &schema.long_name_var,
            counts.num_contacts,
            NAME_LONG_LENGTH,
        )?,
    })
}

/// Encodes a contact topology into per-variable buffers.
pub fn encode_contacts(contacts: &Contacts) -> Result<Vec<EncodedVar>, UgridError> {
    contacts.validate()?;
    let schema = ContactsSchema::for_name(
        &contacts.name,
        &contacts.mesh_from_name,
        contacts.mesh_from_location,
        &contacts.mesh_to_name,
        contacts.mesh_to_location,
    );
    Ok(vec![
        EncodedVar::ints(schema.name, &contacts.edges),
        EncodedVar::ints(schema.type_var, &contacts.contact_type),
        EncodedVar::chars(
            schema.id_var,
            encode_fixed_strings(&contacts.contact_name_id, NAME_LENGTH)?,
        ),
        EncodedVar::chars(
            schema.long_name_var,
            encode_fixed_strings(&contacts.contact_name_long, NAME_LONG_LENGTH)?,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_rejects_inconsistent_mesh2d() {
        let mesh = Mesh2d {
            name: "mesh2d".into(),
            node_x: vec![0.0, 1.0],
            node_y: vec![0.0],
            ..Mesh2d::default()
        };
        assert!(matches!(
            encode_mesh2d(&mesh),
            Err(UgridError::InconsistentDimensions(_))
        ));
    }

    #[test]
    fn empty_optional_edge_coordinates_are_not_emitted() {
        let mesh = Mesh2d {
            name: "mesh2d".into(),
            node_x: vec![0.0, 1.0],
            node_y: vec![0.0, 0.0],
            edge_node: vec![0, 1],
            ..Mesh2d::default()
        };
        let encoded = encode_mesh2d(&mesh).unwrap();
        assert!(!encoded.iter().any(|e| e.var == "mesh2d_edge_x"));
    }

    #[test]
    fn contact_pairs_live_in_the_topology_variable() {
        let contacts = Contacts {
            name: "contacts".into(),
            mesh_from_name: "mesh1d".into(),
            mesh_to_name: "mesh2d".into(),
            edges: vec![0, 1],
            contact_type: vec![3],
            contact_name_id: vec!["c".into()],
            contact_name_long: vec!["c long".into()],
            ..Contacts::default()
        };
        let encoded = encode_contacts(&contacts).unwrap();
        assert_eq!(encoded[0].var, "contacts");
        assert_eq!(encoded[0].data, VarData::Ints(vec![0, 1]));
    }
}
