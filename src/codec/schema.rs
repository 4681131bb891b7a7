//! Per-kind topology schemas.
//!
//! A schema names every variable and dimension one topology instance owns
//! in the file. On the write side it is generated from the topology name
//! (`for_name`), exactly mirroring the Attribute Catalog; on the read side
//! it is parsed back out of the topology variable's attributes
//! (`from_store`), so files keep working even if a producer renamed the
//! underlying variables. Auxiliary variables the convention does not
//! advertise through attributes (name tables, branch assignments) use
//! fixed suffixes off the topology name.
//!
//! Schemas also answer inquiry: `counts` resolves dimension lengths only
//! and never touches array data.

use crate::error::UgridError;
use crate::store::{AttrValue, MeshStore};
use crate::topology::{Location, TopologyCounts};

fn text_attr<S: MeshStore>(store: &S, var: &str, name: &str) -> Result<String, UgridError> {
    match store.get_attr(var, name)? {
        Some(AttrValue::Text(s)) => Ok(s),
        Some(AttrValue::Int(v)) => Err(UgridError::MalformedSchema {
            var: var.to_string(),
            reason: format!("attribute `{name}` is numeric ({v}), expected text"),
        }),
        None => Err(UgridError::MalformedSchema {
            var: var.to_string(),
            reason: format!("missing attribute `{name}`"),
        }),
    }
}

fn split_coordinates(
    var: &str,
    attr: &str,
    value: &str,
    expected: usize,
) -> Result<Vec<String>, UgridError> {
    let parts: Vec<String> = value.split_whitespace().map(str::to_string).collect();
    if parts.len() != expected {
        return Err(UgridError::MalformedSchema {
            var: var.to_string(),
            reason: format!("attribute `{attr}` lists {} names, expected {expected}", parts.len()),
        });
    }
    Ok(parts)
}

fn leading_dim<S: MeshStore>(store: &S, topo: &str, var: &str) -> Result<String, UgridError> {
    let dims = store.var_dims(var)?;
    dims.into_iter().next().ok_or_else(|| UgridError::MalformedSchema {
        var: topo.to_string(),
        reason: format!("variable `{var}` has no dimensions"),
    })
}

/// Variables and dimensions of one Network1d topology.
#[derive(Clone, Debug)]
pub struct Network1dSchema {
    /// Topology (and variable-prefix) name.
    pub name: String,
    pub node_x: String,
    pub node_y: String,
    pub node_id: String,
    pub node_long_name: String,
    pub edge_nodes: String,
    pub edge_length: String,
    pub branch_order: String,
    pub branch_id: String,
    pub branch_long_name: String,
    pub geometry: String,
    pub geom_x: String,
    pub geom_y: String,
    pub geom_node_count: String,
    pub node_dim: String,
    pub edge_dim: String,
    pub geom_dim: String,
}

impl Network1dSchema {
    /// Canonical schema for a topology named `name`.
    pub fn for_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            node_x: format!("{name}_node_x"),
            node_y: format!("{name}_node_y"),
            node_id: format!("{name}_node_id"),
            node_long_name: format!("{name}_node_long_name"),
            edge_nodes: format!("{name}_edge_nodes"),
            edge_length: format!("{name}_edge_length"),
            branch_order: format!("{name}_branch_order"),
            branch_id: format!("{name}_branch_id"),
            branch_long_name: format!("{name}_branch_long_name"),
            geometry: format!("{name}_geometry"),
            geom_x: format!("{name}_geom_x"),
            geom_y: format!("{name}_geom_y"),
            geom_node_count: format!("{name}_geom_node_count"),
            node_dim: format!("{name}_nNodes"),
            edge_dim: format!("{name}_nEdges"),
            geom_dim: format!("{name}_nGeometryNodes"),
        }
    }

    /// Schema as advertised by the topology variable's attributes.
    pub fn from_store<S: MeshStore>(store: &S, topo: &str) -> Result<Self, UgridError> {
        let coords = text_attr(store, topo, "node_coordinates")?;
        let coords = split_coordinates(topo, "node_coordinates", &coords, 2)?;
        let geometry = text_attr(store, topo, "edge_geometry")?;
        let geom_coords = text_attr(store, &geometry, "node_coordinates")?;
        let geom_coords = split_coordinates(&geometry, "node_coordinates", &geom_coords, 2)?;
        let geom_x = geom_coords[0].clone();
        let geom_dim = leading_dim(store, topo, &geom_x)?;
        Ok(Self {
            name: topo.to_string(),
            node_x: coords[0].clone(),
            node_y: coords[1].clone(),
            node_id: format!("{topo}_node_id"),
            node_long_name: format!("{topo}_node_long_name"),
            edge_nodes: text_attr(store, topo, "edge_node_connectivity")?,
            edge_length: text_attr(store, topo, "edge_length")?,
            branch_order: format!("{topo}_branch_order"),
            branch_id: format!("{topo}_branch_id"),
            branch_long_name: format!("{topo}_branch_long_name"),
            geom_node_count: text_attr(store, &geometry, "node_count")?,
            geom_y: geom_coords[1].clone(),
            geom_x,
            geometry,
            node_dim: text_attr(store, topo, "node_dimension")?,
            edge_dim: text_attr(store, topo, "edge_dimension")?,
            geom_dim,
        })
    }

    /// Dimension sizes, resolved without any bulk read.
    pub fn counts<S: MeshStore>(&self, store: &S) -> Result<TopologyCounts, UgridError> {
        Ok(TopologyCounts {
            num_nodes: store.dim_len(&self.node_dim)?,
            num_edges: store.dim_len(&self.edge_dim)?,
            num_geometry_nodes: store.dim_len(&self.geom_dim)?,
            ..TopologyCounts::default()
        })
    }
}

/// Variables and dimensions of one Mesh1d topology.
#[derive(Clone, Debug)]
pub struct Mesh1dSchema {
    /// Topology (and variable-prefix) name.
    pub name: String,
    /// Name of the owning network topology.
    pub network_name: String,
    pub node_x: String,
    pub node_y: String,
    pub node_branch: String,
    pub node_offset: String,
    pub node_id: String,
    pub node_long_name: String,
    pub edge_nodes: String,
    pub node_dim: String,
    pub edge_dim: String,
}

impl Mesh1dSchema {
    /// Canonical schema for a topology named `name` on `network_name`.
    pub fn for_name(name: &str, network_name: &str) -> Self {
        Self {
            name: name.to_string(),
            network_name: network_name.to_string(),
            node_x: format!("{name}_node_x"),
            node_y: format!("{name}_node_y"),
            node_branch: format!("{name}_node_branch"),
            node_offset: format!("{name}_node_offset"),
            node_id: format!("{name}_node_id"),
            node_long_name: format!("{name}_node_long_name"),
            edge_nodes: format!("{name}_edge_nodes"),
            node_dim: format!("{name}_nNodes"),
            edge_dim: format!("{name}_nEdges"),
        }
    }

    /// Schema as advertised by the topology variable's attributes.
    pub fn from_store<S: MeshStore>(store: &S, topo: &str) -> Result<Self, UgridError> {
        let coords = text_attr(store, topo, "node_coordinates")?;
        let coords = split_coordinates(topo, "node_coordinates", &coords, 2)?;
        Ok(Self {
            name: topo.to_string(),
            network_name: text_attr(store, topo, "coordinate_space")?,
            node_x: coords[0].clone(),
            node_y: coords[1].clone(),
            node_branch: format!("{topo}_node_branch"),
            node_offset: format!("{topo}_node_offset"),
            node_id: format!("{topo}_node_id"),
            node_long_name: format!("{topo}_node_long_name"),
            edge_nodes: text_attr(store, topo, "edge_node_connectivity")?,
            node_dim: text_attr(store, topo, "node_dimension")?,
            edge_dim: text_attr(store, topo, "edge_dimension")?,
        })
    }

    /// Dimension sizes, resolved without any bulk read.
    pub fn counts<S: MeshStore>(&self, store: &S) -> Result<TopologyCounts, UgridError> {
        Ok(TopologyCounts {
            num_nodes: store.dim_len(&self.node_dim)?,
            num_edges: store.dim_len(&self.edge_dim)?,
            ..TopologyCounts::default()
        })
    }
}

/// Variables and dimensions of one Mesh2d topology.
#[derive(Clone, Debug)]
pub struct Mesh2dSchema {
    /// Topology (and variable-prefix) name.
    pub name: String,
    pub node_x: String,
    pub node_y: String,
    pub edge_nodes: String,
    pub edge_x: String,
    pub edge_y: String,
    pub face_x: String,
    pub face_y: String,
    pub face_nodes: String,
    pub node_dim: String,
    pub edge_dim: String,
    pub face_dim: String,
    pub max_face_dim: String,
}

impl Mesh2dSchema {
    /// Canonical schema for a topology named `name`.
    pub fn for_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            node_x: format!("{name}_node_x"),
            node_y: format!("{name}_node_y"),
            edge_nodes: format!("{name}_edge_nodes"),
            edge_x: format!("{name}_edge_x"),
            edge_y: format!("{name}_edge_y"),
            face_x: format!("{name}_face_x"),
            face_y: format!("{name}_face_y"),
            face_nodes: format!("{name}_face_nodes"),
            node_dim: format!("{name}_nNodes"),
            edge_dim: format!("{name}_nEdges"),
            face_dim: format!("{name}_nFaces"),
            max_face_dim: format!("{name}_nMax_face_nodes"),
        }
    }

    /// Schema as advertised by the topology variable's attributes.
    pub fn from_store<S: MeshStore>(store: &S, topo: &str) -> Result<Self, UgridError> {
        let node = text_attr(store, topo, "node_coordinates")?;
        let node = split_coordinates(topo, "node_coordinates", &node, 2)?;
        let edge = text_attr(store, topo, "edge_coordinates")?;
        let edge = split_coordinates(topo, "edge_coordinates", &edge, 2)?;
        let face = text_attr(store, topo, "face_coordinates")?;
        let face = split_coordinates(topo, "face_coordinates", &face, 2)?;
        Ok(Self {
            name: topo.to_string(),
            node_x: node[0].clone(),
            node_y: node[1].clone(),
            edge_nodes: text_attr(store, topo, "edge_node_connectivity")?,
            edge_x: edge[0].clone(),
            edge_y: edge[1].clone(),
            face_x: face[0].clone(),
            face_y: face[1].clone(),
            face_nodes: text_attr(store, topo, "face_node_connectivity")?,
            node_dim: text_attr(store, topo, "node_dimension")?,
            edge_dim: text_attr(store, topo, "edge_dimension")?,
            face_dim: text_attr(store, topo, "face_dimension")?,
            max_face_dim: text_attr(store, topo, "max_face_nodes_dimension")?,
        })
    }

    /// Dimension sizes, resolved without any bulk read.
    pub fn counts<S: MeshStore>(&self, store: &S) -> Result<TopologyCounts, UgridError> {
        Ok(TopologyCounts {
            num_nodes: store.dim_len(&self.node_dim)?,
            num_edges: store.dim_len(&self.edge_dim)?,
            num_faces: store.dim_len(&self.face_dim)?,
            max_face_nodes: store.dim_len(&self.max_face_dim)?,
            ..TopologyCounts::default()
        })
    }
}

/// Variables and dimensions of one Mesh3d topology.
#[derive(Clone, Debug)]
pub struct Mesh3dSchema {
    /// Topology (and variable-prefix) name.
    pub name: String,
    pub node_x: String,
    pub node_y: String,
    pub node_z: String,
    pub edge_nodes: String,
    pub face_nodes: String,
    pub volume_faces: String,
    pub node_dim: String,
    pub edge_dim: String,
    pub face_dim: String,
    pub volume_dim: String,
    pub max_face_dim: String,
    pub max_volume_dim: String,
}

impl Mesh3dSchema {
    /// Canonical schema for a topology named `name`.
    pub fn for_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            node_x: format!("{name}_node_x"),
            node_y: format!("{name}_node_y"),
            node_z: format!("{name}_node_z"),
            edge_nodes: format!("{name}_edge_nodes"),
            face_nodes: format!("{name}_face_nodes"),
            volume_faces: format!("{name}_volume_faces"),
            node_dim: format!("{name}_nNodes"),
            edge_dim: format!("{name}_nEdges"),
            face_dim: format!("{name}_nFaces"),
            volume_dim: format!("{name}_nVolumes"),
            max_face_dim: format!("{name}_nMax_face_nodes"),
            max_volume_dim: format!("{name}_nMax_volume_faces"),
        }
    }

    /// Schema as advertised by the topology variable's attributes.
    pub fn from_store<S: MeshStore>(store: &S, topo: &str) -> Result<Self, UgridError> {
        let node = text_attr(store, topo, "node_coordinates")?;
        let node = split_coordinates(topo, "node_coordinates", &node, 3)?;
        Ok(Self {
            name: topo.to_string(),
            node_x: node[0].clone(),
            node_y: node[1].clone(),
            node_z: node[2].clone(),
            edge_nodes: text_attr(store, topo, "edge_node_connectivity")?,
            face_nodes: text_attr(store, topo, "face_node_connectivity")?,
            volume_faces: text_attr(store, topo, "volume_face_connectivity")?,
            node_dim: text_attr(store, topo, "node_dimension")?,
            edge_dim: text_attr(store, topo, "edge_dimension")?,
            face_dim: text_attr(store, topo, "face_dimension")?,
            volume_dim: text_attr(store, topo, "volume_dimension")?,
            max_face_dim: text_attr(store, topo, "max_face_nodes_dimension")?,
            max_volume_dim: text_attr(store, topo, "max_volume_faces_dimension")?,
        })
    }

    /// Dimension sizes, resolved without any bulk read.
    pub fn counts<S: MeshStore>(&self, store: &S) -> Result<TopologyCounts, UgridError> {
        Ok(TopologyCounts {
            num_nodes: store.dim_len(&self.node_dim)?,
            num_edges: store.dim_len(&self.edge_dim)?,
            num_faces: store.dim_len(&self.face_dim)?,
            num_volumes: store.dim_len(&self.volume_dim)?,
            max_face_nodes: store.dim_len(&self.max_face_dim)?,
            max_volume_faces: store.dim_len(&self.max_volume_dim)?,
            ..TopologyCounts::default()
        })
    }
}

/// Variables and dimensions of one contact topology.
///
/// The topology variable itself is the connectivity table, per the UGRID
/// contact convention.
#[derive(Clone, Debug)]
pub struct ContactsSchema {
    /// Topology (and connectivity-variable) name.
    pub name: String,
    /// Name of the topology the links originate from.
    pub mesh_from: String,
    /// Name of the topology the links point into.
    pub mesh_to: String,
    /// Location on the originating topology.
    pub from_location: Location,
    /// Location on the target topology.
    pub to_location: Location,
    pub id_var: String,
    pub long_name_var: String,
    pub type_var: String,
    pub contact_dim: String,
}

impl ContactsSchema {
    /// Canonical schema for a contact topology named `name`.
    pub fn for_name(
        name: &str,
        mesh_from: &str,
        from_location: Location,
        mesh_to: &str,
        to_location: Location,
    ) -> Self {
        Self {
            name: name.to_string(),
            mesh_from: mesh_from.to_string(),
            mesh_to: mesh_to.to_string(),
            from_location,
            to_location,
            id_var: format!("{name}_id"),
            long_name_var: format!("{name}_long_name"),
            type_var: format!("{name}_contact_type"),
            contact_dim: format!("{name}_nContacts"),
        }
    }

    /// Schema as advertised by the topology variable's attributes.
    pub fn from_store<S: MeshStore>(store: &S, topo: &str) -> Result<Self, UgridError> {
        let contact = text_attr(store, topo, "contact")?;
        let tokens: Vec<&str> = contact.split_whitespace().collect();
        let malformed = |reason: String| UgridError::MalformedSchema {
            var: topo.to_string(),
            reason,
        };
        if tokens.len() != 4 {
            return Err(malformed(format!(
                "contact attribute `{contact}` should read `<mesh>: <location> <mesh>: <location>`"
            )));
        }
        let mesh_from = tokens[0]
            .strip_suffix(':')
            .ok_or_else(|| malformed(format!("missing `:` after `{}`", tokens[0])))?;
        let mesh_to = tokens[2]
            .strip_suffix(':')
            .ok_or_else(|| malformed(format!("missing `:` after `{}`", tokens[2])))?;
        let from_location = Location::parse(tokens[1])
            .ok_or_else(|| malformed(format!("unknown location `{}`", tokens[1])))?;
        let to_location = Location::parse(tokens[3])
            .ok_or_else(|| malformed(format!("unknown location `{}`", tokens[3])))?;
        Ok(Self {
            name: topo.to_string(),
            mesh_from: mesh_from.to_string(),
            mesh_to: mesh_to.to_string(),
            from_location,
            to_location,
            id_var: text_attr(store, topo, "contact_id")?,
            long_name_var: text_attr(store, topo, "contact_long_name")?,
            type_var: text_attr(store, topo, "contact_type")?,
            contact_dim: text_attr(store, topo, "contact_dimension")?,
        })
    }

    /// Dimension sizes, resolved without any bulk read.
    pub fn counts<S: MeshStore>(&self, store: &S) -> Result<TopologyCounts, UgridError> {
        Ok(TopologyCounts {
            num_contacts: store.dim_len(&self.contact_dim)?,
            ..TopologyCounts::default()
        })
    }
}
