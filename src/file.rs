//! UgridFile: the session handle tying inquiry, the entity codec, and the
//! define/put transaction together over a [`MeshStore`].
//!
//! A handle wraps an already-opened store plus the [`OpenMode`] it was
//! opened with. Reads work in any mode; `*_define` and `*_put` fail fast
//! with `WriteNotPermitted` on a read-only handle before touching the
//! store. Writing is two-phase: `define` registers the schema (dimensions,
//! variables, attributes) and freezes the entity's counts in a session
//! ledger, `put` encodes and bulk-writes the data of a previously defined
//! topology. Repeated `put` against the same id overwrites data, never
//! schema.
//!
//! The handle is a scoped resource: [`UgridFile::close`] flushes and
//! surfaces the close error; dropping an unclosed handle flushes
//! best-effort and logs on failure, so the resource is released on every
//! exit path. A handle must not be shared between threads without caller
//! serialization; independent handles to different files need none.

use log::debug;

use crate::attrs::{
    self, FILL_VALUE, ID_LENGTH_DIM, LONG_LENGTH_DIM, NAME_LENGTH, NAME_LONG_LENGTH, TWO_DIM,
};
use crate::codec::entity::{
    decode_contacts, decode_mesh1d, decode_mesh2d, decode_mesh3d, decode_network1d,
    encode_contacts, encode_mesh1d, encode_mesh2d, encode_mesh3d, encode_network1d,
};
use crate::codec::schema::{
    ContactsSchema, Mesh1dSchema, Mesh2dSchema, Mesh3dSchema, Network1dSchema,
};
use crate::error::UgridError;
use crate::store::{AttrValue, InMemoryStore, MeshStore, OpenMode, StoreError, VarType};
use crate::topology::{
    Contacts, Mesh1d, Mesh2d, Mesh3d, Network1d, TopologyCounts, TopologyId, TopologyKind,
};

#[derive(Clone, Debug)]
struct DefinedTopology {
    kind: TopologyKind,
    id: TopologyId,
    name: String,
    counts: TopologyCounts,
    written: bool,
}

#[derive(Copy, Clone)]
enum Axis {
    X,
    Y,
    Z,
}

/// Session handle for one UGRID file.
pub struct UgridFile<S: MeshStore = InMemoryStore> {
    store: Option<S>,
    mode: OpenMode,
    defined: Vec<DefinedTopology>,
}

impl UgridFile<InMemoryStore> {
    /// Creates a fresh, writable in-memory file.
    pub fn create_in_memory() -> Self {
        UgridFile::open(InMemoryStore::new(), OpenMode::Replace)
    }
}

impl<S: MeshStore> UgridFile<S> {
    /// Wraps an already-opened store in a session handle.
    pub fn open(store: S, mode: OpenMode) -> Self {
        UgridFile {
            store: Some(store),
            mode,
            defined: Vec::new(),
        }
    }

    /// Mode the file was opened in.
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        self.store.as_ref().expect("file handle open")
    }

    fn store_mut(&mut self) -> &mut S {
        self.store.as_mut().expect("file handle open")
    }

    /// Flushes and releases the handle, surfacing any close failure.
    ///
    /// The store is released even when the flush fails.
    pub fn close(mut self) -> Result<(), UgridError> {
        if let Some(mut store) = self.store.take() {
            store
                .sync()
                .map_err(|e| UgridError::Close(e.to_string()))?;
        }
        Ok(())
    }

    /// Releases the handle and hands the store back, e.g. to reopen it
    /// under a different mode. Skips the close-time error check.
    pub fn into_store(mut self) -> S {
        self.store.take().expect("file handle open")
    }

    fn ensure_writable(&self, op: &'static str) -> Result<(), UgridError> {
        if !self.mode.writable() {
            return Err(UgridError::WriteNotPermitted { op });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Inquiry
    // ------------------------------------------------------------------

    /// Number of topologies of `kind` in the file, in definition order.
    pub fn topology_count(&self, kind: TopologyKind) -> Result<usize, UgridError> {
        let store = self.store();
        let mut count = 0;
        for var in store.var_names() {
            if attrs::classify(store, &var)? == Some(kind) {
                count += 1;
            }
        }
        Ok(count)
    }

    fn topology_var(&self, kind: TopologyKind, id: TopologyId) -> Result<String, UgridError> {
        let store = self.store();
        let mut seen = 0usize;
        for var in store.var_names() {
            if attrs::classify(store, &var)? == Some(kind) {
                if seen == id.index() {
                    return Ok(var);
                }
                seen += 1;
            }
        }
        Err(UgridError::TopologyNotFound {
            kind,
            id,
            count: seen,
        })
    }

    /// Dimension sizes of the `id`-th topology of `kind`.
    ///
    /// A pure schema probe: only attributes and dimension lengths are
    /// consulted, never array data, so this is safe to call before
    /// allocating anything.
    pub fn inquire(
        &self,
        kind: TopologyKind,
        id: TopologyId,
    ) -> Result<TopologyCounts, UgridError> {
        let var = self.topology_var(kind, id)?;
        let store = self.store();
        match kind {
            TopologyKind::Network1d => Network1dSchema::from_store(store, &var)?.counts(store),
            TopologyKind::Mesh1d => Mesh1dSchema::from_store(store, &var)?.counts(store),
            TopologyKind::Mesh2d => Mesh2dSchema::from_store(store, &var)?.counts(store),
            TopologyKind::Mesh3d => Mesh3dSchema::from_store(store, &var)?.counts(store),
            TopologyKind::Contacts => ContactsSchema::from_store(store, &var)?.counts(store),
        }
    }

    /// Attribute values of the `id`-th topology of `kind`, read from the
    /// file in catalog order.
    ///
    /// Index-aligned with [`attrs::attribute_names`]; for a topology this
    /// crate defined, the sequence is bit-identical to the catalog's
    /// derived values.
    pub fn topology_attribute_values(
        &self,
        kind: TopologyKind,
        id: TopologyId,
    ) -> Result<Vec<String>, UgridError> {
        let var = self.topology_var(kind, id)?;
        let store = self.store();
        let mut values = Vec::new();
        for name in attrs::attribute_names(kind) {
            let value = store.get_attr(&var, name)?.ok_or_else(|| {
                UgridError::MalformedSchema {
                    var: var.clone(),
                    reason: format!("missing attribute `{name}`"),
                }
            })?;
            values.push(match value {
                AttrValue::Text(s) => s,
                AttrValue::Int(v) => v.to_string(),
            });
        }
        Ok(values)
    }

    // ------------------------------------------------------------------
    // Get
    // ------------------------------------------------------------------

    /// Reads the `id`-th Network1d topology.
    pub fn network1d_get(&self, id: TopologyId) -> Result<Network1d, UgridError> {
        let var = self.topology_var(TopologyKind::Network1d, id)?;
        let store = self.store();
        let schema = Network1dSchema::from_store(store, &var)?;
        let counts = schema.counts(store)?;
        let network = decode_network1d(store, &schema, &counts)?;
        debug!("read network1d topology {id} (`{var}`)");
        Ok(network)
    }

    /// Reads the `id`-th Mesh1d topology.
    pub fn mesh1d_get(&self, id: TopologyId) -> Result<Mesh1d, UgridError> {
        let var = self.topology_var(TopologyKind::Mesh1d, id)?;
        let store = self.store();
        let schema = Mesh1dSchema::from_store(store, &var)?;
        let counts = schema.counts(store)?;
        let mesh = decode_mesh1d(store, &schema, &counts)?;
        debug!("read mesh1d topology {id} (`{var}`)");
        Ok(mesh)
    }

    /// Reads the `id`-th Mesh2d topology.
    pub fn mesh2d_get(&self, id: TopologyId) -> Result<Mesh2d, UgridError> {
        let var = self.topology_var(TopologyKind::Mesh2d, id)?;
        let store = self.store();
        let schema = Mesh2dSchema::from_store(store, &var)?;
        let counts = schema.counts(store)?;
        let mesh = decode_mesh2d(store, &schema, &counts)?;
        debug!("read mesh2d topology {id} (`{var}`)");
        Ok(mesh)
    }

    /// Reads the `id`-th Mesh3d topology.
    pub fn mesh3d_get(&self, id: TopologyId) -> Result<Mesh3d, UgridError> {
        let var = self.topology_var(TopologyKind::Mesh3d, id)?;
        let store = self.store();
        let schema = Mesh3dSchema::from_store(store, &var)?;
        let counts = schema.counts(store)?;
        let mesh = decode_mesh3d(store, &schema, &counts)?;
        debug!("read mesh3d topology {id} (`{var}`)");
        Ok(mesh)
    }

    /// Reads the `id`-th contact topology.
    pub fn contacts_get(&self, id: TopologyId) -> Result<Contacts, UgridError> {
        let var = self.topology_var(TopologyKind::Contacts, id)?;
        let store = self.store();
        let schema = ContactsSchema::from_store(store, &var)?;
        let counts = schema.counts(store)?;
        let contacts = decode_contacts(store, &schema, &counts)?;
        debug!("read contacts topology {id} (`{var}`)");
        Ok(contacts)
    }

    // ------------------------------------------------------------------
    // Define
    // ------------------------------------------------------------------

    fn ensure_shared_dims(&mut self) -> Result<(), StoreError> {
        let store = self.store_mut();
        store.def_dim(ID_LENGTH_DIM, NAME_LENGTH)?;
        store.def_dim(LONG_LENGTH_DIM, NAME_LONG_LENGTH)?;
        store.def_dim(TWO_DIM, 2)?;
        Ok(())
    }

    fn def_topology_attrs(
        &mut self,
        var: &str,
        names: &[&str],
        values: &[String],
    ) -> Result<(), StoreError> {
        let store = self.store_mut();
        for (name, value) in names.iter().zip(values) {
            store.put_attr(var, name, AttrValue::Text(value.clone()))?;
        }
        Ok(())
    }

    fn def_coord_var(
        &mut self,
        var: &str,
        dim: &str,
        axis: Axis,
        spherical: bool,
    ) -> Result<(), StoreError> {
        let (units, standard_name) = match (axis, spherical) {
            (Axis::X, true) => ("degrees_east", "longitude"),
            (Axis::Y, true) => ("degrees_north", "latitude"),
            (Axis::X, false) => ("m", "projection_x_coordinate"),
            (Axis::Y, false) => ("m", "projection_y_coordinate"),
            (Axis::Z, _) => ("m", "altitude"),
        };
        let store = self.store_mut();
        store.def_var(var, VarType::Double, &[dim])?;
        store.put_attr(var, "units", AttrValue::Text(units.to_string()))?;
        store.put_attr(
            var,
            "standard_name",
            AttrValue::Text(standard_name.to_string()),
        )?;
        Ok(())
    }

    fn def_name_var(&mut self, var: &str, dim: &str, long: bool) -> Result<(), StoreError> {
        let width = if long { LONG_LENGTH_DIM } else { ID_LENGTH_DIM };
        self.store_mut().def_var(var, VarType::Char, &[dim, width])
    }

    fn def_conn_var(
        &mut self,
        var: &str,
        dims: &[&str],
        start_index: i64,
        filled: bool,
    ) -> Result<(), StoreError> {
        let store = self.store_mut();
        store.def_var(var, VarType::Int, dims)?;
        store.put_attr(var, "start_index", AttrValue::Int(start_index))?;
        if filled {
            store.put_attr(var, "_FillValue", AttrValue::Int(FILL_VALUE))?;
        }
        Ok(())
    }

    fn next_id(&self, kind: TopologyKind) -> Result<TopologyId, UgridError> {
        Ok(TopologyId::new(self.topology_count(kind)? as u32))
    }

    fn counts_mismatch(frozen: &TopologyCounts, actual: &TopologyCounts) -> Option<String> {
        [
            ("num_nodes", frozen.num_nodes, actual.num_nodes),
            ("num_edges", frozen.num_edges, actual.num_edges),
            ("num_faces", frozen.num_faces, actual.num_faces),
            ("num_volumes", frozen.num_volumes, actual.num_volumes),
            (
                "num_geometry_nodes",
                frozen.num_geometry_nodes,
                actual.num_geometry_nodes,
            ),
            ("num_contacts", frozen.num_contacts, actual.num_contacts),
            ("max_face_nodes", frozen.max_face_nodes, actual.max_face_nodes),
            (
                "max_volume_faces",
                frozen.max_volume_faces,
                actual.max_volume_faces,
            ),
        ]
        .iter()
        .find(|(_, frozen, actual)| frozen != actual)
        .map(|(field, frozen, actual)| {
            format!("{field} was defined as {frozen}, the entity has {actual}")
        })
    }

    fn take_defined(
        &mut self,
        kind: TopologyKind,
        id: TopologyId,
        name: &str,
        actual: &TopologyCounts,
    ) -> Result<usize, UgridError> {
        let slot = self
            .defined
            .iter()
            .position(|d| d.kind == kind && d.id == id)
            .ok_or(UgridError::NotDefined { kind, id })?;
        let entry = &self.defined[slot];
        if entry.name != name {
            return Err(UgridError::DimensionMismatch {
                kind,
                id,
                reason: format!(
                    "entity is named `{name}`, topology was defined as `{}`",
                    entry.name
                ),
            });
        }
        if let Some(reason) = Self::counts_mismatch(&entry.counts, actual) {
            return Err(UgridError::DimensionMismatch { kind, id, reason });
        }
        Ok(slot)
    }

    /// Defines a new Network1d topology and returns its id.
    pub fn network1d_define(&mut self, network: &Network1d) -> Result<TopologyId, UgridError> {
        self.ensure_writable("network1d_define")?;
        network.validate()?;
        let counts = network.counts();
        let id = self.next_id(TopologyKind::Network1d)?;
        let schema = Network1dSchema::for_name(&network.name);

        self.ensure_shared_dims()?;
        {
            let store = self.store_mut();
            store.def_dim(&schema.node_dim, counts.num_nodes)?;
            store.def_dim(&schema.edge_dim, counts.num_edges)?;
            store.def_dim(&schema.geom_dim, counts.num_geometry_nodes)?;
            store.def_var(&schema.name, VarType::Int, &[])?;
        }
        self.def_topology_attrs(
            &schema.name,
            attrs::attribute_names(TopologyKind::Network1d),
            &attrs::network1d_values(&network.name),
        )?;
        {
            let store = self.store_mut();
            store.def_var(&schema.geometry, VarType::Int, &[])?;
            for (name, value) in attrs::network1d_geometry_attrs(&network.name) {
                store.put_attr(&schema.geometry, name, AttrValue::Text(value))?;
            }
        }
        self.def_coord_var(&schema.node_x, &schema.node_dim, Axis::X, network.is_spherical)?;
        self.def_coord_var(&schema.node_y, &schema.node_dim, Axis::Y, network.is_spherical)?;
        self.def_name_var(&schema.node_id, &schema.node_dim, false)?;
        self.def_name_var(&schema.node_long_name, &schema.node_dim, true)?;
        self.def_conn_var(
            &schema.edge_nodes,
            &[schema.edge_dim.as_str(), TWO_DIM],
            network.start_index,
            false,
        )?;
        {
            let store = self.store_mut();
            store.def_var(&schema.edge_length, VarType::Double, &[schema.edge_dim.as_str()])?;
            store.def_var(&schema.branch_order, VarType::Int, &[schema.edge_dim.as_str()])?;
            store.def_var(&schema.geom_node_count, VarType::Int, &[schema.edge_dim.as_str()])?;
        }
        self.def_name_var(&schema.branch_id, &schema.edge_dim, false)?;
        self.def_name_var(&schema.branch_long_name, &schema.edge_dim, true)?;
        self.def_coord_var(&schema.geom_x, &schema.geom_dim, Axis::X, network.is_spherical)?;
        self.def_coord_var(&schema.geom_y, &schema.geom_dim, Axis::Y, network.is_spherical)?;

        self.defined.push(DefinedTopology {
            kind: TopologyKind::Network1d,
            id,
            name: network.name.clone(),
            counts,
            written: false,
        });
        debug!("defined network1d `{}` as topology {id}", network.name);
        Ok(id)
    }

    /// Writes the data of a previously defined Network1d topology.
    pub fn network1d_put(&mut self, id: TopologyId, network: &Network1d) -> Result<(), UgridError> {
        self.ensure_writable("network1d_put")?;
        network.validate()?;
        let slot = self.take_defined(
            TopologyKind::Network1d,
            id,
            &network.name,
            &network.counts(),
        )?;
        let encoded = encode_network1d(network)?;
        let store = self.store_mut();
        for ev in &encoded {
            store.write_data(&ev.var, &ev.data)?;
        }
        if self.defined[slot].written {
            debug!("overwrote network1d topology {id} data");
        } else {
            self.defined[slot].written = true;
            debug!("wrote network1d topology {id}");
        }
        Ok(())
    }

    /// Defines a new Mesh1d topology and returns its id.
    pub fn mesh1d_define(&mut self, mesh: &Mesh1d) -> Result<TopologyId, UgridError> {
        self.ensure_writable("mesh1d_define")?;
        mesh.validate()?;
        let counts = mesh.counts();
        let id = self.next_id(TopologyKind::Mesh1d)?;
        let schema = Mesh1dSchema::for_name(&mesh.name, &mesh.network_name);

        self.ensure_shared_dims()?;
        {
            let store = self.store_mut();
            store.def_dim(&schema.node_dim, counts.num_nodes)?;
            store.def_dim(&schema.edge_dim, counts.num_edges)?;
            store.def_var(&schema.name, VarType::Int, &[])?;
        }
        self.def_topology_attrs(
            &schema.name,
            attrs::attribute_names(TopologyKind::Mesh1d),
            &attrs::mesh1d_values(&mesh.name, &mesh.network_name),
        )?;
        self.def_coord_var(&schema.node_x, &schema.node_dim, Axis::X, mesh.is_spherical)?;
        self.def_coord_var(&schema.node_y, &schema.node_dim, Axis::Y, mesh.is_spherical)?;
        {
            let store = self.store_mut();
            store.def_var(&schema.node_branch, VarType::Int, &[schema.node_dim.as_str()])?;
            store.def_var(&schema.node_offset, VarType::Double, &[schema.node_dim.as_str()])?;
        }
        self.def_name_var(&schema.node_id, &schema.node_dim, false)?;
        self.def_name_var(&schema.node_long_name, &schema.node_dim, true)?;
        self.def_conn_var(
            &schema.edge_nodes,
            &[schema.edge_dim.as_str(), TWO_DIM],
            mesh.start_index,
            false,
        )?;

        self.defined.push(DefinedTopology {
            kind: TopologyKind::Mesh1d,
            id,
            name: mesh.name.clone(),
            counts,
            written: false,
        });
        debug!("defined mesh1d `{}` as topology {id}", mesh.name);
        Ok(id)
    }

    /// Writes the data of a previously defined Mesh1d topology.
    pub fn mesh1d_put(&mut self, id: TopologyId, mesh: &Mesh1d) -> Result<(), UgridError> {
        self.ensure_writable("mesh1d_put")?;
        mesh.validate()?;
        let slot = self.take_defined(TopologyKind::Mesh1d, id, &mesh.name, &mesh.counts())?;
        let encoded = encode_mesh1d(mesh)?;
        let store = self.store_mut();
        for ev in &encoded {
            store.write_data(&ev.var, &ev.data)?;
        }
        if self.defined[slot].written {
            debug!("overwrote mesh1d topology {id} data");
        } else {
            self.defined[slot].written = true;
            debug!("wrote mesh1d topology {id}");
        }
        Ok(())
    }

    /// Defines a new Mesh2d topology and returns its id.
    pub fn mesh2d_define(&mut self, mesh: &Mesh2d) -> Result<TopologyId, UgridError> {
        self.ensure_writable("mesh2d_define")?;
        mesh.validate()?;
        let counts = mesh.counts();
        let id = self.next_id(TopologyKind::Mesh2d)?;
        let schema = Mesh2dSchema::for_name(&mesh.name);

        self.ensure_shared_dims()?;
        {
            let store = self.store_mut();
            store.def_dim(&schema.node_dim, counts.num_nodes)?;
            store.def_dim(&schema.edge_dim, counts.num_edges)?;
            store.def_dim(&schema.face_dim, counts.num_faces)?;
            store.def_dim(&schema.max_face_dim, counts.max_face_nodes)?;
            store.def_var(&schema.name, VarType::Int, &[])?;
        }
        self.def_topology_attrs(
            &schema.name,
            attrs::attribute_names(TopologyKind::Mesh2d),
            &attrs::mesh2d_values(&mesh.name),
        )?;
        self.def_coord_var(&schema.node_x, &schema.node_dim, Axis::X, mesh.is_spherical)?;
        self.def_coord_var(&schema.node_y, &schema.node_dim, Axis::Y, mesh.is_spherical)?;
        self.def_coord_var(&schema.edge_x, &schema.edge_dim, Axis::X, mesh.is_spherical)?;
        self.def_coord_var(&schema.edge_y, &schema.edge_dim, Axis::Y, mesh.is_spherical)?;
        self.def_coord_var(&schema.face_x, &schema.face_dim, Axis::X, mesh.is_spherical)?;
        self.def_coord_var(&schema.face_y, &schema.face_dim, Axis::Y, mesh.is_spherical)?;
        self.def_conn_var(
            &schema.edge_nodes,
            &[schema.edge_dim.as_str(), TWO_DIM],
            mesh.start_index,
            false,
        )?;
        self.def_conn_var(
            &schema.face_nodes,
            &[schema.face_dim.as_str(), schema.max_face_dim.as_str()],
            mesh.start_index,
            true,
        )?;

        self.defined.push(DefinedTopology {
            kind: TopologyKind::Mesh2d,
            id,
            name: mesh.name.clone(),
            counts,
            written: false,
        });
        debug!("defined mesh2d `{}` as topology {id}", mesh.name);
        Ok(id)
    }

    /// Writes the data of a previously defined Mesh2d topology.
    pub fn mesh2d_put(&mut self, id: TopologyId, mesh: &Mesh2d) -> Result<(), UgridError> {
        self.ensure_writable("mesh2d_put")?;
        mesh.validate()?;
        let slot = self.take_defined(TopologyKind::Mesh2d, id, &mesh.name, &mesh.counts())?;
        let encoded = encode_mesh2d(mesh)?;
        let store = self.store_mut();
        for ev in &encoded {
            store.write_data(&ev.var, &ev.data)?;
        }
        if self.defined[slot].written {
            debug!("overwrote mesh2d topology {id} data");
        } else {
            self.defined[slot].written = true;
            debug!("wrote mesh2d topology {id}");
        }
        Ok(())
    }

    /// Defines a new Mesh3d topology and returns its id.
    pub fn mesh3d_define(&mut self, mesh: &Mesh3d) -> Result<TopologyId, UgridError> {
        self.ensure_writable("mesh3d_define")?;
        mesh.validate()?;
        let counts = mesh.counts();
        let id = self.next_id(TopologyKind::Mesh3d)?;
        let schema = Mesh3dSchema::for_name(&mesh.name);

        self.ensure_shared_dims()?;
        {
            let store = self.store_mut();
            store.def_dim(&schema.node_dim, counts.num_nodes)?;
            store.def_dim(&schema.edge_dim, counts.num_edges)?;
            store.def_dim(&schema.face_dim, counts.num_faces)?;
            store.def_dim(&schema.volume_dim, counts.num_volumes)?;
            store.def_dim(&schema.max_face_dim, counts.max_face_nodes)?;
            store.def_dim(&schema.max_volume_dim, counts.max_volume_faces)?;
            store.def_var(&schema.name, VarType::Int, &[])?;
        }
        self.def_topology_attrs(
            &schema.name,
            attrs::attribute_names(TopologyKind::Mesh3d),
            &attrs::mesh3d_values(&mesh.name),
        )?;
        self.def_coord_var(&schema.node_x, &schema.node_dim, Axis::X, mesh.is_spherical)?;
        self.def_coord_var(&schema.node_y, &schema.node_dim, Axis::Y, mesh.is_spherical)?;
        self.def_coord_var(&schema.node_z, &schema.node_dim, Axis::Z, mesh.is_spherical)?;
        self.def_conn_var(
            &schema.edge_nodes,
            &[schema.edge_dim.as_str(), TWO_DIM],
            mesh.start_index,
            false,
        )?;
        self.def_conn_var(
            &schema.face_nodes,
            &[schema.face_dim.as_str(), schema.max_face_dim.as_str()],
            mesh.start_index,
            true,
        )?;
        self.def_conn_var(
            &schema.volume_faces,
            &[schema.volume_dim.as_str(), schema.max_volume_dim.as_str()],
            mesh.start_index,
            true,
        )?;

        self.defined.push(DefinedTopology {
            kind: TopologyKind::Mesh3d,
            id,
            name: mesh.name.clone(),
            counts,
            written: false,
        });
        debug!("defined mesh3d `{}` as topology {id}", mesh.name);
        Ok(id)
    }

    /// Writes the data of a previously defined Mesh3d topology.
    pub fn mesh3d_put(&mut self, id: TopologyId, mesh: &Mesh3d) -> Result<(), UgridError> {
        self.ensure_writable("mesh3d_put")?;
        mesh.validate()?;
        let slot = self.take_defined(TopologyKind::Mesh3d, id, &mesh.name, &mesh.counts())?;
        let encoded = encode_mesh3d(mesh)?;
        let store = self.store_mut();
        for ev in &encoded {
            store.write_data(&ev.var, &ev.data)?;
        }
        if self.defined[slot].written {
            debug!("overwrote mesh3d topology {id} data");
        } else {
            self.defined[slot].written = true;
            debug!("wrote mesh3d topology {id}");
        }
        Ok(())
    }

    /// Defines a new contact topology and returns its id.
    pub fn contacts_define(&mut self, contacts: &Contacts) -> Result<TopologyId, UgridError> {
        self.ensure_writable("contacts_define")?;
        contacts.validate()?;
        let counts = contacts.counts();
        let id = self.next_id(TopologyKind::Contacts)?;
        let schema = ContactsSchema::for_name(
            &contacts.name,
            &contacts.mesh_from_name,
            contacts.mesh_from_location,
            &contacts.mesh_to_name,
            contacts.mesh_to_location,
        );

        self.ensure_shared_dims()?;
        {
            let store = self.store_mut();
            store.def_dim(&schema.contact_dim, counts.num_contacts)?;
            // The topology variable doubles as the connectivity table.
            store.def_var(&schema.name, VarType::Int, &[schema.contact_dim.as_str(), TWO_DIM])?;
        }
        self.def_topology_attrs(
            &schema.name,
            attrs::attribute_names(TopologyKind::Contacts),
            &attrs::contacts_values(
                &contacts.name,
                &contacts.mesh_from_name,
                contacts.mesh_from_location,
                &contacts.mesh_to_name,
                contacts.mesh_to_location,
            ),
        )?;
        self.store_mut()
            .def_var(&schema.type_var, VarType::Int, &[schema.contact_dim.as_str()])?;
        self.def_name_var(&schema.id_var, &schema.contact_dim, false)?;
        self.def_name_var(&schema.long_name_var, &schema.contact_dim, true)?;

        self.defined.push(DefinedTopology {
            kind: TopologyKind::Contacts,
            id,
            name: contacts.name.clone(),
            counts,
            written: false,
        });
        debug!("defined contacts `{}` as topology {id}", contacts.name);
        Ok(id)
    }

    /// Writes the data of a previously defined contact topology.
    pub fn contacts_put(&mut self, id: TopologyId, contacts: &Contacts) -> Result<(), UgridError> {
        self.ensure_writable("contacts_put")?;
        contacts.validate()?;
        let slot = self.take_defined(
            TopologyKind::Contacts,
            id,
            &contacts.name,
            &contacts.counts(),
        )?;
        let encoded = encode_contacts(contacts)?;
        let store = self.store_mut();
        for ev in &encoded {
            store.write_data(&ev.var, &ev.data)?;
        }
        if self.defined[slot].written {
            debug!("overwrote contacts topology {id} data");
        } else {
            self.defined[slot].written = true;
            debug!("wrote contacts topology {id}");
        }
        Ok(())
    }
}

impl<S: MeshStore> Drop for UgridFile<S> {
    fn drop(&mut self) {
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.sync() {
                log::warn!("ugrid file close failed: {e}");
            }
        }
    }
}
