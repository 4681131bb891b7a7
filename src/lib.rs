//! # ugrid-store
//!
//! ugrid-store is a topology storage engine for unstructured-mesh data
//! following the UGRID convention: 1D networks, 1D/2D/3D meshes, and
//! contact topologies stored in a self-describing gridded-data file. It
//! covers schema inquiry (cheap shape probes before allocation), the
//! encode/decode engine between flat on-disk buffers and structured
//! entities (fixed-width name tables, jagged fill-padded connectivity,
//! spherical coordinate units), and the two-phase define/put write
//! transaction.
//!
//! The low-level array format is abstracted behind the
//! [`store::MeshStore`] trait; an in-memory backend ships by default and a
//! real netCDF adapter is available behind the `netcdf` feature.
//!
//! ## Usage
//!
//! ```rust
//! use ugrid_store::prelude::*;
//!
//! # fn try_main() -> Result<(), ugrid_store::UgridError> {
//! let mut file = UgridFile::create_in_memory();
//! let mesh = Mesh2d {
//!     name: "mesh2d".into(),
//!     node_x: vec![0.0, 1.0, 1.0, 0.0],
//!     node_y: vec![0.0, 0.0, 1.0, 1.0],
//!     edge_node: vec![0, 1, 1, 2, 2, 3, 3, 0],
//!     face_x: vec![0.5],
//!     face_y: vec![0.5],
//!     face_node: vec![0, 1, 2, 3],
//!     ..Mesh2d::default()
//! };
//! let id = file.mesh2d_define(&mesh)?;
//! file.mesh2d_put(id, &mesh)?;
//! let round_tripped = file.mesh2d_get(id)?;
//! assert_eq!(round_tripped.node_x, mesh.node_x);
//! file.close()?;
//! # Ok(())
//! # }
//! # try_main().unwrap();
//! ```
//!
//! ## Concurrency
//!
//! Every operation is a synchronous, blocking call. A single
//! [`UgridFile`] must not be shared across threads without external
//! serialization; independent files can be used concurrently without
//! coordination.

pub mod attrs;
pub mod codec;
pub mod error;
pub mod file;
pub mod store;
pub mod topology;

pub use error::UgridError;
pub use file::UgridFile;
pub use store::{InMemoryStore, MeshStore, OpenMode};
pub use topology::{
    Contacts, Location, Mesh1d, Mesh2d, Mesh3d, Network1d, TopologyCounts, TopologyId,
    TopologyKind,
};

/// A convenient prelude importing the most-used types.
pub mod prelude {
    pub use crate::error::UgridError;
    pub use crate::file::UgridFile;
    pub use crate::store::{InMemoryStore, MeshStore, OpenMode};
    pub use crate::topology::{
        Contacts, Location, Mesh1d, Mesh2d, Mesh3d, Network1d, TopologyCounts, TopologyId,
        TopologyKind,
    };
}
