//! UgridError: unified error type for the ugrid-store public API.
//!
//! Every fallible operation in this crate returns `Result<_, UgridError>`.
//! Backend failures from a [`crate::store::MeshStore`] implementation are
//! wrapped in [`UgridError::Store`] and carry the underlying message, so no
//! error is ever silently swallowed. Precondition-class failures
//! ([`UgridError::NotDefined`], [`UgridError::WriteNotPermitted`]) get their
//! own variants so callers can tell a programming bug apart from a runtime
//! I/O failure.

use thiserror::Error;

use crate::store::StoreError;
use crate::topology::{TopologyId, TopologyKind};

/// Unified error type for ugrid-store operations.
#[derive(Debug, Error)]
pub enum UgridError {
    /// The underlying file could not be opened.
    #[error("could not open `{path}`: {reason}")]
    Open {
        /// Path of the file that failed to open.
        path: String,
        /// Backend-reported reason.
        reason: String,
    },
    /// The underlying file could not be flushed or finalized on close.
    #[error("could not close file: {0}")]
    Close(String),
    /// A topology index was out of range for the file's topology count.
    #[error("no {kind} topology with index {id}; file holds {count}")]
    TopologyNotFound {
        /// Requested topology kind.
        kind: TopologyKind,
        /// Requested (out-of-range) index.
        id: TopologyId,
        /// Number of topologies of this kind actually present.
        count: usize,
    },
    /// A variable's attributes match no registered topology kind.
    #[error("variable `{var}` describes no known topology kind: {reason}")]
    UnknownTopologyKind {
        /// Name of the offending variable.
        var: String,
        /// What made the classification fail.
        reason: String,
    },
    /// A fixed-width name buffer could not be decoded as ASCII text.
    #[error("name decoding failed: {0}")]
    Decoding(String),
    /// A name exceeds the fixed stride it must be encoded into.
    #[error("name `{name}` is {len} bytes, fixed width is {stride}")]
    NameTooLong {
        /// The offending name.
        name: String,
        /// Its byte length.
        len: usize,
        /// The fixed width it had to fit in.
        stride: usize,
    },
    /// An entity's internal arrays disagree with each other.
    #[error("inconsistent entity dimensions: {0}")]
    InconsistentDimensions(String),
    /// An entity's shape disagrees with the schema frozen at define time.
    #[error("{kind} topology {id}: entity shape disagrees with the defined schema: {reason}")]
    DimensionMismatch {
        /// Topology kind being written.
        kind: TopologyKind,
        /// Topology index being written.
        id: TopologyId,
        /// Which count drifted and how.
        reason: String,
    },
    /// `put` was called for a topology never defined in this session.
    #[error("{kind} topology {id} was not defined in this session; define must precede put")]
    NotDefined {
        /// Topology kind of the attempted write.
        kind: TopologyKind,
        /// Topology index of the attempted write.
        id: TopologyId,
    },
    /// A write operation was attempted on a read-only handle.
    #[error("file is open read-only; {op} requires a writable mode")]
    WriteNotPermitted {
        /// The operation that was refused.
        op: &'static str,
    },
    /// A topology variable exists but its schema attributes are unusable.
    #[error("malformed topology schema on `{var}`: {reason}")]
    MalformedSchema {
        /// The topology variable with the broken schema.
        var: String,
        /// What was missing or inconsistent.
        reason: String,
    },
    /// Any failure reported by the underlying storage backend.
    #[error("storage backend error: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let e = UgridError::TopologyNotFound {
            kind: TopologyKind::Mesh2d,
            id: TopologyId::new(3),
            count: 1,
        };
        assert_eq!(e.to_string(), "no mesh2d topology with index 3; file holds 1");

        let e = UgridError::NameTooLong {
            name: "x".repeat(41),
            len: 41,
            stride: 40,
        };
        assert!(e.to_string().contains("41 bytes"));
    }

    #[test]
    fn store_errors_wrap_with_message() {
        let e: UgridError = StoreError::UnknownVariable("mesh2d_node_x".into()).into();
        assert!(matches!(e, UgridError::Store(_)));
        assert!(e.to_string().contains("mesh2d_node_x"));
    }
}
