//! Contact topology: named links between entities of two other
//! topologies in the same file (for example mesh1d nodes to mesh2d faces).

use crate::error::UgridError;
use crate::topology::{Location, TopologyCounts};

/// A set of contact links between two topologies.
///
/// `edges` stores flat (from-index, to-index) pairs; each index addresses
/// an entity of the respective topology at its declared location. As
/// everywhere else, indices are copied verbatim and never rebased.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Contacts {
    /// Topology name; prefixes every derived variable and dimension name.
    pub name: String,
    /// Name of the topology the links originate from.
    pub mesh_from_name: String,
    /// Name of the topology the links point into.
    pub mesh_to_name: String,
    /// Location addressed on the originating topology.
    pub mesh_from_location: Location,
    /// Location addressed on the target topology.
    pub mesh_to_location: Location,
    /// Contact links as flat ordered pairs, `2 * num_contacts` long.
    pub edges: Vec<i64>,
    /// Application-defined contact type per link.
    pub contact_type: Vec<i64>,
    /// Short contact ids, one per link.
    pub contact_name_id: Vec<String>,
    /// Long descriptive contact names, one per link.
    pub contact_name_long: Vec<String>,
}

impl Contacts {
    /// Dimension sizes derived from the entity's arrays.
    pub fn counts(&self) -> TopologyCounts {
        TopologyCounts {
            num_contacts: self.edges.len() / 2,
            ..TopologyCounts::default()
        }
    }

    /// Checks the entity's internal shape invariants.
    pub fn validate(&self) -> Result<(), UgridError> {
        if self.edges.len() % 2 != 0 {
            return Err(UgridError::InconsistentDimensions(format!(
                "contact edges hold {} entries, expected flat pairs",
                self.edges.len()
            )));
        }
        let contacts = self.edges.len() / 2;
        for (what, len) in [
            ("contact_type", self.contact_type.len()),
            ("contact_name_id", self.contact_name_id.len()),
            ("contact_name_long", self.contact_name_long.len()),
        ] {
            if len != contacts {
                return Err(UgridError::InconsistentDimensions(format!(
                    "{what} has {len} entries, expected num_contacts {contacts}"
                )));
            }
        }
        if self.mesh_from_name.is_empty() || self.mesh_to_name.is_empty() {
            return Err(UgridError::InconsistentDimensions(
                "contact topologies must name both linked meshes".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> Contacts {
        Contacts {
            name: "contacts".into(),
            mesh_from_name: "mesh1d".into(),
            mesh_to_name: "mesh2d".into(),
            mesh_from_location: Location::Node,
            mesh_to_location: Location::Face,
            edges: vec![0, 0, 1, 3, 2, 8],
            contact_type: vec![3, 3, 3],
            contact_name_id: vec!["linkids".into(); 3],
            contact_name_long: vec!["linklongnames".into(); 3],
        }
    }

    #[test]
    fn counts_follow_arrays() {
        assert_eq!(links().counts().num_contacts, 3);
    }

    #[test]
    fn validate_accepts_links() {
        assert!(links().validate().is_ok());
    }

    #[test]
    fn validate_rejects_type_drift() {
        let mut c = links();
        c.contact_type.pop();
        assert!(matches!(
            c.validate(),
            Err(UgridError::InconsistentDimensions(_))
        ));
    }

    #[test]
    fn validate_requires_mesh_names() {
        let mut c = links();
        c.mesh_to_name.clear();
        assert!(c.validate().is_err());
    }
}
