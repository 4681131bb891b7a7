//! Protocol tests for the two-phase define/put transaction and the
//! read-mode guard.

use ugrid_store::prelude::*;
use ugrid_store::UgridError;

fn quad() -> Mesh2d {
    Mesh2d {
        name: "mesh2d".into(),
        node_x: vec![0.0, 1.0, 1.0, 0.0],
        node_y: vec![0.0, 0.0, 1.0, 1.0],
        edge_node: vec![0, 1, 1, 2, 2, 3, 3, 0],
        face_x: vec![0.5],
        face_y: vec![0.5],
        face_node: vec![0, 1, 2, 3],
        ..Mesh2d::default()
    }
}

#[test]
fn put_with_foreign_id_fails_not_defined() {
    let mut file = UgridFile::create_in_memory();
    let mesh = quad();
    // An id never returned by define in this session.
    let err = file.mesh2d_put(TopologyId::new(5), &mesh).unwrap_err();
    assert!(matches!(
        err,
        UgridError::NotDefined { kind: TopologyKind::Mesh2d, .. }
    ));
}

#[test]
fn put_only_works_after_define_in_same_session() {
    // Write a topology, then reopen the store: the on-disk topology
    // exists, but the define ledger is per session.
    let mut file = UgridFile::create_in_memory();
    let mesh = quad();
    let id = file.mesh2d_define(&mesh).unwrap();
    file.mesh2d_put(id, &mesh).unwrap();

    let mut reopened = UgridFile::open(file.into_store(), OpenMode::Write);
    assert_eq!(reopened.topology_count(TopologyKind::Mesh2d).unwrap(), 1);
    assert!(matches!(
        reopened.mesh2d_put(id, &mesh),
        Err(UgridError::NotDefined { .. })
    ));
}

#[test]
fn read_mode_blocks_every_write_operation() {
    let mut file = UgridFile::create_in_memory();
    let mesh = quad();
    let id = file.mesh2d_define(&mesh).unwrap();
    file.mesh2d_put(id, &mesh).unwrap();

    let mut readonly = UgridFile::open(file.into_store(), OpenMode::Read);
    assert!(matches!(
        readonly.mesh2d_define(&quad()),
        Err(UgridError::WriteNotPermitted { .. })
    ));
    assert!(matches!(
        readonly.mesh2d_put(id, &quad()),
        Err(UgridError::WriteNotPermitted { .. })
    ));
    assert!(matches!(
        readonly.network1d_define(&Network1d::default()),
        Err(UgridError::WriteNotPermitted { .. })
    ));
    // Reads still work.
    assert_eq!(readonly.mesh2d_get(id).unwrap().name, "mesh2d");
}

#[test]
fn shape_drift_between_define_and_put_is_rejected() {
    let mut file = UgridFile::create_in_memory();
    let mesh = quad();
    let id = file.mesh2d_define(&mesh).unwrap();

    let mut drifted = mesh.clone();
    drifted.edge_node.extend([0, 2]);
    let err = file.mesh2d_put(id, &drifted).unwrap_err();
    assert!(matches!(err, UgridError::DimensionMismatch { .. }));

    // The original shape still goes through afterwards.
    file.mesh2d_put(id, &mesh).unwrap();
}

#[test]
fn renamed_entity_cannot_be_put_into_another_slot() {
    let mut file = UgridFile::create_in_memory();
    let mesh = quad();
    let id = file.mesh2d_define(&mesh).unwrap();
    let mut renamed = mesh.clone();
    renamed.name = "other".into();
    assert!(matches!(
        file.mesh2d_put(id, &renamed),
        Err(UgridError::DimensionMismatch { .. })
    ));
}

#[test]
fn define_is_rejected_for_inconsistent_entities() {
    let mut file = UgridFile::create_in_memory();
    let mut mesh = quad();
    mesh.node_y.pop();
    assert!(matches!(
        file.mesh2d_define(&mesh),
        Err(UgridError::InconsistentDimensions(_))
    ));
    // Nothing was registered by the failed define.
    assert_eq!(file.topology_count(TopologyKind::Mesh2d).unwrap(), 0);
}

#[test]
fn inquiry_never_touches_bulk_data() {
    let mut file = UgridFile::create_in_memory();
    let mesh = quad();
    let id = file.mesh2d_define(&mesh).unwrap();
    file.mesh2d_put(id, &mesh).unwrap();

    let file = UgridFile::open(file.into_store(), OpenMode::Read);
    let before = file.store().bulk_reads();
    let _ = file.topology_count(TopologyKind::Mesh2d).unwrap();
    let counts = file.inquire(TopologyKind::Mesh2d, id).unwrap();
    let _ = file.topology_attribute_values(TopologyKind::Mesh2d, id).unwrap();
    assert_eq!(
        file.store().bulk_reads(),
        before,
        "inquiry must be a pure schema probe"
    );
    assert_eq!(counts.num_nodes, 4);

    // A get, by contrast, must hit the bulk reader.
    let _ = file.mesh2d_get(id).unwrap();
    assert!(file.store().bulk_reads() > before);
}

#[test]
fn each_kind_counts_independently() {
    let mut file = UgridFile::create_in_memory();
    let mesh = quad();
    let mesh_id = file.mesh2d_define(&mesh).unwrap();

    let network = Network1d {
        name: "network1d".into(),
        node_x: vec![0.0, 1.0],
        node_y: vec![0.0, 0.0],
        node_name_id: vec!["a".into(), "b".into()],
        node_name_long: vec!["node a".into(), "node b".into()],
        branch_node: vec![0, 1],
        branch_length: vec![1.0],
        branch_order: vec![0],
        branch_name_id: vec!["ab".into()],
        branch_name_long: vec!["a to b".into()],
        geometry_node_x: vec![0.0, 1.0],
        geometry_node_y: vec![0.0, 0.0],
        geometry_node_count: vec![2],
        ..Network1d::default()
    };
    let network_id = file.network1d_define(&network).unwrap();

    // Ids are scoped per kind: both start at zero.
    assert_eq!(mesh_id, TopologyId::new(0));
    assert_eq!(network_id, TopologyId::new(0));
    assert_eq!(file.topology_count(TopologyKind::Mesh2d).unwrap(), 1);
    assert_eq!(file.topology_count(TopologyKind::Network1d).unwrap(), 1);
    assert_eq!(file.topology_count(TopologyKind::Mesh1d).unwrap(), 0);
}
