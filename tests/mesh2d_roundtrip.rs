//! End-to-end Mesh2d round trip: define + put into a fresh file, reopen
//! read-only, and read everything back.

use ugrid_store::prelude::*;

/// 4x4-node, 24-edge, 9-face quad mesh with 1-based connectivity.
fn create_mesh2d() -> Mesh2d {
    let node_x = vec![
        0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 2.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0, 3.0,
    ];
    let node_y = vec![
        0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 0.0, 1.0, 2.0, 3.0, 0.0, 1.0, 2.0, 3.0,
    ];
    let edge_node = vec![
        1, 2, 3, 4, 5, 6, 7, 8, 2, 9, 4, 10, 6, 11, 8, 12, 9, 13, 10, 14, 11, 15, 12, 16, 1, 3,
        3, 5, 5, 7, 2, 4, 4, 6, 6, 8, 9, 10, 10, 11, 11, 12, 13, 14, 14, 15, 15, 16,
    ];
    let face_x = vec![0.5, 0.5, 0.5, 1.5, 1.5, 1.5, 2.5, 2.5, 2.5];
    let face_y = vec![0.5, 1.5, 2.5, 0.5, 1.5, 2.5, 0.5, 1.5, 2.5];
    let face_node = vec![
        1, 2, 4, 3, 3, 4, 6, 5, 5, 6, 8, 7, 2, 9, 10, 4, 4, 10, 11, 6, 6, 11, 12, 8, 9, 13, 14,
        10, 10, 14, 15, 11, 11, 15, 16, 12,
    ];
    Mesh2d {
        name: "mesh2d".into(),
        node_x,
        node_y,
        edge_node,
        face_x,
        face_y,
        face_node,
        is_spherical: false,
        start_index: 1,
        ..Mesh2d::default()
    }
}

#[test]
fn define_put_read_back() {
    let mesh = create_mesh2d();

    let mut file = UgridFile::create_in_memory();
    let id = file.mesh2d_define(&mesh).expect("define mesh2d");
    assert_eq!(id, TopologyId::new(0));
    file.mesh2d_put(id, &mesh).expect("put mesh2d");

    // Reopen the same store read-only, the way a consumer would.
    let file = UgridFile::open(file.into_store(), OpenMode::Read);
    let count = file.topology_count(TopologyKind::Mesh2d).expect("count");
    assert_eq!(count, 1);

    let read = file
        .mesh2d_get(TopologyId::new(count as u32 - 1))
        .expect("get mesh2d");

    assert_eq!(read.name, mesh.name);
    assert_eq!(read.node_x, mesh.node_x);
    assert_eq!(read.node_y, mesh.node_y);
    assert_eq!(read.edge_node, mesh.edge_node);
    assert_eq!(read.face_x, mesh.face_x);
    assert_eq!(read.face_y, mesh.face_y);
    assert_eq!(read.face_node, mesh.face_node);
    assert_eq!(read.start_index, 1, "index base must survive verbatim");
    assert!(!read.is_spherical);

    file.close().expect("close");
}

#[test]
fn inquiry_matches_written_shape() {
    let mesh = create_mesh2d();
    let mut file = UgridFile::create_in_memory();
    let id = file.mesh2d_define(&mesh).unwrap();
    file.mesh2d_put(id, &mesh).unwrap();

    let counts = file.inquire(TopologyKind::Mesh2d, id).unwrap();
    assert_eq!(counts.num_nodes, 16);
    assert_eq!(counts.num_edges, 24);
    assert_eq!(counts.num_faces, 9);
    assert_eq!(counts.max_face_nodes, 4);
    assert_eq!(counts.num_volumes, 0);
}

#[test]
fn written_attributes_match_the_catalog() {
    let mesh = create_mesh2d();
    let mut file = UgridFile::create_in_memory();
    let id = file.mesh2d_define(&mesh).unwrap();
    file.mesh2d_put(id, &mesh).unwrap();

    let names = ugrid_store::attrs::attribute_names(TopologyKind::Mesh2d);
    assert_eq!(
        names,
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

    let values = file.topology_attribute_values(TopologyKind::Mesh2d, id).unwrap();
    assert_eq!(
        values,
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

    // Reading twice yields the identical sequence, and both match the
    // catalog's derived values.
    let again = file.topology_attribute_values(TopologyKind::Mesh2d, id).unwrap();
    assert_eq!(values, again);
    assert_eq!(values, ugrid_store::attrs::mesh2d_values("mesh2d"));
}

#[test]
fn spherical_flag_survives_round_trip() {
    let mut mesh = create_mesh2d();
    mesh.is_spherical = true;
    let mut file = UgridFile::create_in_memory();
    let id = file.mesh2d_define(&mesh).unwrap();
    file.mesh2d_put(id, &mesh).unwrap();
    assert!(file.mesh2d_get(id).unwrap().is_spherical);
}

#[test]
fn faceless_mesh_round_trips_as_empty_sequences() {
    let mesh = Mesh2d {
        name: "outline".into(),
        node_x: vec![0.0, 1.0, 2.0],
        node_y: vec![0.0, 0.0, 0.0],
        edge_node: vec![0, 1, 1, 2],
        ..Mesh2d::default()
    };
    let mut file = UgridFile::create_in_memory();
    let id = file.mesh2d_define(&mesh).unwrap();
    file.mesh2d_put(id, &mesh).unwrap();

    let read = file.mesh2d_get(id).unwrap();
    assert!(read.face_x.is_empty());
    assert!(read.face_node.is_empty());
    assert_eq!(read.edge_node, mesh.edge_node);
}
