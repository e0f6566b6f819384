//! Integration tests for writing ZF3D containers and verifying round-trip.

use zf3d::container::{
    read_container, read_container_bytes, write_container, write_container_opts,
    write_container_to, ReadOptions, WriteOptions,
};
use zf3d::scene::{
    Attribute, CameraNode, MapDescriptor, MaterialDescriptor, MeshNode, NodeKind, SceneModel,
    SceneNode, SurfaceDescriptor, VertexBuffer,
};
use zf3d::util::{Bounds, Mat4, Vec2, Vec3};

use tempfile::NamedTempFile;

fn sample_model() -> SceneModel {
    let mut model = SceneModel::new();

    let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
    let body = SurfaceDescriptor::new("body", &[Attribute::Position, Attribute::Normal, Attribute::Uv0]);
    let glass = SurfaceDescriptor::new("glass", &[Attribute::Uv1, Attribute::Position]);
    model.surfaces.push(body);
    model.surfaces.push(glass);

    model.buffers.insert(
        "body".into(),
        VertexBuffer::new(3)
            .with(Attribute::Position, positions.clone())
            .with(Attribute::Normal, vec![Vec3::Z; 3])
            .with(Attribute::Uv0, vec![Vec2::ZERO, Vec2::X, Vec2::Y]),
    );
    model.buffers.insert(
        "glass".into(),
        VertexBuffer::new(2)
            .with(Attribute::Uv1, vec![Vec2::new(0.1, 0.2), Vec2::new(-0.0, f32::MIN_POSITIVE)])
            .with(Attribute::Position, vec![Vec3::new(1e-30, -2.5, 3.25), Vec3::splat(f32::MAX)]),
    );

    model.maps.push(MapDescriptor {
        id: "map0".into(),
        kind: "diffuse".into(),
        channel: 0,
        source: "textures/paint.png".into(),
        uv_repeat: Some(Vec2::new(2.0, 2.0)),
        ..Default::default()
    });
    model.materials.push(MaterialDescriptor {
        id: "mat0".into(),
        name: "Paint & Glass".into(),
        two_sided: true,
        opacity: Some(0.5),
        diffuse: vec![1.0, 0.0, 0.0],
        ..Default::default()
    });
    model.nodes.push(SceneNode {
        id: "n0".into(),
        name: "Car".into(),
        kind: NodeKind::Mesh(MeshNode {
            surfaces: vec!["body".into(), "glass".into()],
            materials: vec!["mat0".into(), "mat0".into()],
            bounds: Some(Bounds::from_points(&positions)),
        }),
        transform: Some(Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0))),
        extras: [("layer", "vehicles")].into_iter().collect(),
    });
    model.nodes.push(SceneNode {
        id: "c0".into(),
        name: "Main Camera".into(),
        kind: NodeKind::Camera(CameraNode {
            fov: Some(60.0),
            near: Some(0.1),
            far: Some(1000.0),
            active: true,
        }),
        transform: None,
        extras: Default::default(),
    });
    model
}

#[test]
fn test_roundtrip_bytes() {
    let model = sample_model();
    let bytes = write_container(&model).expect("Failed to write container");

    let read = read_container_bytes(&bytes, &ReadOptions::default()).expect("Failed to read back");
    assert!(read.is_complete());
    assert_eq!(read.model, model);
}

#[test]
fn test_roundtrip_is_bit_exact() {
    let model = sample_model();
    let bytes = write_container(&model).expect("Failed to write container");
    let back = read_container_bytes(&bytes, &ReadOptions::default())
        .and_then(|r| r.into_complete())
        .expect("Failed to read back");

    let original = model.buffer("glass").and_then(|b| b.uv(1)).expect("uv1");
    let decoded = back.buffer("glass").and_then(|b| b.uv(1)).expect("uv1");
    for (a, b) in original.iter().zip(decoded) {
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
    }
}

#[test]
fn test_roundtrip_all_compression_levels() {
    let model = sample_model();
    for level in 0..=9 {
        let opts = WriteOptions { compression_level: level };
        let bytes = write_container_opts(&model, &opts).expect("Failed to write container");
        let back = read_container_bytes(&bytes, &ReadOptions::default())
            .and_then(|r| r.into_complete())
            .expect("Failed to read back");
        assert_eq!(back, model, "level {}", level);
    }
}

#[test]
fn test_roundtrip_file() {
    let temp = NamedTempFile::new().expect("Failed to create temp file");
    let path = temp.path();

    let model = sample_model();
    write_container_to(path, &model, &WriteOptions::default()).expect("Failed to write file");

    let read = read_container(path).expect("Failed to open container");
    assert_eq!(read.surfaces.len(), 2);
    assert_eq!(read.surfaces[1].entry, "1.vertex");
    assert_eq!(read.model, model);
}

#[test]
fn test_rewrite_is_stable() {
    let first = write_container(&sample_model()).expect("Failed to write container");
    let model = read_container_bytes(&first, &ReadOptions::default())
        .and_then(|r| r.into_complete())
        .expect("Failed to read back");
    let second = write_container(&model).expect("Failed to re-write container");

    let again = read_container_bytes(&second, &ReadOptions::default())
        .and_then(|r| r.into_complete())
        .expect("Failed to read re-written container");
    assert_eq!(again, model);
}

#[test]
fn test_roundtrip_control_characters_in_text() {
    let mut model = sample_model();
    model.materials[0].name = "Line1\nLine2\tTab".into();
    model.maps[0].source = "dir\r\nfile.png".into();
    model.nodes[0].name = "\tindented\n".into();
    model.nodes[0].extras.insert("script", "if (a) {\n\treturn 'b';\n}");

    let bytes = write_container(&model).expect("Failed to write container");
    let back = read_container_bytes(&bytes, &ReadOptions::default())
        .and_then(|r| r.into_complete())
        .expect("Failed to read back");

    assert_eq!(back.materials[0].name, "Line1\nLine2\tTab");
    assert_eq!(back.nodes[0].extras.get("script"), Some("if (a) {\n\treturn 'b';\n}"));
    assert_eq!(back, model);
}
