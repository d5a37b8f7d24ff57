use std::io::Write;
use std::path::Path;

use coaster_core::{CoasterError, Result};
use coaster_math::{Aabb3, DVec3, Point3};
use coaster_mesh::TriangleMesh;
use serde::Serialize;

/// A named mesh in the scene
#[derive(Clone)]
pub struct SceneMesh {
    pub name: String,
    pub mesh: TriangleMesh,
    pub color: [f32; 3],
}

/// An instanced mesh group - one base geometry with multiple transform matrices
#[derive(Clone)]
pub struct InstancedGroup {
    pub name: String,
    pub mesh: TriangleMesh,
    pub color: [f32; 3],
    /// Each transform is a 4x4 matrix stored as [f32; 16] in column-major order
    pub transforms: Vec<[f32; 16]>,
}

/// Mesh data as embedded in the HTML page.
#[derive(Serialize)]
struct MeshPayload<'a> {
    name: &'a str,
    color: [f32; 3],
    positions: Vec<f32>,
    normals: Vec<f32>,
    indices: &'a [u32],
    #[serde(skip_serializing_if = "Option::is_none")]
    transforms: Option<&'a [[f32; 16]]>,
}

impl<'a> MeshPayload<'a> {
    fn new(name: &'a str, mesh: &'a TriangleMesh, color: [f32; 3], transforms: Option<&'a [[f32; 16]]>) -> Self {
        Self {
            name,
            color,
            positions: flatten(&mesh.positions),
            normals: flatten(&mesh.normals),
            indices: &mesh.indices,
            transforms,
        }
    }
}

#[derive(Serialize)]
struct ScenePayload<'a> {
    title: &'a str,
    meshes: Vec<MeshPayload<'a>>,
}

fn flatten(vectors: &[DVec3]) -> Vec<f32> {
    vectors.iter().flat_map(|v| v.as_vec3().to_array()).collect()
}

/// A 3D scene snapshot: static meshes plus instanced groups.
pub struct Scene {
    pub title: String,
    pub meshes: Vec<SceneMesh>,
    pub instanced_groups: Vec<InstancedGroup>,
}

impl Scene {
    /// Create a new empty scene
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            meshes: Vec::new(),
            instanced_groups: Vec::new(),
        }
    }

    /// Add a mesh with a name and color
    pub fn add_mesh(&mut self, name: &str, mesh: TriangleMesh, color: [f32; 3]) {
        self.meshes.push(SceneMesh {
            name: name.to_string(),
            mesh,
            color,
        });
    }

    /// Add an instanced group (one base geometry with multiple placements)
    pub fn add_instanced_group(&mut self, name: &str, mesh: TriangleMesh, color: [f32; 3], transforms: Vec<[f32; 16]>) {
        self.instanced_groups.push(InstancedGroup {
            name: name.to_string(),
            mesh,
            color,
            transforms,
        });
    }

    /// Bounding box of the static meshes and every placed instance.
    pub fn bounds(&self) -> Option<Aabb3> {
        let statics = self.meshes.iter().flat_map(|m| m.mesh.positions.iter().copied());
        let instances = self.instanced_groups.iter().flat_map(|g| {
            g.transforms.iter().flat_map(move |cols| {
                let m = coaster_math::DMat4::from_cols_array(&cols.map(f64::from));
                g.mesh.positions.iter().map(move |&p| m.transform_point3(p))
            })
        });
        Aabb3::from_points(statics.chain(instances))
    }

    /// Total triangle count, counting every instance.
    pub fn total_triangles(&self) -> usize {
        let statics: usize = self.meshes.iter().map(|m| m.mesh.triangle_count()).sum();
        let instanced: usize = self
            .instanced_groups
            .iter()
            .map(|g| g.mesh.triangle_count() * g.transforms.len())
            .sum();
        statics + instanced
    }

    /// Scene data as the JSON document embedded in the HTML export.
    pub fn to_json(&self) -> Result<String> {
        let meshes = self
            .meshes
            .iter()
            .map(|m| MeshPayload::new(&m.name, &m.mesh, m.color, None))
            .chain(
                self.instanced_groups
                    .iter()
                    .map(|g| MeshPayload::new(&g.name, &g.mesh, g.color, Some(&g.transforms))),
            )
            .collect();
        let payload = ScenePayload {
            title: &self.title,
            meshes,
        };
        serde_json::to_string(&payload).map_err(|e| CoasterError::Parse(e.to_string()))
    }

    /// Export scene as a standalone HTML file with embedded Three.js viewer
    pub fn export_html(&self, path: &Path) -> Result<()> {
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        self.write_html(&mut file)?;
        file.flush()?;
        Ok(())
    }

    pub fn write_html<W: Write>(&self, out: &mut W) -> Result<()> {
        let bounds = self
            .bounds()
            .unwrap_or_else(|| Aabb3::new(Point3::ZERO, DVec3::splat(1.0)));
        let center = bounds.center();
        let camera_distance = bounds.diagonal().max(1.0) * 1.2;
        let data = self.to_json()?;

        write!(out, r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ margin: 0; overflow: hidden; font-family: sans-serif; background: #87ceeb; }}
        #container {{ width: 100vw; height: 100vh; }}
        #info {{
            position: absolute; top: 10px; left: 10px;
            background: rgba(0, 0, 0, 0.6); color: white;
            padding: 12px; border-radius: 5px; font-size: 14px;
        }}
        #error {{
            position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%);
            background: rgba(200, 0, 0, 0.9); color: white;
            padding: 20px; border-radius: 5px; display: none;
        }}
    </style>
</head>
<body>
    <div id="container"></div>
    <div id="info">
        <div><b>{title}</b></div>
        <div>Meshes: {mesh_count}</div>
        <div>Instances: {instance_count}</div>
        <div>Triangles: {triangles}</div>
    </div>
    <div id="error">Failed to load Three.js from CDN. Please check your internet connection.</div>

    <script src="https://cdnjs.cloudflare.com/ajax/libs/three.js/r128/three.min.js"></script>
    <script id="scene-data" type="application/json">{data}</script>
    <script>
        if (typeof THREE === 'undefined') document.getElementById('error').style.display = 'block';
"#,
            title = self.title,
            mesh_count = self.meshes.len() + self.instanced_groups.len(),
            instance_count = self.instanced_groups.iter().map(|g| g.transforms.len()).sum::<usize>(),
            triangles = self.total_triangles(),
            data = data,
        )?;

        write!(out, r#"        function initScene() {{
            const sceneData = JSON.parse(document.getElementById('scene-data').textContent);
            const scene = new THREE.Scene();
            scene.background = new THREE.Color(0x87ceeb);

            const camera = new THREE.PerspectiveCamera(60, window.innerWidth / window.innerHeight, 0.1, 10000);
            const renderer = new THREE.WebGLRenderer({{ antialias: true }});
            renderer.setSize(window.innerWidth, window.innerHeight);
            document.getElementById('container').appendChild(renderer.domElement);

            scene.add(new THREE.AmbientLight(0x404040, 2));
            const sun = new THREE.DirectionalLight(0xffffff, 1);
            sun.position.set(1, 2, 1);
            scene.add(sun);

            sceneData.meshes.forEach(data => {{
                const geometry = new THREE.BufferGeometry();
                geometry.setAttribute('position', new THREE.Float32BufferAttribute(data.positions, 3));
                geometry.setAttribute('normal', new THREE.Float32BufferAttribute(data.normals, 3));
                geometry.setIndex(data.indices);
                const material = new THREE.MeshPhongMaterial({{
                    color: new THREE.Color(data.color[0], data.color[1], data.color[2]),
                    shininess: 30
                }});
                if (data.transforms) {{
                    const mesh = new THREE.InstancedMesh(geometry, material, data.transforms.length);
                    const m = new THREE.Matrix4();
                    data.transforms.forEach((cols, i) => {{ m.fromArray(cols); mesh.setMatrixAt(i, m); }});
                    scene.add(mesh);
                }} else {{
                    scene.add(new THREE.Mesh(geometry, material));
                }}
            }});

            const gridSize = {grid:.2};
            const grid = new THREE.GridHelper(gridSize * 2, 20, 0x444444, 0x888888);
            grid.position.y = {floor:.2};
            scene.add(grid);

            const center = new THREE.Vector3({cx:.2}, {cy:.2}, {cz:.2});
            let theta = Math.PI / 4;
            let phi = Math.PI / 3;
            let radius = {distance:.2};
            let dragging = false;
            let last = {{ x: 0, y: 0 }};

            function updateCameraPosition() {{
                camera.position.x = center.x + radius * Math.sin(phi) * Math.cos(theta);
                camera.position.y = center.y + radius * Math.cos(phi);
                camera.position.z = center.z + radius * Math.sin(phi) * Math.sin(theta);
                camera.lookAt(center);
            }}
            updateCameraPosition();

            renderer.domElement.addEventListener('mousedown', e => {{ dragging = true; last = {{ x: e.clientX, y: e.clientY }}; }});
            renderer.domElement.addEventListener('mouseup', () => {{ dragging = false; }});
            renderer.domElement.addEventListener('mousemove', e => {{
                if (!dragging) return;
                theta -= (e.clientX - last.x) * 0.01;
                phi = Math.max(0.1, Math.min(Math.PI - 0.1, phi + (e.clientY - last.y) * 0.01));
                last = {{ x: e.clientX, y: e.clientY }};
                updateCameraPosition();
            }});
            renderer.domElement.addEventListener('wheel', e => {{
                e.preventDefault();
                radius = Math.max(1, radius + e.deltaY * 0.01);
                updateCameraPosition();
            }});
            window.addEventListener('resize', () => {{
                camera.aspect = window.innerWidth / window.innerHeight;
                camera.updateProjectionMatrix();
                renderer.setSize(window.innerWidth, window.innerHeight);
            }});

            function animate() {{
                requestAnimationFrame(animate);
                renderer.render(scene, camera);
            }}
            animate();
        }}

        if (typeof THREE !== 'undefined') initScene();
    </script>
</body>
</html>
"#,
            grid = bounds.diagonal().max(10.0),
            floor = bounds.min.y,
            cx = center.x,
            cy = center.y,
            cz = center.z,
            distance = camera_distance,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coaster_math::Transform;

    fn create_test_triangle() -> TriangleMesh {
        let mut mesh = TriangleMesh {
            positions: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            normals: vec![],
            indices: vec![0, 1, 2],
            uvs: vec![],
        };
        mesh.compute_normals();
        mesh
    }

    #[test]
    fn test_empty_scene() {
        let scene = Scene::new("empty");
        assert!(scene.bounds().is_none());
        assert_eq!(scene.total_triangles(), 0);
    }

    #[test]
    fn test_instances_count_towards_bounds_and_triangles() {
        let mut scene = Scene::new("test");
        scene.add_mesh("tri", create_test_triangle(), [1.0, 0.0, 0.0]);
        let moved = Transform::from_translation(DVec3::new(10.0, 0.0, 0.0)).to_cols_f32();
        scene.add_instanced_group(
            "copies",
            create_test_triangle(),
            [0.0, 1.0, 0.0],
            vec![Transform::identity().to_cols_f32(), moved],
        );

        assert_eq!(scene.total_triangles(), 3);
        let bounds = scene.bounds().unwrap();
        assert!((bounds.max.x - 11.0).abs() < 1e-6);
    }

    #[test]
    fn test_json_payload() {
        let mut scene = Scene::new("payload");
        scene.add_mesh("tri", create_test_triangle(), [1.0, 0.0, 0.0]);
        scene.add_instanced_group("cars", create_test_triangle(), [0.0, 0.0, 1.0], vec![[0.0; 16]]);

        let value: serde_json::Value = serde_json::from_str(&scene.to_json().unwrap()).unwrap();
        let meshes = value["meshes"].as_array().unwrap();
        assert_eq!(meshes.len(), 2);
        assert_eq!(meshes[0]["positions"].as_array().unwrap().len(), 9);
        assert!(meshes[0].get("transforms").is_none());
        assert_eq!(meshes[1]["transforms"][0].as_array().unwrap().len(), 16);
    }

    #[test]
    fn test_html_export() {
        let mut scene = Scene::new("Coaster");
        scene.add_mesh("tri", create_test_triangle(), [1.0, 0.0, 0.0]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.html");
        scene.export_html(&path).unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("THREE.InstancedMesh"));
        assert!(html.contains("\"name\":\"tri\""));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
