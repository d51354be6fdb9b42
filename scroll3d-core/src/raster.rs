/// Depth-buffered software rasterizer shared by the terminal and web front ends
use nalgebra::Point3;

use crate::geometry::face_normal;
use crate::lighting::Lighting;
use crate::projection::{project_with, Camera};
use crate::scene::SceneGraph;
use crate::transform::Transform;

/// Colour and depth targets. Unwritten pixels stay transparent.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    depth: Vec<f32>,
    color: Vec<Option<[f32; 3]>>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth: vec![f32::INFINITY; size],
            color: vec![None; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth.fill(f32::INFINITY);
        self.color.fill(None);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[f32; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.color[y * self.width + x]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<[f32; 3]>]> {
        self.color.chunks(self.width.max(1))
    }

    /// Straight-alpha RGBA8 bytes, transparent where nothing was drawn
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.color.len() * 4);
        for pixel in &self.color {
            match pixel {
                Some([r, g, b]) => bytes.extend([to_byte(*r), to_byte(*g), to_byte(*b), 255]),
                None => bytes.extend([0, 0, 0, 0]),
            }
        }
        bytes
    }

    /// Fill one triangle given in screen space `(x, y, depth)`
    pub fn fill_triangle(&mut self, coords: &[(f32, f32, f32); 3], color: [f32; 3]) {
        let [v0, v1, v2] = *coords;

        // Bounding box clipped to the target
        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0) as i64;
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i64).min(self.width as i64 - 1);
        let min_y = v0.1.min(v1.1).min(v2.1).floor().max(0.0) as i64;
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i64).min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth[idx] {
                    self.depth[idx] = depth;
                    self.color[idx] = Some(color);
                }
            }
        }
    }
}

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Draw every mesh of `scene` into `target` as seen from `camera`
pub fn render_scene(scene: &SceneGraph, camera: &Camera, lighting: &Lighting, target: &mut Framebuffer) {
    target.clear();
    let view = camera.view_matrix();
    let (width, height) = (target.width() as u32, target.height() as u32);

    for (mesh, model) in scene.meshes() {
        let mvp = Transform::mvp_matrix(&model, &view, camera.projection_matrix());

        for triangle in &mesh.triangles {
            let world: [Point3<f32>; 3] = triangle.vertices.map(|v| model.transform_point(&v.position));
            let Some(normal) = face_normal(&world[0], &world[1], &world[2]) else {
                continue;
            };

            let mut screen = [(0.0, 0.0, 0.0); 3];
            let mut clipped = false;
            for (slot, vertex) in screen.iter_mut().zip(&triangle.vertices) {
                match project_with(&mvp, &vertex.position, width, height) {
                    Some(projected) => *slot = projected,
                    None => {
                        clipped = true;
                        break;
                    }
                }
            }
            if clipped {
                continue;
            }

            target.fill_triangle(&screen, lighting.shade(&normal, mesh.color));
        }
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
