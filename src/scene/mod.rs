//! The desk still life: textures, materials, lights, and the draw list.

use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use nalgebra::Vector3;

use crate::{config::AssetConfig, render::RenderState};

pub mod draw;
pub mod lights;
pub mod objects;
pub mod registry;
pub mod transform;

use draw::{DrawCommand, DrawRecorder, Shape};
use lights::LightRig;
use objects::*;
use registry::{MaterialRegistry, ObjectMaterial, TextureLookup};

/// Image file and tag of every texture the scene samples.
pub const SCENE_TEXTURES: &[(&str, &str)] = &[
    ("Porcelain.jpg", "cup"),
    ("Wood1.jpg", "table-top"),
    ("Wood2.png", "table-side"),
    ("Metal.jpg", "base"),
    ("Wood3.jpg", "WoodFloor"),
    ("BlackSteel.png", "lamp-rim"),
    ("WhiteCloth.jpg", "lamp-shade"),
    ("Wall.jpg", "wall"),
    ("WhitePlastic.jpg", "plastic"),
    ("BookSpine.png", "BookSpine"),
    ("BookBack.png", "BookBack"),
    ("BookFront.png", "BookFront"),
    ("Pages.png", "Pages"),
];

pub const BOOK_COUNT: usize = 8;
pub const BOOK_SPACING: f32 = 0.25;

pub fn define_object_materials(materials: &mut MaterialRegistry) {
    materials.define(ObjectMaterial::new("plastic", [0.9; 3], [0.1; 3], 1.0));
    materials.define(ObjectMaterial::new("wood", [1.0; 3], [0.1; 3], 5.0));
    materials.define(ObjectMaterial::new("woodFloor", [1.0; 3], [0.1; 3], 0.2));
    materials.define(ObjectMaterial::new("porcelain", [0.2; 3], [0.8, 0.8, 0.9], 32.0));
    materials.define(ObjectMaterial::new("metal", [0.3, 0.3, 0.2], [0.7, 0.7, 0.8], 8.0));
    materials.define(ObjectMaterial::new("cloth", [10.0; 3], [0.3; 3], 2.0));
    materials.define(ObjectMaterial::new("wall", [0.4; 3], [0.3; 3], 1.0));
    materials.define(ObjectMaterial::new("BookCover", [0.5, 0.1, 0.1], [0.6; 3], 16.0));
}

/// Records every draw of the scene, in painting order.
pub fn render_scene<L: TextureLookup>(textures: &L, materials: &MaterialRegistry) -> Vec<DrawCommand> {
    let mut rec = DrawRecorder::new(textures, materials);
    load_room(&mut rec);
    load_coffee_cup(&mut rec);
    load_desk(&mut rec);
    load_lamp(&mut rec, Vector3::new(0.25, 0.0, -0.2));
    load_monitor(&mut rec, Vector3::new(-0.5, 1.4, -6.5));
    load_keyboard(&mut rec, Vector3::new(-0.5, 0.0, -3.5));
    load_mouse(&mut rec, Vector3::new(2.0, -0.1, -3.4));
    load_phone(&mut rec, Vector3::new(2.7, 0.0, -3.9));
    for i in 0..BOOK_COUNT {
        let x = 2.0 + BOOK_SPACING * i as f32;
        load_book(&mut rec, Vector3::new(x, 0.25, -6.35), Vector3::zeros());
    }
    // the last one leans against the row
    load_book(
        &mut rec,
        Vector3::new(1.68, 0.25, -6.35),
        Vector3::new(0.0, 0.0, -7.5),
    );
    rec.finish()
}

#[derive(Debug, Default)]
pub struct SceneManager {
    pub materials: MaterialRegistry,
    pub lights: LightRig,
}

impl SceneManager {
    /// Loads textures, meshes, materials and lights, then records and
    /// uploads the draw list.
    pub fn prepare_scene(&mut self, render: &mut RenderState, assets: &AssetConfig) -> Result<()> {
        self.load_scene_textures(render, &assets.texture_dir);
        render
            .textures
            .bind_textures(&render.device)
            .context("failed to bind scene textures")?;

        for shape in Shape::ALL {
            render.meshes.load_mesh(&render.device, shape)?;
        }

        define_object_materials(&mut self.materials);
        self.lights.setup_scene_lights();
        render.lights = self.lights.clone();

        let draws = render_scene(&render.textures, &self.materials);
        info!(
            "scene: {} textures, {} materials, {} lights, {} draws",
            render.textures.registry().len(),
            self.materials.len(),
            self.lights.active_lights().count(),
            draws.len()
        );
        render.upload_draws(draws)
    }

    fn load_scene_textures(&self, render: &mut RenderState, dir: impl AsRef<Path>) {
        let dir = dir.as_ref();
        let mut loaded = 0;
        for (file, tag) in SCENE_TEXTURES {
            if render
                .textures
                .create_texture(&render.device, &render.queue, dir.join(file), tag)
            {
                loaded += 1;
            }
        }
        if loaded < SCENE_TEXTURES.len() {
            warn!(
                "{} of {} textures missing, affected parts use their object color",
                SCENE_TEXTURES.len() - loaded,
                SCENE_TEXTURES.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use draw::ShapeDraw;
    use nalgebra::Point3;
    use registry::TextureRegistry;

    fn all_textures() -> TextureRegistry<()> {
        let mut textures = TextureRegistry::default();
        for (_, tag) in SCENE_TEXTURES {
            textures.register(*tag, ()).unwrap();
        }
        textures
    }

    fn materials() -> MaterialRegistry {
        let mut materials = MaterialRegistry::default();
        define_object_materials(&mut materials);
        materials
    }

    #[test]
    fn scene_draw_count() {
        let draws = render_scene(&all_textures(), &materials());
        assert_eq!(draws.len(), 147);
        assert!(draws.len() <= crate::render::MAX_DRAWS);
        let books = draws.iter().filter(|d| d.state.material.shininess == 16.0).count();
        assert_eq!(books, (BOOK_COUNT + 1) * BOOK.len());
    }

    #[test]
    fn every_tag_resolves() {
        let textures = all_textures();
        assert!(textures.len() <= registry::MAX_TEXTURES);
        let materials = materials();
        let tables = [ROOM, COFFEE_CUP, DESK, LAMP, MONITOR, MOUSE, PHONE, BOOK];
        let singles = [KEYBOARD_BODY, KEY_CAP, KEYBOARD_STAND];
        let parts = tables.iter().flat_map(|t| t.iter()).chain(singles.iter());
        for part in parts {
            if let Some(tag) = part.texture {
                assert!(textures.find_texture_slot(tag).is_some(), "{}", tag);
            }
            if let Some(tag) = part.material {
                assert!(materials.find_material(tag).is_some(), "{}", tag);
            }
        }
    }

    #[test]
    fn wall_keeps_the_floor_tiling() {
        let draws = render_scene(&all_textures(), &materials());
        let (floor, wall) = (&draws[0], &draws[1]);
        assert_eq!(floor.shape, ShapeDraw::Plane);
        assert_eq!(wall.state.uv_scale, floor.state.uv_scale);
        assert_eq!(wall.state.texture_slot, Some(7));
        assert_eq!(wall.state.material.diffuse_color, Vector3::repeat(0.4));
    }

    #[test]
    fn missing_textures_fall_back_to_color() {
        let draws = render_scene(&TextureRegistry::<()>::default(), &materials());
        assert_eq!(draws.len(), 147);
        assert!(draws.iter().all(|d| d.state.texture_slot.is_none()));
    }

    #[test]
    fn leaning_book_is_last() {
        let draws = render_scene(&all_textures(), &materials());
        let upright = &draws[draws.len() - 2 * BOOK.len()];
        let leaning = &draws[draws.len() - BOOK.len()];
        assert_eq!(upright.state.model[(0, 1)], 0.0);
        assert!(leaning.state.model[(0, 1)] != 0.0);
    }

    #[test]
    fn objects_are_placed_at_their_offsets() {
        let draws = render_scene(&all_textures(), &materials());
        let origin = |i: usize| draws[i].state.model.transform_point(&Point3::origin());
        let start = |tables: &[&[Part]]| -> usize { tables.iter().map(|t| t.len()).sum() };

        let lamp = start(&[ROOM, COFFEE_CUP, DESK]);
        assert_relative_eq!(origin(lamp), Point3::new(-3.95, 5.3, -1.8), epsilon = 1e-5);

        let monitor = lamp + LAMP.len();
        assert_relative_eq!(origin(monitor), Point3::new(-0.5, 5.468, -1.495), epsilon = 1e-5);

        let keyboard = monitor + MONITOR.len();
        assert_relative_eq!(origin(keyboard), Point3::new(-0.5, 4.068, 1.505), epsilon = 1e-5);
        let stand = keyboard + 1 + KEY_ROWS * KEY_COLUMNS;
        assert_relative_eq!(origin(stand), Point3::new(-0.5, 4.068, 1.3), epsilon = 1e-5);

        let mouse = stand + 1;
        assert_relative_eq!(origin(mouse), Point3::new(1.1, 4.02, 1.45), epsilon = 1e-5);

        let phone = mouse + MOUSE.len();
        assert_relative_eq!(origin(phone), Point3::new(1.8, 4.12, 0.95), epsilon = 1e-5);

        // back cover of every book in the row
        let books = phone + PHONE.len();
        for i in 0..BOOK_COUNT {
            let back = origin(books + i * BOOK.len());
            let expected = Point3::new(1.8 + 0.25 * i as f32, 4.55, -1.5);
            assert_relative_eq!(back, expected, epsilon = 1e-5);
        }
        let leaning = origin(books + BOOK_COUNT * BOOK.len());
        assert_relative_eq!(leaning, Point3::new(1.48, 4.55, -1.5), epsilon = 1e-5);
        assert_eq!(books + (BOOK_COUNT + 1) * BOOK.len(), draws.len());
    }

    #[test]
    fn materials_are_defined_in_order() {
        let materials = materials();
        let tags: Vec<_> = materials.iter().map(|m| m.tag.as_str()).collect();
        assert_eq!(
            tags,
            ["plastic", "wood", "woodFloor", "porcelain", "metal", "cloth", "wall", "BookCover"]
        );
    }
}
