//! Placement tables for every object on and around the desk.
//!
//! Each [`Part`] is one draw call: a transform plus the shader state it
//! changes. Fields left as `None` keep whatever the previous draw set, so
//! the order of the tables matters.

use nalgebra::Vector3;

use super::{
    draw::{BoxSide, CylinderParts, DrawRecorder, ShapeDraw},
    registry::TextureLookup,
    transform::Transform,
};

#[derive(Clone, Copy, Debug)]
pub struct Part {
    pub name: &'static str,
    pub shape: ShapeDraw,
    pub scale: [f32; 3],
    pub rotation: [f32; 3],
    pub position: [f32; 3],
    pub uv_scale: Option<[f32; 2]>,
    pub color: Option<[f32; 4]>,
    pub texture: Option<&'static str>,
    pub material: Option<&'static str>,
}

const fn part(
    name: &'static str,
    shape: ShapeDraw,
    scale: [f32; 3],
    rotation: [f32; 3],
    position: [f32; 3],
) -> Part {
    Part {
        name,
        shape,
        scale,
        rotation,
        position,
        uv_scale: None,
        color: None,
        texture: None,
        material: None,
    }
}

impl Part {
    const fn uv(mut self, u: f32, v: f32) -> Self {
        self.uv_scale = Some([u, v]);
        self
    }

    const fn color(mut self, rgba: [f32; 4]) -> Self {
        self.color = Some(rgba);
        self
    }

    const fn texture(mut self, tag: &'static str) -> Self {
        self.texture = Some(tag);
        self
    }

    const fn material(mut self, tag: &'static str) -> Self {
        self.material = Some(tag);
        self
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.scale, self.rotation, self.position)
    }
}

const NO_ROTATION: [f32; 3] = [0.0, 0.0, 0.0];
const FLAT_X: [f32; 3] = [90.0, 0.0, 0.0];
const UPRIGHT_Z: [f32; 3] = [0.0, 0.0, 90.0];

pub const ROOM: &[Part] = &[
    part("floor", ShapeDraw::Plane, [20.0, 1.0, 10.0], NO_ROTATION, [0.0, 0.0, 7.0])
        .color([1.0, 1.0, 1.0, 1.0])
        .texture("WoodFloor")
        .uv(4.0, 2.0)
        .material("woodFloor"),
    part("wall", ShapeDraw::Plane, [20.0, 1.0, 5.0], FLAT_X, [0.0, 5.0, -3.0])
        .texture("wall")
        .material("wall"),
];

pub const COFFEE_CUP: &[Part] = &[
    // upside-down taper, so the wide end is the rim
    part(
        "cup body",
        ShapeDraw::TaperedCylinder(CylinderParts::new(true, false, true)),
        [0.25, 0.5, 0.25],
        [180.0, 0.0, 0.0],
        [-3.75, 4.45, 1.0],
    )
    .texture("cup")
    .uv(2.0, 2.0)
    .material("porcelain"),
    part("cup handle", ShapeDraw::HalfTorus, [0.13, 0.15, 0.13], [90.0, -8.0, 90.0], [-3.75, 4.22, 1.17])
        .texture("cup")
        .uv(2.0, 2.0)
        .material("porcelain"),
];

const DESK_TOP_SCALE: [f32; 3] = [10.0, 0.5, 5.0];
const DESK_TOP_POSITION: [f32; 3] = [-0.4, 3.65, 0.0];
const DESK_BASE_SCALE: [f32; 3] = [9.5, 0.5, 4.5];
const DESK_BASE_POSITION: [f32; 3] = [-0.4, 3.2, 0.0];
const DESK_BEAM_SCALE: [f32; 3] = [4.5, 0.5, 0.25];
const DESK_LEG_SCALE: [f32; 3] = [3.0, 0.25, 0.5];

const fn desk_top(side: BoxSide) -> Part {
    part("desk top", ShapeDraw::BoxSide(side), DESK_TOP_SCALE, NO_ROTATION, DESK_TOP_POSITION)
}

const fn desk_base(side: BoxSide) -> Part {
    part("desk base", ShapeDraw::BoxSide(side), DESK_BASE_SCALE, NO_ROTATION, DESK_BASE_POSITION)
}

pub const DESK: &[Part] = &[
    desk_top(BoxSide::Top)
        .material("wood")
        .texture("table-top")
        .uv(1.0, 0.75),
    desk_top(BoxSide::Left).texture("table-side").uv(2.0, 0.25),
    desk_top(BoxSide::Right),
    desk_top(BoxSide::Back).uv(4.0, 0.25),
    desk_top(BoxSide::Front),
    desk_top(BoxSide::Bottom),
    // metal frame under the top
    desk_base(BoxSide::Back)
        .texture("base")
        .material("metal")
        .uv(4.0, 1.0),
    desk_base(BoxSide::Front),
    desk_base(BoxSide::Bottom),
    desk_base(BoxSide::Left).uv(2.0, 0.5),
    desk_base(BoxSide::Right),
    part("left beam", ShapeDraw::Box, DESK_BEAM_SCALE, [0.0, 90.0, 0.0], [-5.025, 0.75, 0.0])
        .uv(2.0, 1.0)
        .material("metal"),
    part("right beam", ShapeDraw::Box, DESK_BEAM_SCALE, [0.0, 90.0, 0.0], [4.21, 0.75, 0.0])
        .uv(2.0, 1.0)
        .material("metal"),
    part("back right leg", ShapeDraw::Box, DESK_LEG_SCALE, UPRIGHT_Z, [4.21, 1.52, -2.0])
        .uv(4.0, 1.0)
        .material("metal"),
    part("front right leg", ShapeDraw::Box, DESK_LEG_SCALE, UPRIGHT_Z, [4.21, 1.52, 2.0])
        .uv(4.0, 1.0)
        .material("metal"),
    part("front left leg", ShapeDraw::Box, DESK_LEG_SCALE, UPRIGHT_Z, [-5.025, 1.52, 2.0])
        .uv(4.0, 1.0)
        .material("metal"),
    part("back left leg", ShapeDraw::Box, DESK_LEG_SCALE, UPRIGHT_Z, [-5.025, 1.52, -2.0])
        .uv(4.0, 1.0)
        .material("metal"),
];

const LAMP_LEG_SCALE: [f32; 3] = [0.025, 1.0, 0.025];
const LAMP_JOINT: [f32; 3] = [-4.2, 4.85, -1.6];

const fn lamp_metal(part: Part) -> Part {
    part.uv(4.0, 1.0).texture("lamp-rim").material("metal")
}

pub const LAMP: &[Part] = &[
    part(
        "lamp shade",
        ShapeDraw::TaperedCylinder(CylinderParts::new(false, false, true)),
        [0.75, 1.0, 0.75],
        NO_ROTATION,
        [-4.2, 5.3, -1.6],
    )
    .uv(4.0, 1.0)
    .texture("lamp-shade")
    .material("cloth"),
    lamp_metal(part("shade rim top", ShapeDraw::Torus, [0.35, 0.35, 0.1], FLAT_X, [-4.2, 6.3, -1.6])),
    lamp_metal(part("shade rim bottom", ShapeDraw::Torus, [0.65, 0.65, 0.1], FLAT_X, [-4.2, 5.3, -1.6])),
    lamp_metal(part("lamp stem", ShapeDraw::CYLINDER, [0.05, 0.75, 0.05], NO_ROTATION, LAMP_JOINT)),
    lamp_metal(part("lamp leg", ShapeDraw::CYLINDER, LAMP_LEG_SCALE, [160.0, 0.0, 0.0], LAMP_JOINT)),
    lamp_metal(part("lamp leg", ShapeDraw::CYLINDER, LAMP_LEG_SCALE, [160.0, 120.0, 0.0], LAMP_JOINT)),
    lamp_metal(part("lamp leg", ShapeDraw::CYLINDER, LAMP_LEG_SCALE, [160.0, 240.0, 0.0], LAMP_JOINT)),
];

const fn plastic(part: Part) -> Part {
    part.uv(4.0, 1.0).texture("plastic").material("plastic")
}

const MONITOR_CORNER_SCALE: [f32; 3] = [0.15, 0.25, 0.25];

pub const MONITOR: &[Part] = &[
    part("monitor face", ShapeDraw::Box, [3.0, 2.0, 0.25], NO_ROTATION, [0.0, 4.068, 5.005])
        .uv(4.0, 1.0)
        .color([0.1, 0.1, 0.1, 1.0])
        .material("plastic"),
    plastic(part("bezel bottom", ShapeDraw::Box, [3.0, 0.25, 0.25], NO_ROTATION, [0.0, 3.0, 5.0])),
    plastic(part("bezel top", ShapeDraw::Box, [3.0, 0.25, 0.25], NO_ROTATION, [0.0, 5.0, 5.0])),
    plastic(part("bezel right", ShapeDraw::Box, [0.25, 1.9, 0.25], NO_ROTATION, [1.5, 4.0, 5.0])),
    plastic(part("bezel left", ShapeDraw::Box, [0.25, 1.9, 0.25], NO_ROTATION, [-1.49, 4.0, 5.0])),
    plastic(part("corner top left", ShapeDraw::CYLINDER, MONITOR_CORNER_SCALE, FLAT_X, [-1.47, 4.878, 4.875])),
    plastic(part("corner bottom left", ShapeDraw::CYLINDER, MONITOR_CORNER_SCALE, FLAT_X, [-1.47, 3.12, 4.87])),
    plastic(part("corner bottom right", ShapeDraw::CYLINDER, MONITOR_CORNER_SCALE, FLAT_X, [1.4825, 3.125, 4.87])),
    plastic(part("corner top right", ShapeDraw::CYLINDER, MONITOR_CORNER_SCALE, FLAT_X, [1.4825, 4.878, 4.87])),
    plastic(part("stand foot", ShapeDraw::Box, [1.0, 0.05, 1.0], NO_ROTATION, [0.0, 2.55, 5.0])),
    plastic(part("stand arm", ShapeDraw::Box, [1.0, 0.05, 1.0], [-65.0, 0.0, 0.0], [0.0, 3.025, 4.735])),
    plastic(part("stand hinge", ShapeDraw::CYLINDER, [0.03, 1.0, 0.03], UPRIGHT_Z, [0.5, 2.575, 4.53])),
    plastic(part("back panel", ShapeDraw::Plane, [1.55, 1.2, 1.0], FLAT_X, [0.0, 4.0, 4.855])),
];

pub const KEYBOARD_BODY: Part = plastic(part(
    "keyboard body",
    ShapeDraw::Box,
    [2.0, 0.5, 0.05],
    [-80.0, 0.0, 0.0],
    [0.0, 4.068, 5.005],
));

pub const KEYBOARD_STAND: Part = plastic(part(
    "keyboard stand",
    ShapeDraw::Box,
    [2.0, 0.15, 0.005],
    [-120.0, 0.0, 0.0],
    [0.0, 4.068, 4.8],
));

pub const KEY_CAP: Part = plastic(part(
    "key cap",
    ShapeDraw::Box,
    [0.075, 0.075, 0.025],
    [-80.0, 0.0, 0.0],
    [-0.9, 4.12, 4.85],
));

pub const KEY_ROWS: usize = 3;
pub const KEY_COLUMNS: usize = 19;
pub const KEY_COLUMN_STEP: f32 = 0.1;
/// Each row sits a little lower and further forward on the tilted body.
pub const KEY_ROW_STEP: [f32; 2] = [-0.025, 0.15];

pub const MOUSE: &[Part] = &[
    plastic(part("mouse body", ShapeDraw::Sphere, [0.15, 0.25, 0.1], FLAT_X, [-0.9, 4.12, 4.85])),
    plastic(part("mouse wheel", ShapeDraw::HalfTorus, [0.1, 0.08, 0.2], [0.0, 90.0, 0.0], [-0.9, 4.14, 4.75])),
];

const PHONE_CORNER_SCALE: [f32; 3] = [0.05, 0.03, 0.05];

pub const PHONE: &[Part] = &[
    plastic(part("phone left", ShapeDraw::Box, [0.1, 0.03, 0.5], NO_ROTATION, [-0.9, 4.12, 4.85])),
    plastic(part("phone right", ShapeDraw::Box, [0.1, 0.03, 0.5], NO_ROTATION, [-0.5, 4.12, 4.85])),
    plastic(part("phone top", ShapeDraw::Box, [0.4, 0.03, 0.1], NO_ROTATION, [-0.7, 4.12, 4.585])),
    plastic(part("phone bottom", ShapeDraw::Box, [0.4, 0.03, 0.1], NO_ROTATION, [-0.7, 4.12, 5.1])),
    plastic(part("corner bottom left", ShapeDraw::CYLINDER, PHONE_CORNER_SCALE, NO_ROTATION, [-0.9, 4.10, 5.1])),
    plastic(part("corner top left", ShapeDraw::CYLINDER, PHONE_CORNER_SCALE, NO_ROTATION, [-0.901, 4.10, 4.5875])),
    plastic(part("corner top right", ShapeDraw::CYLINDER, PHONE_CORNER_SCALE, NO_ROTATION, [-0.5, 4.10, 4.59])),
    plastic(part("corner bottom right", ShapeDraw::CYLINDER, PHONE_CORNER_SCALE, NO_ROTATION, [-0.5, 4.10, 5.1])),
    part("phone screen", ShapeDraw::Box, [0.4, 0.025, 0.55], NO_ROTATION, [-0.7, 4.125, 4.85])
        .uv(4.0, 1.0)
        .color([0.2, 0.2, 0.2, 1.0])
        .material("plastic"),
];

const fn book_part(part: Part, texture: &'static str) -> Part {
    part.uv(1.0, 1.0).texture(texture).material("BookCover")
}

pub const BOOK: &[Part] = &[
    book_part(part("back cover", ShapeDraw::Box, [0.05, 1.2, 1.0], NO_ROTATION, [-0.2, 4.3, 4.85]), "BookBack"),
    book_part(part("front cover", ShapeDraw::Box, [0.05, 1.2, 1.0], NO_ROTATION, [0.0, 4.3, 4.85]), "BookFront"),
    book_part(part("spine", ShapeDraw::Box, [0.25, 1.2, 0.05], NO_ROTATION, [-0.1025, 4.3, 5.33]), "BookSpine"),
    book_part(part("pages", ShapeDraw::Box, [0.17, 1.1, 0.95], NO_ROTATION, [-0.09, 4.3, 4.85]), "Pages"),
];

/// Replays `parts` with every translation moved by `offset` and every
/// rotation turned by `rotation` (degrees, applied per part).
pub fn place<L: TextureLookup>(
    rec: &mut DrawRecorder<'_, L>,
    parts: &[Part],
    offset: Vector3<f32>,
    rotation: Vector3<f32>,
) {
    for p in parts {
        let t = p.transform().offset(&offset).rotated(&rotation);
        rec.set_transformations(
            t.scale,
            t.rotation_degrees.x,
            t.rotation_degrees.y,
            t.rotation_degrees.z,
            t.position,
        );
        if let Some([u, v]) = p.uv_scale {
            rec.set_texture_uv_scale(u, v);
        }
        if let Some([r, g, b, a]) = p.color {
            rec.set_shader_color(r, g, b, a);
        }
        if let Some(tag) = p.texture {
            rec.set_shader_texture(tag);
        }
        if let Some(tag) = p.material {
            rec.set_shader_material(tag);
        }
        rec.draw(p.shape);
    }
}

fn place_at<L: TextureLookup>(rec: &mut DrawRecorder<'_, L>, parts: &[Part], offset: Vector3<f32>) {
    place(rec, parts, offset, Vector3::zeros());
}

pub fn load_room<L: TextureLookup>(rec: &mut DrawRecorder<'_, L>) {
    place_at(rec, ROOM, Vector3::zeros());
}

pub fn load_coffee_cup<L: TextureLookup>(rec: &mut DrawRecorder<'_, L>) {
    place_at(rec, COFFEE_CUP, Vector3::zeros());
}

pub fn load_desk<L: TextureLookup>(rec: &mut DrawRecorder<'_, L>) {
    place_at(rec, DESK, Vector3::zeros());
}

pub fn load_lamp<L: TextureLookup>(rec: &mut DrawRecorder<'_, L>, at: Vector3<f32>) {
    place_at(rec, LAMP, at);
}

pub fn load_monitor<L: TextureLookup>(rec: &mut DrawRecorder<'_, L>, at: Vector3<f32>) {
    place_at(rec, MONITOR, at);
}

pub fn load_keyboard<L: TextureLookup>(rec: &mut DrawRecorder<'_, L>, at: Vector3<f32>) {
    place_at(rec, &[KEYBOARD_BODY], at);
    for row in 0..KEY_ROWS {
        let row_offset = Vector3::new(
            0.0,
            KEY_ROW_STEP[0] * row as f32,
            KEY_ROW_STEP[1] * row as f32,
        );
        for column in 0..KEY_COLUMNS {
            let key_offset = Vector3::new(KEY_COLUMN_STEP * column as f32, 0.0, 0.0);
            generate_key_cap(rec, at + row_offset + key_offset);
        }
    }
    place_at(rec, &[KEYBOARD_STAND], at);
}

pub fn generate_key_cap<L: TextureLookup>(rec: &mut DrawRecorder<'_, L>, at: Vector3<f32>) {
    place_at(rec, &[KEY_CAP], at);
}

pub fn load_mouse<L: TextureLookup>(rec: &mut DrawRecorder<'_, L>, at: Vector3<f32>) {
    place_at(rec, MOUSE, at);
}

pub fn load_phone<L: TextureLookup>(rec: &mut DrawRecorder<'_, L>, at: Vector3<f32>) {
    place_at(rec, PHONE, at);
}

pub fn load_book<L: TextureLookup>(
    rec: &mut DrawRecorder<'_, L>,
    at: Vector3<f32>,
    rotation: Vector3<f32>,
) {
    place(rec, BOOK, at, rotation);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::registry::{MaterialRegistry, TextureRegistry};
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn recorder_fixtures() -> (TextureRegistry<()>, MaterialRegistry) {
        let mut textures = TextureRegistry::default();
        for tag in ["base", "table-top", "table-side", "plastic"] {
            textures.register(tag, ()).unwrap();
        }
        let mut materials = MaterialRegistry::default();
        crate::scene::define_object_materials(&mut materials);
        (textures, materials)
    }

    #[test]
    fn desk_legs_keep_the_base_texture() {
        let (textures, materials) = recorder_fixtures();
        let mut rec = DrawRecorder::new(&textures, &materials);
        load_desk(&mut rec);
        let cmds = rec.finish();
        assert_eq!(cmds.len(), DESK.len());
        let base_slot = textures.find_texture_slot("base");
        for cmd in &cmds[11..] {
            assert_eq!(cmd.state.texture_slot, base_slot);
            assert_eq!(cmd.shape, ShapeDraw::Box);
        }
        // right side of the top reuses the side texture and tiling of the left
        assert_eq!(cmds[2].state.texture_slot, textures.find_texture_slot("table-side"));
        assert_eq!(cmds[2].state.uv_scale, nalgebra::Vector2::new(2.0, 0.25));
        assert_eq!(cmds[4].state.uv_scale, nalgebra::Vector2::new(4.0, 0.25));
    }

    #[test]
    fn keyboard_has_a_grid_of_caps() {
        let (textures, materials) = recorder_fixtures();
        let mut rec = DrawRecorder::new(&textures, &materials);
        let at = Vector3::new(-0.5, 0.0, -3.5);
        load_keyboard(&mut rec, at);
        let cmds = rec.finish();
        assert_eq!(cmds.len(), 2 + KEY_ROWS * KEY_COLUMNS);

        let origin = |i: usize| cmds[i].state.model.transform_point(&Point3::origin());
        // first cap, last cap of the first row, first cap of the last row
        assert_relative_eq!(origin(1), Point3::new(-1.4, 4.12, 1.35), epsilon = 1e-5);
        assert_relative_eq!(origin(KEY_COLUMNS), Point3::new(0.4, 4.12, 1.35), epsilon = 1e-5);
        assert_relative_eq!(
            origin(1 + 2 * KEY_COLUMNS),
            Point3::new(-1.4, 4.07, 1.65),
            epsilon = 1e-5
        );
    }

    #[test]
    fn book_rotation_is_per_part() {
        let (textures, materials) = recorder_fixtures();
        let mut rec = DrawRecorder::new(&textures, &materials);
        load_book(&mut rec, Vector3::new(1.68, 0.25, -6.35), Vector3::new(0.0, 0.0, -7.5));
        let cmds = rec.finish();
        assert_eq!(cmds.len(), BOOK.len());
        let spine = cmds[2].state.model.transform_point(&Point3::origin());
        assert_relative_eq!(spine, Point3::new(1.5775, 4.55, -1.02), epsilon = 1e-5);
        // book textures are not loaded in this fixture
        assert!(cmds.iter().all(|c| c.state.texture_slot.is_none()));
        assert_relative_eq!(cmds[0].state.material.diffuse_color.x, 0.5);
    }

    #[test]
    fn screens_are_solid_color() {
        let (textures, materials) = recorder_fixtures();
        let mut rec = DrawRecorder::new(&textures, &materials);
        load_phone(&mut rec, Vector3::zeros());
        load_monitor(&mut rec, Vector3::zeros());
        let cmds = rec.finish();
        let screen = &cmds[PHONE.len() - 1];
        assert_eq!(screen.state.texture_slot, None);
        assert_relative_eq!(screen.state.color.x, 0.2);
        let face = &cmds[PHONE.len()];
        assert_eq!(face.state.texture_slot, None);
        assert_relative_eq!(face.state.color.x, 0.1);
        assert!(cmds[PHONE.len() + 1].state.texture_slot.is_some());
    }
}
