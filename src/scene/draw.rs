use log::warn;
use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

use super::{
    registry::{MaterialRegistry, TextureLookup},
    transform::model_matrix,
};

/// Faces of the unit box, drawable one at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoxSide {
    Back,
    Front,
    Left,
    Right,
    Top,
    Bottom,
}

impl BoxSide {
    pub const ALL: [BoxSide; 6] = [
        BoxSide::Back,
        BoxSide::Front,
        BoxSide::Left,
        BoxSide::Right,
        BoxSide::Top,
        BoxSide::Bottom,
    ];
}

/// Which pieces of a (tapered) cylinder get drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CylinderParts {
    pub top: bool,
    pub bottom: bool,
    pub sides: bool,
}

impl CylinderParts {
    pub const ALL: CylinderParts = CylinderParts {
        top: true,
        bottom: true,
        sides: true,
    };
    pub const fn new(top: bool, bottom: bool, sides: bool) -> Self {
        Self { top, bottom, sides }
    }
}

/// GPU mesh a draw reads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Box,
    Plane,
    Cylinder,
    TaperedCylinder,
    Torus,
    Sphere,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Plane,
        Shape::TaperedCylinder,
        Shape::Torus,
        Shape::Box,
        Shape::Cylinder,
        Shape::Sphere,
    ];
}

/// Index range inside a mesh that can be drawn on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapePart {
    Body,
    Side(BoxSide),
    Top,
    Bottom,
    Sides,
    UpperHalf,
    LowerHalf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeDraw {
    Box,
    BoxSide(BoxSide),
    Plane,
    Cylinder(CylinderParts),
    TaperedCylinder(CylinderParts),
    Torus,
    HalfTorus,
    Sphere,
}

impl ShapeDraw {
    pub const CYLINDER: ShapeDraw = ShapeDraw::Cylinder(CylinderParts::ALL);

    pub fn shape(&self) -> Shape {
        match self {
            ShapeDraw::Box | ShapeDraw::BoxSide(_) => Shape::Box,
            ShapeDraw::Plane => Shape::Plane,
            ShapeDraw::Cylinder(_) => Shape::Cylinder,
            ShapeDraw::TaperedCylinder(_) => Shape::TaperedCylinder,
            ShapeDraw::Torus | ShapeDraw::HalfTorus => Shape::Torus,
            ShapeDraw::Sphere => Shape::Sphere,
        }
    }

    pub fn wants(&self, part: ShapePart) -> bool {
        match (self, part) {
            (ShapeDraw::BoxSide(side), ShapePart::Side(s)) => *side == s,
            (ShapeDraw::BoxSide(_), _) => false,
            (ShapeDraw::Cylinder(p) | ShapeDraw::TaperedCylinder(p), part) => match part {
                ShapePart::Top => p.top,
                ShapePart::Bottom => p.bottom,
                ShapePart::Sides => p.sides,
                _ => false,
            },
            (ShapeDraw::HalfTorus, part) => part == ShapePart::UpperHalf,
            _ => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialValues {
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

impl Default for MaterialValues {
    fn default() -> Self {
        Self {
            diffuse_color: Vector3::repeat(1.0),
            specular_color: Vector3::zeros(),
            shininess: 1.0,
        }
    }
}

/// Values the shader would hold at the moment of a draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderState {
    pub model: Matrix4<f32>,
    pub color: Vector4<f32>,
    /// `Some` when the draw samples a texture instead of `color`.
    pub texture_slot: Option<usize>,
    pub uv_scale: Vector2<f32>,
    pub material: MaterialValues,
}

impl Default for ShaderState {
    fn default() -> Self {
        Self {
            model: Matrix4::identity(),
            color: Vector4::repeat(1.0),
            texture_slot: None,
            uv_scale: Vector2::repeat(1.0),
            material: MaterialValues::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub shape: ShapeDraw,
    pub state: ShaderState,
}

/// Records draw calls. Every setter changes the current state, which sticks
/// until it is set again.
pub struct DrawRecorder<'a, L> {
    textures: &'a L,
    materials: &'a MaterialRegistry,
    state: ShaderState,
    commands: Vec<DrawCommand>,
}

impl<'a, L: TextureLookup> DrawRecorder<'a, L> {
    pub fn new(textures: &'a L, materials: &'a MaterialRegistry) -> Self {
        Self {
            textures,
            materials,
            state: ShaderState::default(),
            commands: Vec::new(),
        }
    }

    pub fn set_transformations(
        &mut self,
        scale: Vector3<f32>,
        x_rotation_degrees: f32,
        y_rotation_degrees: f32,
        z_rotation_degrees: f32,
        position: Vector3<f32>,
    ) {
        self.state.model = model_matrix(
            &scale,
            x_rotation_degrees,
            y_rotation_degrees,
            z_rotation_degrees,
            &position,
        );
    }

    pub fn set_shader_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.state.texture_slot = None;
        self.state.color = Vector4::new(red, green, blue, alpha);
    }

    pub fn set_shader_texture(&mut self, tag: &str) {
        self.state.texture_slot = self.textures.find_texture_slot(tag);
        if self.state.texture_slot.is_none() {
            warn!("texture {:?} is not loaded, drawing with object color", tag);
        }
    }

    pub fn set_texture_uv_scale(&mut self, u: f32, v: f32) {
        self.state.uv_scale = Vector2::new(u, v);
    }

    pub fn set_shader_material(&mut self, tag: &str) {
        match self.materials.find_material(tag) {
            Some(m) => {
                self.state.material = MaterialValues {
                    diffuse_color: m.diffuse_color,
                    specular_color: m.specular_color,
                    shininess: m.shininess,
                };
            }
            None => warn!("material {:?} is not defined, keeping the previous one", tag),
        }
    }

    pub fn draw(&mut self, shape: ShapeDraw) {
        self.commands.push(DrawCommand {
            shape,
            state: self.state.clone(),
        });
    }

    pub fn state(&self) -> &ShaderState {
        &self.state
    }

    pub fn finish(self) -> Vec<DrawCommand> {
        self.commands
    }
}
