use anyhow::*;
use nalgebra::Vector3;

pub const MAX_LIGHTS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub active: bool,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            ambient: Vector3::zeros(),
            diffuse: Vector3::zeros(),
            specular: Vector3::zeros(),
            active: false,
        }
    }
}

impl PointLight {
    /// Active white light with uniform intensities per channel.
    pub fn white(position: [f32; 3], ambient: f32, diffuse: f32, specular: f32) -> Self {
        Self {
            position: position.into(),
            ambient: Vector3::repeat(ambient),
            diffuse: Vector3::repeat(diffuse),
            specular: Vector3::repeat(specular),
            active: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LightRig {
    pub use_lighting: bool,
    pub lights: [PointLight; MAX_LIGHTS],
}

impl LightRig {
    pub fn set_light(&mut self, slot: usize, light: PointLight) -> Result<()> {
        let target = self
            .lights
            .get_mut(slot)
            .ok_or_else(|| anyhow!("light slot {} out of range 0..{}", slot, MAX_LIGHTS))?;
        *target = light;
        Ok(())
    }

    pub fn active_lights(&self) -> impl Iterator<Item = &PointLight> {
        self.lights.iter().filter(|l| l.active)
    }

    /// Room light up high, plus two lamp-coloured fills around the lamp.
    pub fn setup_scene_lights(&mut self) {
        self.use_lighting = true;
        self.lights = [
            PointLight::white([0.0, 20.0, 20.0], 0.1, 0.4, 0.01),
            PointLight::white([-4.0, 5.5, -2.5], 0.4, 0.5, 0.01),
            PointLight::white([-6.0, 5.5, -1.5], 0.4, 0.5, 0.01),
            PointLight::default(),
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_lights() {
        let mut rig = LightRig::default();
        assert!(!rig.use_lighting);
        assert_eq!(rig.active_lights().count(), 0);

        rig.setup_scene_lights();
        assert!(rig.use_lighting);
        assert_eq!(rig.active_lights().count(), 3);
        assert_eq!(rig.lights[1].position, Vector3::new(-4.0, 5.5, -2.5));
        assert_eq!(rig.lights[0].ambient, Vector3::repeat(0.1));
        assert!(!rig.lights[3].active);
    }

    #[test]
    fn slot_bounds() {
        let mut rig = LightRig::default();
        rig.set_light(3, PointLight::white([1.0, 2.0, 3.0], 0.2, 0.2, 0.2))
            .unwrap();
        assert!(rig.lights[3].active);
        assert!(rig.set_light(MAX_LIGHTS, PointLight::default()).is_err());
    }
}
