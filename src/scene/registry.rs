use anyhow::*;
use log::debug;
use nalgebra::Vector3;

/// Number of texture slots the shader side can address.
pub const MAX_TEXTURES: usize = 16;

#[derive(Debug)]
pub struct TextureEntry<T> {
    pub tag: String,
    pub handle: T,
}

/// Fixed-capacity tag -> texture table. The slot of an entry is its
/// insertion index.
#[derive(Debug)]
pub struct TextureRegistry<T> {
    entries: Vec<TextureEntry<T>>,
}

impl<T> Default for TextureRegistry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::with_capacity(MAX_TEXTURES),
        }
    }
}

impl<T> TextureRegistry<T> {
    pub fn register(&mut self, tag: impl Into<String>, handle: T) -> Result<usize> {
        let tag = tag.into();
        if self.entries.len() >= MAX_TEXTURES {
            bail!("no free texture slot for {:?}, all {} in use", tag, MAX_TEXTURES);
        }
        let slot = self.entries.len();
        debug!("texture {:?} -> slot {}", tag, slot);
        self.entries.push(TextureEntry { tag, handle });
        Ok(slot)
    }

    pub fn find_texture_id(&self, tag: &str) -> Option<&T> {
        self.entries.iter().find(|e| e.tag == tag).map(|e| &e.handle)
    }

    pub fn find_texture_slot(&self, tag: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.tag == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextureEntry<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every handle and frees all slots.
    pub fn destroy_textures(&mut self) {
        self.entries.clear();
    }
}

/// Resolves a texture tag to the slot the draw should sample from.
pub trait TextureLookup {
    fn find_texture_slot(&self, tag: &str) -> Option<usize>;
}

impl<T> TextureLookup for TextureRegistry<T> {
    fn find_texture_slot(&self, tag: &str) -> Option<usize> {
        TextureRegistry::find_texture_slot(self, tag)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectMaterial {
    pub tag: String,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

impl ObjectMaterial {
    pub fn new(tag: &str, diffuse: [f32; 3], specular: [f32; 3], shininess: f32) -> Self {
        Self {
            tag: tag.to_owned(),
            diffuse_color: diffuse.into(),
            specular_color: specular.into(),
            shininess,
        }
    }
}

#[derive(Debug, Default)]
pub struct MaterialRegistry {
    materials: Vec<ObjectMaterial>,
}

impl MaterialRegistry {
    pub fn define(&mut self, material: ObjectMaterial) {
        self.materials.push(material);
    }

    pub fn find_material(&self, tag: &str) -> Option<&ObjectMaterial> {
        self.materials.iter().find(|m| m.tag == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectMaterial> {
        self.materials.iter()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_follow_insertion_order() {
        let mut reg = TextureRegistry::default();
        assert_eq!(reg.register("cup", 10u32).unwrap(), 0);
        assert_eq!(reg.register("wall", 11).unwrap(), 1);
        assert_eq!(reg.find_texture_slot("wall"), Some(1));
        assert_eq!(reg.find_texture_id("cup"), Some(&10));
        assert_eq!(reg.find_texture_slot("floor"), None);
        assert_eq!(reg.find_texture_id("floor"), None);
    }

    #[test]
    fn duplicate_tag_resolves_to_first() {
        let mut reg = TextureRegistry::default();
        reg.register("wood", 1u32).unwrap();
        reg.register("wood", 2).unwrap();
        assert_eq!(reg.find_texture_slot("wood"), Some(0));
        assert_eq!(reg.find_texture_id("wood"), Some(&1));
    }

    #[test]
    fn capacity_is_enforced() {
        let mut reg = TextureRegistry::default();
        for i in 0..MAX_TEXTURES {
            reg.register(format!("t{}", i), i).unwrap();
        }
        assert!(reg.register("one-too-many", 99).is_err());
        assert_eq!(reg.len(), MAX_TEXTURES);

        reg.destroy_textures();
        assert!(reg.is_empty());
        assert_eq!(reg.register("again", 0).unwrap(), 0);
    }

    #[test]
    fn material_lookup_is_exact() {
        let mut reg = MaterialRegistry::default();
        reg.define(ObjectMaterial::new("wood", [1.0; 3], [0.1; 3], 5.0));
        reg.define(ObjectMaterial::new("woodFloor", [1.0; 3], [0.1; 3], 0.2));
        assert_eq!(reg.find_material("woodFloor").map(|m| m.shininess), Some(0.2));
        assert_eq!(reg.find_material("wood").map(|m| m.shininess), Some(5.0));
        assert!(reg.find_material("Wood").is_none());
        assert!(MaterialRegistry::default().find_material("wood").is_none());
    }
}
