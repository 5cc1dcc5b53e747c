//! Typed, name-indexed asset cache

use std::collections::HashMap;
use std::path::Path;

use super::descriptions::{AssetDescriptions, TextureDescription};
use super::{AssetError, MaterialHandle, MeshHandle, SamplerHandle, ShaderHandle, TextureHandle};
use crate::foundation::collections::{insert_typed, HandleMap, TypedHandle};
use crate::render::api::GraphicsBackend;
use crate::render::primitives::{Mesh, ShaderProgram, ShaderSources, ShaderStageSource};
use crate::render::resources::{Material, Sampler, Texture, TextureData};

/// Solid white, the color of the texture used when a reference is missing
pub const FALLBACK_TEXTURE_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Edge length of the fallback texture
pub const FALLBACK_TEXTURE_SIZE: u32 = 512;

/// Name to handle index over a handle map
struct Registry<T> {
    kind: &'static str,
    items: HandleMap<T>,
    names: HashMap<String, TypedHandle<T>>,
}

impl<T> Registry<T> {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            items: HandleMap::new(),
            names: HashMap::new(),
        }
    }

    fn insert(&mut self, name: &str, value: T) -> Result<TypedHandle<T>, AssetError> {
        if self.names.contains_key(name) {
            return Err(AssetError::Duplicate {
                kind: self.kind,
                name: name.to_string(),
            });
        }
        let handle = insert_typed(&mut self.items, value);
        self.names.insert(name.to_string(), handle);
        log::debug!("Cached {} '{}'", self.kind, name);
        Ok(handle)
    }

    fn insert_unnamed(&mut self, value: T) -> TypedHandle<T> {
        insert_typed(&mut self.items, value)
    }

    fn get(&self, handle: TypedHandle<T>) -> Option<&T> {
        handle.resolve(&self.items)
    }

    fn get_mut(&mut self, handle: TypedHandle<T>) -> Option<&mut T> {
        self.items.get_mut(handle.key())
    }

    fn handle(&self, name: &str) -> Option<TypedHandle<T>> {
        self.names.get(name).copied()
    }

    fn require(&self, name: &str) -> Result<TypedHandle<T>, AssetError> {
        self.handle(name).ok_or_else(|| AssetError::UnknownReference {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.names.clear();
        self.items.drain().map(|(_, value)| value)
    }
}

/// Sole owner of all loaded assets
///
/// Lookups by name return handles; handles resolve to `Option<&T>` and stop
/// resolving once the asset is gone.
pub struct AssetCache {
    shaders: Registry<ShaderProgram>,
    meshes: Registry<Mesh>,
    textures: Registry<Texture>,
    samplers: Registry<Sampler>,
    materials: Registry<Material>,
    fallback_texture: Option<TextureHandle>,
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            shaders: Registry::new("shader"),
            meshes: Registry::new("mesh"),
            textures: Registry::new("texture"),
            samplers: Registry::new("sampler"),
            materials: Registry::new("material"),
            fallback_texture: None,
        }
    }

    /// Total number of cached assets
    pub fn len(&self) -> usize {
        self.shaders.len() + self.meshes.len() + self.textures.len() + self.samplers.len() + self.materials.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a shader program under a name
    pub fn add_shader(&mut self, name: &str, shader: ShaderProgram) -> Result<ShaderHandle, AssetError> {
        self.shaders.insert(name, shader)
    }

    /// Add a mesh under a name
    pub fn add_mesh(&mut self, name: &str, mesh: Mesh) -> Result<MeshHandle, AssetError> {
        self.meshes.insert(name, mesh)
    }

    /// Add a texture under a name
    pub fn add_texture(&mut self, name: &str, texture: Texture) -> Result<TextureHandle, AssetError> {
        self.textures.insert(name, texture)
    }

    /// Add a sampler under a name
    pub fn add_sampler(&mut self, name: &str, sampler: Sampler) -> Result<SamplerHandle, AssetError> {
        self.samplers.insert(name, sampler)
    }

    /// Add a material under a name
    pub fn add_material(&mut self, name: &str, material: Material) -> Result<MaterialHandle, AssetError> {
        self.materials.insert(name, material)
    }

    /// Resolve a shader handle
    pub fn shader(&self, handle: ShaderHandle) -> Option<&ShaderProgram> {
        self.shaders.get(handle)
    }

    /// Resolve a mesh handle
    pub fn mesh(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(handle)
    }

    /// Resolve a texture handle
    pub fn texture(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(handle)
    }

    /// Resolve a sampler handle
    pub fn sampler(&self, handle: SamplerHandle) -> Option<&Sampler> {
        self.samplers.get(handle)
    }

    /// Resolve a material handle
    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle)
    }

    /// Mutable access to a material, e.g. to flip its transparency
    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(handle)
    }

    /// Look up a shader by name
    pub fn shader_handle(&self, name: &str) -> Option<ShaderHandle> {
        self.shaders.handle(name)
    }

    /// Look up a mesh by name
    pub fn mesh_handle(&self, name: &str) -> Option<MeshHandle> {
        self.meshes.handle(name)
    }

    /// Look up a texture by name
    pub fn texture_handle(&self, name: &str) -> Option<TextureHandle> {
        self.textures.handle(name)
    }

    /// Look up a sampler by name
    pub fn sampler_handle(&self, name: &str) -> Option<SamplerHandle> {
        self.samplers.handle(name)
    }

    /// Look up a material by name
    pub fn material_handle(&self, name: &str) -> Option<MaterialHandle> {
        self.materials.handle(name)
    }

    /// Look up a texture by name, or the solid white fallback when it is missing
    ///
    /// The fallback is created on first use and shared afterwards.
    pub fn texture_or_fallback(&mut self, name: &str, gpu: &mut dyn GraphicsBackend) -> Result<TextureHandle, AssetError> {
        if let Some(handle) = self.textures.handle(name) {
            return Ok(handle);
        }
        log::warn!("Texture '{}' not found, using fallback", name);
        if let Some(handle) = self.fallback_texture {
            return Ok(handle);
        }
        let data = TextureData::solid(FALLBACK_TEXTURE_COLOR, FALLBACK_TEXTURE_SIZE);
        let handle = self.textures.insert_unnamed(Texture::upload(&data, gpu)?);
        self.fallback_texture = Some(handle);
        Ok(handle)
    }

    /// Load every asset of a description set
    ///
    /// Order is shaders, textures, samplers, meshes, then materials, since
    /// materials refer to the others by name. Relative shader paths resolve
    /// against `asset_root`.
    pub fn load_descriptions(
        &mut self,
        descriptions: &AssetDescriptions,
        asset_root: &Path,
        gpu: &mut dyn GraphicsBackend,
    ) -> Result<(), AssetError> {
        for (name, description) in &descriptions.shaders {
            let load = |stage: &ShaderStageSource| {
                stage.load(asset_root).map_err(|e| AssetError::LoadFailed {
                    kind: "shader",
                    name: name.clone(),
                    reason: e.to_string(),
                })
            };
            let sources = ShaderSources::new(load(&description.vertex)?, load(&description.fragment)?);
            let program = ShaderProgram::create(&sources, gpu)?;
            self.add_shader(name, program)?;
        }

        for (name, description) in &descriptions.textures {
            let TextureDescription::Solid { color, size } = description;
            let texture = Texture::upload(&TextureData::solid(*color, *size), gpu)?;
            self.add_texture(name, texture)?;
        }

        for (name, params) in &descriptions.samplers {
            let sampler = Sampler::create(*params, gpu)?;
            self.add_sampler(name, sampler)?;
        }

        for (name, description) in &descriptions.meshes {
            let mesh = Mesh::upload(&description.build(), gpu)?;
            self.add_mesh(name, mesh)?;
        }

        for (name, description) in &descriptions.materials {
            let material = description.build(self, gpu)?;
            self.add_material(name, material)?;
        }

        log::info!(
            "Loaded {} shaders, {} textures, {} samplers, {} meshes, {} materials",
            descriptions.shaders.len(),
            descriptions.textures.len(),
            descriptions.samplers.len(),
            descriptions.meshes.len(),
            descriptions.materials.len()
        );
        Ok(())
    }

    pub(crate) fn require_shader(&self, name: &str) -> Result<ShaderHandle, AssetError> {
        self.shaders.require(name)
    }

    pub(crate) fn require_sampler(&self, name: &str) -> Result<SamplerHandle, AssetError> {
        self.samplers.require(name)
    }

    pub(crate) fn require_mesh(&self, name: &str) -> Result<MeshHandle, AssetError> {
        self.meshes.require(name)
    }

    pub(crate) fn require_material(&self, name: &str) -> Result<MaterialHandle, AssetError> {
        self.materials.require(name)
    }

    /// Drop every asset and release its GPU objects
    ///
    /// Handles held elsewhere stop resolving.
    pub fn clear(&mut self, gpu: &mut dyn GraphicsBackend) {
        let count = self.len();
        self.materials.drain().for_each(drop);
        for shader in self.shaders.drain() {
            gpu.release_program(shader.id());
        }
        for mesh in self.meshes.drain() {
            gpu.release_mesh(mesh.id());
        }
        for texture in self.textures.drain() {
            gpu.release_texture(texture.id());
        }
        for sampler in self.samplers.drain() {
            gpu.release_sampler(sampler.id());
        }
        self.fallback_texture = None;
        log::info!("Asset cache cleared ({} assets)", count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::HeadlessBackend;
    use crate::render::primitives::MeshData;
    use crate::render::resources::{BaseMaterial, Material};
    use crate::render::PipelineState;

    #[test]
    fn test_names_resolve_to_handles() {
        let mut gpu = HeadlessBackend::new();
        let mut cache = AssetCache::new();

        let mesh = Mesh::upload(&MeshData::cube(), &mut gpu).unwrap();
        let handle = cache.add_mesh("cube", mesh).unwrap();

        assert_eq!(cache.mesh_handle("cube"), Some(handle));
        assert_eq!(cache.mesh(handle), Some(&mesh));
        assert!(cache.mesh_handle("sphere").is_none());
        assert!(matches!(
            cache.add_mesh("cube", mesh),
            Err(AssetError::Duplicate { kind: "mesh", .. })
        ));
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut gpu = HeadlessBackend::new();
        let mut cache = AssetCache::new();

        let program = ShaderProgram::create(&ShaderSources::new("v", "f"), &mut gpu).unwrap();
        let shader = cache.add_shader("basic", program).unwrap();
        let material = cache
            .add_material("plain", Material::Base(BaseMaterial::new(shader, PipelineState::default(), false)))
            .unwrap();
        let mesh = cache.add_mesh("quad", Mesh::upload(&MeshData::quad(), &mut gpu).unwrap()).unwrap();
        assert_eq!(gpu.live_objects(), 2);

        cache.clear(&mut gpu);

        assert!(cache.is_empty());
        assert_eq!(gpu.live_objects(), 0);
        assert!(cache.material(material).is_none());
        assert!(cache.mesh(mesh).is_none());
        assert!(cache.shader_handle("basic").is_none());
    }

    #[test]
    fn test_missing_texture_falls_back_once() {
        let mut gpu = HeadlessBackend::new();
        let mut cache = AssetCache::new();

        let first = cache.texture_or_fallback("missing", &mut gpu).unwrap();
        let second = cache.texture_or_fallback("also-missing", &mut gpu).unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.texture(first).unwrap().size(), (FALLBACK_TEXTURE_SIZE, FALLBACK_TEXTURE_SIZE));
        assert!(cache.texture_handle("missing").is_none());
    }
}
