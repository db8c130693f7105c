//! The terracing pipeline: subdivide, displace, slice.

use glam::{Vec2, Vec3};
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use super::config::{ConfigError, TerrainConfig};
use crate::geometry::{RawTriangle, Subdivision};
use crate::mesh::{DisplacedTriangle, MeanderingSlicer, MeshBuffers};
use crate::noise::{NoiseField, NoiseOctaveSynthesizer, ScalarNoise};
use crate::terrain::{
    AltitudeMetric, BaseMeshSource, CubeSphereBase, FlatMetric, HeightProjector, PolygonFan,
    SphereMetric, TerrainShape, Theme,
};

/// A finished terrain mesh and a few facts about how it was built.
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    pub shape: TerrainShape,
    pub buffers: MeshBuffers,
    /// Raw triangles sliced.
    pub leaf_triangles: usize,
    /// Lowest and highest vertex altitude, `None` for an empty mesh.
    pub altitude_range: Option<(f32, f32)>,
}

/// One configured run: a base shape, its altitude metric and everything
/// needed to displace and slice its triangles.
pub struct TerracePipeline<M: AltitudeMetric, B: BaseMeshSource> {
    metric: M,
    base: B,
    theme: Theme,
    projector: HeightProjector,
    synthesizer: NoiseOctaveSynthesizer,
    field: NoiseField<M::Coords>,
    slicer: MeanderingSlicer,
    parallel: bool,
}

impl<M: AltitudeMetric, B: BaseMeshSource> TerracePipeline<M, B> {
    pub fn new(
        metric: M,
        base: B,
        theme: Theme,
        projector: HeightProjector,
        synthesizer: NoiseOctaveSynthesizer,
        field: NoiseField<M::Coords>,
    ) -> Self {
        Self {
            metric,
            base,
            theme,
            projector,
            synthesizer,
            field,
            slicer: MeanderingSlicer::default(),
            parallel: false,
        }
    }

    pub fn with_slicer(mut self, slicer: MeanderingSlicer) -> Self {
        self.slicer = slicer;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    pub fn base(&self) -> &B {
        &self.base
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Displaces the three vertices of a raw triangle.
    pub fn displace(&self, raw: &RawTriangle) -> DisplacedTriangle {
        let vertices = raw.map(|v| {
            let coords = self.metric.noise_coords(v);
            let height = self.synthesizer.sample_field(coords, &self.field);
            self.projector.project(&self.metric, v, height)
        });
        DisplacedTriangle::new(vertices, &self.metric)
    }

    /// Slices every leaf of one coarse triangle into `buffers`.
    fn slice_coarse(&self, coarse: RawTriangle, buffers: &mut MeshBuffers) {
        for leaf in Subdivision::new([coarse], self.base.max_depth()) {
            let tri = self.displace(&leaf);
            self.slicer.slice(&tri, &self.metric, &self.theme, buffers);
        }
    }

    /// Builds the whole mesh.
    ///
    /// The parallel build slices each coarse triangle into its own buffers
    /// and concatenates them in base order, so both paths give identical output.
    pub fn build(&self) -> MeshBuffers {
        if !self.parallel {
            return self.build_with_progress(|_, _| {});
        }

        let coarse = self.base.base_triangles();
        debug!("Slicing {} coarse triangles in parallel", coarse.len());
        let parts: Vec<MeshBuffers> = coarse
            .into_par_iter()
            .map(|tri| {
                let mut local = MeshBuffers::new();
                self.slice_coarse(tri, &mut local);
                local
            })
            .collect();

        let mut buffers = MeshBuffers::new();
        for part in parts {
            buffers.append(part);
        }
        buffers
    }

    /// Builds the mesh sequentially, reporting `(done, total)` coarse
    /// triangles after each one.
    pub fn build_with_progress<F>(&self, mut on_progress: F) -> MeshBuffers
    where
        F: FnMut(usize, usize),
    {
        let coarse = self.base.base_triangles();
        let total = coarse.len();
        let mut buffers = MeshBuffers::new();
        for (i, tri) in coarse.into_iter().enumerate() {
            self.slice_coarse(tri, &mut buffers);
            on_progress(i + 1, total);
        }
        buffers
    }

    fn finish(&self, shape: TerrainShape, buffers: MeshBuffers) -> TerrainMesh {
        let altitude_range = buffers.altitude_range(|p| self.metric.measure(p));
        TerrainMesh {
            shape,
            leaf_triangles: self.base.leaf_count(),
            altitude_range,
            buffers,
        }
    }
}

/// Builds the terrain a config describes with its own noise kind and theme.
pub fn generate_terrain(config: &TerrainConfig) -> Result<TerrainMesh, ConfigError> {
    config.validate()?;
    let noise = config.noise.build(noise_seed(config.seed));
    let theme = config.resolve_theme()?;
    generate_terrain_with(config, noise, theme)
}

/// Folds a run seed into the 32-bit seed simdnoise takes; both halves count.
fn noise_seed(seed: u64) -> i32 {
    ((seed >> 32) ^ seed) as u32 as i32
}

/// Builds the terrain a config describes with an injected noise source and theme.
pub fn generate_terrain_with(
    config: &TerrainConfig,
    noise: Box<dyn ScalarNoise>,
    theme: Theme,
) -> Result<TerrainMesh, ConfigError> {
    config.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let synthesizer = NoiseOctaveSynthesizer::new(config.octaves.clone(), noise);
    let projector = HeightProjector::for_theme(&theme, config.radius);
    let slicer = MeanderingSlicer::new(config.wall_depth);

    info!(
        "Generating {} terrain: depth {}, theme '{}', {} noise, seed {}",
        config.shape,
        config.max_depth,
        theme.name(),
        config.noise.name(),
        config.seed
    );

    let mesh = match config.shape {
        TerrainShape::Flat => {
            let base = PolygonFan::new(config.segs_c, config.radius, config.max_depth)?;
            let field = NoiseField::<Vec2>::random(config.octaves.octaves, &mut rng);
            debug!("Noise field: time offset {:.3}, offsets {:?}", field.time_offset, field.offsets);
            let pipeline = TerracePipeline::new(
                FlatMetric::new(config.radius),
                base,
                theme,
                projector,
                synthesizer,
                field,
            )
            .with_slicer(slicer)
            .with_parallel(config.parallel);
            debug!("{} leaf triangles", pipeline.base().leaf_count());
            pipeline.finish(config.shape, pipeline.build())
        }
        TerrainShape::Sphere => {
            let base = CubeSphereBase::new(config.terrain_scale, config.max_depth)?;
            let field = NoiseField::<Vec3>::random(config.octaves.octaves, &mut rng);
            debug!("Noise field: time offset {:.3}, offsets {:?}", field.time_offset, field.offsets);
            let pipeline = TerracePipeline::new(
                SphereMetric::new(config.sphere_projection, config.terrain_scale),
                base,
                theme,
                projector,
                synthesizer,
                field,
            )
            .with_slicer(slicer)
            .with_parallel(config.parallel);
            debug!("{} leaf triangles", pipeline.base().leaf_count());
            pipeline.finish(config.shape, pipeline.build())
        }
    };

    info!(
        "Terrain built: {} vertices, {} triangles from {} leaves",
        mesh.buffers.vertex_count(),
        mesh.buffers.triangle_count(),
        mesh.leaf_triangles
    );
    Ok(mesh)
}
