//! Host side of Ricochet: a one-bounce-at-a-time indirect lighting
//! integrator.
//!
//! The application fills [`FrameBuffers`] with primary surfaces, provides a
//! [`gpu::Scene`] and calls [`Engine::render()`]; each bounce is a separate,
//! data-parallel pass over the entire image.

mod buffers;
mod config;
mod error;
mod passes;
mod utils;

use log::{info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
pub use ricochet_gpu as gpu;

pub use self::buffers::*;
pub use self::config::*;
pub use self::error::*;
pub use self::passes::*;
pub(crate) use self::utils::*;

#[derive(Debug)]
pub struct Engine {
    config: Config,
    rng: StdRng,
    frame: u32,
    pass: IndirectLightingPass,
}

impl Engine {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        info!(
            "Initializing; bounce_rays={}, seed={}",
            config.bounce_rays, config.seed
        );

        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            frame: 0,
            pass: IndirectLightingPass::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the configuration; frames rendered afterwards follow it.
    ///
    /// Changing the seed restarts the random sequence.
    pub fn set_config(&mut self, config: Config) -> Result<()> {
        config.validate()?;

        if config.seed != self.config.seed {
            self.rng = StdRng::seed_from_u64(config.seed);
        }

        self.config = config;

        Ok(())
    }

    /// Returns the index of the frame that'll be rendered next.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn create_buffers(&self, size: glam::UVec2) -> Result<FrameBuffers> {
        FrameBuffers::new(size)
    }

    /// Renders indirect lighting for primary surfaces present in `buffers`.
    ///
    /// Accumulators are cleared first, then every bounce runs as a separate
    /// pass; bounce `n + 1` starts from surfaces found by bounce `n`.
    ///
    /// `time` is given in seconds and animates lava.
    pub fn render<S>(
        &mut self,
        scene: &S,
        buffers: &mut FrameBuffers,
        time: f32,
    ) -> FrameStats
    where
        S: gpu::Scene + Sync,
    {
        let config = self.config.to_kernel(self.frame, time);
        let seed = self.rng.gen();

        trace!("Rendering frame #{}; seed={seed}", self.frame);

        buffers.clear_accumulators();

        let bounces = (0..config.max_bounces())
            .map(|bounce| {
                let params = buffers.pass_params(seed, bounce);

                self.pass.run(&config, &params, scene, buffers)
            })
            .collect();

        let stats = FrameStats {
            frame: self.frame,
            bounces,
        };

        self.frame = self.frame.wrapping_add(1);

        stats
    }
}

/// What a frame has contributed to the image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u32,
    pub bounces: Vec<BounceStats>,
}
