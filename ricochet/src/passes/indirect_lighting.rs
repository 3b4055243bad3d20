use glam::{uvec2, Vec3};
use log::debug;
use rayon::prelude::*;

use crate::gpu::{self, IndirectLightingOutputs, Vec3Ext};
use crate::{measure, FrameBuffers};

/// What a single bounce has contributed to the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BounceStats {
    pub bounce: u32,

    /// Number of pixels that received any diffuse light.
    pub diffuse: usize,

    /// Number of pixels that received any specular light.
    pub specular: usize,
}

impl BounceStats {
    fn record(&mut self, contribution: &gpu::RadianceContribution) {
        if contribution.radiance == Vec3::ZERO
            || !contribution.radiance.is_sane()
        {
            return;
        }

        if contribution.is_specular {
            self.specular += 1;
        } else {
            self.diffuse += 1;
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            bounce: self.bounce,
            diffuse: self.diffuse + other.diffuse,
            specular: self.specular + other.specular,
        }
    }
}

/// Runs one bounce over the entire image.
///
/// Rows are shaded in parallel; pixels within a row share nothing but the
/// read-only primary surfaces.
#[derive(Debug, Default)]
pub struct IndirectLightingPass;

impl IndirectLightingPass {
    pub fn new() -> Self {
        debug!("Initializing pass: indirect-lighting");

        Self
    }

    pub fn run<S>(
        &self,
        config: &gpu::KernelConfig,
        params: &gpu::IndirectLightingPassParams,
        scene: &S,
        buffers: &mut FrameBuffers,
    ) -> BounceStats
    where
        S: gpu::Scene + Sync,
    {
        let width = params.width as usize;
        let dispatch_size = params.dispatch_size(config);

        debug!(
            "Dispatching bounce #{}; size={}x{}",
            params.bounce, dispatch_size.x, dispatch_size.y
        );

        let kernel = gpu::IndirectLighting::new(config, params, scene);
        let primary_surfaces = &buffers.primary_surfaces;

        let empty = BounceStats {
            bounce: params.bounce,
            ..Default::default()
        };

        measure("indirect-lighting", || {
            buffers
                .bounce_surfaces
                .par_chunks_mut(4 * width)
                .zip(buffers.diffuse.par_chunks_mut(2 * width))
                .zip(buffers.specular.par_chunks_mut(width))
                .enumerate()
                .map(|(y, ((bounce_surfaces, diffuse), specular))| {
                    let mut outputs = IndirectLightingOutputs {
                        bounce_surfaces,
                        diffuse,
                        specular,
                        offset: y * width,
                    };

                    let mut stats = empty;

                    for x in 0..dispatch_size.x {
                        let contribution = kernel.run(
                            uvec2(x, y as u32),
                            primary_surfaces,
                            &mut outputs,
                        );

                        stats.record(&contribution);
                    }

                    stats
                })
                .reduce(|| empty, BounceStats::merge)
        })
    }
}
