use glam::{UVec2, Vec4};

use crate::{
    AccumulatorWriter, BounceShader, IndirectLightingPassParams, KernelConfig,
    LobeSampler, LobeWeights, NextSurfaceState, RadianceContribution, Scene,
    SurfaceLoader, WhiteNoise,
};

/// Buffers a bounce writes into.
///
/// Slices may cover just a part of the image (e.g. a couple of rows), in
/// which case `offset` is the index of the first pixel they cover.
pub struct IndirectLightingOutputs<'a> {
    /// See: [`NextSurfaceState`]; four `Vec4`s per pixel.
    pub bounce_surfaces: &'a mut [Vec4],

    /// See: [`crate::DiffuseSh`]; two `Vec4`s per pixel.
    pub diffuse: &'a mut [Vec4],

    /// See: [`crate::Rgb9e5`]; one `u32` per pixel.
    pub specular: &'a mut [u32],

    pub offset: usize,
}

/// One bounce of indirect lighting for a single pixel.
pub struct IndirectLighting<'a, S> {
    config: &'a KernelConfig,
    params: &'a IndirectLightingPassParams,
    scene: &'a S,
}

impl<'a, S> IndirectLighting<'a, S>
where
    S: Scene,
{
    pub fn new(
        config: &'a KernelConfig,
        params: &'a IndirectLightingPassParams,
        scene: &'a S,
    ) -> Self {
        Self {
            config,
            params,
            scene,
        }
    }

    /// Runs the bounce for given invocation and returns what it contributed
    /// to the pixel.
    ///
    /// `primary_surfaces` always covers the entire image.
    ///
    /// # Panics
    ///
    /// Panics if `outputs` doesn't cover the pixel the invocation shades
    /// (slices too short or `offset` past the pixel).
    pub fn run(
        &self,
        global_id: UVec2,
        primary_surfaces: &[Vec4],
        outputs: &mut IndirectLightingOutputs,
    ) -> RadianceContribution {
        let Some(pixel) = self.params.resolve_pixel(self.config, global_id)
        else {
            return RadianceContribution::none();
        };

        let bounce = self.params.bounce;
        let primary_id = self.params.pixel_index(pixel);
        let id = primary_id - outputs.offset;
        let has_next_bounce = self.config.has_next_bounce(bounce);

        let surface = SurfaceLoader::new(self.config, bounce).load(
            primary_surfaces,
            primary_id,
            outputs.bounce_surfaces,
            id,
        );

        let Some(surface) = surface else {
            if has_next_bounce {
                NextSurfaceState::clear(outputs.bounce_surfaces, id);
            }

            return RadianceContribution::none();
        };

        let mut wnoise = WhiteNoise::for_bounce(self.params.seed, pixel, bounce);
        let weights = LobeWeights::new(self.config, bounce, &surface);

        let lobe = LobeSampler::new(self.config, bounce, pixel).sample(
            &surface,
            weights,
            &mut wnoise,
        );

        if !lobe.is_some() {
            if has_next_bounce {
                NextSurfaceState::clear(outputs.bounce_surfaces, id);
            }

            return RadianceContribution::none();
        }

        let outcome = BounceShader::new(self.config, self.scene, bounce).shade(
            &surface,
            &lobe,
            weights,
            &mut wnoise,
        );

        if let Some(next) = outcome.next {
            next.write(outputs.bounce_surfaces, id);
        } else if has_next_bounce {
            NextSurfaceState::clear(outputs.bounce_surfaces, id);
        }

        AccumulatorWriter::new(self.config).write(
            &outcome.contribution,
            outputs.diffuse,
            outputs.specular,
            id,
        );

        outcome.contribution
    }
}
