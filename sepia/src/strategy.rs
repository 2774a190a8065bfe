//! Strategy selector: the caller-visible choice of how the transform runs.

use std::time::{Duration, Instant};

use strum_macros::{Display, EnumIter, EnumString};
use tracing::{debug, info};

use crate::config::SepiaConfig;
use crate::error::Result;
use crate::lanes::{apply_lanes_f32, apply_lanes_u8};
use crate::partition::{partition, run_partitioned};
use crate::raster::{PlanarBuffer, Raster, Sample, from_planar, to_planar};
use crate::transform::{SepiaParams, apply_scalar, sepia_pixel};

/// How the sepia transform is executed. Every strategy produces the same
/// pixels for the same raster and parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Strategy {
    /// Reads and writes one pixel at a time through the raster accessors.
    PerPixel,
    /// Scalar transform over `i32` planar channels.
    Direct,
    /// [`Strategy::Direct`] split across the worker pool.
    DirectThreaded,
    /// Fixed-point 8-wide lanes over `u8` planar channels.
    VectorInt,
    VectorIntThreaded,
    /// Floating-point 8-wide lanes over `f32` planar channels.
    VectorFloat,
    VectorFloatThreaded,
}

impl Strategy {
    pub fn is_threaded(self) -> bool {
        matches!(
            self,
            Self::DirectThreaded | Self::VectorIntThreaded | Self::VectorFloatThreaded
        )
    }

    pub fn is_vectorized(self) -> bool {
        matches!(
            self,
            Self::VectorInt | Self::VectorIntThreaded | Self::VectorFloat | Self::VectorFloatThreaded
        )
    }
}

/// Outcome of a successful [`apply`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformReport {
    pub strategy: Strategy,
    /// Wall-clock duration, present only when timing is enabled.
    pub elapsed: Option<Duration>,
}

impl TransformReport {
    pub fn elapsed_secs(&self) -> Option<f64> {
        self.elapsed.map(|elapsed| elapsed.as_secs_f64())
    }
}

/// Applies the sepia transform to `raster` in place using `strategy`.
///
/// The configuration is validated and planar buffers are allocated before
/// the raster is written; on error the raster is unchanged.
pub fn apply(
    raster: &mut Raster,
    strategy: Strategy,
    config: &SepiaConfig,
) -> Result<TransformReport> {
    config.validate()?;

    debug!(
        %strategy,
        width = raster.width(),
        height = raster.height(),
        workers = config.worker_count,
        "Applying sepia transform"
    );

    let start = config.timing.then(Instant::now);
    let params = &config.params;
    let backend = config.lane_backend;

    match strategy {
        Strategy::PerPixel => {
            per_pixel(raster, params);
            Ok(())
        }
        Strategy::Direct => transform_planar::<i32>(raster, |planar| {
            let (b, g, r) = planar.channels_mut();
            apply_scalar(b, g, r, params);
            Ok(())
        }),
        Strategy::DirectThreaded => transform_planar::<i32>(raster, |planar| {
            run_threaded(planar, config, |b, g, r| apply_scalar(b, g, r, params))
        }),
        Strategy::VectorInt => transform_planar::<u8>(raster, |planar| {
            let (b, g, r) = planar.channels_mut();
            let kernel = apply_lanes_u8(b, g, r, params, backend);
            debug!(%kernel, "Integer lanes processed");
            Ok(())
        }),
        Strategy::VectorIntThreaded => transform_planar::<u8>(raster, |planar| {
            run_threaded(planar, config, |b, g, r| {
                apply_lanes_u8(b, g, r, params, backend);
            })
        }),
        Strategy::VectorFloat => transform_planar::<f32>(raster, |planar| {
            let (b, g, r) = planar.channels_mut();
            let kernel = apply_lanes_f32(b, g, r, params, backend);
            debug!(%kernel, "Float lanes processed");
            Ok(())
        }),
        Strategy::VectorFloatThreaded => transform_planar::<f32>(raster, |planar| {
            run_threaded(planar, config, |b, g, r| {
                apply_lanes_f32(b, g, r, params, backend);
            })
        }),
    }?;

    let elapsed = start.map(|start| start.elapsed());
    if let Some(elapsed) = elapsed {
        info!(
            %strategy,
            elapsed_secs = elapsed.as_secs_f64(),
            "Sepia transform finished"
        );
    }

    Ok(TransformReport { strategy, elapsed })
}

fn per_pixel(raster: &mut Raster, params: &SepiaParams) {
    for y in 0..raster.height() {
        for x in 0..raster.width() {
            let (b, g, r) = raster.pixel(x, y);
            raster.set_pixel(x, y, sepia_pixel(b, g, r, params));
        }
    }
}

/// Converts to planar `T` channels, runs `transform` and writes the result
/// back. Nothing is written if any step fails.
fn transform_planar<T: Sample>(
    raster: &mut Raster,
    transform: impl FnOnce(&mut PlanarBuffer<T>) -> Result<()>,
) -> Result<()> {
    let mut planar = to_planar::<T>(raster)?;
    transform(&mut planar)?;
    from_planar(&planar, raster)
}

fn run_threaded<T: Sample>(
    planar: &mut PlanarBuffer<T>,
    config: &SepiaConfig,
    work: impl Fn(&mut [T], &mut [T], &mut [T]) + Sync,
) -> Result<()> {
    let segments = partition(planar.len(), config.worker_count, config.partition);
    run_partitioned(planar, &segments, |slices| work(slices.b, slices.g, slices.r))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;
    use crate::error::Error;
    use crate::lanes::LaneBackend;
    use crate::partition::PartitionMode;
    use crate::raster::ChannelOrder;
    use crate::testing::random_raster;

    fn custom_params() -> SepiaParams {
        SepiaParams {
            bias_b: 5,
            bias_g: 35,
            bias_r: 70,
            min: 10,
            max: 240,
        }
    }

    fn run(raster: &Raster, strategy: Strategy, config: &SepiaConfig) -> Raster {
        let mut out = raster.clone();
        apply(&mut out, strategy, config).unwrap();
        out
    }

    #[test]
    fn test_uniform_90_every_strategy() {
        common::log_setup::setup_test_logging();
        let config = SepiaConfig::default();
        for order in [ChannelOrder::Bgr, ChannelOrder::Rgb] {
            let raster = Raster::filled(16, 16, order, (90, 90, 90)).unwrap();
            for strategy in Strategy::iter() {
                let out = run(&raster, strategy, &config);
                for y in 0..16 {
                    for x in 0..16 {
                        assert_eq!(out.pixel(x, y), (70, 110, 130), "{strategy} at ({x}, {y})");
                    }
                }
            }
        }
    }

    #[test]
    fn test_strategies_agree_on_random_rasters() {
        let sizes = [(1, 1), (13, 7), (64, 48), (3, 200), (97, 5)];
        for params in [SepiaParams::default(), custom_params()] {
            let config = SepiaConfig {
                params,
                worker_count: 3,
                ..Default::default()
            };
            for (seed, &(width, height)) in sizes.iter().enumerate() {
                let raster = random_raster(width, height, seed % 3, ChannelOrder::Bgr, seed as u64);
                let reference = run(&raster, Strategy::PerPixel, &config);
                for strategy in Strategy::iter() {
                    assert_eq!(
                        run(&raster, strategy, &config),
                        reference,
                        "{strategy} on {width}x{height}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_portable_lanes_agree_with_auto() {
        let raster = random_raster(33, 17, 2, ChannelOrder::Rgb, 99);
        let auto = SepiaConfig::default();
        let portable = SepiaConfig {
            lane_backend: LaneBackend::Portable,
            ..Default::default()
        };
        for strategy in Strategy::iter().filter(|s| s.is_vectorized()) {
            assert_eq!(run(&raster, strategy, &auto), run(&raster, strategy, &portable));
        }
    }

    #[test]
    fn test_truncating_partition_leaves_tail_pixels() {
        let (width, height) = (13, 7);
        let workers = 4;
        let raster = random_raster(width, height, 0, ChannelOrder::Bgr, 5);
        let config = SepiaConfig {
            worker_count: workers,
            partition: PartitionMode::Truncating,
            ..Default::default()
        };
        let reference = run(&raster, Strategy::PerPixel, &config);
        let covered = (width * height / workers) * workers;

        for strategy in Strategy::iter().filter(|s| s.is_threaded()) {
            let out = run(&raster, strategy, &config);
            for i in 0..width * height {
                let (x, y) = raster.dimensions().coords(i);
                let expected = if i < covered { &reference } else { &raster };
                assert_eq!(out.pixel(x, y), expected.pixel(x, y), "{strategy} pixel {i}");
            }
        }
    }

    #[test]
    fn test_more_workers_than_pixels() {
        let raster = random_raster(2, 1, 0, ChannelOrder::Bgr, 1);
        let config = SepiaConfig {
            worker_count: 8,
            ..Default::default()
        };
        let reference = run(&raster, Strategy::PerPixel, &config);
        for strategy in Strategy::iter().filter(|s| s.is_threaded()) {
            assert_eq!(run(&raster, strategy, &config), reference, "{strategy}");
        }
    }

    #[test]
    fn test_timing_is_optional() {
        let mut raster = Raster::filled(8, 8, ChannelOrder::Bgr, (1, 2, 3)).unwrap();

        let report = apply(&mut raster, Strategy::Direct, &SepiaConfig::default()).unwrap();
        assert_eq!(report.strategy, Strategy::Direct);
        assert_eq!(report.elapsed, None);
        assert_eq!(report.elapsed_secs(), None);

        let timed = SepiaConfig {
            timing: true,
            ..Default::default()
        };
        let report = apply(&mut raster, Strategy::VectorInt, &timed).unwrap();
        assert!(report.elapsed.is_some());
        assert!(report.elapsed_secs().unwrap() >= 0.0);
    }

    #[test]
    fn test_invalid_config_leaves_raster_unchanged() {
        let raster = random_raster(9, 9, 1, ChannelOrder::Bgr, 8);
        let mut params = SepiaParams::default();
        params.min = 250;
        params.max = 5;
        let invalid = [
            SepiaConfig {
                worker_count: 0,
                ..Default::default()
            },
            SepiaConfig {
                params,
                ..Default::default()
            },
        ];

        for config in &invalid {
            for strategy in Strategy::iter() {
                let mut out = raster.clone();
                let result = apply(&mut out, strategy, config);
                assert!(matches!(result, Err(Error::InvalidConfig(_))), "{strategy}");
                assert_eq!(out, raster);
            }
        }
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(Strategy::iter().count(), 7);
        assert_eq!(Strategy::VectorIntThreaded.to_string(), "vector-int-threaded");
        assert_eq!(Strategy::from_str("per-pixel").unwrap(), Strategy::PerPixel);
        for strategy in Strategy::iter() {
            assert_eq!(Strategy::from_str(&strategy.to_string()).unwrap(), strategy);
        }
        assert!(Strategy::from_str("gpu").is_err());
    }

    #[test]
    fn test_strategy_classification() {
        assert!(!Strategy::PerPixel.is_threaded());
        assert!(!Strategy::Direct.is_vectorized());
        assert!(Strategy::DirectThreaded.is_threaded());
        assert!(Strategy::VectorFloatThreaded.is_threaded());
        assert!(Strategy::VectorFloatThreaded.is_vectorized());
        assert_eq!(Strategy::iter().filter(|s| s.is_threaded()).count(), 3);
    }
}
