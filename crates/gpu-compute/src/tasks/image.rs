//! Image processing simulation. No image is touched.

use super::round_to;
use crate::domain::types::{ImageOutput, SimulationOutput};
use crate::{ComputationKind, ComputeError, ImageParams, Simulation};
use rand::Rng;
use std::time::Duration;

/// Extra latency on top of the engine's base delay
pub const IMAGE_PROCESSING_LATENCY: Duration = Duration::from_millis(300);

/// Filters reported for every request
pub const FILTERS_APPLIED: [&str; 3] = ["blur", "sharpen", "contrast"];

/// Image processing routine
#[derive(Debug, Clone, Copy)]
pub struct ImageProcessing {
    latency: Duration,
}

impl ImageProcessing {
    pub fn new() -> Self {
        Self {
            latency: IMAGE_PROCESSING_LATENCY,
        }
    }
}

impl Default for ImageProcessing {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Simulation for ImageProcessing {
    type Params = ImageParams;
    type Output = SimulationOutput;

    fn kind(&self) -> ComputationKind {
        ComputationKind::ImageProcessing
    }

    async fn simulate(
        &self,
        data: &str,
        params: ImageParams,
    ) -> Result<SimulationOutput, ComputeError> {
        tokio::time::sleep(self.latency).await;

        let processing_time_ms = round_to(rand::thread_rng().gen_range(100.0..=500.0), 2);
        Ok(SimulationOutput::Image(ImageOutput {
            operation: self.kind().operation(),
            input_data: data.to_string(),
            image_dimensions: format!("{}x{}", params.width, params.height),
            pixels_processed: params.pixels,
            filters_applied: FILTERS_APPLIED.to_vec(),
            processing_time_ms,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_simulate_dimensions() {
        let started = tokio::time::Instant::now();
        let output = ImageProcessing::new()
            .simulate(
                "photo",
                ImageParams {
                    width: 640,
                    height: 480,
                    pixels: 307_200,
                },
            )
            .await
            .unwrap();

        assert!(started.elapsed() >= IMAGE_PROCESSING_LATENCY);
        let SimulationOutput::Image(output) = output else {
            panic!("expected image output");
        };
        assert_eq!(output.image_dimensions, "640x480");
        assert_eq!(output.pixels_processed, 307_200);
        assert_eq!(output.filters_applied, vec!["blur", "sharpen", "contrast"]);
        assert!((100.0..=500.0).contains(&output.processing_time_ms));
    }
}
