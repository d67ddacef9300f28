//! Sample rate conversion using rubato
//!
//! Analysis runs at a fixed rate, so every input is brought to it first.

use rubato::{FastFixedIn, PolynomialDegree, Resampler};
use tracing::debug;

use crate::error::{BgmError, BgmResult};

/// Resample mono audio from `input_rate` to `output_rate`
///
/// Returns a copy when the rates already match and an empty vector for
/// empty input.
pub fn resample(input: &[f32], input_rate: u32, output_rate: u32) -> BgmResult<Vec<f32>> {
    if input_rate == output_rate {
        debug!("Sample rate already at {}Hz, skipping resample", output_rate);
        return Ok(input.to_vec());
    }
    if input.is_empty() {
        return Ok(Vec::new());
    }
    if input_rate == 0 || output_rate == 0 {
        return Err(BgmError::Analysis(format!(
            "Cannot resample {}Hz to {}Hz",
            input_rate, output_rate
        )));
    }

    debug!("Resampling from {}Hz to {}Hz", input_rate, output_rate);

    // Whole signal as a single chunk
    let mut resampler = FastFixedIn::<f32>::new(
        output_rate as f64 / input_rate as f64,
        1.0,
        PolynomialDegree::Septic,
        input.len(),
        1,
    )
    .map_err(|e| BgmError::Analysis(format!("Failed to create resampler: {}", e)))?;

    let planar_input = vec![input.to_vec()];
    let mut planar_output = resampler
        .process(&planar_input, None)
        .map_err(|e| BgmError::Analysis(format!("Resampling failed: {}", e)))?;

    let output = planar_output.pop().unwrap_or_default();

    debug!(
        "Resampled {} input frames to {} output frames",
        input.len(),
        output.len()
    );

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_rate_is_copy() {
        let input = vec![0.1, 0.2, 0.3];
        assert_eq!(resample(&input, 22050, 22050).unwrap(), input);
    }

    #[test]
    fn test_empty_input() {
        assert!(resample(&[], 44100, 22050).unwrap().is_empty());
    }

    #[test]
    fn test_downsample_halves_length() {
        let input: Vec<f32> = (0..44100)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
            .collect();

        let output = resample(&input, 44100, 22050).unwrap();
        let expected = 22050.0;
        assert!(
            (output.len() as f64 - expected).abs() / expected < 0.02,
            "got {} frames",
            output.len()
        );
    }

    #[test]
    fn test_zero_rate_rejected() {
        assert!(resample(&[0.0; 4], 0, 22050).is_err());
    }
}
