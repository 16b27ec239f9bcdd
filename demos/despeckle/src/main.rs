use argh::FromArgs;
use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::Instant,
};

use despeckle::{
    imgproc::{
        filter::{AlphaPolicy, MedianFilter},
        parallel::ExecutionStrategy,
    },
    io::{self as F, DecodedImage},
};

/// Output path used for a single input without `--output`.
const DEFAULT_OUTPUT: &str = "noise_removed.jpg";

/// How to treat the alpha channel of images that carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlphaMode {
    /// keep the source alpha unchanged
    Preserve,
    /// median filter the alpha like the color channels
    Filter,
    /// decode as RGB and drop the alpha channel
    Discard,
}

impl FromStr for AlphaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preserve" => Ok(AlphaMode::Preserve),
            "filter" => Ok(AlphaMode::Filter),
            "discard" => Ok(AlphaMode::Discard),
            _ => Err(format!(
                "invalid alpha mode: {s} (expected preserve, filter or discard)"
            )),
        }
    }
}

impl AlphaMode {
    fn policy(&self) -> AlphaPolicy {
        match self {
            AlphaMode::Filter => AlphaPolicy::Filter,
            AlphaMode::Preserve | AlphaMode::Discard => AlphaPolicy::Preserve,
        }
    }
}

#[derive(FromArgs)]
/// Remove salt-and-pepper noise from images with a median filter
struct Args {
    /// paths to the input images
    #[argh(positional)]
    inputs: Vec<PathBuf>,

    /// path to the output image, only valid with a single input
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// radius of the median window (1 is 3x3)
    #[argh(option, short = 'r', default = "1")]
    radius: usize,

    /// alpha handling: preserve, filter or discard
    #[argh(option, default = "AlphaMode::Preserve")]
    alpha: AlphaMode,

    /// number of worker threads, 0 uses the global pool
    #[argh(option, default = "0")]
    threads: usize,
}

/// Output path for one of several inputs: `<stem> cleaned.<ext>` next to the input.
fn cleaned_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let ext = input
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "jpg".to_string());
    input.with_file_name(format!("{stem} cleaned.{ext}"))
}

/// Pair every input with the path its result is written to.
fn plan_outputs(
    inputs: &[PathBuf],
    output: Option<&Path>,
) -> Result<Vec<(PathBuf, PathBuf)>, String> {
    match (inputs, output) {
        ([], _) => Err("no input image given".to_string()),
        ([input], output) => Ok(vec![(
            input.clone(),
            output.map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), Path::to_path_buf),
        )]),
        (_, Some(_)) => Err("--output can only be used with a single input".to_string()),
        (inputs, None) => Ok(inputs
            .iter()
            .map(|input| (input.clone(), cleaned_path(input)))
            .collect()),
    }
}

fn strategy_for(threads: usize) -> ExecutionStrategy {
    match threads {
        0 => ExecutionStrategy::ParallelRows,
        1 => ExecutionStrategy::Serial,
        n => ExecutionStrategy::Fixed(n),
    }
}

fn process_image(
    input: &Path,
    output: &Path,
    filter: &MedianFilter,
    alpha: AlphaMode,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Input image: {}", input.display());
    log::info!("Output image: {}", output.display());

    let decoded = match alpha {
        AlphaMode::Discard => DecodedImage::Rgb8(F::read_image_any_rgb8(input)?),
        AlphaMode::Preserve | AlphaMode::Filter => F::read_image_any(input)?,
    };

    let size = decoded.size();
    log::info!(
        "Image dimensions: {} x {} ({} channels)",
        size.width,
        size.height,
        decoded.num_channels()
    );

    let start = Instant::now();
    let cleaned = match decoded {
        DecodedImage::Rgb8(img) => DecodedImage::Rgb8(filter.apply(&img)?),
        DecodedImage::Rgba8(img) => DecodedImage::Rgba8(filter.apply(&img)?),
    };
    log::info!("Processing time: {} ms", start.elapsed().as_millis());

    F::write_image(output, &cleaned)?;
    log::info!("Noise-free image saved as: {}", output.display());

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    let jobs = plan_outputs(&args.inputs, args.output.as_deref())?;

    let filter = MedianFilter::new()
        .with_radius(args.radius)
        .with_alpha(args.alpha.policy())
        .with_strategy(strategy_for(args.threads));

    let mut written = Vec::with_capacity(jobs.len());
    for (i, (input, output)) in jobs.iter().enumerate() {
        log::info!("--- Processing image {} of {} ---", i + 1, jobs.len());
        match process_image(input, output, &filter, args.alpha) {
            Ok(()) => written.push(output),
            Err(e) => log::error!("Failed to process {}: {}", input.display(), e),
        }
    }

    println!("Processed {} of {} images.", written.len(), jobs.len());
    for output in &written {
        println!("  - {}", output.display());
    }

    if written.len() != jobs.len() {
        return Err(format!("{} image(s) failed", jobs.len() - written.len()).into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use despeckle::image::Image;

    #[test]
    fn test_plan_single_default_output() -> Result<(), String> {
        let jobs = plan_outputs(&[PathBuf::from("test image 1.jpg")], None)?;
        assert_eq!(
            jobs,
            vec![(
                PathBuf::from("test image 1.jpg"),
                PathBuf::from(DEFAULT_OUTPUT)
            )]
        );
        Ok(())
    }

    #[test]
    fn test_plan_single_explicit_output() -> Result<(), String> {
        let jobs = plan_outputs(&[PathBuf::from("in.png")], Some(Path::new("out.png")))?;
        assert_eq!(jobs[0].1, PathBuf::from("out.png"));
        Ok(())
    }

    #[test]
    fn test_plan_batch() -> Result<(), String> {
        let inputs = [
            PathBuf::from("data/test image 1.jpg"),
            PathBuf::from("data/test image 2.png"),
            PathBuf::from("data/noext"),
        ];
        let outputs: Vec<PathBuf> = plan_outputs(&inputs, None)?
            .into_iter()
            .map(|(_, output)| output)
            .collect();
        assert_eq!(
            outputs,
            vec![
                PathBuf::from("data/test image 1 cleaned.jpg"),
                PathBuf::from("data/test image 2 cleaned.png"),
                PathBuf::from("data/noext cleaned.jpg"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_plan_errors() {
        assert!(plan_outputs(&[], None).is_err());
        let inputs = [PathBuf::from("a.png"), PathBuf::from("b.png")];
        assert!(plan_outputs(&inputs, Some(Path::new("out.png"))).is_err());
    }

    #[test]
    fn test_alpha_mode_parse() {
        assert_eq!("preserve".parse::<AlphaMode>(), Ok(AlphaMode::Preserve));
        assert_eq!("Filter".parse::<AlphaMode>(), Ok(AlphaMode::Filter));
        assert_eq!("discard".parse::<AlphaMode>(), Ok(AlphaMode::Discard));
        assert!("keep".parse::<AlphaMode>().is_err());
        assert_eq!(AlphaMode::Filter.policy(), AlphaPolicy::Filter);
    }

    #[test]
    fn test_strategy_for() {
        assert_eq!(strategy_for(0), ExecutionStrategy::ParallelRows);
        assert_eq!(strategy_for(1), ExecutionStrategy::Serial);
        assert_eq!(strategy_for(4), ExecutionStrategy::Fixed(4));
    }

    #[test]
    fn test_process_image_removes_impulse() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let input = tmp_dir.path().join("noisy.png");
        let output = tmp_dir.path().join("clean.png");

        let mut noisy = Image::<u8, 3>::from_size_val([5, 5].into(), 100)?;
        for c in 0..3 {
            noisy.set_pixel(2, 2, c, 0)?;
        }
        F::write_image_rgb8(&input, &noisy)?;

        process_image(&input, &output, &MedianFilter::new(), AlphaMode::Preserve)?;

        let clean = F::read_image_any_rgb8(&output)?;
        assert_eq!(clean, Image::<u8, 3>::from_size_val([5, 5].into(), 100)?);

        Ok(())
    }

    #[test]
    fn test_process_image_discards_alpha() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let input = tmp_dir.path().join("alpha.png");
        let output = tmp_dir.path().join("opaque.png");

        let rgba = Image::<u8, 4>::from_size_pixel([4, 4].into(), [1, 2, 3, 128])?;
        F::write_image_rgba8(&input, &rgba)?;

        process_image(&input, &output, &MedianFilter::new(), AlphaMode::Discard)?;
        assert!(matches!(F::read_image_any(&output)?, DecodedImage::Rgb8(_)));

        process_image(&input, &output, &MedianFilter::new(), AlphaMode::Preserve)?;
        assert_eq!(F::read_image_any(&output)?, DecodedImage::Rgba8(rgba));

        Ok(())
    }
}
