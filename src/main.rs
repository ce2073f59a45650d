/// KPAT preview renderer entry point for native builds.
///
/// Usage: `kpat-native [annotations.json] <image> <out.png>`
///
/// Draws the boxes and poses stored for `<image>` on top of the image and
/// writes the result as PNG. Without an explicit annotation file, the
/// configured one next to the image is used.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::{Path, PathBuf};

    use kpat::config::AppConfig;

    let config = AppConfig::load_from_default_path().unwrap_or_default();

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let (annotations, image, output) = match args.as_slice() {
        [annotations, image, output] => (annotations.clone(), image, output),
        [image, output] => {
            let dir = image.parent().unwrap_or_else(|| Path::new("."));
            (dir.join(&config.output.annotation_file), image, output)
        }
        _ => {
            eprintln!("Usage: kpat-native [annotations.json] <image> <out.png>");
            std::process::exit(2);
        }
    };

    if let Err(e) = native::render_preview(&config, &annotations, image, output) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::path::Path;

    use kpat::config::AppConfig;
    use kpat::format::CreateMlFormat;
    use kpat::palette::DEFAULT_BOX_LINE;
    use kpat::render::{PixmapPainter, paint_keypoints, paint_shape};

    /// Zoom of an offscreen preview, drawn at the image's native resolution.
    const PREVIEW_SCALE: f32 = 1.0;

    pub fn render_preview(
        config: &AppConfig,
        annotations: &Path,
        image: &Path,
        output: &Path,
    ) -> Result<(), Box<dyn Error>> {
        let image_name = image.to_string_lossy();
        let format = CreateMlFormat::new().with_indent(config.output.indent);
        let stored = format.read_or_empty(annotations, &image_name)?;

        if !stored.verified {
            log::warn!("No usable annotations in {:?}, rendering image only", annotations);
        }

        let mut painter = PixmapPainter::open(image)?;
        for shape in &stored.shapes {
            paint_shape(
                shape,
                &mut painter,
                PREVIEW_SCALE,
                &config.render,
                DEFAULT_BOX_LINE,
            );
        }
        for pose in &stored.keypoints {
            paint_keypoints(pose, &mut painter, PREVIEW_SCALE, &config.render);
        }

        log::info!(
            "Rendered {} shapes and {} poses for '{}'",
            stored.shapes.len(),
            stored.keypoints.len(),
            stored.filename
        );

        painter.save_png(output)?;
        Ok(())
    }
}

// WASM builds use the library only
#[cfg(target_arch = "wasm32")]
fn main() {}
