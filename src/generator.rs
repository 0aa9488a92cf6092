use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::{ExtendedColorType, ImageFormat, RgbaImage};
use log::info;

use crate::config::GeneratorConfig;
use crate::error::{IconError, Result};
use crate::icon::{RenderPath, render_icon};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Ico,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSpec {
    pub size: u32,
    pub path: PathBuf,
    pub format: OutputFormat,
}

#[derive(Debug, Clone)]
pub struct GeneratedIcon {
    pub spec: IconSpec,
    pub render_path: RenderPath,
}

/// The full PWA set: sized icons, then the favicon, then the Apple touch icon.
pub fn icon_specs(cfg: &GeneratorConfig) -> Vec<IconSpec> {
    let icons = cfg.icons_path();
    let mut specs: Vec<IconSpec> = cfg
        .sizes
        .iter()
        .map(|&size| IconSpec {
            size,
            path: icons.join(format!("icon-{size}x{size}.png")),
            format: OutputFormat::Png,
        })
        .collect();
    specs.push(IconSpec {
        size: cfg.favicon_size,
        path: cfg.output_root.join(&cfg.favicon_name),
        format: OutputFormat::Ico,
    });
    specs.push(IconSpec {
        size: cfg.apple_touch_size,
        path: icons.join(&cfg.apple_touch_name),
        format: OutputFormat::Png,
    });
    specs
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> IconError + '_ {
    move |source| IconError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn image_err(path: &Path) -> impl FnOnce(image::ImageError) -> IconError + '_ {
    move |source| IconError::Image {
        path: path.to_path_buf(),
        source,
    }
}

pub fn write_icon(img: &RgbaImage, spec: &IconSpec) -> Result<()> {
    let path = spec.path.as_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err(path))?;
    }
    match spec.format {
        OutputFormat::Png => img
            .save_with_format(path, ImageFormat::Png)
            .map_err(image_err(path)),
        OutputFormat::Ico => {
            let (w, h) = img.dimensions();
            let frame = IcoFrame::as_png(img.as_raw(), w, h, ExtendedColorType::Rgba8)
                .map_err(image_err(path))?;
            let file = File::create(path).map_err(io_err(path))?;
            IcoEncoder::new(BufWriter::new(file))
                .encode_images(&[frame])
                .map_err(image_err(path))
        }
    }
}

/// Render and write every icon in order. Stops at the first file that cannot be written.
pub fn generate_all(cfg: &GeneratorConfig) -> Result<Vec<GeneratedIcon>> {
    let icons_dir = cfg.icons_path();
    fs::create_dir_all(&icons_dir).map_err(io_err(&icons_dir))?;

    let mut generated = Vec::new();
    for spec in icon_specs(cfg) {
        let rendered = render_icon(spec.size, cfg);
        write_icon(&rendered.image, &spec)?;
        info!(
            "created {} ({}x{}, {})",
            spec.path.display(),
            spec.size,
            spec.size,
            rendered.path
        );
        generated.push(GeneratedIcon {
            spec,
            render_path: rendered.path,
        });
    }
    Ok(generated)
}

/// Human-readable report printed after a successful run.
pub fn summary(generated: &[GeneratedIcon], cfg: &GeneratorConfig) -> String {
    let mut out = String::new();
    out.push_str("Generated files:\n");
    for g in generated {
        out.push_str(&format!(
            "- {} ({}x{}, {})\n",
            g.spec.path.display(),
            g.spec.size,
            g.spec.size,
            g.render_path
        ));
    }
    let touch = cfg.icons_dir.join(&cfg.apple_touch_name);
    out.push_str("\nNext steps:\n");
    out.push_str("1. Reference the icons from manifest.json\n");
    out.push_str("2. Add this to your HTML head section:\n");
    out.push_str(&format!(
        "   <link rel=\"icon\" href=\"{}\">\n",
        cfg.favicon_name
    ));
    out.push_str(&format!(
        "   <link rel=\"apple-touch-icon\" href=\"{}\">\n",
        touch.to_string_lossy().replace('\\', "/")
    ));
    out.push_str("3. Let the service worker cache these icons for offline use\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config(root: &Path) -> GeneratorConfig {
        GeneratorConfig {
            font_candidates: Vec::new(),
            ..GeneratorConfig::with_root(root)
        }
    }

    #[test]
    fn specs_cover_the_pwa_set() {
        let cfg = GeneratorConfig::with_root("out");
        let specs = icon_specs(&cfg);
        assert_eq!(specs.len(), 10);
        assert_eq!(specs[0].path, Path::new("out/assets/icons/icon-72x72.png"));
        assert_eq!(specs[7].path, Path::new("out/assets/icons/icon-512x512.png"));
        assert_eq!(specs[8].path, Path::new("out/favicon.ico"));
        assert_eq!(specs[8].format, OutputFormat::Ico);
        assert_eq!(specs[8].size, 32);
        let icons = Path::new("out/assets/icons");
        assert_eq!(specs[9].path, icons.join("apple-touch-icon.png"));
        assert_eq!(specs[9].size, 180);
    }

    #[test]
    fn generates_ten_decodable_icons() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = offline_config(dir.path());
        let generated = generate_all(&cfg).unwrap();
        assert_eq!(generated.len(), 10);

        for g in &generated {
            assert!(g.spec.path.exists(), "missing {}", g.spec.path.display());
            let img = image::open(&g.spec.path).unwrap();
            assert_eq!(img.width(), g.spec.size);
            assert_eq!(img.height(), g.spec.size);
        }

        let icons_dir = dir.path().join("assets/icons");
        assert_eq!(fs::read_dir(&icons_dir).unwrap().count(), 9);
        assert!(dir.path().join("favicon.ico").exists());
    }

    #[test]
    fn favicon_is_an_ico_container() {
        let dir = tempfile::tempdir().unwrap();
        generate_all(&offline_config(dir.path())).unwrap();
        let bytes = fs::read(dir.path().join("favicon.ico")).unwrap();
        assert_eq!(&bytes[..4], &[0, 0, 1, 0]);
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Ico);
        let img = decoded.unwrap();
        assert_eq!((img.width(), img.height()), (32, 32));
    }

    #[test]
    fn offline_run_is_procedural_and_reproducible() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let first = generate_all(&offline_config(a.path())).unwrap();
        generate_all(&offline_config(b.path())).unwrap();
        assert!(first.iter().all(|g| g.render_path == RenderPath::Procedural));

        let rel = "assets/icons/icon-192x192.png";
        let left = image::open(a.path().join(rel)).unwrap().to_rgba8();
        let right = image::open(b.path().join(rel)).unwrap().to_rgba8();
        assert_eq!(left, right);
    }

    #[test]
    fn unwritable_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"file, not a directory").unwrap();
        let err = generate_all(&offline_config(&blocker)).unwrap_err();
        assert!(matches!(err, IconError::Io { .. }));
    }

    #[test]
    fn summary_lists_files_and_links() {
        let cfg = GeneratorConfig::with_root("out");
        let generated: Vec<GeneratedIcon> = icon_specs(&cfg)
            .into_iter()
            .map(|spec| GeneratedIcon {
                spec,
                render_path: RenderPath::Procedural,
            })
            .collect();
        let text = summary(&generated, &cfg);
        let entry = "icon-384x384.png (384x384, procedural memo)";
        assert!(text.contains(entry));
        assert!(text.contains("<link rel=\"icon\" href=\"favicon.ico\">"));
        assert!(text.contains("href=\"assets/icons/apple-touch-icon.png\""));
    }
}
