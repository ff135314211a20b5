use std::path::{Path, PathBuf};

use plotters::style::{register_font, FontStyle};

use crate::error::RenderError;

/// Family name every chart asks for.
pub const FONT_FAMILY: &str = "sans-serif";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Register a TrueType font for chart text.
///
/// An explicit `font` must be readable. Without one, the first readable
/// system font wins; if there is none, charts are drawn without text.
/// Registration is process-wide, so call this once before rendering.
pub fn install(font: Option<&Path>) -> Result<Option<PathBuf>, RenderError> {
    if let Some(path) = font {
        let bytes = std::fs::read(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(register(path, bytes).then(|| path.to_path_buf()));
    }

    for candidate in SYSTEM_FONTS {
        let path = Path::new(candidate);
        if let Ok(bytes) = std::fs::read(path) {
            if register(path, bytes) {
                return Ok(Some(path.to_path_buf()));
            }
        }
    }

    log::warn!("No usable TrueType font found; charts will be drawn without text");
    Ok(None)
}

fn register(path: &Path, bytes: Vec<u8>) -> bool {
    // plotters keeps a 'static reference for the rest of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_styles(path, |style| register_font(FONT_FAMILY, style, bytes))
}

/// The regular face decides whether the font is usable. A missing bold
/// face only costs the bold captions, which the text fallback skips.
fn register_styles<E>(path: &Path, mut register: impl FnMut(FontStyle) -> Result<(), E>) -> bool {
    if register(FontStyle::Normal).is_err() {
        log::warn!("Rejected font {}", path.display());
        return false;
    }
    if register(FontStyle::Bold).is_err() {
        log::warn!("Font {} has no usable bold face; bold text is skipped", path.display());
    }
    log::debug!("Registered chart font {}", path.display());
    true
}
