//! Brush texture library.
//!
//! Brushes are tileable PNG textures scanned from an asset directory,
//! selected per joint by a small 1-based integer from the parameter UI
//! (0 means "no stroke").  A missing or empty directory degrades to a
//! procedural soft-round default so the installation still draws.

use std::fs;
use std::path::Path;

use crate::buffer::argb;
use ink_stroke::BrushId;

/// One decoded brush texture, packed ARGB.
#[derive(Clone, Debug)]
pub struct Brush {
    pub name: String,
    width:    usize,
    height:   usize,
    data:     Vec<u32>,
}

impl Brush {
    /// Sample at texture coordinates: U tiles (the ribbon's arc length
    /// runs along it), V clamps across the ribbon width.
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let u = u - u.floor(); // wrap to [0, 1)
        let v = v.clamp(0.0, 1.0);
        let x = ((u * self.width as f32) as usize).min(self.width - 1);
        let y = ((v * (self.height - 1) as f32) as usize).min(self.height - 1);
        self.data[y * self.width + x]
    }

    /// Procedural fallback: a soft ink dab, darkest along the ribbon
    /// center line, feathering to transparent at the edges.
    fn soft_round(size: usize) -> Self {
        let mut data = Vec::with_capacity(size * size);
        let half = (size as f32 - 1.0) / 2.0;
        let sigma = half * 0.5;
        let denom = 2.0 * sigma * sigma;
        for y in 0..size {
            let dy = y as f32 - half;
            for _x in 0..size {
                // feather across V only, so the brush tiles seamlessly in U
                let w = (-(dy * dy) / denom).exp();
                let a = (w * 255.0) as u32;
                data.push(argb(a, 0x10, 0x10, 0x10));
            }
        }
        Brush {
            name: "soft-round".to_string(),
            width: size,
            height: size,
            data,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// BrushLibrary
// ════════════════════════════════════════════════════════════════════════════

/// All loaded brushes, addressed by [`BrushId`].
#[derive(Clone, Debug)]
pub struct BrushLibrary {
    brushes: Vec<Brush>,
}

impl BrushLibrary {
    /// Scan `dir` for `.png` files (sorted by file name, so parameter
    /// indices stay stable across runs).  Files that fail to decode are
    /// reported and skipped; an unreadable or brushless directory falls
    /// back to the built-in default.
    pub fn load(dir: &Path) -> Self {
        let mut brushes = Vec::new();

        match fs::read_dir(dir) {
            Ok(entries) => {
                let mut paths: Vec<_> = entries
                    .filter_map(|e| e.ok().map(|e| e.path()))
                    .filter(|p| {
                        p.is_file()
                            && p.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("png"))
                    })
                    .collect();
                paths.sort();

                for path in paths {
                    match image::open(&path) {
                        Ok(img) => {
                            let rgba = img.to_rgba8();
                            let (w, h) = rgba.dimensions();
                            let data = rgba
                                .pixels()
                                .map(|p| {
                                    argb(p.0[3] as u32, p.0[0] as u32, p.0[1] as u32, p.0[2] as u32)
                                })
                                .collect();
                            let name = path
                                .file_stem()
                                .map(|s| s.to_string_lossy().into_owned())
                                .unwrap_or_default();
                            println!("  brush \"{}\"  {}x{}", name, w, h);
                            brushes.push(Brush {
                                name,
                                width: w as usize,
                                height: h as usize,
                                data,
                            });
                        }
                        Err(e) => eprintln!("  skipping brush {}: {}", path.display(), e),
                    }
                }
            }
            Err(e) => eprintln!("  no brush directory {}: {}", dir.display(), e),
        }

        if brushes.is_empty() {
            println!("  no brushes found — using built-in soft-round");
            brushes.push(Brush::soft_round(64));
        }

        BrushLibrary { brushes }
    }

    /// Library with only the built-in default.  Used by tests and as a
    /// headless fallback.
    pub fn builtin() -> Self {
        BrushLibrary {
            brushes: vec![Brush::soft_round(64)],
        }
    }

    pub fn get(&self, id: BrushId) -> Option<&Brush> {
        self.brushes.get(id)
    }

    /// Map a parameter-UI selection to a brush handle: 0 is "off",
    /// 1-based indices address the scan order.  Out-of-range selections
    /// are off, not errors.
    pub fn select(&self, choice: usize) -> Option<BrushId> {
        if choice == 0 || choice > self.brushes.len() {
            None
        } else {
            Some(choice - 1)
        }
    }

    pub fn len(&self) -> usize      { self.brushes.len() }
    pub fn is_empty(&self) -> bool  { self.brushes.is_empty() }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.brushes.iter().map(|b| b.name.as_str())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
