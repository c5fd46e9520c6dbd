//! Carousel content: the provider interface and a procedural implementation.
//!
//! The core only ever asks for `count()` and `item_at(i)`; what a page
//! actually looks like is this crate's business. Pages here are procedural
//! colour washes painted straight into the bridge's staging frame, which
//! keeps the demo free of image decoding while still giving the lens
//! something worth magnifying.

use renderer::FrameCanvas;

/// Colours one page is painted from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageStyle {
    pub base: [f32; 3],
    pub accent: [f32; 3],
}

/// Ordered list of opaque page identities.
pub trait ContentProvider {
    fn count(&self) -> usize;
    fn item_at(&self, index: usize) -> PageStyle;
}

/// Evenly hue-spread procedural pages.
pub struct ProceduralPages {
    styles: Vec<PageStyle>,
}

impl ProceduralPages {
    pub fn new(count: usize) -> Self {
        let styles = (0..count)
            .map(|index| {
                let hue = index as f32 / count.max(1) as f32;
                PageStyle {
                    base: hsv_to_rgb(hue, 0.55, 0.30),
                    accent: hsv_to_rgb(hue, 0.65, 0.85),
                }
            })
            .collect();
        Self { styles }
    }
}

impl ContentProvider for ProceduralPages {
    fn count(&self) -> usize {
        self.styles.len()
    }

    fn item_at(&self, index: usize) -> PageStyle {
        self.styles[index % self.styles.len().max(1)]
    }
}

/// Paints one page into the staging frame: a vertical base-to-accent
/// gradient with horizontal accent bands, plus an index-coded stripe count
/// so adjacent pages are visibly distinct under the lens.
pub fn paint_page(canvas: &mut FrameCanvas<'_>, style: &PageStyle, page_index: usize) {
    let width = canvas.width() as usize;
    let height = canvas.height() as usize;
    let stripes = 3 + page_index;
    let pixels = canvas.pixels_mut();

    for y in 0..height {
        let t = y as f32 / height.max(1) as f32;
        let band = ((t * stripes as f32).fract() < 0.12) as u8 as f32;
        let row = &mut pixels[y * width * 4..(y + 1) * width * 4];
        for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
            let shade = 1.0 - 0.25 * (x as f32 / width.max(1) as f32);
            for channel in 0..3 {
                let base = style.base[channel] + (style.accent[channel] - style.base[channel]) * t;
                let value = (base * shade * (1.0 - band) + style.accent[channel] * band) * 255.0;
                pixel[channel] = value.clamp(0.0, 255.0) as u8;
            }
            pixel[3] = 0xff;
        }
    }
}

fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> [f32; 3] {
    let h = (hue.fract() * 6.0).max(0.0);
    let chroma = value * saturation;
    let x = chroma * (1.0 - ((h % 2.0) - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = value - chroma;
    [r + m, g + m, b + m]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_reports_requested_count() {
        let pages = ProceduralPages::new(5);
        assert_eq!(pages.count(), 5);
    }

    #[test]
    fn pages_get_distinct_hues() {
        let pages = ProceduralPages::new(4);
        assert_ne!(pages.item_at(0).accent, pages.item_at(1).accent);
        assert_ne!(pages.item_at(1).accent, pages.item_at(2).accent);
    }

    #[test]
    fn hsv_red_and_green_are_where_expected() {
        let red = hsv_to_rgb(0.0, 1.0, 1.0);
        assert!(red[0] > 0.99 && red[1] < 0.01 && red[2] < 0.01);
        let green = hsv_to_rgb(1.0 / 3.0, 1.0, 1.0);
        assert!(green[1] > 0.99 && green[0] < 0.01);
    }
}
