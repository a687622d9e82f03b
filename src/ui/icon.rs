/// Window icon, drawn at startup: two overlapping pages
use iced::window;
use image::{Rgba, RgbaImage};

pub const SIZE: u32 = 64;

const BACK_PAGE: Rgba<u8> = Rgba([150, 160, 175, 255]);
const FRONT_PAGE: Rgba<u8> = Rgba([245, 245, 245, 255]);
const OUTLINE: Rgba<u8> = Rgba([45, 90, 170, 255]);

pub fn app_icon() -> Option<window::Icon> {
    match window::icon::from_rgba(pixels().into_raw(), SIZE, SIZE) {
        Ok(icon) => Some(icon),
        Err(e) => {
            log::warn!("⚠️  Could not build window icon: {}", e);
            None
        }
    }
}

pub fn pixels() -> RgbaImage {
    let mut img = RgbaImage::new(SIZE, SIZE);
    page(&mut img, 8, 4, 36, 46, BACK_PAGE);
    page(&mut img, 20, 14, 36, 46, FRONT_PAGE);
    img
}

/// Filled rectangle with a 2px outline
fn page(img: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, fill: Rgba<u8>) {
    for py in y..(y + height).min(SIZE) {
        for px in x..(x + width).min(SIZE) {
            let edge = px < x + 2 || py < y + 2 || px + 2 >= x + width || py + 2 >= y + height;
            img.put_pixel(px, py, if edge { OUTLINE } else { fill });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_pixels() {
        let img = pixels();
        assert_eq!(img.dimensions(), (SIZE, SIZE));
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(*img.get_pixel(8, 4), OUTLINE);
        // front page covers the back one where they overlap
        assert_eq!(*img.get_pixel(30, 30), FRONT_PAGE);
        assert_eq!(*img.get_pixel(12, 10), BACK_PAGE);
    }

    #[test]
    fn test_app_icon_builds() {
        assert!(app_icon().is_some());
    }
}
