use image::{GrayImage, Luma};
use log::info;
use std::convert::TryFrom;
use std::path::Path;

use crate::coordinates::Coordinate;
use crate::errors::*;
use crate::grid::Grid;

const WALL_LUMA: Luma<u8> = Luma([0]);
const PASSAGE_LUMA: Luma<u8> = Luma([0xff]);

/// Draw the maze as a grayscale image, one `cell_pixels` sided black (wall) or white (passage) square
/// per cell, `y = 0` along the top. A `cell_pixels` of 0 is treated as 1.
///
/// Errors with `ImageTooLarge` if either image side does not fit in a `u32`.
pub fn render_image(grid: &Grid, cell_pixels: u8) -> Result<GrayImage> {
    let side = u32::from(cell_pixels.max(1));
    let too_large = || ErrorKind::ImageTooLarge(grid.width().0, grid.height().0, side);
    let image_side = |cells: usize| u32::try_from(cells).ok().and_then(|n| n.checked_mul(side));

    let image_width = image_side(grid.width().0).ok_or_else(&too_large)?;
    let image_height = image_side(grid.height().0).ok_or_else(&too_large)?;

    Ok(GrayImage::from_fn(image_width, image_height, |px, py| {
        let coord = Coordinate::new((px / side) as usize, (py / side) as usize);
        if grid.is_passage(coord) {
            PASSAGE_LUMA
        } else {
            WALL_LUMA
        }
    }))
}

/// Render the maze and write it out as a PNG.
pub fn save_image(grid: &Grid, cell_pixels: u8, path: &Path) -> Result<()> {
    let img = render_image(grid, cell_pixels)?;
    img.save_with_format(path, image::ImageFormat::Png)
        .chain_err(|| format!("Failed to write maze image to {}", path.display()))?;
    info!("Wrote {}x{} maze image to {}", img.width(), img.height(), path.display());
    Ok(())
}
