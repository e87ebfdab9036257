//! Where finished images go.

use std::path::{Path, PathBuf};

use crate::error::{RenderError, Result};
use crate::flow::Canvas;
use crate::normalize::IntensityGrid;
use crate::palette::Palette;

/// Receives finished images, one per rendered parameter set.
pub trait ImageSink {
    /// Takes a normalized image.  `name` identifies the render and is
    /// unique within one run.
    fn accept(&mut self, name: &str, image: &IntensityGrid) -> Result<()>;
}

/// Writes `<dir>/<name>.png`, as a graymap or through a palette.
#[derive(Clone, Debug)]
pub struct PngSink {
    dir: PathBuf,
    palette: Option<Palette>,
}

impl PngSink {
    /// Writes graymaps into `dir`, which must already exist.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        PngSink {
            dir: dir.as_ref().to_path_buf(),
            palette: None,
        }
    }

    /// Colours every image through `palette`.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// The file an image called `name` is written to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.png", name))
    }

    /// Writes a flow canvas as an RGB image.
    pub fn write_canvas(&self, name: &str, canvas: &Canvas) -> Result<PathBuf> {
        let path = self.path_for(name);
        let image = canvas
            .to_rgb_image()
            .ok_or_else(|| RenderError::Encode(format!("canvas {} is malformed", name)))?;
        image.save(&path)?;
        tracing::info!(path = %path.display(), "wrote canvas");
        Ok(path)
    }
}

impl ImageSink for PngSink {
    fn accept(&mut self, name: &str, image: &IntensityGrid) -> Result<()> {
        let path = self.path_for(name);
        match self.palette {
            Some(ref palette) => image.to_rgb_image(palette).save(&path)?,
            None => image.to_gray_image().save(&path)?,
        }
        tracing::info!(path = %path.display(), "wrote image");
        Ok(())
    }
}

/// Keeps images in memory, in arrival order.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    /// Every image received so far, with its name.
    pub images: Vec<(String, IntensityGrid)>,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        MemorySink::default()
    }

    /// The image received under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&IntensityGrid> {
        self.images
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, image)| image)
    }
}

impl ImageSink for MemorySink {
    fn accept(&mut self, name: &str, image: &IntensityGrid) -> Result<()> {
        self.images.push((name.to_string(), image.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn checker() -> IntensityGrid {
        IntensityGrid::from_pixels(2, 2, vec![0, 255, 255, 0]).unwrap()
    }

    #[test]
    fn memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        sink.accept("a", &checker()).unwrap();
        sink.accept("b", &checker()).unwrap();
        assert_eq!(sink.images.len(), 2);
        assert_eq!(sink.images[1].0, "b");
        assert_eq!(sink.get("a"), Some(&checker()));
        assert_eq!(sink.get("c"), None);
    }

    #[test]
    fn png_sink_writes_graymaps() {
        let dir = tempdir().unwrap();
        let mut sink = PngSink::new(dir.path());
        sink.accept("checker", &checker()).unwrap();
        let written = image::open(sink.path_for("checker")).unwrap().to_luma();
        assert_eq!(written.dimensions(), (2, 2));
        assert_eq!(written.get_pixel(1, 0)[0], 255);
        assert_eq!(written.get_pixel(1, 1)[0], 0);
    }

    #[test]
    fn png_sink_applies_the_palette() {
        let dir = tempdir().unwrap();
        let palette: Palette = "10 20 30\n40 50 60".parse().unwrap();
        let mut sink = PngSink::new(dir.path()).with_palette(palette);
        sink.accept("checker", &checker()).unwrap();
        let written = image::open(sink.path_for("checker")).unwrap().to_rgb();
        // 0 and 255 wrap to the first and second colours.
        assert_eq!(written.get_pixel(0, 0).0, [10, 20, 30]);
        assert_eq!(written.get_pixel(1, 0).0, [40, 50, 60]);
    }

    #[test]
    fn missing_directories_are_io_errors() {
        let dir = tempdir().unwrap();
        let mut sink = PngSink::new(dir.path().join("absent"));
        match sink.accept("checker", &checker()) {
            Err(RenderError::Io(_)) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn canvases_are_written_as_rgb() {
        let dir = tempdir().unwrap();
        let sink = PngSink::new(dir.path());
        let mut canvas = Canvas::new(3, 2).unwrap();
        canvas.add_pixel(crate::geometry::Pixel(2, 1), [7, 8, 9]);
        let path = sink.write_canvas("flow", &canvas).unwrap();
        let written = image::open(path).unwrap().to_rgb();
        assert_eq!(written.get_pixel(2, 1).0, [7, 8, 9]);
        assert_eq!(written.get_pixel(0, 0).0, [0, 0, 0]);
    }
}
