//! Screen Capture Layer
//!
//! Grabs the primary display, writes PNGs to disk and keeps the two bounded
//! screenshot queues: the main queue (filled from the queue view) and the
//! extra queue (filled from any other view, used for debugging a solution).

pub mod frame;

use anyhow::{anyhow, Context, Result};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::shared::ViewMode;
pub use frame::CapturedImage;

/// Maximum entries kept per queue; the oldest is evicted first
pub const MAX_SCREENSHOTS: usize = 5;

/// Source of screen images
pub trait ScreenGrabber: Send + Sync {
    fn grab(&self) -> Result<CapturedImage>;
}

/// Captures the primary display through the `screenshots` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimaryScreenGrabber;

impl ScreenGrabber for PrimaryScreenGrabber {
    fn grab(&self) -> Result<CapturedImage> {
        use screenshots::image::codecs::png::PngEncoder;
        use screenshots::image::ImageEncoder;
        use screenshots::Screen;

        let screens = Screen::all().map_err(|e| anyhow!("Failed to get screens: {}", e))?;
        let screen = screens
            .iter()
            .find(|screen| screen.display_info.is_primary)
            .or_else(|| screens.first())
            .ok_or_else(|| anyhow!("No screens found"))?;

        let image = screen
            .capture()
            .map_err(|e| anyhow!("Failed to capture screen: {}", e))?;

        let mut png = Vec::new();
        PngEncoder::new(Cursor::new(&mut png))
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                screenshots::image::ColorType::Rgba8,
            )
            .map_err(|e| anyhow!("Failed to encode screenshot: {}", e))?;

        Ok(CapturedImage::new(png, image.width(), image.height()))
    }
}

/// Grab one image and write it as `<uuid>.png` into `dir`
pub fn capture_to_dir(grabber: &dyn ScreenGrabber, dir: &Path) -> Result<PathBuf> {
    let image = grabber.grab()?;

    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let path = dir.join(format!("{}.png", uuid::Uuid::new_v4()));
    std::fs::write(&path, &image.png).with_context(|| format!("Failed to write {:?}", path))?;

    info!(
        "Screenshot saved to {:?} ({}x{})",
        path, image.width, image.height
    );
    Ok(path)
}

/// Which queue a screenshot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    Main,
    Extra,
}

/// The two screenshot queues
#[derive(Debug, Clone)]
pub struct ScreenshotQueue {
    view: ViewMode,
    screenshot_dir: PathBuf,
    extra_screenshot_dir: PathBuf,
    queue: Vec<PathBuf>,
    extra_queue: Vec<PathBuf>,
}

impl ScreenshotQueue {
    pub fn new(screenshot_dir: impl Into<PathBuf>, extra_screenshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            view: ViewMode::Queue,
            screenshot_dir: screenshot_dir.into(),
            extra_screenshot_dir: extra_screenshot_dir.into(),
            queue: Vec::new(),
            extra_queue: Vec::new(),
        }
    }

    /// Follow the UI view so new captures land in the right queue
    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    /// Queue new captures go to in the current view
    pub fn active_kind(&self) -> QueueKind {
        if self.view == ViewMode::Queue {
            QueueKind::Main
        } else {
            QueueKind::Extra
        }
    }

    /// Directory new captures of `kind` are written to
    pub fn capture_dir(&self, kind: QueueKind) -> &Path {
        match kind {
            QueueKind::Main => &self.screenshot_dir,
            QueueKind::Extra => &self.extra_screenshot_dir,
        }
    }

    pub fn screenshot_queue(&self) -> &[PathBuf] {
        &self.queue
    }

    pub fn extra_screenshot_queue(&self) -> &[PathBuf] {
        &self.extra_queue
    }

    fn queue_mut(&mut self, kind: QueueKind) -> &mut Vec<PathBuf> {
        match kind {
            QueueKind::Main => &mut self.queue,
            QueueKind::Extra => &mut self.extra_queue,
        }
    }

    /// Append to a queue. When full, the oldest entry is evicted and its file
    /// removed; the evicted path is returned.
    pub fn push(&mut self, kind: QueueKind, path: PathBuf) -> Option<PathBuf> {
        let queue = self.queue_mut(kind);
        queue.push(path);

        if queue.len() > MAX_SCREENSHOTS {
            let evicted = queue.remove(0);
            remove_file_logged(&evicted);
            return Some(evicted);
        }
        None
    }

    /// Add an externally provided file (e.g. an upload) to the main queue
    pub fn add_file_to_queue(&mut self, path: PathBuf) {
        info!("Adding {:?} to the screenshot queue", path);
        self.push(QueueKind::Main, path);
    }

    /// Delete a queued screenshot from disk and from whichever queue holds it
    pub fn delete_screenshot(&mut self, path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e).with_context(|| format!("Failed to delete {:?}", path)),
        }
        self.queue.retain(|p| p != path);
        self.extra_queue.retain(|p| p != path);
        Ok(())
    }

    /// Empty both queues and delete their files
    pub fn clear_queues(&mut self) {
        for path in self.queue.drain(..).chain(self.extra_queue.drain(..)) {
            remove_file_logged(&path);
        }
    }
}

fn remove_file_logged(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to delete screenshot {:?}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct FakeGrabber;

    impl ScreenGrabber for FakeGrabber {
        fn grab(&self) -> Result<CapturedImage> {
            Ok(CapturedImage::new(vec![0x89, b'P', b'N', b'G'], 2, 2))
        }
    }

    struct FailingGrabber;

    impl ScreenGrabber for FailingGrabber {
        fn grab(&self) -> Result<CapturedImage> {
            Err(anyhow!("no display"))
        }
    }

    fn queue_in(temp: &TempDir) -> ScreenshotQueue {
        ScreenshotQueue::new(temp.path().join("main"), temp.path().join("extra"))
    }

    #[test]
    fn test_capture_to_dir_writes_png() {
        let temp = TempDir::new().unwrap();
        let path = capture_to_dir(&FakeGrabber, &temp.path().join("shots")).unwrap();

        assert_eq!(path.extension().unwrap(), "png");
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_capture_failure_propagates() {
        let temp = TempDir::new().unwrap();
        assert!(capture_to_dir(&FailingGrabber, temp.path()).is_err());
    }

    #[test]
    fn test_view_selects_queue() {
        let temp = TempDir::new().unwrap();
        let mut queue = queue_in(&temp);

        assert_eq!(queue.active_kind(), QueueKind::Main);
        queue.set_view(ViewMode::Solutions);
        assert_eq!(queue.active_kind(), QueueKind::Extra);
        assert_eq!(queue.capture_dir(QueueKind::Extra), temp.path().join("extra"));
    }

    #[test]
    fn test_push_evicts_oldest_and_deletes_file() {
        let temp = TempDir::new().unwrap();
        let mut queue = queue_in(&temp);

        let mut paths = Vec::new();
        for i in 0..=MAX_SCREENSHOTS {
            let path = temp.path().join(format!("{}.png", i));
            std::fs::write(&path, b"png").unwrap();
            paths.push(path);
        }

        for path in &paths[..MAX_SCREENSHOTS] {
            assert!(queue.push(QueueKind::Main, path.clone()).is_none());
        }
        let evicted = queue.push(QueueKind::Main, paths[MAX_SCREENSHOTS].clone());

        assert_eq!(evicted.as_ref(), Some(&paths[0]));
        assert!(!paths[0].exists());
        assert_eq!(queue.screenshot_queue(), &paths[1..]);
        assert!(queue.extra_screenshot_queue().is_empty());
    }

    #[test]
    fn test_delete_screenshot_removes_from_queue() {
        let temp = TempDir::new().unwrap();
        let mut queue = queue_in(&temp);
        let path = temp.path().join("shot.png");
        std::fs::write(&path, b"png").unwrap();

        queue.push(QueueKind::Extra, path.clone());
        queue.delete_screenshot(&path).unwrap();

        assert!(!path.exists());
        assert!(queue.extra_screenshot_queue().is_empty());
    }

    #[test]
    fn test_clear_queues_deletes_files() {
        let temp = TempDir::new().unwrap();
        let mut queue = queue_in(&temp);
        let main = temp.path().join("main.png");
        let extra = temp.path().join("extra.png");
        std::fs::write(&main, b"png").unwrap();
        std::fs::write(&extra, b"png").unwrap();

        queue.push(QueueKind::Main, main.clone());
        queue.push(QueueKind::Extra, extra.clone());
        queue.clear_queues();

        assert!(queue.screenshot_queue().is_empty());
        assert!(queue.extra_screenshot_queue().is_empty());
        assert!(!main.exists());
        assert!(!extra.exists());
    }
}
