//! Progressive block rendering.
//!
//! The image is first flooded with a single color, then covered in passes of
//! square blocks whose size halves each pass, so a rough preview appears at
//! once and sharpens over time. Each block costs one `get_color` call at its
//! top-left pixel.
//!
//! The renderer is a plain state machine: the host calls [`ProgressiveRenderer::step`]
//! from its own loop and gets control back after every unit of work chosen by
//! [`ShowMode`], free to redraw or handle input in between.

use std::time::Instant;

use crate::renderer::{ImageBuffer, PixelSource};
use crate::Color;

/// Default block size of the first pass.
pub const DEFAULT_START_BLOCK_SIZE: u32 = 256;

/// How much work a single `step()` performs before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowMode {
    /// Return after every block.
    PerPixel,
    /// Return after every column (or row, for row-major scans).
    #[default]
    PerColumn,
    /// Return after every full pass.
    PerPass,
    /// Render everything in one step, starting near full resolution.
    Final,
}

/// Order blocks are visited within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanOrder {
    /// Top to bottom, then left to right.
    #[default]
    ColumnMajor,
    /// Left to right, then top to bottom.
    RowMajor,
}

/// Progressive render settings.
#[derive(Debug, Clone)]
pub struct ProgressiveConfig {
    /// Block size of the first pass
    pub start_block_size: u32,
    /// Rendering stops once the block size is at or below this
    pub min_block_size: u32,
    pub show: ShowMode,
    pub scan_order: ScanOrder,
}

impl Default for ProgressiveConfig {
    fn default() -> Self {
        Self {
            start_block_size: DEFAULT_START_BLOCK_SIZE,
            min_block_size: 0,
            show: ShowMode::default(),
            scan_order: ScanOrder::default(),
        }
    }
}

impl ProgressiveConfig {
    pub fn with_show(mut self, show: ShowMode) -> Self {
        self.show = show;
        self
    }

    pub fn with_block_sizes(mut self, start: u32, min: u32) -> Self {
        self.start_block_size = start;
        self.min_block_size = min;
        self
    }

    pub fn with_scan_order(mut self, scan_order: ScanOrder) -> Self {
        self.scan_order = scan_order;
        self
    }

    /// Block size of the first pass.
    ///
    /// `Final` skips the coarse passes nobody would see and starts at the
    /// last one.
    pub fn effective_start_size(&self) -> u32 {
        match self.show {
            ShowMode::Final => (self.min_block_size * 2).max(1),
            _ => self.start_block_size,
        }
    }
}

/// What the last `step()` finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The whole image was filled with the color of pixel (0, 0).
    Primed,
    /// One block was rendered.
    Block { x: u32, y: u32, size: u32 },
    /// The last block of a column (row, for row-major scans) was rendered.
    Line { index: u32, block_size: u32 },
    /// The last block of a pass was rendered.
    Pass { block_size: u32 },
    /// Nothing left to do.
    Done,
}

impl Step {
    /// Coarseness of the boundary this step reached.
    fn rank(self) -> u8 {
        match self {
            Step::Block { .. } => 0,
            Step::Line { .. } => 1,
            Step::Pass { .. } => 2,
            Step::Primed | Step::Done => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Running { block_size: u32, x: u32, y: u32 },
    Done,
}

/// Drives a [`PixelSource`] through progressively finer passes.
pub struct ProgressiveRenderer<S> {
    source: S,
    config: ProgressiveConfig,
    image: ImageBuffer,
    state: State,
    blocks_rendered: usize,
    started: Option<Instant>,
}

impl<S: PixelSource> ProgressiveRenderer<S> {
    pub fn new(source: S, config: ProgressiveConfig) -> Self {
        let image = ImageBuffer::new(source.width(), source.height());
        Self {
            source,
            config,
            image,
            state: State::Idle,
            blocks_rendered: 0,
            started: None,
        }
    }

    /// Do the next unit of work, as sized by the configured [`ShowMode`].
    ///
    /// Once finished this keeps returning [`Step::Done`].
    pub fn step(&mut self) -> Step {
        let threshold = match self.config.show {
            ShowMode::PerPixel => 0,
            ShowMode::PerColumn => 1,
            ShowMode::PerPass => 2,
            ShowMode::Final => 3,
        };
        loop {
            let step = self.tick();
            if step.rank() >= threshold {
                return step;
            }
        }
    }

    /// Step until done.
    pub fn run_to_completion(&mut self) -> &ImageBuffer {
        while self.step() != Step::Done {}
        &self.image
    }

    /// Discard all progress; the next step starts over from the priming fill.
    ///
    /// The frame is cleared to black until then.
    pub fn restart(&mut self) {
        log::debug!("Restarting progressive render");
        self.image.fill(Color::ZERO);
        self.state = State::Idle;
        self.blocks_rendered = 0;
        self.started = None;
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    pub fn image(&self) -> &ImageBuffer {
        &self.image
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &ProgressiveConfig {
        &self.config
    }

    /// Blocks rendered since the last (re)start, not counting the priming fill.
    pub fn blocks_rendered(&self) -> usize {
        self.blocks_rendered
    }

    /// Block size of the pass in progress.
    pub fn block_size(&self) -> Option<u32> {
        match self.state {
            State::Running { block_size, .. } => Some(block_size),
            _ => None,
        }
    }

    /// Render exactly one block (or the priming fill).
    fn tick(&mut self) -> Step {
        match self.state {
            State::Idle => {
                self.started = Some(Instant::now());
                let color = self.source.get_color(0, 0);
                self.image.fill(color);
                self.state = self.begin_pass(self.config.effective_start_size());
                Step::Primed
            }
            State::Running { block_size, x, y } => {
                let color = self.source.get_color(x, y);
                self.image.fill_block(x, y, block_size, color);
                self.blocks_rendered += 1;

                let (width, height) = (self.image.width, self.image.height);
                let (next_x, next_y, line) = match self.config.scan_order {
                    ScanOrder::ColumnMajor if y + block_size >= height => {
                        (x + block_size, 0, Some(x))
                    }
                    ScanOrder::ColumnMajor => (x, y + block_size, None),
                    ScanOrder::RowMajor if x + block_size >= width => {
                        (0, y + block_size, Some(y))
                    }
                    ScanOrder::RowMajor => (x + block_size, y, None),
                };

                let pass_done = match self.config.scan_order {
                    ScanOrder::ColumnMajor => next_x >= width,
                    ScanOrder::RowMajor => next_y >= height,
                };

                if pass_done {
                    self.state = self.begin_pass(block_size / 2);
                    Step::Pass { block_size }
                } else {
                    self.state = State::Running {
                        block_size,
                        x: next_x,
                        y: next_y,
                    };
                    match line {
                        Some(index) => Step::Line { index, block_size },
                        None => Step::Block {
                            x,
                            y,
                            size: block_size,
                        },
                    }
                }
            }
            State::Done => Step::Done,
        }
    }

    fn begin_pass(&mut self, block_size: u32) -> State {
        let empty = self.image.width == 0 || self.image.height == 0;
        if block_size > self.config.min_block_size && block_size > 0 && !empty {
            log::info!("Block size: {:3}", block_size);
            State::Running {
                block_size,
                x: 0,
                y: 0,
            }
        } else {
            let elapsed = self.started.map(|t| t.elapsed().as_secs_f32()).unwrap_or(0.0);
            log::info!(
                "Completed {} blocks in {:.4} seconds",
                self.blocks_rendered,
                elapsed
            );
            State::Done
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Encodes the requested pixel in the color, and counts requests.
    struct Gradient {
        width: u32,
        height: u32,
        calls: Cell<usize>,
    }

    impl Gradient {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                calls: Cell::new(0),
            }
        }
    }

    impl PixelSource for Gradient {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn get_color(&self, x: u32, y: u32) -> Color {
            self.calls.set(self.calls.get() + 1);
            Color::new(x as f32 / 100.0, y as f32 / 100.0, 1.0)
        }
    }

    fn config(show: ShowMode) -> ProgressiveConfig {
        ProgressiveConfig::default()
            .with_show(show)
            .with_block_sizes(4, 0)
    }

    fn collect(renderer: &mut ProgressiveRenderer<Gradient>) -> Vec<Step> {
        let mut steps = Vec::new();
        loop {
            let step = renderer.step();
            steps.push(step);
            if step == Step::Done {
                return steps;
            }
        }
    }

    #[test]
    fn test_first_step_primes() {
        let mut renderer = ProgressiveRenderer::new(Gradient::new(8, 8), config(ShowMode::PerPixel));
        assert_eq!(renderer.step(), Step::Primed);
        assert_eq!(renderer.block_size(), Some(4));
        assert!(renderer.image().pixels.iter().all(|c| *c == Color::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_per_pixel_counts() {
        let mut renderer = ProgressiveRenderer::new(Gradient::new(8, 8), config(ShowMode::PerPixel));
        let steps = collect(&mut renderer);

        // 4 + 16 + 64 blocks over passes of size 4, 2, 1
        assert_eq!(renderer.blocks_rendered(), 84);
        let work = steps.iter().filter(|s| s.rank() < 3).count();
        assert_eq!(work, 84);
        let passes: Vec<_> = steps
            .iter()
            .filter_map(|s| match s {
                Step::Pass { block_size } => Some(*block_size),
                _ => None,
            })
            .collect();
        assert_eq!(passes, vec![4, 2, 1]);
        assert_eq!(renderer.source().calls.get(), 85);
    }

    #[test]
    fn test_per_column_and_pass_granularity() {
        let mut renderer = ProgressiveRenderer::new(Gradient::new(8, 8), config(ShowMode::PerColumn));
        let steps = collect(&mut renderer);
        // Primed, 2 + 4 + 8 columns, Done
        assert_eq!(steps.len(), 1 + 14 + 1);
        assert!(steps[1..15]
            .iter()
            .all(|s| matches!(s, Step::Line { .. } | Step::Pass { .. })));

        let mut renderer = ProgressiveRenderer::new(Gradient::new(8, 8), config(ShowMode::PerPass));
        let steps = collect(&mut renderer);
        assert_eq!(
            steps,
            vec![
                Step::Primed,
                Step::Pass { block_size: 4 },
                Step::Pass { block_size: 2 },
                Step::Pass { block_size: 1 },
                Step::Done,
            ]
        );
    }

    #[test]
    fn test_column_major_order() {
        let mut renderer = ProgressiveRenderer::new(Gradient::new(8, 8), config(ShowMode::PerPixel));
        renderer.step();
        assert_eq!(renderer.step(), Step::Block { x: 0, y: 0, size: 4 });
        assert_eq!(renderer.step(), Step::Line { index: 0, block_size: 4 });
        assert_eq!(renderer.step(), Step::Block { x: 4, y: 0, size: 4 });
    }

    #[test]
    fn test_row_major_order() {
        let mut renderer = ProgressiveRenderer::new(
            Gradient::new(8, 8),
            config(ShowMode::PerPixel).with_scan_order(ScanOrder::RowMajor),
        );
        renderer.step();
        assert_eq!(renderer.step(), Step::Block { x: 0, y: 0, size: 4 });
        assert_eq!(renderer.step(), Step::Line { index: 0, block_size: 4 });
        assert_eq!(renderer.step(), Step::Block { x: 0, y: 4, size: 4 });
    }

    #[test]
    fn test_final_image_is_full_resolution() {
        let mut renderer = ProgressiveRenderer::new(Gradient::new(7, 5), config(ShowMode::PerPass));
        let image = renderer.run_to_completion().clone();
        for y in 0..5 {
            for x in 0..7 {
                assert_eq!(image.get(x, y), Color::new(x as f32 / 100.0, y as f32 / 100.0, 1.0));
            }
        }
        assert!(renderer.is_done());
        assert_eq!(renderer.step(), Step::Done);
    }

    #[test]
    fn test_final_mode_starts_small() {
        let cfg = ProgressiveConfig::default()
            .with_show(ShowMode::Final)
            .with_block_sizes(256, 0);
        assert_eq!(cfg.effective_start_size(), 1);
        assert_eq!(cfg.clone().with_block_sizes(256, 2).effective_start_size(), 4);

        let mut renderer = ProgressiveRenderer::new(Gradient::new(8, 8), cfg);
        assert_eq!(renderer.step(), Step::Primed);
        assert_eq!(renderer.step(), Step::Done);
        assert_eq!(renderer.blocks_rendered(), 64);
    }

    #[test]
    fn test_min_block_size_stops_early() {
        let mut renderer = ProgressiveRenderer::new(
            Gradient::new(8, 8),
            ProgressiveConfig::default()
                .with_show(ShowMode::PerPass)
                .with_block_sizes(4, 1),
        );
        renderer.run_to_completion();
        assert_eq!(renderer.blocks_rendered(), 4 + 16);
    }

    #[test]
    fn test_restart() {
        let mut renderer = ProgressiveRenderer::new(Gradient::new(8, 8), config(ShowMode::PerPixel));
        for _ in 0..10 {
            renderer.step();
        }
        assert_eq!(renderer.blocks_rendered(), 9);

        assert!(renderer.image().pixels.iter().all(|c| c.z == 1.0));

        renderer.restart();
        assert!(!renderer.is_done());
        assert_eq!(renderer.blocks_rendered(), 0);
        assert_eq!(renderer.block_size(), None);
        // No stale frame between restart and the next step
        assert!(renderer.image().pixels.iter().all(|c| *c == Color::ZERO));
        assert_eq!(renderer.step(), Step::Primed);
        assert!(renderer.image().pixels.iter().all(|c| c.z == 1.0));
        assert_eq!(renderer.block_size(), Some(4));

        renderer.run_to_completion();
        assert_eq!(renderer.blocks_rendered(), 84);

        // Restart after completion
        renderer.restart();
        assert_eq!(renderer.step(), Step::Primed);
    }

    #[test]
    fn test_empty_image() {
        let mut renderer = ProgressiveRenderer::new(Gradient::new(0, 0), config(ShowMode::PerPixel));
        assert_eq!(renderer.step(), Step::Primed);
        assert_eq!(renderer.step(), Step::Done);
    }
}
